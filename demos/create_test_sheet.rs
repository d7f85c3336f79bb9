use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use sheetcut::DetectionPipeline;

fn main() -> anyhow::Result<()> {
    // Off-white paper with a faint vertical gradient
    let mut img = RgbImage::from_fn(800, 600, |_, y| {
        let shade = 235 - (y * 10 / 600) as u8;
        Rgb([shade, shade, shade - 5])
    });

    // 3 x 2 grid of cards, slightly out of line like a hand-placed scan
    let colors = [
        Rgb([200, 60, 60]),
        Rgb([60, 140, 200]),
        Rgb([215, 215, 205]),
        Rgb([90, 170, 90]),
        Rgb([230, 190, 70]),
        Rgb([150, 90, 180]),
    ];
    for (i, color) in colors.iter().enumerate() {
        let col = (i % 3) as i32;
        let row = (i / 3) as i32;
        let x = 60 + col * 250 + (i as i32 % 2) * 6;
        let y = 60 + row * 270 + col * 8;
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(180, 220), *color);
    }

    img.save("test_sheet.png")?;
    println!("Created test_sheet.png (800x600, 6 cards)");

    let boxes = DetectionPipeline::new().detect(&image::DynamicImage::ImageRgb8(img))?;
    println!("Detected {} items:", boxes.len());
    for (i, b) in boxes.iter().enumerate() {
        println!(
            "  {}: ymin={:.1} xmin={:.1} ymax={:.1} xmax={:.1}",
            i + 1,
            b.top,
            b.left,
            b.bottom,
            b.right
        );
    }

    Ok(())
}
