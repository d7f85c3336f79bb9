use image::{DynamicImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use sheetcut::{BoundingBox, PixelRect};

/// Light paper colour used as the sheet background
pub const PAPER: Rgb<u8> = Rgb([230, 230, 226]);

/// Creates a blank sheet of the given size
pub fn blank_sheet(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, PAPER)
}

/// Draws a solid card onto the sheet
pub fn draw_card(sheet: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
    draw_filled_rect_mut(
        sheet,
        Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
        color,
    );
}

/// Card rectangles for a 3 x 2 grid on a 600x400 sheet, in reading order.
/// Each column sits a little lower than the previous one.
pub fn grid_cards() -> Vec<PixelRect> {
    let mut cards = Vec::new();
    for row in 0..2u32 {
        for col in 0..3u32 {
            cards.push(PixelRect {
                x: 40 + col * 190 + (row * 5),
                y: 40 + row * 190 + col * 6,
                width: 120,
                height: 140,
            });
        }
    }
    cards
}

/// 600x400 sheet with the [`grid_cards`] drawn in different dark colours
pub fn grid_sheet() -> DynamicImage {
    let colors = [
        Rgb([40, 40, 120]),
        Rgb([150, 30, 30]),
        Rgb([20, 110, 40]),
        Rgb([90, 60, 20]),
        Rgb([60, 60, 60]),
        Rgb([120, 20, 110]),
    ];

    let mut sheet = blank_sheet(600, 400);
    for (rect, color) in grid_cards().into_iter().zip(colors) {
        draw_card(&mut sheet, rect, color);
    }
    DynamicImage::ImageRgb8(sheet)
}

/// 400x400 sheet with one card covering ~70% of the area and a single dark
/// speckle in the corner
pub fn card_with_speckle() -> DynamicImage {
    let mut sheet = blank_sheet(400, 400);
    draw_card(
        &mut sheet,
        PixelRect { x: 32, y: 32, width: 336, height: 336 },
        Rgb([40, 40, 40]),
    );
    sheet.put_pixel(8, 8, Rgb([0, 0, 0]));
    DynamicImage::ImageRgb8(sheet)
}

/// Sheet whose only feature is a dark border running along the image frame
pub fn framed_sheet(width: u32, height: u32, border: u32) -> DynamicImage {
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        let on_frame = x < border || y < border || x >= width - border || y >= height - border;
        Luma([if on_frame { 30 } else { 230 }])
    });
    DynamicImage::ImageLuma8(img)
}

/// Asserts that a detected box lies within `tolerance` pixels of a drawn card
pub fn assert_box_near(found: &BoundingBox, expected: PixelRect, width: u32, height: u32, tolerance: u32) {
    let px = found.to_pixels(width, height);
    let near = |a: u32, b: u32| a.abs_diff(b) <= tolerance;
    assert!(
        near(px.x, expected.x)
            && near(px.y, expected.y)
            && near(px.x + px.width, expected.x + expected.width)
            && near(px.y + px.height, expected.y + expected.height),
        "detected {:?} (pixels {:?}) is not within {}px of {:?}",
        found,
        px,
        tolerance,
        expected
    );
}
