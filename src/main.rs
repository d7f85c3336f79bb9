use anyhow::Context;
use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use sheetcut::extract::{self, DEFAULT_PADDING};
use sheetcut::{Backend, CropRect, DetectionPipeline};

#[derive(Parser)]
#[command(name = "sheetcut")]
#[command(about = "Find cards, stickers and cut-outs on a scanned sheet, in reading order")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Region to search, as normalized x,y,width,height (default: whole image)
    #[arg(long, value_name = "X,Y,W,H")]
    crop: Option<CropRect>,

    /// Print boxes as a JSON array
    #[arg(long)]
    json: bool,

    /// Save each detected item as NN.png in this directory
    #[arg(long, value_name = "DIR")]
    extract_dir: Option<PathBuf>,

    /// Padding in pixels around extracted items
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    padding: u32,

    /// Save intermediate stage images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// How long to wait for the vision backend before giving up
    #[arg(long, value_name = "MS", default_value_t = 10_000)]
    wait_timeout_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(path = %args.image_path.display(), "loading image");
    let img = ImageReader::open(&args.image_path)
        .with_context(|| format!("Failed to open {}", args.image_path.display()))?
        .decode()
        .context("Failed to decode image")?;

    let crop = args.crop.unwrap_or_else(CropRect::full);
    let sheet = extract::crop_to_region(&img, &crop)?;
    tracing::info!(width = sheet.width(), height = sheet.height(), "searching region");

    let mut pipeline = DetectionPipeline::new();
    if let Some(debug_dir) = &args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let backend = Backend::ready();
    let boxes = pipeline.detect_with_backend(
        &sheet,
        &backend,
        Duration::from_millis(args.wait_timeout_ms),
    )?;

    if boxes.is_empty() {
        eprintln!("warning: no items detected; try a tighter crop or a scan with more contrast");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&boxes)?);
    } else {
        println!("=== Detected Items ===");
        println!("Total: {}", boxes.len());
        for (i, b) in boxes.iter().enumerate() {
            println!(
                "  {:>3}: ymin={:.1} xmin={:.1} ymax={:.1} xmax={:.1}",
                i + 1,
                b.top,
                b.left,
                b.bottom,
                b.right
            );
        }
    }

    if let Some(dir) = &args.extract_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let items = extract::extract_items(&sheet, &boxes, args.padding);
        for (i, item) in items.iter().enumerate() {
            let path = dir.join(format!("{:02}.png", i + 1));
            item.save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }
        tracing::info!(count = items.len(), dir = %dir.display(), "extracted items");
    }

    Ok(())
}
