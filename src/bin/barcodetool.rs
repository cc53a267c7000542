use clap::{Parser, Subcommand};
use rust_barcode::tools::{
    annotate_file, bench_limit_from_env, dataset_iter, dataset_root_from_env, grayscale_stats,
    load_rgb, mask_stats, save_float, save_gray, save_mask,
};
use rust_barcode::detector::selector::select_region;
use rust_barcode::{DetectError, Detector, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "barcodetool", version, about = "RustBarcode CLI tools")]
struct Cli {
    /// JSON file with pipeline parameters; BARCODE_* env vars override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Locate the barcode in a single image
    Detect {
        #[arg(long)]
        image: PathBuf,
    },
    /// Locate the barcode and write a copy of the image with the box drawn
    Annotate {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Print per-stage statistics and optionally dump every stage as PNG
    DebugDetect {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },
    /// Run detection over every image in a folder
    Dataset {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let detector = match build_detector(cli.config.as_deref()) {
        Ok(detector) => detector,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Detect { image } => detect_cmd(&detector, &image),
        Command::Annotate { image, output } => annotate_cmd(&detector, &image, &output),
        Command::DebugDetect { image, dump_dir } => {
            debug_detect_cmd(&detector, &image, dump_dir.as_deref())
        }
        Command::Dataset { root, limit } => {
            dataset_cmd(&detector, root, limit);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn build_detector(config: Option<&Path>) -> Result<Detector, DetectError> {
    let base = match config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    Detector::with_config(base.with_env_overrides())
}

fn detect_cmd(detector: &Detector, image: &Path) -> Result<(), DetectError> {
    let (pixels, width, height) = load_rgb(image)?;
    println!("Image: {} ({}x{})", image.display(), width, height);

    let start = Instant::now();
    let bbox = detector.detect(&pixels, width, height)?;
    println!("Barcode region: {}", bbox);
    println!("Elapsed: {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

fn annotate_cmd(detector: &Detector, image: &Path, output: &Path) -> Result<(), DetectError> {
    let (pixels, width, height) = load_rgb(image)?;
    let bbox = detector.detect(&pixels, width, height)?;
    annotate_file(image, output, &bbox)?;
    println!("Barcode region: {}", bbox);
    println!("Wrote {}", output.display());
    Ok(())
}

fn debug_detect_cmd(
    detector: &Detector,
    image: &Path,
    dump_dir: Option<&Path>,
) -> Result<(), DetectError> {
    let (pixels, width, height) = load_rgb(image)?;
    println!("Image: {} ({}x{})", image.display(), width, height);
    println!("Config: {:?}", detector.config());

    let stages = detector.stages(&pixels, width, height)?;
    let gray_stats = grayscale_stats(&stages.gray);
    println!(
        "Grayscale range: {}-{}, average: {}",
        gray_stats.min, gray_stats.max, gray_stats.avg
    );

    let tel = stages.telemetry();
    println!("Peak std-dev: {:.2}", tel.peak_std_dev);
    for (name, mask) in [
        ("threshold", &stages.thresholded),
        ("erosion", &stages.eroded),
        ("dilation", &stages.dilated),
    ] {
        let stats = mask_stats(mask);
        println!(
            "After {}: foreground={} total={} ratio={:.2}%",
            name,
            stats.foreground_pixels,
            stats.total_pixels,
            stats.foreground_ratio * 100.0
        );
    }

    println!("Found {} components", stages.regions.len());
    let mut by_size: Vec<_> = stages.regions.values().collect();
    by_size.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));
    for region in by_size.iter().take(10) {
        println!(
            "  Label {}: pixels={} rows={}..={} cols={}..={}",
            region.label,
            region.pixel_count,
            region.min_row,
            region.max_row,
            region.min_col,
            region.max_col
        );
    }

    if let Some(dir) = dump_dir {
        fs::create_dir_all(dir)?;
        save_gray(&stages.gray, dir.join("1_gray.png"))?;
        save_float(&stages.std_dev, dir.join("2_std_dev.png"))?;
        save_float(&stages.smoothed, dir.join("3_smoothed.png"))?;
        save_mask(&stages.thresholded, dir.join("4_threshold.png"))?;
        save_mask(&stages.eroded, dir.join("5_eroded.png"))?;
        save_mask(&stages.dilated, dir.join("6_dilated.png"))?;
        println!("Stage images written to {}", dir.display());
    }

    match select_region(&stages.regions) {
        Ok(bbox) => println!("Barcode region: {}", bbox),
        Err(err) => println!("No detection: {}", err),
    }
    Ok(())
}

fn dataset_cmd(detector: &Detector, root: Option<PathBuf>, limit: Option<usize>) {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);

    let mut total = 0usize;
    let mut found = 0usize;
    let mut elapsed_ms = 0.0f64;
    for path in dataset_iter(&root, limit) {
        let (pixels, width, height) = match load_rgb(&path) {
            Ok(result) => result,
            Err(err) => {
                eprintln!("Failed to load image {}: {}", path.display(), err);
                continue;
            }
        };
        total += 1;

        let start = Instant::now();
        let result = detector.detect(&pixels, width, height);
        elapsed_ms += start.elapsed().as_secs_f64() * 1000.0;
        match result {
            Ok(bbox) => {
                found += 1;
                println!("{}: {}", path.display(), bbox);
            }
            Err(err) => println!("{}: {}", path.display(), err),
        }
    }

    if total == 0 {
        println!("No images found under {}", root.display());
        return;
    }
    println!(
        "Detected a region in {}/{} images ({:.1}%), avg {:.1} ms/image",
        found,
        total,
        found as f64 / total as f64 * 100.0,
        elapsed_ms / total as f64
    );
}
