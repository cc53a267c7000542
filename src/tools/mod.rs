//! Outer-surface helpers shared by the CLI, benches and integration tests:
//! image decoding, stage dumps, box annotation and dataset iteration.

use crate::DetectError;
use crate::models::{BinaryGrid, BoundingBox, FloatGrid, GrayGrid, PixelGrid};
use crate::utils::binarization::mask_to_gray;
use crate::utils::grayscale::split_rgb;
use image::{GrayImage, Rgb, RgbImage};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Colour of the annotation rectangle
pub const BOX_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
/// Line thickness of the annotation rectangle, in pixels
pub const BOX_THICKNESS: usize = 2;

/// Load an image as RGB bytes along with its dimensions.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), DetectError> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width as usize, height as usize))
}

/// Load an image and split it into red, green and blue grids.
pub fn load_channels<P: AsRef<Path>>(
    path: P,
) -> Result<(GrayGrid, GrayGrid, GrayGrid), DetectError> {
    let (rgb, width, height) = load_rgb(path)?;
    split_rgb(&rgb, width, height)
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a foreground mask.
#[derive(Debug, Clone, Copy)]
pub struct MaskStats {
    /// Count of foreground pixels.
    pub foreground_pixels: usize,
    /// Total pixels in the mask.
    pub total_pixels: usize,
    /// Ratio of foreground pixels to total pixels.
    pub foreground_ratio: f64,
}

/// Compute min/max/avg for a grayscale grid.
pub fn grayscale_stats(gray: &GrayGrid) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray.as_slice() {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute foreground stats for a mask.
pub fn mask_stats(mask: &BinaryGrid) -> MaskStats {
    let foreground = mask.as_slice().iter().filter(|&&v| v != 0).count();
    let total = mask.len();
    let ratio = if total == 0 {
        0.0
    } else {
        foreground as f64 / total as f64
    };
    MaskStats {
        foreground_pixels: foreground,
        total_pixels: total,
        foreground_ratio: ratio,
    }
}

fn to_gray_image(grid: &GrayGrid) -> Result<GrayImage, DetectError> {
    let (width, height) = grid.dimensions();
    GrayImage::from_raw(width as u32, height as u32, grid.as_slice().to_vec()).ok_or(
        DetectError::BufferSize {
            expected: width * height,
            actual: grid.len(),
        },
    )
}

/// Rescale a float grid so its maximum maps to 255, for visual inspection.
pub fn float_to_gray(grid: &FloatGrid) -> GrayGrid {
    let max = grid.as_slice().iter().copied().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return PixelGrid::new(grid.width(), grid.height());
    }
    grid.map(|v| (v / max * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Write a grayscale grid as an image file; the format follows the extension.
pub fn save_gray<P: AsRef<Path>>(grid: &GrayGrid, path: P) -> Result<(), DetectError> {
    to_gray_image(grid)?.save(path)?;
    Ok(())
}

/// Write a float grid, stretched to the full 0-255 range.
pub fn save_float<P: AsRef<Path>>(grid: &FloatGrid, path: P) -> Result<(), DetectError> {
    save_gray(&float_to_gray(grid), path)
}

/// Write a {0, 1} mask as black and white.
pub fn save_mask<P: AsRef<Path>>(mask: &BinaryGrid, path: P) -> Result<(), DetectError> {
    save_gray(&mask_to_gray(mask), path)
}

/// Draw `bbox` as a rectangle outline into `image`.
///
/// The box uses the 1-indexed convention of `BoundingBox`; edges falling
/// outside the image are clipped.
pub fn draw_bounding_box(image: &mut RgbImage, bbox: &BoundingBox, colour: Rgb<u8>, thickness: usize) {
    let (width, height) = (image.width() as usize, image.height() as usize);
    if width == 0 || height == 0 {
        return;
    }
    let left = bbox.min_col.saturating_sub(1).min(width - 1);
    let right = bbox.max_col.saturating_sub(1).min(width - 1);
    let top = bbox.min_row.saturating_sub(1).min(height - 1);
    let bottom = bbox.max_row.saturating_sub(1).min(height - 1);

    for t in 0..thickness {
        for x in left..=right {
            for y in [top.saturating_add(t), bottom.saturating_sub(t)] {
                if y < height {
                    image.put_pixel(x as u32, y as u32, colour);
                }
            }
        }
        for y in top..=bottom {
            for x in [left.saturating_add(t), right.saturating_sub(t)] {
                if x < width {
                    image.put_pixel(x as u32, y as u32, colour);
                }
            }
        }
    }
}

/// Load `input`, outline `bbox` on it and write the result to `output`.
pub fn annotate_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    bbox: &BoundingBox,
) -> Result<(), DetectError> {
    let mut rgb = image::open(input)?.to_rgb8();
    draw_bounding_box(&mut rgb, bbox, BOX_COLOUR, BOX_THICKNESS);
    if let Some(parent) = output.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    rgb.save(output)?;
    Ok(())
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("BARCODE_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("images"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `BARCODE_BENCH_LIMIT` is unset or `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("BARCODE_BENCH_LIMIT") {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

/// Iterate dataset image paths, sorted, with an optional limit.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if ext == "png" || ext == "jpg" || ext == "jpeg" || ext == "bmp" {
                    images.push(path);
                }
            }
        }
    }

    images
}
