//! Integration tests for barcode localisation
//!
//! These tests build synthetic photographs (a bar pattern on a tinted
//! background, optionally with clutter) and check that the detected box
//! lands on the bars, that runs are deterministic, and that degenerate
//! inputs surface as errors instead of boxes.

use image::{Rgb, RgbImage};
use rust_barcode::detector::connected_components::label_regions;
use rust_barcode::detector::selector::select_region;
use rust_barcode::models::BinaryGrid;
use rust_barcode::tools::{annotate_file, load_rgb, BOX_COLOUR};
use rust_barcode::{DetectError, Detector, PipelineConfig, PixelGrid, detect, detect_channels};
use std::fs;

const BACKGROUND: Rgb<u8> = Rgb([205, 196, 183]);
const INK: Rgb<u8> = Rgb([18, 20, 26]);

/// Bar widths cycled across the symbol; no run exceeds 3 px
const BAR_WIDTHS: [u32; 10] = [1, 2, 1, 3, 2, 1, 1, 2, 3, 1];

/// Paint a 1D barcode into `[x0, x1) x [y0, y1)`
fn paint_bars(img: &mut RgbImage, x0: u32, x1: u32, y0: u32, y1: u32) {
    let mut x = x0;
    let mut dark = true;
    let mut i = 0;
    while x < x1 {
        let w = BAR_WIDTHS[i % BAR_WIDTHS.len()];
        for bx in x..(x + w).min(x1) {
            for y in y0..y1 {
                if dark {
                    img.put_pixel(bx, y, INK);
                }
            }
        }
        x += w;
        dark = !dark;
        i += 1;
    }
}

fn synthetic_barcode(width: u32, height: u32, x0: u32, x1: u32, y0: u32, y1: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    paint_bars(&mut img, x0, x1, y0, y1);
    img
}

fn dims(img: &RgbImage) -> (usize, usize) {
    (img.width() as usize, img.height() as usize)
}

#[test]
fn test_detects_synthetic_barcode() {
    let img = synthetic_barcode(160, 100, 50, 110, 30, 70);
    let (width, height) = dims(&img);
    let bbox = detect(img.as_raw(), width, height).expect("barcode should be found");

    // 1-indexed box around bars spanning cols 51..=110 and rows 31..=70
    assert!((44..=52).contains(&bbox.min_col), "min_col {}", bbox.min_col);
    assert!((108..=117).contains(&bbox.max_col), "max_col {}", bbox.max_col);
    assert!((24..=32).contains(&bbox.min_row), "min_row {}", bbox.min_row);
    assert!((68..=77).contains(&bbox.max_row), "max_row {}", bbox.max_row);
    assert!(bbox.contains(80, 50));
}

#[test]
fn test_prefers_barcode_over_small_clutter() {
    let mut img = synthetic_barcode(200, 120, 90, 170, 40, 90);
    // A smaller textured patch elsewhere in the frame
    paint_bars(&mut img, 15, 40, 15, 40);
    let (width, height) = dims(&img);

    let detector = Detector::new();
    let (result, tel) = detector.detect_with_telemetry(img.as_raw(), width, height);
    let bbox = result.expect("barcode should be found");
    let tel = tel.expect("telemetry is collected once labeling runs");

    assert!(tel.components >= 2, "expected clutter to survive as its own component");
    assert!(bbox.contains(130, 65));
    assert!(!bbox.contains(27, 27));
    assert!(tel.selected_pixels * 2 > tel.dilated_pixels);
}

#[test]
fn test_detection_is_deterministic() {
    let img = synthetic_barcode(120, 90, 30, 90, 20, 70);
    let (width, height) = dims(&img);
    let first = detect(img.as_raw(), width, height).unwrap();
    for _ in 0..3 {
        assert_eq!(detect(img.as_raw(), width, height).unwrap(), first);
    }
}

#[test]
fn test_channels_and_interleaved_agree() {
    let img = synthetic_barcode(100, 80, 20, 80, 20, 60);
    let (width, height) = dims(&img);
    let raw = img.as_raw();
    let red = PixelGrid::from_fn(width, height, |x, y| raw[(y * width + x) * 3]);
    let green = PixelGrid::from_fn(width, height, |x, y| raw[(y * width + x) * 3 + 1]);
    let blue = PixelGrid::from_fn(width, height, |x, y| raw[(y * width + x) * 3 + 2]);

    assert_eq!(
        detect_channels(&red, &green, &blue).unwrap(),
        detect(raw, width, height).unwrap()
    );
}

#[test]
fn test_empty_mask_reports_no_region() {
    let mask: BinaryGrid = PixelGrid::new(10, 10);
    let (_, regions) = label_regions(&mask);
    assert!(regions.is_empty());
    assert!(matches!(
        select_region(&regions),
        Err(DetectError::NoRegionFound)
    ));
}

#[test]
fn test_plain_photo_reports_no_region() {
    let img = RgbImage::from_pixel(64, 48, BACKGROUND);
    let (width, height) = dims(&img);
    assert!(matches!(
        detect(img.as_raw(), width, height),
        Err(DetectError::NoRegionFound)
    ));
}

#[test]
fn test_black_photo_is_degenerate() {
    let img = RgbImage::new(32, 32);
    let (width, height) = dims(&img);
    assert!(matches!(
        detect(img.as_raw(), width, height),
        Err(DetectError::DegenerateLuminance)
    ));
}

#[test]
fn test_high_threshold_rejects_everything() {
    let img = synthetic_barcode(100, 80, 20, 80, 20, 60);
    let (width, height) = dims(&img);
    let config = PipelineConfig {
        threshold: 1000.0,
        ..PipelineConfig::default()
    };
    let detector = Detector::with_config(config).unwrap();
    assert!(matches!(
        detector.detect(img.as_raw(), width, height),
        Err(DetectError::NoRegionFound)
    ));
}

#[test]
fn test_annotate_round_trip() {
    let img = synthetic_barcode(120, 90, 30, 90, 20, 70);
    let dir = std::env::temp_dir().join(format!("rust_barcode_annotate_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let input = dir.join("input.png");
    let output = dir.join("out").join("annotated.png");
    img.save(&input).unwrap();

    let (pixels, width, height) = load_rgb(&input).unwrap();
    let bbox = detect(&pixels, width, height).unwrap();
    annotate_file(&input, &output, &bbox).unwrap();

    let annotated = image::open(&output).unwrap().to_rgb8();
    let corner = annotated.get_pixel((bbox.min_col - 1) as u32, (bbox.min_row - 1) as u32);
    assert_eq!(*corner, BOX_COLOUR);
    let _ = fs::remove_dir_all(dir);
}
