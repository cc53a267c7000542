//! RustBarcode - classical barcode localisation
//!
//! Finds the single rectangular barcode region in a colour photograph with
//! plain image processing: greyscale conversion, local standard deviation,
//! smoothing, thresholding, morphology and connected-component labeling.
//! No symbology is decoded; the result is one bounding box.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Pipeline parameters (threshold, pass counts)
pub mod config;
/// Region detection modules (labeling, selection)
pub mod detector;
/// Error type shared by every stage
pub mod error;
/// Core data structures (PixelGrid, RegionStats, BoundingBox)
pub mod models;
/// Stage orchestration and intermediate outputs
pub mod pipeline;
/// Image loading, annotation and dataset helpers for tools
pub mod tools;
/// Pixel stages (grayscale, filters, binarization, morphology)
pub mod utils;

pub use config::PipelineConfig;
pub use error::DetectError;
pub use models::{BoundingBox, GrayGrid, PixelGrid, RegionStats};
pub use pipeline::{Pipeline, StageOutputs};

use utils::grayscale::split_rgb;

/// Per-stage counters from one detection run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionTelemetry {
    /// Brightest normalised greyscale value (255 for any valid image)
    pub peak_gray: u8,
    /// Largest local standard deviation
    pub peak_std_dev: f64,
    /// Foreground pixels straight after thresholding
    pub thresholded_pixels: usize,
    /// Foreground pixels after erosion
    pub eroded_pixels: usize,
    /// Foreground pixels after dilation
    pub dilated_pixels: usize,
    /// Connected components found
    pub components: usize,
    /// Pixel count of the selected component, 0 when none was selected
    pub selected_pixels: usize,
}

/// Locate the barcode in an RGB image
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// The bounding box of the detected region, 1-indexed and inclusive
pub fn detect(image: &[u8], width: usize, height: usize) -> Result<BoundingBox, DetectError> {
    Detector::new().detect(image, width, height)
}

/// Locate the barcode from separate red, green and blue channel grids
pub fn detect_channels(
    red: &GrayGrid,
    green: &GrayGrid,
    blue: &GrayGrid,
) -> Result<BoundingBox, DetectError> {
    Detector::new().detect_channels(red, green, blue)
}

/// Detector with configuration options
#[derive(Debug, Clone, Default)]
pub struct Detector {
    pipeline: Pipeline,
}

impl Detector {
    /// Create a new detector with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom parameters
    pub fn with_config(config: PipelineConfig) -> Result<Self, DetectError> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
        })
    }

    /// Parameters this detector runs with
    pub fn config(&self) -> &PipelineConfig {
        self.pipeline.config()
    }

    /// Detect the barcode region in an interleaved RGB image
    pub fn detect(
        &self,
        image: &[u8],
        width: usize,
        height: usize,
    ) -> Result<BoundingBox, DetectError> {
        let (red, green, blue) = split_rgb(image, width, height)?;
        self.pipeline.run(&red, &green, &blue)
    }

    /// Detect the barcode region from separate channel grids
    pub fn detect_channels(
        &self,
        red: &GrayGrid,
        green: &GrayGrid,
        blue: &GrayGrid,
    ) -> Result<BoundingBox, DetectError> {
        self.pipeline.run(red, green, blue)
    }

    /// Like `detect` but also collects stage-level telemetry counters
    pub fn detect_with_telemetry(
        &self,
        image: &[u8],
        width: usize,
        height: usize,
    ) -> (Result<BoundingBox, DetectError>, Option<DetectionTelemetry>) {
        match split_rgb(image, width, height) {
            Ok((red, green, blue)) => self.pipeline.run_with_telemetry(&red, &green, &blue),
            Err(err) => (Err(err), None),
        }
    }

    /// Run the pipeline and keep every intermediate grid
    pub fn stages(
        &self,
        image: &[u8],
        width: usize,
        height: usize,
    ) -> Result<StageOutputs, DetectError> {
        let (red, green, blue) = split_rgb(image, width, height)?;
        self.pipeline.run_stages(&red, &green, &blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_empty() {
        // 10x10 mid-grey RGB: no texture, so nothing survives thresholding
        let image = vec![90u8; 300];
        assert!(matches!(
            detect(&image, 10, 10),
            Err(DetectError::NoRegionFound)
        ));
    }

    #[test]
    fn test_detect_black_image() {
        let image = vec![0u8; 300];
        assert!(matches!(
            detect(&image, 10, 10),
            Err(DetectError::DegenerateLuminance)
        ));
    }

    #[test]
    fn test_detect_zero_size() {
        assert!(matches!(detect(&[], 0, 0), Err(DetectError::EmptyImage)));
    }

    #[test]
    fn test_detect_short_buffer() {
        let image = vec![255u8; 20];
        assert!(matches!(
            detect(&image, 10, 10),
            Err(DetectError::BufferSize { .. })
        ));
    }

    #[test]
    fn test_detect_channels_mismatch() {
        let a: GrayGrid = PixelGrid::filled(8, 8, 120);
        let b: GrayGrid = PixelGrid::filled(8, 7, 120);
        assert!(matches!(
            detect_channels(&a, &b, &a),
            Err(DetectError::DimensionMismatch { channel: "green", .. })
        ));
    }

    #[test]
    fn test_detector_uses_config() {
        let config = PipelineConfig {
            threshold: 55.0,
            erosion_passes: 1,
            ..PipelineConfig::default()
        };
        let detector = Detector::with_config(config).unwrap();
        assert_eq!(detector.config().threshold, 55.0);
        assert_eq!(detector.config().erosion_passes, 1);
    }

    #[test]
    fn test_stage_regions_give_same_box_as_detect() {
        // Vertical 2-px bars inside cols 15..45, rows 10..30 of a 60x40 frame
        let (width, height) = (60, 40);
        let mut image = vec![255u8; width * height * 3];
        for y in 10..30 {
            for x in (15..45).filter(|x| (x / 2) % 2 == 0) {
                let i = (y * width + x) * 3;
                image[i..i + 3].fill(0);
            }
        }

        let detector = Detector::new();
        let stages = detector.stages(&image, width, height).unwrap();
        let from_stages = detector::selector::select_region(&stages.regions).unwrap();
        assert_eq!(from_stages, detector.detect(&image, width, height).unwrap());
    }
}
