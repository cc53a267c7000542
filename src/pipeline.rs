use crate::config::PipelineConfig;
use crate::detector::connected_components::label_regions;
use crate::detector::selector::select_region_stats;
use crate::models::{BinaryGrid, BoundingBox, FloatGrid, GrayGrid, LabelGrid, RegionStats};
use crate::utils::binarization::{threshold_binarize, to_binary_mask};
use crate::utils::filters::{gaussian_smooth_n, max_value, std_dev_filter};
use crate::utils::grayscale::rgb_to_grayscale;
use crate::utils::morphology::{count_foreground, dilate_n, erode_n};
use crate::{DetectError, DetectionTelemetry};
use std::collections::BTreeMap;

/// Every intermediate product of one pipeline run
#[derive(Debug, Clone)]
pub struct StageOutputs {
    /// Normalised greyscale
    pub gray: GrayGrid,
    /// 5x5 local standard deviation
    pub std_dev: FloatGrid,
    /// Std-dev map after smoothing
    pub smoothed: FloatGrid,
    /// {0, 1} mask straight after thresholding
    pub thresholded: BinaryGrid,
    /// Mask after all erosion passes
    pub eroded: BinaryGrid,
    /// Mask after all dilation passes
    pub dilated: BinaryGrid,
    /// Component label map of `dilated`
    pub labels: LabelGrid,
    /// Statistics per component label
    pub regions: BTreeMap<u32, RegionStats>,
}

impl StageOutputs {
    /// Counters describing this run
    pub fn telemetry(&self) -> DetectionTelemetry {
        DetectionTelemetry {
            peak_gray: self.gray.as_slice().iter().copied().max().unwrap_or(0),
            peak_std_dev: max_value(&self.std_dev),
            thresholded_pixels: count_foreground(&self.thresholded),
            eroded_pixels: count_foreground(&self.eroded),
            dilated_pixels: count_foreground(&self.dilated),
            components: self.regions.len(),
            selected_pixels: 0,
        }
    }
}

/// Configured sequence of pixel stages, from RGB channels to one region
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Build a pipeline, rejecting invalid parameters
    pub fn new(config: PipelineConfig) -> Result<Self, DetectError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parameters this pipeline runs with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage up to and including labeling
    pub fn run_stages(
        &self,
        red: &GrayGrid,
        green: &GrayGrid,
        blue: &GrayGrid,
    ) -> Result<StageOutputs, DetectError> {
        let gray = rgb_to_grayscale(red, green, blue)?;
        let std_dev = std_dev_filter(&gray);
        let smoothed = gaussian_smooth_n(&std_dev, self.config.smoothing_passes);
        let thresholded = to_binary_mask(&threshold_binarize(&smoothed, self.config.threshold));
        let eroded = erode_n(&thresholded, self.config.erosion_passes);
        let dilated = dilate_n(&eroded, self.config.dilation_passes);

        log::debug!(
            "morphology: {} foreground after threshold, {} after {} erosions, {} after {} dilations",
            count_foreground(&thresholded),
            count_foreground(&eroded),
            self.config.erosion_passes,
            count_foreground(&dilated),
            self.config.dilation_passes
        );

        let (labels, regions) = label_regions(&dilated);
        Ok(StageOutputs {
            gray,
            std_dev,
            smoothed,
            thresholded,
            eroded,
            dilated,
            labels,
            regions,
        })
    }

    /// Locate the barcode region and report stage counters
    ///
    /// The telemetry is `None` when the pipeline failed before labeling.
    pub fn run_with_telemetry(
        &self,
        red: &GrayGrid,
        green: &GrayGrid,
        blue: &GrayGrid,
    ) -> (Result<BoundingBox, DetectError>, Option<DetectionTelemetry>) {
        let stages = match self.run_stages(red, green, blue) {
            Ok(stages) => stages,
            Err(err) => {
                log::warn!("pipeline aborted: {err}");
                return (Err(err), None);
            }
        };

        let mut tel = stages.telemetry();
        match select_region_stats(&stages.regions) {
            Ok(best) => {
                tel.selected_pixels = best.pixel_count;
                (Ok(best.bounding_box()), Some(tel))
            }
            Err(err) => {
                log::warn!("pipeline finished without a region: {err}");
                (Err(err), Some(tel))
            }
        }
    }

    /// Locate the barcode region
    pub fn run(
        &self,
        red: &GrayGrid,
        green: &GrayGrid,
        blue: &GrayGrid,
    ) -> Result<BoundingBox, DetectError> {
        let stages = self.run_stages(red, green, blue)?;
        select_region_stats(&stages.regions).map(|best| best.bounding_box())
    }
}
