//! Utility functions for image processing
//!
//! This module provides the pixel stages of barcode localisation:
//! - Grayscale conversion (RGB channels to normalised luminance)
//! - Filters (5x5 standard deviation, 3x3 binomial blur)
//! - Binarization (fixed threshold)
//! - Morphology (3x3 erosion and dilation)

pub mod binarization;
pub mod filters;
pub mod grayscale;
pub mod morphology;
