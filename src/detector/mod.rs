//! Barcode region detection modules
//!
//! This module turns a cleaned foreground mask into a single region:
//! - Connected-component labeling (flood fill, 4-connectivity)
//! - Region selection (largest share of foreground pixels)

/// Flood-fill labeling with per-component statistics
pub mod connected_components;
/// Dominant-region selection
pub mod selector;
