use crate::models::{BinaryGrid, GrayGrid, PixelGrid};

/// Value written for pixels at or above the threshold
pub const FOREGROUND: u8 = 255;
/// Value written for pixels below the threshold
pub const BACKGROUND: u8 = 0;

/// Fixed global threshold
/// Returns a grid holding only 0 and 255; `value >= threshold` is foreground,
/// so a value exactly at the threshold maps to 255.
pub fn threshold_binarize<T>(grid: &PixelGrid<T>, threshold: f64) -> GrayGrid
where
    T: Copy + Into<f64>,
{
    grid.map(|v| {
        let v: f64 = v.into();
        if v >= threshold {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

/// Collapse any non-zero value to 1, giving the {0, 1} mask morphology expects
pub fn to_binary_mask(grid: &GrayGrid) -> BinaryGrid {
    grid.map(|v| u8::from(v != 0))
}

/// Scale a {0, 1} mask back to {0, 255} for display or export
pub fn mask_to_gray(mask: &BinaryGrid) -> GrayGrid {
    mask.map(|v| if v != 0 { FOREGROUND } else { BACKGROUND })
}
