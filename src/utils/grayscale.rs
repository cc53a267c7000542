//! Combine RGB channels into a normalised greyscale grid
//! Y = round(0.299*R + 0.587*G + 0.114*B), then Y' = round(Y / max(Y) * 255)
//!
//! Both roundings send exact halves to the even neighbour. The stretch only
//! lifts the brightest pixel to 255; the darkest pixel is not pulled down to 0.

use crate::DetectError;
use crate::models::{GrayGrid, PixelGrid};
use rayon::prelude::*;

const COEF_R: f64 = 0.299;
const COEF_G: f64 = 0.587;
const COEF_B: f64 = 0.114;

/// Split interleaved RGB bytes into separate red, green and blue grids
pub fn split_rgb(
    rgb: &[u8],
    width: usize,
    height: usize,
) -> Result<(GrayGrid, GrayGrid, GrayGrid), DetectError> {
    let pixel_count = width * height;
    if rgb.len() != pixel_count * 3 {
        return Err(DetectError::BufferSize {
            expected: pixel_count * 3,
            actual: rgb.len(),
        });
    }

    let mut red = Vec::with_capacity(pixel_count);
    let mut green = Vec::with_capacity(pixel_count);
    let mut blue = Vec::with_capacity(pixel_count);
    for px in rgb.chunks_exact(3) {
        red.push(px[0]);
        green.push(px[1]);
        blue.push(px[2]);
    }

    Ok((
        PixelGrid::from_vec(width, height, red)?,
        PixelGrid::from_vec(width, height, green)?,
        PixelGrid::from_vec(width, height, blue)?,
    ))
}

/// Fail fast unless all three channels share the red channel's shape
pub fn check_channel_dimensions(
    red: &GrayGrid,
    green: &GrayGrid,
    blue: &GrayGrid,
) -> Result<(), DetectError> {
    for (channel, grid) in [("green", green), ("blue", blue)] {
        if !grid.same_shape(red) {
            return Err(DetectError::DimensionMismatch {
                channel,
                expected: red.dimensions(),
                found: grid.dimensions(),
            });
        }
    }
    if red.is_empty() {
        return Err(DetectError::EmptyImage);
    }
    Ok(())
}

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = COEF_R * r as f64 + COEF_G * g as f64 + COEF_B * b as f64;
    lum.round_ties_even().min(255.0) as u8
}

/// Per-pixel rounded luminance without normalisation
pub fn luminance_grid(red: &GrayGrid, green: &GrayGrid, blue: &GrayGrid) -> GrayGrid {
    let (width, height) = red.dimensions();
    let mut lum: GrayGrid = PixelGrid::new(width, height);

    // Process rows in parallel
    lum.as_mut_slice()
        .par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            let (r, g, b) = (red.row(y), green.row(y), blue.row(y));
            for x in 0..width {
                row[x] = luminance(r[x], g[x], b[x]);
            }
        });

    lum
}

/// Convert three RGB channel grids into a greyscale grid whose maximum is 255
pub fn rgb_to_grayscale(
    red: &GrayGrid,
    green: &GrayGrid,
    blue: &GrayGrid,
) -> Result<GrayGrid, DetectError> {
    check_channel_dimensions(red, green, blue)?;

    let lum = luminance_grid(red, green, blue);
    let max = lum.as_slice().iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Err(DetectError::DegenerateLuminance);
    }

    let scale = 255.0 / max as f64;
    let gray = lum.map(|v| (v as f64 * scale).round_ties_even().min(255.0) as u8);
    log::debug!(
        "grayscale: {}x{} peak luminance {} rescaled to 255",
        gray.width(),
        gray.height(),
        max
    );
    Ok(gray)
}
