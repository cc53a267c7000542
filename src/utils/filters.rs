//! Neighbourhood filters applied before thresholding
//!
//! - Local standard deviation over a 5x5 window (highlights dense bar edges)
//! - 3x3 binomial blur with edge replication
//!
//! Both process output rows in parallel; every row only reads the input.

use crate::models::{FloatGrid, GrayGrid, PixelGrid};
use rayon::prelude::*;

/// Half-width of the std-dev window
const STD_DEV_RADIUS: usize = 2;
/// Samples per std-dev window
const STD_DEV_SAMPLES: u64 = 25;

/// 3x3 blur kernel, normalised by `GAUSSIAN_NORM`
const GAUSSIAN_KERNEL: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
const GAUSSIAN_NORM: f64 = 16.0;

/// Population standard deviation of every 5x5 neighbourhood
///
/// Pixels closer than 2 to any border are left at 0. Sums are kept in
/// integers so a constant window yields exactly 0.
pub fn std_dev_filter(gray: &GrayGrid) -> FloatGrid {
    let (width, height) = gray.dimensions();
    let mut out: FloatGrid = PixelGrid::new(width, height);
    if width < 2 * STD_DEV_RADIUS + 1 || height < 2 * STD_DEV_RADIUS + 1 {
        return out;
    }

    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .skip(STD_DEV_RADIUS)
        .take(height - 2 * STD_DEV_RADIUS)
        .for_each(|(y, row)| {
            // Vertical sums of the 5 rows centred on y, per column
            let mut col_sum = vec![0u64; width];
            let mut col_sq = vec![0u64; width];
            for src in (y - STD_DEV_RADIUS)..=(y + STD_DEV_RADIUS) {
                for (x, &v) in gray.row(src).iter().enumerate() {
                    let v = v as u64;
                    col_sum[x] += v;
                    col_sq[x] += v * v;
                }
            }

            // Slide a 5-column window across the column sums
            let mut sum: u64 = col_sum[..5].iter().sum();
            let mut sq: u64 = col_sq[..5].iter().sum();
            for x in STD_DEV_RADIUS..(width - STD_DEV_RADIUS) {
                if x > STD_DEV_RADIUS {
                    sum = sum + col_sum[x + STD_DEV_RADIUS] - col_sum[x - STD_DEV_RADIUS - 1];
                    sq = sq + col_sq[x + STD_DEV_RADIUS] - col_sq[x - STD_DEV_RADIUS - 1];
                }
                // 625 * variance = 25 * sum(v^2) - sum(v)^2, never negative
                let scaled_var = STD_DEV_SAMPLES * sq - sum * sum;
                row[x] = (scaled_var as f64 / (STD_DEV_SAMPLES * STD_DEV_SAMPLES) as f64).sqrt();
            }
        });

    log::debug!(
        "std-dev filter: {}x{} peak deviation {:.2}",
        width,
        height,
        max_value(&out)
    );
    out
}

/// One pass of the 3x3 binomial blur
///
/// The input is read through a private edge-replicated copy; the output
/// has the input's shape.
pub fn gaussian_smooth<T>(grid: &PixelGrid<T>) -> FloatGrid
where
    T: Copy + Into<f64> + Send + Sync,
{
    let (width, height) = grid.dimensions();
    let mut out: FloatGrid = PixelGrid::new(width, height);
    if grid.is_empty() {
        return out;
    }

    let padded = grid.padded_replicate();
    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            // Output row y is centred on padded row y + 1
            let rows = [padded.row(y), padded.row(y + 1), padded.row(y + 2)];
            for (x, dst) in row.iter_mut().enumerate() {
                let mut acc = 0.0f64;
                for (k, src) in rows.iter().enumerate() {
                    for (j, &weight) in GAUSSIAN_KERNEL[k].iter().enumerate() {
                        let v: f64 = src[x + j].into();
                        acc += v * weight;
                    }
                }
                *dst = acc / GAUSSIAN_NORM;
            }
        });

    out
}

/// Blur `passes` times; zero passes converts the input to floats unchanged
pub fn gaussian_smooth_n<T>(grid: &PixelGrid<T>, passes: usize) -> FloatGrid
where
    T: Copy + Into<f64> + Send + Sync,
{
    let mut out: FloatGrid = grid.map(|v| v.into());
    for _ in 0..passes {
        out = gaussian_smooth(&out);
    }
    out
}

/// Largest value in a float grid, 0 for an empty grid
pub fn max_value(grid: &FloatGrid) -> f64 {
    grid.as_slice().iter().copied().fold(0.0f64, f64::max)
}
