//! Binary erosion and dilation with a full 3x3 structuring element
//!
//! Both operators read a private zero-padded copy of their input and
//! return a fresh {0, 1} grid with the input's dimensions.

use crate::models::{BinaryGrid, PixelGrid};

const NEIGHBOURHOOD: [(usize, usize); 9] = [
    (0, 0),
    (1, 0),
    (2, 0),
    (0, 1),
    (1, 1),
    (2, 1),
    (0, 2),
    (1, 2),
    (2, 2),
];

/// Erode a mask once
///
/// A foreground pixel survives only if all nine cells of its 3x3
/// neighbourhood hold the same value as it does. Cells outside the grid
/// count as 0, so foreground touching the border is always removed.
pub fn erode(mask: &BinaryGrid) -> BinaryGrid {
    let (width, height) = mask.dimensions();
    let mut out: BinaryGrid = PixelGrid::new(width, height);
    if mask.is_empty() {
        return out;
    }

    let padded = mask.padded_constant(0);
    for y in 0..height {
        for x in 0..width {
            let centre = mask.get(x, y);
            if centre == 0 {
                continue;
            }
            // (x, y) in the mask is (x + 1, y + 1) in the padded copy, so the
            // window's top-left corner sits at (x, y)
            let intact = NEIGHBOURHOOD
                .iter()
                .all(|&(dx, dy)| padded.get(x + dx, y + dy) == centre);
            if intact {
                out.set(x, y, 1);
            }
        }
    }

    out
}

/// Dilate a mask once
///
/// Every foreground pixel marks its whole 3x3 neighbourhood as foreground.
pub fn dilate(mask: &BinaryGrid) -> BinaryGrid {
    let (width, height) = mask.dimensions();
    if mask.is_empty() {
        return PixelGrid::new(width, height);
    }

    // Writes may land on the border, which is dropped afterwards
    let mut padded: BinaryGrid = PixelGrid::new(width + 2, height + 2);
    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) == 0 {
                continue;
            }
            for &(dx, dy) in &NEIGHBOURHOOD {
                padded.set(x + dx, y + dy, 1);
            }
        }
    }

    padded.unpadded()
}

/// Erode `passes` times, each pass consuming the previous result
pub fn erode_n(mask: &BinaryGrid, passes: usize) -> BinaryGrid {
    let mut out = mask.clone();
    for _ in 0..passes {
        out = erode(&out);
    }
    out
}

/// Dilate `passes` times, each pass consuming the previous result
pub fn dilate_n(mask: &BinaryGrid, passes: usize) -> BinaryGrid {
    let mut out = mask.clone();
    for _ in 0..passes {
        out = dilate(&out);
    }
    out
}

/// Number of non-zero cells
pub fn count_foreground(mask: &BinaryGrid) -> usize {
    mask.as_slice().iter().filter(|&&v| v != 0).count()
}
