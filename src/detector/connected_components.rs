//! Connected-component labeling for cleaned foreground masks
//! Breadth-first flood fill with 4-connectivity; labels are assigned in
//! raster order of each component's first pixel.

use crate::models::{BinaryGrid, LabelGrid, PixelGrid, RegionStats};
use std::collections::{BTreeMap, VecDeque};

/// Neighbour offsets in exploration order: up, right, down, left
const NEIGHBOURS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Label map plus per-component statistics, keyed by ascending label id
pub type Labeling = (LabelGrid, BTreeMap<u32, RegionStats>);

/// Running bounding box of a component in 0-indexed coordinates
struct Extent {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Extent {
    fn new(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn into_stats(self, label: u32, pixel_count: usize) -> RegionStats {
        RegionStats {
            label,
            pixel_count,
            width_span: self.max_x - self.min_x,
            height_span: self.max_y - self.min_y,
            min_row: self.min_y + 1,
            min_col: self.min_x + 1,
            max_row: self.max_y + 1,
            max_col: self.max_x + 1,
        }
    }
}

/// Label every 4-connected foreground component of `mask`
///
/// Any non-zero cell is foreground. Returns the label map (0 = background)
/// and one `RegionStats` per component.
pub fn label_regions(mask: &BinaryGrid) -> Labeling {
    let (width, height) = mask.dimensions();
    let mut labels: LabelGrid = PixelGrid::new(width, height);
    let mut visited = vec![false; width * height];
    let mut regions = BTreeMap::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut next_label = 1u32;

    for y in 0..height {
        for x in 0..width {
            if visited[y * width + x] || mask.get(x, y) == 0 {
                continue;
            }

            let label = next_label;
            next_label += 1;

            queue.clear();
            queue.push_back((x, y));
            visited[y * width + x] = true;
            let mut extent = Extent::new(x, y);
            let mut pixel_count = 0usize;

            while let Some((cx, cy)) = queue.pop_front() {
                labels.set(cx, cy, label);
                pixel_count += 1;

                for &(dx, dy) in &NEIGHBOURS {
                    let Some(nx) = cx.checked_add_signed(dx) else {
                        continue;
                    };
                    let Some(ny) = cy.checked_add_signed(dy) else {
                        continue;
                    };
                    if nx >= width || ny >= height {
                        continue;
                    }
                    let idx = ny * width + nx;
                    if visited[idx] || mask.get(nx, ny) == 0 {
                        continue;
                    }
                    visited[idx] = true;
                    extent.include(nx, ny);
                    queue.push_back((nx, ny));
                }
            }

            regions.insert(label, extent.into_stats(label, pixel_count));
        }
    }

    log::debug!(
        "labeling: {}x{} mask has {} components",
        width,
        height,
        regions.len()
    );
    (labels, regions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> BinaryGrid {
        let height = rows.len();
        let width = rows[0].len();
        PixelGrid::from_fn(width, height, |x, y| u8::from(rows[y].as_bytes()[x] == b'#'))
    }

    #[test]
    fn test_two_isolated_points() {
        let mut mask: BinaryGrid = PixelGrid::new(10, 10);
        mask.set(2, 2, 1);
        mask.set(7, 5, 1);

        let (labels, regions) = label_regions(&mask);
        assert_eq!(regions.len(), 2);
        assert!(regions.values().all(|r| r.pixel_count == 1));
        assert_eq!(labels.get(2, 2), 1);
        assert_eq!(labels.get(7, 5), 2);
        assert_eq!(labels.get(0, 0), 0);
    }

    #[test]
    fn test_diagonal_pixels_are_separate() {
        let mask = mask_from_rows(&["#..", ".#.", "..#"]);
        let (_, regions) = label_regions(&mask);
        assert_eq!(regions.len(), 3);
    }

    #[test]
    fn test_region_statistics() {
        let mask = mask_from_rows(&[
            "......", //
            ".###..", //
            ".#....", //
            ".#..##", //
        ]);
        let (labels, regions) = label_regions(&mask);
        assert_eq!(regions.len(), 2);

        let first = regions[&1];
        assert_eq!(first.pixel_count, 5);
        assert_eq!((first.min_row, first.min_col), (2, 2));
        assert_eq!((first.max_row, first.max_col), (4, 4));
        assert_eq!((first.width_span, first.height_span), (2, 2));

        let second = regions[&2];
        assert_eq!(second.pixel_count, 2);
        assert_eq!((second.min_row, second.min_col), (4, 5));
        assert_eq!((second.max_row, second.max_col), (4, 6));
        assert_eq!((second.width_span, second.height_span), (1, 0));

        assert_eq!(labels.get(3, 1), 1);
        assert_eq!(labels.get(5, 3), 2);
    }

    #[test]
    fn test_u_shape_is_one_component() {
        // Raster scan meets the right arm before the arms join
        let mask = mask_from_rows(&["#.#", "#.#", "###"]);
        let (labels, regions) = label_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[&1].pixel_count, 7);
        assert_eq!(labels.get(2, 0), 1);
    }

    #[test]
    fn test_labels_cover_every_foreground_pixel() {
        let mask = mask_from_rows(&["##.#", "#..#", "..##", "#..."]);
        let (labels, regions) = label_regions(&mask);
        let total: usize = regions.values().map(|r| r.pixel_count).sum();
        assert_eq!(total, 8);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(mask.get(x, y) != 0, labels.get(x, y) != 0);
            }
        }
    }

    #[test]
    fn test_empty_mask_has_no_components() {
        let mask: BinaryGrid = PixelGrid::new(10, 10);
        let (labels, regions) = label_regions(&mask);
        assert!(regions.is_empty());
        assert!(labels.as_slice().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let mask = mask_from_rows(&["#.#.", "####", "...#"]);
        assert_eq!(label_regions(&mask), label_regions(&mask));
    }
}
