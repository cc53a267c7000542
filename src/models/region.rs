/// Statistics of one connected component
///
/// Row and column bounds are 1-indexed (flood-fill coordinate + 1).
/// `width_span` / `height_span` are `max - min` without the +1, so a
/// single pixel has spans of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStats {
    /// Component label id (>= 1)
    pub label: u32,
    /// Number of pixels in the component
    pub pixel_count: usize,
    /// `max_col - min_col`
    pub width_span: usize,
    /// `max_row - min_row`
    pub height_span: usize,
    /// Topmost row (1-indexed)
    pub min_row: usize,
    /// Leftmost column (1-indexed)
    pub min_col: usize,
    /// Bottom row (1-indexed)
    pub max_row: usize,
    /// Rightmost column (1-indexed)
    pub max_col: usize,
}

impl RegionStats {
    /// Bounding box of this component
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_row: self.min_row,
            min_col: self.min_col,
            max_row: self.max_row,
            max_col: self.max_col,
        }
    }
}

/// Axis-aligned box around a detected region, 1-indexed and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Topmost row
    pub min_row: usize,
    /// Leftmost column
    pub min_col: usize,
    /// Bottom row
    pub max_row: usize,
    /// Rightmost column
    pub max_col: usize,
}

impl BoundingBox {
    /// Pixel width including both edges
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// Pixel height including both edges
    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Number of pixels covered by the box
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Whether the 0-indexed pixel `(x, y)` lies inside the box
    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (row, col) = (y + 1, x + 1);
        (self.min_row..=self.max_row).contains(&row) && (self.min_col..=self.max_col).contains(&col)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rows {}..={}, cols {}..={} ({}x{})",
            self.min_row,
            self.max_row,
            self.min_col,
            self.max_col,
            self.width(),
            self.height()
        )
    }
}
