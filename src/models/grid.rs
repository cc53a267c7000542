use crate::DetectError;

/// Row-major 2D pixel buffer with a fixed width and height
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// 8-bit intensity grid (greyscale, thresholded output)
pub type GrayGrid = PixelGrid<u8>;
/// Floating point intensity grid (filter output)
pub type FloatGrid = PixelGrid<f64>;
/// Binary mask holding 0 (background) or 1 (foreground)
pub type BinaryGrid = PixelGrid<u8>;
/// Connected-component label map, 0 = background
pub type LabelGrid = PixelGrid<u32>;

impl<T: Copy> PixelGrid<T> {
    /// Create a grid filled with `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer
    ///
    /// Fails when `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, DetectError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(DetectError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Get grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at column `x`, row `y`
    ///
    /// Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Set the value at column `x`, row `y`
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// Borrow one row
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Iterate over rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics, and a zero-width grid has no rows to yield anyway
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Raw row-major data
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw row-major data
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the grid and return its buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every cell, producing a new grid of the same shape
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> PixelGrid<U> {
        PixelGrid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Copy into a `(width + 2) x (height + 2)` buffer whose border repeats
    /// the nearest edge pixel
    ///
    /// Panics on an empty grid, which has no edge to replicate.
    pub fn padded_replicate(&self) -> PixelGrid<T> {
        assert!(!self.is_empty(), "cannot replicate the edge of an empty grid");
        let pw = self.width + 2;
        let ph = self.height + 2;
        PixelGrid::from_fn(pw, ph, |x, y| {
            let sx = x.saturating_sub(1).min(self.width - 1);
            let sy = y.saturating_sub(1).min(self.height - 1);
            self.get(sx, sy)
        })
    }

    /// Copy into a `(width + 2) x (height + 2)` buffer with a constant border
    pub fn padded_constant(&self, border: T) -> PixelGrid<T> {
        let pw = self.width + 2;
        let mut out = PixelGrid::filled(pw, self.height + 2, border);
        for (y, row) in self.rows().enumerate() {
            let start = (y + 1) * pw + 1;
            out.data[start..start + self.width].copy_from_slice(row);
        }
        out
    }

    /// Drop a one-pixel border, the inverse of the `padded_*` copies
    pub fn unpadded(&self) -> PixelGrid<T> {
        let w = self.width.saturating_sub(2);
        let h = self.height.saturating_sub(2);
        PixelGrid::from_fn(w, h, |x, y| self.get(x + 1, y + 1))
    }

    /// True when both grids share width and height
    pub fn same_shape<U>(&self, other: &PixelGrid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Copy + Default> PixelGrid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}
