/// Errors surfaced by barcode localisation
///
/// Every variant is terminal for the image being processed.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// A colour channel differs in size from the red channel.
    #[error("{channel} channel is {found:?} but red channel is {expected:?}")]
    DimensionMismatch {
        /// Name of the offending channel
        channel: &'static str,
        /// `(width, height)` of the red channel
        expected: (usize, usize),
        /// `(width, height)` of the offending channel
        found: (usize, usize),
    },

    /// A pixel buffer does not hold exactly the expected number of values.
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize {
        /// Required element count
        expected: usize,
        /// Provided element count
        actual: usize,
    },

    /// Width or height is zero.
    #[error("input image has no pixels")]
    EmptyImage,

    /// Every pixel has zero luminance, so normalisation is undefined.
    #[error("image is entirely black; luminance cannot be normalised")]
    DegenerateLuminance,

    /// No foreground component survived cleanup.
    #[error("no barcode region found")]
    NoRegionFound,

    /// Pipeline parameters are out of range.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// Failed to decode or encode an image file.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure while reading inputs or writing outputs.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration file.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}
