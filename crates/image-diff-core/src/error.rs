use thiserror::Error;

/// Caller input problems. Every variant is raised before any pixel is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompareError {
    #[error("image dimensions don't match: {width_a}x{height_a} vs {width_b}x{height_b}")]
    DimensionMismatch {
        width_a: u32,
        height_a: u32,
        width_b: u32,
        height_b: u32,
    },

    #[error("invalid value for {field}: {value}")]
    InvalidOption { field: &'static str, value: String },

    #[error("image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// The raw byte sequence does not hold exactly `width * height` RGBA quads.
    #[error("buffer for {width}x{height} image must be {expected} bytes, got {actual}")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl CompareError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidOption {
            field,
            value: value.to_string(),
        }
    }
}
