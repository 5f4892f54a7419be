//! Perceptual per-pixel comparison of two equal-sized RGBA images.
//!
//! Every pixel pair is classified as identical, an anti-aliasing artifact,
//! or a real difference. The comparison renders a diff image where
//! differences are painted in a highlight color over a faded grayscale copy
//! of the first image, and counts mismatched pixels.
//!
//! ```
//! use image_diff_core::{CompareOptions, PixelBuffer, compare};
//!
//! let a = PixelBuffer::filled(100, 100, [255, 0, 0, 255]);
//! let mut b = a.clone();
//! for y in 40..60 {
//!     for x in 40..60 {
//!         b.put(x, y, [0, 0, 255, 255]);
//!     }
//! }
//!
//! let c = compare(&a, &b, &CompareOptions::default()).unwrap();
//! assert_eq!(c.result.mismatched_pixels, 400);
//! assert_eq!(c.result.difference_ratio, 0.04);
//! ```
//!
//! Decoding and encoding image files is left to the caller; buffers are raw
//! row-major RGBA8 bytes.

pub mod antialias;
pub mod buffer;
pub mod color;
mod compare;
mod error;
mod options;
pub mod render;
mod result;

pub use self::buffer::{Pixel, PixelBuffer};
pub use self::color::Rgb;
pub use self::compare::{Comparator, Comparison, compare};
pub use self::error::CompareError;
pub use self::options::{CompareOptions, validate_fraction};
pub use self::render::Classification;
pub use self::result::CompareResult;
