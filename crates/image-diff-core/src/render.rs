use crate::buffer::{Pixel, TRANSPARENT};
use crate::color::faded_gray;
use crate::options::CompareOptions;

/// Per-pixel verdict of one comparison pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Identical,
    AntiAliased,
    Different,
}

impl Classification {
    /// Whether this pixel counts toward `mismatched_pixels`.
    pub fn is_mismatch(self, include_anti_aliasing: bool) -> bool {
        match self {
            Self::Identical => false,
            Self::AntiAliased => include_anti_aliasing,
            Self::Different => true,
        }
    }
}

/// Output pixel for one classified position.
///
/// `delta` is the signed distance from the first image's pixel to the
/// second's; negative means the second image is darker here.
pub fn render(
    classification: Classification,
    delta: f64,
    pixel_a: Pixel,
    options: &CompareOptions,
) -> Pixel {
    match classification {
        Classification::Different => match options.diff_color_alt {
            Some(alt) if delta < 0.0 => alt.opaque(),
            _ => options.diff_color.opaque(),
        },
        Classification::AntiAliased if options.include_anti_aliasing => {
            options.anti_alias_color.opaque()
        }
        Classification::AntiAliased | Classification::Identical => context(pixel_a, options),
    }
}

fn context(pixel_a: Pixel, options: &CompareOptions) -> Pixel {
    if options.diff_mask_only {
        return TRANSPARENT;
    }
    let v = faded_gray(pixel_a, options.output_alpha);
    [v, v, v, 255]
}
