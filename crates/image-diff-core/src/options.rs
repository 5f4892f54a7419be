use crate::color::Rgb;
use crate::error::CompareError;

/// Tunables for one comparison. Passed by reference and never mutated
/// during a pass, so concurrent comparisons with different settings are
/// independent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// Matching threshold in `[0, 1]`; smaller is more sensitive.
    pub threshold: f64,
    /// Count anti-aliased pixels as mismatches and paint them with
    /// `anti_alias_color`.
    pub include_anti_aliasing: bool,
    /// Opacity of the grayscale context drawn for unchanged pixels, `[0, 1]`.
    pub output_alpha: f64,
    pub anti_alias_color: Rgb,
    pub diff_color: Rgb,
    /// Used instead of `diff_color` where the second image is darker.
    pub diff_color_alt: Option<Rgb>,
    /// Leave unchanged pixels fully transparent instead of drawing context.
    pub diff_mask_only: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_anti_aliasing: false,
            output_alpha: 1.0,
            anti_alias_color: Rgb::YELLOW,
            diff_color: Rgb::RED,
            diff_color_alt: None,
            diff_mask_only: false,
        }
    }
}

impl CompareOptions {
    pub fn validate(&self) -> Result<(), CompareError> {
        validate_fraction("threshold", self.threshold)?;
        validate_fraction("output_alpha", self.output_alpha)?;
        Ok(())
    }
}

/// Accepts finite values in `[0, 1]`.
pub fn validate_fraction(field: &'static str, v: f64) -> Result<f64, CompareError> {
    if !(0.0..=1.0).contains(&v) {
        return Err(CompareError::invalid(field, v));
    }
    Ok(v)
}
