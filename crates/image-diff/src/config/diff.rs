use image_diff_core::{CompareError, CompareOptions, Rgb, validate_fraction};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Comparison knobs.
///
/// Every field is `Option`: `None` means "not set at this layer".
/// Serves both TOML deserialization (`[diff]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, PartialEq, clap::Args, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffConfig {
    /// Matching threshold (0-1, less is more sensitive) [default: 0.1]
    #[arg(long, short = 't')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Count anti-aliased pixels as differences
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_aa: Option<bool>,

    /// Opacity of unchanged pixels in the diff image (0-1) [default: 1]
    #[arg(long, short = 'a')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,

    /// Color of anti-aliased pixels [default: 255,255,0]
    #[arg(long, value_name = "R,G,B")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aa_color: Option<Rgb>,

    /// Color of different pixels [default: 255,0,0]
    #[arg(long, value_name = "R,G,B")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_color: Option<Rgb>,

    /// Color of pixels that got darker in the second image
    #[arg(long, value_name = "R,G,B")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_color_alt: Option<Rgb>,

    /// Draw the diff over a transparent background
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_mask: Option<bool>,
}

impl DiffConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &DiffConfig) {
        if other.threshold.is_some() {
            self.threshold = other.threshold;
        }
        if other.include_aa.is_some() {
            self.include_aa = other.include_aa;
        }
        if other.alpha.is_some() {
            self.alpha = other.alpha;
        }
        if other.aa_color.is_some() {
            self.aa_color = other.aa_color;
        }
        if other.diff_color.is_some() {
            self.diff_color = other.diff_color;
        }
        if other.diff_color_alt.is_some() {
            self.diff_color_alt = other.diff_color_alt;
        }
        if other.diff_mask.is_some() {
            self.diff_mask = other.diff_mask;
        }
    }

    /// Fill unset fields with defaults. Fractions are clamped to `[0, 1]`.
    pub fn to_options(&self) -> Result<CompareOptions, CompareError> {
        let defaults = CompareOptions::default();
        Ok(CompareOptions {
            threshold: clamp_fraction("threshold", self.threshold.unwrap_or(defaults.threshold))?,
            include_anti_aliasing: self.include_aa.unwrap_or(defaults.include_anti_aliasing),
            output_alpha: clamp_fraction("alpha", self.alpha.unwrap_or(defaults.output_alpha))?,
            anti_alias_color: self.aa_color.unwrap_or(defaults.anti_alias_color),
            diff_color: self.diff_color.unwrap_or(defaults.diff_color),
            diff_color_alt: self.diff_color_alt.or(defaults.diff_color_alt),
            diff_mask_only: self.diff_mask.unwrap_or(defaults.diff_mask_only),
        })
    }
}

fn clamp_fraction(field: &'static str, v: f64) -> Result<f64, CompareError> {
    let clamped = v.clamp(0.0, 1.0);
    if !v.is_nan() && clamped != v {
        warn!(field, value = v, clamped, "option out of range, clamping");
    }
    // NaN survives the clamp and is rejected here.
    validate_fraction(field, clamped)
}
