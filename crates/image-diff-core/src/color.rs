//! Perceptual color distance in YIQ space.
//!
//! Pixels are first composited over a white background by their alpha, so
//! any two fully transparent pixels compare equal regardless of their RGB
//! bytes. The distance is a weighted sum of squared Y/I/Q deltas, with luma
//! weighted about twice as heavily as either chroma axis.
//!
//! Reference: Kotsarenko & Ramos, "Measuring perceived color difference
//! using YIQ NTSC transmission color space in mobile applications" (2010).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::Pixel;
use crate::error::CompareError;

/// Upper bound of the squared YIQ distance between two 8-bit colors.
pub const MAX_YIQ_DELTA: f64 = 35215.0;

const Y_WEIGHT: f64 = 0.5053;
const I_WEIGHT: f64 = 0.299;
const Q_WEIGHT: f64 = 0.1957;

/// An opaque RGB color, written as `r,g,b` on the command line and as
/// `[r, g, b]` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const RED: Self = Self([255, 0, 0]);
    pub const YELLOW: Self = Self([255, 255, 0]);

    pub const fn opaque(self) -> Pixel {
        let [r, g, b] = self.0;
        [r, g, b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r},{g},{b}")
    }
}

impl FromStr for Rgb {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(CompareError::invalid("color", s));
        };
        let channel = |c: &str| c.parse::<u8>().map_err(|_| CompareError::invalid("color", s));
        Ok(Self([channel(*r)?, channel(*g)?, channel(*b)?]))
    }
}

/// Map the user-facing `threshold` in `[0, 1]` to the largest squared
/// distance still treated as identical.
///
/// The distance is quadratic in channel deltas, so the bound is quadratic in
/// `threshold`: 0 accepts only exact matches, 1 accepts everything.
pub fn max_delta(threshold: f64) -> f64 {
    MAX_YIQ_DELTA * threshold * threshold
}

fn blend(c: f64, alpha: f64) -> f64 {
    255.0 + (c - 255.0) * alpha
}

fn composite(px: Pixel) -> (f64, f64, f64) {
    let [r, g, b, a] = px.map(f64::from);
    if px[3] < 255 {
        let a = a / 255.0;
        (blend(r, a), blend(g, a), blend(b, a))
    } else {
        (r, g, b)
    }
}

pub fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.298_895_31 + g * 0.586_622_47 + b * 0.114_482_23
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.595_977_99 - g * 0.274_176_10 - b * 0.321_801_89
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.211_470_17 - g * 0.522_617_11 + b * 0.311_146_94
}

/// Signed perceptual distance from `p1` to `p2`.
///
/// The magnitude is the weighted squared YIQ delta. The sign is negative when
/// `p2` is darker than `p1`, positive otherwise. Identical pixels return
/// exactly `0.0`.
pub fn color_delta(p1: Pixel, p2: Pixel) -> f64 {
    if p1 == p2 {
        return 0.0;
    }

    let (r1, g1, b1) = composite(p1);
    let (r2, g2, b2) = composite(p2);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;
    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = Y_WEIGHT * y * y + I_WEIGHT * i * i + Q_WEIGHT * q * q;
    signed(delta, y1, y2)
}

/// Negative only when the first luma is strictly greater. Equal luma keeps
/// the positive sign in both directions, even if chroma differs.
fn signed(delta: f64, y1: f64, y2: f64) -> f64 {
    if y1 > y2 { -delta } else { delta }
}

/// Gray level used to show unchanged content: the pixel's luma, faded toward
/// white by `alpha` times the pixel's own opacity.
pub fn faded_gray(px: Pixel, alpha: f64) -> u8 {
    let [r, g, b, a] = px.map(f64::from);
    blend(rgb2y(r, g, b), alpha * a / 255.0) as u8
}
