//! Anti-aliasing detection.
//!
//! A pixel is considered an anti-aliasing artifact when it sits on a
//! gradient between a darker and a brighter neighbour, and at least one of
//! those bracketing neighbours is unchanged in the other image. Real content
//! changes either sit in a flat region (many identical neighbours) or
//! introduce colors not bracketed by what the other image already has.

use crate::buffer::PixelBuffer;
use crate::color::color_delta;

/// More exact-match neighbours than this means a flat fill, not an edge.
const MAX_FLAT_NEIGHBORS: u32 = 2;

/// Whether the pixel at `(x, y)` in `buffer` looks like an anti-aliased edge
/// pixel relative to `other`. Both buffers must share dimensions and
/// `(x, y)` must be in bounds.
pub fn is_anti_aliased(buffer: &PixelBuffer, x: u32, y: u32, other: &PixelBuffer) -> bool {
    let center = buffer.pixel(x, y);

    let mut zeroes = 0;
    let mut min = 0.0;
    let mut max = 0.0;
    let mut darkest = None;
    let mut brightest = None;

    for (nx, ny) in buffer.neighbors(x, y) {
        let delta = color_delta(center, buffer.pixel(nx, ny));
        if delta == 0.0 {
            zeroes += 1;
            if zeroes > MAX_FLAT_NEIGHBORS {
                return false;
            }
        } else if delta < min {
            min = delta;
            darkest = Some((nx, ny));
        } else if delta > max {
            max = delta;
            brightest = Some((nx, ny));
        }
    }

    let (Some(darkest), Some(brightest)) = (darkest, brightest) else {
        return false;
    };

    [darkest, brightest]
        .into_iter()
        .any(|(nx, ny)| other.get(nx, ny) == Some(buffer.pixel(nx, ny)))
}
