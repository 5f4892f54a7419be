use tracing::debug;

use crate::antialias::is_anti_aliased;
use crate::buffer::{PixelBuffer, TRANSPARENT, put_in_band};
use crate::color::{color_delta, max_delta};
use crate::error::CompareError;
use crate::options::CompareOptions;
use crate::render::{Classification, render};
use crate::result::{CompareResult, Tally};

/// Output of one comparison: the rendered diff and its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub diff_image: PixelBuffer,
    pub result: CompareResult,
}

/// Compare `a` against `b` with a single sequential pass.
pub fn compare(
    a: &PixelBuffer,
    b: &PixelBuffer,
    options: &CompareOptions,
) -> Result<Comparison, CompareError> {
    Comparator::new(options)?.compare(a, b)
}

/// A validated set of options with the threshold bound precomputed.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'o> {
    options: &'o CompareOptions,
    max_delta: f64,
}

impl<'o> Comparator<'o> {
    pub fn new(options: &'o CompareOptions) -> Result<Self, CompareError> {
        options.validate()?;
        Ok(Self {
            options,
            max_delta: max_delta(options.threshold),
        })
    }

    /// Classify the pixel pair at `(x, y)`, returning the verdict and the
    /// signed distance from `a` to `b`.
    pub fn classify(
        &self,
        a: &PixelBuffer,
        b: &PixelBuffer,
        x: u32,
        y: u32,
    ) -> (Classification, f64) {
        let delta = color_delta(a.pixel(x, y), b.pixel(x, y));
        let classification = if delta.abs() <= self.max_delta {
            Classification::Identical
        } else if is_anti_aliased(a, x, y, b) || is_anti_aliased(b, x, y, a) {
            Classification::AntiAliased
        } else {
            Classification::Different
        };
        (classification, delta)
    }

    pub fn compare(&self, a: &PixelBuffer, b: &PixelBuffer) -> Result<Comparison, CompareError> {
        self.compare_parallel(a, b, 1)
    }

    /// Same result as [`Comparator::compare`], computed over `workers`
    /// horizontal bands on scoped threads. Each band writes a disjoint slice
    /// of the output and keeps its own tally; tallies are summed at the end.
    pub fn compare_parallel(
        &self,
        a: &PixelBuffer,
        b: &PixelBuffer,
        workers: usize,
    ) -> Result<Comparison, CompareError> {
        check_inputs(a, b)?;

        let (width, height) = a.dimensions();
        let workers = u32::try_from(workers).unwrap_or(u32::MAX).clamp(1, height);
        let rows_per_band = height.div_ceil(workers);
        let mut diff_image = PixelBuffer::filled(width, height, TRANSPARENT);

        let tally = if workers == 1 {
            diff_image
                .row_bands_mut(height)
                .map(|(first_row, band)| self.fill_band(a, b, first_row, band))
                .fold(Tally::default(), Tally::merge)
        } else {
            std::thread::scope(|s| {
                let handles: Vec<_> = diff_image
                    .row_bands_mut(rows_per_band)
                    .map(|(first_row, band)| s.spawn(move || self.fill_band(a, b, first_row, band)))
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|p| std::panic::resume_unwind(p)))
                    .fold(Tally::default(), Tally::merge)
            })
        };

        let result = tally.finish(a.pixel_count());
        debug!(
            width,
            height,
            workers,
            mismatched = result.mismatched_pixels,
            ratio = result.difference_ratio,
            "comparison finished"
        );
        Ok(Comparison { diff_image, result })
    }

    fn fill_band(&self, a: &PixelBuffer, b: &PixelBuffer, first_row: u32, band: &mut [u8]) -> Tally {
        let width = a.width();
        let rows = (band.len() / (width as usize * 4)) as u32;
        let include_aa = self.options.include_anti_aliasing;
        let mut tally = Tally::default();

        for row in 0..rows {
            let y = first_row + row;
            for x in 0..width {
                let (classification, delta) = self.classify(a, b, x, y);
                let px = render(classification, delta, a.pixel(x, y), self.options);
                put_in_band(band, width, x, row, px);
                tally.record(classification, include_aa);
            }
        }
        tally
    }
}

fn check_inputs(a: &PixelBuffer, b: &PixelBuffer) -> Result<(), CompareError> {
    if a.dimensions() != b.dimensions() {
        return Err(CompareError::DimensionMismatch {
            width_a: a.width(),
            height_a: a.height(),
            width_b: b.width(),
            height_b: b.height(),
        });
    }
    if a.is_empty() {
        return Err(CompareError::EmptyImage {
            width: a.width(),
            height: a.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Pixel;

    const GRAY: Pixel = [200, 200, 200, 255];
    const RED: Pixel = [255, 0, 0, 255];

    /// Flip `n` scattered pixels to red.
    fn with_pixel_diffs(buf: &PixelBuffer, n: u32) -> PixelBuffer {
        let mut out = buf.clone();
        let (w, h) = out.dimensions();
        for i in 0..n {
            let x = ((u64::from(i) * 7919) % u64::from(w)) as u32;
            let y = ((u64::from(i) * 6271) % u64::from(h)) as u32;
            out.put(x, y, RED);
        }
        out
    }

    // -- preconditions --

    #[test]
    fn dimension_mismatch_detected() {
        let a = PixelBuffer::filled(100, 100, GRAY);
        let b = PixelBuffer::filled(100, 120, GRAY);
        let err = compare(&a, &b, &CompareOptions::default()).unwrap_err();
        assert_eq!(
            err,
            CompareError::DimensionMismatch {
                width_a: 100,
                height_a: 100,
                width_b: 100,
                height_b: 120,
            }
        );
    }

    #[test]
    fn empty_image_rejected() {
        let a = PixelBuffer::filled(0, 10, GRAY);
        let err = compare(&a, &a, &CompareOptions::default()).unwrap_err();
        assert_eq!(err, CompareError::EmptyImage { width: 0, height: 10 });
    }

    #[test]
    fn invalid_options_rejected_before_dimensions() {
        let a = PixelBuffer::filled(2, 2, GRAY);
        let b = PixelBuffer::filled(3, 3, GRAY);
        let opts = CompareOptions {
            threshold: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            compare(&a, &b, &opts),
            Err(CompareError::InvalidOption { field: "threshold", .. })
        ));
    }

    // -- classification --

    #[test]
    fn identical_buffers_match() {
        let a = PixelBuffer::filled(50, 50, GRAY);
        let c = compare(&a, &a, &CompareOptions::default()).unwrap();
        assert!(c.result.is_match());
        assert_eq!(c.result.total_pixels, 2500);
        assert_eq!(c.result.difference_ratio, 0.0);
    }

    #[test]
    fn scattered_diffs_detected() {
        let a = PixelBuffer::filled(100, 100, GRAY);
        let b = with_pixel_diffs(&a, 50);
        let c = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert!(c.result.mismatched_pixels > 0);
        let expected = c.result.mismatched_pixels as f64 / c.result.total_pixels as f64;
        assert!((c.result.difference_ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn nudge_below_threshold_is_identical() {
        let a = PixelBuffer::filled(10, 10, [128, 128, 128, 255]);
        let mut b = a.clone();
        b.put(0, 0, [129, 128, 128, 255]);
        let c = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert_eq!(c.result.mismatched_pixels, 0);

        let strict = CompareOptions {
            threshold: 0.0,
            ..Default::default()
        };
        let c = compare(&a, &b, &strict).unwrap();
        assert_eq!(c.result.mismatched_pixels, 1);
    }

    #[test]
    fn threshold_one_accepts_everything() {
        let a = PixelBuffer::filled(4, 4, [0, 0, 0, 255]);
        let b = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
        let opts = CompareOptions {
            threshold: 1.0,
            ..Default::default()
        };
        assert!(compare(&a, &b, &opts).unwrap().result.is_match());
    }

    #[test]
    fn transparent_pixels_with_different_rgb_match() {
        let a = PixelBuffer::filled(3, 3, [10, 20, 30, 0]);
        let b = PixelBuffer::filled(3, 3, [250, 0, 90, 0]);
        let c = compare(&a, &b, &CompareOptions::default()).unwrap();
        assert!(c.result.is_match());
    }

    // -- parallel --

    #[test]
    fn parallel_matches_sequential() {
        let a = PixelBuffer::filled(37, 23, GRAY);
        let b = with_pixel_diffs(&a, 40);
        let opts = CompareOptions::default();
        let comparator = Comparator::new(&opts).unwrap();
        let seq = comparator.compare(&a, &b).unwrap();
        for workers in [0, 2, 3, 7, 23, 64] {
            let par = comparator.compare_parallel(&a, &b, workers).unwrap();
            assert_eq!(par, seq, "workers = {workers}");
        }
    }

    #[test]
    fn parallel_checks_dimensions() {
        let a = PixelBuffer::filled(4, 4, GRAY);
        let b = PixelBuffer::filled(4, 5, GRAY);
        let opts = CompareOptions::default();
        let comparator = Comparator::new(&opts).unwrap();
        assert!(matches!(
            comparator.compare_parallel(&a, &b, 4),
            Err(CompareError::DimensionMismatch { .. })
        ));
    }
}
