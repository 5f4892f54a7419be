//! Row-major RGBA pixel storage.
//!
//! The byte layout matches what PNG codecs hand out: 4 bytes per pixel,
//! rows top to bottom, no padding. All access goes through `(x, y)`
//! coordinates so callers never do index arithmetic themselves.

use crate::error::CompareError;

/// One RGBA quad.
pub type Pixel = [u8; 4];

pub const TRANSPARENT: Pixel = [0, 0, 0, 0];

const CHANNELS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap a decoded RGBA8 byte sequence.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CompareError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(CompareError::BufferLength {
                width,
                height,
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

    /// A buffer where every pixel is `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        let i = self.offset(x, y)?;
        let mut px = TRANSPARENT;
        px.copy_from_slice(&self.data[i..i + CHANNELS]);
        Some(px)
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    /// When the coordinate lies outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        match self.get(x, y) {
            Some(px) => px,
            None => panic!(
                "pixel ({x}, {y}) out of bounds for {}x{} buffer",
                self.width, self.height
            ),
        }
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` when out of bounds.
    pub fn put(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + CHANNELS].copy_from_slice(&pixel);
                true
            }
            None => false,
        }
    }

    /// The up-to-8 in-bounds neighbours of `(x, y)`, row by row.
    pub fn neighbors(&self, x: u32, y: u32) -> Neighbors {
        Neighbors::new(x, y, self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Split the bytes into bands of `rows_per_band` full rows.
    /// Yields `(first_row, band_bytes)`; the last band may be shorter.
    pub(crate) fn row_bands_mut(
        &mut self,
        rows_per_band: u32,
    ) -> impl Iterator<Item = (u32, &mut [u8])> {
        let band_bytes = byte_len(self.width, rows_per_band.max(1)).max(CHANNELS);
        let rows = rows_per_band.max(1);
        self.data
            .chunks_mut(band_bytes)
            .enumerate()
            .map(move |(i, chunk)| (i as u32 * rows, chunk))
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

/// Write one pixel into a band slice produced by `row_bands_mut`.
pub(crate) fn put_in_band(band: &mut [u8], width: u32, x: u32, row_in_band: u32, pixel: Pixel) {
    let i = (row_in_band as usize * width as usize + x as usize) * CHANNELS;
    band[i..i + CHANNELS].copy_from_slice(&pixel);
}

/// Clamped 3x3 window around a centre pixel, centre excluded.
///
/// Corners yield 3 positions, edges 5, interior pixels 8. A 1-pixel-wide
/// image yields only the vertical neighbours, a 1x1 image yields nothing.
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: (u32, u32),
    x0: u32,
    x1: u32,
    y1: u32,
    x: u32,
    y: u32,
}

impl Neighbors {
    fn new(cx: u32, cy: u32, width: u32, height: u32) -> Self {
        let x0 = cx.saturating_sub(1);
        let y0 = cy.saturating_sub(1);
        let x1 = cx.saturating_add(1).min(width.saturating_sub(1));
        let y1 = cy.saturating_add(1).min(height.saturating_sub(1));
        // An empty buffer gets an exhausted window.
        let y = if width == 0 || height == 0 { y1 + 1 } else { y0 };
        Self {
            center: (cx, cy),
            x0,
            x1,
            y1,
            x: x0,
            y,
        }
    }
}

impl Iterator for Neighbors {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while self.y <= self.y1 {
            let pos = (self.x, self.y);
            if self.x < self.x1 {
                self.x += 1;
            } else {
                self.x = self.x0;
                self.y += 1;
            }
            if pos != self.center {
                return Some(pos);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(w: u32, h: u32, x: u32, y: u32) -> usize {
        PixelBuffer::filled(w, h, TRANSPARENT).neighbors(x, y).count()
    }

    // -- construction --

    #[test]
    fn new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            CompareError::BufferLength {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15,
            }
        );
    }

    #[test]
    fn filled_sets_every_pixel() {
        let buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(buf.as_bytes().len(), 24);
        assert!(buf.as_bytes().chunks(4).all(|px| px == [1, 2, 3, 4]));
    }

    // -- accessors --

    #[test]
    fn row_major_layout() {
        let mut buf = PixelBuffer::filled(3, 2, TRANSPARENT);
        assert!(buf.put(2, 1, [9, 9, 9, 9]));
        assert_eq!(&buf.as_bytes()[20..24], &[9, 9, 9, 9]);
        assert_eq!(buf.pixel(2, 1), [9, 9, 9, 9]);
    }

    #[test]
    fn out_of_bounds_access() {
        let mut buf = PixelBuffer::filled(3, 2, TRANSPARENT);
        assert_eq!(buf.get(3, 0), None);
        assert_eq!(buf.get(0, 2), None);
        assert!(!buf.put(3, 0, [1, 1, 1, 1]));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn pixel_panics_out_of_bounds() {
        PixelBuffer::filled(1, 1, TRANSPARENT).pixel(1, 1);
    }

    // -- neighbour window --

    #[test]
    fn interior_has_eight_neighbors() {
        assert_eq!(count(3, 3, 1, 1), 8);
    }

    #[test]
    fn edges_and_corners_are_clipped() {
        assert_eq!(count(3, 3, 0, 0), 3);
        assert_eq!(count(3, 3, 2, 2), 3);
        assert_eq!(count(3, 3, 1, 0), 5);
        assert_eq!(count(3, 3, 0, 1), 5);
    }

    #[test]
    fn degenerate_images() {
        assert_eq!(count(1, 1, 0, 0), 0);
        assert_eq!(count(1, 3, 0, 1), 2);
        assert_eq!(count(4, 1, 0, 0), 1);
        assert_eq!(count(0, 0, 0, 0), 0);
    }

    #[test]
    fn neighbors_exclude_center_and_stay_in_bounds() {
        let buf = PixelBuffer::filled(4, 4, TRANSPARENT);
        let all: Vec<_> = buf.neighbors(3, 0).collect();
        assert_eq!(all, vec![(2, 0), (2, 1), (3, 1)]);
    }

    // -- bands --

    #[test]
    fn row_bands_cover_buffer() {
        let mut buf = PixelBuffer::filled(2, 5, TRANSPARENT);
        let bands: Vec<(u32, usize)> = buf
            .row_bands_mut(2)
            .map(|(row, bytes)| (row, bytes.len()))
            .collect();
        assert_eq!(bands, vec![(0, 16), (2, 16), (4, 8)]);
    }
}
