//! PNG <-> `PixelBuffer` conversion.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use image_diff_core::PixelBuffer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse PNG file {}: {source}", path.display())]
    Png {
        path: PathBuf,
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read and decode a PNG file into RGBA8.
pub fn load_png(path: &Path) -> Result<PixelBuffer, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DecodeError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DecodeError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    decode_png(&bytes).map_err(|source| DecodeError::Png {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode PNG bytes into RGBA8. Other channel layouts are converted.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, image::ImageError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
    Ok(into_buffer(img))
}

fn into_buffer(img: RgbaImage) -> PixelBuffer {
    let (w, h) = img.dimensions();
    let raw = img.into_raw();
    match PixelBuffer::new(w, h, raw) {
        Ok(buf) => buf,
        // RgbaImage guarantees w * h * 4 bytes.
        Err(e) => unreachable!("{e}"),
    }
}

pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut std::io::Cursor::new(&mut out),
        buf.as_bytes(),
        buf.width(),
        buf.height(),
        image::ExtendedColorType::Rgba8,
        ImageFormat::Png,
    )?;
    Ok(out)
}

/// Encode `buf` and write it to `path`, creating parent directories.
pub fn save_png(buf: &PixelBuffer, path: &Path) -> Result<(), EncodeError> {
    let png = encode_png(buf)?;
    write_file(path, &png)
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EncodeError> {
    let write_err = |source| EncodeError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, bytes).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid_png(w: u32, h: u32, color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, color);
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_rgba_png() {
        let buf = decode_png(&solid_png(3, 2, Rgba([10, 20, 30, 40]))).unwrap();
        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.pixel(2, 1), [10, 20, 30, 40]);
    }

    #[test]
    fn converts_rgb_to_opaque_rgba() {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        let buf = decode_png(&png).unwrap();
        assert_eq!(buf.pixel(1, 1), [1, 2, 3, 255]);
    }

    #[test]
    fn encoded_png_preserves_pixels() {
        let mut buf = PixelBuffer::filled(4, 4, [0, 0, 0, 0]);
        buf.put(1, 2, [200, 100, 50, 255]);
        let decoded = decode_png(&encode_png(&buf).unwrap()).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn rejects_non_png() {
        assert!(decode_png(b"GIF89a not a png").is_err());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_png(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, DecodeError::NotFound { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn corrupt_file_is_png_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\ngarbage").unwrap();
        assert!(matches!(load_png(&path), Err(DecodeError::Png { .. })));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/diff.png");
        save_png(&PixelBuffer::filled(2, 2, [1, 2, 3, 255]), &path).unwrap();
        assert_eq!(load_png(&path).unwrap().pixel(0, 0), [1, 2, 3, 255]);
    }
}
