use std::path::{Path, PathBuf};

/// Errors from reading or decoding a texture file.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read texture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("pixel data is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Which image row comes first in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// First row is the top of the image (how decoders produce it).
    TopDown,
    /// First row is the bottom of the image (what texture upload expects).
    BottomUp,
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    order: RowOrder,
}

impl TextureImage {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap top-down RGBA8 data.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            order: RowOrder::TopDown,
        })
    }

    /// 1x1 image of the given colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
            order: RowOrder::BottomUp,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row_order(&self) -> RowOrder {
        self.order
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// Row `y` counted in memory order.
    pub fn row(&self, y: u32) -> &[u8] {
        let len = self.row_bytes();
        let start = y as usize * len;
        &self.pixels[start..start + len]
    }

    /// Reverse the row order in place.
    pub fn flip_rows(&mut self) {
        let len = self.row_bytes();
        let height = self.height as usize;
        for y in 0..height / 2 {
            let (upper, lower) = self.pixels.split_at_mut((height - 1 - y) * len);
            upper[y * len..(y + 1) * len].swap_with_slice(&mut lower[..len]);
        }
        self.order = match self.order {
            RowOrder::TopDown => RowOrder::BottomUp,
            RowOrder::BottomUp => RowOrder::TopDown,
        };
    }

    /// Rows reordered so the first row is the bottom of the image.
    pub fn into_bottom_up(mut self) -> Self {
        if self.order == RowOrder::TopDown {
            self.flip_rows();
        }
        self
    }
}

/// Decode an image file into top-down RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, TextureError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image::load_from_memory(&bytes)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(path = %path.display(), width, height, "decoded texture");
    TextureImage::from_rgba(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x3 image whose rows are filled with 1, 2 and 3.
    fn striped() -> TextureImage {
        let mut pixels = Vec::new();
        for row in 1..=3u8 {
            pixels.extend(std::iter::repeat_n(row, 8));
        }
        TextureImage::from_rgba(2, 3, pixels).unwrap()
    }

    #[test]
    fn flip_reverses_rows() {
        let mut img = striped();
        img.flip_rows();
        assert_eq!(img.row(0), &[3; 8]);
        assert_eq!(img.row(1), &[2; 8]);
        assert_eq!(img.row(2), &[1; 8]);
        assert_eq!(img.row_order(), RowOrder::BottomUp);
    }

    #[test]
    fn flip_twice_restores() {
        let original = striped();
        let mut img = original.clone();
        img.flip_rows();
        img.flip_rows();
        assert_eq!(img, original);
    }

    #[test]
    fn into_bottom_up_flips_once() {
        let img = striped().into_bottom_up().into_bottom_up();
        assert_eq!(img.row(0), &[3; 8]);
    }

    #[test]
    fn even_height_flip() {
        let mut img = TextureImage::from_rgba(1, 2, vec![1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        img.flip_rows();
        assert_eq!(img.pixels(), &[2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn size_mismatch_rejected() {
        let err = TextureImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { expected: 16, actual: 15, .. }));
    }

    #[test]
    fn loads_png_top_down() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_rows.png");
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let loaded = load_texture(&path).unwrap();
        assert_eq!(loaded.row_order(), RowOrder::TopDown);
        assert_eq!(&loaded.row(0)[..4], &[255, 0, 0, 255]);

        let uploaded = loaded.into_bottom_up();
        assert_eq!(&uploaded.row(0)[..4], &[0, 0, 255, 255]);
        assert_eq!(&uploaded.row(1)[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_texture("no/such/texture.png").unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_texture(&path).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }
}
