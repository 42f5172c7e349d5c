//! Page images supplied by the rendering collaborator

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage, Rgba};

use crate::types::DecodeError;

/// Where the pixels of a page image live
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk (PNG, JPEG, ...)
    Path(PathBuf),
    /// An encoded image held in memory
    Encoded(Vec<u8>),
    /// Already decoded pixels
    Decoded(DynamicImage),
}

/// One rasterized source page
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-based position within the parent input
    pub ordinal: usize,
    pub source: ImageSource,
    /// Delete the backing file once the page has been laid out
    pub temporary: bool,
}

impl PageImage {
    pub fn from_path(ordinal: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            ordinal,
            source: ImageSource::Path(path.into()),
            temporary: false,
        }
    }

    pub fn from_image(ordinal: usize, image: DynamicImage) -> Self {
        Self {
            ordinal,
            source: ImageSource::Decoded(image),
            temporary: false,
        }
    }

    /// Mark the backing file for deletion after layout
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Backing file, if the image lives on disk
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ImageSource::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Decode the page into opaque RGB pixels.
    ///
    /// Transparent areas are composited onto white.
    pub fn decode(&self) -> Result<RgbImage, DecodeError> {
        let ordinal = self.ordinal;
        let image = match &self.source {
            ImageSource::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| DecodeError::Unreadable {
                    ordinal,
                    path: path.clone(),
                    source,
                })?;
                image::load_from_memory(&bytes)
                    .map_err(|source| DecodeError::Image { ordinal, source })?
            }
            ImageSource::Encoded(bytes) => image::load_from_memory(bytes)
                .map_err(|source| DecodeError::Image { ordinal, source })?,
            ImageSource::Decoded(image) => image.clone(),
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(DecodeError::Empty {
                ordinal,
                width: image.width(),
                height: image.height(),
            });
        }

        Ok(flatten_onto_white(&image))
    }
}

/// Composite an image over a white background
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_flatten_transparent_is_white() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_flatten_opaque_is_unchanged() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 255]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_decode_encoded_png() {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(16, 9))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let page = PageImage {
            ordinal: 1,
            source: ImageSource::Encoded(bytes),
            temporary: false,
        };
        let pixels = page.decode().unwrap();
        assert_eq!(pixels.dimensions(), (16, 9));
    }

    #[test]
    fn test_decode_missing_file() {
        let page = PageImage::from_path(3, "/nonexistent/slide3.png");
        match page.decode() {
            Err(DecodeError::Unreadable { ordinal, .. }) => assert_eq!(ordinal, 3),
            other => panic!("Expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let page = PageImage {
            ordinal: 2,
            source: ImageSource::Encoded(b"not an image".to_vec()),
            temporary: false,
        };
        assert!(matches!(page.decode(), Err(DecodeError::Image { ordinal: 2, .. })));
    }

    #[test]
    fn test_decode_zero_size() {
        let page = PageImage::from_image(4, DynamicImage::ImageRgb8(RgbImage::new(0, 10)));
        assert!(matches!(page.decode(), Err(DecodeError::Empty { ordinal: 4, .. })));
    }
}
