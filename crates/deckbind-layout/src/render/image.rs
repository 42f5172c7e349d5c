//! Image XObject creation
//!
//! Decoded page images are embedded as DeviceRGB image XObjects with a
//! Flate-compressed pixel stream.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbImage;
use image::imageops::{self, FilterType};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::types::Result;

/// Resample `pixels` to `size` with a Lanczos filter
pub fn resample(pixels: &RgbImage, size: (u32, u32)) -> RgbImage {
    log::debug!(
        "Resampling {}x{} image to {}x{}",
        pixels.width(),
        pixels.height(),
        size.0,
        size.1
    );
    imageops::resize(pixels, size.0, size.1, FilterType::Lanczos3)
}

/// Add `pixels` to `doc` as an image XObject.
pub fn embed_rgb_image(doc: &mut Document, pixels: &RgbImage) -> Result<ObjectId> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(pixels.as_raw())?;
    let data = encoder.finish()?;

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(pixels.width() as i64)),
        ("Height", Object::Integer(pixels.height() as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);

    // Already compressed; keep the document-level pass from compressing again
    let stream = Stream::new(dict, data).with_compression(false);
    Ok(doc.add_object(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    #[test]
    fn test_embed_round_trips_pixels() {
        let pixels = RgbImage::from_pixel(3, 2, image::Rgb([200, 100, 50]));
        let mut doc = Document::with_version("1.7");
        let id = embed_rgb_image(&mut doc, &pixels).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 3);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 2);

        let mut raw = Vec::new();
        ZlibDecoder::new(stream.content.as_slice())
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw, pixels.into_raw());
    }

    #[test]
    fn test_resample_size() {
        let pixels = RgbImage::new(400, 200);
        let smaller = resample(&pixels, (100, 50));
        assert_eq!(smaller.dimensions(), (100, 50));
    }
}
