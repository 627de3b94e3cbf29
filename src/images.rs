//! Photo preparation for the appendix: decode, downscale, re-encode.
//!
//! Every attached photo is normalized to a bounded JPEG before embedding,
//! so a report with a dozen phone photos stays a few hundred kilobytes.
//! Appendix slots are at most ~475pt wide, so the cap loses nothing visible.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::error::Error;
use crate::model::Photo;

/// Bounds applied to every photo before embedding.
#[derive(Clone, Copy, Debug)]
pub struct CompressionConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig {
            max_width: 800,
            max_height: 600,
            quality: 80,
        }
    }
}

/// A photo ready for embedding: output bytes plus pixel dimensions
/// (pre-rotation) for the layout pass. `recompressed` marks bytes produced
/// by our encoder, always baseline JPEG; fallback bytes keep their source
/// format.
#[derive(Clone, Debug)]
pub struct PreparedPhoto {
    pub id: String,
    pub caption: String,
    pub rotation: crate::model::Rotation,
    pub data: Vec<u8>,
    pub recompressed: bool,
    pub px_w: u32,
    pub px_h: u32,
}

/// Decode, downscale to the config bounds (never upscale) and re-encode one
/// photo as JPEG. A failed re-encode falls back to the source bytes at their
/// original dimensions; only a failed decode is an error.
pub fn prepare(photo: &Photo, config: &CompressionConfig) -> Result<PreparedPhoto, Error> {
    let img = image::load_from_memory(&photo.bytes)
        .map_err(|e| Error::Image(format!("photo {}: {e}", photo.id)))?;
    let (w, h) = img.dimensions();

    let scale = (config.max_width as f32 / w as f32)
        .min(config.max_height as f32 / h as f32)
        .min(1.0);
    let img = if scale < 1.0 {
        let nw = ((w as f32 * scale).round() as u32).max(1);
        let nh = ((h as f32 * scale).round() as u32).max(1);
        img.resize_exact(nw, nh, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha; flatten before encoding
    let rgb = img.to_rgb8();
    let (px_w, px_h) = rgb.dimensions();
    let mut jpeg = Vec::new();
    match JpegEncoder::new_with_quality(&mut jpeg, config.quality).encode_image(&rgb) {
        Ok(()) => Ok(PreparedPhoto {
            id: photo.id.clone(),
            caption: photo.caption.clone(),
            rotation: photo.rotation,
            data: jpeg,
            recompressed: true,
            px_w,
            px_h,
        }),
        Err(e) => {
            log::warn!("Photo {}: re-encode failed ({e}), embedding source bytes", photo.id);
            Ok(PreparedPhoto {
                id: photo.id.clone(),
                caption: photo.caption.clone(),
                rotation: photo.rotation,
                data: photo.bytes.clone(),
                recompressed: false,
                px_w: w,
                px_h: h,
            })
        }
    }
}

/// Prepare all photos in record order, one slot per input photo. A photo
/// that fails to decode keeps its slot as `None` so figure numbers stay
/// aligned with the record's photo list; the appendix leaves that slot
/// empty.
pub fn prepare_photos(photos: &[Photo], config: &CompressionConfig) -> Vec<Option<PreparedPhoto>> {
    photos
        .iter()
        .map(|photo| match prepare(photo, config) {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("Leaving photo slot {} empty: {e}", photo.id);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn test_photo(id: &str, w: u32, h: u32) -> Photo {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        }));
        let mut png = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .unwrap();
        Photo::new(id, png)
    }

    #[test]
    fn large_photo_is_bounded() {
        let photo = test_photo("big", 1600, 1200);
        let prepared = prepare(&photo, &CompressionConfig::default()).unwrap();
        assert!(prepared.px_w <= 800);
        assert!(prepared.px_h <= 600);
        // aspect ratio preserved
        let ratio = prepared.px_w as f32 / prepared.px_h as f32;
        assert!((ratio - 4.0 / 3.0).abs() < 0.02);
    }

    #[test]
    fn small_photo_is_never_upscaled() {
        let photo = test_photo("small", 200, 150);
        let prepared = prepare(&photo, &CompressionConfig::default()).unwrap();
        assert_eq!((prepared.px_w, prepared.px_h), (200, 150));
    }

    #[test]
    fn output_is_jpeg() {
        let photo = test_photo("p", 100, 100);
        let prepared = prepare(&photo, &CompressionConfig::default()).unwrap();
        assert!(prepared.recompressed);
        assert_eq!(&prepared.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn undecodable_photo_keeps_an_empty_slot() {
        let good = test_photo("good", 64, 64);
        let bad = Photo::new("bad", vec![0, 1, 2, 3]);
        let prepared = prepare_photos(&[bad, good], &CompressionConfig::default());
        assert_eq!(prepared.len(), 2);
        assert!(prepared[0].is_none());
        assert_eq!(prepared[1].as_ref().unwrap().id, "good");
    }
}
