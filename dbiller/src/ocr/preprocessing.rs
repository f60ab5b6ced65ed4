use image::{DynamicImage, GenericImageView, GrayImage, ImageReader};

use crate::config::OcrConfig;
use crate::error::{BillerError, Result};

/// A decoded upload, orientation-corrected and capped to the configured
/// maximum input dimension. `decoded_width`/`decoded_height` are the
/// dimensions before the cap, kept for diagnostics.
pub struct DecodedImage {
    pub image: DynamicImage,
    pub decoded_width: u32,
    pub decoded_height: u32,
}

/// Per-pass preprocessing profile.
///
/// The primary profile binarizes at the configured threshold without
/// scaling; the fallback profile skips binarization and upscales by the
/// configured factor instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcrProfile {
    pub threshold: Option<u8>,
    pub enlarge: f32,
}

impl OcrProfile {
    pub fn primary(config: &OcrConfig) -> Self {
        Self {
            threshold: Some(config.binarize_threshold),
            enlarge: 1.0,
        }
    }

    pub fn fallback(config: &OcrConfig) -> Self {
        Self {
            threshold: None,
            enlarge: config.fallback_enlarge_factor,
        }
    }
}

/// Decode raw upload bytes into a normalized bitmap.
///
/// Applies EXIF orientation once here, so both passes start from the same
/// correctly-oriented bitmap, and downscales (preserving aspect ratio) when
/// the longer side exceeds `max_input_dimension`.
pub fn decode_image(bytes: &[u8], max_input_dimension: u32) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(BillerError::InvalidImage("empty image upload".to_string()));
    }

    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BillerError::InvalidImage(format!("Failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| BillerError::InvalidImage(format!("Failed to decode image: {e}")))?;

    let img = apply_orientation(img, read_exif_orientation(bytes));
    let (decoded_width, decoded_height) = img.dimensions();
    let img = cap_input_size(img, max_input_dimension);

    Ok(DecodedImage {
        image: img,
        decoded_width,
        decoded_height,
    })
}

/// Transform the base bitmap for one OCR pass: grayscale, contrast stretch,
/// optional enlarge (each dimension capped at `max_resize_dimension`),
/// sharpen, optional binarize. Pure transform; the base is not mutated.
pub fn apply_profile(
    base: &DynamicImage,
    profile: &OcrProfile,
    max_resize_dimension: u32,
) -> GrayImage {
    let gray = base.to_luma8();
    let mut gray = stretch_contrast(gray);

    if profile.enlarge != 1.0 {
        let (width, height) = gray.dimensions();
        let new_width = scaled_dimension(width, profile.enlarge, max_resize_dimension);
        let new_height = scaled_dimension(height, profile.enlarge, max_resize_dimension);
        gray = image::imageops::resize(
            &gray,
            new_width,
            new_height,
            image::imageops::FilterType::Lanczos3,
        );
    }

    let mut gray = image::imageops::unsharpen(&gray, 1.0, 2);

    if let Some(threshold) = profile.threshold {
        for pixel in gray.pixels_mut() {
            pixel[0] = if pixel[0] > threshold { 255 } else { 0 };
        }
    }

    gray
}

fn scaled_dimension(dim: u32, factor: f32, max_dim: u32) -> u32 {
    ((dim as f32 * factor) as u32).min(max_dim).max(1)
}

/// Downscale while maintaining aspect ratio when the longer side exceeds
/// `max_dim`. Uses Lanczos3 for high-quality resampling.
fn cap_input_size(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();

    if width <= max_dim && height <= max_dim {
        return img;
    }

    let ratio = if width > height {
        max_dim as f32 / width as f32
    } else {
        max_dim as f32 / height as f32
    };

    let new_width = (width as f32 * ratio) as u32;
    let new_height = (height as f32 * ratio) as u32;

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Read the EXIF orientation tag from raw image bytes. Returns 1 (normal)
/// when no EXIF data or tag is present.
fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = std::io::Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return 1,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

/// Apply an EXIF orientation transform (tag values 1–8) to the image.
fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Contrast stretch on a grayscale image: maps the darkest pixel to 0 and
/// the lightest to 255, scaling intermediate values linearly. A flat image
/// is returned unchanged.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let mut min_val = 255u8;
    let mut max_val = 0u8;

    for pixel in gray.pixels() {
        let val = pixel[0];
        if val < min_val {
            min_val = val;
        }
        if val > max_val {
            max_val = val;
        }
    }

    if max_val <= min_val {
        return gray;
    }

    let range = (max_val - min_val) as f32;
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let pixel = gray.get_pixel(x, y);
        let normalized = (pixel[0] - min_val) as f32 / range;
        image::Luma([(normalized * 255.0) as u8])
    })
}
