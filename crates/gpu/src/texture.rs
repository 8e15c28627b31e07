use std::io::Cursor;

use thiserror::Error;

/// Opaque mid-grey texel bound while a globe texture is missing.
pub const FALLBACK_TEXEL: [u8; 4] = [40, 48, 64, 255];

/// Largest source image accepted for decoding (an 8K equirectangular map).
/// Decoding runs on the page's only thread, so this bounds the stall.
pub const MAX_SOURCE_PIXELS: u64 = 8192 * 4096;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image is empty")]
    Empty,
    #[error("{width}x{height} image exceeds the {limit} pixel decode limit")]
    TooLarge { width: u32, height: u32, limit: u64 },
}

/// Tightly packed RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedTexture {
    pub fn fallback() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: FALLBACK_TEXEL.to_vec(),
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Decode PNG or JPEG bytes to RGBA8, downscaling so neither side exceeds
/// `max_dimension` (the device's 2D texture limit).
pub fn decode_rgba(bytes: &[u8], max_dimension: u32) -> Result<DecodedTexture, TextureError> {
    decode_rgba_within(bytes, max_dimension, MAX_SOURCE_PIXELS)
}

/// Width and height from the image header, without decoding pixels.
pub fn source_dimensions(bytes: &[u8]) -> Result<(u32, u32), TextureError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    Ok(reader.into_dimensions()?)
}

/// [`decode_rgba`] with an explicit cap on source pixels, checked against
/// the header before any pixel work.
pub fn decode_rgba_within(
    bytes: &[u8],
    max_dimension: u32,
    max_source_pixels: u64,
) -> Result<DecodedTexture, TextureError> {
    if bytes.is_empty() {
        return Err(TextureError::Empty);
    }
    let (width, height) = source_dimensions(bytes)?;
    if u64::from(width) * u64::from(height) > max_source_pixels {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit: max_source_pixels,
        });
    }
    let mut image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(TextureError::Empty);
    }

    let max_dimension = max_dimension.max(1);
    if image.width() > max_dimension || image.height() > max_dimension {
        log::debug!(
            "downscaling {}x{} texture to fit {max_dimension}",
            image.width(),
            image.height()
        );
        image = image.resize(
            max_dimension,
            max_dimension,
            image::imageops::FilterType::Triangle,
        );
    }

    let rgba = image.to_rgba8();
    Ok(DecodedTexture {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}
