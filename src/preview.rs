// Card picture decoding and half-block sampling for terminal display

use crate::source::SourceError;
use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbImage};

/// Decoded pictures are shrunk to this before caching; cards are never wider
const MAX_PICTURE_WIDTH: u32 = 160;
/// Two pixel rows per terminal row
const MAX_PICTURE_HEIGHT: u32 = 100;

/// A decoded, downscaled card picture
#[derive(Debug, Clone)]
pub struct CardPicture {
    pub pixels: RgbImage,
    pub original_width: u32,
    pub original_height: u32,
}

/// Colours of one terminal cell drawn with the upper half block (▀)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfBlock {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

/// Calculates new dimensions to fit within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;
    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        // Never upscale
        (original_width, original_height)
    } else {
        let new_width = ((original_width as f64 * ratio) as u32).max(1);
        let new_height = ((original_height as f64 * ratio) as u32).max(1);
        (new_width, new_height)
    }
}

/// Decodes downloaded bytes into a cacheable picture
pub fn decode_picture(bytes: &[u8]) -> Result<CardPicture, SourceError> {
    let img = image::load_from_memory(bytes).map_err(|e| SourceError::Decode(e.to_string()))?;
    Ok(shrink(img))
}

fn shrink(img: DynamicImage) -> CardPicture {
    let (original_width, original_height) = img.dimensions();
    let (width, height) = calculate_resize_dimensions(
        original_width,
        original_height,
        MAX_PICTURE_WIDTH,
        MAX_PICTURE_HEIGHT,
    );

    // Triangle is fast and good enough at terminal resolution
    let pixels = if (width, height) == (original_width, original_height) {
        img.to_rgb8()
    } else {
        img.resize_exact(width, height, FilterType::Triangle).to_rgb8()
    };

    CardPicture {
        pixels,
        original_width,
        original_height,
    }
}

impl CardPicture {
    pub fn from_image(img: DynamicImage) -> Self {
        shrink(img)
    }

    /// Samples the picture into `cols` × `rows` half-block cells, stretching to fill
    pub fn halfblocks(&self, cols: u16, rows: u16) -> Vec<Vec<HalfBlock>> {
        let (width, height) = self.pixels.dimensions();
        if cols == 0 || rows == 0 || width == 0 || height == 0 {
            return Vec::new();
        }

        let pixel_rows = rows as u32 * 2;
        let sample = |x: u16, py: u32| -> [u8; 3] {
            let sx = (x as u32 * width / cols as u32).min(width - 1);
            let sy = (py * height / pixel_rows).min(height - 1);
            self.pixels.get_pixel(sx, sy).0
        };

        (0..rows)
            .map(|row| {
                let upper = row as u32 * 2;
                (0..cols)
                    .map(|x| HalfBlock {
                        top: sample(x, upper),
                        bottom: sample(x, upper + 1),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Blends a colour toward `background` by `opacity` (1.0 = untouched)
pub fn fade(rgb: [u8; 3], background: [u8; 3], opacity: f64) -> [u8; 3] {
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |c: u8, b: u8| -> u8 {
        (b as f64 + (c as f64 - b as f64) * opacity).round() as u8
    };
    [
        mix(rgb[0], background[0]),
        mix(rgb[1], background[1]),
        mix(rgb[2], background[2]),
    ]
}
