use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Longest side, in pixels, handed to the engine.
pub const MAX_DIMENSION: u32 = 2800;

/// The two renderings each side goes through. `Standard` reads dark text on
/// light card stock; `Inverted` reads light text printed on dark bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Standard,
    Inverted,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Standard, Variant::Inverted];

    /// Pixels strictly above this become white.
    pub fn threshold(self) -> u8 {
        match self {
            Variant::Standard => 150,
            Variant::Inverted => 160,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Inverted => "inverted",
        }
    }
}

/// Decode raw image bytes (JPEG / PNG / WEBP / …), render `variant` and
/// return PNG bytes ready for OCR.
pub fn prepare(data: &[u8], variant: Variant) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(render(img, variant))
}

fn render(img: DynamicImage, variant: Variant) -> DynamicImage {
    let mut gray = downscale(img).to_luma8();
    match variant {
        Variant::Standard => {
            gray = stretch_contrast(gray);
            // Extra gain so faint print clears the threshold.
            for p in gray.pixels_mut() {
                p[0] = (f32::from(p[0]) * 1.4 - 10.0).clamp(0.0, 255.0) as u8;
            }
        }
        Variant::Inverted => {
            image::imageops::invert(&mut gray);
            gray = stretch_contrast(gray);
        }
    }
    DynamicImage::ImageLuma8(binarize(&gray, variant.threshold()))
}

fn downscale(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, image::imageops::FilterType::Lanczos3)
    } else {
        img
    }
}

/// Linear stretch of the observed range to 0..=255. Uniform images pass through.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min_px, max_px) = gray
        .pixels()
        .fold((255u8, 0u8), |(mn, mx), p| (mn.min(p[0]), mx.max(p[0])));
    if max_px == min_px {
        return gray;
    }

    let range = u32::from(max_px - min_px);
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0];
        Luma([(u32::from(p - min_px) * 255 / range) as u8])
    })
}

fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([if gray.get_pixel(x, y)[0] > threshold { 255 } else { 0 }])
    })
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
