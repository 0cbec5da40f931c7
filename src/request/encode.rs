use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use image::ImageEncoder;

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::render::surface::FrameRGBA;

/// Default JPEG quality when a request names none.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Lossless, keeps transparency.
    #[default]
    Png,
    /// Lossy; transparent areas come out black.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// Parse a format name with an optional quality (JPEG only, `1..=100`).
    pub fn parse(name: &str, quality: Option<i64>) -> ThumbResult<Self> {
        let quality = match quality {
            None => None,
            Some(q) if (1..=100).contains(&q) => Some(q as u8),
            Some(q) => {
                return Err(ThumbError::validation(format!(
                    "quality must be within 1..=100, got {q}"
                )));
            }
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg {
                quality: quality.unwrap_or(DEFAULT_JPEG_QUALITY),
            }),
            other => Err(ThumbError::validation(format!(
                "unknown output format '{other}' (expected png or jpeg)"
            ))),
        }
    }

    /// Guess from a file extension; `None` when it is not a supported format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::parse(ext, None).ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("png"),
            Self::Jpeg { quality } => write!(f, "jpeg (quality {quality})"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

/// Encode a rendered frame to `format`.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn encode_frame(frame: &FrameRGBA, format: OutputFormat) -> ThumbResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(ThumbError::render(format!(
            "frame byte length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut out = Vec::new();
    match format {
        OutputFormat::Png => {
            let straight = frame.clone().into_straight_alpha();
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(
                    &straight.data,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgba8,
                )
                .context("encode png")?;
        }
        OutputFormat::Jpeg { quality } => {
            // Premultiplied color is the frame composited over black.
            let rgb = if frame.premultiplied {
                drop_alpha(&frame.data)
            } else {
                let mut premul = frame.data.clone();
                crate::assets::decode::premultiply_rgba8_in_place(&mut premul);
                drop_alpha(&premul)
            };
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
                .write_image(
                    &rgb,
                    frame.width,
                    frame.height,
                    image::ExtendedColorType::Rgb8,
                )
                .context("encode jpeg")?;
        }
    }
    Ok(out)
}

fn drop_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/request/encode.rs"]
mod tests;
