//! Core types for image generation.

use crate::error::{GenPixError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG format (lossy).
    #[default]
    Jpeg,
    /// PNG format (lossless).
    Png,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }

    /// Detects the format from a `Content-Type` header value.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Image provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    /// Pollinations AI (image.pollinations.ai).
    Pollinations,
}

impl std::fmt::Display for ImageProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pollinations => write!(f, "pollinations"),
        }
    }
}

/// A width:height ratio controlling image proportions independent of pixel size.
///
/// Parsed from `"W/H"` (or `"W:H"`) where both components are finite,
/// positive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Relative width.
    pub width: f64,
    /// Relative height.
    pub height: f64,
}

impl AspectRatio {
    /// 1/1 square aspect ratio.
    pub const SQUARE: Self = Self {
        width: 1.0,
        height: 1.0,
    };

    /// Creates a ratio, rejecting zero, negative and non-finite components.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(GenPixError::InvalidAspectRatio(format!(
                "{width}/{height}: both sides must be positive numbers"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl FromStr for AspectRatio {
    type Err = GenPixError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GenPixError::InvalidAspectRatio(format!("'{s}' is not of the form W/H"));

        let (w, h) = s
            .trim()
            .split_once(['/', ':'])
            .ok_or_else(invalid)?;
        let w: f64 = w.trim().parse().map_err(|_| invalid())?;
        let h: f64 = h.trim().parse().map_err(|_| invalid())?;

        Self::new(w, h)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.width, self.height)
    }
}

/// Largest number of images a single batch may request.
pub const MAX_IMAGE_COUNT: u32 = 10;

/// A batch submission: one prompt, rendered `count` times at one aspect ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Number of images to generate.
    pub count: u32,
    /// Proportions of every image in the batch.
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Creates a validated request. The prompt is trimmed.
    pub fn new(prompt: impl Into<String>, count: u32, aspect_ratio: AspectRatio) -> Result<Self> {
        let request = Self {
            prompt: prompt.into().trim().to_string(),
            count,
            aspect_ratio,
        };
        request.validate()?;
        Ok(request)
    }

    /// Checks the request can be submitted.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenPixError::InvalidInput("prompt must not be empty".into()));
        }
        if self.count == 0 {
            return Err(GenPixError::InvalidInput(
                "image count must be at least 1".into(),
            ));
        }
        if self.count > MAX_IMAGE_COUNT {
            return Err(GenPixError::InvalidInput(format!(
                "image count must be at most {MAX_IMAGE_COUNT}, got {}",
                self.count
            )));
        }
        Ok(())
    }
}

/// A single outbound image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// The text prompt.
    pub prompt: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Seed for variety between images of the same prompt.
    pub seed: u64,
}

impl ImageRequest {
    /// Creates a new request.
    pub fn new(prompt: impl Into<String>, width: u32, height: u32, seed: u64) -> Self {
        Self {
            prompt: prompt.into(),
            width,
            height,
            seed,
        }
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Seed sent with the request.
    pub seed: Option<u64>,
    /// Requested width in pixels.
    pub width: Option<u32>,
    /// Requested height in pixels.
    pub height: Option<u32>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A generated image with its data and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format.
    pub format: ImageFormat,
    /// Provider that generated this image.
    pub provider: ImageProviderKind,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(
        data: Vec<u8>,
        format: ImageFormat,
        provider: ImageProviderKind,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            data,
            format,
            provider,
            metadata,
        }
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        use base64::Engine;
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF"), None);
        assert_eq!(ImageFormat::from_magic_bytes(b"<html>"), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(
            ImageFormat::from_mime_type("image/jpeg"),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_mime_type("image/PNG; charset=binary"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_mime_type("text/plain"), None);
    }

    #[test]
    fn test_aspect_ratio_parse() {
        let ratio: AspectRatio = "16/9".parse().unwrap();
        assert_eq!(ratio.width, 16.0);
        assert_eq!(ratio.height, 9.0);

        let ratio: AspectRatio = " 4:3 ".parse().unwrap();
        assert_eq!(ratio.width, 4.0);
        assert_eq!(ratio.height, 3.0);

        let ratio: AspectRatio = "1.5/1".parse().unwrap();
        assert_eq!(ratio.width, 1.5);
    }

    #[test]
    fn test_aspect_ratio_rejects_malformed() {
        for bad in ["", "16", "a/b", "0/1", "1/0", "-1/1", "inf/1", "NaN/1", "1/2/3"] {
            let result = bad.parse::<AspectRatio>();
            assert!(
                matches!(result, Err(GenPixError::InvalidAspectRatio(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_aspect_ratio_display() {
        assert_eq!(AspectRatio::SQUARE.to_string(), "1/1");
        assert_eq!("16:9".parse::<AspectRatio>().unwrap().to_string(), "16/9");
    }

    #[test]
    fn test_generation_request_validation() {
        let req = GenerationRequest::new("  a cat  ", 3, AspectRatio::SQUARE).unwrap();
        assert_eq!(req.prompt, "a cat");
        assert_eq!(req.count, 3);

        assert!(matches!(
            GenerationRequest::new("   ", 1, AspectRatio::SQUARE),
            Err(GenPixError::InvalidInput(_))
        ));
        assert!(matches!(
            GenerationRequest::new("a cat", 0, AspectRatio::SQUARE),
            Err(GenPixError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generation_request_count_limit() {
        assert!(GenerationRequest::new("a cat", MAX_IMAGE_COUNT, AspectRatio::SQUARE).is_ok());
        assert!(matches!(
            GenerationRequest::new("a cat", MAX_IMAGE_COUNT + 1, AspectRatio::SQUARE),
            Err(GenPixError::InvalidInput(_))
        ));
        assert!(matches!(
            GenerationRequest::new("a cat", u32::MAX, AspectRatio::SQUARE),
            Err(GenPixError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_data_url() {
        let image = GeneratedImage::new(
            vec![0xFF, 0xD8, 0xFF],
            ImageFormat::Jpeg,
            ImageProviderKind::Pollinations,
            GenerationMetadata::default(),
        );
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ImageProviderKind::Pollinations.to_string(), "pollinations");
    }
}
