//! Provider and attachment types.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tutor_core::{AppError, AppResult};

/// MIME type assumed when the caller does not provide one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An image sent along with a question.
///
/// The bytes are opaque: nothing here inspects or validates the image format.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    data: Vec<u8>,
    mime_type: String,
}

impl ImageAttachment {
    /// Wrap raw image bytes.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Decode a base64 payload as received at a request boundary.
    pub fn from_base64(encoded: &str) -> AppResult<Self> {
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::Serialization(format!("Invalid base64 image data: {}", e)))?;
        Ok(Self::new(data, DEFAULT_IMAGE_MIME))
    }

    /// Guess the MIME type from a file extension, falling back to JPEG.
    pub fn mime_for_extension(extension: Option<&str>) -> &'static str {
        match extension.map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => DEFAULT_IMAGE_MIME,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Standard base64 encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL form used by chat-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAI,
    Ollama,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("openai"), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("OpenAI"), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("ollama"), Some(ProviderType::Ollama));
        assert_eq!(ProviderType::parse("none"), None);
    }

    #[test]
    fn test_image_from_base64() {
        let image = ImageAttachment::from_base64("aGVsbG8=").unwrap();
        assert_eq!(image.bytes(), b"hello");
        assert_eq!(image.mime_type(), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn test_image_from_invalid_base64() {
        let result = ImageAttachment::from_base64("not base64!!");
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }

    #[test]
    fn test_data_url() {
        let image = ImageAttachment::new(b"hello".to_vec(), "image/png");
        assert_eq!(image.data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let image = ImageAttachment::new(vec![0u8; 4096], "image/png");
        let rendered = format!("{:?}", image);
        assert!(rendered.contains("4096"));
        assert!(rendered.len() < 100);
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(ImageAttachment::mime_for_extension(Some("PNG")), "image/png");
        assert_eq!(ImageAttachment::mime_for_extension(Some("jpg")), "image/jpeg");
        assert_eq!(ImageAttachment::mime_for_extension(None), "image/jpeg");
    }
}
