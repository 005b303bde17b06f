//! Binary payload helpers for JSON responses.
//!
//! Images stored as raw bytes are embedded in JSON as `data:` URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

/// Content type used when the bytes match no known signature.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Detect the image format of `bytes` from its signature.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}

/// Whether `mime` names an image format that [`detect_image_mime`] can
/// recognise again from the stored bytes.
pub fn is_known_image_mime(mime: &str) -> bool {
    ImageFormat::from_mime_type(mime).is_some()
}

/// Encode bytes as a `data:<mime>;base64,...` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Encode an optional image as a data URI, detecting its type.
pub fn image_data_uri(bytes: Option<&[u8]>) -> Option<String> {
    bytes.map(|b| to_data_uri(detect_image_mime(b).unwrap_or(FALLBACK_MIME), b))
}
