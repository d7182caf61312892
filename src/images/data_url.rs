//! Base64 `data:` URI helpers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::ImageError;

/// Media type of every normalized photo.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Wrap raw bytes as `data:<media_type>;base64,<payload>`.
pub fn encode_data_url(media_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(data))
}

/// Split a base64 `data:` URI into its media type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), ImageError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidDataUrl("missing data: prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidDataUrl("missing payload separator".to_string()))?;

    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;

    let data = STANDARD
        .decode(payload)
        .map_err(|e| ImageError::InvalidDataUrl(e.to_string()))?;

    Ok((media_type.to_string(), data))
}
