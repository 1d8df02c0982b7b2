//! Data-URL helpers for image inputs and outputs.
//!
//! Images travel through the kernel as `data:<mime>;base64,<payload>`
//! strings, the same shape a browser produces for an uploaded file.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

use crate::Part;
use crate::error::KernelError;

const DEFAULT_MIME: &str = "image/png";

/// The base64 payload after the first comma, or `None` when there is no
/// comma or nothing follows it.
pub fn pure_base64(data_url: &str) -> Option<&str> {
    let (_, payload) = data_url.split_once(',')?;
    let payload = payload.trim();
    if payload.is_empty() { None } else { Some(payload) }
}

/// MIME type declared in the data-URL header, defaulting to `image/png`.
pub fn mime_type(data_url: &str) -> &str {
    data_url
        .split_once(',')
        .and_then(|(header, _)| header.strip_prefix("data:"))
        .and_then(|rest| rest.split(';').next())
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME)
}

/// Inline request part for a data URL, if it carries a payload.
pub fn inline_part(data_url: &str) -> Option<Part> {
    pure_base64(data_url).map(|data| Part::inline(mime_type(data_url), data))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a data URL into its MIME type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), KernelError> {
    let payload = pure_base64(data_url).ok_or(KernelError::EmptyBuffer("Empty buffer."))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| KernelError::Parse(format!("invalid base64 image data: {e}")))?;
    Ok((mime_type(data_url).to_string(), bytes))
}

/// MIME type guessed from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => DEFAULT_MIME,
    }
}

/// Read an image file into a data URL.
pub fn read_image(path: &Path) -> Result<String, KernelError> {
    let bytes = std::fs::read(path)?;
    Ok(encode_data_url(mime_for_path(path), &bytes))
}

/// File extension matching a MIME type, for naming written outputs.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_payload_and_mime() {
        let url = "data:image/jpeg;base64,/9j/4AAQ";
        assert_eq!(pure_base64(url), Some("/9j/4AAQ"));
        assert_eq!(mime_type(url), "image/jpeg");
    }

    #[test]
    fn missing_payload_is_none() {
        assert_eq!(pure_base64(""), None);
        assert_eq!(pure_base64("no-comma-here"), None);
        assert_eq!(pure_base64("data:image/png;base64,"), None);
        assert!(inline_part("data:image/png;base64,").is_none());
    }

    #[test]
    fn bare_payload_defaults_to_png() {
        assert_eq!(mime_type(",AAAA"), "image/png");
        assert_eq!(mime_type("garbage"), "image/png");
    }

    #[test]
    fn encode_then_decode_preserves_bytes() {
        let url = encode_data_url("image/webp", &[0, 159, 146, 150]);
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/webp");
        assert_eq!(bytes, vec![0, 159, 146, 150]);
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let err = decode_data_url("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, KernelError::Parse(_)));
    }

    #[test]
    fn inline_part_carries_mime() {
        let part = inline_part("data:image/gif;base64,R0lG").unwrap();
        let inline = part.inline_data.unwrap();
        assert_eq!(inline.mime_type, "image/gif");
        assert_eq!(inline.data, "R0lG");
    }

    #[test]
    fn reads_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mark.JPG");
        std::fs::write(&path, b"abc").unwrap();
        let url = read_image(&path).unwrap();
        assert_eq!(url, "data:image/jpeg;base64,YWJj");
        assert_eq!(extension_for_mime(mime_type(&url)), "jpg");
    }
}
