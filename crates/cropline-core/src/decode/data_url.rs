//! `data:` URL parsing (RFC 2397).
//!
//! The crop editor reads the selected file with `FileReader.readAsDataURL`,
//! so the engine accepts that representation directly.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{decode_image, DecodeError, SourceImage};

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Media type, `text/plain` when the URL omits it.
    pub mime_type: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

/// Parse a `data:[<mediatype>][;base64],<data>` URL into its payload.
///
/// Whitespace inside a base64 payload is ignored, matching what browsers
/// accept. Non-base64 payloads are percent-decoded.
pub fn parse_data_url(url: &str) -> Result<DataUrl, DecodeError> {
    let url = url.trim();
    let rest = url
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &url[5..])
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime_type = match params.next().map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let data = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DecodeError::InvalidDataUrl(e.to_string()))?
    } else {
        percent_decode(payload)?
    };

    Ok(DataUrl { mime_type, data })
}

/// Parse a `data:` URL and decode its payload as an image.
pub fn decode_data_url(url: &str) -> Result<SourceImage, DecodeError> {
    let parsed = parse_data_url(url)?;
    decode_image(&parsed.data)
}

fn percent_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| {
                    DecodeError::InvalidDataUrl(format!("bad percent escape at byte {i}"))
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}
