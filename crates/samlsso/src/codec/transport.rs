//! Transport encoding primitives.
//!
//! Base64 (single-line and MIME-style multi-line), form URL escaping and
//! raw DEFLATE, as used by the HTTP-Redirect binding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::{SamlError, SamlResult};

/// Characters per line in multi-line Base64 output.
pub const BASE64_LINE_LEN: usize = 60;

/// Decoder that tolerates missing padding and non-zero trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64-encodes `data` on a single line.
#[must_use]
pub fn encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Decodes single-line Base64.
///
/// Surrounding whitespace is ignored; anything else outside the alphabet is
/// an error.
pub fn decode(encoded: &str) -> SamlResult<Vec<u8>> {
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Base64-encodes `data` as MIME-style lines of [`BASE64_LINE_LEN`]
/// characters, each terminated by `\n`.
#[must_use]
pub fn encode64(data: impl AsRef<[u8]>) -> String {
    let flat = STANDARD.encode(data);
    let mut out = String::with_capacity(flat.len() + flat.len() / BASE64_LINE_LEN + 1);
    // Base64 output is ASCII, so byte chunks are char boundaries.
    for line in flat.as_bytes().chunks(BASE64_LINE_LEN) {
        out.extend(line.iter().map(|&b| char::from(b)));
        out.push('\n');
    }
    out
}

/// Decodes Base64 leniently.
///
/// Line breaks and any other characters outside the Base64 alphabet are
/// skipped, padding is optional, and a dangling final character is dropped.
pub fn decode64(encoded: &str) -> SamlResult<Vec<u8>> {
    let mut cleaned: Vec<u8> = encoded
        .bytes()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    Ok(LENIENT.decode(cleaned)?)
}

/// Form-URL-escapes text. Spaces become `+`.
#[must_use]
pub fn escape(unescaped: &str) -> String {
    url::form_urlencoded::byte_serialize(unescaped.as_bytes()).collect()
}

/// Reverses [`escape`]: `+` becomes a space and `%XX` sequences are decoded.
pub fn unescape(escaped: &str) -> SamlResult<String> {
    let spaced = escaped.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|e| SamlError::UrlDecode(e.to_string()))
}

/// Raw-deflates `data` at maximum compression (no zlib header or checksum).
pub fn deflate(data: impl AsRef<[u8]>) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data.as_ref())
        .map_err(|e| SamlError::Deflate(format!("compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Deflate(format!("compression finish error: {e}")))
}

/// Inflates a raw DEFLATE stream.
pub fn inflate(data: impl AsRef<[u8]>) -> SamlResult<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data.as_ref());
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| SamlError::Deflate(format!("decompression error: {e}")))?;
    Ok(inflated)
}
