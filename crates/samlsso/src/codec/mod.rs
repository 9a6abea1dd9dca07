//! Wire codec for SAML messages.
//!
//! Inbound messages arrive at one of three encoding depths: raw XML,
//! Base64 of XML, or Base64 of raw-deflated XML. [`decode_raw_saml`] tries
//! each depth in [`WireDepth::ORDER`] and keeps the first that yields XML
//! text. Outbound messages go through [`encode_raw_saml`].
//!
//! # Usage
//!
//! ```rust
//! use samlsso::codec::{decode_raw_saml, encode_raw_saml, unescape};
//! use samlsso::settings::Settings;
//!
//! let xml = "<samlp:AuthnRequest/>";
//! let wire = encode_raw_saml(xml, &Settings::default()).unwrap();
//! let decoded = decode_raw_saml(&unescape(&wire).unwrap());
//! assert_eq!(decoded.as_deref(), Some(xml));
//! ```

mod transport;

pub use transport::*;

use crate::error::SamlResult;
use crate::settings::Settings;

/// One candidate encoding depth for an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireDepth {
    /// The message is already XML text.
    Xml,
    /// Base64 of XML text.
    Base64,
    /// Base64 of raw-deflated XML text.
    DeflatedBase64,
}

impl WireDepth {
    /// Depths in the order they are attempted.
    pub const ORDER: [Self; 3] = [Self::Xml, Self::Base64, Self::DeflatedBase64];

    /// Attempts to recover XML text from `message` at this depth.
    ///
    /// Returns `None` unless the result is UTF-8 text starting with `<`.
    #[must_use]
    pub fn apply(self, message: &str) -> Option<String> {
        let candidate = match self {
            Self::Xml => return looks_like_xml(message).then(|| message.to_string()),
            Self::Base64 => decode64(message).ok()?,
            Self::DeflatedBase64 => inflate(decode64(message).ok()?).ok()?,
        };
        String::from_utf8(candidate)
            .ok()
            .filter(|text| looks_like_xml(text))
    }

    /// Returns a short name for log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Base64 => "base64",
            Self::DeflatedBase64 => "deflated-base64",
        }
    }
}

fn looks_like_xml(text: &str) -> bool {
    text.starts_with('<')
}

/// Decodes a wire message of unknown encoding depth into XML text.
///
/// Returns `None` when no depth recovers XML. That is not an error: the
/// input simply is not a SAML message this codec understands.
#[must_use]
pub fn decode_raw_saml(message: &str) -> Option<String> {
    decode_raw_saml_with_depth(message).map(|(_, xml)| xml)
}

/// Like [`decode_raw_saml`], also reporting which depth matched.
#[must_use]
pub fn decode_raw_saml_with_depth(message: &str) -> Option<(WireDepth, String)> {
    let found = WireDepth::ORDER
        .into_iter()
        .find_map(|depth| depth.apply(message).map(|xml| (depth, xml)));

    match &found {
        Some((depth, xml)) => {
            tracing::debug!(depth = depth.name(), len = xml.len(), "decoded SAML message");
        }
        None => tracing::trace!(len = message.len(), "no decode depth matched"),
    }
    found
}

/// Encodes XML for the HTTP-Redirect binding.
///
/// Raw-deflates when `settings.compress_request` is set, then Base64-encodes
/// with line breaks and form-URL-escapes the result.
pub fn encode_raw_saml(xml: &str, settings: &Settings) -> SamlResult<String> {
    let payload = if settings.compress_request {
        deflate(xml)?
    } else {
        xml.as_bytes().to_vec()
    };
    tracing::trace!(
        compressed = settings.compress_request,
        len = payload.len(),
        "encoding SAML message"
    );
    Ok(escape(&encode64(payload)))
}
