//! The SAML message facade.

use std::path::Path;
use std::sync::Arc;

use crate::codec;
use crate::decrypt::Decryptor;
use crate::error::{SamlError, SamlResult, ValidationError};
use crate::schema::SchemaCache;
use crate::settings::Settings;
use crate::validator::Validator;

/// Codec, decryption and validation operations on SAML messages.
///
/// Holds no per-message state. Validation uses the process-wide
/// [`SchemaCache`] unless another cache is supplied.
#[derive(Debug, Clone, Default)]
pub struct SamlMessage {
    schemas: Option<Arc<SchemaCache>>,
}

impl SamlMessage {
    /// Creates a message handler over the process-wide schema cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a message handler validating against `cache`.
    #[must_use]
    pub fn with_cache(cache: Arc<SchemaCache>) -> Self {
        Self {
            schemas: Some(cache),
        }
    }

    /// Creates a message handler configured from `settings`.
    ///
    /// A configured schema directory gets its own cache; otherwise the
    /// process-wide cache is used.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.schema_dir {
            Some(_) => Self::with_cache(Arc::new(SchemaCache::with_source(settings.schema_source()))),
            None => Self::new(),
        }
    }

    /// Decodes an inbound wire message into XML text, or `None` if it is not
    /// raw, Base64 or deflated Base64 XML.
    #[must_use]
    pub fn decode_raw_saml(&self, message: &str) -> Option<String> {
        codec::decode_raw_saml(message)
    }

    /// Encodes XML for the HTTP-Redirect binding.
    pub fn encode_raw_saml(&self, xml: &str, settings: &Settings) -> SamlResult<String> {
        codec::encode_raw_saml(xml, settings)
    }

    /// Replaces an encrypted assertion in `xml` with its plaintext.
    pub fn decrypt_saml(&self, xml: &str, private_key_path: Option<&Path>) -> SamlResult<String> {
        Decryptor::new().decrypt_saml(xml, private_key_path)
    }

    /// Validates `xml` against the protocol schema, strict or soft.
    pub fn valid_saml(&self, xml: &str, soft: bool) -> SamlResult<bool> {
        self.validator().valid_saml(xml, soft)
    }

    /// Builds the error used for malformed or schema-invalid documents.
    #[must_use]
    pub fn validation_error(&self, message: impl Into<String>) -> SamlError {
        ValidationError::new(message).into()
    }

    /// The schema cache validation runs against.
    #[must_use]
    pub fn schema_cache(&self) -> &SchemaCache {
        self.schemas.as_deref().unwrap_or_else(|| SchemaCache::global())
    }

    fn validator(&self) -> Validator<'_> {
        Validator::new(self.schema_cache())
    }
}
