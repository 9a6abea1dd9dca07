//! SAML error types.
//!
//! Provides error types for the message core: transport decoding, XML
//! parsing, decryption of encrypted assertions, and schema validation.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::status_codes;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// A document failed schema validation or could not be trusted.
///
/// Carries the diagnostic text. In strict validation this is the violation
/// message followed by the serialized document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with the given diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// SAML message-handling errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(String),

    /// Deflate compression or decompression error.
    #[error("deflate error: {0}")]
    Deflate(String),

    /// URL percent-decoding error.
    #[error("URL decode error: {0}")]
    UrlDecode(String),

    /// The response carries an encrypted assertion but no key was configured.
    #[error("decryption key file path not provided for encrypted assertion")]
    MissingDecryptionKey,

    /// The private key could not be read or parsed.
    #[error("failed to load private key{}: {reason}", key_origin(.path.as_deref()))]
    KeyLoad {
        /// Path the key was read from, `None` for in-memory PEM text.
        path: Option<PathBuf>,
        /// Why loading failed.
        reason: String,
    },

    /// An XML Encryption algorithm URI the decryptor does not implement.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Ciphertext could not be decrypted.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Schema violation or malformed document.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The protocol schema could not be loaded or compiled.
    #[error("schema error: {0}")]
    Schema(String),

    /// Invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SamlError {
    /// Returns the SAML top-level status code a host should answer with.
    ///
    /// Problems with the inbound message map to `Requester`; problems with
    /// local configuration or key material map to `Responder`.
    #[must_use]
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::XmlParse(_)
            | Self::Base64Decode(_)
            | Self::Deflate(_)
            | Self::UrlDecode(_)
            | Self::UnsupportedAlgorithm(_)
            | Self::Decryption(_)
            | Self::Validation(_) => status_codes::REQUESTER,
            Self::MissingDecryptionKey
            | Self::KeyLoad { .. }
            | Self::Schema(_)
            | Self::Config(_)
            | Self::Io(_) => status_codes::RESPONDER,
        }
    }

    /// Returns true if the error stems from local configuration rather than
    /// from the message being processed.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDecryptionKey | Self::KeyLoad { .. } | Self::Schema(_) | Self::Config(_)
        )
    }

    /// Returns the validation error, if this is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<roxmltree::Error> for SamlError {
    fn from(err: roxmltree::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64Decode(err.to_string())
    }
}

fn key_origin(path: Option<&Path>) -> String {
    path.map(|p| format!(" from {}", p.display())).unwrap_or_default()
}
