//! Caller-supplied settings for the message core.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};
use crate::schema::SchemaSource;

/// Environment variable for [`Settings::compress_request`].
pub const ENV_COMPRESS_REQUEST: &str = "SAMLSSO_COMPRESS_REQUEST";

/// Environment variable for [`Settings::private_key_path`].
pub const ENV_PRIVATE_KEY_PATH: &str = "SAMLSSO_PRIVATE_KEY_PATH";

/// Environment variable for [`Settings::schema_dir`].
pub const ENV_SCHEMA_DIR: &str = "SAMLSSO_SCHEMA_DIR";

/// Settings consumed by encoding, decryption and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Raw-deflate outbound messages before Base64 encoding.
    #[serde(default = "default_compress_request")]
    pub compress_request: bool,

    /// PEM RSA private key used to decrypt encrypted assertions.
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,

    /// Directory holding the SAML XSD files. The bundled copies are used
    /// when unset.
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
}

fn default_compress_request() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compress_request: default_compress_request(),
            private_key_path: None,
            schema_dir: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml_str(content: &str) -> SamlResult<Self> {
        toml::from_str(content)
            .map_err(|e| SamlError::Config(format!("failed to parse settings: {e}")))
    }

    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> SamlResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Serializes settings to TOML.
    pub fn to_toml_string(&self) -> SamlResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SamlError::Config(format!("failed to serialize settings: {e}")))
    }

    /// Reads settings from `SAMLSSO_*` environment variables.
    pub fn from_env() -> SamlResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds settings from a variable lookup, defaulting absent entries.
    pub fn from_vars<F>(lookup: F) -> SamlResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(value) = lookup(ENV_COMPRESS_REQUEST) {
            settings.compress_request = parse_flag(&value).ok_or_else(|| {
                SamlError::Config(format!("{ENV_COMPRESS_REQUEST} must be a boolean, got '{value}'"))
            })?;
        }

        settings.private_key_path = lookup(ENV_PRIVATE_KEY_PATH)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        settings.schema_dir = lookup(ENV_SCHEMA_DIR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(settings)
    }

    /// Sets whether outbound messages are compressed.
    #[must_use]
    pub fn with_compress_request(mut self, compress: bool) -> Self {
        self.compress_request = compress;
        self
    }

    /// Sets the private key path.
    #[must_use]
    pub fn with_private_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Sets the schema directory.
    #[must_use]
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    /// Returns where the protocol schema should be loaded from.
    #[must_use]
    pub fn schema_source(&self) -> SchemaSource {
        match &self.schema_dir {
            Some(dir) => SchemaSource::Directory(dir.clone()),
            None => SchemaSource::Bundled,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
