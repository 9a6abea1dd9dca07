//! Schema validation of SAML messages.
//!
//! Documents are checked against the SAML 2.0 protocol schema held by a
//! [`SchemaCache`]. Strict checks fail with a [`ValidationError`] naming the
//! first violation; soft checks answer `false` instead and never fail, not
//! even when the schema cannot be loaded.

use roxmltree::Document;

use crate::error::{SamlError, SamlResult, ValidationError};
use crate::schema::{SchemaCache, Violation};
use crate::xml;

/// Validates documents against the protocol schema.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'c> {
    cache: &'c SchemaCache,
}

impl Validator<'static> {
    /// A validator over the process-wide schema cache.
    #[must_use]
    pub fn global() -> Self {
        Self::new(SchemaCache::global())
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'c> Validator<'c> {
    /// Creates a validator over `cache`.
    #[must_use]
    pub const fn new(cache: &'c SchemaCache) -> Self {
        Self { cache }
    }

    /// Validates `xml`, strict or soft.
    ///
    /// Strict validation returns `Ok(true)` or the first violation as a
    /// [`SamlError::Validation`] carrying the violation message, a blank line
    /// and the document. Soft validation always returns `Ok`, with `false`
    /// for an invalid or unparsable document or an unloadable schema.
    pub fn valid_saml(&self, xml: &str, soft: bool) -> SamlResult<bool> {
        if soft {
            Ok(self.is_valid(xml))
        } else {
            self.check(xml).map(|()| true)
        }
    }

    /// Strict validation of `xml`.
    pub fn check(&self, xml: &str) -> SamlResult<()> {
        match self.first_violation(xml)? {
            None => Ok(()),
            Some(violation) => {
                tracing::debug!(line = violation.line, %violation, "schema validation failed");
                Err(ValidationError::new(format!("{violation}\n\n{xml}")).into())
            }
        }
    }

    /// Soft validation of `xml`.
    #[must_use]
    pub fn is_valid(&self, xml: &str) -> bool {
        match self.first_violation(xml) {
            Ok(None) => true,
            Ok(Some(violation)) => {
                tracing::debug!(line = violation.line, %violation, "document is not schema-valid");
                false
            }
            Err(SamlError::XmlParse(reason)) => {
                tracing::debug!(%reason, "document is not well-formed");
                false
            }
            Err(err) => {
                tracing::debug!(error = %err, "soft validation could not run");
                false
            }
        }
    }

    /// Strict validation of an already parsed document.
    ///
    /// The document's source text is parsed again, so the result only
    /// depends on its serialized form.
    pub fn check_document(&self, doc: &Document<'_>) -> SamlResult<()> {
        self.check(doc.input_text())
    }

    /// Soft validation of an already parsed document.
    #[must_use]
    pub fn is_valid_document(&self, doc: &Document<'_>) -> bool {
        self.is_valid(doc.input_text())
    }

    fn first_violation(&self, xml: &str) -> SamlResult<Option<Violation>> {
        let schema = self.cache.schema()?;
        xml::parse(xml)?;
        Ok(schema.validate_str(xml)?.into_iter().next())
    }
}
