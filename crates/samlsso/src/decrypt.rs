//! Encrypted assertion handling.
//!
//! A response carrying a `saml:EncryptedAssertion` is decrypted, then the
//! recovered `saml:Assertion` is moved to the end of the document root and
//! the encrypted containers are dropped. The result is a new document; the
//! input text is never modified.

use std::path::Path;

use libxml::tree::{Document, Node};
use libxml::xpath::Context;

use crate::error::{SamlError, SamlResult, ValidationError};
use crate::types::SAML_NS;
use crate::xml::{self, squish};
use crate::xmlenc::{decrypt_document, DecryptionKey};

/// Where to look for the decrypted assertion, first non-empty wins.
pub const ASSERTION_CANDIDATES: [&str; 4] = [
    "//saml:EncryptedAssertion/saml:Assertion",
    "//saml:assertion",
    "//saml:Assertion",
    "//saml:ASSERTION",
];

/// Where to look for the encrypted containers, first non-empty wins.
pub const CONTAINER_CANDIDATES: [&str; 4] = [
    "//saml:EncryptedAssertion",
    "//saml:encryptedassertion",
    "//saml:Encryptedassertion",
    "//saml:ENCRYPTEDASSERTION",
];

/// Message of the error raised when no assertion survives decryption.
pub const MALFORMED_DOCUMENT: &str =
    "XML document seems to be malformed and does not have correct Nodes";

/// Decrypts encrypted assertions in SAML responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decryptor;

impl Decryptor {
    /// Creates a decryptor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns true if `xml` contains a `saml:EncryptedAssertion`.
    pub fn has_encrypted_assertion(&self, xml: &str) -> SamlResult<bool> {
        let doc = xml::parse(xml)?;
        Ok(doc
            .descendants()
            .any(|n| xml::is_element(n, SAML_NS, "EncryptedAssertion")))
    }

    /// Decrypts the encrypted assertion in `xml` with the PEM key at
    /// `private_key_path`.
    ///
    /// Documents without an encrypted assertion are returned unchanged and
    /// the key is not read. Otherwise the key path is required.
    pub fn decrypt_saml(&self, xml: &str, private_key_path: Option<&Path>) -> SamlResult<String> {
        if !self.has_encrypted_assertion(xml)? {
            tracing::trace!("no encrypted assertion, document passed through");
            return Ok(xml.to_string());
        }
        let path = private_key_path.ok_or(SamlError::MissingDecryptionKey)?;
        let key = DecryptionKey::from_pem_file(path)?;
        self.decrypt_with_key(xml, &key)
    }

    /// Like [`decrypt_saml`](Self::decrypt_saml) with an already loaded key.
    pub fn decrypt_saml_with_key(&self, xml: &str, key: &DecryptionKey) -> SamlResult<String> {
        if !self.has_encrypted_assertion(xml)? {
            return Ok(xml.to_string());
        }
        self.decrypt_with_key(xml, key)
    }

    fn decrypt_with_key(&self, xml: &str, key: &DecryptionKey) -> SamlResult<String> {
        let decrypted = decrypt_document(xml, key)?;
        let out = reassemble(&decrypted)?;
        tracing::debug!(len = out.len(), "decrypted encrypted assertion");
        Ok(out)
    }
}

/// Moves the last located assertion to the end of the root element, drops
/// the encrypted containers and squishes whitespace.
///
/// The assertion is copied out of its container, so a namespace it only
/// inherited from the container is declared on the assertion itself.
pub fn reassemble(decrypted: &str) -> SamlResult<String> {
    let mut doc = xml::parse_dom(decrypted)?;
    let mut root = doc.get_root_element().ok_or_else(malformed)?;

    let (mut assertion, containers) = {
        let mut context = saml_context(&doc)?;
        let assertion = first_match(&mut context, &ASSERTION_CANDIDATES)
            .pop()
            .ok_or_else(malformed)?;
        (assertion, first_match(&mut context, &CONTAINER_CANDIDATES))
    };
    if assertion == root || containers.contains(&root) {
        return Err(malformed());
    }

    assertion.unlink();
    for mut container in containers {
        container.unlink();
    }
    let mut moved = doc.import_node(&mut assertion).map_err(|()| {
        SamlError::XmlParse("decrypted assertion could not be copied".to_string())
    })?;
    root.add_child(&mut moved)
        .map_err(|err| SamlError::XmlParse(format!("cannot append assertion: {err}")))?;

    Ok(squish(&doc.node_to_string(&root)))
}

fn saml_context(doc: &Document) -> SamlResult<Context> {
    let context = Context::new(doc)
        .map_err(|()| SamlError::XmlParse("cannot evaluate XPath on document".to_string()))?;
    context
        .register_namespace("saml", SAML_NS)
        .map_err(|()| SamlError::XmlParse("cannot register SAML namespace".to_string()))?;
    Ok(context)
}

/// Returns the matches of the first candidate that matches anything.
fn first_match(context: &mut Context, candidates: &[&str]) -> Vec<Node> {
    candidates
        .iter()
        .filter_map(|path| context.findnodes(path, None).ok())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn malformed() -> SamlError {
    ValidationError::new(MALFORMED_DOCUMENT).into()
}
