//! Decryption of `xenc:EncryptedData` elements in place.

use roxmltree::{Document, Node};

use super::algorithm::{ContentCipher, KeyTransport};
use super::key::DecryptionKey;
use crate::codec::decode64;
use crate::error::{SamlError, SamlResult};
use crate::types::{XMLDSIG_NS, XMLENC11_NS, XMLENC_NS};
use crate::xml::{self, child, is_element, splice, text_content, Edit};

/// Replaces every `xenc:EncryptedData` element in `source` with its
/// decrypted plaintext and returns the new document text.
///
/// Documents without encrypted data are returned unchanged. The plaintext
/// is inserted verbatim, so an `Element` payload becomes a child of the
/// encrypted data's parent and a `Content` payload becomes its content.
pub fn decrypt_document(source: &str, key: &DecryptionKey) -> SamlResult<String> {
    let doc = xml::parse(source)?;
    let encrypted: Vec<_> = doc
        .descendants()
        .filter(|n| is_element(*n, XMLENC_NS, "EncryptedData"))
        .collect();
    if encrypted.is_empty() {
        return Ok(source.to_string());
    }

    let edits = encrypted
        .into_iter()
        .map(|data| {
            let plaintext = decrypt_element(&doc, data, key)?;
            Ok(Edit::replace(data.range(), plaintext))
        })
        .collect::<SamlResult<Vec<_>>>()?;

    Ok(splice(source, edits))
}

/// Decrypts one `xenc:EncryptedData` element to its plaintext text.
pub fn decrypt_element<'a, 'i>(
    doc: &'a Document<'i>,
    data: Node<'a, 'i>,
    key: &DecryptionKey,
) -> SamlResult<String> {
    let cipher = content_cipher(data)?;
    let ciphertext = cipher_value(data)?;

    let encrypted_key = locate_encrypted_key(doc, data).ok_or_else(|| {
        SamlError::Decryption("no EncryptedKey found for EncryptedData".to_string())
    })?;
    let transport = key_transport(encrypted_key)?;
    let session_key = key.unwrap_key(&transport, &cipher_value(encrypted_key)?)?;

    tracing::debug!(
        algorithm = cipher.uri(),
        id = data.attribute("Id").unwrap_or_default(),
        "decrypting EncryptedData"
    );

    let plaintext = cipher.decrypt(&session_key, &ciphertext)?;
    let text = String::from_utf8(plaintext)
        .map_err(|_| SamlError::Decryption("plaintext is not UTF-8".to_string()))?;
    Ok(strip_prolog(&text).to_string())
}

fn content_cipher(data: Node<'_, '_>) -> SamlResult<ContentCipher> {
    let uri = child(data, XMLENC_NS, "EncryptionMethod")
        .and_then(|m| m.attribute("Algorithm"))
        .ok_or_else(|| {
            SamlError::Decryption("EncryptedData has no EncryptionMethod".to_string())
        })?;
    ContentCipher::from_uri(uri).ok_or_else(|| SamlError::UnsupportedAlgorithm(uri.to_string()))
}

fn key_transport(encrypted_key: Node<'_, '_>) -> SamlResult<KeyTransport> {
    let method = child(encrypted_key, XMLENC_NS, "EncryptionMethod").ok_or_else(|| {
        SamlError::Decryption("EncryptedKey has no EncryptionMethod".to_string())
    })?;
    let uri = method.attribute("Algorithm").unwrap_or_default();
    let digest = child(method, XMLDSIG_NS, "DigestMethod").and_then(|d| d.attribute("Algorithm"));
    let mgf = child(method, XMLENC11_NS, "MGF").and_then(|m| m.attribute("Algorithm"));

    let label = match child(method, XMLENC_NS, "OAEPparams") {
        Some(params) => {
            let bytes = decode64(&text_content(params))?;
            Some(String::from_utf8(bytes).map_err(|_| {
                SamlError::UnsupportedAlgorithm("non-UTF-8 OAEPparams".to_string())
            })?)
        }
        None => None,
    };

    Ok(KeyTransport::resolve(uri, digest, mgf)?.with_label(label))
}

fn cipher_value(node: Node<'_, '_>) -> SamlResult<Vec<u8>> {
    let cipher_data = child(node, XMLENC_NS, "CipherData")
        .ok_or_else(|| SamlError::Decryption("missing CipherData".to_string()))?;
    if child(cipher_data, XMLENC_NS, "CipherReference").is_some() {
        return Err(SamlError::UnsupportedAlgorithm("CipherReference".to_string()));
    }
    let value = child(cipher_data, XMLENC_NS, "CipherValue")
        .ok_or_else(|| SamlError::Decryption("missing CipherValue".to_string()))?;
    decode64(&text_content(value))
}

/// Finds the `xenc:EncryptedKey` holding the session key for `data`.
///
/// Looks, in order, inside the data's `ds:KeyInfo`, at the target of a
/// `ds:RetrievalMethod`, for a key whose `ReferenceList` names the data, and
/// among the data's siblings.
pub fn locate_encrypted_key<'a, 'i>(doc: &'a Document<'i>, data: Node<'a, 'i>) -> Option<Node<'a, 'i>> {
    let key_info = child(data, XMLDSIG_NS, "KeyInfo");

    if let Some(found) = key_info.and_then(|info| child(info, XMLENC_NS, "EncryptedKey")) {
        return Some(found);
    }

    let all_keys = || {
        doc.descendants()
            .filter(|n| is_element(*n, XMLENC_NS, "EncryptedKey"))
    };

    let retrieval = key_info
        .and_then(|info| child(info, XMLDSIG_NS, "RetrievalMethod"))
        .and_then(|m| m.attribute("URI"))
        .and_then(|uri| uri.strip_prefix('#'));
    if let Some(id) = retrieval {
        if let Some(found) = all_keys().find(|k| k.attribute("Id") == Some(id)) {
            return Some(found);
        }
    }

    if let Some(id) = data.attribute("Id") {
        let referenced = all_keys().find(|k| {
            child(*k, XMLENC_NS, "ReferenceList").is_some_and(|list| {
                list.children()
                    .filter(|r| is_element(*r, XMLENC_NS, "DataReference"))
                    .any(|r| r.attribute("URI").and_then(|u| u.strip_prefix('#')) == Some(id))
            })
        });
        if referenced.is_some() {
            return referenced;
        }
    }

    data.parent_element()
        .and_then(|parent| child(parent, XMLENC_NS, "EncryptedKey"))
}

/// Drops a leading byte order mark and XML declaration.
fn strip_prolog(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}');
    if text.starts_with("<?xml") {
        if let Some(end) = text.find("?>") {
            return text[end + 2..].trim_start();
        }
    }
    text
}
