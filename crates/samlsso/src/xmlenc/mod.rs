//! XML Encryption (decryption side).
//!
//! Supports the combinations SAML identity providers emit for encrypted
//! assertions:
//!
//! - **Content**: AES-CBC and Triple DES CBC (XML Encryption 1.0), AES-GCM
//!   (XML Encryption 1.1)
//! - **Key transport**: RSA-OAEP (MGF1P and the 1.1 `rsa-oaep` form) and
//!   RSA PKCS#1 v1.5
//!
//! The session key is found through `ds:KeyInfo`, a `ds:RetrievalMethod`, a
//! `xenc:ReferenceList`, or as a sibling `xenc:EncryptedKey`.

mod algorithm;
mod document;
mod key;

pub use algorithm::{ContentCipher, KeyTransport, OaepDigest};
pub use document::{decrypt_document, decrypt_element, locate_encrypted_key};
pub use key::DecryptionKey;
