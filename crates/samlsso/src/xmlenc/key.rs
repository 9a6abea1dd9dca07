//! RSA private key used to unwrap XML Encryption session keys.

use std::fmt;
use std::path::Path;

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey};
use sha1::Sha1;
use sha2::digest::{Digest, DynDigest};
use sha2::{Sha256, Sha384, Sha512};

use super::algorithm::{KeyTransport, OaepDigest};
use crate::error::{SamlError, SamlResult};

/// An RSA private key for decrypting encrypted assertions.
#[derive(Clone)]
pub struct DecryptionKey {
    inner: RsaPrivateKey,
}

impl DecryptionKey {
    /// Wraps an already parsed key.
    #[must_use]
    pub fn new(inner: RsaPrivateKey) -> Self {
        Self { inner }
    }

    /// Parses a PEM key, either PKCS#8 (`PRIVATE KEY`) or PKCS#1
    /// (`RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str) -> SamlResult<Self> {
        parse_pem(pem)
            .map(Self::new)
            .map_err(|reason| SamlError::KeyLoad { path: None, reason })
    }

    /// Reads and parses a PEM key file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> SamlResult<Self> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| SamlError::KeyLoad {
            path: Some(path.to_path_buf()),
            reason: e.to_string(),
        })?;
        let inner = parse_pem(&pem).map_err(|reason| SamlError::KeyLoad {
            path: Some(path.to_path_buf()),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded decryption key");
        Ok(Self::new(inner))
    }

    /// Unwraps an encrypted session key.
    pub fn unwrap_key(&self, transport: &KeyTransport, wrapped: &[u8]) -> SamlResult<Vec<u8>> {
        let result = match transport {
            KeyTransport::RsaOaep { digest, mgf, label } => {
                let mut padding = oaep(*digest, *mgf);
                padding.label.clone_from(label);
                self.inner.decrypt(padding, wrapped)
            }
            KeyTransport::RsaPkcs1v15 => self.inner.decrypt(Pkcs1v15Encrypt, wrapped),
        };
        result.map_err(|e| SamlError::Decryption(format!("session key unwrap failed: {e}")))
    }

    /// Returns the underlying RSA key.
    #[must_use]
    pub fn as_rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptionKey").finish_non_exhaustive()
    }
}

fn parse_pem(pem: &str) -> Result<RsaPrivateKey, String> {
    RsaPrivateKey::from_pkcs8_pem(pem).or_else(|pkcs8| {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|pkcs1| format!("{pkcs8}; {pkcs1}"))
    })
}

fn oaep(digest: OaepDigest, mgf: OaepDigest) -> Oaep {
    match digest {
        OaepDigest::Sha1 => oaep_with::<Sha1>(mgf),
        OaepDigest::Sha256 => oaep_with::<Sha256>(mgf),
        OaepDigest::Sha384 => oaep_with::<Sha384>(mgf),
        OaepDigest::Sha512 => oaep_with::<Sha512>(mgf),
    }
}

fn oaep_with<D>(mgf: OaepDigest) -> Oaep
where
    D: 'static + Digest + DynDigest + Send + Sync,
{
    match mgf {
        OaepDigest::Sha1 => Oaep::new_with_mgf_hash::<D, Sha1>(),
        OaepDigest::Sha256 => Oaep::new_with_mgf_hash::<D, Sha256>(),
        OaepDigest::Sha384 => Oaep::new_with_mgf_hash::<D, Sha384>(),
        OaepDigest::Sha512 => Oaep::new_with_mgf_hash::<D, Sha512>(),
    }
}
