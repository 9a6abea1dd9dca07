//! XML Encryption algorithm identifiers and the ciphers behind them.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{self, BlockDecryptMut, KeyIvInit};

use crate::error::{SamlError, SamlResult};
use crate::types::{digest_algorithms, encryption_algorithms, key_transport_algorithms, mgf_algorithms};

type Aes192Gcm = AesGcm<aes::Aes192, U12>;

/// GCM nonce length used by XML Encryption 1.1.
const GCM_IV_LEN: usize = 12;

/// GCM authentication tag length.
const GCM_TAG_LEN: usize = 16;

/// Symmetric algorithm protecting `xenc:EncryptedData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCipher {
    /// AES-128-CBC.
    Aes128Cbc,
    /// AES-192-CBC.
    Aes192Cbc,
    /// AES-256-CBC.
    Aes256Cbc,
    /// Triple DES (EDE3) CBC.
    TripleDesCbc,
    /// AES-128-GCM.
    Aes128Gcm,
    /// AES-192-GCM.
    Aes192Gcm,
    /// AES-256-GCM.
    Aes256Gcm,
}

impl ContentCipher {
    /// Parses an algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            encryption_algorithms::AES128_CBC => Some(Self::Aes128Cbc),
            encryption_algorithms::AES192_CBC => Some(Self::Aes192Cbc),
            encryption_algorithms::AES256_CBC => Some(Self::Aes256Cbc),
            encryption_algorithms::TRIPLEDES_CBC => Some(Self::TripleDesCbc),
            encryption_algorithms::AES128_GCM => Some(Self::Aes128Gcm),
            encryption_algorithms::AES192_GCM => Some(Self::Aes192Gcm),
            encryption_algorithms::AES256_GCM => Some(Self::Aes256Gcm),
            _ => None,
        }
    }

    /// Returns the URI for this algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Aes128Cbc => encryption_algorithms::AES128_CBC,
            Self::Aes192Cbc => encryption_algorithms::AES192_CBC,
            Self::Aes256Cbc => encryption_algorithms::AES256_CBC,
            Self::TripleDesCbc => encryption_algorithms::TRIPLEDES_CBC,
            Self::Aes128Gcm => encryption_algorithms::AES128_GCM,
            Self::Aes192Gcm => encryption_algorithms::AES192_GCM,
            Self::Aes256Gcm => encryption_algorithms::AES256_GCM,
        }
    }

    /// Returns the session key length in bytes.
    #[must_use]
    pub const fn key_len(&self) -> usize {
        match self {
            Self::Aes128Cbc | Self::Aes128Gcm => 16,
            Self::Aes192Cbc | Self::Aes192Gcm | Self::TripleDesCbc => 24,
            Self::Aes256Cbc | Self::Aes256Gcm => 32,
        }
    }

    /// Returns the length of the IV prefixed to the ciphertext.
    #[must_use]
    pub const fn iv_len(&self) -> usize {
        match self {
            Self::TripleDesCbc => 8,
            Self::Aes128Cbc | Self::Aes192Cbc | Self::Aes256Cbc => 16,
            Self::Aes128Gcm | Self::Aes192Gcm | Self::Aes256Gcm => GCM_IV_LEN,
        }
    }

    /// Decrypts `data`, which is the IV followed by the ciphertext (and, for
    /// GCM, the authentication tag).
    pub fn decrypt(&self, key: &[u8], data: &[u8]) -> SamlResult<Vec<u8>> {
        if key.len() != self.key_len() {
            return Err(SamlError::Decryption(format!(
                "{} needs a {}-byte key, got {}",
                self.uri(),
                self.key_len(),
                key.len()
            )));
        }
        match self {
            Self::Aes128Cbc => cbc_decrypt::<aes::Aes128>(key, self.iv_len(), data),
            Self::Aes192Cbc => cbc_decrypt::<aes::Aes192>(key, self.iv_len(), data),
            Self::Aes256Cbc => cbc_decrypt::<aes::Aes256>(key, self.iv_len(), data),
            Self::TripleDesCbc => cbc_decrypt::<des::TdesEde3>(key, self.iv_len(), data),
            Self::Aes128Gcm => gcm_decrypt::<Aes128Gcm>(key, data),
            Self::Aes192Gcm => gcm_decrypt::<Aes192Gcm>(key, data),
            Self::Aes256Gcm => gcm_decrypt::<Aes256Gcm>(key, data),
        }
    }
}

fn cbc_decrypt<C>(key: &[u8], block_len: usize, data: &[u8]) -> SamlResult<Vec<u8>>
where
    C: cipher::BlockCipher + BlockDecryptMut + KeyInit,
{
    if data.len() < block_len * 2 || data.len() % block_len != 0 {
        return Err(SamlError::Decryption(format!(
            "CBC ciphertext length {} is not a whole number of {block_len}-byte blocks after the IV",
            data.len()
        )));
    }
    let (iv, body) = data.split_at(block_len);
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| SamlError::Decryption("invalid key or IV length".to_string()))?;

    let mut buf = body.to_vec();
    let len = decryptor
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| SamlError::Decryption("CBC decryption failed".to_string()))?
        .len();
    buf.truncate(len);
    strip_padding(buf, block_len)
}

/// Removes XML Encryption block padding: the last byte is the pad length,
/// the other pad bytes are arbitrary.
fn strip_padding(mut buf: Vec<u8>, block_len: usize) -> SamlResult<Vec<u8>> {
    let pad = usize::from(buf.last().copied().unwrap_or(0));
    if pad == 0 || pad > block_len || pad > buf.len() {
        return Err(SamlError::Decryption("invalid block padding".to_string()));
    }
    buf.truncate(buf.len() - pad);
    Ok(buf)
}

fn gcm_decrypt<A>(key: &[u8], data: &[u8]) -> SamlResult<Vec<u8>>
where
    A: Aead + KeyInit,
{
    if data.len() < GCM_IV_LEN + GCM_TAG_LEN {
        return Err(SamlError::Decryption(format!(
            "GCM ciphertext too short: {} bytes",
            data.len()
        )));
    }
    let (iv, body) = data.split_at(GCM_IV_LEN);
    let cipher = A::new_from_slice(key)
        .map_err(|_| SamlError::Decryption("invalid key length".to_string()))?;
    cipher
        .decrypt(aes_gcm::aead::Nonce::<A>::from_slice(iv), body)
        .map_err(|_| SamlError::Decryption("GCM authentication failed".to_string()))
}

/// Hash function used by RSA-OAEP, for the label digest or MGF1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OaepDigest {
    /// SHA-1.
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl OaepDigest {
    /// Parses a `ds:DigestMethod` algorithm URI.
    #[must_use]
    pub fn from_digest_uri(uri: &str) -> Option<Self> {
        match uri {
            digest_algorithms::SHA1 => Some(Self::Sha1),
            digest_algorithms::SHA256 => Some(Self::Sha256),
            digest_algorithms::SHA384 => Some(Self::Sha384),
            digest_algorithms::SHA512 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Parses an `xenc11:MGF` algorithm URI.
    #[must_use]
    pub fn from_mgf_uri(uri: &str) -> Option<Self> {
        match uri {
            mgf_algorithms::MGF1_SHA1 => Some(Self::Sha1),
            mgf_algorithms::MGF1_SHA256 => Some(Self::Sha256),
            mgf_algorithms::MGF1_SHA384 => Some(Self::Sha384),
            mgf_algorithms::MGF1_SHA512 => Some(Self::Sha512),
            _ => None,
        }
    }
}

/// Algorithm wrapping the session key in `xenc:EncryptedKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTransport {
    /// RSA-OAEP.
    RsaOaep {
        /// Digest for the label hash.
        digest: OaepDigest,
        /// Digest for MGF1.
        mgf: OaepDigest,
        /// `xenc:OAEPparams`, if any.
        label: Option<String>,
    },
    /// RSA PKCS#1 v1.5.
    RsaPkcs1v15,
}

impl KeyTransport {
    /// Resolves a key transport from its URI and the optional digest and MGF
    /// URIs found inside `xenc:EncryptionMethod`.
    pub fn resolve(uri: &str, digest: Option<&str>, mgf: Option<&str>) -> SamlResult<Self> {
        let digest = digest
            .map(|d| {
                OaepDigest::from_digest_uri(d)
                    .ok_or_else(|| SamlError::UnsupportedAlgorithm(d.to_string()))
            })
            .transpose()?
            .unwrap_or_default();

        match uri {
            key_transport_algorithms::RSA_OAEP_MGF1P => Ok(Self::RsaOaep {
                digest,
                mgf: OaepDigest::Sha1,
                label: None,
            }),
            key_transport_algorithms::RSA_OAEP => {
                let mgf = mgf
                    .map(|m| {
                        OaepDigest::from_mgf_uri(m)
                            .ok_or_else(|| SamlError::UnsupportedAlgorithm(m.to_string()))
                    })
                    .transpose()?
                    .unwrap_or_default();
                Ok(Self::RsaOaep {
                    digest,
                    mgf,
                    label: None,
                })
            }
            key_transport_algorithms::RSA_1_5 => Ok(Self::RsaPkcs1v15),
            other => Err(SamlError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Sets the OAEP label. Ignored for PKCS#1 v1.5.
    #[must_use]
    pub fn with_label(self, label: Option<String>) -> Self {
        match self {
            Self::RsaOaep { digest, mgf, .. } => Self::RsaOaep { digest, mgf, label },
            other => other,
        }
    }
}
