//! Common test utilities and fixtures.

use std::io::Write;
use std::sync::OnceLock;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::rand_core::{OsRng, RngCore};
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey};
use sha1::Sha1;
use tempfile::NamedTempFile;

use samlsso::codec::encode64;
use samlsso::types::{encrypted_data_types, encryption_algorithms, key_transport_algorithms, XMLDSIG_NS, XMLENC_NS};

/// A signed-in user's assertion.
pub const ASSERTION: &str = concat!(
    r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_a7" Version="2.0" IssueInstant="2024-03-01T12:00:00Z">"#,
    r#"<saml:Issuer>https://idp.example.org/saml</saml:Issuer>"#,
    r#"<saml:Subject><saml:NameID Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress">alice@example.org</saml:NameID>"#,
    r#"<saml:SubjectConfirmation Method="urn:oasis:names:tc:SAML:2.0:cm:bearer">"#,
    r#"<saml:SubjectConfirmationData NotOnOrAfter="2024-03-01T12:05:00Z" Recipient="https://sp.example.org/acs" InResponseTo="_req1"/>"#,
    r#"</saml:SubjectConfirmation></saml:Subject>"#,
    r#"<saml:Conditions NotBefore="2024-03-01T11:59:00Z" NotOnOrAfter="2024-03-01T12:05:00Z">"#,
    r#"<saml:AudienceRestriction><saml:Audience>https://sp.example.org</saml:Audience></saml:AudienceRestriction>"#,
    r#"</saml:Conditions>"#,
    r#"<saml:AuthnStatement AuthnInstant="2024-03-01T12:00:00Z" SessionIndex="_s1">"#,
    r#"<saml:AuthnContext><saml:AuthnContextClassRef>urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport</saml:AuthnContextClassRef></saml:AuthnContext>"#,
    r#"</saml:AuthnStatement>"#,
    r#"</saml:Assertion>"#
);

/// Builds a successful response around `assertion`.
pub fn response(assertion: &str) -> String {
    format!(
        concat!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" "#,
            r#"xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" "#,
            r#"ID="_resp1" InResponseTo="_req1" Version="2.0" IssueInstant="2024-03-01T12:00:00Z" "#,
            r#"Destination="https://sp.example.org/acs">"#,
            "\n  <saml:Issuer>https://idp.example.org/saml</saml:Issuer>\n",
            r#"  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>"#,
            "\n  {}\n",
            "</samlp:Response>"
        ),
        assertion
    )
}

/// Installs a test subscriber once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("samlsso=debug")
        .with_test_writer()
        .try_init();
}

/// The service provider's key pair, generated on first use.
pub fn sp_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).expect("RSA key generation"))
}

/// Writes the service provider key to a PKCS#8 PEM file.
pub fn sp_key_file() -> anyhow::Result<NamedTempFile> {
    let pem = sp_key().to_pkcs8_pem(LineEnding::LF)?;
    let mut file = NamedTempFile::new()?;
    file.write_all(pem.as_bytes())?;
    Ok(file)
}

/// Session key and data algorithm pairs the identity provider may use.
#[derive(Debug, Clone, Copy)]
pub enum Scheme {
    /// AES-128-GCM content, RSA-OAEP key transport.
    Aes128GcmOaep,
    /// AES-256-CBC content, RSA PKCS#1 v1.5 key transport.
    Aes256CbcPkcs1,
}

/// Encrypts `assertion` for the service provider key and wraps it in a
/// `saml:EncryptedAssertion` with the key inside `ds:KeyInfo`.
pub fn encrypt_assertion(assertion: &str, scheme: Scheme) -> anyhow::Result<String> {
    let public = sp_key().to_public_key();
    let (data_algorithm, key_algorithm, ciphertext, wrapped) = match scheme {
        Scheme::Aes128GcmOaep => {
            let key = random_bytes(16);
            let nonce = random_bytes(12);
            let body = Aes128Gcm::new_from_slice(&key)
                .map_err(|e| anyhow::anyhow!("AES-GCM key: {e}"))?
                .encrypt(Nonce::from_slice(&nonce), assertion.as_bytes())
                .map_err(|e| anyhow::anyhow!("GCM encryption: {e}"))?;
            (
                encryption_algorithms::AES128_GCM,
                key_transport_algorithms::RSA_OAEP_MGF1P,
                [nonce, body].concat(),
                public.encrypt(&mut OsRng, Oaep::new::<Sha1>(), &key)?,
            )
        }
        Scheme::Aes256CbcPkcs1 => {
            let key = random_bytes(32);
            let iv = random_bytes(16);
            let len = assertion.len();
            let mut buf = assertion.as_bytes().to_vec();
            buf.resize(len + 16, 0);
            let body = cbc::Encryptor::<aes::Aes256>::new_from_slices(&key, &iv)
                .map_err(|e| anyhow::anyhow!("AES-CBC key: {e}"))?
                .encrypt_padded_mut::<Pkcs7>(&mut buf, len)
                .map_err(|e| anyhow::anyhow!("AES-CBC padding: {e:?}"))?
                .to_vec();
            (
                encryption_algorithms::AES256_CBC,
                key_transport_algorithms::RSA_1_5,
                [iv, body].concat(),
                public.encrypt(&mut OsRng, Pkcs1v15Encrypt, &key)?,
            )
        }
    };

    Ok(format!(
        concat!(
            "<saml:EncryptedAssertion>",
            r#"<xenc:EncryptedData xmlns:xenc="{enc}" Type="{ty}">"#,
            r#"<xenc:EncryptionMethod Algorithm="{data}"/>"#,
            r#"<ds:KeyInfo xmlns:ds="{dsig}"><xenc:EncryptedKey>"#,
            r#"<xenc:EncryptionMethod Algorithm="{transport}"/>"#,
            "<xenc:CipherData><xenc:CipherValue>{wrapped}</xenc:CipherValue></xenc:CipherData>",
            "</xenc:EncryptedKey></ds:KeyInfo>",
            "<xenc:CipherData><xenc:CipherValue>{value}</xenc:CipherValue></xenc:CipherData>",
            "</xenc:EncryptedData>",
            "</saml:EncryptedAssertion>"
        ),
        enc = XMLENC_NS,
        ty = encrypted_data_types::ELEMENT,
        data = data_algorithm,
        dsig = XMLDSIG_NS,
        transport = key_algorithm,
        wrapped = encode64(wrapped),
        value = encode64(ciphertext),
    ))
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
