//! SAML 2.0 and XML Encryption constants.
//!
//! Namespace URIs, status codes and the algorithm identifiers understood by
//! the decryptor.

/// SAML 2.0 assertion namespace URI.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// SAML 2.0 protocol namespace URI.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// XML Digital Signature namespace URI.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XML Encryption namespace URI.
pub const XMLENC_NS: &str = "http://www.w3.org/2001/04/xmlenc#";

/// XML Encryption 1.1 namespace URI.
pub const XMLENC11_NS: &str = "http://www.w3.org/2009/xmlenc11#";

/// File name of the bundled SAML 2.0 protocol schema.
pub const PROTOCOL_SCHEMA_FILE: &str = "saml-schema-protocol-2.0.xsd";

/// File name of the bundled SAML 2.0 assertion schema.
pub const ASSERTION_SCHEMA_FILE: &str = "saml-schema-assertion-2.0.xsd";

/// File name of the bundled XML Signature schema.
pub const XMLDSIG_SCHEMA_FILE: &str = "xmldsig-core-schema.xsd";

/// File name of the bundled XML Encryption schema.
pub const XMLENC_SCHEMA_FILE: &str = "xenc-schema.xsd";

// ============================================================================
// Status Codes
// ============================================================================

/// Top-level SAML status codes.
pub mod status_codes {
    /// Success status code.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

    /// Requester error status code.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// Responder error status code.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";

    /// Version mismatch status code.
    pub const VERSION_MISMATCH: &str = "urn:oasis:names:tc:SAML:2.0:status:VersionMismatch";
}

// ============================================================================
// XML Encryption Algorithms
// ============================================================================

/// Block encryption algorithms for `xenc:EncryptedData`.
pub mod encryption_algorithms {
    /// AES-128 in CBC mode.
    pub const AES128_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes128-cbc";

    /// AES-192 in CBC mode.
    pub const AES192_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes192-cbc";

    /// AES-256 in CBC mode.
    pub const AES256_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";

    /// Triple DES in CBC mode.
    pub const TRIPLEDES_CBC: &str = "http://www.w3.org/2001/04/xmlenc#tripledes-cbc";

    /// AES-128 in GCM mode.
    pub const AES128_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes128-gcm";

    /// AES-192 in GCM mode.
    pub const AES192_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes192-gcm";

    /// AES-256 in GCM mode.
    pub const AES256_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes256-gcm";
}

/// Key transport algorithms for `xenc:EncryptedKey`.
pub mod key_transport_algorithms {
    /// RSA-OAEP with MGF1/SHA-1.
    pub const RSA_OAEP_MGF1P: &str = "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p";

    /// RSA-OAEP with a selectable mask generation function.
    pub const RSA_OAEP: &str = "http://www.w3.org/2009/xmlenc11#rsa-oaep";

    /// RSA PKCS#1 v1.5 (legacy).
    pub const RSA_1_5: &str = "http://www.w3.org/2001/04/xmlenc#rsa-1_5";
}

/// Digest algorithms usable as the OAEP digest.
pub mod digest_algorithms {
    /// SHA-256 digest algorithm.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// SHA-384 digest algorithm.
    pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";

    /// SHA-512 digest algorithm.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

    /// SHA-1 digest algorithm.
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
}

/// Mask generation functions for XML Encryption 1.1 RSA-OAEP.
pub mod mgf_algorithms {
    /// MGF1 with SHA-1.
    pub const MGF1_SHA1: &str = "http://www.w3.org/2009/xmlenc11#mgf1sha1";

    /// MGF1 with SHA-256.
    pub const MGF1_SHA256: &str = "http://www.w3.org/2009/xmlenc11#mgf1sha256";

    /// MGF1 with SHA-384.
    pub const MGF1_SHA384: &str = "http://www.w3.org/2009/xmlenc11#mgf1sha384";

    /// MGF1 with SHA-512.
    pub const MGF1_SHA512: &str = "http://www.w3.org/2009/xmlenc11#mgf1sha512";
}

/// `Type` attribute values of `xenc:EncryptedData`.
pub mod encrypted_data_types {
    /// The ciphertext is a whole element.
    pub const ELEMENT: &str = "http://www.w3.org/2001/04/xmlenc#Element";

    /// The ciphertext is element content.
    pub const CONTENT: &str = "http://www.w3.org/2001/04/xmlenc#Content";
}
