//! SAML 2.0 SSO message core.
//!
//! This crate handles SAML protocol messages on their way in and out of a
//! Single Sign-On participant:
//!
//! - **Transport codec** - HTTP-Redirect wire text (URL escaping, Base64, raw
//!   DEFLATE) to XML and back, with auto-detection of the inbound depth
//! - **Decryption** - XML Encryption of `saml:EncryptedAssertion`, spliced
//!   back into the response as a plaintext `saml:Assertion`
//! - **Validation** - strict or soft checking against the SAML 2.0 protocol
//!   schema, compiled once per process
//!
//! # Architecture
//!
//! - [`codec`] - Wire encoding primitives and the depth-detecting decoder
//! - [`decrypt`] - Encrypted assertion splice
//! - [`xmlenc`] - XML Encryption algorithms and key handling
//! - [`schema`] - libxml2 schema compilation, validation and the schema cache
//! - [`validator`] - Strict and soft validation policy
//! - [`message`] - [`SamlMessage`], the facade over all of the above
//! - [`settings`] - Caller-supplied configuration
//! - [`error`] - Error types for SAML operations
//!
//! # Example
//!
//! ```rust
//! use samlsso::{SamlMessage, Settings};
//!
//! let message = SamlMessage::new();
//! let xml = r#"<samlp:LogoutResponse xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_1" Version="2.0" IssueInstant="2024-01-01T00:00:00Z"><samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status></samlp:LogoutResponse>"#;
//!
//! let wire = message.encode_raw_saml(xml, &Settings::default()).unwrap();
//! let decoded = message
//!     .decode_raw_saml(&samlsso::codec::unescape(&wire).unwrap())
//!     .unwrap();
//! assert!(message.valid_saml(&decoded, true).unwrap());
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [XML Encryption](https://www.w3.org/TR/xmlenc-core1/)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod decrypt;
pub mod error;
pub mod message;
pub mod schema;
pub mod settings;
pub mod types;
pub mod validator;
pub mod xml;
pub mod xmlenc;


pub use decrypt::Decryptor;
pub use error::{SamlError, SamlResult, ValidationError};
pub use message::SamlMessage;
pub use schema::{Schema, SchemaCache, SchemaSource, Violation};
pub use settings::Settings;
pub use validator::Validator;
