//! SAML 2.0 and XML Encryption constants shared across the crate.

mod constants;

pub use constants::*;
