//! End-to-End Integration Tests
//!
//! These tests drive the SAML message core the way a service provider does:
//! wire text in, decrypted and validated assertion documents out.

mod common;
mod codec_pipeline;
mod decryption;
mod schema_cache;
