//! Schema cache tests.

use std::sync::{Arc, Barrier};
use std::thread;

use samlsso::{SamlError, SamlMessage, SchemaCache, SchemaSource};

use crate::common::{response, ASSERTION};

/// Tests that concurrent first validations compile the schema once.
#[test]
fn test_concurrent_first_use() -> anyhow::Result<()> {
    let cache = Arc::new(SchemaCache::new());
    let barrier = Arc::new(Barrier::new(8));
    let xml = response(ASSERTION);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            let xml = xml.clone();
            thread::spawn(move || {
                barrier.wait();
                let valid = SamlMessage::with_cache(Arc::clone(&cache)).valid_saml(&xml, true);
                (cache.schema(), valid)
            })
        })
        .collect();

    let mut schemas = Vec::new();
    for handle in handles {
        let (schema, valid) = handle.join().map_err(|_| anyhow::anyhow!("thread panicked"))?;
        assert!(valid?);
        schemas.push(schema?);
    }

    assert_eq!(cache.compilations(), 1);
    assert!(schemas.iter().all(|s| Arc::ptr_eq(s, &schemas[0])));
    Ok(())
}

/// Tests loading the schema files from a directory.
#[test]
fn test_directory_source() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../crates/samlsso/schemas");
    for file in [
        "saml-schema-protocol-2.0.xsd",
        "saml-schema-assertion-2.0.xsd",
        "xmldsig-core-schema.xsd",
        "xenc-schema.xsd",
    ] {
        std::fs::copy(format!("{root}/{file}"), dir.path().join(file))?;
    }

    let cache = Arc::new(SchemaCache::with_source(SchemaSource::Directory(dir.path().to_path_buf())));
    let message = SamlMessage::with_cache(Arc::clone(&cache));
    assert!(message.valid_saml(&response(ASSERTION), false)?);
    assert!(cache.is_initialized());
    Ok(())
}

/// Tests that an unloadable schema fails strict validation only.
#[test]
fn test_unloadable_schema_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cache = Arc::new(SchemaCache::with_source(SchemaSource::Directory(dir.path().to_path_buf())));
    let message = SamlMessage::with_cache(Arc::clone(&cache));
    let xml = response(ASSERTION);

    assert!(!message.valid_saml(&xml, true)?);
    let err = message.valid_saml(&xml, false).expect_err("strict validation raises");
    assert!(matches!(err, SamlError::Schema(_)), "{err}");
    assert!(!cache.is_initialized());
    Ok(())
}
