//! Process-wide compiled schema.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::{Schema, SchemaSource};
use crate::error::SamlResult;

static GLOBAL: SchemaCache = SchemaCache::new();

/// Holds the compiled protocol schema, built on first use.
///
/// Concurrent first calls compile the schema once; every caller receives
/// the same [`Arc`]. A failed compilation leaves the cache empty, so a later
/// call tries again.
pub struct SchemaCache {
    source: SchemaSource,
    schema: OnceLock<Arc<Schema>>,
    init: Mutex<()>,
    compilations: AtomicUsize,
}

impl SchemaCache {
    /// Creates an empty cache over the bundled schema files.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source: SchemaSource::Bundled,
            schema: OnceLock::new(),
            init: parking_lot::const_mutex(()),
            compilations: AtomicUsize::new(0),
        }
    }

    /// Creates an empty cache reading schema files from `source`.
    #[must_use]
    pub fn with_source(source: SchemaSource) -> Self {
        Self {
            source,
            ..Self::new()
        }
    }

    /// The cache shared by the whole process, over the bundled schema files.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the compiled schema, compiling it if this is the first call.
    pub fn schema(&self) -> SamlResult<Arc<Schema>> {
        if let Some(schema) = self.schema.get() {
            return Ok(Arc::clone(schema));
        }

        let _guard = self.init.lock();
        if let Some(schema) = self.schema.get() {
            return Ok(Arc::clone(schema));
        }

        self.compilations.fetch_add(1, Ordering::SeqCst);
        let schema = Arc::new(Schema::compile(&self.source)?);
        tracing::debug!(source = ?self.source, "SAML protocol schema cached");
        Ok(Arc::clone(self.schema.get_or_init(|| schema)))
    }

    /// Number of times compilation has been attempted.
    #[must_use]
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::SeqCst)
    }

    /// Returns true once a schema has been compiled.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.schema.get().is_some()
    }

    /// Where schema files are read from.
    #[must_use]
    pub fn source(&self) -> &SchemaSource {
        &self.source
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("source", &self.source)
            .field("initialized", &self.is_initialized())
            .field("compilations", &self.compilations())
            .finish()
    }
}
