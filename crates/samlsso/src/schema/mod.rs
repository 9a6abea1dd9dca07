//! SAML 2.0 protocol schema.
//!
//! The protocol schema and its imports (assertion, XML Signature and XML
//! Encryption) ship with the crate or are read from a directory, and are
//! compiled by libxml2. [`SchemaCache`] holds the one compiled copy a
//! process shares.
//!
//! libxml2 schema and validation contexts cannot leave the thread that
//! created them, so a compiled [`Schema`] is owned by a dedicated thread and
//! documents are sent to it as text. Validation requests are served in
//! arrival order.
//!
//! # Example
//!
//! ```
//! use samlsso::schema::Schema;
//!
//! let schema = Schema::bundled().unwrap();
//! let violations = schema
//!     .validate_str(r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"/>"#)
//!     .unwrap();
//! assert!(violations[0].message.contains("'ID' is required"));
//! ```

mod cache;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use libxml::error::StructuredError;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};

pub use cache::SchemaCache;

use crate::error::{SamlError, SamlResult};
use crate::types::{
    ASSERTION_SCHEMA_FILE, PROTOCOL_SCHEMA_FILE, XMLDSIG_SCHEMA_FILE, XMLENC_SCHEMA_FILE,
};
use crate::xml;

/// Schema files embedded in the crate, by file name.
pub const BUNDLED: [(&str, &str); 4] = [
    (
        PROTOCOL_SCHEMA_FILE,
        include_str!("../../schemas/saml-schema-protocol-2.0.xsd"),
    ),
    (
        ASSERTION_SCHEMA_FILE,
        include_str!("../../schemas/saml-schema-assertion-2.0.xsd"),
    ),
    (
        XMLDSIG_SCHEMA_FILE,
        include_str!("../../schemas/xmldsig-core-schema.xsd"),
    ),
    (
        XMLENC_SCHEMA_FILE,
        include_str!("../../schemas/xenc-schema.xsd"),
    ),
];

/// Where schema files are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaSource {
    /// The copies embedded in the crate.
    #[default]
    Bundled,
    /// A directory holding `saml-schema-protocol-2.0.xsd` and the files it
    /// imports.
    Directory(PathBuf),
}

/// One schema violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based line of the offending element, 0 if libxml2 gave none.
    pub line: u32,
    /// Diagnostic text, as worded by libxml2.
    pub message: String,
}

impl Violation {
    fn from_libxml(error: &StructuredError) -> Self {
        Self {
            line: error
                .line
                .and_then(|line| u32::try_from(line).ok())
                .unwrap_or(0),
            message: error
                .message
                .as_deref()
                .map_or("document is not schema-valid", str::trim)
                .to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

struct Request {
    xml: String,
    reply: mpsc::SyncSender<SamlResult<Vec<Violation>>>,
}

/// A compiled protocol schema.
///
/// Validation sends the document to the thread owning the libxml2 context.
/// Dropping the handle stops that thread.
pub struct Schema {
    source: SchemaSource,
    requests: mpsc::Sender<Request>,
}

impl Schema {
    /// Compiles the protocol schema and its imports from `source`.
    pub fn compile(source: &SchemaSource) -> SamlResult<Self> {
        let (requests, inbox) = mpsc::channel::<Request>();
        let (ready, compiled) = mpsc::sync_channel(1);
        let worker_source = source.clone();

        thread::Builder::new()
            .name("samlsso-schema".to_string())
            .spawn(move || {
                let mut context = match load(&worker_source) {
                    Ok(context) => {
                        let _ = ready.send(Ok(()));
                        context
                    }
                    Err(err) => {
                        let _ = ready.send(Err(err));
                        return;
                    }
                };
                for request in inbox {
                    let _ = request.reply.send(validate_with(&mut context, &request.xml));
                }
            })
            .map_err(|err| SamlError::Schema(format!("cannot start schema thread: {err}")))?;

        compiled
            .recv()
            .map_err(|_| SamlError::Schema("schema thread stopped while compiling".to_string()))??;
        tracing::debug!(?source, "compiled SAML protocol schema");

        Ok(Self {
            source: source.clone(),
            requests,
        })
    }

    /// Compiles the embedded protocol schema.
    pub fn bundled() -> SamlResult<Self> {
        Self::compile(&SchemaSource::Bundled)
    }

    /// Parses and validates `xml`, returning every violation libxml2 reports
    /// in document order. An empty result means the document is valid.
    ///
    /// Text that is not well-formed XML is an [`SamlError::XmlParse`].
    pub fn validate_str(&self, xml: &str) -> SamlResult<Vec<Violation>> {
        let (reply, answer) = mpsc::sync_channel(1);
        self.requests
            .send(Request {
                xml: xml.to_string(),
                reply,
            })
            .map_err(|_| SamlError::Schema("schema thread has stopped".to_string()))?;
        answer
            .recv()
            .map_err(|_| SamlError::Schema("schema thread has stopped".to_string()))?
    }

    /// Where the schema files were read from.
    #[must_use]
    pub fn source(&self) -> &SchemaSource {
        &self.source
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

fn load(source: &SchemaSource) -> SamlResult<SchemaValidationContext> {
    match source {
        SchemaSource::Bundled => {
            let staged = stage_bundled()?;
            compile_file(&staged.path().join(PROTOCOL_SCHEMA_FILE))
        }
        SchemaSource::Directory(dir) => compile_file(&dir.join(PROTOCOL_SCHEMA_FILE)),
    }
}

/// libxml2 resolves `xs:import` locations against the importing file, so
/// the embedded copies are written side by side before compiling.
fn stage_bundled() -> SamlResult<tempfile::TempDir> {
    let staging_failed =
        |err: std::io::Error| SamlError::Schema(format!("cannot stage bundled schemas: {err}"));
    let dir = tempfile::Builder::new()
        .prefix("samlsso-schemas")
        .tempdir()
        .map_err(staging_failed)?;
    for (name, text) in BUNDLED {
        fs::write(dir.path().join(name), text).map_err(staging_failed)?;
    }
    Ok(dir)
}

fn compile_file(path: &Path) -> SamlResult<SchemaValidationContext> {
    if !path.is_file() {
        return Err(SamlError::Schema(format!("{} not found", path.display())));
    }
    let location = path
        .to_str()
        .ok_or_else(|| SamlError::Schema(format!("{} is not a UTF-8 path", path.display())))?;

    let mut parser = SchemaParserContext::from_file(location);
    SchemaValidationContext::from_parser(&mut parser).map_err(|errors| {
        let reasons: Vec<String> = errors
            .iter()
            .map(|error| Violation::from_libxml(error).message)
            .collect();
        SamlError::Schema(format!(
            "cannot compile {}: {}",
            path.display(),
            reasons.join("; ")
        ))
    })
}

fn validate_with(context: &mut SchemaValidationContext, xml: &str) -> SamlResult<Vec<Violation>> {
    let doc = xml::parse_dom(xml)?;
    match context.validate_document(&doc) {
        Ok(()) => Ok(Vec::new()),
        Err(errors) if errors.is_empty() => Ok(vec![Violation {
            line: 0,
            message: "document is not schema-valid".to_string(),
        }]),
        Err(errors) => Ok(errors.iter().map(Violation::from_libxml).collect()),
    }
}
