//! XML helpers shared by decryption and validation.
//!
//! Untrusted text first goes through libxml2, which rejects malformed input
//! and documents nested deeper than 256 elements before any tree walk
//! happens. The `roxmltree` view is used where byte ranges into the source
//! text are needed; rewriting is done by splicing text at those ranges.

mod edit;

pub use edit::{splice, Edit};

use libxml::parser::{Parser, ParserOptions};
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{SamlError, SamlResult};

/// Parses untrusted XML into a libxml2 document.
///
/// Recovery and network access are off, so malformed or too deeply nested
/// text is an [`SamlError::XmlParse`].
pub fn parse_dom(text: &str) -> SamlResult<libxml::tree::Document> {
    let options = ParserOptions {
        recover: false,
        no_net: true,
        ..ParserOptions::default()
    };
    Parser::default()
        .parse_string_with_options(text, options)
        .map_err(|err| SamlError::XmlParse(format!("document is not well-formed XML ({err:?})")))
}

/// Parses untrusted XML into a read-only tree with source ranges.
///
/// The text must pass [`parse_dom`] first. Documents carrying a DTD are
/// rejected.
pub fn parse(text: &str) -> SamlResult<Document<'_>> {
    parse_dom(text)?;
    let options = ParsingOptions {
        allow_dtd: false,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// Collapses every whitespace run to a single space and trims both ends.
#[must_use]
pub fn squish(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true if `node` is the element `{namespace}local`.
#[must_use]
pub fn is_element(node: Node<'_, '_>, namespace: &str, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(namespace)
}

/// Returns the first child element `{namespace}local`.
#[must_use]
pub fn child<'a, 'i>(node: Node<'a, 'i>, namespace: &str, local: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|c| is_element(*c, namespace, local))
}

/// Returns the concatenated text of `node` and its descendants.
#[must_use]
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
