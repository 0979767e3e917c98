//! Node model adapter
//!
//! Bridges the raw parse trees produced by the `syntax` frontends into the
//! normalized [`Document`] the traversal engine walks. The transform is
//! pure and preserves every source span untouched. Raw constructs with no
//! mapping in the node model are rejected with an explicit error, never
//! silently dropped.

use crate::document::{Comment, Declaration, Document, Element, Language, Node, Text};
use crate::span::Span;
use crate::syntax::RawNode;
use thiserror::Error;

/// Name given to the synthetic element that carries an HTML doctype.
pub const DOCTYPE_NAME: &str = "!doctype";

/// Error produced when the raw tree contains a construct the node model
/// cannot represent. Fatal for the document being normalized.
#[derive(Debug, Clone, Error)]
#[error("{language} construct '{construct}' at offset {offset} has no node mapping")]
pub struct AdapterError {
    pub language: Language,
    pub construct: String,
    pub offset: usize,
}

/// Normalize a raw parse tree into a [`Document`].
pub fn normalize(raw: Vec<RawNode>, language: Language) -> Result<Document, AdapterError> {
    let mut has_doctype = false;
    let mut seen_element = false;
    let mut nodes = Vec::with_capacity(raw.len());
    for raw_node in raw {
        // A doctype only counts when it opens the document, before the
        // root element; one trailing after markup does not.
        match &raw_node {
            RawNode::Doctype { .. } if !seen_element => has_doctype = true,
            RawNode::Element(_) | RawNode::StyleRule(_) => seen_element = true,
            _ => {}
        }
        nodes.push(convert(raw_node, language)?);
    }
    Ok(Document {
        language,
        nodes,
        has_doctype,
    })
}

fn convert(raw: RawNode, language: Language) -> Result<Node, AdapterError> {
    match raw {
        RawNode::Element(el) => {
            let mut children = Vec::with_capacity(el.children.len());
            for child in el.children {
                children.push(convert(child, language)?);
            }
            Ok(Node::Element(Element {
                name: el.name,
                name_span: el.name_span,
                close_name_span: el.close_name_span,
                attrs: el.attrs,
                children,
                span: el.span,
                self_closing_slash: el.self_closing_slash,
            }))
        }
        RawNode::Text { text, span } => Ok(Node::Text(Text { text, span })),
        RawNode::Comment { text, span } => Ok(Node::Comment(Comment { text, span })),
        RawNode::Doctype {
            literal,
            literal_span,
            span,
        } => Ok(Node::Element(Element {
            name: DOCTYPE_NAME.to_string(),
            name_span: literal_span,
            close_name_span: None,
            attrs: Vec::new(),
            children: vec![Node::Text(Text {
                text: literal,
                span: literal_span,
            })],
            span,
            self_closing_slash: None,
        })),
        RawNode::StyleRule(rule) => {
            let mut children = Vec::with_capacity(rule.body.len());
            for child in rule.body {
                children.push(convert(child, language)?);
            }
            Ok(Node::Element(Element {
                name: rule.selector,
                name_span: rule.selector_span,
                close_name_span: None,
                attrs: Vec::new(),
                children,
                span: rule.span,
                self_closing_slash: None,
            }))
        }
        RawNode::Declaration(d) => Ok(Node::Declaration(Declaration {
            property: d.property,
            property_span: d.property_span,
            value: d.value,
            value_span: d.value_span,
            span: d.span,
            terminated: d.terminated,
        })),
        RawNode::ProcessingInstruction { span } => Err(unsupported(
            language,
            "processing instruction",
            span,
        )),
        RawNode::CdataSection { span } => Err(unsupported(language, "CDATA section", span)),
        RawNode::AtRule { name, span } => {
            Err(unsupported(language, &format!("@{} at-rule", name), span))
        }
    }
}

fn unsupported(language: Language, construct: &str, span: Span) -> AdapterError {
    AdapterError {
        language,
        construct: construct.to_string(),
        offset: span.start,
    }
}
