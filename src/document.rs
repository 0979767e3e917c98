//! Normalized document tree consumed by the traversal engine

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source language of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Html => write!(f, "html"),
            Language::Css => write!(f, "css"),
        }
    }
}

/// How an attribute value was quoted in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Double,
    Single,
    /// Bare value with no quotes at all
    Unquoted,
}

/// A single element attribute, with the sub-spans fix rewrites need.
#[derive(Debug, Clone)]
pub struct Attr {
    /// Attribute name, original casing preserved
    pub name: String,
    /// Attribute value, `None` for valueless (boolean-style) attributes
    pub value: Option<String>,
    /// Span of the whole `name="value"` run
    pub span: Span,
    /// Span of just the name
    pub name_span: Span,
    /// Span of the value text (inside any quotes)
    pub value_span: Option<Span>,
    /// Quoting used for the value, if a value is present
    pub quote: Option<QuoteKind>,
}

/// An element node.
///
/// For HTML this is a tag; for CSS a style rule is modeled as an element
/// whose `name` is the selector text and whose children are declarations.
/// An HTML doctype is modeled as an element named `!doctype` whose single
/// text child holds the literal between `<!` and `>`.
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag name (or selector text), original casing preserved
    pub name: String,
    /// Span of the name in the opening tag (or of the selector)
    pub name_span: Span,
    /// Span of the name inside the closing tag, when one exists
    pub close_name_span: Option<Span>,
    /// Ordered attributes as written
    pub attrs: Vec<Attr>,
    /// Ordered children in document order
    pub children: Vec<Node>,
    /// Span of the whole element, opening tag through closing tag
    pub span: Span,
    /// Span of the `/` in a self-closed tag like `<br />`
    pub self_closing_slash: Option<Span>,
}

impl Element {
    /// Look up an attribute value by name, case-insensitively
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Whether this element is the synthetic doctype node
    pub fn is_doctype(&self) -> bool {
        self.name == "!doctype"
    }
}

/// A CSS property declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Property name, original casing preserved
    pub property: String,
    pub property_span: Span,
    /// Raw value text as written (trimmed)
    pub value: String,
    pub value_span: Span,
    /// Span of the whole `property: value` run, excluding the semicolon
    pub span: Span,
    /// Whether the declaration was terminated with a semicolon
    pub terminated: bool,
}

/// A comment node (`<!-- -->` or `/* */`).
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A text run.
#[derive(Debug, Clone)]
pub struct Text {
    pub text: String,
    pub span: Span,
}

/// A single structural unit of a parsed document.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Declaration(Declaration),
    Comment(Comment),
    Text(Text),
}

impl Node {
    /// Source span of the node
    pub fn span(&self) -> Span {
        match self {
            Node::Element(e) => e.span,
            Node::Declaration(d) => d.span,
            Node::Comment(c) => c.span,
            Node::Text(t) => t.span,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(d) => Some(d),
            _ => None,
        }
    }
}

/// A parsed, normalized document. Immutable once built by the adapter.
#[derive(Debug, Clone)]
pub struct Document {
    pub language: Language,
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
    /// Whether the document opened with a doctype before its root
    /// element (always false for CSS)
    pub has_doctype: bool,
}

impl Document {
    /// Total node count, all depths
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    Node::Element(e) => 1 + count(&e.children),
                    _ => 1,
                })
                .sum()
        }
        count(&self.nodes)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
