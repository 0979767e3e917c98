//! Lenient, span-exact parsing frontends
//!
//! Both frontends produce a [`RawNode`] tree and never fail: anything they
//! cannot make sense of is either recovered from (tag soup) or surfaced as
//! a raw variant for the adapter to accept or reject explicitly.

pub mod css;
pub mod html;

use crate::document::Attr;
use crate::span::Span;

/// A node of the raw parse tree, before normalization.
#[derive(Debug, Clone)]
pub enum RawNode {
    /// An HTML element
    Element(RawElement),
    /// A text run (HTML)
    Text { text: String, span: Span },
    /// A comment (`<!-- -->` or `/* */`)
    Comment { text: String, span: Span },
    /// A doctype declaration; `literal` is the text between `<!` and `>`
    Doctype {
        literal: String,
        literal_span: Span,
        span: Span,
    },
    /// `<? ... ?>` — no node mapping exists, the adapter rejects it
    ProcessingInstruction { span: Span },
    /// `<![CDATA[ ... ]]>` — no node mapping exists, the adapter rejects it
    CdataSection { span: Span },
    /// A CSS style rule: selector plus declaration block
    StyleRule(RawStyleRule),
    /// A CSS at-rule — no node mapping exists, the adapter rejects it
    AtRule { name: String, span: Span },
    /// A CSS declaration (only appears inside a style rule block)
    Declaration(RawDeclaration),
}

impl RawNode {
    pub fn span(&self) -> Span {
        match self {
            RawNode::Element(e) => e.span,
            RawNode::Text { span, .. }
            | RawNode::Comment { span, .. }
            | RawNode::Doctype { span, .. }
            | RawNode::ProcessingInstruction { span }
            | RawNode::CdataSection { span }
            | RawNode::AtRule { span, .. } => *span,
            RawNode::StyleRule(r) => r.span,
            RawNode::Declaration(d) => d.span,
        }
    }
}

/// A raw HTML element with source casing and quoting preserved.
#[derive(Debug, Clone)]
pub struct RawElement {
    pub name: String,
    pub name_span: Span,
    pub close_name_span: Option<Span>,
    pub attrs: Vec<Attr>,
    pub children: Vec<RawNode>,
    pub span: Span,
    pub self_closing_slash: Option<Span>,
}

/// A raw CSS style rule.
#[derive(Debug, Clone)]
pub struct RawStyleRule {
    /// Selector text, trimmed
    pub selector: String,
    pub selector_span: Span,
    /// Declarations and comments inside the block, in order
    pub body: Vec<RawNode>,
    /// Selector start through closing brace
    pub span: Span,
}

/// A raw CSS declaration.
#[derive(Debug, Clone)]
pub struct RawDeclaration {
    pub property: String,
    pub property_span: Span,
    pub value: String,
    pub value_span: Span,
    /// `property` start through `value` end, excluding the semicolon
    pub span: Span,
    pub terminated: bool,
}
