//! Hand-written, forgiving HTML tokenizer
//!
//! Accepts the tag soup this linter exists to flag: uppercase tag names,
//! unquoted or single-quoted attribute values, valueless attributes,
//! stray closing tags and unclosed elements. Every produced span is an
//! exact byte range into the input, which the fixer depends on.

use super::{RawElement, RawNode};
use crate::document::{Attr, QuoteKind};
use crate::span::Span;

/// Elements that never take a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `name` is a void element (case-insensitive).
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(name))
}

/// Parse HTML source into a raw node tree. Never fails; malformed input
/// degrades to text runs or force-closed elements.
pub fn parse(source: &str) -> Vec<RawNode> {
    Tokenizer::new(source).run()
}

struct Tokenizer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Open elements, innermost last
    stack: Vec<RawElement>,
    /// Finished top-level nodes
    top: Vec<RawNode>,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            stack: Vec::new(),
            top: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RawNode> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' {
                self.markup();
            } else {
                self.text();
            }
        }
        // Force-close anything left open at end of input
        let end = self.src.len();
        while let Some(mut el) = self.stack.pop() {
            el.span.end = end;
            self.emit(RawNode::Element(el));
        }
        self.top
    }

    fn emit(&mut self, node: RawNode) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        } else {
            self.top.push(node);
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.src[from..].find(needle).map(|i| from + i)
    }

    fn text(&mut self) {
        let start = self.pos;
        let end = self.find_from(self.pos, "<").unwrap_or(self.src.len());
        self.pos = end;
        let text = &self.src[start..end];
        if !text.trim().is_empty() {
            self.emit(RawNode::Text {
                text: text.to_string(),
                span: Span::new(start, end),
            });
        }
    }

    fn markup(&mut self) {
        if self.starts_with("<!--") {
            self.comment();
        } else if self.starts_with("<![CDATA[") {
            self.cdata();
        } else if self.starts_with("<!") {
            self.doctype();
        } else if self.starts_with("<?") {
            self.processing_instruction();
        } else if self.starts_with("</") {
            self.close_tag();
        } else if self.peek(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.open_tag();
        } else {
            // Stray '<' followed by something that is not a tag: text
            let start = self.pos;
            let end = self.find_from(self.pos + 1, "<").unwrap_or(self.src.len());
            self.pos = end;
            self.emit(RawNode::Text {
                text: self.src[start..end].to_string(),
                span: Span::new(start, end),
            });
        }
    }

    fn comment(&mut self) {
        let start = self.pos;
        let (inner_end, end) = match self.find_from(start + 4, "-->") {
            Some(i) => (i, i + 3),
            None => (self.src.len(), self.src.len()),
        };
        self.pos = end;
        self.emit(RawNode::Comment {
            text: self.src[start + 4..inner_end].to_string(),
            span: Span::new(start, end),
        });
    }

    fn cdata(&mut self) {
        let start = self.pos;
        let end = match self.find_from(start + 9, "]]>") {
            Some(i) => i + 3,
            None => self.src.len(),
        };
        self.pos = end;
        self.emit(RawNode::CdataSection {
            span: Span::new(start, end),
        });
    }

    fn doctype(&mut self) {
        let start = self.pos;
        let (literal_end, end) = match self.find_from(start + 2, ">") {
            Some(i) => (i, i + 1),
            None => (self.src.len(), self.src.len()),
        };
        self.pos = end;
        self.emit(RawNode::Doctype {
            literal: self.src[start + 2..literal_end].to_string(),
            literal_span: Span::new(start + 2, literal_end),
            span: Span::new(start, end),
        });
    }

    fn processing_instruction(&mut self) {
        let start = self.pos;
        let end = match self.find_from(start + 2, "?>") {
            Some(i) => i + 2,
            None => self.src.len(),
        };
        self.pos = end;
        self.emit(RawNode::ProcessingInstruction {
            span: Span::new(start, end),
        });
    }

    fn close_tag(&mut self) {
        let tag_start = self.pos;
        let name_start = self.pos + 2;
        let mut i = name_start;
        while i < self.bytes.len() && is_name_byte(self.bytes[i]) {
            i += 1;
        }
        let name = &self.src[name_start..i];
        let name_span = Span::new(name_start, i);
        let end = match self.find_from(i, ">") {
            Some(g) => g + 1,
            None => self.src.len(),
        };
        self.pos = end;

        if name.is_empty() {
            return;
        }
        let matches_open = self
            .stack
            .iter()
            .rposition(|el| el.name.eq_ignore_ascii_case(name));
        let Some(open_idx) = matches_open else {
            // Stray closing tag with no open element: ignored
            return;
        };
        // Force-close any elements left open above the match
        while self.stack.len() > open_idx + 1 {
            if let Some(mut el) = self.stack.pop() {
                el.span.end = tag_start;
                self.emit(RawNode::Element(el));
            }
        }
        if let Some(mut el) = self.stack.pop() {
            el.close_name_span = Some(name_span);
            el.span.end = end;
            self.emit(RawNode::Element(el));
        }
    }

    fn open_tag(&mut self) {
        let tag_start = self.pos;
        let name_start = self.pos + 1;
        let mut i = name_start;
        while i < self.bytes.len() && is_name_byte(self.bytes[i]) {
            i += 1;
        }
        let name = self.src[name_start..i].to_string();
        let name_span = Span::new(name_start, i);
        self.pos = i;

        let mut attrs = Vec::new();
        let mut self_closing_slash = None;
        loop {
            self.skip_whitespace();
            match self.peek(0) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    if self.peek(1) == Some(b'>') {
                        self_closing_slash = Some(Span::new(self.pos, self.pos + 1));
                        self.pos += 2;
                        break;
                    }
                    // Lone slash inside a tag: skipped
                    self.pos += 1;
                }
                Some(_) => {
                    if let Some(attr) = self.attribute() {
                        attrs.push(attr);
                    }
                }
            }
        }

        let element = RawElement {
            name: name.clone(),
            name_span,
            close_name_span: None,
            attrs,
            children: Vec::new(),
            span: Span::new(tag_start, self.pos),
            self_closing_slash,
        };

        if self_closing_slash.is_some() || is_void_element(&name) {
            self.emit(RawNode::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn attribute(&mut self) -> Option<Attr> {
        let name_start = self.pos;
        while self
            .peek(0)
            .is_some_and(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/'))
        {
            self.pos += 1;
        }
        if self.pos == name_start {
            // Unparseable byte; skip it so the loop makes progress
            self.pos += 1;
            return None;
        }
        let name = self.src[name_start..self.pos].to_string();
        let name_span = Span::new(name_start, self.pos);

        let after_name = self.pos;
        self.skip_whitespace();
        if self.peek(0) != Some(b'=') {
            // Valueless (boolean-style) attribute
            self.pos = after_name;
            return Some(Attr {
                name,
                value: None,
                span: name_span,
                name_span,
                value_span: None,
                quote: None,
            });
        }
        self.pos += 1; // '='
        self.skip_whitespace();

        match self.peek(0) {
            Some(q @ (b'"' | b'\'')) => {
                let value_start = self.pos + 1;
                let close = self.find_from(value_start, if q == b'"' { "\"" } else { "'" });
                let (value_end, attr_end) = match close {
                    Some(c) => (c, c + 1),
                    None => (self.src.len(), self.src.len()),
                };
                self.pos = attr_end;
                Some(Attr {
                    name,
                    value: Some(self.src[value_start..value_end].to_string()),
                    span: Span::new(name_start, attr_end),
                    name_span,
                    value_span: Some(Span::new(value_start, value_end)),
                    quote: Some(if q == b'"' {
                        QuoteKind::Double
                    } else {
                        QuoteKind::Single
                    }),
                })
            }
            _ => {
                // Unquoted value, possibly empty (`name=`)
                let value_start = self.pos;
                while self
                    .peek(0)
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>')
                {
                    self.pos += 1;
                }
                Some(Attr {
                    name,
                    value: Some(self.src[value_start..self.pos].to_string()),
                    span: Span::new(name_start, self.pos),
                    name_span,
                    value_span: Some(Span::new(value_start, self.pos)),
                    quote: Some(QuoteKind::Unquoted),
                })
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}
