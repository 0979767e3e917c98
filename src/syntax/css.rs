//! Hand-written, forgiving CSS parser
//!
//! Produces style rules with selector spans and declarations with exact
//! property/value spans and termination flags. Empty declaration blocks
//! are preserved so selector-only rules still see them. At-rules are
//! surfaced raw; the adapter rejects them explicitly rather than guessing
//! a mapping.

use super::{RawDeclaration, RawNode, RawStyleRule};
use crate::span::Span;

/// Parse CSS source into a raw node tree. Never fails; unparseable runs
/// are skipped leniently.
pub fn parse(source: &str) -> Vec<RawNode> {
    Parser {
        src: source,
        bytes: source.as_bytes(),
        pos: 0,
    }
    .run()
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Vec<RawNode> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }
            if self.starts_with("/*") {
                nodes.push(self.comment());
            } else if self.bytes[self.pos] == b'@' {
                nodes.push(self.at_rule());
            } else if self.bytes[self.pos] == b'}' || self.bytes[self.pos] == b';' {
                // Stray block close or semicolon: skipped
                self.pos += 1;
            } else {
                match self.style_rule() {
                    Some(rule) => nodes.push(rule),
                    None => break,
                }
            }
        }
        nodes
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    fn comment(&mut self) -> RawNode {
        let start = self.pos;
        let (inner_end, end) = match self.src[start + 2..].find("*/") {
            Some(i) => (start + 2 + i, start + 2 + i + 2),
            None => (self.src.len(), self.src.len()),
        };
        self.pos = end;
        RawNode::Comment {
            text: self.src[start + 2..inner_end].to_string(),
            span: Span::new(start, end),
        }
    }

    /// Consume an at-rule: `@name ... ;` or `@name ... { ... }` with
    /// balanced braces.
    fn at_rule(&mut self) -> RawNode {
        let start = self.pos;
        let mut i = start + 1;
        while i < self.bytes.len()
            && (self.bytes[i].is_ascii_alphanumeric() || self.bytes[i] == b'-')
        {
            i += 1;
        }
        let name = self.src[start + 1..i].to_string();

        let mut depth = 0usize;
        let mut end = self.src.len();
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        end = i + 1;
                        break;
                    }
                }
                b';' if depth == 0 => {
                    end = i + 1;
                    break;
                }
                b'"' | b'\'' => i = self.skip_string_from(i),
                _ => {}
            }
            i += 1;
        }
        self.pos = end;
        RawNode::AtRule {
            name,
            span: Span::new(start, end),
        }
    }

    /// Byte index of the closing quote for a string starting at `i`.
    fn skip_string_from(&self, i: usize) -> usize {
        let quote = self.bytes[i];
        let mut j = i + 1;
        while j < self.bytes.len() {
            match self.bytes[j] {
                b'\\' => j += 1,
                b if b == quote => return j,
                _ => {}
            }
            j += 1;
        }
        j
    }

    fn style_rule(&mut self) -> Option<RawNode> {
        let sel_start = self.pos;
        let brace = self.src[self.pos..].find('{').map(|i| self.pos + i)?;
        let selector_raw = &self.src[sel_start..brace];
        let selector = selector_raw.trim_end();
        let selector_span = Span::new(sel_start, sel_start + selector.len());
        self.pos = brace + 1;

        let mut body = Vec::new();
        let end;
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                end = self.src.len();
                break;
            }
            if self.starts_with("/*") {
                let c = self.comment();
                body.push(c);
                continue;
            }
            if self.bytes[self.pos] == b'}' {
                end = self.pos + 1;
                self.pos += 1;
                break;
            }
            if self.bytes[self.pos] == b';' {
                self.pos += 1;
                continue;
            }
            match self.declaration() {
                Some(decl) => body.push(decl),
                None => continue,
            }
        }

        Some(RawNode::StyleRule(RawStyleRule {
            selector: selector.to_string(),
            selector_span,
            body,
            span: Span::new(sel_start, end),
        }))
    }

    /// Consume one `property: value` declaration. Returns `None` for a
    /// malformed chunk, which is skipped up to the next `;` or `}`.
    fn declaration(&mut self) -> Option<RawNode> {
        let prop_start = self.pos;
        let mut i = self.pos;
        while i < self.bytes.len() && !matches!(self.bytes[i], b':' | b';' | b'}') {
            i += 1;
        }
        if i >= self.bytes.len() || self.bytes[i] != b':' {
            // No colon before the chunk ended: not a declaration
            self.pos = i;
            if self.bytes.get(i) == Some(&b';') {
                self.pos += 1;
            }
            return None;
        }
        let property = self.src[prop_start..i].trim_end();
        let property_span = Span::new(prop_start, prop_start + property.len());

        // Value runs to the next top-level ';' or '}'
        let mut j = i + 1;
        while j < self.bytes.len() && self.bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        let value_start = j;
        let mut paren_depth = 0usize;
        while j < self.bytes.len() {
            match self.bytes[j] {
                b'(' => paren_depth += 1,
                b')' => paren_depth = paren_depth.saturating_sub(1),
                b'"' | b'\'' => j = self.skip_string_from(j),
                b';' | b'}' if paren_depth == 0 => break,
                _ => {}
            }
            j += 1;
        }
        let value = self.src[value_start..j].trim_end();
        let value_span = Span::new(value_start, value_start + value.len());
        let terminated = self.bytes.get(j) == Some(&b';');
        self.pos = if terminated { j + 1 } else { j };

        let span_end = if value.is_empty() {
            property_span.end
        } else {
            value_span.end
        };
        Some(RawNode::Declaration(RawDeclaration {
            property: property.to_string(),
            property_span,
            value: value.to_string(),
            value_span,
            span: Span::new(prop_start, span_end),
            terminated,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_rule(nodes: &[RawNode]) -> &RawStyleRule {
        match nodes {
            [RawNode::StyleRule(r)] => r,
            other => panic!("expected one style rule, got {:?}", other),
        }
    }

    #[test]
    fn test_rule_and_declaration_spans() {
        let src = ".a{margin:0px;}";
        let nodes = parse(src);
        let rule = single_rule(&nodes);
        assert_eq!(rule.selector, ".a");
        assert_eq!(rule.selector_span.slice(src), ".a");
        assert_eq!(rule.span, Span::new(0, src.len()));
        assert_eq!(rule.body.len(), 1);
        match &rule.body[0] {
            RawNode::Declaration(d) => {
                assert_eq!(d.property, "margin");
                assert_eq!(d.property_span.slice(src), "margin");
                assert_eq!(d.value, "0px");
                assert_eq!(d.value_span.slice(src), "0px");
                assert!(d.terminated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_block_preserved() {
        let src = "a b c d e { }";
        let nodes = parse(src);
        let rule = single_rule(&nodes);
        assert_eq!(rule.selector, "a b c d e");
        assert!(rule.body.is_empty());
    }

    #[test]
    fn test_unterminated_declaration() {
        let src = ".a { color: red }";
        let nodes = parse(src);
        let rule = single_rule(&nodes);
        match &rule.body[0] {
            RawNode::Declaration(d) => {
                assert_eq!(d.value, "red");
                assert!(!d.terminated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_semicolon_inside_url_value() {
        let src = ".a { background: url(data:image/png;base64,xyz); }";
        let nodes = parse(src);
        let rule = single_rule(&nodes);
        assert_eq!(rule.body.len(), 1);
        match &rule.body[0] {
            RawNode::Declaration(d) => {
                assert_eq!(d.value, "url(data:image/png;base64,xyz)");
                assert!(d.terminated);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_at_rule_with_block() {
        let src = "@media (min-width: 480px) { .a { color: red; } }\n.b { color: blue; }";
        let nodes = parse(src);
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            RawNode::AtRule { name, span } => {
                assert_eq!(name, "media");
                assert!(span.slice(src).ends_with('}'));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&nodes[1], RawNode::StyleRule(r) if r.selector == ".b"));
    }

    #[test]
    fn test_at_rule_with_semicolon() {
        let src = "@import url(\"x.css\");\n.a{color:red;}";
        let nodes = parse(src);
        assert!(matches!(&nodes[0], RawNode::AtRule { name, .. } if name == "import"));
        assert!(matches!(&nodes[1], RawNode::StyleRule(_)));
    }

    #[test]
    fn test_comments_top_level_and_in_block() {
        let src = "/* top */\n.a { /* in */ color: red; }";
        let nodes = parse(src);
        assert!(matches!(&nodes[0], RawNode::Comment { text, .. } if text == " top "));
        match &nodes[1] {
            RawNode::StyleRule(r) => {
                assert_eq!(r.body.len(), 2);
                assert!(matches!(&r.body[0], RawNode::Comment { .. }));
                assert!(matches!(&r.body[1], RawNode::Declaration(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_multiple_declarations() {
        let src = ".a { position: absolute; top: 0; color: red; }";
        let nodes = parse(src);
        let rule = single_rule(&nodes);
        assert_eq!(rule.body.len(), 3);
    }
}
