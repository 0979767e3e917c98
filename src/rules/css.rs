//! Style rules for CSS

use crate::document::{Declaration, Element, Language, Node};
use crate::rule::{NodeKind, NodeKindSet, Rule, RuleContext, RuleError};
use crate::span::Span;
use crate::violation::{Edit, Fix, Violation};
use once_cell::sync::Lazy;
use regex::Regex;

const ELEMENT_ONLY: NodeKindSet = NodeKindSet::of(&[NodeKind::Element]);
const DECLARATION_ONLY: NodeKindSet = NodeKindSet::of(&[NodeKind::Declaration]);

/// A style rule node (selector plus declaration body).
fn css_rule<'a>(node: &'a Node, ctx: &RuleContext<'_>) -> Option<&'a Element> {
    if ctx.language != Language::Css {
        return None;
    }
    node.as_element()
}

fn css_declaration<'a>(node: &'a Node, ctx: &RuleContext<'_>) -> Option<&'a Declaration> {
    if ctx.language != Language::Css {
        return None;
    }
    node.as_declaration()
}

/// Comma-separated selector parts with their byte offset inside the
/// selector text. Commas inside brackets or parens do not split.
fn split_selectors(selector: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push((start, &selector[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &selector[start..]));
    parts
        .into_iter()
        .filter_map(|(offset, raw)| {
            let trimmed = raw.trim_start();
            let lead = raw.len() - trimmed.len();
            let trimmed = trimmed.trim_end();
            if trimmed.is_empty() {
                None
            } else {
                Some((offset + lead, trimmed))
            }
        })
        .collect()
}

/// Byte ranges of quoted string literals inside a declaration value.
/// Matches inside these ranges are user-visible content, not style
/// tokens, and must never be rewritten.
fn string_ranges(value: &str) -> Vec<(usize, usize)> {
    let bytes = value.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let quote = bytes[i];
        if quote == b'"' || quote == b'\'' {
            let start = i;
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 1,
                    b if b == quote => break,
                    _ => {}
                }
                j += 1;
            }
            let end = (j + 1).min(bytes.len());
            ranges.push((start, end));
            i = end;
        } else {
            i += 1;
        }
    }
    ranges
}

fn in_string(ranges: &[(usize, usize)], offset: usize) -> bool {
    ranges.iter().any(|&(s, e)| s <= offset && offset < e)
}

/// Number of compound selectors in one selector part. Combinators and
/// whitespace separate compounds; `a > b c` has three.
fn compound_count(part: &str) -> usize {
    part.split(|c: char| c == '>' || c == '+' || c == '~' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .count()
}

/// Selectors stay shallow (configurable, three compounds by default).
pub struct SelectorDepth;

impl Rule for SelectorDepth {
    fn name(&self) -> &'static str {
        "selector-depth"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(rule) = css_rule(node, ctx) else {
            return Ok(Vec::new());
        };
        let max = ctx.config.max_selector_depth;
        let mut violations = Vec::new();
        for (offset, part) in split_selectors(&rule.name) {
            let depth = compound_count(part);
            if depth > max {
                let start = rule.name_span.start + offset;
                // Which compound to drop is a design decision, not a
                // mechanical rewrite, so no fix.
                violations.push(Violation::new(
                    self.name(),
                    self.severity(),
                    format!("selector '{}' has {} compounds (max {})", part, depth, max),
                    Span::new(start, start + part.len()),
                ));
            }
        }
        Ok(violations)
    }
}

static ZERO_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b0(?:(?:px|em|rem|ex|ch|vw|vh|vmin|vmax|cm|mm|q|in|pt|pc)\b|%)")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Zero lengths drop their unit: `0px` -> `0`.
pub struct ZeroUnit;

impl Rule for ZeroUnit {
    fn name(&self) -> &'static str {
        "zero-unit"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        let strings = string_ranges(&decl.value);
        let mut violations = Vec::new();
        for m in ZERO_UNIT.find_iter(&decl.value) {
            // `1.0px` has a word boundary before the 0 but is not a zero
            if decl.value[..m.start()].ends_with('.') || in_string(&strings, m.start()) {
                continue;
            }
            let span = Span::new(
                decl.value_span.start + m.start(),
                decl.value_span.start + m.end(),
            );
            violations.push(
                Violation::new(
                    self.name(),
                    self.severity(),
                    format!("zero length '{}' does not need a unit", m.as_str()),
                    span,
                )
                .with_fix(Fix::single(span, "0")),
            );
        }
        Ok(violations)
    }
}

static LEADING_ZERO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b0\.\d+")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Values below one drop the leading zero: `0.5` -> `.5`.
pub struct LeadingZero;

impl Rule for LeadingZero {
    fn name(&self) -> &'static str {
        "leading-zero"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        let strings = string_ranges(&decl.value);
        let mut violations = Vec::new();
        for m in LEADING_ZERO.find_iter(&decl.value) {
            if decl.value[..m.start()].ends_with('.') || in_string(&strings, m.start()) {
                continue;
            }
            let start = decl.value_span.start + m.start();
            violations.push(
                Violation::new(
                    self.name(),
                    self.severity(),
                    format!("'{}' does not need the leading zero", m.as_str()),
                    Span::new(start, decl.value_span.start + m.end()),
                )
                .with_fix(Fix::single(Span::new(start, start + 1), "")),
            );
        }
        Ok(violations)
    }
}

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#([0-9a-fA-F]{3,8})\b")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

fn is_hex_color(digits: &str) -> bool {
    matches!(digits.len(), 3 | 4 | 6 | 8)
}

/// Hex colors are lowercase.
pub struct HexCase;

impl Rule for HexCase {
    fn name(&self) -> &'static str {
        "hex-case"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        let strings = string_ranges(&decl.value);
        let mut violations = Vec::new();
        for cap in HEX_COLOR.captures_iter(&decl.value) {
            let (Some(whole), Some(digits)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            if !is_hex_color(digits.as_str()) || in_string(&strings, whole.start()) {
                continue;
            }
            if !digits.as_str().bytes().any(|b| b.is_ascii_uppercase()) {
                continue;
            }
            let span = Span::new(
                decl.value_span.start + whole.start(),
                decl.value_span.start + whole.end(),
            );
            violations.push(
                Violation::new(
                    self.name(),
                    self.severity(),
                    format!("hex color '{}' should be lowercase", whole.as_str()),
                    span,
                )
                .with_fix(Fix::single(span, whole.as_str().to_ascii_lowercase())),
            );
        }
        Ok(violations)
    }
}

/// Six-digit hex colors with repeated pairs shorten to three digits.
pub struct HexShorthand;

impl Rule for HexShorthand {
    fn name(&self) -> &'static str {
        "hex-shorthand"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        let strings = string_ranges(&decl.value);
        let mut violations = Vec::new();
        for cap in HEX_COLOR.captures_iter(&decl.value) {
            let (Some(whole), Some(digits)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            let d = digits.as_str().as_bytes();
            if d.len() != 6 || d[0] != d[1] || d[2] != d[3] || d[4] != d[5] {
                continue;
            }
            if in_string(&strings, whole.start()) {
                continue;
            }
            let short = format!("#{}{}{}", d[0] as char, d[2] as char, d[4] as char);
            let span = Span::new(
                decl.value_span.start + whole.start(),
                decl.value_span.start + whole.end(),
            );
            violations.push(
                Violation::new(
                    self.name(),
                    self.severity(),
                    format!("hex color '{}' can be shortened to '{}'", whole.as_str(), short),
                    span,
                )
                .with_fix(Fix::single(span, short.clone())),
            );
        }
        Ok(violations)
    }
}

/// Property names are lowercase. Custom properties (`--*`) are
/// case-sensitive and exempt.
pub struct PropertyCase;

impl Rule for PropertyCase {
    fn name(&self) -> &'static str {
        "property-case"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        if decl.property.starts_with("--")
            || !decl.property.bytes().any(|b| b.is_ascii_uppercase())
        {
            return Ok(Vec::new());
        }
        let lower = decl.property.to_ascii_lowercase();
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            format!("property '{}' should be lowercase '{}'", decl.property, lower),
            decl.property_span,
        )
        .with_fix(Fix::single(decl.property_span, lower))])
    }
}

static IMPORTANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)!\s*important")
        .unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// `!important` defeats the cascade; flag it, never rewrite it.
pub struct NoImportant;

impl Rule for NoImportant {
    fn name(&self) -> &'static str {
        "no-important"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        let strings = string_ranges(&decl.value);
        let mut violations = Vec::new();
        for m in IMPORTANT.find_iter(&decl.value) {
            if in_string(&strings, m.start()) {
                continue;
            }
            violations.push(Violation::new(
                self.name(),
                self.severity(),
                format!("avoid '!important' on '{}'", decl.property),
                Span::new(
                    decl.value_span.start + m.start(),
                    decl.value_span.start + m.end(),
                ),
            ));
        }
        Ok(violations)
    }
}

/// Declaration group ordering: positioning, box model, typography,
/// visual, everything else.
fn property_group(property: &str) -> (u8, &'static str) {
    let p = property.to_ascii_lowercase();
    match p.as_str() {
        "position" | "top" | "right" | "bottom" | "left" | "z-index" => (0, "positioning"),
        "display" | "float" | "clear" | "width" | "height" | "box-sizing" => (1, "box model"),
        _ if p.starts_with("max-")
            || p.starts_with("min-")
            || p.starts_with("margin")
            || p.starts_with("padding")
            || p.starts_with("overflow") =>
        {
            (1, "box model")
        }
        "color" | "line-height" | "letter-spacing" | "white-space" | "vertical-align" => {
            (2, "typography")
        }
        _ if p.starts_with("font") || p.starts_with("text") || p.starts_with("word") => {
            (2, "typography")
        }
        "opacity" | "box-shadow" | "visibility" => (3, "visual"),
        _ if p.starts_with("background") || p.starts_with("border") || p.starts_with("outline") => {
            (3, "visual")
        }
        _ => (4, "other"),
    }
}

/// Declarations follow the group order above within a rule.
pub struct DeclarationOrder;

impl Rule for DeclarationOrder {
    fn name(&self) -> &'static str {
        "declaration-order"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(rule) = css_rule(node, ctx) else {
            return Ok(Vec::new());
        };
        let mut violations = Vec::new();
        let mut highest: Option<(u8, &'static str)> = None;
        for child in &rule.children {
            let Node::Declaration(decl) = child else {
                continue;
            };
            let group = property_group(&decl.property);
            if let Some(prev) = highest {
                if group.0 < prev.0 {
                    // Reordering declarations can change the cascade, so
                    // this stays report-only.
                    violations.push(Violation::new(
                        self.name(),
                        self.severity(),
                        format!(
                            "'{}' ({}) should come before the {} declarations",
                            decl.property, group.1, prev.1
                        ),
                        decl.property_span,
                    ));
                    continue;
                }
            }
            highest = Some(match highest {
                Some(prev) if prev.0 >= group.0 => prev,
                _ => group,
            });
        }
        Ok(violations)
    }
}

/// Every declaration ends with a semicolon, the last one included.
pub struct MissingSemicolon;

impl Rule for MissingSemicolon {
    fn name(&self) -> &'static str {
        "missing-semicolon"
    }
    fn interested_in(&self) -> NodeKindSet {
        DECLARATION_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(decl) = css_declaration(node, ctx) else {
            return Ok(Vec::new());
        };
        if decl.terminated {
            return Ok(Vec::new());
        }
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            format!("declaration '{}' is missing its semicolon", decl.property),
            Span::empty(decl.span.end),
        )
        .with_fix(Fix::new(vec![Edit::insert(decl.span.end, ";")]))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::Linter;
    use crate::rule::Registry;

    fn check(rule: Box<dyn Rule>, source: &str) -> Vec<Violation> {
        let mut registry = Registry::new();
        registry.register(rule).unwrap();
        Linter::new(registry, Config::default())
            .check(source, Language::Css)
            .unwrap()
            .violations
    }

    fn fix(rule: Box<dyn Rule>, source: &str) -> String {
        let mut registry = Registry::new();
        registry.register(rule).unwrap();
        Linter::new(registry, Config::default())
            .fix_all(source, Language::Css)
            .unwrap()
            .text
    }

    #[test]
    fn test_split_selectors() {
        assert_eq!(
            split_selectors("a, b > c"),
            vec![(0, "a"), (3, "b > c")]
        );
        // The comma inside the attribute selector does not split
        assert_eq!(
            split_selectors("a[title=\"x,y\"], b"),
            vec![(0, "a[title=\"x,y\"]"), (16, "b")]
        );
    }

    #[test]
    fn test_compound_count() {
        assert_eq!(compound_count(".a"), 1);
        assert_eq!(compound_count("ul li a"), 3);
        assert_eq!(compound_count("ul > li+a"), 3);
        assert_eq!(compound_count(".nav .item .link span"), 4);
    }

    #[test]
    fn test_selector_depth() {
        let violations = check(
            Box::new(SelectorDepth),
            ".page .nav .item .link { color: red; }",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("4 compounds (max 3)"));
        assert!(violations[0].fix.is_none());
        assert!(check(Box::new(SelectorDepth), "ul li a { color: red; }").is_empty());
    }

    #[test]
    fn test_selector_depth_per_part() {
        // Only the deep part of a selector list is flagged
        let violations = check(
            Box::new(SelectorDepth),
            "a, .x .y .z .w { color: red; }",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains(".x .y .z .w"));
    }

    #[test]
    fn test_zero_unit() {
        assert_eq!(
            fix(Box::new(ZeroUnit), "a { margin: 0px 10px 0em 5%; }"),
            "a { margin: 0 10px 0 5%; }"
        );
        assert!(check(Box::new(ZeroUnit), "a { margin: 0 10px; }").is_empty());
    }

    #[test]
    fn test_zero_unit_ignores_fractional() {
        assert!(check(Box::new(ZeroUnit), "a { width: 1.0px; }").is_empty());
    }

    #[test]
    fn test_zero_unit_percent() {
        assert_eq!(fix(Box::new(ZeroUnit), "a { width: 0%; }"), "a { width: 0; }");
    }

    #[test]
    fn test_leading_zero() {
        assert_eq!(
            fix(Box::new(LeadingZero), "a { opacity: 0.5; margin: 0.25em; }"),
            "a { opacity: .5; margin: .25em; }"
        );
        assert!(check(Box::new(LeadingZero), "a { opacity: .5; }").is_empty());
        assert!(check(Box::new(LeadingZero), "a { width: 10.5px; }").is_empty());
    }

    #[test]
    fn test_hex_case() {
        let src = "a { color: #FFF; background: #A0b1C2; }";
        let violations = check(Box::new(HexCase), src);
        assert_eq!(violations.len(), 2);
        assert_eq!(
            fix(Box::new(HexCase), src),
            "a { color: #fff; background: #a0b1c2; }"
        );
        assert!(check(Box::new(HexCase), "a { color: #fff; }").is_empty());
    }

    #[test]
    fn test_hex_shorthand() {
        assert_eq!(
            fix(Box::new(HexShorthand), "a { color: #ffffff; }"),
            "a { color: #fff; }"
        );
        // Case is preserved; a separate rule handles lowercasing
        assert_eq!(
            fix(Box::new(HexShorthand), "a { color: #FFAA00; }"),
            "a { color: #FA0; }"
        );
        assert!(check(Box::new(HexShorthand), "a { color: #ffaa01; }").is_empty());
        assert!(check(Box::new(HexShorthand), "a { color: #fff; }").is_empty());
    }

    #[test]
    fn test_string_ranges() {
        assert_eq!(string_ranges(r##""#fff" red"##), vec![(0, 6)]);
        assert_eq!(string_ranges("'a' \"b\""), vec![(0, 3), (4, 7)]);
        // Unterminated string runs to the end of the value
        assert_eq!(string_ranges("\"open"), vec![(0, 5)]);
        assert!(string_ranges("url(x.png)").is_empty());
    }

    #[test]
    fn test_hex_inside_string_value_is_untouched() {
        let src = "a { content: \"#FFFFFF\"; }";
        assert!(check(Box::new(HexCase), src).is_empty());
        assert!(check(Box::new(HexShorthand), src).is_empty());
        assert_eq!(fix(Box::new(HexCase), src), src);
        assert_eq!(fix(Box::new(HexShorthand), src), src);
    }

    #[test]
    fn test_string_content_is_exempt_from_value_rules() {
        assert!(check(Box::new(ZeroUnit), "a { content: \"0px\"; }").is_empty());
        assert!(check(Box::new(LeadingZero), "a { content: '0.5'; }").is_empty());
        assert!(check(Box::new(NoImportant), "a { content: \"!important\"; }").is_empty());
    }

    #[test]
    fn test_token_after_string_is_still_flagged() {
        let src = "a { background: \"#AAAAAA\" #BBBBBB; }";
        let violations = check(Box::new(HexCase), src);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("#BBBBBB"));
    }

    #[test]
    fn test_property_case() {
        assert_eq!(
            fix(Box::new(PropertyCase), "a { COLOR: red; }"),
            "a { color: red; }"
        );
        assert!(check(Box::new(PropertyCase), "a { --MyVar: 1; }").is_empty());
    }

    #[test]
    fn test_no_important() {
        let violations = check(Box::new(NoImportant), "a { color: red !important; }");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
        assert_eq!(
            check(Box::new(NoImportant), "a { color: red ! IMPORTANT; }").len(),
            1
        );
    }

    #[test]
    fn test_property_group() {
        assert_eq!(property_group("position").0, 0);
        assert_eq!(property_group("margin-top").0, 1);
        assert_eq!(property_group("font-size").0, 2);
        assert_eq!(property_group("border-radius").0, 3);
        assert_eq!(property_group("cursor").0, 4);
    }

    #[test]
    fn test_declaration_order() {
        let violations = check(
            Box::new(DeclarationOrder),
            "a { color: red; position: absolute; }",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'position'"));
        assert!(violations[0].fix.is_none());
        assert!(check(
            Box::new(DeclarationOrder),
            "a { position: absolute; width: 10px; color: red; border: 0; }"
        )
        .is_empty());
    }

    #[test]
    fn test_declaration_order_reports_each_regression() {
        let violations = check(
            Box::new(DeclarationOrder),
            "a { color: red; position: absolute; display: block; }",
        );
        // position regresses past typography, then display past it again
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_missing_semicolon() {
        assert_eq!(
            fix(Box::new(MissingSemicolon), "a { color: red }"),
            "a { color: red; }"
        );
        assert!(check(Box::new(MissingSemicolon), "a { color: red; }").is_empty());
    }
}
