//! Style rules for HTML documents

use crate::document::{Element, Language, Node, QuoteKind};
use crate::rule::{NodeKind, NodeKindSet, Rule, RuleContext, RuleError};
use crate::span::Span;
use crate::syntax::html::is_void_element;
use crate::violation::{Edit, Fix, Severity, Violation};

const ELEMENT_ONLY: NodeKindSet = NodeKindSet::of(&[NodeKind::Element]);

/// Boolean attributes that should never carry a value.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "async",
    "autofocus",
    "checked",
    "defer",
    "disabled",
    "hidden",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "readonly",
    "required",
    "reversed",
    "selected",
];

/// An HTML element that is not the synthetic doctype node.
fn html_element<'a>(node: &'a Node, ctx: &RuleContext<'_>) -> Option<&'a Element> {
    if ctx.language != Language::Html {
        return None;
    }
    node.as_element().filter(|el| !el.is_doctype())
}

fn has_uppercase(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_uppercase())
}

/// Tag names are written in lowercase.
pub struct TagCase;

impl Rule for TagCase {
    fn name(&self) -> &'static str {
        "tag-case"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        if !has_uppercase(&el.name) {
            return Ok(Vec::new());
        }
        let lower = el.name.to_ascii_lowercase();
        let mut edits = vec![Edit::new(el.name_span, lower.clone())];
        if let Some(close) = el.close_name_span {
            edits.push(Edit::new(close, lower.clone()));
        }
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            format!("tag name '{}' should be lowercase '{}'", el.name, lower),
            el.name_span,
        )
        .with_fix(Fix::new(edits))])
    }
}

/// Attribute names are written in lowercase.
pub struct AttributeCase;

impl Rule for AttributeCase {
    fn name(&self) -> &'static str {
        "attribute-case"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        let mut violations = Vec::new();
        for attr in &el.attrs {
            if has_uppercase(&attr.name) {
                let lower = attr.name.to_ascii_lowercase();
                violations.push(
                    Violation::new(
                        self.name(),
                        self.severity(),
                        format!("attribute '{}' should be lowercase '{}'", attr.name, lower),
                        attr.name_span,
                    )
                    .with_fix(Fix::single(attr.name_span, lower)),
                );
            }
        }
        Ok(violations)
    }
}

/// Attribute values use the configured quote style (double by default).
pub struct AttributeQuotes;

impl Rule for AttributeQuotes {
    fn name(&self) -> &'static str {
        "attribute-quotes"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        let quote = ctx.config.quote_style.quote_char();
        let wanted = match quote {
            '\'' => QuoteKind::Single,
            _ => QuoteKind::Double,
        };
        let mut violations = Vec::new();
        for attr in &el.attrs {
            let (Some(value), Some(kind)) = (attr.value.as_deref(), attr.quote) else {
                continue;
            };
            if kind == wanted {
                continue;
            }
            let described = match kind {
                QuoteKind::Unquoted => "unquoted",
                QuoteKind::Single => "single-quoted",
                QuoteKind::Double => "double-quoted",
            };
            let mut violation = Violation::new(
                self.name(),
                self.severity(),
                format!(
                    "attribute '{}' value is {}; use {}quotes",
                    attr.name,
                    described,
                    if wanted == QuoteKind::Double { "double " } else { "single " },
                ),
                attr.span,
            );
            // Re-quoting a value that contains the target quote would
            // corrupt the markup, so no fix is offered for those.
            if !value.contains(quote) {
                violation = violation.with_fix(Fix::single(
                    attr.span,
                    format!("{}={}{}{}", attr.name, quote, value, quote),
                ));
            }
            violations.push(violation);
        }
        Ok(violations)
    }
}

/// Every full HTML document opens with a doctype, before the root
/// element. Fragments without a root `html` element (partials,
/// templates) are exempt; they are not documents in their own right.
pub struct DoctypeRequired;

impl Rule for DoctypeRequired {
    fn name(&self) -> &'static str {
        "doctype-required"
    }
    fn severity(&self) -> Severity {
        Severity::Error
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        if ctx.depth() != 0 || !el.name.eq_ignore_ascii_case("html") || ctx.has_doctype {
            return Ok(Vec::new());
        }
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            "document is missing a doctype",
            Span::empty(0),
        )
        .with_fix(Fix::new(vec![Edit::insert(0, "<!doctype html>\n")]))])
    }
}

/// The doctype is the lowercase HTML5 form: `<!doctype html>`.
pub struct DoctypeStyle;

impl Rule for DoctypeStyle {
    fn name(&self) -> &'static str {
        "doctype-style"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        if ctx.language != Language::Html {
            return Ok(Vec::new());
        }
        let Some(el) = node.as_element().filter(|el| el.is_doctype()) else {
            return Ok(Vec::new());
        };
        let literal = match el.children.first() {
            Some(Node::Text(t)) => t.text.as_str(),
            _ => return Ok(Vec::new()),
        };
        let normalized = literal
            .split_whitespace()
            .map(|w| w.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        if normalized == "doctype html" {
            if literal != "doctype html" {
                return Ok(vec![Violation::new(
                    self.name(),
                    self.severity(),
                    "doctype should be written '<!doctype html>'",
                    el.name_span,
                )
                .with_fix(Fix::single(el.name_span, "doctype html"))]);
            }
            return Ok(Vec::new());
        }
        // Legacy doctypes switch rendering modes; rewriting one is not a
        // safe mechanical fix.
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            "use the HTML5 doctype '<!doctype html>'",
            el.name_span,
        )])
    }
}

/// Boolean attributes do not take a value.
pub struct BooleanAttribute;

impl Rule for BooleanAttribute {
    fn name(&self) -> &'static str {
        "boolean-attribute"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        let mut violations = Vec::new();
        for attr in &el.attrs {
            let lower = attr.name.to_ascii_lowercase();
            if attr.value.is_some() && BOOLEAN_ATTRIBUTES.contains(&lower.as_str()) {
                violations.push(
                    Violation::new(
                        self.name(),
                        self.severity(),
                        format!("boolean attribute '{}' does not need a value", attr.name),
                        attr.span,
                    )
                    .with_fix(Fix::single(attr.span, attr.name.clone())),
                );
            }
        }
        Ok(violations)
    }
}

/// Void elements take no trailing slash.
pub struct VoidElementSlash;

impl Rule for VoidElementSlash {
    fn name(&self) -> &'static str {
        "void-element-slash"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        let Some(slash) = el.self_closing_slash else {
            return Ok(Vec::new());
        };
        if !is_void_element(&el.name) {
            return Ok(Vec::new());
        }
        // Take any whitespace before the slash with it: `<br />` -> `<br>`
        let mut start = slash.start;
        let bytes = ctx.source.as_bytes();
        while start > 0 && bytes[start - 1].is_ascii_whitespace() {
            start -= 1;
        }
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            format!("void element '{}' does not need a trailing slash", el.name),
            slash,
        )
        .with_fix(Fix::single(Span::new(start, slash.end), ""))])
    }
}

/// An attribute appears at most once per element.
pub struct DuplicateAttribute;

impl Rule for DuplicateAttribute {
    fn name(&self) -> &'static str {
        "duplicate-attribute"
    }
    fn severity(&self) -> Severity {
        Severity::Error
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        let mut seen = std::collections::HashSet::new();
        let mut violations = Vec::new();
        for attr in &el.attrs {
            let lower = attr.name.to_ascii_lowercase();
            if !seen.insert(lower) {
                // Which copy should win is not mechanically decidable
                violations.push(Violation::new(
                    self.name(),
                    self.severity(),
                    format!("attribute '{}' is set more than once", attr.name),
                    attr.name_span,
                ));
            }
        }
        Ok(violations)
    }
}

/// The root `html` element declares a `lang` attribute.
pub struct LangRequired;

impl Rule for LangRequired {
    fn name(&self) -> &'static str {
        "lang-required"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        if ctx.depth() != 0 || !el.name.eq_ignore_ascii_case("html") {
            return Ok(Vec::new());
        }
        let missing = match el.attr("lang") {
            None => true,
            Some(attr) => attr.value.as_deref().unwrap_or("").trim().is_empty(),
        };
        if !missing {
            return Ok(Vec::new());
        }
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            "root 'html' element should declare a 'lang' attribute",
            el.name_span,
        )])
    }
}

/// Guide ordering for attributes: class first, then id/name, data-*,
/// src/for/type/href/value, title/alt, role/aria-*, tabindex, style.
fn attribute_rank(name: &str) -> u8 {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        "class" => 0,
        "id" | "name" => 1,
        _ if lower.starts_with("data-") => 2,
        "src" | "for" | "type" | "href" | "value" => 3,
        "title" | "alt" => 4,
        "role" => 5,
        _ if lower.starts_with("aria-") => 5,
        "tabindex" => 6,
        "style" => 7,
        _ => 8,
    }
}

/// Attributes follow the guide's ordering.
pub struct AttributeOrder;

impl Rule for AttributeOrder {
    fn name(&self) -> &'static str {
        "attribute-order"
    }
    fn interested_in(&self) -> NodeKindSet {
        ELEMENT_ONLY
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let Some(el) = html_element(node, ctx) else {
            return Ok(Vec::new());
        };
        if el.attrs.len() < 2 {
            return Ok(Vec::new());
        }
        let ranks: Vec<u8> = el.attrs.iter().map(|a| attribute_rank(&a.name)).collect();
        if ranks.windows(2).all(|w| w[0] <= w[1]) {
            return Ok(Vec::new());
        }
        // Rebuild the attribute list from the original source slices so
        // quoting and values survive byte-for-byte. Stable by rank, so
        // same-rank attributes keep their relative order.
        let mut order: Vec<usize> = (0..el.attrs.len()).collect();
        order.sort_by_key(|&i| ranks[i]);
        let rebuilt = order
            .iter()
            .map(|&i| el.attrs[i].span.slice(ctx.source))
            .collect::<Vec<_>>()
            .join(" ");
        let list_span = Span::new(
            el.attrs[0].span.start,
            el.attrs[el.attrs.len() - 1].span.end,
        );
        Ok(vec![Violation::new(
            self.name(),
            self.severity(),
            format!(
                "attributes on '{}' are not in guide order (class, id/name, data-*, src/for/type/href/value, title/alt, role/aria-*)",
                el.name
            ),
            list_span,
        )
        .with_fix(Fix::single(list_span, rebuilt))])
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
            .check(source, Language::Html)
            .unwrap()
            .violations
    }

    fn fix(rule: Box<dyn Rule>, source: &str) -> String {
        let mut registry = Registry::new();
        registry.register(rule).unwrap();
        Linter::new(registry, Config::default())
            .fix_all(source, Language::Html)
            .unwrap()
            .text
    }

    #[test]
    fn test_tag_case() {
        let violations = check(Box::new(TagCase), r#"<DIV class="btn">x</DIV>"#);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'DIV'"));
        assert_eq!(
            fix(Box::new(TagCase), r#"<DIV class="btn">x</DIV>"#),
            r#"<div class="btn">x</div>"#
        );
    }

    #[test]
    fn test_tag_case_clean() {
        assert!(check(Box::new(TagCase), "<div>x</div>").is_empty());
    }

    #[test]
    fn test_attribute_case() {
        let src = r#"<input TYPE="text">"#;
        let violations = check(Box::new(AttributeCase), src);
        assert_eq!(violations.len(), 1);
        assert_eq!(fix(Box::new(AttributeCase), src), r#"<input type="text">"#);
    }

    #[test]
    fn test_attribute_quotes() {
        assert_eq!(
            fix(Box::new(AttributeQuotes), "<input type=text>"),
            r#"<input type="text">"#
        );
        assert_eq!(
            fix(Box::new(AttributeQuotes), "<a href='x.html'>y</a>"),
            r#"<a href="x.html">y</a>"#
        );
        assert!(check(Box::new(AttributeQuotes), r#"<a href="x.html">y</a>"#).is_empty());
    }

    #[test]
    fn test_attribute_quotes_no_fix_when_value_has_quote() {
        let violations = check(Box::new(AttributeQuotes), r#"<p title='say "hi"'>x</p>"#);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_doctype_required() {
        let violations = check(Box::new(DoctypeRequired), "<html><body>x</body></html>");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_error());
        assert_eq!(
            fix(Box::new(DoctypeRequired), "<html></html>"),
            "<!doctype html>\n<html></html>"
        );
        assert!(check(
            Box::new(DoctypeRequired),
            "<!doctype html><html></html>"
        )
        .is_empty());
    }

    #[test]
    fn test_doctype_after_root_does_not_satisfy() {
        let src = "<html lang=\"en\"></html>\n<!doctype html>";
        let violations = check(Box::new(DoctypeRequired), src);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_error());
    }

    #[test]
    fn test_doctype_not_required_for_fragments() {
        assert!(check(Box::new(DoctypeRequired), "<body>x</body>").is_empty());
        assert!(check(Box::new(DoctypeRequired), "<div>x</div>").is_empty());
    }

    #[test]
    fn test_doctype_style() {
        let src = "<!DOCTYPE html><html lang=\"en\"></html>";
        let violations = check(Box::new(DoctypeStyle), src);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            fix(Box::new(DoctypeStyle), src),
            "<!doctype html><html lang=\"en\"></html>"
        );
        assert!(check(Box::new(DoctypeStyle), "<!doctype html><html></html>").is_empty());
    }

    #[test]
    fn test_doctype_style_legacy_has_no_fix() {
        let src = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN"><html></html>"#;
        let violations = check(Box::new(DoctypeStyle), src);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_boolean_attribute() {
        let src = r#"<input type="text" disabled="disabled">"#;
        let violations = check(Box::new(BooleanAttribute), src);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            fix(Box::new(BooleanAttribute), src),
            r#"<input type="text" disabled>"#
        );
        assert!(check(Box::new(BooleanAttribute), r#"<input disabled>"#).is_empty());
    }

    #[test]
    fn test_void_element_slash() {
        assert_eq!(fix(Box::new(VoidElementSlash), "<br />"), "<br>");
        assert_eq!(fix(Box::new(VoidElementSlash), "<img src=\"x.png\"/>"), "<img src=\"x.png\">");
        assert!(check(Box::new(VoidElementSlash), "<br>").is_empty());
    }

    #[test]
    fn test_duplicate_attribute() {
        let violations = check(
            Box::new(DuplicateAttribute),
            r#"<div class="a" class="b">x</div>"#,
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_error());
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_lang_required() {
        let violations = check(Box::new(LangRequired), "<html><body>x</body></html>");
        assert_eq!(violations.len(), 1);
        assert!(check(Box::new(LangRequired), r#"<html lang="en"></html>"#).is_empty());
    }

    #[test]
    fn test_attribute_order() {
        let src = r#"<a href="x" class="btn" id="go">y</a>"#;
        let violations = check(Box::new(AttributeOrder), src);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            fix(Box::new(AttributeOrder), src),
            r#"<a class="btn" id="go" href="x">y</a>"#
        );
        assert!(check(Box::new(AttributeOrder), r#"<a class="btn" href="x">y</a>"#).is_empty());
    }

    #[test]
    fn test_attribute_rank_groups() {
        assert!(attribute_rank("class") < attribute_rank("id"));
        assert!(attribute_rank("id") < attribute_rank("data-toggle"));
        assert!(attribute_rank("data-toggle") < attribute_rank("href"));
        assert!(attribute_rank("alt") < attribute_rank("aria-hidden"));
        assert_eq!(attribute_rank("role"), attribute_rank("aria-hidden"));
    }
}
