//! Rules shared by both languages

use crate::document::Node;
use crate::rule::{NodeKind, NodeKindSet, Rule, RuleContext, RuleError};
use crate::span::Span;
use crate::violation::{Fix, Violation};

/// Nodes that start a line are indented with spaces, by nesting depth.
///
/// Nodes that share a line with earlier content are left alone; only the
/// first node on its line is measured.
pub struct Indentation;

impl Rule for Indentation {
    fn name(&self) -> &'static str {
        "indentation"
    }
    fn interested_in(&self) -> NodeKindSet {
        NodeKindSet::of(&[NodeKind::Element, NodeKind::Declaration])
    }
    fn evaluate(&self, node: &Node, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        if let Some(el) = node.as_element() {
            if el.is_doctype() {
                return Ok(Vec::new());
            }
        }
        let start = node.span().start;
        let line_start = ctx.source[..start]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let leading = &ctx.source[line_start..start];
        if !leading.chars().all(char::is_whitespace) {
            return Ok(Vec::new());
        }
        let expected = ctx.depth() * ctx.config.indent_width;
        let has_tabs = leading.contains('\t');
        if !has_tabs && leading.len() == expected {
            return Ok(Vec::new());
        }
        let message = if has_tabs {
            format!("line is indented with tabs; use {} spaces", expected)
        } else {
            format!(
                "expected an indent of {} spaces, found {}",
                expected,
                leading.len()
            )
        };
        let span = Span::new(line_start, start);
        Ok(vec![Violation::new(self.name(), self.severity(), message, span)
            .with_fix(Fix::single(span, " ".repeat(expected)))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::Language;
    use crate::engine::Linter;
    use crate::rule::Registry;

    fn linter() -> Linter {
        let mut registry = Registry::new();
        registry.register(Box::new(Indentation)).unwrap();
        Linter::new(registry, Config::default())
    }

    #[test]
    fn test_correct_indentation_is_clean() {
        let src = "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n";
        let report = linter().check(src, Language::Html).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_wrong_width_is_fixed() {
        let src = "<ul>\n    <li>a</li>\n</ul>\n";
        let fixed = linter().fix_all(src, Language::Html).unwrap();
        assert_eq!(fixed.text, "<ul>\n  <li>a</li>\n</ul>\n");
    }

    #[test]
    fn test_tabs_are_flagged() {
        let src = "<ul>\n\t<li>a</li>\n</ul>\n";
        let report = linter().check(src, Language::Html).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].message.contains("tabs"));
        let fixed = linter().fix_all(src, Language::Html).unwrap();
        assert_eq!(fixed.text, "<ul>\n  <li>a</li>\n</ul>\n");
    }

    #[test]
    fn test_mid_line_nodes_are_ignored() {
        // <b> shares its line with the surrounding text
        let src = "<p>\n  some <b>bold</b> text\n</p>\n";
        let report = linter().check(src, Language::Html).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_css_declarations() {
        let src = "a {\n  color: red;\n}\n";
        assert!(linter().check(src, Language::Css).unwrap().is_clean());
        let bad = "a {\ncolor: red;\n}\n";
        let fixed = linter().fix_all(bad, Language::Css).unwrap();
        assert_eq!(fixed.text, "a {\n  color: red;\n}\n");
    }
}
