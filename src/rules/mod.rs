//! Built-in rule set
//!
//! Registration order below is load-bearing: it is the priority used to
//! break ties between violations at the same offset and to pick the
//! winner among overlapping fixes. HTML structure rules come first, then
//! the CSS rules, then the rules shared by both languages. `hex-case`
//! registers before `hex-shorthand` so an uppercase long-form color is
//! lowercased first and shortened on the following pass.

mod common;
mod css;
mod html;

pub use common::Indentation;
pub use css::{
    DeclarationOrder, HexCase, HexShorthand, LeadingZero, MissingSemicolon, NoImportant,
    PropertyCase, SelectorDepth, ZeroUnit,
};
pub use html::{
    AttributeCase, AttributeOrder, AttributeQuotes, BooleanAttribute, DoctypeRequired,
    DoctypeStyle, DuplicateAttribute, LangRequired, TagCase, VoidElementSlash,
};

use crate::rule::{DuplicateRuleError, Registry};

/// Registry with every built-in rule, in priority order.
pub fn default_registry() -> Result<Registry, DuplicateRuleError> {
    let mut registry = Registry::new();
    let rules: Vec<Box<dyn crate::rule::Rule>> = vec![
        // HTML
        Box::new(TagCase),
        Box::new(AttributeCase),
        Box::new(AttributeQuotes),
        Box::new(DoctypeRequired),
        Box::new(DoctypeStyle),
        Box::new(BooleanAttribute),
        Box::new(VoidElementSlash),
        Box::new(DuplicateAttribute),
        Box::new(LangRequired),
        Box::new(AttributeOrder),
        // CSS
        Box::new(SelectorDepth),
        Box::new(ZeroUnit),
        Box::new(LeadingZero),
        Box::new(HexCase),
        Box::new(HexShorthand),
        Box::new(PropertyCase),
        Box::new(NoImportant),
        Box::new(DeclarationOrder),
        Box::new(MissingSemicolon),
        // Both languages
        Box::new(Indentation),
    ];
    for rule in rules {
        registry.register(rule)?;
    }
    Ok(registry)
}
