//! Selector resolution for nested rules.
//!
//! Every nested rule gets its fully qualified selector list:
//!
//! ```scss
//! nav, .menu {
//!     a { color: red; }
//!     &:hover { color: blue; }
//! }
//! ```
//!
//! resolves to:
//!
//! ```css
//! nav a, .menu a { color: red; }
//! nav:hover, .menu:hover { color: blue; }
//! ```
//!
//! ## Combination Rules
//!
//! - `&` is replaced by the parent selector, wherever it appears
//! - a fragment without `&` is appended to the parent with a descendant space
//! - multiple parents and fragments combine parent-major
//! - `&` at the top level has no parent and is an error

use crate::error::{CompileError, Result};
use crate::parser::stylesheet::{Directive, Document, RuleItem};

/// Fills [`Rule::resolved`](super::Rule::resolved) for every rule reachable
/// without evaluation.
pub fn resolve_selectors(document: &mut Document) -> Result<()> {
    resolve_items(&mut document.items, &[])
}

/// Resolves the rules in `items` against `parents`.
///
/// Mixin definitions are skipped: their rules are resolved against the
/// selectors of each `@include` site when the mixin is expanded.
pub fn resolve_items(items: &mut [RuleItem], parents: &[String]) -> Result<()> {
    for item in items {
        match item {
            RuleItem::NestedRule(rule) => {
                rule.resolved = if parents.is_empty() {
                    if let Some(fragment) = rule.selectors.iter().find(|s| s.contains('&')) {
                        return Err(CompileError::syntax(
                            format!("top-level selector '{fragment}' may not contain '&'"),
                            rule.span,
                        ));
                    }
                    rule.selectors.clone()
                } else {
                    combine_selectors(parents, &rule.selectors)
                };
                log::trace!("resolved {:?} -> {:?}", rule.selectors, rule.resolved);
                let resolved = rule.resolved.clone();
                resolve_items(&mut rule.body, &resolved)?;
            }
            RuleItem::Directive(Directive::Control(control)) => {
                for body in control.bodies_mut() {
                    resolve_items(body, parents)?;
                }
            }
            RuleItem::Directive(Directive::AtRule {
                body: Some(body), ..
            }) => resolve_items(body, parents)?,
            _ => {}
        }
    }
    Ok(())
}

/// Combines parent selectors with nested fragments.
///
/// ```
/// use scss::parser::combine_selectors;
///
/// let parents = vec!["a".to_string(), "b".to_string()];
/// let children = vec!["&:hover".to_string(), "c".to_string()];
/// assert_eq!(
///     combine_selectors(&parents, &children),
///     vec!["a:hover", "a c", "b:hover", "b c"]
/// );
/// ```
pub fn combine_selectors(parents: &[String], fragments: &[String]) -> Vec<String> {
    let mut combined = Vec::with_capacity(parents.len() * fragments.len());
    for parent in parents {
        for fragment in fragments {
            if fragment.contains('&') {
                combined.push(fragment.replace('&', parent));
            } else {
                combined.push(format!("{parent} {fragment}"));
            }
        }
    }
    combined
}
