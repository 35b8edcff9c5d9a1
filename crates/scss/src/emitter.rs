//! CSS text generation.
//!
//! [`render`] prints a [`CssTree`] in one of four [`OutputStyle`]s. The
//! styles differ only in whitespace, line breaks and brace placement:
//!
//! ```text
//! nested:      a {                 expanded:    a {
//!                color: red; }                    color: red;
//!                a b {                          }
//!                  x: y; }
//!                                               a b {
//!                                                 x: y;
//!                                               }
//!
//! compact:     a { color: red; }   compressed:  a{color:red}a b{x:y}
//!              a b { x: y; }
//! ```

use crate::eval::{CssAtRule, CssItem, CssNode, CssRule, CssTree};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the generated CSS is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputStyle {
    /// Indentation follows the source nesting; closing braces end the last line.
    #[default]
    Nested = 0,
    /// One declaration per line, closing brace on its own line.
    Expanded = 1,
    /// One rule per line.
    Compact = 2,
    /// No unneeded whitespace.
    Compressed = 3,
}

impl OutputStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Expanded => "expanded",
            Self::Compact => "compact",
            Self::Compressed => "compressed",
        }
    }
}

/// An output style given by an unknown number or name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output style: {0}")]
pub struct UnknownOutputStyle(pub String);

impl TryFrom<i32> for OutputStyle {
    type Error = UnknownOutputStyle;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Nested),
            1 => Ok(Self::Expanded),
            2 => Ok(Self::Compact),
            3 => Ok(Self::Compressed),
            other => Err(UnknownOutputStyle(other.to_string())),
        }
    }
}

impl FromStr for OutputStyle {
    type Err = UnknownOutputStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nested" => Ok(Self::Nested),
            "expanded" => Ok(Self::Expanded),
            "compact" => Ok(Self::Compact),
            "compressed" => Ok(Self::Compressed),
            _ => Err(UnknownOutputStyle(s.to_string())),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders `tree` as CSS text.
///
/// An empty tree renders as an empty string. Every other style ends with a
/// newline; compressed output does not.
pub fn render(tree: &CssTree, style: OutputStyle) -> String {
    let mut emitter = Emitter {
        style,
        out: String::new(),
    };
    match style {
        OutputStyle::Nested => emitter.nested_nodes(&tree.nodes, true),
        OutputStyle::Expanded => emitter.expanded_nodes(&tree.nodes, 0),
        OutputStyle::Compact => emitter.compact_nodes(&tree.nodes),
        OutputStyle::Compressed => {
            for node in &tree.nodes {
                emitter.compressed_node(node);
            }
        }
    }
    emitter.out
}

struct Emitter {
    style: OutputStyle,
    out: String,
}

/// Top-level groups are separated by a blank line, except after a comment.
fn starts_group(nodes: &[CssNode], i: usize) -> bool {
    i > 0 && nodes[i].depth() == 0 && !matches!(nodes[i - 1], CssNode::Comment(_))
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

fn at_rule_head(at_rule: &CssAtRule) -> String {
    if at_rule.params.is_empty() {
        format!("@{}", at_rule.name)
    } else {
        format!("@{} {}", at_rule.name, at_rule.params)
    }
}

/// `a > b` becomes `a>b`.
fn compress_selector(selector: &str) -> String {
    selector
        .replace(" > ", ">")
        .replace(" + ", "+")
        .replace(" ~ ", "~")
}

impl Emitter {
    fn item(&self, item: &CssItem) -> String {
        match item {
            CssItem::Declaration(decl) => {
                let compressed = self.style == OutputStyle::Compressed;
                let value = decl.value.to_css(compressed);
                match (compressed, decl.important) {
                    (true, true) => format!("{}:{value}!important", decl.property),
                    (true, false) => format!("{}:{value}", decl.property),
                    (false, true) => format!("{}: {value} !important;", decl.property),
                    (false, false) => format!("{}: {value};", decl.property),
                }
            }
            CssItem::Comment(text) => text.clone(),
        }
    }

    fn selectors(&self, rule: &CssRule) -> String {
        if self.style == OutputStyle::Compressed {
            rule.selectors
                .iter()
                .map(|s| compress_selector(s))
                .collect::<Vec<_>>()
                .join(",")
        } else {
            rule.selectors.join(", ")
        }
    }

    // ==================== NESTED ====================

    fn nested_nodes(&mut self, nodes: &[CssNode], top_level: bool) {
        for (i, node) in nodes.iter().enumerate() {
            if top_level && starts_group(nodes, i) {
                self.out.push('\n');
            }
            self.nested_node(node);
        }
    }

    fn nested_items(&mut self, items: &[CssItem], prefix: &str) {
        let lines: Vec<String> = items
            .iter()
            .map(|item| format!("{prefix}  {}", self.item(item)))
            .collect();
        self.out.push_str(&lines.join("\n"));
    }

    fn nested_node(&mut self, node: &CssNode) {
        let prefix = indent(node.depth());
        match node {
            CssNode::Comment(comment) => {
                self.out.push_str(&format!("{prefix}{}\n", comment.text));
            }
            CssNode::Rule(rule) => {
                self.out
                    .push_str(&format!("{prefix}{} {{\n", self.selectors(rule)));
                self.nested_items(&rule.items, &prefix);
                self.out.push_str(" }\n");
            }
            CssNode::AtRule(at_rule) if !at_rule.has_block => {
                self.out
                    .push_str(&format!("{prefix}{};\n", at_rule_head(at_rule)));
            }
            CssNode::AtRule(at_rule) => {
                self.out
                    .push_str(&format!("{prefix}{} {{\n", at_rule_head(at_rule)));
                if !at_rule.items.is_empty() {
                    self.nested_items(&at_rule.items, &prefix);
                    self.out.push('\n');
                }
                self.nested_nodes(&at_rule.children, false);
                if self.out.ends_with('\n') {
                    self.out.pop();
                }
                self.out.push_str(" }\n");
            }
        }
    }

    // ==================== EXPANDED ====================

    fn expanded_nodes(&mut self, nodes: &[CssNode], level: usize) {
        for (i, node) in nodes.iter().enumerate() {
            if level == 0 && i > 0 && !matches!(nodes[i - 1], CssNode::Comment(_)) {
                self.out.push('\n');
            }
            self.expanded_node(node, level);
        }
    }

    fn expanded_items(&mut self, items: &[CssItem], level: usize) {
        let prefix = indent(level + 1);
        for item in items {
            let line = format!("{prefix}{}\n", self.item(item));
            self.out.push_str(&line);
        }
    }

    fn expanded_node(&mut self, node: &CssNode, level: usize) {
        let prefix = indent(level);
        match node {
            CssNode::Comment(comment) => {
                self.out.push_str(&format!("{prefix}{}\n", comment.text));
            }
            CssNode::Rule(rule) => {
                self.out
                    .push_str(&format!("{prefix}{} {{\n", self.selectors(rule)));
                self.expanded_items(&rule.items, level);
                self.out.push_str(&format!("{prefix}}}\n"));
            }
            CssNode::AtRule(at_rule) if !at_rule.has_block => {
                self.out
                    .push_str(&format!("{prefix}{};\n", at_rule_head(at_rule)));
            }
            CssNode::AtRule(at_rule) => {
                self.out
                    .push_str(&format!("{prefix}{} {{\n", at_rule_head(at_rule)));
                self.expanded_items(&at_rule.items, level);
                self.expanded_nodes(&at_rule.children, level + 1);
                self.out.push_str(&format!("{prefix}}}\n"));
            }
        }
    }

    // ==================== COMPACT ====================

    fn compact_nodes(&mut self, nodes: &[CssNode]) {
        for (i, node) in nodes.iter().enumerate() {
            if starts_group(nodes, i) {
                self.out.push('\n');
            }
            let line = self.compact_node(node);
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    fn compact_node(&self, node: &CssNode) -> String {
        match node {
            CssNode::Comment(comment) => comment.text.clone(),
            CssNode::Rule(rule) => {
                let items: Vec<String> = rule.items.iter().map(|i| self.item(i)).collect();
                format!("{} {{ {} }}", self.selectors(rule), items.join(" "))
            }
            CssNode::AtRule(at_rule) if !at_rule.has_block => {
                format!("{};", at_rule_head(at_rule))
            }
            CssNode::AtRule(at_rule) => {
                let parts: Vec<String> = at_rule
                    .items
                    .iter()
                    .map(|i| self.item(i))
                    .chain(at_rule.children.iter().map(|c| self.compact_node(c)))
                    .collect();
                format!("{} {{ {} }}", at_rule_head(at_rule), parts.join(" "))
            }
        }
    }

    // ==================== COMPRESSED ====================

    fn compressed_items(&mut self, items: &[CssItem]) {
        let mut wrote_declaration = false;
        for item in items {
            match item {
                CssItem::Declaration(_) => {
                    if wrote_declaration {
                        self.out.push(';');
                    }
                    let text = self.item(item);
                    self.out.push_str(&text);
                    wrote_declaration = true;
                }
                CssItem::Comment(text) if text.starts_with("/*!") => self.out.push_str(text),
                CssItem::Comment(_) => {}
            }
        }
    }

    fn compressed_node(&mut self, node: &CssNode) {
        match node {
            CssNode::Comment(comment) => {
                if comment.text.starts_with("/*!") {
                    self.out.push_str(&comment.text);
                }
            }
            CssNode::Rule(rule) => {
                let selectors = self.selectors(rule);
                self.out.push_str(&selectors);
                self.out.push('{');
                self.compressed_items(&rule.items);
                self.out.push('}');
            }
            CssNode::AtRule(at_rule) if !at_rule.has_block => {
                self.out.push_str(&at_rule_head(at_rule));
                self.out.push(';');
            }
            CssNode::AtRule(at_rule) => {
                self.out.push_str(&at_rule_head(at_rule));
                self.out.push('{');
                self.compressed_items(&at_rule.items);
                for child in &at_rule.children {
                    self.compressed_node(child);
                }
                self.out.push('}');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{CssComment, CssDeclaration};
    use crate::types::{ListSeparator, Value};

    fn decl(property: &str, value: Value) -> CssItem {
        CssItem::Declaration(CssDeclaration {
            property: property.to_string(),
            value,
            important: false,
        })
    }

    fn rule(selectors: &[&str], items: Vec<CssItem>, depth: usize) -> CssNode {
        CssNode::Rule(CssRule {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            items,
            depth,
        })
    }

    fn sample() -> CssTree {
        CssTree {
            nodes: vec![
                rule(
                    &["a", "b > c"],
                    vec![
                        decl("color", Value::ident("red")),
                        decl(
                            "font-family",
                            Value::list(
                                vec![Value::ident("Arial"), Value::ident("sans-serif")],
                                ListSeparator::Comma,
                            ),
                        ),
                    ],
                    0,
                ),
                rule(&["a d"], vec![decl("margin", Value::unitless(0.0))], 1),
                rule(&["e"], vec![decl("x", Value::ident("y"))], 0),
            ],
        }
    }

    // ==================== STYLES ====================

    #[test]
    fn test_nested() {
        assert_eq!(
            render(&sample(), OutputStyle::Nested),
            "a, b > c {\n  color: red;\n  font-family: Arial, sans-serif; }\n  a d {\n    margin: 0; }\n\ne {\n  x: y; }\n"
        );
    }

    #[test]
    fn test_expanded() {
        assert_eq!(
            render(&sample(), OutputStyle::Expanded),
            "a, b > c {\n  color: red;\n  font-family: Arial, sans-serif;\n}\n\na d {\n  margin: 0;\n}\n\ne {\n  x: y;\n}\n"
        );
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            render(&sample(), OutputStyle::Compact),
            "a, b > c { color: red; font-family: Arial, sans-serif; }\na d { margin: 0; }\n\ne { x: y; }\n"
        );
    }

    #[test]
    fn test_compressed() {
        assert_eq!(
            render(&sample(), OutputStyle::Compressed),
            "a,b>c{color:red;font-family:Arial,sans-serif}a d{margin:0}e{x:y}"
        );
    }

    #[test]
    fn test_empty_tree_is_empty_string() {
        for style in [
            OutputStyle::Nested,
            OutputStyle::Expanded,
            OutputStyle::Compact,
            OutputStyle::Compressed,
        ] {
            assert_eq!(render(&CssTree::default(), style), "");
        }
    }

    // ==================== AT-RULES AND COMMENTS ====================

    #[test]
    fn test_nested_media_closes_on_last_line() {
        let tree = CssTree {
            nodes: vec![CssNode::AtRule(CssAtRule {
                name: "media".into(),
                params: "print".into(),
                items: Vec::new(),
                children: vec![rule(&["a"], vec![decl("color", Value::ident("black"))], 1)],
                has_block: true,
                depth: 0,
            })],
        };
        assert_eq!(
            render(&tree, OutputStyle::Nested),
            "@media print {\n  a {\n    color: black; } }\n"
        );
        assert_eq!(
            render(&tree, OutputStyle::Expanded),
            "@media print {\n  a {\n    color: black;\n  }\n}\n"
        );
        assert_eq!(
            render(&tree, OutputStyle::Compressed),
            "@media print{a{color:black}}"
        );
    }

    #[test]
    fn test_compressed_keeps_only_loud_comments() {
        let tree = CssTree {
            nodes: vec![
                CssNode::Comment(CssComment {
                    text: "/*! license */".into(),
                    depth: 0,
                }),
                CssNode::Comment(CssComment {
                    text: "/* note */".into(),
                    depth: 0,
                }),
                rule(
                    &["a"],
                    vec![
                        CssItem::Comment("/* inner */".into()),
                        decl("x", Value::ident("y")),
                    ],
                    0,
                ),
            ],
        };
        assert_eq!(
            render(&tree, OutputStyle::Compressed),
            "/*! license */a{x:y}"
        );
        assert_eq!(
            render(&tree, OutputStyle::Nested),
            "/*! license */\n/* note */\na {\n  /* inner */\n  x: y; }\n"
        );
    }

    #[test]
    fn test_important() {
        let tree = CssTree {
            nodes: vec![CssNode::Rule(CssRule {
                selectors: vec!["a".into()],
                items: vec![CssItem::Declaration(CssDeclaration {
                    property: "color".into(),
                    value: Value::ident("red"),
                    important: true,
                })],
                depth: 0,
            })],
        };
        assert_eq!(render(&tree, OutputStyle::Compact), "a { color: red !important; }\n");
        assert_eq!(render(&tree, OutputStyle::Compressed), "a{color:red!important}");
    }

    // ==================== STYLE NAMES ====================

    #[test]
    fn test_output_style_conversions() {
        assert_eq!(OutputStyle::try_from(3), Ok(OutputStyle::Compressed));
        assert!(OutputStyle::try_from(7).is_err());
        assert_eq!("Expanded".parse::<OutputStyle>(), Ok(OutputStyle::Expanded));
        assert!("pretty".parse::<OutputStyle>().is_err());
        assert_eq!(OutputStyle::Compact.to_string(), "compact");
        assert_eq!(OutputStyle::default(), OutputStyle::Nested);
    }
}
