//! Renders a tree back to JavaScript source.
//!
//! `raw` text is emitted verbatim, so everything the front end did not model
//! keeps its original formatting and comments. This is not a minifier.

use serde_json::Value;

use super::ast::{NodeId, NodeKind, Tree};

/// Where an expression is printed, which decides whether a `plus` needs
/// grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Statement, initializer, call argument or property value.
    Free,
    /// Left operand of a `plus`.
    PlusLeft,
    /// Anything tighter: operands of unknown constructs, callees, member objects.
    Tight,
}

pub fn print(tree: &Tree, root: NodeId) -> String {
    let mut printer = Printer {
        tree,
        out: String::new(),
    };
    printer.node(root, Slot::Free);
    printer.out
}

struct Printer<'a> {
    tree: &'a Tree,
    out: String,
}

impl Printer<'_> {
    fn node(&mut self, id: NodeId, slot: Slot) {
        let tree = self.tree;
        let node = tree.node(id);
        let wrap = node.parenthesized || (node.kind == NodeKind::Plus && slot == Slot::Tight);
        if wrap {
            self.out.push('(');
        }

        match node.kind {
            NodeKind::Call => {
                if let Some(callee) = tree.child(id, 0) {
                    self.node(callee, Slot::Tight);
                }
                self.out.push('(');
                if let Some(list) = tree.child(id, 1) {
                    self.list(list);
                }
                self.out.push(')');
            }
            NodeKind::List => self.list(id),
            NodeKind::Dot => {
                if let Some(object) = tree.child(id, 0) {
                    self.node(object, Slot::Tight);
                }
                self.out.push('.');
                if let Some(property) = tree.child(id, 1) {
                    self.node(property, Slot::Tight);
                }
            }
            NodeKind::String => self.string(node.value().unwrap_or_default()),
            NodeKind::Identifier | NodeKind::Number | NodeKind::Raw => {
                self.out.push_str(node.value().unwrap_or_default());
            }
            NodeKind::Plus => {
                let children = node.children();
                if let [left, right] = children {
                    self.node(*left, Slot::PlusLeft);
                    self.out.push_str(" + ");
                    self.node(*right, Slot::Tight);
                } else {
                    for (index, &child) in children.iter().enumerate() {
                        if index > 0 {
                            self.out.push_str(" + ");
                        }
                        self.node(child, Slot::Tight);
                    }
                }
            }
            NodeKind::ObjectInit => {
                self.out.push('{');
                for (index, &property) in node.children().iter().enumerate() {
                    self.out.push_str(if index == 0 { " " } else { ", " });
                    self.node(property, Slot::Free);
                }
                self.out
                    .push_str(if node.children().is_empty() { "}" } else { " }" });
            }
            NodeKind::PropertyInit => {
                if let Some(key) = tree.child(id, 0) {
                    self.property_key(key);
                }
                self.out.push_str(": ");
                if let Some(value) = tree.child(id, 1) {
                    self.node(value, Slot::Free);
                }
            }
            NodeKind::Other => {
                let mut slot = if node.parent().is_none() {
                    Slot::Free
                } else {
                    Slot::Tight
                };
                for &child in node.children() {
                    self.node(child, slot);
                    slot = match tree.kind(child) {
                        NodeKind::Raw => slot_after(tree.value(child).unwrap_or_default()),
                        _ => Slot::Tight,
                    };
                }
            }
        }

        if wrap {
            self.out.push(')');
        }
    }

    fn list(&mut self, list: NodeId) {
        let tree = self.tree;
        for (index, &arg) in tree.children(list).iter().enumerate() {
            if index > 0 {
                self.out.push_str(", ");
            }
            self.node(arg, Slot::Free);
        }
    }

    fn property_key(&mut self, key: NodeId) {
        let tree = self.tree;
        let name = tree.value(key).unwrap_or_default();
        if tree.kind(key) == NodeKind::Identifier && is_identifier_name(name) {
            self.out.push_str(name);
        } else {
            self.string(name);
        }
    }

    fn string(&mut self, text: &str) {
        // JSON string syntax is valid JavaScript string syntax.
        self.out
            .push_str(&Value::String(text.to_string()).to_string());
    }
}

/// Slot of an expression that follows verbatim `text`.
///
/// Free after assignments, openers, separators and `return`, where nothing
/// binds tighter than `+`.
fn slot_after(text: &str) -> Slot {
    let text = text.trim_end();
    let after_return = text.strip_suffix("return").is_some_and(|before| {
        !before.ends_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
    });
    if after_return || text.ends_with(['=', '(', '[', ',', ':', ';', '{', '}']) {
        Slot::Free
    } else {
        Slot::Tight
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn leaf(tree: &mut Tree, kind: NodeKind, value: &str) -> NodeId {
        tree.alloc_leaf(kind, value)
    }

    #[test]
    fn test_print_call_and_member() {
        let mut tree = Tree::new();
        let core = leaf(&mut tree, NodeKind::Identifier, "core");
        let trnc = leaf(&mut tree, NodeKind::Identifier, "trnc");
        let dot = tree.alloc_with(NodeKind::Dot, &[core, trnc]);
        let one_key = leaf(&mut tree, NodeKind::Identifier, "one");
        let one_text = leaf(&mut tree, NodeKind::String, "1 file");
        let one = tree.alloc_with(NodeKind::PropertyInit, &[one_key, one_text]);
        let other_key = leaf(&mut tree, NodeKind::Identifier, "other");
        let other_text = leaf(&mut tree, NodeKind::String, "%1 \"files\"");
        let other = tree.alloc_with(NodeKind::PropertyInit, &[other_key, other_text]);
        let object = tree.alloc_with(NodeKind::ObjectInit, &[one, other]);
        let n = leaf(&mut tree, NodeKind::Identifier, "n");
        let list = tree.alloc_with(NodeKind::List, &[object, n]);
        let call = tree.alloc_with(NodeKind::Call, &[dot, list]);

        assert_snapshot!(print(&tree, call), @r#"core.trnc({ one: "1 file", other: "%1 \"files\"" }, n)"#);
    }

    #[test]
    fn test_print_plus_grouping() {
        let mut tree = Tree::new();
        let hello = leaf(&mut tree, NodeKind::String, "Hello ");
        let a = leaf(&mut tree, NodeKind::Identifier, "a");
        let b = leaf(&mut tree, NodeKind::Identifier, "b");
        let sum = tree.alloc_with(NodeKind::Plus, &[a, b]);
        tree.node_mut(sum).parenthesized = true;
        let inner = tree.alloc_with(NodeKind::Plus, &[hello, sum]);
        let bang = leaf(&mut tree, NodeKind::String, "!");
        let outer = tree.alloc_with(NodeKind::Plus, &[inner, bang]);

        let before = leaf(&mut tree, NodeKind::Raw, "var x = 2 * ");
        let after = leaf(&mut tree, NodeKind::Raw, ";\n");
        let statement = tree.alloc_with(NodeKind::Other, &[before, outer, after]);

        assert_snapshot!(print(&tree, outer), @r#""Hello " + (a + b) + "!""#);
        assert_eq!(
            print(&tree, statement),
            "var x = 2 * (\"Hello \" + (a + b) + \"!\");\n"
        );
    }

    #[test]
    fn test_print_plus_in_statement_position() {
        let mut tree = Tree::new();
        let statement = |tree: &mut Tree, before: &str| {
            let before = leaf(tree, NodeKind::Raw, before);
            let hello = leaf(tree, NodeKind::String, "Hallo ");
            let n = leaf(tree, NodeKind::Identifier, "n");
            let sum = tree.alloc_with(NodeKind::Plus, &[hello, n]);
            let after = leaf(tree, NodeKind::Raw, ";\n");
            tree.alloc_with(NodeKind::Other, &[before, sum, after])
        };

        let initializer = statement(&mut tree, "var a = ");
        let returned = statement(&mut tree, "  return ");
        let operand = statement(&mut tree, "x = 2 * ");
        let returned_name = statement(&mut tree, "f.noreturn ");

        assert_eq!(print(&tree, initializer), "var a = \"Hallo \" + n;\n");
        assert_eq!(print(&tree, returned), "  return \"Hallo \" + n;\n");
        assert_eq!(print(&tree, operand), "x = 2 * (\"Hallo \" + n);\n");
        assert_eq!(print(&tree, returned_name), "f.noreturn (\"Hallo \" + n);\n");
    }

    #[test]
    fn test_nested_passthrough_starts_tight() {
        let mut tree = Tree::new();
        let before = leaf(&mut tree, NodeKind::Raw, "x = ");
        let hello = leaf(&mut tree, NodeKind::String, "Hallo ");
        let n = leaf(&mut tree, NodeKind::Identifier, "n");
        let sum = tree.alloc_with(NodeKind::Plus, &[hello, n]);
        let times = leaf(&mut tree, NodeKind::Raw, " * 2");
        let product = tree.alloc_with(NodeKind::Other, &[sum, times]);
        let after = leaf(&mut tree, NodeKind::Raw, ";");
        let statement = tree.alloc_with(NodeKind::Other, &[before, product, after]);

        assert_eq!(print(&tree, statement), "x = (\"Hallo \" + n) * 2;");
    }

    #[test]
    fn test_print_quoted_property_key() {
        let mut tree = Tree::new();
        let key = leaf(&mut tree, NodeKind::Identifier, "not valid");
        let value = leaf(&mut tree, NodeKind::Number, "1");
        let property = tree.alloc_with(NodeKind::PropertyInit, &[key, value]);
        let object = tree.alloc_with(NodeKind::ObjectInit, &[property]);
        let empty = tree.alloc(NodeKind::ObjectInit, None);

        assert_eq!(print(&tree, object), r#"{ "not valid": 1 }"#);
        assert_eq!(print(&tree, empty), "{}");
    }

    #[test]
    fn test_identifier_names() {
        assert!(is_identifier_name("other"));
        assert!(is_identifier_name("$_x1"));
        assert!(!is_identifier_name("1x"));
        assert!(!is_identifier_name(""));
    }
}
