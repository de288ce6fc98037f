//! The translation pass.
//!
//! Walks a tree post-order and rewrites every `tr`, `trc`, `trn` and
//! `marktr` call site using a [`Table`]:
//!
//! - `marktr(msg)` is removed from its parent.
//! - `tr(msg, ...)` / `trc(ctx, msg, ...)` become the translated string, or a
//!   `plus` tree when extra arguments fill `%N` placeholders.
//! - `trn(singular, plural, n, ...)` becomes `trnc({one: ..., other: ...}, n)`
//!   with the category texts expanded the same way.
//!
//! Children are rewritten before their parent is inspected, so nested calls
//! inside arguments are already resolved when the outer call is handled.

use super::{
    ast::{NodeId, NodeKind, Tree},
    diagnostics::{Diagnostic, DiagnosticSink, TranslationFn},
    error::PatchError,
    splitter::split,
    table::{Entry, Table, context_key, plural_key},
};


/// Callee name `trn` calls are rewritten to.
pub const PLURAL_RUNTIME_FN: &str = "trnc";

/// Patch the subtree at `root` in place.
///
/// On error the tree may be partially rewritten and should be discarded.
pub fn patch(
    tree: &mut Tree,
    root: NodeId,
    table: &Table,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), PatchError> {
    Patcher::new(table, sink).patch(tree, root)
}

/// Whether the subtree at `node` contains a `tr`, `trc` or `trn` call site.
pub fn has_text(tree: &Tree, node: NodeId) -> bool {
    tree.descendants(node).any(|id| {
        call_site(tree, id).is_some_and(|site| site.function != TranslationFn::Marktr)
    })
}

/// A recognized translation call.
#[derive(Debug, Clone, Copy)]
struct CallSite {
    function: TranslationFn,
    /// Identifier node holding the function name.
    name: NodeId,
    /// Argument list of the call.
    args: NodeId,
}

/// Recognize `name(...)` and `anything.name(...)` with a known name.
fn call_site(tree: &Tree, node: NodeId) -> Option<CallSite> {
    if tree.kind(node) != NodeKind::Call {
        return None;
    }
    let callee = tree.child(node, 0)?;
    let name = match tree.kind(callee) {
        NodeKind::Identifier => callee,
        NodeKind::Dot => tree
            .child(callee, 1)
            .filter(|&prop| tree.kind(prop) == NodeKind::Identifier)?,
        _ => return None,
    };
    let function = TranslationFn::from_name(tree.value(name)?)?;
    let args = tree
        .child(node, 1)
        .filter(|&list| tree.kind(list) == NodeKind::List)?;
    Some(CallSite {
        function,
        name,
        args,
    })
}

pub struct Patcher<'a> {
    table: &'a Table,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Patcher<'a> {
    pub fn new(table: &'a Table, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self { table, sink }
    }

    pub fn patch(&mut self, tree: &mut Tree, root: NodeId) -> Result<(), PatchError> {
        self.visit(tree, root)
    }

    fn visit(&mut self, tree: &mut Tree, node: NodeId) -> Result<(), PatchError> {
        // Snapshot: visiting a child may replace or remove it in `node`.
        let children = tree.children(node).to_vec();
        for child in children {
            self.visit(tree, child)?;
        }

        if let Some(site) = call_site(tree, node) {
            match site.function {
                TranslationFn::Marktr => self.remove_marker(tree, node),
                TranslationFn::Tr => self.inline_text(tree, node, site, 0)?,
                TranslationFn::Trc => self.inline_text(tree, node, site, 1)?,
                TranslationFn::Trn => self.inline_plural(tree, node, site)?,
            }
        }
        Ok(())
    }

    fn remove_marker(&mut self, tree: &mut Tree, call: NodeId) {
        if let Some(parent) = tree.parent(call) {
            tree.remove(parent, call);
            self.transformed(tree, call, TranslationFn::Marktr);
        }
    }

    /// `tr(msg, ...rest)` and `trc(context, msg, ...rest)`.
    fn inline_text(
        &mut self,
        tree: &mut Tree,
        call: NodeId,
        site: CallSite,
        message_index: usize,
    ) -> Result<(), PatchError> {
        let mut literals = Vec::with_capacity(message_index + 1);
        for index in 0..=message_index {
            match self.literal(tree, call, site, index) {
                Some(literal) => literals.push(literal),
                None => return Ok(()),
            }
        }
        let Some((message, text)) = literals.pop() else {
            return Ok(());
        };
        let key = match literals.first() {
            Some((_, context)) => context_key(&text, context),
            None => text,
        };

        let table = self.table;
        match table.lookup(&key).and_then(Entry::as_text) {
            Some(translated) => tree.set_value(message, translated),
            None => self.sink.emit(Diagnostic::Untranslated {
                key,
                line: tree.node(call).line,
            }),
        }

        let rest = tree.children(site.args)[message_index + 1..].to_vec();
        let replacement = if rest.is_empty() {
            message
        } else {
            let template = tree.value(message).unwrap_or_default().to_string();
            split(tree, &template, &rest)?.unwrap_or(message)
        };

        self.replace_call(tree, call, replacement);
        self.transformed(tree, call, site.function);
        Ok(())
    }

    /// `trn(singular, plural, count, ...rest)` to `trnc({...}, count)`.
    fn inline_plural(
        &mut self,
        tree: &mut Tree,
        call: NodeId,
        site: CallSite,
    ) -> Result<(), PatchError> {
        let Some((_, singular)) = self.literal(tree, call, site, 0) else {
            return Ok(());
        };
        let Some((_, plural)) = self.literal(tree, call, site, 1) else {
            return Ok(());
        };

        let table = self.table;
        let key = plural_key(&singular, &plural);
        let Some(forms) = table.lookup(&key).and_then(Entry::as_plural) else {
            self.sink.emit(Diagnostic::MissingPluralKey {
                key,
                line: tree.node(call).line,
            });
            return Ok(());
        };

        tree.set_value(site.name, PLURAL_RUNTIME_FN);
        tree.remove_at(site.args, 0);
        tree.remove_at(site.args, 0);

        let container = tree.alloc(NodeKind::ObjectInit, None);
        for (category, text) in forms {
            let key = tree.alloc_leaf(NodeKind::Identifier, category.as_str());
            let value = tree.alloc_leaf(NodeKind::String, text.as_str());
            let property = tree.alloc_with(NodeKind::PropertyInit, &[key, value]);
            tree.append(container, property);
        }
        tree.insert(site.args, 0, container);

        if tree.children(site.args).len() > 2 {
            let rest = tree.children(site.args)[2..].to_vec();
            for property in tree.children(container).to_vec() {
                let Some(value) = tree.child(property, 1) else {
                    continue;
                };
                let template = tree.value(value).unwrap_or_default().to_string();
                if let Some(replacement) = split(tree, &template, &rest)? {
                    tree.replace(property, value, replacement);
                }
            }
            // Every placeholder is expanded, the values are not needed at runtime.
            while tree.children(site.args).len() > 2 {
                tree.pop(site.args);
            }
        }

        self.transformed(tree, call, TranslationFn::Trn);
        Ok(())
    }

    /// String literal at argument `index`, or a warning and `None`.
    fn literal(
        &mut self,
        tree: &Tree,
        call: NodeId,
        site: CallSite,
        index: usize,
    ) -> Option<(NodeId, String)> {
        let arg = tree.child(site.args, index);
        if let Some(arg) = arg
            && tree.kind(arg) == NodeKind::String
        {
            return Some((arg, tree.value(arg).unwrap_or_default().to_string()));
        }

        self.sink.emit(Diagnostic::NonLiteralArgument {
            function: site.function,
            index,
            found: arg.map(|arg| tree.kind(arg).as_str()),
            line: arg
                .and_then(|arg| tree.node(arg).line)
                .or(tree.node(call).line),
        });
        None
    }

    fn replace_call(&mut self, tree: &mut Tree, call: NodeId, replacement: NodeId) {
        match tree.parent(call) {
            Some(parent) => {
                tree.replace(parent, call, replacement);
            }
            None => tree.transplant(call, replacement),
        }
    }

    fn transformed(&mut self, tree: &Tree, call: NodeId, function: TranslationFn) {
        self.sink.emit(Diagnostic::Transformed {
            function,
            line: tree.node(call).line,
        });
    }
}
