//! JavaScript/TypeScript front end.
//!
//! Parses a file with swc and lowers the module into a [`Tree`]. Only the
//! expressions on the way to a translation call are modeled structurally;
//! everything else is kept as verbatim `raw` text, so printing an untouched
//! tree reproduces the file byte for byte.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, GLOBALS, Globals, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    BinaryOp, CallExpr, Callee, Expr, Lit, MemberExpr, MemberProp, Module, ObjectLit, Prop,
    PropName, PropOrSpread,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{
    ast::{NodeId, NodeKind, Tree},
    diagnostics::TranslationFn,
};

const BOM: char = '\u{feff}';

/// A lowered source file.
pub struct ParsedSource {
    pub tree: Tree,
    /// `other` node spanning the whole file.
    pub root: NodeId,
}

/// Pick the parser syntax from the file extension.
pub fn syntax_for(file_path: &str) -> Syntax {
    if file_path.ends_with(".ts") || file_path.ends_with(".mts") || file_path.ends_with(".cts") {
        Syntax::Typescript(TsSyntax::default())
    } else if file_path.ends_with(".tsx") {
        Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        })
    }
}

/// Parse `code` and lower it into a tree.
pub fn parse_js_source(code: String, file_path: &str) -> Result<ParsedSource> {
    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let has_bom = code.starts_with(BOM);
        // Spans index the text swc keeps, which has no byte order mark.
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );
        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        let mut lowering = Lowering {
            source_map: &source_map,
            text: &source_file.src,
            start: source_file.start_pos,
            tree: Tree::new(),
        };
        let root = lowering.program(&module, has_bom);

        Ok(ParsedSource {
            tree: lowering.tree,
            root,
        })
    })
}

struct Lowering<'a> {
    source_map: &'a SourceMap,
    text: &'a str,
    start: BytePos,
    tree: Tree,
}

impl Lowering<'_> {
    fn program(&mut self, module: &Module, has_bom: bool) -> NodeId {
        let root = self.tree.alloc(NodeKind::Other, None);
        if has_bom {
            let bom = self.tree.alloc_leaf(NodeKind::Raw, BOM.to_string());
            self.tree.append(root, bom);
        }
        let end = self.text.len();
        let found = self.sub_expressions(0, end, |collector| module.visit_children_with(collector));
        self.splice(root, 0, end, found);
        root
    }

    fn expr(&mut self, expr: &Expr) -> NodeId {
        self.lower(expr, false)
    }

    /// String literals are only modeled as arguments of translation calls.
    /// Anywhere else they stay `raw`, keeping their quotes and escapes.
    fn lower(&mut self, expr: &Expr, argument: bool) -> NodeId {
        let id = match expr {
            Expr::Ident(ident) => self.tree.alloc_leaf(NodeKind::Identifier, ident.sym.as_str()),
            Expr::Lit(Lit::Str(s)) if argument => match s.value.as_str() {
                Some(value) => self.tree.alloc_leaf(NodeKind::String, value),
                None => self.raw(s.span),
            },
            Expr::Lit(Lit::Num(n)) => {
                let raw = self.snippet(n.span).to_string();
                self.tree.alloc_leaf(NodeKind::Number, raw)
            }
            Expr::Paren(paren) if argument => {
                let inner = self.lower(&paren.expr, true);
                self.tree.node_mut(inner).parenthesized = true;
                inner
            }
            _ if !mentions_translation(expr) => self.raw(expr.span()),
            Expr::Call(call) => self.call(call, expr),
            Expr::Member(member) => self.member(member, expr),
            Expr::Bin(bin) if bin.op == BinaryOp::Add => {
                let left = self.expr(&bin.left);
                let right = self.expr(&bin.right);
                self.tree.alloc_with(NodeKind::Plus, &[left, right])
            }
            Expr::Object(object) => self.object(object, expr),
            Expr::Paren(paren) => {
                let inner = self.expr(&paren.expr);
                self.tree.node_mut(inner).parenthesized = true;
                inner
            }
            _ => self.other(expr),
        };
        if self.tree.node(id).line.is_none() {
            self.tree.node_mut(id).line = Some(self.line(expr.span()));
        }
        id
    }

    fn call(&mut self, call: &CallExpr, expr: &Expr) -> NodeId {
        let Callee::Expr(callee) = &call.callee else {
            return self.other(expr);
        };
        if call.type_args.is_some() || call.args.iter().any(|arg| arg.spread.is_some()) {
            return self.other(expr);
        }

        let translation =
            callee_name(callee).is_some_and(|name| TranslationFn::from_name(name).is_some());
        let callee = self.callee(callee);
        let list = self.tree.alloc(NodeKind::List, None);
        for arg in &call.args {
            let arg = self.lower(&arg.expr, translation);
            self.tree.append(list, arg);
        }
        self.tree.alloc_with(NodeKind::Call, &[callee, list])
    }

    /// Callees are always lowered structurally so call sites stay recognizable.
    fn callee(&mut self, callee: &Expr) -> NodeId {
        let id = match callee {
            Expr::Member(member) if matches!(member.prop, MemberProp::Ident(_)) => {
                self.member(member, callee)
            }
            _ => return self.expr(callee),
        };
        self.tree.node_mut(id).line = Some(self.line(callee.span()));
        id
    }

    fn member(&mut self, member: &MemberExpr, expr: &Expr) -> NodeId {
        let MemberProp::Ident(prop) = &member.prop else {
            return self.other(expr);
        };
        let object = self.expr(&member.obj);
        let property = self.tree.alloc_leaf(NodeKind::Identifier, prop.sym.as_str());
        self.tree.alloc_with(NodeKind::Dot, &[object, property])
    }

    fn object(&mut self, object: &ObjectLit, expr: &Expr) -> NodeId {
        let mut properties = Vec::with_capacity(object.props.len());
        for prop in &object.props {
            let PropOrSpread::Prop(prop) = prop else {
                return self.other(expr);
            };
            let Prop::KeyValue(kv) = &**prop else {
                return self.other(expr);
            };
            let key = match &kv.key {
                PropName::Ident(ident) => (NodeKind::Identifier, ident.sym.to_string()),
                PropName::Str(s) => match s.value.as_str() {
                    Some(value) => (NodeKind::String, value.to_string()),
                    None => return self.other(expr),
                },
                _ => return self.other(expr),
            };
            properties.push((key, &kv.value));
        }

        let container = self.tree.alloc(NodeKind::ObjectInit, None);
        for ((kind, name), value) in properties {
            let key = self.tree.alloc_leaf(kind, name);
            let value = self.expr(value);
            let property = self.tree.alloc_with(NodeKind::PropertyInit, &[key, value]);
            self.tree.append(container, property);
        }
        container
    }

    /// Passthrough: verbatim text around the lowered sub-expressions.
    fn other(&mut self, expr: &Expr) -> NodeId {
        let span = expr.span();
        let (lo, hi) = (self.offset(span.lo), self.offset(span.hi));
        let id = self.tree.alloc(NodeKind::Other, None);
        let found = self.sub_expressions(lo, hi, |collector| expr.visit_children_with(collector));
        self.splice(id, lo, hi, found);
        id
    }

    fn raw(&mut self, span: Span) -> NodeId {
        let text = self.snippet(span).to_string();
        self.tree.alloc_leaf(NodeKind::Raw, text)
    }

    /// Lower the outermost expressions found by `visit` within `[lo, hi)`.
    fn sub_expressions(
        &mut self,
        lo: usize,
        hi: usize,
        visit: impl FnOnce(&mut SubExpressions<'_, '_>),
    ) -> Vec<(usize, usize, NodeId)> {
        let mut collector = SubExpressions {
            lowering: self,
            lo,
            hi,
            found: Vec::new(),
        };
        visit(&mut collector);
        collector.found
    }

    fn splice(&mut self, parent: NodeId, lo: usize, hi: usize, found: Vec<(usize, usize, NodeId)>) {
        let mut cursor = lo;
        for (start, end, id) in found {
            if start > cursor {
                let text = self.text.get(cursor..start).unwrap_or_default().to_string();
                let raw = self.tree.alloc_leaf(NodeKind::Raw, text);
                self.tree.append(parent, raw);
            }
            self.tree.append(parent, id);
            cursor = end;
        }
        if hi > cursor {
            let text = self.text.get(cursor..hi).unwrap_or_default().to_string();
            let raw = self.tree.alloc_leaf(NodeKind::Raw, text);
            self.tree.append(parent, raw);
        }
    }

    fn offset(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start.0) as usize).min(self.text.len())
    }

    fn snippet(&self, span: Span) -> &str {
        self.text
            .get(self.offset(span.lo)..self.offset(span.hi))
            .unwrap_or_default()
    }

    fn line(&self, span: Span) -> usize {
        self.source_map.lookup_char_pos(span.lo).line
    }
}

/// Collects the outermost expressions below a node, in source order.
struct SubExpressions<'l, 'a> {
    lowering: &'l mut Lowering<'a>,
    lo: usize,
    hi: usize,
    found: Vec<(usize, usize, NodeId)>,
}

impl Visit for SubExpressions<'_, '_> {
    fn visit_expr(&mut self, expr: &Expr) {
        let span = expr.span();
        if span.is_dummy() {
            return;
        }
        let (lo, hi) = (self.lowering.offset(span.lo), self.lowering.offset(span.hi));
        let cursor = self.found.last().map_or(self.lo, |&(_, end, _)| end);
        // Synthesized or overlapping spans stay part of the surrounding text.
        if lo < cursor || hi > self.hi || lo >= hi {
            return;
        }
        let id = self.lowering.expr(expr);
        self.found.push((lo, hi, id));
    }
}

/// Name of `name(...)` or `object.name(...)` callees.
fn callee_name(callee: &Expr) -> Option<&str> {
    match callee {
        Expr::Ident(ident) => Some(ident.sym.as_str()),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => Some(prop.sym.as_str()),
            _ => None,
        },
        _ => None,
    }
}

/// Finds any translation call, `marktr` included.
#[derive(Default)]
struct TranslationCallFinder {
    found: bool,
}

impl Visit for TranslationCallFinder {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.found {
            return;
        }
        if let Callee::Expr(callee) = &node.callee
            && callee_name(callee).is_some_and(|name| TranslationFn::from_name(name).is_some())
        {
            self.found = true;
            return;
        }
        node.visit_children_with(self);
    }
}

fn mentions_translation(expr: &Expr) -> bool {
    let mut finder = TranslationCallFinder::default();
    expr.visit_with(&mut finder);
    finder.found
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{
        diagnostics::Discard,
        patch::patch,
        printer::print,
        table::{Catalog, Table},
    };

    fn lower(code: &str) -> ParsedSource {
        parse_js_source(code.to_string(), "test.js").unwrap()
    }

    fn localize(code: &str, translations: &[(&str, &str)]) -> String {
        let catalog: Catalog = translations.iter().copied().collect();
        let table = Table::build("de", &[catalog], None);
        let mut parsed = lower(code);
        patch(&mut parsed.tree, parsed.root, &table, &mut Discard).unwrap();
        print(&parsed.tree, parsed.root)
    }

    fn modeled_kinds(parsed: &ParsedSource) -> Vec<NodeKind> {
        parsed
            .tree
            .descendants(parsed.root)
            .map(|id| parsed.tree.kind(id))
            .filter(|kind| !matches!(kind, NodeKind::Raw | NodeKind::Other))
            .collect()
    }

    #[test]
    fn test_untouched_file_round_trips() {
        let code = r#"// header comment
import { x } from "./x";

export function f(a, b) {
    const obj = { a: 1, 'b': [a, b] }; // trailing
    return obj.a + b * 2;
}
"#;
        let parsed = lower(code);
        assert_eq!(print(&parsed.tree, parsed.root), code);
        assert!(modeled_kinds(&parsed).is_empty());
    }

    #[test]
    fn test_translation_call_is_modeled() {
        let code = "var msg = core.locale.tr(\"Hello %1\", user, 3);\n";
        let parsed = lower(code);

        // `core.locale` itself stays verbatim text.
        assert_eq!(
            modeled_kinds(&parsed),
            vec![
                NodeKind::Call,
                NodeKind::Dot,
                NodeKind::Identifier,
                NodeKind::List,
                NodeKind::String,
                NodeKind::Identifier,
                NodeKind::Number,
            ]
        );
        assert_eq!(print(&parsed.tree, parsed.root), code);
    }

    #[test]
    fn test_byte_order_mark_is_kept() {
        let code = "\u{feff}alert(tr(\"x\")); // bom\n";

        let parsed = lower(code);
        assert_eq!(print(&parsed.tree, parsed.root), code);
        assert_eq!(
            localize(code, &[("x", "X")]),
            "\u{feff}alert(\"X\"); // bom\n"
        );
    }

    #[test]
    fn test_untouched_literals_keep_their_spelling() {
        let code = "const s = '\u{fc}\\x41'; alert(tr(\"x\"), 'y');\n";

        assert_eq!(
            localize(code, &[("x", "X")]),
            "const s = '\u{fc}\\x41'; alert(\"X\", 'y');\n"
        );
    }

    #[test]
    fn test_lines_are_recorded() {
        let code = "\n\nalert(tr('hi'));\n";
        let parsed = lower(code);
        let call = parsed
            .tree
            .descendants(parsed.root)
            .find(|&id| {
                parsed.tree.kind(id) == NodeKind::Call
                    && parsed
                        .tree
                        .child(id, 0)
                        .and_then(|callee| parsed.tree.value(callee))
                        == Some("tr")
            })
            .unwrap();

        assert_eq!(parsed.tree.node(call).line, Some(3));
    }

    #[test]
    fn test_parse_error() {
        let result = parse_js_source("var = ;".to_string(), "broken.js");
        assert!(result.is_err());
    }

    #[test]
    fn test_syntax_for_extension() {
        assert!(matches!(syntax_for("a.tsx"), Syntax::Typescript(TsSyntax { tsx: true, .. })));
        assert!(matches!(syntax_for("a.ts"), Syntax::Typescript(TsSyntax { tsx: false, .. })));
        assert!(matches!(syntax_for("a.js"), Syntax::Es(_)));
    }
}
