//! Expansion of `%N` templates into concatenation trees.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    ast::{NodeId, NodeKind, Tree},
    error::PatchError,
};

/// Positional markers `%1` to `%9`.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[1-9]").unwrap());

/// Split `template` on its placeholders and build a left-folded `plus` tree.
///
/// Literal segments become `string` leaves, each `%N` becomes a deep copy of
/// `args[N - 1]` so one argument can appear any number of times. Copies of
/// anything but identifiers and calls are parenthesized.
///
/// Returns `Ok(None)` when the template has no placeholder. A template with a
/// single placeholder and no literal text yields that copy alone.
pub fn split(
    tree: &mut Tree,
    template: &str,
    args: &[NodeId],
) -> Result<Option<NodeId>, PatchError> {
    let mut operands = Vec::new();
    let mut cursor = 0;
    let mut found = false;

    for marker in PLACEHOLDER_REGEX.find_iter(template) {
        found = true;
        push_text(tree, &mut operands, &template[cursor..marker.start()]);

        let position = usize::from(marker.as_str().as_bytes()[1] - b'0');
        let Some(&arg) = args.get(position - 1) else {
            return Err(PatchError::PlaceholderReference {
                template: template.to_string(),
                marker: marker.as_str().to_string(),
                available: args.len(),
            });
        };

        let copy = tree.deep_copy(arg);
        if !matches!(tree.kind(copy), NodeKind::Identifier | NodeKind::Call) {
            tree.node_mut(copy).parenthesized = true;
        }
        operands.push(copy);
        cursor = marker.end();
    }

    if !found {
        return Ok(None);
    }
    push_text(tree, &mut operands, &template[cursor..]);

    let mut operands = operands.into_iter();
    let Some(mut acc) = operands.next() else {
        return Ok(None);
    };
    for operand in operands {
        acc = tree.alloc_with(NodeKind::Plus, &[acc, operand]);
    }
    Ok(Some(acc))
}

fn push_text(tree: &mut Tree, operands: &mut Vec<NodeId>, text: &str) {
    if !text.is_empty() {
        operands.push(tree.alloc_leaf(NodeKind::String, text));
    }
}
