use crate::encoder::Expr;
use crate::model::ValueNode;
use crate::naming::snake_case;
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::debug;

/// Collects `entries` under snake_case keys.
///
/// Keys whose snake_case forms coincide (`sourceId` and `source_id`) all keep
/// their source spelling, so no value is overwritten. A source spelling that is
/// not already snake_case holds an uppercase letter, `-` or a space, which no
/// snake_case form does, so it cannot clash with a renamed key.
pub(crate) fn snake_entries<K: AsRef<str>>(
    entries: impl IntoIterator<Item = (K, Expr)>,
) -> BTreeMap<String, Expr> {
    let entries: Vec<(K, Expr)> = entries.into_iter().collect();
    let counts = entries
        .iter()
        .map(|(key, _)| snake_case(key.as_ref()))
        .counts();

    entries
        .into_iter()
        .map(|(key, expr)| {
            let key = key.as_ref();
            let snake = snake_case(key);
            if counts.get(&snake).is_some_and(|n| *n > 1) {
                debug!(key, snake = %snake, "keys collide in snake_case, keeping source spelling");
                (key.to_string(), expr)
            } else {
                (snake, expr)
            }
        })
        .collect()
}

/// Converts one mapping level to snake_case keys; children stay untouched literals.
pub(crate) fn snake_object(map: &BTreeMap<String, ValueNode>) -> BTreeMap<String, Expr> {
    snake_entries(map.iter().map(|(k, v)| (k, Expr::from(v))))
}

/// Like `snake_object`, but for any node; non-mappings pass through as literals.
pub(crate) fn snake_keys(node: &ValueNode) -> Expr {
    match node {
        ValueNode::Mapping(map) => Expr::Object(snake_object(map)),
        other => Expr::from(other),
    }
}

/// Rebuilds `node` as an expression with the value at `path` replaced.
///
/// Keys keep their source spelling. When the path does not exist the node is
/// returned unchanged as a literal.
pub(crate) fn replace_at(
    node: &ValueNode,
    path: &[&str],
    replacement: &dyn Fn(&ValueNode) -> Expr,
) -> Expr {
    let Some((head, rest)) = path.split_first() else {
        return replacement(node);
    };
    match node {
        ValueNode::Mapping(map) if map.contains_key(*head) => Expr::Object(
            map.iter()
                .map(|(k, v)| {
                    let expr = if k == head {
                        replace_at(v, rest, replacement)
                    } else {
                        Expr::from(v)
                    };
                    (k.clone(), expr)
                })
                .collect(),
        ),
        other => Expr::from(other),
    }
}

/// Graph elements arrive either as a list or as a map keyed by their ID.
pub(crate) fn graph_elements(node: Option<&ValueNode>) -> Vec<&ValueNode> {
    match node {
        Some(ValueNode::Sequence(items)) => items.iter().collect(),
        Some(ValueNode::Mapping(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// The declared identifier of a graph element: `data.id`, falling back to `id`.
pub(crate) fn element_id(element: &ValueNode) -> Option<String> {
    element
        .get_path(&["data", "id"])
        .or_else(|| element.get("id"))
        .and_then(ValueNode::scalar_text)
}
