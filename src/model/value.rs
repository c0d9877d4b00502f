use std::collections::BTreeMap;
use std::fmt;

/// A loosely-typed attribute tree as found in export payloads.
///
/// Mappings are held in a `BTreeMap`, so iterating one always yields keys in
/// lexicographic order regardless of the order they arrived in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueNode {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<ValueNode>),
    Mapping(BTreeMap<String, ValueNode>),
}

impl ValueNode {
    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        match self {
            ValueNode::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Walks a chain of mapping keys.
    pub fn get_path(&self, path: &[&str]) -> Option<&ValueNode> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Looks up the first key from `keys` that is present.
    pub fn get_any(&self, keys: &[&str]) -> Option<&ValueNode> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueNode::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ValueNode::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ValueNode::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ValueNode]> {
        match self {
            ValueNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, ValueNode>> {
        match self {
            ValueNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ValueNode::Null)
    }

    /// Null, the empty string, and empty collections count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            ValueNode::Null => true,
            ValueNode::String(s) => s.is_empty(),
            ValueNode::Sequence(items) => items.is_empty(),
            ValueNode::Mapping(map) => map.is_empty(),
            ValueNode::Bool(_) | ValueNode::Number(_) => false,
        }
    }

    /// A scalar rendered as plain text, used where identifiers are expected.
    /// Numbers follow the same integer normalization as the encoder.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            ValueNode::String(s) => Some(s.clone()),
            ValueNode::Number(n) => Some(format_number(*n)),
            ValueNode::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Builds a mapping from `(key, value)` pairs; later duplicates win.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ValueNode)>,
    {
        ValueNode::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Renders a number as an integer when it has no fractional part, otherwise in
/// its shortest decimal form.
pub fn format_number(n: f64) -> String {
    // Beyond 2^53 an f64 no longer maps onto distinct integers.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueNode::Null => write!(f, "null"),
            ValueNode::Bool(b) => write!(f, "{}", b),
            ValueNode::Number(n) => write!(f, "{}", format_number(*n)),
            ValueNode::String(s) => write!(f, "{:?}", s),
            ValueNode::Sequence(items) => write!(f, "[{} items]", items.len()),
            ValueNode::Mapping(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

impl From<serde_json::Value> for ValueNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ValueNode::Null,
            serde_json::Value::Bool(b) => ValueNode::Bool(b),
            // Every JSON number fits an f64, possibly with precision loss on huge integers.
            serde_json::Value::Number(n) => ValueNode::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => ValueNode::String(s),
            serde_json::Value::Array(items) => {
                ValueNode::Sequence(items.into_iter().map(ValueNode::from).collect())
            }
            serde_json::Value::Object(map) => ValueNode::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ValueNode::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ValueNode {
    fn from(value: &str) -> Self {
        ValueNode::String(value.to_string())
    }
}

impl From<String> for ValueNode {
    fn from(value: String) -> Self {
        ValueNode::String(value)
    }
}

impl From<bool> for ValueNode {
    fn from(value: bool) -> Self {
        ValueNode::Bool(value)
    }
}

impl From<f64> for ValueNode {
    fn from(value: f64) -> Self {
        ValueNode::Number(value)
    }
}
