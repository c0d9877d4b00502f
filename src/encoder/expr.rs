use super::escape::{comment_text, key, quote};
use crate::model::{ValueNode, format_number};
use std::collections::BTreeMap;

/// Indentation unit for nested output.
pub const INDENT: &str = "  ";

/// A right-hand-side expression in the target language.
///
/// Literal leaves hold raw source data and are escaped when rendered. `Raw`
/// holds target-language text (references, function calls) that is written out
/// verbatim and never escaped.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(ValueNode),
    Raw(String),
    /// A stand-in for an unresolved reference: the raw value plus an inline comment.
    Placeholder { value: String, comment: String },
    List(Vec<Expr>),
    Object(BTreeMap<String, Expr>),
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(ValueNode::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(ValueNode::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Expr::Literal(ValueNode::Number(value))
    }

    pub fn null() -> Self {
        Expr::Literal(ValueNode::Null)
    }

    pub fn raw(expression: impl Into<String>) -> Self {
        Expr::Raw(expression.into())
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expr)>,
    {
        Expr::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Renders the expression. `indent` is the nesting depth of the line the
    /// expression starts on; continuation lines are indented relative to it.
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write(indent, &mut out);
        out
    }

    pub(crate) fn write(&self, indent: usize, out: &mut String) {
        match self {
            Expr::Literal(node) => write_value(node, indent, out),
            Expr::Raw(expression) => out.push_str(expression),
            Expr::Placeholder { value, comment } => {
                out.push_str(&quote(value));
                out.push_str(" /* ");
                out.push_str(&comment_text(comment));
                out.push_str(" */");
            }
            Expr::List(items) => write_list(items, indent, out, |item, depth, out| {
                item.write(depth, out)
            }),
            Expr::Object(entries) => write_object(entries, indent, out, |value, depth, out| {
                value.write(depth, out)
            }),
        }
    }

    /// Whether this expression is a literal empty string or null.
    pub fn is_blank(&self) -> bool {
        matches!(self, Expr::Literal(node) if node.is_null() || node.as_str() == Some(""))
    }
}

impl From<ValueNode> for Expr {
    fn from(node: ValueNode) -> Self {
        Expr::Literal(node)
    }
}

impl From<&ValueNode> for Expr {
    fn from(node: &ValueNode) -> Self {
        Expr::Literal(node.clone())
    }
}

/// Writes a literal value tree.
pub(crate) fn write_value(node: &ValueNode, indent: usize, out: &mut String) {
    match node {
        ValueNode::Null => out.push_str("null"),
        ValueNode::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ValueNode::Number(n) => out.push_str(&format_number(*n)),
        ValueNode::String(s) => out.push_str(&quote(s)),
        ValueNode::Sequence(items) => write_list(items, indent, out, write_value),
        ValueNode::Mapping(entries) => write_object(entries, indent, out, write_value),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Lists keep input order; every element but the last is comma-terminated.
fn write_list<T>(items: &[T], indent: usize, out: &mut String, write_item: fn(&T, usize, &mut String)) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        push_indent(out, indent + 1);
        write_item(item, indent + 1, out);
        if i + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push(']');
}

/// Objects iterate a `BTreeMap`, so keys always come out sorted. An empty
/// object stays on one line.
fn write_object<T>(
    entries: &BTreeMap<String, T>,
    indent: usize,
    out: &mut String,
    write_item: fn(&T, usize, &mut String),
) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let last = entries.len() - 1;
    for (i, (name, value)) in entries.iter().enumerate() {
        push_indent(out, indent + 1);
        out.push_str(&key(name));
        out.push_str(" = ");
        write_item(value, indent + 1, out);
        if i < last {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push('}');
}
