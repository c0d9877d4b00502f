use super::{EntityKind, ValueNode};
use crate::error::ParseError;

/// Separator DaVinci appends to variable names to carry their context.
const VARIABLE_CONTEXT_SEPARATOR: &str = "##SK##";

/// One entity read from an export payload. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedEntity {
    pub kind: EntityKind,
    pub source_id: String,
    pub display_name: String,
    pub attributes: ValueNode,
}

impl ExportedEntity {
    pub fn new(
        kind: EntityKind,
        source_id: impl Into<String>,
        display_name: impl Into<String>,
        attributes: ValueNode,
    ) -> Self {
        Self {
            kind,
            source_id: source_id.into(),
            display_name: display_name.into(),
            attributes,
        }
    }

    /// Parses one raw payload. `index` is only used for error reporting.
    pub fn from_payload(
        kind: EntityKind,
        index: usize,
        payload: serde_json::Value,
    ) -> Result<Self, ParseError> {
        if !payload.is_object() {
            return Err(ParseError::NotAnObject { kind, index });
        }
        let attributes = ValueNode::from(payload);

        let source_id = attributes
            .get_any(kind.id_fields())
            .and_then(ValueNode::scalar_text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ParseError::MissingSourceId {
                kind,
                index,
                candidates: kind.id_fields().join(", "),
            })?;

        let display_name = attributes
            .get("name")
            .and_then(ValueNode::as_str)
            .filter(|name| !name.is_empty())
            .map(|name| match kind {
                EntityKind::Variable => strip_variable_context(name).to_string(),
                _ => name.to_string(),
            })
            .unwrap_or_else(|| source_id.clone());

        Ok(Self {
            kind,
            source_id,
            display_name,
            attributes,
        })
    }

    pub fn attr(&self, key: &str) -> Option<&ValueNode> {
        self.attributes.get(key)
    }

    /// A string attribute, skipping nulls and non-strings.
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(ValueNode::as_str)
    }
}

/// Trims the `##SK##<context>` suffix DaVinci stores on variable names.
pub fn strip_variable_context(name: &str) -> &str {
    name.split(VARIABLE_CONTEXT_SEPARATOR)
        .next()
        .unwrap_or(name)
}
