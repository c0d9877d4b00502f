//! Finds leaf attributes that should become externally supplied parameters.
//!
//! Secrets are always parameterized so their values never appear in the
//! generated configuration. A masked value (the source's redaction sentinel) is
//! still extracted, marked secret, and left without a default: the operator
//! supplies the real value later.

pub mod classify;
pub mod names;

pub use classify::{MASK_SENTINEL, PropertyClassifier, is_masked};
pub use names::ParameterNames;

use crate::encoder::{Block, Expr};
use crate::model::{EntityKind, ExportedEntity, ValueNode};
use crate::naming::join_identifier;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// Which eligible attributes are turned into parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Only secrets.
    #[default]
    SecretsOnly,
    /// Every eligible attribute; non-secrets keep their value as the default.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Bool,
    Number,
    Any,
}

impl ParameterType {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "string" | "secret" | "text" | "textarea" | "dropdown" => Some(ParameterType::String),
            "boolean" | "bool" | "toggleswitch" => Some(ParameterType::Bool),
            "number" | "integer" | "float" => Some(ParameterType::Number),
            _ => None,
        }
    }

    fn from_value(value: &ValueNode) -> Self {
        match value {
            ValueNode::String(_) => ParameterType::String,
            ValueNode::Bool(_) => ParameterType::Bool,
            ValueNode::Number(_) => ParameterType::Number,
            _ => ParameterType::Any,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterType::String => "string",
            ParameterType::Bool => "bool",
            ParameterType::Number => "number",
            ParameterType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A leaf attribute that can be supplied from outside the generated module.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleAttribute {
    pub owner_kind: EntityKind,
    pub owner_name: String,
    pub attribute_path: Vec<String>,
    /// `None` when the source masked the value.
    pub current_value: Option<ValueNode>,
    pub is_secret: bool,
    pub parameter_name: String,
    pub parameter_type: ParameterType,
}

impl EligibleAttribute {
    /// Whether this attribute is parameterized under `mode`.
    pub fn is_parameterized(&self, mode: ExtractionMode) -> bool {
        self.is_secret || mode == ExtractionMode::All
    }

    /// The expression that stands in for the value.
    pub fn reference(&self) -> Expr {
        Expr::raw(format!("var.{}", self.parameter_name))
    }

    /// The `variable` block declaring this parameter.
    pub fn declaration(&self) -> Block {
        let description = format!(
            "{} {} {}",
            self.owner_kind,
            self.owner_name,
            self.attribute_path.join(".")
        );
        let mut block = Block::variable(&self.parameter_name)
            .attribute("type", Expr::raw(self.parameter_type.to_string()))
            .attribute("description", Expr::string(description));
        if self.is_secret {
            block.push_attribute("sensitive", Expr::bool(true));
        } else if let Some(value) = &self.current_value {
            block.push_attribute("default", value);
        }
        block
    }

    /// The path below the scan root, e.g. `clientSecret` for `properties.clientSecret`.
    pub fn leaf_name(&self) -> &str {
        self.attribute_path
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Classifies attributes of an entity as parameter candidates.
///
/// One extractor belongs to one conversion run: it remembers every parameter
/// name it handed out so no two attributes share one.
#[derive(Debug, Clone, Default)]
pub struct VariableExtractor {
    classifier: PropertyClassifier,
    names: RefCell<ParameterNames>,
}

impl VariableExtractor {
    pub fn new(classifier: PropertyClassifier) -> Self {
        Self {
            classifier,
            names: RefCell::default(),
        }
    }

    /// Keeps `name` out of the parameter namespace.
    pub fn reserve(&self, name: &str) {
        self.names.borrow_mut().reserve(name);
    }

    pub fn classifier(&self) -> &PropertyClassifier {
        &self.classifier
    }

    /// Extracts every eligible attribute of `entity`. `owner_name` is the
    /// entity's registered name. Extracting the same entity again returns the
    /// same parameter names.
    pub fn extract(&self, entity: &ExportedEntity, owner_name: &str) -> Vec<EligibleAttribute> {
        match entity.kind {
            EntityKind::ConnectorInstance => {
                self.scan_mapping(entity, owner_name, &["properties"])
            }
            EntityKind::Application => self.scan_mapping(entity, owner_name, &["oauth", "values"]),
            EntityKind::Variable => self.scan_variable(entity, owner_name).into_iter().collect(),
            EntityKind::Flow | EntityKind::Policy => Vec::new(),
        }
    }

    fn scan_mapping(
        &self,
        entity: &ExportedEntity,
        owner_name: &str,
        root: &[&str],
    ) -> Vec<EligibleAttribute> {
        let Some(entries) = entity
            .attributes
            .get_path(root)
            .and_then(ValueNode::as_mapping)
        else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|(name, node)| {
                let mut path: Vec<String> = root.iter().map(|s| s.to_string()).collect();
                path.push(name.clone());
                self.classify_leaf(entity, owner_name, path, name, node)
            })
            .collect()
    }

    fn classify_leaf(
        &self,
        entity: &ExportedEntity,
        owner_name: &str,
        attribute_path: Vec<String>,
        name: &str,
        node: &ValueNode,
    ) -> Option<EligibleAttribute> {
        if self.classifier.is_excluded(name) {
            return None;
        }

        let name_is_secret = self.classifier.is_secret(name);
        let (tag, value) = match node {
            ValueNode::Mapping(fields) if fields.contains_key("type") && fields.contains_key("value") => (
                fields.get("type").and_then(ValueNode::as_str),
                fields.get("value")?,
            ),
            _ if name_is_secret => (None, node),
            _ => return None,
        };
        if value.is_empty() {
            return None;
        }

        Some(self.build(entity, owner_name, attribute_path, tag, value, name_is_secret))
    }

    /// A variable's own `{dataType, value}` pair makes it a candidate; the
    /// `secret` data type marks it secret.
    fn scan_variable(&self, entity: &ExportedEntity, owner_name: &str) -> Option<EligibleAttribute> {
        let value = entity.attr("value")?;
        if value.is_empty() {
            return None;
        }
        let tag = entity.str_attr("dataType");
        let is_secret = tag.is_some_and(|t| t.eq_ignore_ascii_case("secret"));
        Some(self.build(
            entity,
            owner_name,
            vec!["value".to_string()],
            tag,
            value,
            is_secret,
        ))
    }

    fn build(
        &self,
        entity: &ExportedEntity,
        owner_name: &str,
        attribute_path: Vec<String>,
        tag: Option<&str>,
        value: &ValueNode,
        secret: bool,
    ) -> EligibleAttribute {
        let masked = is_masked(value);
        let current_value = (!masked).then(|| value.clone());
        let parameter_type = match &current_value {
            Some(value) => ParameterType::from_value(value),
            None => tag
                .and_then(ParameterType::from_tag)
                .unwrap_or(ParameterType::String),
        };
        let owner_kind = entity.kind;
        let base = join_identifier(
            [owner_kind.short_name(), owner_name]
                .into_iter()
                .chain(attribute_path.iter().map(String::as_str)),
        );
        let parameter_name = self.names.borrow_mut().assign(
            owner_kind,
            &entity.source_id,
            &attribute_path,
            &base,
        );

        EligibleAttribute {
            owner_kind,
            owner_name: owner_name.to_string(),
            attribute_path,
            current_value,
            is_secret: secret || masked,
            parameter_name,
            parameter_type,
        }
    }
}
