use crate::model::EntityKind;
use thiserror::Error;

/// Errors raised while reading an export payload. These abort the whole conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse export JSON: {0}")]
    Json(String),

    #[error("{kind} payload at index {index} is not a JSON object")]
    NotAnObject { kind: EntityKind, index: usize },

    #[error("{kind} payload at index {index} has no source identifier (looked for {candidates})")]
    MissingSourceId {
        kind: EntityKind,
        index: usize,
        candidates: String,
    },

    #[error("Export section '{section}' must be an array")]
    SectionNotArray { section: String },
}

/// Errors raised by the identity registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error(
        "{kind} '{source_id}' is already registered as '{existing}' (base '{existing_base}'), refusing to rebind with base '{requested_base}'"
    )]
    Rebind {
        kind: EntityKind,
        source_id: String,
        existing: String,
        existing_base: String,
        requested_base: String,
    },
}

/// Errors raised while converting a single entity into configuration blocks.
///
/// All variants except `Parse` and `DuplicateBlock` are scoped to one entity; a
/// caller that processes entities independently may keep going after one of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{kind} '{source_id}' is missing required field '{field}'")]
    MissingRequiredField {
        kind: EntityKind,
        source_id: String,
        field: String,
    },

    #[error(
        "{kind} '{source_id}' has conflicting enabled state: status is '{status}' but enabled flag is {flag}"
    )]
    Conflict {
        kind: EntityKind,
        source_id: String,
        status: String,
        flag: bool,
    },

    #[error("{kind} '{source_id}' has an invalid value for '{field}': {message}")]
    InvalidField {
        kind: EntityKind,
        source_id: String,
        field: String,
        message: String,
    },

    #[error("{kind} '{source_id}' was never registered before emission")]
    Unregistered { kind: EntityKind, source_id: String },

    #[error("two different '{resource_type}' blocks are both named '{name}'")]
    DuplicateBlock { resource_type: String, name: String },
}

impl ConvertError {
    /// The entity this error is scoped to, if any.
    pub fn entity(&self) -> Option<(EntityKind, &str)> {
        match self {
            ConvertError::Parse(_) | ConvertError::DuplicateBlock { .. } => None,
            ConvertError::Registry(RegistryError::Rebind {
                kind, source_id, ..
            })
            | ConvertError::MissingRequiredField {
                kind, source_id, ..
            }
            | ConvertError::Conflict {
                kind, source_id, ..
            }
            | ConvertError::InvalidField {
                kind, source_id, ..
            }
            | ConvertError::Unregistered { kind, source_id } => Some((*kind, source_id.as_str())),
        }
    }

    /// Whether this error must abort the whole run rather than just its entity.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            ConvertError::Parse(_) | ConvertError::Registry(_) | ConvertError::DuplicateBlock { .. }
        )
    }
}
