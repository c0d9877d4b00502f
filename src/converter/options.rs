use crate::extract::ExtractionMode;
use crate::model::EntityKind;
use crate::resolver::ResolutionMode;
use serde::{Deserialize, Serialize};

/// Default name of the input variable every resource binds its environment to.
pub const DEFAULT_ENVIRONMENT_VARIABLE: &str = "pingone_environment_id";

/// Caller-facing conversion settings. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// `reference` (default) or `inlined` (skip-dependencies).
    pub resolution: ResolutionMode,
    pub extraction: ExtractionMode,
    /// Kinds left out of the run; references into them become placeholders.
    pub excluded_kinds: Vec<EntityKind>,
    pub environment_variable: String,
    /// Version tag of the flow settings allow-list.
    pub settings_version: String,
    /// Extra property names to treat as secrets.
    pub secret_names: Vec<String>,
    /// Extra property names never to parameterize.
    pub excluded_names: Vec<String>,
    /// Keep converting other entities after an entity-scoped error.
    pub continue_on_error: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            resolution: ResolutionMode::default(),
            extraction: ExtractionMode::default(),
            excluded_kinds: Vec::new(),
            environment_variable: DEFAULT_ENVIRONMENT_VARIABLE.to_string(),
            settings_version: "v1".to_string(),
            secret_names: Vec::new(),
            excluded_names: Vec::new(),
            continue_on_error: false,
        }
    }
}

impl ConvertOptions {
    pub fn is_excluded(&self, kind: EntityKind) -> bool {
        self.excluded_kinds.contains(&kind)
    }
}
