//! The explicit, versioned list of flow settings the target schema accepts.

use super::structure::snake_entries;
use crate::encoder::Expr;
use crate::model::ValueNode;
use std::collections::BTreeSet;

/// Flow settings keys supported by the first provider schema revision.
pub const FLOW_SETTINGS_V1: &[&str] = &[
    "csp",
    "css",
    "cssLinks",
    "customErrorScreenBrandLogoUrl",
    "customErrorShowFooter",
    "customFaviconLink",
    "customLogoURLSelection",
    "customTitle",
    "defaultErrorScreenBrandLogo",
    "flowHttpTimeoutInSeconds",
    "flowTimeoutInSeconds",
    "intermediateLoadingScreenCSS",
    "intermediateLoadingScreenHTML",
    "jsCustomFlowPlayer",
    "jsLinks",
    "logLevel",
    "requireAuthenticationToInitiate",
    "scrubSensitiveInfo",
    "sensitiveInfoFields",
    "useCSP",
    "useCustomCSS",
    "useCustomFlowPlayer",
    "useCustomScript",
    "useIntermediateLoadingScreen",
    "validateOnSave",
];

/// Flow settings keys added in the second revision.
const FLOW_SETTINGS_V2_ADDITIONS: &[&str] = &["pingOneFlow", "enforceSignedRequestOpenid"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsAllowList {
    version: String,
    keys: BTreeSet<String>,
}

impl Default for SettingsAllowList {
    fn default() -> Self {
        Self::v1()
    }
}

impl SettingsAllowList {
    pub fn new<S: Into<String>>(version: impl Into<String>, keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            version: version.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn v1() -> Self {
        Self::new("v1", FLOW_SETTINGS_V1.iter().copied())
    }

    pub fn v2() -> Self {
        Self::new(
            "v2",
            FLOW_SETTINGS_V1
                .iter()
                .chain(FLOW_SETTINGS_V2_ADDITIONS)
                .copied(),
        )
    }

    /// Looks up a built-in list by version tag.
    pub fn for_version(version: &str) -> Option<Self> {
        match version {
            "v1" => Some(Self::v1()),
            "v2" => Some(Self::v2()),
            _ => None,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn allows(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Keeps only supported keys, renamed to snake_case. Unsupported keys are
    /// dropped without complaint. Returns `None` when nothing survives.
    pub fn filter(&self, settings: &ValueNode) -> Option<Expr> {
        let kept = snake_entries(
            settings
                .as_mapping()?
                .iter()
                .filter(|(key, _)| self.allows(key))
                .map(|(key, value)| (key, Expr::from(value))),
        );
        (!kept.is_empty()).then_some(Expr::Object(kept))
    }
}
