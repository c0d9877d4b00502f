use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of entity an export can contain.
///
/// The declaration order is the dependency order: later kinds may reference
/// earlier ones, never the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Variable,
    ConnectorInstance,
    Flow,
    Application,
    Policy,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Variable,
        EntityKind::ConnectorInstance,
        EntityKind::Flow,
        EntityKind::Application,
        EntityKind::Policy,
    ];

    /// The target resource type that declares an entity of this kind.
    pub fn resource_type(self) -> &'static str {
        match self {
            EntityKind::Variable => "pingone_davinci_variable",
            EntityKind::ConnectorInstance => "pingone_davinci_connector_instance",
            EntityKind::Flow => "pingone_davinci_flow",
            EntityKind::Application => "pingone_davinci_application",
            EntityKind::Policy => "pingone_davinci_application_flow_policy",
        }
    }

    /// Short tag used when deriving names (fallback block names, parameter names).
    pub fn short_name(self) -> &'static str {
        match self {
            EntityKind::Variable => "variable",
            EntityKind::ConnectorInstance => "connector",
            EntityKind::Flow => "flow",
            EntityKind::Application => "application",
            EntityKind::Policy => "policy",
        }
    }

    /// Payload fields that may carry the source identifier, in priority order.
    pub fn id_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Variable => &["id", "name"],
            EntityKind::ConnectorInstance => &["id"],
            EntityKind::Flow => &["flowId", "id"],
            EntityKind::Application => &["appId", "id"],
            EntityKind::Policy => &["policyId", "id"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Variable => "variable",
            EntityKind::ConnectorInstance => "connector instance",
            EntityKind::Flow => "flow",
            EntityKind::Application => "application",
            EntityKind::Policy => "policy",
        };
        f.write_str(label)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "variable" | "variables" => Ok(EntityKind::Variable),
            "connector" | "connectors" | "connector_instance" | "connector_instances" => {
                Ok(EntityKind::ConnectorInstance)
            }
            "flow" | "flows" => Ok(EntityKind::Flow),
            "application" | "applications" | "app" => Ok(EntityKind::Application),
            "policy" | "policies" => Ok(EntityKind::Policy),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}
