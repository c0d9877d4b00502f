use super::{EntityKind, ExportedEntity, IntoExport};
use crate::error::ParseError;
use serde_json::Value;

/// Section names accepted for each kind in an export document.
const SECTIONS: &[(&str, EntityKind)] = &[
    ("variables", EntityKind::Variable),
    ("connectors", EntityKind::ConnectorInstance),
    ("connectorInstances", EntityKind::ConnectorInstance),
    ("flows", EntityKind::Flow),
    ("applications", EntityKind::Application),
    ("apps", EntityKind::Application),
    ("policies", EntityKind::Policy),
];

/// All entities of one export, in the order they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBundle {
    pub entities: Vec<ExportedEntity>,
}

impl ExportBundle {
    pub fn new(entities: Vec<ExportedEntity>) -> Self {
        Self { entities }
    }

    /// Parses an export document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;
        value.into_export()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &ExportedEntity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl IntoExport for Value {
    fn into_export(self) -> Result<ExportBundle, ParseError> {
        let Value::Object(mut document) = self else {
            return Err(ParseError::Json(
                "export document must be a JSON object".to_string(),
            ));
        };

        // A bare flow export carries its own flow id at the top level.
        if document.contains_key("flowId") {
            let flow = ExportedEntity::from_payload(EntityKind::Flow, 0, Value::Object(document))?;
            return Ok(ExportBundle::new(vec![flow]));
        }

        let mut entities = Vec::new();
        for (section, kind) in SECTIONS {
            let Some(payloads) = document.remove(*section) else {
                continue;
            };
            let Value::Array(payloads) = payloads else {
                return Err(ParseError::SectionNotArray {
                    section: section.to_string(),
                });
            };

            for (index, payload) in payloads.into_iter().enumerate() {
                if *kind == EntityKind::Application {
                    entities.extend(lift_embedded_policies(&payload, index)?);
                }
                entities.push(ExportedEntity::from_payload(*kind, index, payload)?);
            }
        }
        Ok(ExportBundle::new(entities))
    }
}

impl IntoExport for ExportBundle {
    fn into_export(self) -> Result<ExportBundle, ParseError> {
        Ok(self)
    }
}

/// Applications may embed their flow policies; each one becomes its own entity
/// that remembers which application owns it.
fn lift_embedded_policies(
    application: &Value,
    app_index: usize,
) -> Result<Vec<ExportedEntity>, ParseError> {
    let Some(policies) = application.get("policies").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let app_id = EntityKind::Application
        .id_fields()
        .iter()
        .find_map(|field| application.get(*field).and_then(Value::as_str))
        .ok_or_else(|| ParseError::MissingSourceId {
            kind: EntityKind::Application,
            index: app_index,
            candidates: EntityKind::Application.id_fields().join(", "),
        })?;

    policies
        .iter()
        .enumerate()
        .map(|(index, policy)| {
            let mut policy = policy.clone();
            if let Value::Object(fields) = &mut policy {
                fields
                    .entry("applicationId")
                    .or_insert_with(|| Value::String(app_id.to_string()));
            }
            ExportedEntity::from_payload(EntityKind::Policy, index, policy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_policies_are_lifted() {
        let bundle = json!({
            "applications": [{
                "appId": "app-1",
                "name": "Portal",
                "policies": [{"policyId": "pol-1", "name": "Default"}]
            }]
        })
        .into_export()
        .unwrap();

        let policy = bundle.of_kind(EntityKind::Policy).next().unwrap();
        assert_eq!(policy.source_id, "pol-1");
        assert_eq!(policy.str_attr("applicationId"), Some("app-1"));
        assert_eq!(bundle.of_kind(EntityKind::Application).count(), 1);
    }

    #[test]
    fn test_section_must_be_array() {
        let err = json!({"flows": {"flowId": "x"}}).into_export().unwrap_err();
        assert_eq!(
            err,
            ParseError::SectionNotArray {
                section: "flows".to_string()
            }
        );
    }

    #[test]
    fn test_bare_flow_document() {
        let bundle = ExportBundle::from_json(r#"{"flowId": "f-9", "name": "Solo"}"#).unwrap();
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.entities[0].kind, EntityKind::Flow);
    }
}
