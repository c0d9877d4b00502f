//! Tests for the per-kind entity emitters.
mod common;
use common::*;
use flowform::emit::resolve_enabled;
use flowform::prelude::*;
use serde_json::json;

fn sample(kind: EntityKind, source_id: &str) -> ExportedEntity {
    sample_bundle()
        .of_kind(kind)
        .find(|e| e.source_id == source_id)
        .cloned()
        .unwrap_or_else(|| panic!("no {} '{}' in the sample export", kind, source_id))
}

fn everything() -> Vec<ExportedEntity> {
    sample_bundle().entities
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, text))
}

#[cfg(test)]
mod flow_tests {
    use super::*;

    #[test]
    fn test_minimal_flow_block() {
        let mfa = sample(EntityKind::Flow, "f-mfa");
        assert_eq!(
            primary_text(&mfa, &[]),
            "resource \"pingone_davinci_flow\" \"MFA\" {\n  environment_id = var.pingone_environment_id\n  name = \"MFA\"\n  enabled = false\n}\n"
        );
    }

    #[test]
    fn test_graph_references_and_ordering() {
        let login = sample(EntityKind::Flow, "f-login");
        let (result, unresolved) = emit_one(
            &login,
            &everything(),
            ResolutionMode::Reference,
            ExtractionMode::SecretsOnly,
        );
        let text = result.unwrap().blocks[0].text.clone();

        assert!(text.contains("  description = \"Primary sign-on\"\n"));
        assert!(text.contains("connection_id = pingone_davinci_connector_instance.HTTP.id"));
        assert!(text.contains("connection_id = pingone_davinci_connector_instance.HTTP_c-http-2.id"));
        assert!(text.contains("value = pingone_davinci_flow.MFA.id"));
        assert!(text.contains(
            "connection_id = \"c-missing\" /* unresolved connector instance \"c-missing\": not present in this export */"
        ));
        // Free-form node properties keep their source keys and escaping.
        assert!(text.contains("subFlowId = {"));
        assert!(text.contains("\"Hello $${user}\""));

        assert!(position(&text, "id = \"n1\"") < position(&text, "id = \"n2\""));
        assert!(position(&text, "id = \"n2\"") < position(&text, "id = \"n3\""));
        assert!(position(&text, "id = \"e1\"") < position(&text, "id = \"e2\""));

        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].request.target_source_id, "c-missing");
        assert_balanced(&text);
    }

    #[test]
    fn test_node_input_order_does_not_matter() {
        let nodes = vec![
            json!({"data": {"id": "b", "nodeType": "EVAL", "properties": {"x": {"value": 1}}}}),
            json!({"data": {"id": "a", "nodeType": "CONNECTION", "connectionId": "c-1"}}),
            json!({"data": {"id": "c", "nodeType": "CONNECTION", "connectionId": "c-1"}}),
        ];
        let edges = vec![
            json!({"data": {"id": "e2", "source": "a", "target": "c"}}),
            json!({"data": {"id": "e1", "source": "a", "target": "b"}}),
        ];
        let build = |nodes: Vec<serde_json::Value>, edges: Vec<serde_json::Value>| {
            entity(
                EntityKind::Flow,
                json!({"flowId": "f-1", "name": "Graph", "graphData": {"elements": {"nodes": nodes, "edges": edges}}}),
            )
        };
        let mut reversed_nodes = nodes.clone();
        reversed_nodes.reverse();
        let mut reversed_edges = edges.clone();
        reversed_edges.reverse();

        let connector = entity(
            EntityKind::ConnectorInstance,
            json!({"id": "c-1", "name": "HTTP", "connectorId": "httpConnector"}),
        );
        let known = [connector];
        let original = primary_text(&build(nodes.clone(), edges.clone()), &known);
        let reversed = primary_text(&build(reversed_nodes, reversed_edges), &known);
        assert_eq!(original, reversed);

        // Nodes keyed by ID instead of listed render the same way.
        let keyed: serde_json::Map<String, serde_json::Value> = nodes
            .iter()
            .map(|n| (n["data"]["id"].as_str().unwrap().to_string(), n.clone()))
            .collect();
        let keyed_flow = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "Graph", "graphData": {"elements": {"nodes": keyed, "edges": edges}}}),
        );
        assert_eq!(original, primary_text(&keyed_flow, &known));
    }

    #[test]
    fn test_node_without_id_is_invalid() {
        let flow = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "Broken", "elements": {"nodes": [{"data": {"nodeType": "EVAL"}}]}}),
        );
        let (result, _) = emit_one(&flow, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        assert!(matches!(
            result,
            Err(ConvertError::InvalidField { ref field, .. }) if field == "elements.nodes[0]"
        ));
    }

    #[test]
    fn test_keys_colliding_in_snake_case_are_both_kept() {
        let flow = entity(
            EntityKind::Flow,
            json!({
                "flowId": "f-1",
                "name": "Edges",
                "graphData": {"elements": {"edges": [{"data": {"id": "e1", "sourceId": "a", "source_id": "b"}}]}}
            }),
        );
        let text = primary_text(&flow, &[]);
        assert!(text.contains("sourceId = \"a\""));
        assert!(text.contains("source_id = \"b\""));
        assert!(position(&text, "sourceId = ") < position(&text, "source_id = "));
        assert_balanced(&text);
    }

    #[test]
    fn test_conflicting_enabled_signals() {
        let flow = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "Login", "flowStatus": "enabled", "enabled": false}),
        );
        let err = resolve_enabled(&flow).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Conflict {
                kind: EntityKind::Flow,
                source_id: "f-1".to_string(),
                status: "enabled".to_string(),
                flag: false,
            }
        );
        let message = err.to_string();
        assert!(message.contains("enabled") && message.contains("false"));
        assert_eq!(err.entity(), Some((EntityKind::Flow, "f-1")));

        let (result, _) = emit_one(&flow, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        assert!(matches!(result, Err(ConvertError::Conflict { .. })));
    }

    #[test]
    fn test_enabled_from_a_single_signal() {
        let status_only = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "A", "flowStatus": "enabled"}),
        );
        assert_eq!(resolve_enabled(&status_only).unwrap(), Some(true));

        let alias = entity(
            EntityKind::Flow,
            json!({"flowId": "f-2", "name": "B", "status": "Disabled"}),
        );
        assert_eq!(resolve_enabled(&alias).unwrap(), Some(false));

        let flag_only = entity(
            EntityKind::Flow,
            json!({"flowId": "f-3", "name": "C", "enabled": true}),
        );
        assert_eq!(resolve_enabled(&flag_only).unwrap(), Some(true));

        let agreeing = entity(
            EntityKind::Flow,
            json!({"flowId": "f-4", "name": "D", "flowStatus": "disabled", "enabled": false}),
        );
        assert_eq!(resolve_enabled(&agreeing).unwrap(), Some(false));
    }

    #[test]
    fn test_no_enabled_signal_omits_the_field() {
        let flow = entity(EntityKind::Flow, json!({"flowId": "f-1", "name": "Quiet"}));
        assert_eq!(resolve_enabled(&flow).unwrap(), None);

        let (result, _) = emit_one(&flow, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        let emission = result.unwrap();
        assert!(emission.blocks.iter().all(|b| !b.text.contains("  enabled =")));
    }

    #[test]
    fn test_unknown_status_is_invalid() {
        let flow = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "Odd", "flowStatus": "paused"}),
        );
        assert!(matches!(
            resolve_enabled(&flow),
            Err(ConvertError::InvalidField { ref field, .. }) if field == "flowStatus"
        ));
    }

    #[test]
    fn test_settings_are_filtered() {
        let login = sample(EntityKind::Flow, "f-login");
        let text = primary_text(&login, &everything());
        assert!(text.contains("  settings = {\n    log_level = 2,\n    use_csp = true\n  }\n"));
        assert!(!text.contains("notASetting"));
        assert!(!text.contains("not_a_setting"));

        let unsupported = entity(
            EntityKind::Flow,
            json!({"flowId": "f-1", "name": "X", "settings": {"madeUp": 1}}),
        );
        assert!(!primary_text(&unsupported, &[]).contains("settings"));
    }

    #[test]
    fn test_auxiliary_blocks_in_reference_mode() {
        let mfa = sample(EntityKind::Flow, "f-mfa");
        let (result, _) = emit_one(&mfa, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        let blocks = result.unwrap().blocks;
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.tier == Tier::Entity(EntityKind::Flow)));
        assert!(blocks.iter().all(|b| b.name == "MFA"));

        assert_eq!(blocks[1].resource_type, "pingone_davinci_flow_enable");
        assert_eq!(
            blocks[1].text,
            "resource \"pingone_davinci_flow_enable\" \"MFA\" {\n  environment_id = var.pingone_environment_id\n  flow_id = pingone_davinci_flow.MFA.id\n  enabled = pingone_davinci_flow.MFA.enabled\n}\n"
        );
        assert_eq!(blocks[2].resource_type, "pingone_davinci_flow_deploy");
        assert_eq!(
            blocks[2].text,
            "resource \"pingone_davinci_flow_deploy\" \"MFA\" {\n  environment_id = var.pingone_environment_id\n  flow_id = pingone_davinci_flow.MFA.id\n  deploy_trigger_values = {\n    current_version = pingone_davinci_flow.MFA.current_version\n  }\n}\n"
        );
    }

    #[test]
    fn test_auxiliary_blocks_in_inlined_mode() {
        let mfa = sample(EntityKind::Flow, "f-mfa");
        let (result, unresolved) =
            emit_one(&mfa, &[], ResolutionMode::Inlined, ExtractionMode::SecretsOnly);
        let blocks = result.unwrap().blocks;

        assert!(blocks[1].text.contains("  flow_id = \"f-mfa\"\n"));
        assert!(blocks[1].text.contains("  enabled = false\n"));
        assert!(blocks[2].text.contains("    current_version = 2\n"));
        assert!(blocks.iter().all(|b| !b.text.contains("pingone_davinci_flow.MFA")));
        assert!(unresolved.is_empty());
    }

    #[test]
    fn test_inlined_graph_keeps_raw_ids() {
        let login = sample(EntityKind::Flow, "f-login");
        let (result, unresolved) =
            emit_one(&login, &[], ResolutionMode::Inlined, ExtractionMode::SecretsOnly);
        let text = result.unwrap().blocks[0].text.clone();
        assert!(text.contains("connection_id = \"c-http-1\""));
        assert!(text.contains("connection_id = \"c-missing\",\n"));
        assert!(!text.contains("/*"));
        assert!(unresolved.is_empty());
    }
}

#[cfg(test)]
mod connector_tests {
    use super::*;

    #[test]
    fn test_properties_are_nested_and_secrets_parameterized() {
        let http = sample(EntityKind::ConnectorInstance, "c-http-1");
        let (result, _) = emit_one(&http, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        let emission = result.unwrap();

        assert_eq!(
            emission.blocks[0].text,
            "resource \"pingone_davinci_connector_instance\" \"HTTP\" {\n  environment_id = var.pingone_environment_id\n  connector = {\n    id = \"httpConnector\"\n  }\n  name = \"HTTP\"\n  properties = {\n    baseUrl = {\n      type = \"string\",\n      value = \"https://$${tenant}.example.com\"\n    },\n    clientSecret = {\n      type = \"string\",\n      value = var.connector_http_properties_client_secret\n    }\n  }\n}\n"
        );
        assert_eq!(emission.parameters.len(), 1);
        assert!(emission.parameters[0].is_secret);
        assert!(!emission.blocks[0].text.contains("******"));
    }

    #[test]
    fn test_extract_all_parameterizes_plain_values() {
        let http = sample(EntityKind::ConnectorInstance, "c-http-1");
        let (result, _) = emit_one(&http, &[], ResolutionMode::Reference, ExtractionMode::All);
        let emission = result.unwrap();

        let names: Vec<&str> = emission
            .parameters
            .iter()
            .map(|p| p.parameter_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "connector_http_properties_base_url",
                "connector_http_properties_client_secret"
            ]
        );
        assert!(
            emission.blocks[0]
                .text
                .contains("value = var.connector_http_properties_base_url")
        );
        let declaration = emission.parameters[0].declaration().render();
        assert!(declaration.contains("  default = \"https://$${tenant}.example.com\"\n"));
    }

    #[test]
    fn test_empty_properties_render_on_one_line() {
        let second = sample(EntityKind::ConnectorInstance, "c-http-2");
        assert!(primary_text(&second, &[]).contains("  properties = {}\n"));
    }

    #[test]
    fn test_connector_id_is_required() {
        let broken = entity(
            EntityKind::ConnectorInstance,
            json!({"id": "c-9", "name": "Broken"}),
        );
        let (result, _) = emit_one(&broken, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        assert_eq!(
            result.unwrap_err(),
            ConvertError::MissingRequiredField {
                kind: EntityKind::ConnectorInstance,
                source_id: "c-9".to_string(),
                field: "connectorId".to_string(),
            }
        );
    }
}

#[cfg(test)]
mod variable_tests {
    use super::*;

    #[test]
    fn test_plain_variable_block() {
        let retries = sample(EntityKind::Variable, "v-retries");
        assert_eq!(
            primary_text(&retries, &[]),
            "resource \"pingone_davinci_variable\" \"retries\" {\n  environment_id = var.pingone_environment_id\n  name = \"retries\"\n  context = \"company\"\n  data_type = \"number\"\n  mutable = true\n  value = 3\n}\n"
        );
    }

    #[test]
    fn test_secret_variable_with_flow_reference() {
        let token = sample(EntityKind::Variable, "v-token");
        let (result, _) = emit_one(
            &token,
            &everything(),
            ResolutionMode::Reference,
            ExtractionMode::SecretsOnly,
        );
        let emission = result.unwrap();
        assert_eq!(
            emission.blocks[0].text,
            "resource \"pingone_davinci_variable\" \"apiToken\" {\n  environment_id = var.pingone_environment_id\n  name = \"apiToken\"\n  context = \"flowInstance\"\n  data_type = \"secret\"\n  mutable = false\n  flow = {\n    id = pingone_davinci_flow.Login.id\n  }\n  value = var.variable_api_token_value\n}\n"
        );
        assert_eq!(emission.parameters.len(), 1);
        assert_eq!(emission.parameters[0].current_value, None);
    }

    #[test]
    fn test_explicit_null_value_is_kept() {
        let variable = entity(
            EntityKind::Variable,
            json!({"id": "v-1", "name": "empty", "context": "company", "dataType": "string", "value": null}),
        );
        assert!(primary_text(&variable, &[]).contains("  value = null\n"));

        let absent = entity(
            EntityKind::Variable,
            json!({"id": "v-2", "name": "absent", "context": "company", "dataType": "string"}),
        );
        assert!(!primary_text(&absent, &[]).contains("value"));
    }

    #[test]
    fn test_required_fields() {
        for (missing, payload) in [
            ("context", json!({"id": "v-1", "name": "x", "dataType": "string"})),
            ("dataType", json!({"id": "v-1", "name": "x", "context": "company"})),
            ("name", json!({"id": "v-1", "context": "company", "dataType": "string"})),
        ] {
            let variable = entity(EntityKind::Variable, payload);
            let (result, _) =
                emit_one(&variable, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
            match result {
                Err(ConvertError::MissingRequiredField { field, source_id, .. }) => {
                    assert_eq!(field, missing);
                    assert_eq!(source_id, "v-1");
                }
                other => panic!("expected missing '{}', got {:?}", missing, other),
            }
        }
    }
}

#[cfg(test)]
mod application_tests {
    use super::*;

    #[test]
    fn test_oauth_secret_becomes_parameter() {
        let portal = sample(EntityKind::Application, "app-portal");
        let (result, _) = emit_one(
            &portal,
            &everything(),
            ResolutionMode::Reference,
            ExtractionMode::SecretsOnly,
        );
        let emission = result.unwrap();
        let text = &emission.blocks[0].text;

        assert!(text.contains("  api_key = {\n    enabled = true\n  }\n"));
        assert!(text.contains("client_secret = var.application_portal_oauth_values_client_secret"));
        assert!(text.contains("redirect_uris = [\n        \"https://portal.example.com/callback\"\n      ]"));
        assert!(!text.contains("******"));
        assert!(!text.contains("policies"));
        assert_eq!(emission.parameters.len(), 1);
        assert_balanced(text);
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn test_policy_references_application_and_flows() {
        let policy = sample(EntityKind::Policy, "pol-default");
        let text = primary_text(&policy, &everything());

        assert!(text.contains("  application_id = pingone_davinci_application.Portal.id\n"));
        assert!(text.contains("  status = \"enabled\"\n"));
        assert!(text.contains("flow_id = pingone_davinci_flow.MFA.id,\n      version_id = -1,\n      weight = 20"));
        // Authored order, not sorted.
        assert!(
            position(&text, "pingone_davinci_flow.MFA.id")
                < position(&text, "pingone_davinci_flow.Login.id")
        );
    }

    #[test]
    fn test_policy_for_missing_application() {
        let policy = sample(EntityKind::Policy, "pol-default");
        let (result, unresolved) =
            emit_one(&policy, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        assert!(result.is_ok());
        // The application and both flows are unknown.
        assert_eq!(unresolved.len(), 3);
        assert_eq!(unresolved[0].request.target_kind, EntityKind::Application);
    }

    #[test]
    fn test_application_id_is_required() {
        let orphan = entity(EntityKind::Policy, json!({"policyId": "p-1", "name": "Orphan"}));
        let (result, _) = emit_one(&orphan, &[], ResolutionMode::Reference, ExtractionMode::SecretsOnly);
        assert!(matches!(
            result,
            Err(ConvertError::MissingRequiredField { ref field, .. }) if field == "applicationId"
        ));
    }
}
