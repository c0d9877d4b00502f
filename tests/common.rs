//! Common test utilities: export fixtures and a one-entity emit harness.
use flowform::converter::DEFAULT_ENVIRONMENT_VARIABLE;
use flowform::emit::default_emitters;
use flowform::prelude::*;
use flowform::resolver::UnresolvedReference;
use serde_json::{Value, json};

/// A small but complete export.
///
/// - two connector instances both named "HTTP"
/// - flow `f-login` uses `c-http-1` and a connector that is not in the export
/// - flow `f-login` calls flow `f-mfa` as a sub-flow
/// - the application embeds one policy that routes to both flows
#[allow(dead_code)]
pub fn sample_export() -> Value {
    json!({
        "variables": [
            {
                "id": "v-retries",
                "name": "retries##SK##company",
                "context": "company",
                "dataType": "number",
                "mutable": true,
                "value": 3
            },
            {
                "id": "v-token",
                "name": "apiToken##SK##flowInstance",
                "context": "flowInstance",
                "dataType": "secret",
                "mutable": false,
                "flowId": "f-login",
                "value": "******"
            }
        ],
        "connectors": [
            {
                "id": "c-http-1",
                "name": "HTTP",
                "connectorId": "httpConnector",
                "properties": {
                    "baseUrl": {"type": "string", "value": "https://${tenant}.example.com"},
                    "clientSecret": {"type": "string", "value": "******"}
                }
            },
            {
                "id": "c-http-2",
                "name": "HTTP",
                "connectorId": "httpConnector",
                "properties": {}
            }
        ],
        "flows": [
            {
                "flowId": "f-login",
                "name": "Login",
                "description": "Primary sign-on",
                "flowStatus": "enabled",
                "currentVersion": 7,
                "settings": {"logLevel": 2, "useCSP": true, "notASetting": "x"},
                "graphData": {
                    "elements": {
                        "nodes": [
                            {"data": {"id": "n2", "nodeType": "CONNECTION", "connectionId": "c-missing"}},
                            {"data": {
                                "id": "n1",
                                "nodeType": "CONNECTION",
                                "connectionId": "c-http-1",
                                "properties": {"message": {"value": "Hello ${user}"}}
                            }},
                            {"data": {
                                "id": "n3",
                                "nodeType": "CONNECTION",
                                "connectionId": "c-http-2",
                                "properties": {"subFlowId": {"value": {"label": "MFA", "value": "f-mfa"}}}
                            }}
                        ],
                        "edges": [
                            {"data": {"id": "e2", "source": "n1", "target": "n3"}},
                            {"data": {"id": "e1", "source": "n1", "target": "n2"}}
                        ]
                    }
                }
            },
            {
                "flowId": "f-mfa",
                "name": "MFA",
                "enabled": false,
                "currentVersion": 2
            }
        ],
        "applications": [
            {
                "appId": "app-portal",
                "name": "Portal",
                "apiKey": {"enabled": true, "value": "******"},
                "oauth": {
                    "enabled": true,
                    "values": {
                        "clientSecret": "******",
                        "redirectUris": ["https://portal.example.com/callback"]
                    }
                },
                "policies": [
                    {
                        "policyId": "pol-default",
                        "name": "Default",
                        "status": "enabled",
                        "policyFlows": [
                            {"flowId": "f-mfa", "versionId": -1, "weight": 20},
                            {"flowId": "f-login", "versionId": -1, "weight": 80}
                        ]
                    }
                ]
            }
        ]
    })
}

#[allow(dead_code)]
pub fn sample_bundle() -> ExportBundle {
    sample_export()
        .into_export()
        .expect("sample export must parse")
}

/// Parses one payload as an entity of `kind`.
#[allow(dead_code)]
pub fn entity(kind: EntityKind, payload: Value) -> ExportedEntity {
    ExportedEntity::from_payload(kind, 0, payload).expect("fixture payload must parse")
}

/// Emits `entity` with every entity of `known` registered, the way one
/// conversion run would see it.
#[allow(dead_code)]
pub fn emit_one(
    entity: &ExportedEntity,
    known: &[ExportedEntity],
    mode: ResolutionMode,
    extraction: ExtractionMode,
) -> (std::result::Result<Emission, ConvertError>, Vec<UnresolvedReference>) {
    let mut registry = IdentityRegistry::new();
    for e in std::iter::once(entity).chain(known) {
        registry
            .register(e.kind, &e.source_id, &e.display_name)
            .expect("fixture names must register");
    }
    let resolver = ReferenceResolver::new(&registry, mode);
    let extractor = VariableExtractor::default();
    let settings = SettingsAllowList::v1();
    let ctx = EmitContext {
        resolver: &resolver,
        extractor: &extractor,
        settings: &settings,
        extraction,
        environment_variable: DEFAULT_ENVIRONMENT_VARIABLE,
    };
    let emitters = default_emitters();
    let result = emitters[&entity.kind].emit(entity, &ctx);
    (result, resolver.unresolved())
}

/// Renders the primary block of a successful emission.
#[allow(dead_code)]
pub fn primary_text(entity: &ExportedEntity, known: &[ExportedEntity]) -> String {
    let (result, _) = emit_one(
        entity,
        known,
        ResolutionMode::Reference,
        ExtractionMode::SecretsOnly,
    );
    result.expect("emission should succeed").blocks[0].text.clone()
}

/// Asserts that every opened brace or bracket is closed.
#[allow(dead_code)]
pub fn assert_balanced(text: &str) {
    let (opened, closed) = flowform::encoder::delimiter_balance(text);
    assert_eq!(opened, closed, "unbalanced output:\n{}", text);
}
