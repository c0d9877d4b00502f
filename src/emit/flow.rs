use super::structure::{element_id, graph_elements, replace_at, snake_entries, snake_keys};
use super::{EmitContext, Emission, EmittedBlock, EntityEmitter, Tier, primary};
use crate::encoder::{Block, Expr, encode};
use crate::error::ConvertError;
use crate::model::{EntityKind, ExportedEntity, ValueNode};
use crate::resolver::ReferenceRequest;
use itertools::Itertools;
use std::iter;

const ENABLE_RESOURCE: &str = "pingone_davinci_flow_enable";
const DEPLOY_RESOURCE: &str = "pingone_davinci_flow_deploy";

/// Path inside a node's `properties` that names a child flow.
const SUBFLOW_PATH: &[&str] = &["subFlowId", "value", "value"];

pub struct FlowEmitter;

impl EntityEmitter for FlowEmitter {
    fn kind(&self) -> EntityKind {
        EntityKind::Flow
    }

    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Emission, ConvertError> {
        let name = ctx.name_of(entity)?;
        let enabled = resolve_enabled(entity)?;

        let mut block = ctx
            .resource(EntityKind::Flow.resource_type(), &name)
            .attribute("name", Expr::string(&entity.display_name))
            .attribute_opt("description", entity.attr("description"))
            .attribute_opt("color", entity.attr("color"))
            .attribute_opt("enabled", enabled.map(Expr::bool));

        if let Some(settings) = entity.attr("settings").and_then(|s| ctx.settings.filter(s)) {
            block.push_attribute("settings", settings);
        }
        if let Some(graph) = graph_data(entity, ctx)? {
            block.push_attribute("graph_data", graph);
        }
        for (source, target) in [("inputSchema", "input_schema"), ("outputSchema", "output_schema")] {
            if let Some(schema) = entity.attr(source) {
                block.push_attribute(target, schema);
            }
        }

        let blocks = vec![
            primary(EntityKind::Flow, &block),
            EmittedBlock::from_block(
                Tier::Entity(EntityKind::Flow),
                &activation_block(entity, &name, enabled, ctx),
            ),
            EmittedBlock::from_block(
                Tier::Entity(EntityKind::Flow),
                &deployment_block(entity, &name, ctx),
            ),
        ];
        Ok(Emission {
            blocks,
            parameters: Vec::new(),
        })
    }
}

/// Resolves the enabled state from the status enumeration and the boolean flag.
///
/// Either signal alone decides; when both are present they must agree. With
/// neither, the state is unknown and `None` is returned.
pub fn resolve_enabled(entity: &ExportedEntity) -> Result<Option<bool>, ConvertError> {
    let status = entity
        .attributes
        .get_any(&["flowStatus", "status"])
        .and_then(ValueNode::as_str);
    let flag = entity.attr("enabled").and_then(ValueNode::as_bool);

    let from_status = status
        .map(|s| match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(true),
            "disabled" => Ok(false),
            other => Err(ConvertError::InvalidField {
                kind: entity.kind,
                source_id: entity.source_id.clone(),
                field: "flowStatus".to_string(),
                message: format!("expected 'enabled' or 'disabled', found '{}'", other),
            }),
        })
        .transpose()?;

    match (status, from_status, flag) {
        (Some(status), Some(by_status), Some(flag)) if by_status != flag => {
            Err(ConvertError::Conflict {
                kind: entity.kind,
                source_id: entity.source_id.clone(),
                status: status.to_string(),
                flag,
            })
        }
        (_, Some(by_status), _) => Ok(Some(by_status)),
        (_, None, flag) => Ok(flag),
    }
}

/// `graph_data` with nodes and edges sorted by their declared IDs.
fn graph_data(entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Option<Expr>, ConvertError> {
    let graph = entity.attr("graphData");
    let elements = graph
        .and_then(|g| g.get("elements"))
        .or_else(|| entity.attr("elements"));
    let Some(elements) = elements else {
        return Ok(None);
    };

    let nodes = sorted_elements(entity, elements.get("nodes"), "nodes")?
        .into_iter()
        .map(|node| node_expr(node, ctx))
        .collect();
    let edges = sorted_elements(entity, elements.get("edges"), "edges")?
        .into_iter()
        .map(edge_expr)
        .collect();

    let sorted = Expr::object([("nodes", Expr::List(nodes)), ("edges", Expr::List(edges))]);
    let graph_fields = graph
        .and_then(ValueNode::as_mapping)
        .into_iter()
        .flatten()
        .filter(|(k, _)| k.as_str() != "elements")
        .map(|(k, v)| (k.as_str(), Expr::from(v)))
        .chain(iter::once(("elements", sorted)));
    Ok(Some(Expr::Object(snake_entries(graph_fields))))
}

fn sorted_elements<'e>(
    entity: &ExportedEntity,
    collection: Option<&'e ValueNode>,
    label: &str,
) -> Result<Vec<&'e ValueNode>, ConvertError> {
    graph_elements(collection)
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            element_id(element)
                .map(|id| (id, element))
                .ok_or_else(|| ConvertError::InvalidField {
                    kind: entity.kind,
                    source_id: entity.source_id.clone(),
                    field: format!("elements.{}[{}]", label, index),
                    message: "graph element has no data.id".to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|keyed| {
            keyed
                .into_iter()
                // Duplicate IDs fall back to the rendered element so input order never leaks.
                .sorted_by(|(a, ea), (b, eb)| {
                    a.cmp(b).then_with(|| encode(ea, 0).cmp(&encode(eb, 0)))
                })
                .map(|(_, element)| element)
                .collect()
        })
}

/// A graph node. Structural keys become snake_case; the free-form `properties`
/// tree keeps its source shape, with connector and sub-flow IDs resolved.
fn node_expr(node: &ValueNode, ctx: &EmitContext<'_>) -> Expr {
    let Some(fields) = node.as_mapping() else {
        return Expr::from(node);
    };
    Expr::Object(snake_entries(fields.iter().map(|(key, value)| {
        let expr = if key == "data" {
            node_data_expr(value, ctx)
        } else {
            snake_keys(value)
        };
        (key, expr)
    })))
}

fn node_data_expr(data: &ValueNode, ctx: &EmitContext<'_>) -> Expr {
    let Some(fields) = data.as_mapping() else {
        return Expr::from(data);
    };
    Expr::Object(snake_entries(fields.iter().map(|(key, value)| {
        let expr = match key.as_str() {
            "connectionId" => ctx.reference(EntityKind::ConnectorInstance, value),
            "properties" => replace_at(value, SUBFLOW_PATH, &|id| {
                ctx.reference(EntityKind::Flow, id)
            }),
            _ => Expr::from(value),
        };
        (key, expr)
    })))
}

fn edge_expr(edge: &ValueNode) -> Expr {
    match edge.as_mapping() {
        Some(fields) => Expr::Object(snake_entries(fields.iter().map(|(k, v)| (k, snake_keys(v))))),
        None => Expr::from(edge),
    }
}

fn activation_block(
    entity: &ExportedEntity,
    name: &str,
    enabled: Option<bool>,
    ctx: &EmitContext<'_>,
) -> Block {
    let enabled = enabled.map(|state| {
        if ctx.is_inlined() {
            Expr::bool(state)
        } else {
            ctx.resolver.resolve_expr(&ReferenceRequest::new(
                EntityKind::Flow,
                &entity.source_id,
                "enabled",
            ))
        }
    });
    ctx.resource(ENABLE_RESOURCE, name)
        .attribute("flow_id", flow_id(entity, ctx))
        .attribute_opt("enabled", enabled)
}

fn deployment_block(entity: &ExportedEntity, name: &str, ctx: &EmitContext<'_>) -> Block {
    let version = if ctx.is_inlined() {
        entity.attr("currentVersion").map(Expr::from)
    } else {
        Some(ctx.resolver.resolve_expr(&ReferenceRequest::new(
            EntityKind::Flow,
            &entity.source_id,
            "current_version",
        )))
    };
    let triggers = Expr::object(version.map(|v| ("current_version", v)));
    ctx.resource(DEPLOY_RESOURCE, name)
        .attribute("flow_id", flow_id(entity, ctx))
        .attribute("deploy_trigger_values", triggers)
}

fn flow_id(entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Expr {
    ctx.resolver
        .resolve_expr(&ReferenceRequest::id_of(EntityKind::Flow, &entity.source_id))
}
