use super::structure::{snake_entries, snake_keys};
use super::{EmitContext, Emission, EntityEmitter, primary, require};
use crate::encoder::Expr;
use crate::error::ConvertError;
use crate::model::{EntityKind, ExportedEntity, ValueNode};

pub struct PolicyEmitter;

impl EntityEmitter for PolicyEmitter {
    fn kind(&self) -> EntityKind {
        EntityKind::Policy
    }

    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Emission, ConvertError> {
        let application_id = require(entity, "applicationId")?;
        let name = ctx.name_of(entity)?;

        let mut block = ctx
            .resource(EntityKind::Policy.resource_type(), &name)
            .attribute(
                "application_id",
                ctx.reference(EntityKind::Application, application_id),
            )
            .attribute("name", Expr::string(&entity.display_name))
            .attribute_opt("status", entity.attr("status"));

        if let Some(flows) = entity.attr("policyFlows") {
            block.push_attribute("policy_flows", policy_flows_expr(flows, ctx));
        }
        if let Some(trigger) = entity.attr("trigger") {
            block.push_attribute("trigger", snake_keys(trigger));
        }

        Ok(Emission {
            blocks: vec![primary(EntityKind::Policy, &block)],
            parameters: Vec::new(),
        })
    }
}

/// Policy flows keep their source order: it is the order the weights were
/// authored in, not an artifact of serialization.
fn policy_flows_expr(flows: &ValueNode, ctx: &EmitContext<'_>) -> Expr {
    let Some(items) = flows.as_sequence() else {
        return Expr::from(flows);
    };
    Expr::List(
        items
            .iter()
            .map(|item| match item.as_mapping() {
                Some(fields) => Expr::Object(snake_entries(fields.iter().map(|(key, value)| {
                    let expr = if key == "flowId" {
                        ctx.reference(EntityKind::Flow, value)
                    } else {
                        Expr::from(value)
                    };
                    (key, expr)
                }))),
                None => Expr::from(item),
            })
            .collect(),
    )
}
