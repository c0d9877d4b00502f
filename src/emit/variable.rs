use super::{EmitContext, Emission, EntityEmitter, primary, require};
use crate::encoder::Expr;
use crate::error::ConvertError;
use crate::model::{EntityKind, ExportedEntity, strip_variable_context};

pub struct VariableEmitter;

/// Optional scalar attributes copied as-is, as `(source key, target attribute)`.
const OPTIONAL_FIELDS: &[(&str, &str)] = &[
    ("description", "description"),
    ("displayName", "display_name"),
    ("min", "min"),
    ("max", "max"),
    ("mutable", "mutable"),
];

impl EntityEmitter for VariableEmitter {
    fn kind(&self) -> EntityKind {
        EntityKind::Variable
    }

    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Emission, ConvertError> {
        let raw_name = require(entity, "name")?;
        let context = require(entity, "context")?;
        let data_type = require(entity, "dataType")?;
        let name = ctx.name_of(entity)?;

        let variable_name = raw_name
            .as_str()
            .map(strip_variable_context)
            .map(Expr::string)
            .unwrap_or_else(|| Expr::from(raw_name));

        let mut block = ctx
            .resource(EntityKind::Variable.resource_type(), &name)
            .attribute("name", variable_name)
            .attribute("context", context)
            .attribute("data_type", data_type);
        for (source, target) in OPTIONAL_FIELDS {
            if let Some(value) = entity.attr(source) {
                block.push_attribute(target, value);
            }
        }
        if let Some(flow_id) = entity.attr("flowId") {
            let flow = ctx.reference(EntityKind::Flow, flow_id);
            block.push_attribute("flow", Expr::object([("id", flow)]));
        }

        let parameters = ctx.parameters(entity, &name);
        if let Some(value) = entity.attr("value") {
            match parameters.first() {
                Some(param) => block.push_attribute("value", param.reference()),
                // Explicit null round-trips as null.
                None => block.push_attribute("value", value),
            }
        }

        Ok(Emission {
            blocks: vec![primary(EntityKind::Variable, &block)],
            parameters,
        })
    }
}
