use super::{EmitContext, Emission, EntityEmitter, primary, require};
use crate::encoder::Expr;
use crate::error::ConvertError;
use crate::extract::EligibleAttribute;
use crate::model::{EntityKind, ExportedEntity, ValueNode};
use std::collections::BTreeMap;

pub struct ConnectorInstanceEmitter;

impl EntityEmitter for ConnectorInstanceEmitter {
    fn kind(&self) -> EntityKind {
        EntityKind::ConnectorInstance
    }

    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Emission, ConvertError> {
        let name = ctx.name_of(entity)?;
        let connector_id = require(entity, "connectorId")?;
        let parameters = ctx.parameters(entity, &name);

        let mut block = ctx
            .resource(EntityKind::ConnectorInstance.resource_type(), &name)
            .attribute("connector", Expr::object([("id", Expr::from(connector_id))]))
            .attribute("name", Expr::string(&entity.display_name));

        if let Some(properties) = entity.attr("properties") {
            block.push_attribute("properties", properties_expr(properties, &parameters));
        }

        Ok(Emission {
            blocks: vec![primary(EntityKind::ConnectorInstance, &block)],
            parameters,
        })
    }
}

/// The full nested `properties` tree. Parameterized properties keep their
/// `{type, value}` envelope with only the value swapped for the parameter.
fn properties_expr(properties: &ValueNode, parameters: &[EligibleAttribute]) -> Expr {
    let Some(entries) = properties.as_mapping() else {
        return Expr::from(properties);
    };
    Expr::Object(
        entries
            .iter()
            .map(|(key, value)| {
                let expr = match parameters.iter().find(|p| p.leaf_name() == key) {
                    Some(param) => substitute_value(value, param.reference()),
                    None => Expr::from(value),
                };
                (key.clone(), expr)
            })
            .collect(),
    )
}

fn substitute_value(property: &ValueNode, reference: Expr) -> Expr {
    match property {
        ValueNode::Mapping(fields) if fields.contains_key("value") => {
            let mut envelope: BTreeMap<String, Expr> = fields
                .iter()
                .map(|(k, v)| (k.clone(), Expr::from(v)))
                .collect();
            envelope.insert("value".to_string(), reference);
            Expr::Object(envelope)
        }
        _ => reference,
    }
}
