use super::structure::{snake_entries, snake_keys};
use super::{EmitContext, Emission, EntityEmitter, primary};
use crate::encoder::Expr;
use crate::error::ConvertError;
use crate::extract::EligibleAttribute;
use crate::model::{EntityKind, ExportedEntity, ValueNode};
use std::collections::BTreeMap;

pub struct ApplicationEmitter;

impl EntityEmitter for ApplicationEmitter {
    fn kind(&self) -> EntityKind {
        EntityKind::Application
    }

    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>) -> Result<Emission, ConvertError> {
        let name = ctx.name_of(entity)?;
        let parameters = ctx.parameters(entity, &name);

        let mut block = ctx
            .resource(EntityKind::Application.resource_type(), &name)
            .attribute("name", Expr::string(&entity.display_name));

        // The key itself is generated by the service; only the toggle is configuration.
        if let Some(enabled) = entity.attributes.get_path(&["apiKey", "enabled"]) {
            block.push_attribute("api_key", Expr::object([("enabled", Expr::from(enabled))]));
        }
        if let Some(oauth) = entity.attr("oauth") {
            block.push_attribute("oauth", oauth_expr(oauth, &parameters));
        }
        for (source, target) in [("saml", "saml"), ("userPortal", "user_portal")] {
            if let Some(section) = entity.attr(source) {
                block.push_attribute(target, snake_keys(section));
            }
        }

        Ok(Emission {
            blocks: vec![primary(EntityKind::Application, &block)],
            parameters,
        })
    }
}

fn oauth_expr(oauth: &ValueNode, parameters: &[EligibleAttribute]) -> Expr {
    let Some(fields) = oauth.as_mapping() else {
        return Expr::from(oauth);
    };
    Expr::Object(snake_entries(fields.iter().map(|(key, value)| {
        let expr = match value.as_mapping() {
            Some(values) if key == "values" => values_expr(values, parameters),
            _ => Expr::from(value),
        };
        (key, expr)
    })))
}

fn values_expr(values: &BTreeMap<String, ValueNode>, parameters: &[EligibleAttribute]) -> Expr {
    Expr::Object(snake_entries(values.iter().map(|(key, value)| {
        let expr = parameters
            .iter()
            .find(|p| p.leaf_name() == key)
            .map(EligibleAttribute::reference)
            .unwrap_or_else(|| Expr::from(value));
        (key, expr)
    })))
}
