//! Per-kind emitters that turn one exported entity into configuration blocks.

mod application;
mod connector;
mod flow;
mod policy;
pub mod settings;
mod structure;
mod variable;

pub use application::ApplicationEmitter;
pub use connector::ConnectorInstanceEmitter;
pub use flow::{FlowEmitter, resolve_enabled};
pub use policy::PolicyEmitter;
pub use settings::SettingsAllowList;
pub use variable::VariableEmitter;

use crate::encoder::{Block, Expr};
use crate::error::ConvertError;
use crate::extract::{EligibleAttribute, ExtractionMode, VariableExtractor};
use crate::model::{EntityKind, ExportedEntity, ValueNode};
use crate::resolver::{ReferenceRequest, ReferenceResolver, ResolutionMode};
use ahash::AHashMap;

/// Output ordering class. Parameters come first, then entities in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Parameter,
    Entity(EntityKind),
}

/// One rendered block ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedBlock {
    pub tier: Tier,
    pub resource_type: String,
    pub name: String,
    pub text: String,
}

impl EmittedBlock {
    pub fn new(
        tier: Tier,
        resource_type: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            tier,
            resource_type: resource_type.into(),
            name: name.into(),
            text: text.into(),
        }
    }

    /// Renders a block, taking its type and name from the labels: a `resource`
    /// block has both, a `variable` block only a name.
    pub fn from_block(tier: Tier, block: &Block) -> Self {
        let (resource_type, name) = match block.labels.as_slice() {
            [resource_type, name, ..] => (resource_type.clone(), name.clone()),
            [name] => (block.block_type.clone(), name.clone()),
            [] => (block.block_type.clone(), String::new()),
        };
        Self::new(tier, resource_type, name, block.render())
    }
}

/// Everything one entity produced.
#[derive(Debug, Clone, Default)]
pub struct Emission {
    pub blocks: Vec<EmittedBlock>,
    /// Parameters referenced by the blocks; their declarations go in the parameter tier.
    pub parameters: Vec<EligibleAttribute>,
}

/// Shared services handed to every emitter for one conversion run.
pub struct EmitContext<'a> {
    pub resolver: &'a ReferenceResolver<'a>,
    pub extractor: &'a VariableExtractor,
    pub settings: &'a SettingsAllowList,
    pub extraction: ExtractionMode,
    pub environment_variable: &'a str,
}

impl<'a> EmitContext<'a> {
    pub fn is_inlined(&self) -> bool {
        self.resolver.mode() == ResolutionMode::Inlined
    }

    /// The registered name of an entity that is about to be emitted.
    pub fn name_of(&self, entity: &ExportedEntity) -> Result<String, ConvertError> {
        self.resolver
            .registry()
            .lookup(entity.kind, &entity.source_id)
            .map(str::to_string)
            .ok_or_else(|| ConvertError::Unregistered {
                kind: entity.kind,
                source_id: entity.source_id.clone(),
            })
    }

    /// A resource block with the environment binding every resource needs.
    pub fn resource(&self, resource_type: &str, name: &str) -> Block {
        Block::resource(resource_type, name).attribute(
            "environment_id",
            Expr::raw(format!("var.{}", self.environment_variable)),
        )
    }

    /// Expression for a foreign-key-shaped value. Empty or non-scalar values are
    /// kept as literals since there is nothing to resolve.
    pub fn reference(&self, target_kind: EntityKind, raw: &ValueNode) -> Expr {
        match raw.scalar_text().filter(|id| !id.is_empty()) {
            Some(id) => self
                .resolver
                .resolve_expr(&ReferenceRequest::id_of(target_kind, id)),
            None => Expr::from(raw),
        }
    }

    /// Eligible attributes of `entity` that are parameterized in this run.
    pub fn parameters(&self, entity: &ExportedEntity, owner_name: &str) -> Vec<EligibleAttribute> {
        self.extractor
            .extract(entity, owner_name)
            .into_iter()
            .filter(|attr| attr.is_parameterized(self.extraction))
            .collect()
    }
}

/// Converts one kind of entity into blocks.
pub trait EntityEmitter: Send + Sync {
    fn kind(&self) -> EntityKind;
    fn emit(&self, entity: &ExportedEntity, ctx: &EmitContext<'_>)
    -> Result<Emission, ConvertError>;
}

/// The built-in emitter for every kind.
pub fn default_emitters() -> AHashMap<EntityKind, Box<dyn EntityEmitter>> {
    let emitters: Vec<Box<dyn EntityEmitter>> = vec![
        Box::new(VariableEmitter),
        Box::new(ConnectorInstanceEmitter),
        Box::new(FlowEmitter),
        Box::new(ApplicationEmitter),
        Box::new(PolicyEmitter),
    ];
    emitters.into_iter().map(|e| (e.kind(), e)).collect()
}

/// Fails with `MissingRequiredField` unless `key` holds a non-empty value.
pub(crate) fn require<'e>(
    entity: &'e ExportedEntity,
    key: &str,
) -> Result<&'e ValueNode, ConvertError> {
    entity
        .attr(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConvertError::MissingRequiredField {
            kind: entity.kind,
            source_id: entity.source_id.clone(),
            field: key.to_string(),
        })
}

/// Wraps a finished resource block as the entity's primary output.
pub(crate) fn primary(kind: EntityKind, block: &Block) -> EmittedBlock {
    EmittedBlock::from_block(Tier::Entity(kind), block)
}
