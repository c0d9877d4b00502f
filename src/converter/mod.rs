use crate::emit::{
    EmitContext, EmittedBlock, EntityEmitter, SettingsAllowList, Tier, default_emitters,
};
use crate::encoder::{Block, Expr};
use crate::error::ConvertError;
use crate::extract::{ExtractionMode, PropertyClassifier, VariableExtractor};
use crate::model::{EntityKind, ExportBundle, ExportedEntity};
use crate::registry::IdentityRegistry;
use crate::resolver::{ReferenceResolver, ResolutionMode, UnresolvedReference};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::{debug, info, warn};

pub mod aggregate;
pub mod options;

pub use aggregate::aggregate;
pub use options::{ConvertOptions, DEFAULT_ENVIRONMENT_VARIABLE};

/// The result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The aggregated configuration text.
    pub output: String,
    /// Every block that went into `output`, before ordering.
    pub blocks: Vec<EmittedBlock>,
    /// References that degraded to placeholders.
    pub unresolved: Vec<UnresolvedReference>,
    /// Entity-scoped failures, only collected when `continue_on_error` is set.
    pub failures: Vec<ConvertError>,
    /// `(kind, source ID, registered name)` for every registered entity.
    pub names: Vec<(EntityKind, String, String)>,
}

impl Conversion {
    pub fn name_of(&self, kind: EntityKind, source_id: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(k, id, _)| *k == kind && id == source_id)
            .map(|(_, _, name)| name.as_str())
    }
}

pub struct Converter {
    bundle: ExportBundle,
    options: ConvertOptions,
    emitters: AHashMap<EntityKind, Box<dyn EntityEmitter>>,
    settings: SettingsAllowList,
    classifier: PropertyClassifier,
}

pub struct ConverterBuilder {
    bundle: ExportBundle,
    options: ConvertOptions,
    emitters: AHashMap<EntityKind, Box<dyn EntityEmitter>>,
    settings: Option<SettingsAllowList>,
    classifier: PropertyClassifier,
}

impl ConverterBuilder {
    pub fn new(bundle: ExportBundle) -> Self {
        Self {
            bundle,
            options: ConvertOptions::default(),
            emitters: default_emitters(),
            settings: None,
            classifier: PropertyClassifier::default(),
        }
    }

    /// Replaces all options at once, e.g. from a config file.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolution(mut self, mode: ResolutionMode) -> Self {
        self.options.resolution = mode;
        self
    }

    /// Inlined mode: raw values instead of cross-block references.
    pub fn skip_dependencies(self) -> Self {
        self.with_resolution(ResolutionMode::Inlined)
    }

    pub fn with_extraction(mut self, mode: ExtractionMode) -> Self {
        self.options.extraction = mode;
        self
    }

    pub fn exclude(mut self, kind: EntityKind) -> Self {
        if !self.options.is_excluded(kind) {
            self.options.excluded_kinds.push(kind);
        }
        self
    }

    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.options.continue_on_error = enabled;
        self
    }

    /// Overrides the allow-list that `settings_version` would otherwise select.
    pub fn with_settings_allow_list(mut self, settings: SettingsAllowList) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_classifier(mut self, classifier: PropertyClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_custom_emitter(mut self, emitter: Box<dyn EntityEmitter>) -> Self {
        self.emitters.insert(emitter.kind(), emitter);
        self
    }

    pub fn build(self) -> Converter {
        let settings = self.settings.unwrap_or_else(|| {
            SettingsAllowList::for_version(&self.options.settings_version).unwrap_or_else(|| {
                warn!(
                    version = %self.options.settings_version,
                    "unknown settings allow-list version, using v1"
                );
                SettingsAllowList::v1()
            })
        });
        let classifier = self
            .classifier
            .with_secret_names(&self.options.secret_names)
            .with_excluded_names(&self.options.excluded_names);

        Converter {
            bundle: self.bundle,
            options: self.options,
            emitters: self.emitters,
            settings,
            classifier,
        }
    }
}

impl Converter {
    pub fn builder(bundle: ExportBundle) -> ConverterBuilder {
        ConverterBuilder::new(bundle)
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Runs the conversion. Every call starts from a fresh registry.
    pub fn convert(&self) -> Result<Conversion, ConvertError> {
        // Sorting first makes name assignment independent of input order.
        let entities: Vec<&ExportedEntity> = self
            .bundle
            .entities
            .iter()
            .filter(|e| !self.options.is_excluded(e.kind))
            .sorted_by(|a, b| (a.kind, &a.source_id).cmp(&(b.kind, &b.source_id)))
            .collect();

        let registry = self.register_all(&entities)?;
        info!(
            entities = entities.len(),
            registered = registry.len(),
            mode = ?self.options.resolution,
            "registry built"
        );

        let resolver = ReferenceResolver::new(&registry, self.options.resolution)
            .with_excluded(self.options.excluded_kinds.iter().copied());
        let extractor = VariableExtractor::new(self.classifier.clone());
        extractor.reserve(&self.options.environment_variable);
        let ctx = EmitContext {
            resolver: &resolver,
            extractor: &extractor,
            settings: &self.settings,
            extraction: self.options.extraction,
            environment_variable: &self.options.environment_variable,
        };

        let mut blocks = vec![self.environment_declaration()];
        let mut failures = Vec::new();
        let mut emitted: AHashSet<(EntityKind, &str)> = AHashSet::new();

        for entity in entities {
            if !emitted.insert((entity.kind, entity.source_id.as_str())) {
                warn!(kind = %entity.kind, source_id = %entity.source_id, "duplicate entity skipped");
                continue;
            }
            let Some(emitter) = self.emitters.get(&entity.kind) else {
                warn!(kind = %entity.kind, "no emitter registered for kind");
                continue;
            };

            match emitter.emit(entity, &ctx) {
                Ok(emission) => {
                    debug!(
                        kind = %entity.kind,
                        source_id = %entity.source_id,
                        blocks = emission.blocks.len(),
                        parameters = emission.parameters.len(),
                        "entity emitted"
                    );
                    blocks.extend(emission.blocks);
                    blocks.extend(emission.parameters.iter().map(|param| {
                        EmittedBlock::from_block(Tier::Parameter, &param.declaration())
                    }));
                }
                Err(err) if self.options.continue_on_error && !err.is_fatal_for_run() => {
                    warn!(error = %err, "entity skipped");
                    failures.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        let output = aggregate(&blocks)?;
        let unresolved = resolver.unresolved();
        info!(
            blocks = blocks.len(),
            unresolved = unresolved.len(),
            failures = failures.len(),
            "conversion finished"
        );

        let names = self
            .bundle
            .entities
            .iter()
            .filter_map(|e| {
                registry
                    .lookup(e.kind, &e.source_id)
                    .map(|name| (e.kind, e.source_id.clone(), name.to_string()))
            })
            .unique()
            .collect();

        Ok(Conversion {
            output,
            blocks,
            unresolved,
            failures,
            names,
        })
    }

    fn register_all(&self, entities: &[&ExportedEntity]) -> Result<IdentityRegistry, ConvertError> {
        let mut registry = IdentityRegistry::new();
        for entity in entities {
            registry.register(entity.kind, &entity.source_id, &entity.display_name)?;
        }
        Ok(registry)
    }

    fn environment_declaration(&self) -> EmittedBlock {
        let block = Block::variable(&self.options.environment_variable)
            .attribute("type", Expr::raw("string"))
            .attribute(
                "description",
                Expr::string("ID of the environment the exported configuration is applied to"),
            );
        EmittedBlock::from_block(Tier::Parameter, &block)
    }
}
