//! Turns foreign-key-like values into cross-block expressions.
//!
//! Resolution never fails. A reference whose target is missing from the export
//! (or was excluded by the caller) becomes a placeholder that keeps the raw ID
//! and carries an inline diagnostic comment, so the output stays valid and the
//! gaps can be found with a text search.

use crate::encoder::Expr;
use crate::model::EntityKind;
use crate::registry::IdentityRegistry;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use tracing::warn;

/// How references between entities are expressed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Cross-block expressions such as `pingone_davinci_flow.login.id`.
    #[default]
    Reference,
    /// Raw source values, producing output with no inter-block dependencies.
    Inlined,
}

/// A request to refer to an attribute of another entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceRequest {
    pub target_kind: EntityKind,
    pub target_source_id: String,
    pub target_attribute: String,
}

impl ReferenceRequest {
    pub fn new(
        target_kind: EntityKind,
        target_source_id: impl Into<String>,
        target_attribute: impl Into<String>,
    ) -> Self {
        Self {
            target_kind,
            target_source_id: target_source_id.into(),
            target_attribute: target_attribute.into(),
        }
    }

    /// Shorthand for a reference to the target's `id` attribute.
    pub fn id_of(target_kind: EntityKind, target_source_id: impl Into<String>) -> Self {
        Self::new(target_kind, target_source_id, "id")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    NotInExport,
    ExcludedByFlag,
}

impl fmt::Display for PlaceholderReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderReason::NotInExport => f.write_str("not present in this export"),
            PlaceholderReason::ExcludedByFlag => f.write_str("excluded by flag"),
        }
    }
}

/// Outcome of resolving a `ReferenceRequest`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedReference {
    Resolved {
        expression: String,
    },
    /// Not an error: an inspectable marker for a reference that could not be made.
    Placeholder {
        value: String,
        text: String,
        reason: PlaceholderReason,
    },
    /// Inlined mode: the raw source value, substituted as a literal.
    Inlined {
        value: String,
    },
}

impl ResolvedReference {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedReference::Resolved { .. })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedReference::Placeholder { .. })
    }
}

impl From<ResolvedReference> for Expr {
    fn from(reference: ResolvedReference) -> Self {
        match reference {
            ResolvedReference::Resolved { expression } => Expr::Raw(expression),
            ResolvedReference::Placeholder { value, text, .. } => Expr::Placeholder {
                value,
                comment: text,
            },
            ResolvedReference::Inlined { value } => Expr::string(value),
        }
    }
}

/// A placeholder handed out during a run, kept for the conversion report.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedReference {
    pub request: ReferenceRequest,
    pub reason: PlaceholderReason,
}

/// Resolves references against the registry of one conversion run.
#[derive(Debug)]
pub struct ReferenceResolver<'a> {
    registry: &'a IdentityRegistry,
    mode: ResolutionMode,
    excluded: AHashSet<EntityKind>,
    unresolved: RefCell<Vec<UnresolvedReference>>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a IdentityRegistry, mode: ResolutionMode) -> Self {
        Self {
            registry,
            mode,
            excluded: AHashSet::new(),
            unresolved: RefCell::new(Vec::new()),
        }
    }

    /// Kinds the caller left out of this run; references into them become
    /// "excluded by flag" placeholders.
    pub fn with_excluded(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.excluded.extend(kinds);
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    pub fn registry(&self) -> &IdentityRegistry {
        self.registry
    }

    pub fn resolve(&self, request: &ReferenceRequest) -> ResolvedReference {
        if self.mode == ResolutionMode::Inlined {
            return ResolvedReference::Inlined {
                value: request.target_source_id.clone(),
            };
        }

        let reason = if self.excluded.contains(&request.target_kind) {
            PlaceholderReason::ExcludedByFlag
        } else {
            match self
                .registry
                .lookup(request.target_kind, &request.target_source_id)
            {
                Some(name) => {
                    return ResolvedReference::Resolved {
                        expression: format!(
                            "{}.{}.{}",
                            request.target_kind.resource_type(),
                            name,
                            request.target_attribute
                        ),
                    };
                }
                None => PlaceholderReason::NotInExport,
            }
        };

        warn!(
            kind = %request.target_kind,
            source_id = %request.target_source_id,
            %reason,
            "reference left unresolved"
        );
        self.unresolved.borrow_mut().push(UnresolvedReference {
            request: request.clone(),
            reason,
        });
        ResolvedReference::Placeholder {
            value: request.target_source_id.clone(),
            text: format!(
                "unresolved {} \"{}\": {}",
                request.target_kind, request.target_source_id, reason
            ),
            reason,
        }
    }

    /// Resolves straight into an expression.
    pub fn resolve_expr(&self, request: &ReferenceRequest) -> Expr {
        self.resolve(request).into()
    }

    /// Every placeholder handed out so far, in the order they were produced.
    pub fn unresolved(&self) -> Vec<UnresolvedReference> {
        self.unresolved.borrow().clone()
    }
}
