//! Parameter names for one conversion run.

use crate::model::EntityKind;
use crate::naming::join_identifier;
use crate::registry::first_free_name;
use ahash::{AHashMap, AHashSet};
use tracing::debug;

type Claimant = (EntityKind, String, Vec<String>);

/// Hands out one parameter name per `(owner kind, owner source ID, path)`.
///
/// The readable base folds case and separators, so two owners can share a
/// base. The later claimant then takes the source-ID ladder the identity
/// registry uses; the same claimant always gets its first name back.
#[derive(Debug, Clone, Default)]
pub struct ParameterNames {
    assigned: AHashMap<Claimant, String>,
    taken: AHashSet<String>,
}

impl ParameterNames {
    /// Keeps `name` away from every claimant, e.g. the environment ID input.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    pub fn assign(
        &mut self,
        owner_kind: EntityKind,
        source_id: &str,
        attribute_path: &[String],
        base: &str,
    ) -> String {
        let claimant = (owner_kind, source_id.to_string(), attribute_path.to_vec());
        if let Some(name) = self.assigned.get(&claimant) {
            return name.clone();
        }

        let salt = format!("{}:{}", owner_kind.short_name(), attribute_path.join("."));
        let name = first_free_name(
            &self.taken,
            base,
            source_id,
            &join_identifier([source_id]),
            &salt,
        );
        if name != base {
            debug!(%owner_kind, source_id, base, name = %name, "parameter name collision resolved");
        }

        self.taken.insert(name.clone());
        self.assigned.insert(claimant, name.clone());
        name
    }
}
