//! Stable, collision-free block names for every entity of one conversion run.
//!
//! A name is derived from the entity's display name. When that name is already
//! held by another entity, a suffix derived from the source ID is appended, so
//! the same input set always produces the same names no matter how many times it
//! is converted.

use crate::error::RegistryError;
use crate::model::EntityKind;
use crate::naming::{sanitize_fragment, sanitize_identifier};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Number of source-ID characters used for the short disambiguating suffix.
const SHORT_SUFFIX_LEN: usize = 8;

#[derive(Debug, Clone)]
struct Registration {
    name: String,
    base: String,
}

/// Maps `(kind, source ID)` to a unique registered name.
///
/// Registration is append-only: a name, once handed out, is never changed or
/// released. One registry belongs to exactly one conversion run.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    entries: AHashMap<(EntityKind, String), Registration>,
    taken: AHashSet<String>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a name to `(kind, source_id)`, or returns the one it already has.
    ///
    /// Re-registering with a different base name is rejected instead of silently
    /// overwriting the first assignment.
    pub fn register(
        &mut self,
        kind: EntityKind,
        source_id: &str,
        preferred_base_name: &str,
    ) -> Result<String, RegistryError> {
        let base = sanitize_identifier(preferred_base_name, kind);
        let key = (kind, source_id.to_string());

        if let Some(existing) = self.entries.get(&key) {
            return if existing.base == base {
                Ok(existing.name.clone())
            } else {
                Err(RegistryError::Rebind {
                    kind,
                    source_id: source_id.to_string(),
                    existing: existing.name.clone(),
                    existing_base: existing.base.clone(),
                    requested_base: base,
                })
            };
        }

        let name = first_free_name(
            &self.taken,
            &base,
            source_id,
            &sanitize_fragment(source_id),
            kind.short_name(),
        );
        if name != base {
            debug!(%kind, source_id, base = %base, name = %name, "name collision resolved");
        } else {
            debug!(%kind, source_id, name = %name, "name registered");
        }

        self.taken.insert(name.clone());
        self.entries.insert(
            key,
            Registration {
                name: name.clone(),
                base,
            },
        );
        Ok(name)
    }

    /// Side-effect-free query for a previously registered name.
    pub fn lookup(&self, kind: EntityKind, source_id: &str) -> Option<&str> {
        self.entries
            .get(&(kind, source_id.to_string()))
            .map(|r| r.name.as_str())
    }

    pub fn contains(&self, kind: EntityKind, source_id: &str) -> bool {
        self.lookup(kind, source_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks the candidate ladder until a name outside `taken` turns up. Every rung
/// is a pure function of the inputs, so the outcome is reproducible.
///
/// `id` is the source ID as it may appear inside a name; `salt` separates
/// digests of unrelated claimants that share a source ID.
pub(crate) fn first_free_name(
    taken: &AHashSet<String>,
    base: &str,
    source_id: &str,
    id: &str,
    salt: &str,
) -> String {
    let short: String = id.chars().take(SHORT_SUFFIX_LEN).collect();
    let digest = short_digest(salt, source_id, 0);

    let ladder = [
        base.to_string(),
        format!("{}_{}", base, short),
        format!("{}_{}", base, id),
        format!("{}_{}_{}", base, id, digest),
    ];
    if let Some(name) = ladder.into_iter().find(|n| !taken.contains(n)) {
        return name;
    }

    // Only reachable when sanitization folded several distinct IDs together.
    (1u32..)
        .map(|round| format!("{}_{}_{}", base, id, short_digest(salt, source_id, round)))
        .find(|n| !taken.contains(n))
        .unwrap_or_default()
}

fn short_digest(salt: &str, source_id: &str, round: u32) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"\0");
    hasher.update(source_id.as_bytes());
    hasher.update(&round.to_le_bytes());
    hasher.finalize().to_hex().as_str()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_falls_through_to_digest() {
        let mut registry = IdentityRegistry::new();
        // "a b" and "a_b" sanitize to the same suffix.
        let first = registry.register(EntityKind::Flow, "a b", "x").unwrap();
        let second = registry.register(EntityKind::Flow, "a_b", "x").unwrap();
        let third = registry.register(EntityKind::Flow, "a.b", "x").unwrap();
        assert_eq!(first, "x");
        assert_eq!(second, "x_a_b");
        assert!(third.starts_with("x_a_b_"));
        assert_eq!(third.len(), "x_a_b_".len() + 8);
    }
}
