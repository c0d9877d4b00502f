use crate::emit::EmittedBlock;
use crate::error::ConvertError;
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::hash_map::Entry;

/// Orders blocks by tier, then name, then resource type, and joins them with
/// exactly one blank line. Each block's trailing whitespace is trimmed first.
///
/// A block repeated with identical text is emitted once. Two different blocks
/// under one `(resource type, name)` are a `DuplicateBlock` error.
pub fn aggregate(blocks: &[EmittedBlock]) -> Result<String, ConvertError> {
    let mut seen: AHashMap<(&str, &str), &str> = AHashMap::new();
    let mut kept = Vec::with_capacity(blocks.len());

    for block in blocks.iter().sorted_by(|a, b| {
        (a.tier, &a.name, &a.resource_type).cmp(&(b.tier, &b.name, &b.resource_type))
    }) {
        let text = block.text.trim_end();
        match seen.entry((block.resource_type.as_str(), block.name.as_str())) {
            Entry::Occupied(first) if *first.get() == text => {}
            Entry::Occupied(_) => {
                return Err(ConvertError::DuplicateBlock {
                    resource_type: block.resource_type.clone(),
                    name: block.name.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(text);
                kept.push(text);
            }
        }
    }

    let body = kept.into_iter().join("\n\n");
    Ok(if body.is_empty() { body } else { body + "\n" })
}
