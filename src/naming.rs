use crate::model::EntityKind;

/// Turns an arbitrary display name into a valid block identifier.
pub fn sanitize_identifier(raw: &str, kind: EntityKind) -> String {
    let mut name = sanitize_fragment(raw.trim());
    if name.is_empty() {
        return kind.short_name().to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        name.insert(0, '_');
    }
    name
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_fragment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `camelCase`, `PascalCase` and `kebab-case` to `snake_case`.
///
/// Runs of capitals are kept together, so `customLogoURLSelection` becomes
/// `custom_logo_url_selection`.
pub fn snake_case(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}

/// Joins name parts into one lowercase identifier with single underscores.
pub fn join_identifier<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(|part| sanitize_fragment(&snake_case(part)).to_ascii_lowercase())
        .flat_map(|part| {
            part.split(['_', '-'])
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("_")
}
