/// Escapes a raw string for use inside an HCL quoted string literal.
///
/// The input is always taken to be raw source text. Template markers `${` and
/// `%{` are neutralized by doubling their leading character, so a literal
/// `${var.x}` in the source never turns into a live interpolation. Callers must
/// not feed already-escaped text back in: `Expr::Raw` exists for that.
pub fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escapes and wraps a raw string in double quotes.
pub fn quote(raw: &str) -> String {
    format!("\"{}\"", escape_string(raw))
}

/// Whether `key` can be written as a bare identifier on the left of `=`.
///
/// Literal keywords are quoted, and so are `for`, `in` and `if`: an object
/// opening with a bare `for` key reads as a `for` expression.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "true" | "false" | "null" | "for" | "in" | "if")
}

/// Renders an object key, quoting it when it is not a plain identifier.
pub fn key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// Makes arbitrary text safe to place inside a `/* ... */` comment.
pub fn comment_text(text: &str) -> String {
    text.replace("*/", "* /")
        .replace("/*", "/ *")
        .chars()
        .map(|c| match c {
            '{' => '(',
            '}' => ')',
            '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}
