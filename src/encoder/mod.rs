//! Renders value trees and blocks in the target configuration language.
//!
//! Output is deterministic: mappings are emitted with keys in lexicographic
//! order, sequences in input order, and string literals are escaped exactly once
//! at the point they are written.

pub mod block;
pub mod escape;
pub mod expr;

pub use block::{Block, BodyItem};
pub use escape::{escape_string, is_identifier, quote};
pub use expr::Expr;

use crate::model::ValueNode;

/// Encodes a literal value tree. `indent` is the depth of the line the value
/// starts on.
pub fn encode(node: &ValueNode, indent: usize) -> String {
    let mut out = String::new();
    expr::write_value(node, indent, &mut out);
    out
}

/// Counts `(opened, closed)` braces and brackets outside string literals.
///
/// Used to sanity-check generated output; a balanced rendering has equal counts.
pub fn delimiter_balance(text: &str) -> (usize, usize) {
    let mut opened = 0;
    let mut closed = 0;
    let mut in_string = false;
    let mut in_comment = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_comment = false;
            }
            continue;
        }
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_comment = true;
            }
            '{' | '[' => opened += 1,
            '}' | ']' => closed += 1,
            _ => {}
        }
    }
    (opened, closed)
}
