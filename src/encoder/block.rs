use super::escape::{key, quote};
use super::expr::{Expr, INDENT};

/// One item of a block body, kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Attribute(String, Expr),
    Block(Block),
}

/// A labelled configuration block such as `resource "type" "name" { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub labels: Vec<String>,
    pub body: Vec<BodyItem>,
}

impl Block {
    pub fn new(block_type: impl Into<String>, labels: &[&str]) -> Self {
        Self {
            block_type: block_type.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            body: Vec::new(),
        }
    }

    pub fn resource(resource_type: &str, name: &str) -> Self {
        Self::new("resource", &[resource_type, name])
    }

    pub fn variable(name: &str) -> Self {
        Self::new("variable", &[name])
    }

    pub fn attribute(mut self, name: &str, value: impl Into<Expr>) -> Self {
        self.push_attribute(name, value);
        self
    }

    /// Adds the attribute only when a value is present.
    pub fn attribute_opt(mut self, name: &str, value: Option<impl Into<Expr>>) -> Self {
        if let Some(value) = value {
            self.push_attribute(name, value);
        }
        self
    }

    pub fn push_attribute(&mut self, name: &str, value: impl Into<Expr>) {
        self.body
            .push(BodyItem::Attribute(name.to_string(), value.into()));
    }

    pub fn block(mut self, child: Block) -> Self {
        self.body.push(BodyItem::Block(child));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.body.iter().find_map(|item| match item {
            BodyItem::Attribute(n, value) if n == name => Some(value),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(0, &mut out);
        out
    }

    fn write(&self, depth: usize, out: &mut String) {
        let pad = INDENT.repeat(depth);
        out.push_str(&pad);
        out.push_str(&self.block_type);
        for label in &self.labels {
            out.push(' ');
            out.push_str(&quote(label));
        }
        if self.body.is_empty() {
            out.push_str(" {}\n");
            return;
        }
        out.push_str(" {\n");

        let mut previous_was_block = false;
        for (i, item) in self.body.iter().enumerate() {
            match item {
                BodyItem::Attribute(name, value) => {
                    if previous_was_block {
                        out.push('\n');
                    }
                    out.push_str(&pad);
                    out.push_str(INDENT);
                    out.push_str(&key(name));
                    out.push_str(" = ");
                    value.write(depth + 1, out);
                    out.push('\n');
                    previous_was_block = false;
                }
                BodyItem::Block(child) => {
                    if i > 0 {
                        out.push('\n');
                    }
                    child.write(depth + 1, out);
                    previous_was_block = true;
                }
            }
        }
        out.push_str(&pad);
        out.push_str("}\n");
    }
}
