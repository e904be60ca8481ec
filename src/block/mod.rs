//! Block trees
//!
//! The code generator only talks to blocks through [`BlockNode`], so any
//! in-memory representation supplied by a host editor can be emitted. The
//! [`document`] module provides the JSON representation used by the CLI.

pub mod document;

use std::fmt;

pub use document::{Block, Document, ExtraState, Input};

/// A literal value stored in a block field
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// The numeric value, parsing text fields when they hold a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// The text value, if this is a text field
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", format_number(*n)),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Read access to a node of a block tree
///
/// Statement slots are exposed as an ordered sequence; how the host links
/// statements together is its own business.
pub trait BlockNode {
    /// The block type tag, e.g. `controls_for`
    fn kind(&self) -> &str;

    /// The stable block id assigned by the editor
    fn id(&self) -> &str;

    /// The block connected to a value slot, if any
    fn input(&self, name: &str) -> Option<&dyn BlockNode>;

    /// The ordered statement blocks connected to a statement slot
    fn statements(&self, name: &str) -> Vec<&dyn BlockNode>;

    /// The block following this one in its statement sequence
    fn next(&self) -> Option<&dyn BlockNode>;

    /// The literal stored in a field, if any
    fn field(&self, name: &str) -> Option<&FieldValue>;

    /// All fields of this block
    fn fields(&self) -> Vec<(&str, &FieldValue)>;

    /// All child blocks, in slot name order
    fn children(&self) -> Vec<&dyn BlockNode>;

    /// A count from the block's extra state (`itemCount`, `elseIfCount`)
    fn extra_count(&self, _key: &str) -> Option<usize> {
        None
    }

    /// A flag from the block's extra state (`hasElse`)
    fn extra_flag(&self, _key: &str) -> bool {
        false
    }

    /// The user comment attached to the block
    fn comment(&self) -> Option<&str> {
        None
    }

    /// Text of a field, with numbers and booleans rendered as text
    fn field_text(&self, name: &str) -> Option<String> {
        self.field(name).map(|v| v.to_string())
    }
}

/// Render a number the way the editor displays it: integers without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Visit every block of a tree, depth first, parents before children
pub fn walk<'a>(root: &'a dyn BlockNode, visit: &mut dyn FnMut(&'a dyn BlockNode)) {
    visit(root);
    for child in root.children() {
        walk(child, visit);
    }
}
