//! blockgen - Visual block program to Rust code generator
//!
//! This crate turns the block trees built in a visual editor into Rust
//! source code. Expressions are emitted together with their binding order
//! so that parentheses appear exactly where they are needed, and loops are
//! lowered with freshly named temporaries where a literal translation would
//! evaluate bounds more than once.

pub mod errors;
pub mod block;
pub mod config;
pub mod codegen;

// Re-export commonly used types
pub use errors::{BlockgenError, BlockgenResult, SourceSpan};
pub use block::{Block, BlockNode, Document, FieldValue};
pub use config::GeneratorConfig;
pub use codegen::{CodeGenerator, Emitter, Fragment, NameScope, Order, Registry, RustGenerator};
