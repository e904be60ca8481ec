//! Code generation for block programs
//!
//! The [`Emitter`] walks a block tree and threads an [`Order`] alongside
//! every emitted expression; the [`RustGenerator`] drives one emission pass
//! per program.

mod blocks;
pub mod emitter;
pub mod names;
pub mod order;
pub mod registry;
mod rust;

pub use emitter::Emitter;
pub use names::NameScope;
pub use order::{Fragment, Order};
pub use registry::{Handler, Registry, StatementHandler, ValueHandler};
pub use rust::RustGenerator;

use crate::block::Document;
use crate::errors::BlockgenResult;

/// Trait for code generators
pub trait CodeGenerator {
    /// Generate code from a block document
    fn generate(&mut self, document: &Document) -> BlockgenResult<String>;

    /// Get the file extension for the target language
    fn file_extension(&self) -> &'static str;

    /// Get the name of the target language
    fn language_name(&self) -> &'static str;
}
