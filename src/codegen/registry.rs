//! Block type registry
//!
//! Maps a block type tag to the function that emits it. Value handlers
//! return a [`Fragment`]; statement handlers return finished lines.

use std::collections::HashMap;

use crate::block::BlockNode;
use crate::errors::{BlockgenError, BlockgenResult};
use super::blocks;
use super::emitter::Emitter;
use super::order::Fragment;

pub type ValueHandler = fn(&mut Emitter<'_>, &dyn BlockNode) -> BlockgenResult<Fragment>;
pub type StatementHandler = fn(&mut Emitter<'_>, &dyn BlockNode) -> BlockgenResult<String>;

/// How a block type is emitted
#[derive(Clone, Copy)]
pub enum Handler {
    Value(ValueHandler),
    Statement(StatementHandler),
}

/// Block type tag to handler table
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry holding every block type shipped with the crate
    pub fn with_builtin_blocks() -> Self {
        let mut registry = Self::new();
        for (tag, handler) in blocks::BUILTIN {
            registry.handlers.insert(tag.to_string(), *handler);
        }
        registry
    }

    /// Register an expression block type
    pub fn register_value(&mut self, tag: &str, handler: ValueHandler) -> BlockgenResult<()> {
        self.register(tag, Handler::Value(handler))
    }

    /// Register a statement block type
    pub fn register_statement(&mut self, tag: &str, handler: StatementHandler) -> BlockgenResult<()> {
        self.register(tag, Handler::Statement(handler))
    }

    fn register(&mut self, tag: &str, handler: Handler) -> BlockgenResult<()> {
        if self.handlers.contains_key(tag) {
            return Err(BlockgenError::DuplicateHandler {
                kind: tag.to_string(),
            });
        }
        log::debug!("registered block type '{}'", tag);
        self.handlers.insert(tag.to_string(), handler);
        Ok(())
    }

    /// Look up the handler for a block type
    pub fn get(&self, tag: &str) -> Option<Handler> {
        self.handlers.get(tag).copied()
    }

    /// Registered block types, sorted
    pub fn block_types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
