//! Generator configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! indent = "    "
//! loop_trap = "if loop_guard::tick(%1) { break; }"
//! header = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{BlockgenError, BlockgenResult};

/// Placeholder in a loop trap template that receives the quoted block id
pub const LOOP_TRAP_ID: &str = "%1";

/// Options for one generator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// One level of indentation
    pub indent: String,
    /// Code inserted at the top of every loop body; `%1` becomes the quoted
    /// id of the loop block
    pub loop_trap: Option<String>,
    /// Emit a "generated file" banner at the top of the program
    pub header: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            loop_trap: None,
            header: false,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> BlockgenResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| BlockgenError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> BlockgenResult<Self> {
        let text = fs::read_to_string(path)?;
        log::debug!("loading generator config from {}", path.display());
        Self::from_toml(&text)
    }

    pub fn with_loop_trap(mut self, trap: impl Into<String>) -> Self {
        self.loop_trap = Some(trap.into());
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Apply command-line overrides, checked like options read from a file
    pub fn with_overrides(mut self, loop_trap: Option<String>, header: bool) -> BlockgenResult<Self> {
        if let Some(trap) = loop_trap {
            self.loop_trap = Some(trap);
        }
        if header {
            self.header = true;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> BlockgenResult<()> {
        if self.indent.chars().any(|c| c != ' ' && c != '\t') {
            return Err(BlockgenError::config("indent may only contain spaces and tabs"));
        }
        if let Some(trap) = &self.loop_trap {
            if trap.trim().is_empty() {
                return Err(BlockgenError::config("loop_trap must not be empty"));
            }
        }
        Ok(())
    }
}
