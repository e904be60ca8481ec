//! Rust code generator
//!
//! Generates a Rust program from a block document. Each call to `generate`
//! is one pass with its own name scope: top-level stacks are emitted in
//! document order, then the collected definitions are placed above them.

use crate::block::{BlockNode, Document};
use crate::config::GeneratorConfig;
use crate::errors::BlockgenResult;
use super::emitter::Emitter;
use super::registry::Registry;
use super::CodeGenerator;

/// Rust code generator
pub struct RustGenerator {
    registry: Registry,
    config: GeneratorConfig,
    /// Output buffer
    output: String,
}

impl RustGenerator {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            registry: Registry::with_builtin_blocks(),
            config,
            output: String::new(),
        }
    }

    /// The block registry, for adding custom block types
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Generate a program from top-level block stacks in any representation
    pub fn generate_blocks(&mut self, roots: &[&dyn BlockNode]) -> BlockgenResult<String> {
        let mut emitter = Emitter::new(&self.registry, &self.config);
        emitter.prepare(roots);

        let mut stacks = Vec::with_capacity(roots.len());
        for root in roots {
            let mut code = String::new();
            let mut current = Some(*root);
            while let Some(block) = current {
                code.push_str(&emitter.emit_statement(block)?);
                current = block.next();
            }
            stacks.push(code);
        }
        let definitions: Vec<String> = emitter.definitions().map(str::to_string).collect();
        drop(emitter);

        self.output.clear();
        if self.config.header {
            self.writeln("// Generated by blockgen");
            self.writeln("// DO NOT EDIT - This file is auto-generated");
            self.writeln("");
        }
        if !definitions.is_empty() {
            for definition in &definitions {
                self.writeln(definition.trim_end());
            }
            self.writeln("");
        }
        for (i, stack) in stacks.iter().enumerate() {
            if i > 0 {
                self.writeln("");
            }
            self.write(stack);
        }

        log::debug!(
            "generated {} bytes from {} top-level stacks",
            self.output.len(),
            roots.len()
        );
        Ok(self.output.clone())
    }
}

impl Default for RustGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RustGenerator {
    fn generate(&mut self, document: &Document) -> BlockgenResult<String> {
        self.generate_blocks(&document.roots())
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn language_name(&self) -> &'static str {
        "Rust"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::codegen::order::{Fragment, Order};
    use crate::errors::BlockgenError;

    fn number(n: f64) -> Block {
        Block::new("math_number", "").with_field("NUM", n)
    }

    #[test]
    fn test_stacks_are_separated() {
        let first = Block::new("variables_set", "a")
            .with_field("VAR", "x")
            .with_input("VALUE", number(1.0))
            .with_next(Block::new("variables_set", "b").with_field("VAR", "y"));
        let second = Block::new("math_number", "n").with_field("NUM", 3);

        let mut generator = RustGenerator::new();
        let code = generator.generate(&Document::new(vec![first, second])).unwrap();
        assert_eq!(code, "x = 1;\ny = 0;\n\n3;\n");
    }

    #[test]
    fn test_each_pass_has_its_own_scope() {
        let repeat = Block::new("controls_repeat_ext", "r").with_input("TIMES", number(2.0));
        let document = Document::new(vec![repeat]);

        let mut generator = RustGenerator::new();
        let first = generator.generate(&document).unwrap();
        let second = generator.generate(&document).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "for count in 0..2 {\n}\n");
    }

    #[test]
    fn test_definitions_and_header() {
        let config = GeneratorConfig::default().with_header(true);
        let mut generator = RustGenerator::with_config(config);
        let toggle = Block::new("digital_toggle_pin", "t").with_field("PIN", "MCU_GPIO_PORTA!(1)");
        let code = generator.generate(&Document::new(vec![toggle])).unwrap();
        assert_eq!(
            code,
            "// Generated by blockgen\n\
             // DO NOT EDIT - This file is auto-generated\n\
             \n\
             use mynewt::hw::gpio;\n\
             \n\
             gpio::toggle(MCU_GPIO_PORTA!(1))?;\n"
        );
    }

    #[test]
    fn test_custom_block_type() {
        fn millis(_: &mut Emitter<'_>, _: &dyn BlockNode) -> BlockgenResult<Fragment> {
            Ok(Fragment::new("clock.millis()", Order::UnaryPostfix))
        }

        let mut generator = RustGenerator::new();
        generator.registry_mut().register_value("clock_millis", millis).unwrap();
        let repeat = Block::new("controls_repeat_ext", "r")
            .with_input("TIMES", Block::new("clock_millis", "m"));
        let code = generator.generate(&Document::new(vec![repeat])).unwrap();
        assert_eq!(code, "let repeat_end = clock.millis();\nfor count in 0..repeat_end {\n}\n");
    }

    #[test]
    fn test_errors_stop_generation() {
        let mut generator = RustGenerator::new();
        let block = Block::new("controls_flow_statements", "f").with_field("FLOW", "GOTO");
        let err = generator.generate(&Document::new(vec![block])).unwrap_err();
        assert!(matches!(err, BlockgenError::CodeGen { .. }));
    }

    #[test]
    fn test_target_names() {
        let generator = RustGenerator::new();
        assert_eq!(generator.file_extension(), "rs");
        assert_eq!(generator.language_name(), "Rust");
    }
}
