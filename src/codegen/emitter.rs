//! The fragment emitter
//!
//! One [`Emitter`] drives one generation pass. It dispatches each block to
//! its registered handler, parenthesizes child expressions against the
//! order their slot requires, substitutes defaults for empty slots, and owns
//! the pass's [`NameScope`] and collected definitions.

use crate::block::{self, BlockNode};
use crate::config::{GeneratorConfig, LOOP_TRAP_ID};
use crate::errors::{BlockgenError, BlockgenResult};
use super::names::{is_identifier, NameScope};
use super::order::{Fragment, Order};
use super::registry::{Handler, Registry};

/// Fields whose value names a user variable
pub const VARIABLE_FIELDS: &[&str] = &["VAR"];

/// Blocks whose `NAME` field names a user procedure
pub const PROCEDURE_BLOCKS: &[&str] = &["procedures_callreturn", "procedures_callnoreturn"];

/// State of one generation pass
pub struct Emitter<'a> {
    registry: &'a Registry,
    config: &'a GeneratorConfig,
    names: NameScope,
    /// Named top-of-file definitions, in first-seen order
    definitions: Vec<(String, String)>,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a Registry, config: &'a GeneratorConfig) -> Self {
        Self {
            registry,
            config,
            names: NameScope::new(),
            definitions: Vec::new(),
        }
    }

    /// Declare the user variables and procedures of a program and reserve
    /// every identifier-like field value, so fresh names never shadow them.
    pub fn prepare(&mut self, roots: &[&dyn BlockNode]) {
        let mut variables = Vec::new();
        let mut texts = Vec::new();
        for root in roots {
            block::walk(*root, &mut |node| {
                let procedure = PROCEDURE_BLOCKS.contains(&node.kind());
                for (name, value) in node.fields() {
                    let text = value.to_string();
                    if VARIABLE_FIELDS.contains(&name) || (procedure && name == "NAME") {
                        variables.push(text);
                    } else if is_identifier(&text) {
                        texts.push(text);
                    }
                }
            });
        }
        for var in &variables {
            self.names.declare(var);
        }
        for text in &texts {
            self.names.reserve(text);
        }
        log::debug!(
            "declared {} variables and procedures, reserved {} field names",
            variables.len(),
            texts.len()
        );
    }

    /// Emit a block.
    ///
    /// With `required` set the block is emitted as an expression and
    /// parenthesized if it binds looser than `required`. Without it the
    /// block is emitted as a statement and the fragment holds finished
    /// lines with order [`Order::None`].
    pub fn emit(&mut self, block: &dyn BlockNode, required: Option<Order>) -> BlockgenResult<Fragment> {
        let handler = self
            .registry
            .get(block.kind())
            .ok_or_else(|| BlockgenError::unknown_block(block.kind(), block.id()))?;
        log::trace!("emitting {} block '{}'", block.kind(), block.id());

        match (handler, required) {
            (Handler::Value(f), Some(required)) => {
                let fragment = f(self, block)?;
                if fragment.order.needs_parens_in(required) {
                    Ok(Fragment::atomic(format!("({})", fragment.code)))
                } else {
                    Ok(fragment)
                }
            }
            (Handler::Value(f), None) => {
                // A naked value in statement position.
                let fragment = f(self, block)?;
                let code = format!("{};\n", fragment.code);
                Ok(Fragment::new(self.with_comment(block, code), Order::None))
            }
            (Handler::Statement(f), None) => {
                let code = f(self, block)?;
                Ok(Fragment::new(self.with_comment(block, code), Order::None))
            }
            (Handler::Statement(_), Some(_)) => Err(BlockgenError::codegen(
                format!("'{}' is a statement block and cannot be used as a value", block.kind()),
                block.id(),
            )),
        }
    }

    /// Emit a block as a statement
    pub fn emit_statement(&mut self, block: &dyn BlockNode) -> BlockgenResult<String> {
        Ok(self.emit(block, None)?.code)
    }

    /// Code of the block connected to a value slot, parenthesized for
    /// `order`. `None` when the slot is empty.
    pub fn value_to_code(
        &mut self,
        block: &dyn BlockNode,
        slot: &str,
        order: Order,
    ) -> BlockgenResult<Option<String>> {
        match block.input(slot) {
            Some(child) => Ok(Some(self.emit(child, Some(order))?.code)),
            None => Ok(None),
        }
    }

    /// The fragment of the block connected to a value slot, unparenthesized
    pub fn value_fragment(&mut self, block: &dyn BlockNode, slot: &str) -> BlockgenResult<Option<Fragment>> {
        match block.input(slot) {
            Some(child) => Ok(Some(self.emit(child, Some(Order::None))?)),
            None => Ok(None),
        }
    }

    /// Code of a value slot, or `default` when nothing is connected
    pub fn value_or(
        &mut self,
        block: &dyn BlockNode,
        slot: &str,
        order: Order,
        default: &str,
    ) -> BlockgenResult<String> {
        Ok(self
            .value_to_code(block, slot, order)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// The statements of a statement slot, indented one level
    pub fn statement_to_code(&mut self, block: &dyn BlockNode, slot: &str) -> BlockgenResult<String> {
        let mut code = String::new();
        for child in block.statements(slot) {
            code.push_str(&self.emit_statement(child)?);
        }
        Ok(prefix_lines(&code, &self.config.indent))
    }

    /// The body of a loop block with the loop trap applied
    pub fn loop_body(&mut self, block: &dyn BlockNode, slot: &str) -> BlockgenResult<String> {
        let branch = self.statement_to_code(block, slot)?;
        Ok(self.add_loop_trap(branch, block.id()))
    }

    /// Put the configured loop trap, keyed by `id`, at the top of a loop body
    pub fn add_loop_trap(&self, branch: String, id: &str) -> String {
        match &self.config.loop_trap {
            Some(trap) => {
                let trap = trap.replace(LOOP_TRAP_ID, &quote(id));
                let mut trap = prefix_lines(&trap, &self.config.indent);
                if !trap.ends_with('\n') {
                    trap.push('\n');
                }
                trap + &branch
            }
            None => branch,
        }
    }

    /// A fresh identifier for a temporary
    pub fn fresh_name(&mut self, base: &str) -> String {
        self.names.fresh(base)
    }

    /// The identifier of a user variable or procedure
    pub fn variable_name(&mut self, name: &str) -> String {
        self.names.declare(name)
    }

    /// One level of indentation
    pub fn indent(&self) -> &str {
        &self.config.indent
    }

    /// Record a top-of-file definition. Later definitions under an existing
    /// name are ignored.
    pub fn provide_definition(&mut self, name: &str, code: impl Into<String>) {
        if self.definitions.iter().any(|(existing, _)| existing == name) {
            return;
        }
        self.definitions.push((name.to_string(), code.into()));
    }

    /// Definitions collected during the pass
    pub fn definitions(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|(_, code)| code.as_str())
    }

    fn with_comment(&self, block: &dyn BlockNode, code: String) -> String {
        match block.comment().map(str::trim).filter(|c| !c.is_empty()) {
            Some(comment) => {
                let mut lines: String = comment.lines().map(|line| format!("// {}\n", line.trim_end())).collect();
                lines.push_str(&code);
                lines
            }
            None => code,
        }
    }
}

/// Prefix every non-empty line of `text` with `prefix`
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(prefix);
        }
        out.push_str(line);
    }
    out
}

/// A Rust string literal holding `text`
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    fn number(id: &str, n: f64) -> Block {
        Block::new("math_number", id).with_field("NUM", n)
    }

    fn var(name: &str) -> Block {
        Block::new("variables_get", "").with_field("VAR", name)
    }

    fn arith(op: &str, a: Block, b: Block) -> Block {
        Block::new("math_arithmetic", "")
            .with_field("OP", op)
            .with_input("A", a)
            .with_input("B", b)
    }

    #[test]
    fn test_looser_child_is_parenthesized() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let sum = arith("ADD", var("a"), var("b"));
        let fragment = emitter.emit(&sum, Some(Order::Multiplicative)).unwrap();
        assert_eq!(fragment.code, "(a + b)");
        assert_eq!(fragment.order, Order::Atomic);

        let fragment = emitter.emit(&sum, Some(Order::Additive)).unwrap();
        assert_eq!(fragment.code, "a + b");
        assert_eq!(fragment.order, Order::Additive);
    }

    #[test]
    fn test_nested_arithmetic_parentheses() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let product = arith("MULTIPLY", arith("ADD", var("a"), var("b")), var("c"));
        assert_eq!(emitter.emit(&product, Some(Order::None)).unwrap().code, "(a + b) * c");

        let no_parens = arith("ADD", arith("MULTIPLY", var("a"), var("b")), var("c"));
        assert_eq!(emitter.emit(&no_parens, Some(Order::None)).unwrap().code, "a * b + c");

        let right_nested = arith("MINUS", var("a"), arith("MINUS", var("b"), var("c")));
        assert_eq!(emitter.emit(&right_nested, Some(Order::None)).unwrap().code, "a - (b - c)");
    }

    #[test]
    fn test_empty_slot_uses_default() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let block = Block::new("math_arithmetic", "m").with_field("OP", "ADD");
        assert_eq!(emitter.value_or(&block, "A", Order::Additive, "0").unwrap(), "0");
        assert_eq!(emitter.emit(&block, Some(Order::None)).unwrap().code, "0 + 0");
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let err = emitter.emit(&Block::new("teleport", "t1"), None).unwrap_err();
        assert!(matches!(err, BlockgenError::UnknownBlock { ref kind, .. } if kind == "teleport"));
        assert_eq!(err.block_id(), Some("t1"));
    }

    #[test]
    fn test_statement_block_in_value_slot_is_an_error() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let block = Block::new("logic_negate", "n").with_input(
            "BOOL",
            Block::new("controls_flow_statements", "f").with_field("FLOW", "BREAK"),
        );
        let err = emitter.emit(&block, Some(Order::None)).unwrap_err();
        assert_eq!(err.block_id(), Some("f"));
    }

    #[test]
    fn test_naked_value_becomes_statement() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        assert_eq!(emitter.emit_statement(&number("n", 7.0)).unwrap(), "7;\n");
    }

    #[test]
    fn test_loop_trap_uses_block_id() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default().with_loop_trap("guard(%1)?;");
        let emitter = Emitter::new(&registry, &config);

        let body = emitter.add_loop_trap("    break;\n".to_string(), "loop\"1");
        assert_eq!(body, "    guard(\"loop\\\"1\")?;\n    break;\n");
    }

    #[test]
    fn test_comment_is_emitted_above_statement() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let block = Block::new("controls_flow_statements", "f")
            .with_field("FLOW", "BREAK")
            .with_comment("leave early\nfor now");
        assert_eq!(
            emitter.emit_statement(&block).unwrap(),
            "// leave early\n// for now\nbreak;\n"
        );
    }

    #[test]
    fn test_prepare_reserves_field_values() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let label = Block::new("label", "l").with_field("NAME", "count");
        let setter = Block::new("variables_set", "s").with_field("VAR", "repeat_end");
        emitter.prepare(&[&label, &setter]);

        assert_eq!(emitter.fresh_name("count"), "count2");
        assert_eq!(emitter.fresh_name("repeat_end"), "repeat_end2");
        assert_eq!(emitter.variable_name("repeat_end"), "repeat_end");
    }

    #[test]
    fn test_prepare_declares_procedure_names() {
        let registry = Registry::with_builtin_blocks();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        let call = Block::new("procedures_callnoreturn", "c").with_field("NAME", "repeat end");
        let repeat = Block::new("controls_repeat_ext", "r")
            .with_input("TIMES", Block::new("procedures_callreturn", "l").with_field("NAME", "limit"))
            .with_statements("DO", vec![call]);
        emitter.prepare(&[&repeat]);

        assert_eq!(
            emitter.emit_statement(&repeat).unwrap(),
            "let repeat_end2 = limit();\nfor count in 0..repeat_end2 {\n    repeat_end();\n}\n"
        );
    }

    #[test]
    fn test_definitions_keep_first() {
        let registry = Registry::new();
        let config = GeneratorConfig::default();
        let mut emitter = Emitter::new(&registry, &config);

        emitter.provide_definition("gpio", "use mynewt::hw::gpio;");
        emitter.provide_definition("time", "use mynewt::kernel::os::time_delay;");
        emitter.provide_definition("gpio", "use other::gpio;");
        let defs: Vec<_> = emitter.definitions().collect();
        assert_eq!(defs, vec!["use mynewt::hw::gpio;", "use mynewt::kernel::os::time_delay;"]);
    }

    #[test]
    fn test_prefix_lines_skips_blank_lines() {
        assert_eq!(prefix_lines("a;\n\nb;\n", "  "), "  a;\n\n  b;\n");
        assert_eq!(prefix_lines("", "  "), "");
        assert_eq!(prefix_lines("note", "// "), "// note");
    }
}
