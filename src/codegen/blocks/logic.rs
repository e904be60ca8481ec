//! Boolean logic and conditional blocks

use crate::block::{BlockNode, FieldValue};
use crate::codegen::emitter::Emitter;
use crate::codegen::order::{Fragment, Order};
use crate::errors::{BlockgenError, BlockgenResult};

pub fn boolean(_: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let value = match block.field("BOOL") {
        Some(FieldValue::Bool(b)) => *b,
        Some(FieldValue::Text(t)) => t.eq_ignore_ascii_case("true"),
        _ => false,
    };
    Ok(Fragment::atomic(if value { "true" } else { "false" }))
}

pub fn negate(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let operand = em.value_or(block, "BOOL", Order::UnaryPrefix, "true")?;
    Ok(Fragment::new(format!("!{}", operand), Order::UnaryPrefix))
}

pub fn compare(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let symbol = match block.field_text("OP").unwrap_or_default().as_str() {
        "EQ" => "==",
        "NEQ" => "!=",
        "LT" => "<",
        "LTE" => "<=",
        "GT" => ">",
        "GTE" => ">=",
        other => {
            return Err(BlockgenError::codegen(
                format!("Unknown comparison operator '{}'", other),
                block.id(),
            ))
        }
    };
    // Comparisons do not chain in Rust.
    let operand_order = Order::Relational.tighter();
    let a = em.value_or(block, "A", operand_order, "0")?;
    let b = em.value_or(block, "B", operand_order, "0")?;
    Ok(Fragment::new(format!("{} {} {}", a, symbol, b), Order::Relational))
}

pub fn operation(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let (symbol, order) = match block.field_text("OP").unwrap_or_default().as_str() {
        "AND" => ("&&", Order::LogicalAnd),
        "OR" => ("||", Order::LogicalOr),
        other => {
            return Err(BlockgenError::codegen(
                format!("Unknown logic operator '{}'", other),
                block.id(),
            ))
        }
    };
    let a = em.value_or(block, "A", order, "false")?;
    let b = em.value_or(block, "B", order, "false")?;
    Ok(Fragment::new(format!("{} {} {}", a, symbol, b), order))
}

pub fn controls_if(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let branches = block.extra_count("elseIfCount").unwrap_or(0) + 1;
    let mut code = String::new();
    for n in 0..branches {
        let condition = em.value_or(block, &format!("IF{}", n), Order::None, "false")?;
        let body = em.statement_to_code(block, &format!("DO{}", n))?;
        let keyword = if n == 0 { "if" } else { " else if" };
        code.push_str(&format!("{} {} {{\n{}}}", keyword, condition, body));
    }
    if block.extra_flag("hasElse") || !block.statements("ELSE").is_empty() {
        let body = em.statement_to_code(block, "ELSE")?;
        code.push_str(&format!(" else {{\n{}}}", body));
    }
    code.push('\n');
    Ok(code)
}
