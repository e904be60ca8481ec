//! Number, arithmetic and text blocks

use crate::block::{format_number, BlockNode};
use crate::codegen::emitter::{quote, Emitter};
use crate::codegen::order::{Fragment, Order};
use crate::errors::{BlockgenError, BlockgenResult};

pub fn number(_: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let n = block.field("NUM").and_then(|v| v.as_number()).unwrap_or(0.0);
    let fragment = if n.is_nan() {
        Fragment::new("f64::NAN", Order::UnaryPostfix)
    } else if n.is_infinite() {
        let code = if n > 0.0 { "f64::INFINITY" } else { "f64::NEG_INFINITY" };
        Fragment::new(code, Order::UnaryPostfix)
    } else if n < 0.0 {
        Fragment::new(format_number(n), Order::UnaryPrefix)
    } else {
        Fragment::atomic(format_number(n))
    };
    Ok(fragment)
}

pub fn arithmetic(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let op = block.field_text("OP").unwrap_or_default();
    if op == "POWER" {
        let base = em.value_or(block, "A", Order::UnaryPostfix, "0")?;
        let exponent = em.value_or(block, "B", Order::None, "0")?;
        return Ok(Fragment::new(format!("{}.powf({})", base, exponent), Order::UnaryPostfix));
    }

    // The right operand of `-` and `/` binds tighter so that `a - (b - c)`
    // keeps its parentheses.
    let (symbol, order, right_order) = match op.as_str() {
        "ADD" => ("+", Order::Additive, Order::Additive),
        "MINUS" => ("-", Order::Additive, Order::Additive.tighter()),
        "MULTIPLY" => ("*", Order::Multiplicative, Order::Multiplicative),
        "DIVIDE" => ("/", Order::Multiplicative, Order::Multiplicative.tighter()),
        other => {
            return Err(BlockgenError::codegen(
                format!("Unknown arithmetic operator '{}'", other),
                block.id(),
            ))
        }
    };
    let a = em.value_or(block, "A", order, "0")?;
    let b = em.value_or(block, "B", right_order, "0")?;
    Ok(Fragment::new(format!("{} {} {}", a, symbol, b), order))
}

pub fn text(_: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let text = block.field_text("TEXT").unwrap_or_default();
    Ok(Fragment::atomic(quote(&text)))
}
