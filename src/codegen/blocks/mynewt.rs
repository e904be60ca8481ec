//! Device blocks for Mynewt firmware: GPIO pins, delays and the program
//! entry points.

use crate::block::{format_number, BlockNode};
use crate::codegen::emitter::Emitter;
use crate::codegen::order::{Fragment, Order};
use crate::errors::{BlockgenError, BlockgenResult};

const USE_GPIO: &str = "use mynewt::hw::gpio;";
const USE_TIME: &str = "use mynewt::kernel::os::{time_delay, OS_TICKS_PER_SEC};";
const USE_RESULT: &str = "use mynewt::result::MynewtResult;";

pub fn forever(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let branch = em.loop_body(block, "STMTS")?;
    Ok(format!("loop {{\n{}}}\n", branch))
}

pub fn on_start(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    em.provide_definition("mynewt_result", USE_RESULT);
    let body = em.statement_to_code(block, "STMTS")?;
    Ok(format!(
        "fn on_start() -> MynewtResult<()> {{\n{}{}Ok(())\n}}\n",
        body,
        em.indent()
    ))
}

pub fn wait(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    em.provide_definition("mynewt_time", USE_TIME);
    let seconds = block.field("DURATION").and_then(|v| v.as_number()).unwrap_or(0.0).max(0.0);
    let ticks = if seconds.fract() == 0.0 {
        format!("{} * OS_TICKS_PER_SEC", format_number(seconds))
    } else {
        format!("({:?} * OS_TICKS_PER_SEC as f32) as u32", seconds)
    };
    Ok(format!("time_delay({})?;\n", ticks))
}

pub fn digital_toggle_pin(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    em.provide_definition("mynewt_gpio", USE_GPIO);
    Ok(format!("gpio::toggle({})?;\n", pin(block)?))
}

pub fn digital_write_pin(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    em.provide_definition("mynewt_gpio", USE_GPIO);
    let value = block.field_text("VALUE").unwrap_or_else(|| "0".to_string());
    Ok(format!("gpio::write({}, {})?;\n", pin(block)?, value))
}

pub fn digital_read_pin(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    em.provide_definition("mynewt_gpio", USE_GPIO);
    Ok(Fragment::new(format!("gpio::read({})", pin(block)?), Order::UnaryPostfix))
}

fn pin(block: &dyn BlockNode) -> BlockgenResult<String> {
    block
        .field_text("PIN")
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| BlockgenError::codegen(format!("'{}' block has no pin selected", block.kind()), block.id()))
}
