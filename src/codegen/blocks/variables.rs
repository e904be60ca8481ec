//! Variable and procedure call blocks

use crate::block::BlockNode;
use crate::codegen::emitter::Emitter;
use crate::codegen::order::{Fragment, Order};
use crate::errors::BlockgenResult;

pub fn get(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let name = block.field_text("VAR").unwrap_or_default();
    Ok(Fragment::atomic(em.variable_name(&name)))
}

pub fn set(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let value = em.value_or(block, "VALUE", Order::Assignment, "0")?;
    let name = block.field_text("VAR").unwrap_or_default();
    Ok(format!("{} = {};\n", em.variable_name(&name), value))
}

pub fn call_return(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    Ok(Fragment::new(call(em, block)?, Order::UnaryPostfix))
}

pub fn call_no_return(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    Ok(format!("{};\n", call(em, block)?))
}

fn call(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let name = block.field_text("NAME").unwrap_or_default();
    let name = em.variable_name(&name);
    let count = block
        .extra_count("itemCount")
        .unwrap_or_else(|| (0..).take_while(|i| block.input(&format!("ARG{}", i)).is_some()).count());
    let mut args = Vec::with_capacity(count);
    for i in 0..count {
        args.push(em.value_or(block, &format!("ARG{}", i), Order::None, "0")?);
    }
    Ok(format!("{}({})", name, args.join(", ")))
}
