//! App payload and widget blocks
//!
//! An `app` block assembles a JSON payload through the `app!` macro; its
//! items are `label`, `button` and `field` entries of the form
//! `"name": value`.

use crate::block::BlockNode;
use crate::codegen::emitter::{prefix_lines, quote, Emitter};
use crate::codegen::order::{Fragment, Order};
use crate::errors::BlockgenResult;

pub fn app(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let count = block
        .extra_count("itemCount")
        .unwrap_or_else(|| (0..).take_while(|i| block.input(&format!("ADD{}", i)).is_some()).count());
    let mut elements = Vec::with_capacity(count);
    for i in 0..count {
        elements.push(em.value_or(block, &format!("ADD{}", i), Order::None, "\"\"")?);
    }
    let body = prefix_lines(&elements.join(",\n"), em.indent());
    let code = if body.is_empty() {
        "app!( @json {\n})".to_string()
    } else {
        format!("app!( @json {{\n{}\n}})", body)
    };
    Ok(Fragment::new(code, Order::UnaryPostfix))
}

/// `label`, `button` and `field`: one named payload entry
pub fn widget(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<Fragment> {
    let name = block.field_text("NAME").unwrap_or_default();
    let value = em.value_or(block, "name", Order::Atomic, "\"\"")?;
    Ok(Fragment::new(format!("{}: {}", quote(&name), value), Order::None))
}
