//! Handlers for the block types shipped with blockgen

mod app;
mod logic;
mod loops;
mod math;
mod mynewt;
mod variables;

use super::registry::Handler;

/// Every built-in block type and its handler
pub static BUILTIN: &[(&str, Handler)] = &[
    // Values
    ("math_number", Handler::Value(math::number)),
    ("math_arithmetic", Handler::Value(math::arithmetic)),
    ("text", Handler::Value(math::text)),
    ("logic_boolean", Handler::Value(logic::boolean)),
    ("logic_negate", Handler::Value(logic::negate)),
    ("logic_compare", Handler::Value(logic::compare)),
    ("logic_operation", Handler::Value(logic::operation)),
    ("variables_get", Handler::Value(variables::get)),
    ("procedures_callreturn", Handler::Value(variables::call_return)),
    ("app", Handler::Value(app::app)),
    ("label", Handler::Value(app::widget)),
    ("button", Handler::Value(app::widget)),
    ("field", Handler::Value(app::widget)),
    ("digital_read_pin", Handler::Value(mynewt::digital_read_pin)),
    // Statements
    ("variables_set", Handler::Statement(variables::set)),
    ("procedures_callnoreturn", Handler::Statement(variables::call_no_return)),
    ("controls_if", Handler::Statement(logic::controls_if)),
    ("controls_repeat_ext", Handler::Statement(loops::repeat)),
    ("controls_repeat", Handler::Statement(loops::repeat)),
    ("controls_whileUntil", Handler::Statement(loops::while_until)),
    ("controls_for", Handler::Statement(loops::for_range)),
    ("controls_forEach", Handler::Statement(loops::for_each)),
    ("controls_flow_statements", Handler::Statement(loops::flow_statement)),
    ("forever", Handler::Statement(mynewt::forever)),
    ("on_start", Handler::Statement(mynewt::on_start)),
    ("wait", Handler::Statement(mynewt::wait)),
    ("digital_toggle_pin", Handler::Statement(mynewt::digital_toggle_pin)),
    ("digital_write_pin", Handler::Statement(mynewt::digital_write_pin)),
];

/// Whether emitted text is a plain numeric literal (`^\s*-?\d+(\.\d+)?\s*$`)
pub(crate) fn is_number(text: &str) -> bool {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (whole, frac) = match digits.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    all_digits(whole) && frac.map_or(true, all_digits)
}
