//! Loop and flow control blocks
//!
//! Loops are lowered rather than translated one to one: non-trivial bounds
//! are evaluated once into fresh names before the loop, `until` becomes
//! `while`, and numeric ranges whose direction is unknown until run time
//! get their step sign fixed once before the loop starts.

use crate::block::{format_number, BlockNode};
use crate::codegen::emitter::Emitter;
use crate::codegen::names::is_identifier;
use crate::codegen::order::{Fragment, Order};
use crate::errors::{BlockgenError, BlockgenResult};
use super::is_number;

/// Repeat n times
pub fn repeat(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let repeats = match block.field("TIMES") {
        Some(times) => format_number(times.as_number().unwrap_or(0.0)),
        None => em.value_or(block, "TIMES", Order::Assignment, "0")?,
    };
    // Fractional counts repeat as often as a `count < n` test would allow.
    let repeats = match repeats.trim().parse::<f64>() {
        Ok(n) if is_number(&repeats) && n.fract() != 0.0 => format_number(n.ceil()),
        _ => repeats,
    };

    let mut code = String::new();
    let loop_var = em.fresh_name("count");
    let end = if is_identifier(&repeats) || is_number(&repeats) {
        repeats
    } else {
        let end = em.fresh_name("repeat_end");
        log::debug!("hoisting repeat count of block '{}' into '{}'", block.id(), end);
        code.push_str(&format!("let {} = {};\n", end, repeats));
        end
    };
    let branch = em.loop_body(block, "DO")?;
    code.push_str(&format!("for {} in 0..{} {{\n{}}}\n", loop_var, end, branch));
    Ok(code)
}

/// Do while/until
pub fn while_until(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let until = block.field_text("MODE").as_deref() == Some("UNTIL");
    let condition = if until {
        match block.input("BOOL") {
            // `until !x` is `while x`; never negate twice.
            Some(cond) if cond.kind() == "logic_negate" => em.value_or(cond, "BOOL", Order::None, "true")?,
            _ => format!("!{}", em.value_or(block, "BOOL", Order::UnaryPrefix, "false")?),
        }
    } else {
        em.value_or(block, "BOOL", Order::None, "false")?
    };
    let branch = em.loop_body(block, "DO")?;
    Ok(format!("while {} {{\n{}}}\n", condition, branch))
}

/// Count with a variable from a start to an end by a step
pub fn for_range(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let variable = em.variable_name(&block.field_text("VAR").unwrap_or_default());
    let start = em.value_or(block, "FROM", Order::Assignment, "0")?;
    let end = em.value_or(block, "TO", Order::Assignment, "0")?;
    let step = em
        .value_fragment(block, "BY")?
        .unwrap_or_else(|| Fragment::atomic("1"));

    if is_number(&start) && is_number(&end) && is_number(&step.code) {
        let header = literal_range(block, &variable, &start, &end, &step.code);
        let branch = em.loop_body(block, "DO")?;
        return Ok(format!("for {} in {} {{\n{}}}\n", variable, header, branch));
    }

    // Bounds are only known at run time: evaluate them once and settle the
    // direction before entering the loop.
    let mut code = String::new();
    let start_var = hoist(em, &mut code, &variable, "start", start);
    let end_var = hoist(em, &mut code, &variable, "end", end);

    let inc_var = em.fresh_name(&format!("{}_inc", variable));
    if is_number(&step.code) {
        let magnitude = step_magnitude(block, &step.code);
        code.push_str(&format!("let mut {} = {};\n", inc_var, magnitude));
    } else {
        code.push_str(&format!("let mut {} = {}.abs();\n", inc_var, step.embed(Order::UnaryPostfix)));
    }
    code.push_str(&format!(
        "if {} > {} {{\n{}{} = -{};\n}}\n",
        start_var,
        end_var,
        em.indent(),
        inc_var,
        inc_var
    ));
    log::debug!(
        "block '{}' counts from {} to {} with a run-time direction",
        block.id(),
        start_var,
        end_var
    );

    // The closures copy the bounds and step, so the range is fixed when the
    // loop starts.
    let branch = em.loop_body(block, "DO")?;
    code.push_str(&format!(
        "for {v} in std::iter::successors(Some({s}), move |&{v}| Some({v} + {inc}))\
         .take_while(move |&{v}| if {s} <= {e} {{ {v} <= {e} }} else {{ {v} >= {e} }}) {{\n{body}}}\n",
        v = variable,
        s = start_var,
        e = end_var,
        inc = inc_var,
        body = branch
    ));
    Ok(code)
}

/// Store a bound in a fresh name unless it is already an identifier or a
/// literal.
fn hoist(em: &mut Emitter<'_>, code: &mut String, variable: &str, suffix: &str, value: String) -> String {
    if is_identifier(&value) || is_number(&value) {
        return value;
    }
    let name = em.fresh_name(&format!("{}_{}", variable, suffix));
    code.push_str(&format!("let {} = {};\n", name, value));
    name
}

/// The range expression of a counting loop whose bounds are all literals
fn literal_range(block: &dyn BlockNode, variable: &str, start: &str, end: &str, step: &str) -> String {
    let parse = |text: &str| text.trim().parse::<f64>().unwrap_or(0.0);
    let (from, to) = (parse(start), parse(end));
    let magnitude = parse(&step_magnitude(block, step));
    let up = from <= to;

    let integral = [start, end, step].iter().all(|t| !t.contains('.'));
    if !integral {
        let (delta, test) = if up {
            (format!("{:?}", magnitude), "<=")
        } else {
            (format!("-{:?}", magnitude), ">=")
        };
        return format!(
            "std::iter::successors(Some({s:?}), |&{v}| Some({v} + {d})).take_while(|&{v}| {v} {t} {e:?})",
            s = from,
            v = variable,
            d = delta,
            t = test,
            e = to
        );
    }

    let (low, high) = if up { (start.trim(), end.trim()) } else { (end.trim(), start.trim()) };
    let mut range = format!("{}..={}", low, high);
    if !up {
        range = format!("({}).rev()", range);
    }
    if magnitude != 1.0 {
        if up {
            range = format!("({})", range);
        }
        range = format!("{}.step_by({})", range, format_number(magnitude));
    }
    range
}

/// The absolute value of a literal step. A step of 0 would never reach the
/// end, so it counts by 1 instead.
fn step_magnitude(block: &dyn BlockNode, step: &str) -> String {
    let magnitude = step.trim().trim_start_matches('-');
    if magnitude.parse::<f64>().map_or(true, |m| m == 0.0) {
        log::warn!("block '{}' counts with a step of 0, using 1", block.id());
        return "1".to_string();
    }
    magnitude.to_string()
}

/// For each item in a list
pub fn for_each(em: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    let variable = em.variable_name(&block.field_text("VAR").unwrap_or_default());
    let list = em.value_or(block, "LIST", Order::Assignment, "[]")?;
    let branch = em.loop_body(block, "DO")?;
    Ok(format!("for {} in {} {{\n{}}}\n", variable, list, branch))
}

/// Flow statements: continue, break
pub fn flow_statement(_: &mut Emitter<'_>, block: &dyn BlockNode) -> BlockgenResult<String> {
    match block.field_text("FLOW").as_deref() {
        Some("BREAK") => Ok("break;\n".to_string()),
        Some("CONTINUE") => Ok("continue;\n".to_string()),
        other => Err(BlockgenError::codegen(
            format!("Unknown flow statement '{}'", other.unwrap_or("")),
            block.id(),
        )),
    }
}
