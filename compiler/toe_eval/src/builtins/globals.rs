//! Global builtin functions (not methods on a prototype).

use super::arity;
use crate::errors::error;
use crate::inspect::display;
use crate::interpreter::Interp;
use crate::value::{BuiltinValue, Kind, Value};
use std::rc::Rc;

/// Build the free-function globals.
pub(super) fn functions() -> Vec<(&'static str, Value)> {
    vec![
        ("puts", builtin("puts", bi_puts)),
        ("get_slot", builtin("get_slot", bi_get_slot)),
        ("set_slot", builtin("set_slot", bi_set_slot)),
        ("slot_names", builtin("slot_names", bi_slot_names)),
        ("get_proto", builtin("get_proto", bi_get_proto)),
        ("is_a", builtin("is_a", bi_is_a)),
    ]
}

fn builtin(
    name: &'static str,
    func: fn(&mut Interp, Value, &[Value]) -> crate::errors::EvalResult,
) -> Value {
    Value::Builtin(Rc::new(BuiltinValue::new(name, Rc::new(func))))
}

/// Print the display form of each argument, space-separated, then a
/// newline. Yields nil.
fn bi_puts(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let part = display(interp, arg).map_err(|c| interp.augment_builtin(c))?;
        line.push_str(&part);
    }
    interp.print_handler().print_line(&line);
    Ok(Value::Nil)
}

/// Fetch a slot by name without binding.
fn bi_get_slot(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    arity(args, 2)?;
    let name = slot_name(interp, &args[1])?;
    let (value, _whence) = interp
        .get_slot(&args[0], name)
        .map_err(|c| interp.augment_builtin(c))?;
    Ok(value)
}

/// Write a slot by name. Yields the stored value.
fn bi_set_slot(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    arity(args, 3)?;
    let name = slot_name(interp, &args[1])?;
    interp
        .set_slot(&args[0], name, args[2].clone())
        .map_err(|c| interp.augment_builtin(c))?;
    Ok(args[2].clone())
}

/// The receiver's own slot names as an array of strings, sorted for
/// stable output (slot storage order is not meaningful).
fn bi_slot_names(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    arity(args, 1)?;
    let mut names: Vec<String> = match &args[0] {
        Value::Object(obj) => obj
            .borrow()
            .slots
            .keys()
            .map(|n| interp.interner.lookup(*n).to_string())
            .collect(),
        Value::Function(func) => func
            .slots
            .borrow()
            .keys()
            .map(|n| interp.interner.lookup(*n).to_string())
            .collect(),
        Value::Builtin(b) => b
            .slots
            .borrow()
            .keys()
            .map(|n| interp.interner.lookup(*n).to_string())
            .collect(),
        _ => Vec::new(),
    };
    names.sort();
    Ok(Value::array(names.into_iter().map(Value::string).collect()))
}

/// The prototype of a value, or nil at the chain root.
fn bi_get_proto(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    arity(args, 1)?;
    Ok(interp.get_prototype(&args[0]).unwrap_or(Value::Nil))
}

/// Prototype-chain membership test.
fn bi_is_a(interp: &mut Interp, _this: Value, args: &[Value]) -> crate::errors::EvalResult {
    arity(args, 2)?;
    Ok(Value::Bool(interp.is_a(&args[0], &args[1])))
}

/// Slot-name arguments must unwrap to strings.
fn slot_name(interp: &Interp, value: &Value) -> Result<toe_ir::Name, crate::errors::Control> {
    match interp.get_special(value, Kind::String) {
        Some(Value::Str(s)) => Ok(interp.interner.intern(&s)),
        _ => Err(error(format!(
            "slot name must be a string, got {}",
            value.type_name()
        ))),
    }
}
