//! The inspect protocol.
//!
//! `inspect()` renders a printable form of any value. Containers are
//! rendered through their `inspect_visit(f)` slot, where `f` is a
//! visitor builtin that carries an identity-keyed visited set; cycles
//! render as `"..."` on re-entry. User objects can customise either
//! `inspect` (whole-value replacement) or `inspect_visit`
//! (cycle-aware, receives the visitor).

use crate::errors::{inspect_not_a_string, Control};
use crate::interpreter::Interp;
use crate::value::{BuiltinValue, Kind, Value};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Identity set shared between a root inspect call and its visitor.
type Visited = Rc<RefCell<FxHashSet<usize>>>;

/// Render the inspect-string of a value (fresh visited set).
pub fn inspect(interp: &mut Interp, value: &Value) -> Result<Rc<str>, Control> {
    let visited: Visited = Rc::new(RefCell::new(FxHashSet::default()));
    visit(interp, value.clone(), &visited)
}

/// The display form used by `puts`: strings print raw, everything
/// else prints its inspect-string.
pub fn display(interp: &mut Interp, value: &Value) -> Result<Rc<str>, Control> {
    match value {
        Value::Str(s) => Ok(Rc::clone(s)),
        other => inspect(interp, other),
    }
}

/// Format a number the way the language prints it: integral doubles
/// without a fraction, specials by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{n}")
    }
}

fn visit(interp: &mut Interp, value: Value, visited: &Visited) -> Result<Rc<str>, Control> {
    match &value {
        Value::Nil => Ok(Rc::from("nil")),
        Value::Bool(true) => Ok(Rc::from("true")),
        Value::Bool(false) => Ok(Rc::from("false")),
        Value::Number(n) => Ok(Rc::from(format_number(*n))),
        Value::Str(s) => Ok(Rc::from(format!("{s:?}"))),
        Value::Function(func) => Ok(Rc::clone(&func.display)),
        Value::Builtin(builtin) => Ok(Rc::clone(&builtin.display)),
        Value::Super(_) => Ok(Rc::from("[Super]")),
        Value::Object(_) | Value::Array(_) | Value::Hash(_) => {
            let id = value.heap_id().unwrap_or(0);
            if visited.borrow().contains(&id) {
                return Ok(Rc::from("..."));
            }
            visited.borrow_mut().insert(id);

            if let Some((slot, _)) = interp.find_slot(&value, interp.names.inspect_visit) {
                let visitor = make_visitor(Rc::clone(visited));
                let rendered = interp.call_value(slot, Some(value.clone()), None, &[visitor])?;
                return expect_string(interp, rendered);
            }
            // No inspect_visit: fall back to the value's inspect slot,
            // unless it is the root default (which delegates back here
            // and would recurse on its receiver).
            match interp.find_slot(&value, interp.names.inspect) {
                Some((slot, _)) if !is_default_inspect(interp, &slot) => {
                    let rendered = interp.call_value(slot, Some(value.clone()), None, &[])?;
                    expect_string(interp, rendered)
                }
                _ => Ok(Rc::from(default_label(&value))),
            }
        }
    }
}

/// Is this slot the `Object` prototype's own default `inspect`?
fn is_default_inspect(interp: &Interp, slot: &Value) -> bool {
    match &interp.protos.object {
        Value::Object(obj) => obj
            .borrow()
            .slots
            .get(&interp.names.inspect)
            .is_some_and(|default| Value::identical(default, slot)),
        _ => false,
    }
}

fn expect_string(interp: &mut Interp, rendered: Value) -> Result<Rc<str>, Control> {
    match interp.get_special(&rendered, Kind::String) {
        Some(Value::Str(s)) => Ok(s),
        _ => Err(interp.augment_builtin(inspect_not_a_string())),
    }
}

/// Default rendering for a bare object.
fn default_label(value: &Value) -> String {
    format!("[Object 0x{:x}]", value.heap_id().unwrap_or(0))
}

/// The visitor builtin handed to `inspect_visit`: calling it with a
/// value renders that value, sharing the visited set.
fn make_visitor(visited: Visited) -> Value {
    let func = move |interp: &mut Interp, _this: Value, args: &[Value]| {
        let value = args.first().cloned().unwrap_or(Value::Nil);
        visit(interp, value, &visited).map(Value::Str)
    };
    Value::Builtin(Rc::new(BuiltinValue::new("visitor", Rc::new(func))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
