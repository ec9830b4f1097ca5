//! Control signals and runtime errors.
//!
//! Every eval function returns [`EvalResult`]. The `Err` arm carries a
//! [`Control`] signal: `Break`/`Continue` until a loop consumes them,
//! `Return` until the function boundary unwraps it, or `Error` which
//! propagates all the way out, growing its trace as it goes. Modelling
//! the signals as the error arm keeps the `?` operator doing the
//! propagation rule from the language definition: any subexpression
//! that signals makes the enclosing composite signal too.
//!
//! The canonical error constructors live here as `#[cold]` free
//! functions so call sites stay small and message wording stays in one
//! place.

use crate::value::Value;
use std::rc::Rc;
use toe_ir::Position;

/// Result of evaluating a statement or expression.
pub type EvalResult = Result<Value, Control>;

/// A control signal propagating through the return channel.
#[derive(Clone, Debug)]
pub enum Control {
    /// Exit the nearest enclosing loop.
    Break,
    /// Skip to the next iteration of the nearest enclosing loop.
    Continue,
    /// Unwind to the nearest function boundary with a value.
    Return(Value),
    /// A runtime error, unwinding to the top-level handler.
    Error(RuntimeError),
}

/// A propagating runtime error: a reason value (conventionally a
/// string) plus the trace frames collected so far.
#[derive(Clone, Debug)]
pub struct RuntimeError {
    pub reason: Value,
    pub trace: Vec<TraceFrame>,
}

impl RuntimeError {
    pub fn new(reason: Value) -> Self {
        RuntimeError {
            reason,
            trace: Vec::new(),
        }
    }
}

/// One trace entry: where the error passed through, and what was
/// executing there (`[Module]`, `[Function f]`, `[Builtin puts]`).
#[derive(Clone, Debug)]
pub struct TraceFrame {
    pub filename: Rc<str>,
    pub pos: Position,
    pub context: Rc<str>,
}

/// Build an error signal from a reason string.
#[cold]
pub fn error(reason: impl Into<String>) -> Control {
    Control::Error(RuntimeError::new(Value::string(reason.into())))
}

/// Build an error signal from an arbitrary reason value (`throw`).
#[cold]
pub fn error_value(reason: Value) -> Control {
    Control::Error(RuntimeError::new(reason))
}

// Canonical reasons. Wording is part of the language surface (tests
// and user programs match on it), so change with care.

#[cold]
pub fn not_a_function() -> Control {
    error("not a function")
}

#[cold]
pub fn not_iterable() -> Control {
    error("not iterable")
}

#[cold]
pub fn no_slot(name: &str) -> Control {
    error(format!("object has no slot {name:?}"))
}

#[cold]
pub fn cannot_set_slot(name: &str) -> Control {
    error(format!("cannot set slot {name:?} on object"))
}

#[cold]
pub fn not_defined(name: &str) -> Control {
    error(format!("{name:?} is not defined"))
}

#[cold]
pub fn wrong_arg_count(expected: usize, got: usize) -> Control {
    error(format!("expected {expected} argument(s), got={got}"))
}

#[cold]
pub fn unsupported_operands(op: &str, left: &str, right: &str) -> Control {
    error(format!(
        "unsupported operands for {op:?}: {left} and {right}"
    ))
}

#[cold]
pub fn unsupported_operand(op: &str, right: &str) -> Control {
    error(format!("unsupported operand for {op:?}: {right}"))
}

#[cold]
pub fn called_on_wrong_type(what: &str, type_name: &str) -> Control {
    error(format!("{what} called on {type_name}"))
}

#[cold]
pub fn list_index_out_of_bounds() -> Control {
    error("list index out of bounds")
}

#[cold]
pub fn key_not_in_hash() -> Control {
    error("key not in hash")
}

#[cold]
pub fn super_outside_method() -> Control {
    error("super used outside of a method")
}

#[cold]
pub fn nil_prototype() -> Control {
    error("object has nil prototype")
}

#[cold]
pub fn hash_not_a_number() -> Control {
    error("expected hash to return a number")
}

#[cold]
pub fn inspect_not_a_string() -> Control {
    error("inspect should return a string")
}
