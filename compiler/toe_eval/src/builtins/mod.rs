//! Builtin prototypes and global functions.
//!
//! Installation happens once at context creation: each submodule adds
//! method slots to its prototype object, then the global name → value
//! table is memoised on the context and copied into every module
//! frame.
//!
//! Builtins receive `(interp, this, args)`. Receivers are unwrapped
//! with `get_special`, so an object whose prototype chain carries an
//! array payload is acceptable to every array method.

mod array;
mod error;
mod function;
mod globals;
mod hash;
mod object;
mod scalar;

use crate::errors::{called_on_wrong_type, wrong_arg_count, Control, EvalResult};
use crate::interpreter::Interp;
use crate::value::{BuiltinValue, Kind, Value};
use std::rc::Rc;

/// Wire up every prototype and memoise the globals table.
pub(crate) fn install(interp: &mut Interp) {
    object::install(interp);
    function::install(interp);
    scalar::install(interp);
    array::install(interp);
    hash::install(interp);
    error::install(interp);

    let mut globals: Vec<(&'static str, Value)> = vec![
        ("Object", interp.protos.object.clone()),
        ("Function", interp.protos.function.clone()),
        ("Error", interp.protos.error.clone()),
        ("Boolean", interp.protos.boolean.clone()),
        ("Number", interp.protos.number.clone()),
        ("String", interp.protos.string.clone()),
        ("Array", interp.protos.array.clone()),
        ("Hash", interp.protos.hash.clone()),
    ];
    globals.extend(globals::functions());

    interp.globals = globals
        .into_iter()
        .map(|(name, value)| (interp.interner.intern(name), value))
        .collect();
}

/// Install one method slot on a prototype.
pub(super) fn add_method(
    interp: &Interp,
    proto: &Value,
    name: &'static str,
    func: impl Fn(&mut Interp, Value, &[Value]) -> EvalResult + 'static,
) {
    let slot_name = interp.interner.intern(name);
    let builtin = Value::Builtin(Rc::new(BuiltinValue::new(name, Rc::new(func))));
    interp
        .set_slot(proto, slot_name, builtin)
        .expect("prototype objects accept slots");
}

/// Exact-arity check with the canonical reason.
pub(super) fn arity(args: &[Value], expected: usize) -> Result<(), Control> {
    if args.len() != expected {
        return Err(wrong_arg_count(expected, args.len()));
    }
    Ok(())
}

/// Build an operator method slot over the native table for one
/// builtin kind: the receiver must unwrap to `kind`, the argument
/// unwraps when it can, and the native semantics apply.
pub(super) fn binop_method(
    kind: Kind,
    op: toe_ir::TokenKind,
) -> impl Fn(&mut Interp, Value, &[Value]) -> EvalResult {
    move |interp, this, args| {
        arity(args, 1)?;
        let lhs = interp
            .get_special(&this, kind)
            .ok_or_else(|| called_on_wrong_type(op.lexeme(), this.type_name()))?;
        let rhs = interp
            .get_special(&args[0], kind)
            .unwrap_or_else(|| args[0].clone());
        crate::operators::evaluate_binary(interp, op, lhs, rhs)
    }
}

/// Unwrap a receiver to a required kind, with the canonical
/// "<what> called on <type>" reason.
pub(super) fn expect_special(
    interp: &Interp,
    value: &Value,
    kind: Kind,
    what: &'static str,
) -> Result<Value, Control> {
    interp
        .get_special(value, kind)
        .ok_or_else(|| called_on_wrong_type(what, value.type_name()))
}
