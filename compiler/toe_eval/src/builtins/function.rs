//! Methods on the `Function` prototype (shared by builtins).

use super::{add_method, arity};
use crate::errors::{called_on_wrong_type, not_a_function};
use crate::inspect;
use crate::interpreter::Interp;
use crate::value::Value;

pub(super) fn install(interp: &mut Interp) {
    let proto = interp.protos.function.clone();

    // bind(x): pin the receiver. Binding a bound function yields the
    // same function.
    add_method(interp, &proto, "bind", |interp, this, args| {
        arity(args, 1)?;
        match this {
            Value::Function(_) | Value::Builtin(_) => {
                Ok(interp.bind_value(this, args[0].clone()))
            }
            other => Err(called_on_wrong_type("bind", other.type_name())),
        }
    });

    // call(receiver, args...): invoke with an explicit receiver.
    add_method(interp, &proto, "call", |interp, this, args| {
        if !matches!(this, Value::Function(_) | Value::Builtin(_)) {
            return Err(not_a_function());
        }
        let receiver = args.first().cloned().unwrap_or(Value::Nil);
        let rest = if args.is_empty() { &[] } else { &args[1..] };
        interp.call_value(this, Some(receiver), None, rest)
    });

    add_method(interp, &proto, "inspect", |interp, this, args| {
        arity(args, 0)?;
        inspect::inspect(interp, &this).map(Value::Str)
    });
}
