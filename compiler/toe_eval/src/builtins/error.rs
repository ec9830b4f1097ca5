//! Methods on the `Error` prototype.
//!
//! Errors are ordinary objects until thrown. `Error.new("boom")`
//! stores the reason in a `reason` slot; `throw()` starts the
//! propagation with that reason (or the error object itself when no
//! reason was set). User code cannot catch errors: the top-level
//! driver renders the assembled trace.

use super::{add_method, arity};
use crate::errors::error_value;
use crate::interpreter::Interp;
use crate::value::Value;

pub(super) fn install(interp: &mut Interp) {
    let proto = interp.protos.error.clone();

    add_method(interp, &proto, "init", |interp, this, args| {
        arity(args, 1)?;
        interp.set_slot(&this, interp.names.reason, args[0].clone())?;
        Ok(Value::Nil)
    });

    add_method(interp, &proto, "throw", |interp, this, args| {
        arity(args, 0)?;
        let reason = interp
            .find_slot(&this, interp.names.reason)
            .map(|(value, _)| value)
            .unwrap_or(this);
        Err(error_value(reason))
    });
}
