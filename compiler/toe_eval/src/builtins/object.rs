//! Methods on the `Object` prototype, inherited by every value whose
//! chain reaches the root.

use super::{add_method, arity};
use crate::hash_table::{native_hash, user_hash};
use crate::inspect;
use crate::interpreter::Interp;
use crate::value::Value;
use toe_ir::TokenKind;

pub(super) fn install(interp: &mut Interp) {
    let proto = interp.protos.object.clone();

    // clone(): a fresh object whose prototype is the receiver.
    add_method(interp, &proto, "clone", |_interp, this, args| {
        arity(args, 0)?;
        Ok(Value::object(Some(this)))
    });

    // new(...): clone, then run init when the chain provides one.
    add_method(interp, &proto, "new", |interp, this, args| {
        let object = Value::object(Some(this));
        if let Some((init, whence)) = interp.find_slot(&object, interp.names.init) {
            interp.call_value(init, Some(object.clone()), Some(whence), args)?;
        }
        Ok(object)
    });

    // inspect(): printable form, cycle-safe.
    add_method(interp, &proto, "inspect", |interp, this, args| {
        arity(args, 0)?;
        inspect::inspect(interp, &this).map(Value::Str)
    });

    // ==: identity unless overridden closer in the chain.
    add_method(interp, &proto, "==", |_interp, this, args| {
        arity(args, 1)?;
        Ok(Value::Bool(Value::identical(&this, &args[0])))
    });

    // !=: negation of whatever == means for the receiver.
    add_method(interp, &proto, "!=", |interp, this, args| {
        arity(args, 1)?;
        let eq = interp.binary(TokenKind::EqEq, this, args[0].clone())?;
        Ok(Value::Bool(!eq.is_truthy()))
    });

    // is_a(proto): prototype-chain membership.
    add_method(interp, &proto, "is_a", |interp, this, args| {
        arity(args, 1)?;
        Ok(Value::Bool(interp.is_a(&this, &args[0])))
    });

    // hash(): identity-based unless a subtype payload hashes by
    // value; truncated to 53 bits for user code.
    add_method(interp, &proto, "hash", |interp, this, args| {
        arity(args, 0)?;
        Ok(Value::Number(user_hash(native_hash(interp, &this))))
    });
}
