//! Methods on the `Number`, `String` and `Boolean` prototypes.
//!
//! The operator slots delegate to the native table, so explicit slot
//! access (`get_slot(3, "+")`, bound calls) sees the same semantics as
//! the operator syntax.

use super::{add_method, arity, binop_method, expect_special};
use crate::errors::error;
use crate::hash_table::{native_hash, user_hash};
use crate::inspect::{display, format_number};
use crate::interpreter::Interp;
use crate::value::{Kind, Value};
use toe_ir::TokenKind;

/// Operators available on numbers.
const NUMBER_OPS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::EqEq,
    TokenKind::BangEq,
    TokenKind::Less,
    TokenKind::LessEq,
    TokenKind::Greater,
    TokenKind::GreaterEq,
];

/// Operators available on strings (`+` concatenates).
const STRING_OPS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::EqEq,
    TokenKind::BangEq,
    TokenKind::Less,
    TokenKind::LessEq,
    TokenKind::Greater,
    TokenKind::GreaterEq,
];

pub(super) fn install(interp: &mut Interp) {
    let number = interp.protos.number.clone();
    let string = interp.protos.string.clone();
    let boolean = interp.protos.boolean.clone();

    for &op in NUMBER_OPS {
        add_method(interp, &number, op.lexeme(), binop_method(Kind::Number, op));
    }
    for &op in STRING_OPS {
        add_method(interp, &string, op.lexeme(), binop_method(Kind::String, op));
    }

    // init(x): coerce into a number payload.
    add_method(interp, &number, "init", |interp, this, args| {
        arity(args, 1)?;
        let n = coerce_number(interp, &args[0])?;
        store_payload(&this, Value::Number(n))
    });

    // init(x): coerce anything into its display string.
    add_method(interp, &string, "init", |interp, this, args| {
        arity(args, 1)?;
        let s = display(interp, &args[0])?;
        store_payload(&this, Value::Str(s))
    });

    add_method(interp, &number, "inspect", |interp, this, args| {
        arity(args, 0)?;
        match expect_special(interp, &this, Kind::Number, "inspect")? {
            Value::Number(n) => Ok(Value::string(format_number(n))),
            _ => unreachable!("get_special returned a non-number"),
        }
    });

    add_method(interp, &string, "inspect", |interp, this, args| {
        arity(args, 0)?;
        match expect_special(interp, &this, Kind::String, "inspect")? {
            Value::Str(s) => Ok(Value::string(format!("{s:?}"))),
            _ => unreachable!("get_special returned a non-string"),
        }
    });

    add_method(interp, &boolean, "inspect", |interp, this, args| {
        arity(args, 0)?;
        match expect_special(interp, &this, Kind::Boolean, "inspect")? {
            Value::Bool(b) => Ok(Value::string(if b { "true" } else { "false" })),
            _ => unreachable!("get_special returned a non-boolean"),
        }
    });

    // hash(): tagged value hashing, truncated for user code.
    for proto in [&number, &string, &boolean] {
        add_method(interp, proto, "hash", |interp, this, args| {
            arity(args, 0)?;
            Ok(Value::Number(user_hash(native_hash(interp, &this))))
        });
    }
}

/// Coercion rules for `Number.init`.
fn coerce_number(interp: &Interp, value: &Value) -> Result<f64, crate::errors::Control> {
    if let Some(Value::Number(n)) = interp.get_special(value, Kind::Number) {
        return Ok(n);
    }
    if let Some(Value::Str(s)) = interp.get_special(value, Kind::String) {
        return s
            .trim()
            .parse::<f64>()
            .map_err(|_| error(format!("cannot convert {s:?} to a number")));
    }
    match value {
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(error(format!(
            "cannot convert {} to a number",
            other.type_name()
        ))),
    }
}

/// `init` runs on a freshly cloned object; park the payload in its
/// data field so `get_special` finds it.
fn store_payload(this: &Value, payload: Value) -> crate::errors::EvalResult {
    match this {
        Value::Object(obj) => {
            obj.borrow_mut().data = Some(payload);
            Ok(Value::Nil)
        }
        other => Err(error(format!(
            "init called on {}, expected an object",
            other.type_name()
        ))),
    }
}
