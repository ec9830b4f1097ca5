//! Methods on the `Array` prototype.

use super::{add_method, arity, binop_method, expect_special};
use crate::errors::{error, list_index_out_of_bounds, Control};
use crate::interpreter::Interp;
use crate::value::{Kind, Value};
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::TokenKind;

pub(super) fn install(interp: &mut Interp) {
    let proto = interp.protos.array.clone();

    for &op in &[TokenKind::Plus, TokenKind::EqEq, TokenKind::BangEq] {
        add_method(interp, &proto, op.lexeme(), binop_method(Kind::Array, op));
    }

    // init(...): `Array.new(1, 2, 3)` carries its elements as the
    // payload of the cloned object.
    add_method(interp, &proto, "init", |_interp, this, args| {
        match &this {
            Value::Object(obj) => {
                obj.borrow_mut().data = Some(Value::array(args.to_vec()));
                Ok(Value::Nil)
            }
            other => Err(error(format!(
                "init called on {}, expected an object",
                other.type_name()
            ))),
        }
    });

    add_method(interp, &proto, "size", |interp, this, args| {
        arity(args, 0)?;
        let items = unwrap_array(interp, &this, "size")?;
        let len = items.borrow().len();
        Ok(Value::Number(len as f64))
    });

    add_method(interp, &proto, "get", |interp, this, args| {
        arity(args, 1)?;
        let items = unwrap_array(interp, &this, "get")?;
        let index = index_of(interp, &args[0], items.borrow().len())?;
        let value = items.borrow()[index].clone();
        Ok(value)
    });

    add_method(interp, &proto, "set", |interp, this, args| {
        arity(args, 2)?;
        let items = unwrap_array(interp, &this, "set")?;
        let index = index_of(interp, &args[0], items.borrow().len())?;
        items.borrow_mut()[index] = args[1].clone();
        Ok(args[1].clone())
    });

    add_method(interp, &proto, "push", |interp, this, args| {
        arity(args, 1)?;
        let items = unwrap_array(interp, &this, "push")?;
        items.borrow_mut().push(args[0].clone());
        Ok(this)
    });

    // pop(i?): removes and returns the element; last by default.
    add_method(interp, &proto, "pop", |interp, this, args| {
        if args.len() > 1 {
            return Err(crate::errors::wrong_arg_count(1, args.len()));
        }
        let items = unwrap_array(interp, &this, "pop")?;
        let len = items.borrow().len();
        let index = match args.first() {
            Some(arg) => index_of(interp, arg, len)?,
            None => {
                if len == 0 {
                    return Err(list_index_out_of_bounds());
                }
                len - 1
            }
        };
        let value = items.borrow_mut().remove(index);
        Ok(value)
    });

    // concat(other): same semantics as `+`: a fresh array.
    add_method(interp, &proto, "concat", |interp, this, args| {
        arity(args, 1)?;
        let lhs = expect_special(interp, &this, Kind::Array, "concat")?;
        let rhs = interp
            .get_special(&args[0], Kind::Array)
            .unwrap_or_else(|| args[0].clone());
        crate::operators::evaluate_binary(interp, TokenKind::Plus, lhs, rhs)
    });

    // inspect_visit(f): render elements through the visitor so the
    // shared visited set catches cycles.
    add_method(interp, &proto, "inspect_visit", |interp, this, args| {
        arity(args, 1)?;
        let items = unwrap_array(interp, &this, "inspect_visit")?;
        let snapshot = items.borrow().clone();
        let visitor = args[0].clone();
        let mut out = String::from("[");
        for (i, element) in snapshot.into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&render_with(interp, &visitor, element)?);
        }
        out.push(']');
        Ok(Value::string(out))
    });
}

/// Call the inspect visitor on one element and insist on a string.
pub(super) fn render_with(
    interp: &mut Interp,
    visitor: &Value,
    element: Value,
) -> Result<String, Control> {
    let rendered = interp.call_value(visitor.clone(), None, None, &[element])?;
    match interp.get_special(&rendered, Kind::String) {
        Some(Value::Str(s)) => Ok(s.to_string()),
        _ => Err(interp.augment_builtin(crate::errors::inspect_not_a_string())),
    }
}

/// Receiver unwrap shared by the array methods.
fn unwrap_array(
    interp: &Interp,
    this: &Value,
    what: &'static str,
) -> Result<Rc<RefCell<Vec<Value>>>, Control> {
    match expect_special(interp, this, Kind::Array, what)? {
        Value::Array(items) => Ok(items),
        _ => unreachable!("get_special returned a non-array"),
    }
}

/// Check an index argument: must be an integral number in bounds.
fn index_of(interp: &Interp, arg: &Value, len: usize) -> Result<usize, Control> {
    let n = match interp.get_special(arg, Kind::Number) {
        Some(Value::Number(n)) => n,
        _ => return Err(error("list index must be a number")),
    };
    if n.fract() != 0.0 || n < 0.0 || n >= len as f64 {
        return Err(list_index_out_of_bounds());
    }
    Ok(n as usize)
}
