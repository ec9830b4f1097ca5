//! Methods on the `Hash` prototype.

use super::array::render_with;
use super::{add_method, arity, binop_method, expect_special};
use crate::errors::{error, key_not_in_hash, Control};
use crate::hash_table::{self, HashTable};
use crate::interpreter::Interp;
use crate::value::{Kind, Value};
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::TokenKind;

pub(super) fn install(interp: &mut Interp) {
    let proto = interp.protos.hash.clone();

    for &op in &[TokenKind::EqEq, TokenKind::BangEq] {
        add_method(interp, &proto, op.lexeme(), binop_method(Kind::Hash, op));
    }

    // init(): `Hash.new()` carries a fresh table as its payload,
    // probing with the context seed.
    add_method(interp, &proto, "init", |interp, this, args| {
        arity(args, 0)?;
        match &this {
            Value::Object(obj) => {
                let table = Rc::new(RefCell::new(HashTable::new(interp.seed())));
                obj.borrow_mut().data = Some(Value::Hash(table));
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
        let table = unwrap_hash(interp, &this, "size")?;
        let size = table.borrow().size();
        Ok(Value::Number(size as f64))
    });

    add_method(interp, &proto, "get", |interp, this, args| {
        arity(args, 1)?;
        let table = unwrap_hash(interp, &this, "get")?;
        match hash_table::get(interp, &table, &args[0])? {
            Some(value) => Ok(value),
            None => Err(key_not_in_hash()),
        }
    });

    add_method(interp, &proto, "set", |interp, this, args| {
        arity(args, 2)?;
        let table = unwrap_hash(interp, &this, "set")?;
        hash_table::insert(interp, &table, args[0].clone(), args[1].clone())?;
        Ok(this)
    });

    add_method(interp, &proto, "delete", |interp, this, args| {
        arity(args, 1)?;
        let table = unwrap_hash(interp, &this, "delete")?;
        let found = hash_table::remove(interp, &table, &args[0])?;
        Ok(Value::Bool(found))
    });

    // inspect_visit(f): `{k: v, ...}` in storage order, cycle-safe
    // through the shared visitor.
    add_method(interp, &proto, "inspect_visit", |interp, this, args| {
        arity(args, 1)?;
        let table = unwrap_hash(interp, &this, "inspect_visit")?;
        let entries = table.borrow().live_entries();
        let visitor = args[0].clone();
        let mut out = String::from("{");
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&render_with(interp, &visitor, key)?);
            out.push_str(": ");
            out.push_str(&render_with(interp, &visitor, value)?);
        }
        out.push('}');
        Ok(Value::string(out))
    });
}

/// Receiver unwrap shared by the hash methods.
fn unwrap_hash(
    interp: &Interp,
    this: &Value,
    what: &'static str,
) -> Result<Rc<RefCell<HashTable>>, Control> {
    match expect_special(interp, this, Kind::Hash, what)? {
        Value::Hash(table) => Ok(table),
        _ => unreachable!("get_special returned a non-hash"),
    }
}
