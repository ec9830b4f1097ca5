//! Native operator implementations.
//!
//! Direct enum-based dispatch on (operator, left kind, right kind).
//! The type set is fixed, so pattern matching beats trait objects for
//! exhaustiveness and speed. User slot overrides are checked *before*
//! this table by the thin adapter in the interpreter (`Interp::binary`);
//! by the time control reaches here the operands are plain builtins.
//!
//! Equality and inequality never fail: unmatched kind pairs fall back
//! to identity. Arithmetic and ordering on unmatched pairs report
//! "unsupported operands".

use crate::errors::{unsupported_operand, unsupported_operands, EvalResult};
use crate::hash_table::{self, HashTable};
use crate::interpreter::Interp;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::TokenKind;

/// Evaluate a binary operation on two values, native semantics only.
pub fn evaluate_binary(
    interp: &mut Interp,
    op: TokenKind,
    left: Value,
    right: Value,
) -> EvalResult {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => eval_number_binary(op, *a, *b),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(op, a, b),
        (Value::Array(a), Value::Array(b)) => eval_array_binary(interp, op, a, b),
        (Value::Hash(a), Value::Hash(b)) => eval_hash_binary(interp, op, a, b),
        _ => {
            // An object paired with a plain builtin may wrap a payload
            // of that kind (subtyped builtins); unwrap once and retry.
            if let Some((left, right)) = unwrap_payload_pair(interp, &left, &right) {
                return evaluate_binary(interp, op, left, right);
            }
            match op {
                // Identity fallback: mixed kinds are simply not equal.
                TokenKind::EqEq => Ok(Value::Bool(Value::identical(&left, &right))),
                TokenKind::BangEq => Ok(Value::Bool(!Value::identical(&left, &right))),
                _ => Err(unsupported_operands(
                    op.lexeme(),
                    left.type_name(),
                    right.type_name(),
                )),
            }
        }
    }
}

/// When exactly one operand is an object, try to unwrap it to the
/// other operand's kind. The unwrapped value is never an object, so
/// the retry terminates.
fn unwrap_payload_pair(
    interp: &Interp,
    left: &Value,
    right: &Value,
) -> Option<(Value, Value)> {
    match (left, right) {
        (Value::Object(_), Value::Object(_)) => None,
        (Value::Object(_), _) => {
            let unwrapped = interp.get_special(left, right.kind())?;
            Some((unwrapped, right.clone()))
        }
        (_, Value::Object(_)) => {
            let unwrapped = interp.get_special(right, left.kind())?;
            Some((left.clone(), unwrapped))
        }
        _ => None,
    }
}

/// Evaluate a unary operation. `!` negates truthiness of anything;
/// `-` requires a number.
pub fn evaluate_unary(op: TokenKind, right: Value) -> EvalResult {
    match (op, &right) {
        (TokenKind::Bang, _) => Ok(Value::Bool(!right.is_truthy())),
        (TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
        _ => Err(unsupported_operand(op.lexeme(), right.type_name())),
    }
}

fn eval_number_binary(op: TokenKind, a: f64, b: f64) -> EvalResult {
    Ok(match op {
        TokenKind::Plus => Value::Number(a + b),
        TokenKind::Minus => Value::Number(a - b),
        TokenKind::Star => Value::Number(a * b),
        TokenKind::Slash => Value::Number(a / b),
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        TokenKind::Less => Value::Bool(a < b),
        TokenKind::LessEq => Value::Bool(a <= b),
        TokenKind::Greater => Value::Bool(a > b),
        TokenKind::GreaterEq => Value::Bool(a >= b),
        _ => return Err(unsupported_operands(op.lexeme(), "number", "number")),
    })
}

fn eval_string_binary(op: TokenKind, a: &Rc<str>, b: &Rc<str>) -> EvalResult {
    Ok(match op {
        TokenKind::Plus => Value::string(format!("{a}{b}")),
        TokenKind::EqEq => Value::Bool(a == b),
        TokenKind::BangEq => Value::Bool(a != b),
        // Ordering is lexicographic on bytes.
        TokenKind::Less => Value::Bool(a.as_bytes() < b.as_bytes()),
        TokenKind::LessEq => Value::Bool(a.as_bytes() <= b.as_bytes()),
        TokenKind::Greater => Value::Bool(a.as_bytes() > b.as_bytes()),
        TokenKind::GreaterEq => Value::Bool(a.as_bytes() >= b.as_bytes()),
        _ => return Err(unsupported_operands(op.lexeme(), "string", "string")),
    })
}

fn eval_array_binary(
    interp: &mut Interp,
    op: TokenKind,
    a: &Rc<RefCell<Vec<Value>>>,
    b: &Rc<RefCell<Vec<Value>>>,
) -> EvalResult {
    match op {
        TokenKind::Plus => {
            let mut result = a.borrow().clone();
            result.extend(b.borrow().iter().cloned());
            Ok(Value::array(result))
        }
        TokenKind::EqEq => Ok(Value::Bool(arrays_equal(interp, a, b)?)),
        TokenKind::BangEq => Ok(Value::Bool(!arrays_equal(interp, a, b)?)),
        _ => Err(unsupported_operands(op.lexeme(), "array", "array")),
    }
}

/// Elementwise equality, recursing through the interpreter's `==` so
/// nested overrides apply. Snapshots both sides first: an override is
/// free to touch the arrays being compared.
fn arrays_equal(
    interp: &mut Interp,
    a: &Rc<RefCell<Vec<Value>>>,
    b: &Rc<RefCell<Vec<Value>>>,
) -> Result<bool, crate::errors::Control> {
    if Rc::ptr_eq(a, b) {
        return Ok(true);
    }
    let left = a.borrow().clone();
    let right = b.borrow().clone();
    if left.len() != right.len() {
        return Ok(false);
    }
    for (x, y) in left.into_iter().zip(right) {
        if !interp.binary(TokenKind::EqEq, x, y)?.is_truthy() {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_hash_binary(
    interp: &mut Interp,
    op: TokenKind,
    a: &Rc<RefCell<HashTable>>,
    b: &Rc<RefCell<HashTable>>,
) -> EvalResult {
    match op {
        TokenKind::EqEq => Ok(Value::Bool(hashes_equal(interp, a, b)?)),
        TokenKind::BangEq => Ok(Value::Bool(!hashes_equal(interp, a, b)?)),
        _ => Err(unsupported_operands(op.lexeme(), "hash", "hash")),
    }
}

/// Hash equality: sizes first, then every left entry must exist in the
/// right with an equal value.
fn hashes_equal(
    interp: &mut Interp,
    a: &Rc<RefCell<HashTable>>,
    b: &Rc<RefCell<HashTable>>,
) -> Result<bool, crate::errors::Control> {
    if Rc::ptr_eq(a, b) {
        return Ok(true);
    }
    if a.borrow().size() != b.borrow().size() {
        return Ok(false);
    }
    let entries = a.borrow().live_entries();
    for (key, left_value) in entries {
        match hash_table::get(interp, b, &key)? {
            Some(right_value) => {
                if !interp
                    .binary(TokenKind::EqEq, left_value, right_value)?
                    .is_truthy()
                {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }
    Ok(true)
}
