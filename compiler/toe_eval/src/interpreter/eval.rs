//! Statement and expression evaluation.
//!
//! Everything returns [`EvalResult`]; the `?` operator is the
//! propagation rule. Loops consume `Break`/`Continue`, the call
//! protocol consumes `Return`, and `Error` keeps going, picking up a
//! trace frame at each binary/unary/get/set/method/call/for boundary
//! it crosses.

use super::Interp;
use crate::environment::EnvRef;
use crate::errors::{
    nil_prototype, not_defined, not_iterable, super_outside_method, Control, EvalResult,
};
use crate::hash_table::{self, HashTable};
use crate::iterator::get_iterator;
use crate::value::{FunctionValue, Slots, Value};
use std::cell::RefCell;
use std::rc::Rc;
use toe_ir::ast::{self, Expr, Stmt};
use toe_ir::TokenKind;

impl Interp {
    /// Evaluate one statement.
    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult {
        match stmt {
            Stmt::Let(s) => {
                let value = self.eval_expr(&s.value)?;
                self.env.define(s.name_id, value);
                Ok(Value::Nil)
            }
            Stmt::Block(b) => self.eval_block(b),
            Stmt::If(s) => {
                let cond = self.eval_expr(&s.cond)?;
                if cond.is_truthy() {
                    self.eval_stmt(&s.then)
                } else if let Some(otherwise) = &s.otherwise {
                    self.eval_stmt(otherwise)
                } else {
                    Ok(Value::Nil)
                }
            }
            Stmt::While(s) => self.eval_while(s),
            Stmt::For(s) => self.eval_for(s),
            Stmt::Return(s) => {
                let value = match &s.expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Err(Control::Return(value))
            }
            Stmt::Break(_) => Err(Control::Break),
            Stmt::Continue(_) => Err(Control::Continue),
            Stmt::Expr(s) => self.eval_expr(&s.expr),
        }
    }

    /// A block pushes a frame, runs its statements, and yields the
    /// last statement's value. The frame is popped on every exit path.
    pub(crate) fn eval_block(&mut self, block: &ast::Block) -> EvalResult {
        let saved = self.env.clone();
        self.env = EnvRef::push(&saved);
        let mut result = Ok(Value::Nil);
        for stmt in &block.stmts {
            match self.eval_stmt(stmt) {
                Ok(value) => result = Ok(value),
                Err(control) => {
                    result = Err(control);
                    break;
                }
            }
        }
        self.env = saved;
        result
    }

    fn eval_while(&mut self, s: &ast::While) -> EvalResult {
        loop {
            let cond = self.eval_expr(&s.cond)?;
            if !cond.is_truthy() {
                break;
            }
            match self.eval_stmt(&s.body) {
                Ok(_) | Err(Control::Continue) => {}
                Err(Control::Break) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Value::Nil)
    }

    fn eval_for(&mut self, s: &ast::For) -> EvalResult {
        let iterable = self.eval_expr(&s.iter)?;
        let mut iterator = match get_iterator(&iterable, |kind| self.get_special(&iterable, kind))
        {
            Some(iterator) => iterator,
            None => return Err(self.augment(not_iterable(), s.token.pos)),
        };

        let saved = self.env.clone();
        self.env = EnvRef::push(&saved);
        let mut result = Ok(Value::Nil);
        while !iterator.done() {
            let next = iterator.next();
            self.env.define(s.name_id, next);
            match self.eval_stmt(&s.body) {
                Ok(_) | Err(Control::Continue) => {}
                Err(Control::Break) => break,
                Err(other) => {
                    result = Err(self.augment(other, s.token.pos));
                    break;
                }
            }
        }
        self.env = saved;
        // The iterator is closed on every exit path, errors included.
        iterator.close();
        result
    }

    /// Evaluate one expression.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(e) => Ok(match e.token.kind {
                TokenKind::Number(bits) => Value::Number(f64::from_bits(bits)),
                TokenKind::Str(name) => Value::string(self.interner.lookup(name)),
                TokenKind::Nil => Value::Nil,
                TokenKind::True => Value::Bool(true),
                TokenKind::False => Value::Bool(false),
                other => unreachable!("non-literal token in literal node: {other:?}"),
            }),
            Expr::Identifier(e) => {
                let found = e
                    .distance
                    .get()
                    .and_then(|distance| self.env.get_at(distance, e.name));
                match found {
                    Some(value) => Ok(value),
                    None => {
                        let name = self.interner.lookup(e.name);
                        Err(self.augment(not_defined(name), e.token.pos))
                    }
                }
            }
            Expr::Assign(e) => {
                let value = self.eval_expr(&e.right)?;
                let distance = e.distance.get().unwrap_or(0);
                self.env.set_at(distance, e.name_id, value.clone());
                Ok(value)
            }
            Expr::Binary(e) => {
                let left = self.eval_expr(&e.left)?;
                let right = self.eval_expr(&e.right)?;
                let result = self.binary(e.op.kind, left, right);
                self.traced(result, &e.op)
            }
            Expr::And(e) => {
                let left = self.eval_expr(&e.left)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(&e.right)
            }
            Expr::Or(e) => {
                let left = self.eval_expr(&e.left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(&e.right)
            }
            Expr::Unary(e) => {
                let right = self.eval_expr(&e.right)?;
                let result = self.unary(e.op.kind, right);
                self.traced(result, &e.op)
            }
            Expr::Get(e) => {
                let object = self.eval_expr(&e.object)?;
                // A super marker substitutes its prototype for lookup;
                // binding still targets the live receiver.
                let (target, receiver) = self.unwrap_super(object);
                let fetched = self.get_slot(&target, e.name_id);
                let (value, _whence) = self.traced_pair(fetched, &e.name)?;
                if e.bound {
                    Ok(self.bind_value(value, receiver))
                } else {
                    Ok(value)
                }
            }
            Expr::Set(e) => {
                let value = self.eval_expr(&e.right)?;
                let object = self.eval_expr(&e.object)?;
                let (target, receiver) = self.unwrap_super(object);
                let stored = self.set_slot(&target, e.name_id, value.clone());
                if let Err(control) = stored {
                    return Err(self.augment(control, e.name.pos));
                }
                if e.bound {
                    Ok(self.bind_value(value, receiver))
                } else {
                    Ok(value)
                }
            }
            Expr::Method(e) => {
                let object = self.eval_expr(&e.object)?;
                // `this` inside the call is the original receiver, not
                // a prototype substituted by super.
                let (target, receiver) = self.unwrap_super(object);
                let fetched = self.get_slot(&target, e.name_id);
                let (callee, whence) = self.traced_pair(fetched, &e.name)?;
                let mut args = Vec::with_capacity(e.args.len());
                for arg in &e.args {
                    args.push(self.eval_expr(arg)?);
                }
                let result = self.call_value(callee, Some(receiver), Some(whence), &args);
                self.traced(result, &e.lparen)
            }
            Expr::Call(e) => {
                let callee = self.eval_expr(&e.callee)?;
                let mut args = Vec::with_capacity(e.args.len());
                for arg in &e.args {
                    args.push(self.eval_expr(arg)?);
                }
                let result = self.call_value(callee, None, None, &args);
                self.traced(result, &e.lparen)
            }
            Expr::Array(e) => {
                let mut items = Vec::with_capacity(e.elements.len());
                for element in &e.elements {
                    items.push(self.eval_expr(element)?);
                }
                Ok(Value::array(items))
            }
            Expr::Hash(e) => {
                let table = Rc::new(RefCell::new(HashTable::new(self.seed)));
                for (key_expr, value_expr) in &e.pairs {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    if let Err(control) = hash_table::insert(self, &table, key, value) {
                        return Err(self.augment(control, e.token.pos));
                    }
                }
                Ok(Value::Hash(table))
            }
            Expr::Function(e) => Ok(self.make_function(e)),
            Expr::Super(e) => {
                let whence = match &self.whence {
                    Some(whence) => whence.clone(),
                    None => return Err(self.augment(super_outside_method(), e.token.pos)),
                };
                match self.get_prototype(&whence) {
                    Some(proto) => Ok(Value::Super(Rc::new(proto))),
                    None => Err(self.augment(nil_prototype(), e.token.pos)),
                }
            }
        }
    }

    /// Close over the current environment and module filename.
    fn make_function(&mut self, node: &Rc<ast::FunctionLit>) -> Value {
        let display: Rc<str> = match node.name.get() {
            Some(name) => Rc::from(format!("[Function {}]", self.interner.lookup(name))),
            None => Rc::from("[Function]"),
        };
        Value::Function(Rc::new(FunctionValue {
            node: Rc::clone(node),
            closure: self.env.clone(),
            this: None,
            filename: self.current_filename(),
            slots: Rc::new(RefCell::new(Slots::default())),
            display,
        }))
    }

    /// Split a possibly-super-marked object into (lookup target,
    /// receiver for binding and `this`).
    fn unwrap_super(&self, object: Value) -> (Value, Value) {
        match object {
            Value::Super(proto) => ((*proto).clone(), self.this.clone()),
            other => (other.clone(), other),
        }
    }

    /// `traced` for the `(value, whence)` pair from slot lookup.
    fn traced_pair(
        &self,
        result: Result<(Value, Value), Control>,
        token: &toe_ir::Token,
    ) -> Result<(Value, Value), Control> {
        result.map_err(|control| self.augment(control, token.pos))
    }
}
