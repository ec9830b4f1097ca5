//! The tree-walking interpreter.
//!
//! `Interp` is the evaluation context: it owns the current environment
//! register, the `this` and `whence` registers, the call stack used
//! for traces, the hash-table seed, and the global prototype objects.
//! It is single-threaded by construction (`Rc` throughout).
//!
//! The two context registers deserve their names: `this` is the
//! receiver visible to method bodies; `whence` is the prototype level
//! where the currently executing function was *found*, and is read in
//! exactly one place: evaluating `super`. They are saved and restored
//! together on every call.
//!
//! Submodules:
//! - `eval`: statement/expression walking
//! - `call`: the function call protocol
//! - `object`: prototype lookup, slots, binding, `get_special`

mod call;
mod eval;
mod object;

use crate::builtins;
use crate::environment::EnvRef;
use crate::errors::{Control, EvalResult, RuntimeError, TraceFrame};
use crate::inspect;
use crate::print_handler::{PrintHandler, StdoutPrintHandler};
use crate::stack::{CallFrame, CallStack};
use crate::value::Value;
use std::rc::Rc;
use toe_ir::ast;
use toe_ir::{Name, Position, SharedInterner, Token, TokenKind};

/// The global prototype objects, bootstrapped at context creation.
/// `object` is the chain root; every other prototype hangs off it.
pub struct Protos {
    pub object: Value,
    pub function: Value,
    pub error: Value,
    pub boolean: Value,
    pub number: Value,
    pub string: Value,
    pub array: Value,
    pub hash: Value,
}

/// Pre-interned names for hot paths and protocol slots, so dispatch is
/// a `u32` compare instead of a string lookup.
pub(crate) struct Names {
    pub this_: Name,
    pub init: Name,
    pub hash: Name,
    pub reason: Name,
    pub inspect: Name,
    pub inspect_visit: Name,
    pub op_plus: Name,
    pub op_minus: Name,
    pub op_star: Name,
    pub op_slash: Name,
    pub op_eqeq: Name,
    pub op_bangeq: Name,
    pub op_less: Name,
    pub op_lesseq: Name,
    pub op_greater: Name,
    pub op_greatereq: Name,
}

impl Names {
    fn new(interner: &SharedInterner) -> Self {
        Names {
            this_: interner.intern("this"),
            init: interner.intern("init"),
            hash: interner.intern("hash"),
            reason: interner.intern("reason"),
            inspect: interner.intern("inspect"),
            inspect_visit: interner.intern("inspect_visit"),
            op_plus: interner.intern("+"),
            op_minus: interner.intern("-"),
            op_star: interner.intern("*"),
            op_slash: interner.intern("/"),
            op_eqeq: interner.intern("=="),
            op_bangeq: interner.intern("!="),
            op_less: interner.intern("<"),
            op_lesseq: interner.intern("<="),
            op_greater: interner.intern(">"),
            op_greatereq: interner.intern(">="),
        }
    }

    /// The slot name a binary operator dispatches through, for the
    /// user-override check.
    pub(crate) fn operator(&self, op: TokenKind) -> Option<Name> {
        Some(match op {
            TokenKind::Plus => self.op_plus,
            TokenKind::Minus => self.op_minus,
            TokenKind::Star => self.op_star,
            TokenKind::Slash => self.op_slash,
            TokenKind::EqEq => self.op_eqeq,
            TokenKind::BangEq => self.op_bangeq,
            TokenKind::Less => self.op_less,
            TokenKind::LessEq => self.op_lesseq,
            TokenKind::Greater => self.op_greater,
            TokenKind::GreaterEq => self.op_greatereq,
            _ => return None,
        })
    }
}

/// The interpreter context.
pub struct Interp {
    pub interner: SharedInterner,
    /// Current environment register.
    pub(crate) env: EnvRef,
    /// Receiver register; nil outside of method bodies.
    pub(crate) this: Value,
    /// Prototype level where the executing function was found.
    pub(crate) whence: Option<Value>,
    /// Call stack for trace rendering.
    pub(crate) stack: CallStack,
    /// Per-context hash seed; generated once, never rotated.
    pub(crate) seed: u64,
    pub protos: Protos,
    pub(crate) names: Names,
    /// Global bindings installed into every module frame.
    pub(crate) globals: Vec<(Name, Value)>,
    /// Destination for `puts`.
    pub(crate) print_handler: Rc<dyn PrintHandler>,
    /// Filename used for call-stack frames of builtin calls.
    pub(crate) builtin_filename: Rc<str>,
}

impl Interp {
    /// Create a context: bootstrap the prototype objects, intern the
    /// protocol names, install the builtins, and draw the hash seed.
    pub fn new(interner: SharedInterner) -> Self {
        let object = Value::object(None);
        let protos = Protos {
            function: Value::object(Some(object.clone())),
            error: Value::object(Some(object.clone())),
            boolean: Value::object(Some(object.clone())),
            number: Value::object(Some(object.clone())),
            string: Value::object(Some(object.clone())),
            array: Value::object(Some(object.clone())),
            hash: Value::object(Some(object.clone())),
            object,
        };
        let names = Names::new(&interner);
        let mut interp = Interp {
            interner,
            env: EnvRef::root(),
            this: Value::Nil,
            whence: None,
            stack: CallStack::new(),
            seed: rand::random::<u64>(),
            protos,
            names,
            globals: Vec::new(),
            print_handler: Rc::new(StdoutPrintHandler),
            builtin_filename: Rc::from("[builtin]"),
        };
        builtins::install(&mut interp);
        interp
    }

    /// Replace the `puts` destination (tests use a buffer).
    pub fn set_print_handler(&mut self, handler: Rc<dyn PrintHandler>) {
        self.print_handler = handler;
    }

    pub fn print_handler(&self) -> &Rc<dyn PrintHandler> {
        &self.print_handler
    }

    /// The per-context hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Evaluate a whole module: fresh module frame, globals installed,
    /// statements in order, first error short-circuits. Yields nil.
    pub fn eval_module(&mut self, module: &ast::Module) -> EvalResult {
        tracing::debug!(filename = %module.filename, "evaluating module");
        let saved_env = std::mem::replace(&mut self.env, EnvRef::root());
        self.install_globals();
        self.stack.push(CallFrame {
            filename: module.filename.clone(),
            context: Rc::from("[Module]"),
        });
        let mut result = Ok(Value::Nil);
        for stmt in &module.stmts {
            if let Err(control) = self.eval_stmt(stmt) {
                result = Err(control);
                break;
            }
        }
        self.stack.pop();
        self.env = saved_env;
        result.map(|_| Value::Nil)
    }

    /// Open a persistent module frame (REPL). Statements can then be
    /// fed one at a time through [`Interp::eval_stmt`].
    pub fn open_module(&mut self, filename: &str) {
        self.env = EnvRef::root();
        self.install_globals();
        self.stack.push(CallFrame {
            filename: Rc::from(filename),
            context: Rc::from("[Module]"),
        });
    }

    /// Copy the memoised global bindings into the current frame.
    fn install_globals(&mut self) {
        for (name, value) in &self.globals {
            self.env.define(*name, value.clone());
        }
    }

    /// Render a runtime error: reason first, then the trace from the
    /// outermost frame down to where the error was raised.
    pub fn render_error(&mut self, error: &RuntimeError) -> String {
        let reason = match inspect::inspect(self, &error.reason) {
            Ok(s) => s.to_string(),
            Err(_) => format!("{:?}", error.reason),
        };
        let mut out = format!("Error: {reason}");
        for frame in error.trace.iter().rev() {
            out.push_str(&format!(
                "\n  at {}:{}:{}: in {}",
                frame.filename, frame.pos.line, frame.pos.column, frame.context
            ));
        }
        out
    }

    /// Inspect-string of a value (REPL output).
    pub fn inspect_value(&mut self, value: &Value) -> Result<String, Control> {
        inspect::inspect(self, value).map(|s| s.to_string())
    }

    // Trace assembly

    /// Append a trace frame naming the current call-stack context and
    /// the given source position. Non-error signals pass through.
    pub(crate) fn augment(&self, control: Control, pos: Position) -> Control {
        match control {
            Control::Error(mut error) => {
                let current = self.stack.current();
                error.trace.push(TraceFrame {
                    filename: current.filename.clone(),
                    pos,
                    context: current.context.clone(),
                });
                Control::Error(error)
            }
            other => other,
        }
    }

    /// Attach a frame for errors produced inside builtins, which have
    /// no source position.
    pub(crate) fn augment_builtin(&self, control: Control) -> Control {
        self.augment(control, Position::NONE)
    }

    /// `augment` applied to a result, anchored on a token.
    pub(crate) fn traced(&self, result: EvalResult, token: &Token) -> EvalResult {
        result.map_err(|control| self.augment(control, token.pos))
    }

    /// Filename of the module currently executing.
    pub(crate) fn current_filename(&self) -> Rc<str> {
        self.stack.current().filename.clone()
    }

    // Operator adapter

    /// Binary dispatch: identity fast path, then the user slot
    /// override for object receivers, then the native table.
    pub fn binary(&mut self, op: TokenKind, left: Value, right: Value) -> EvalResult {
        if op == TokenKind::EqEq && Value::identical(&left, &right) {
            return Ok(Value::Bool(true));
        }
        if matches!(left, Value::Object(_)) {
            if let Some(name) = self.names.operator(op) {
                if let Some((slot, whence)) = self.find_slot(&left, name) {
                    return self.call_value(slot, Some(left), Some(whence), &[right]);
                }
            }
        }
        crate::operators::evaluate_binary(self, op, left, right)
    }

    /// Unary dispatch.
    pub fn unary(&mut self, op: TokenKind, right: Value) -> EvalResult {
        crate::operators::evaluate_unary(op, right)
    }
}
