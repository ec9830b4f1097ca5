//! The function call protocol.
//!
//! User calls swap in the callee's closure, push one frame for `this`
//! and the parameters, and evaluate the body as a block (which pushes
//! its own frame, matching the resolver's two scopes). The `env`,
//! `this` and `whence` registers are saved across the call and
//! restored on every exit path, as is the call-stack frame.
//!
//! Builtin calls skip the environment machinery entirely and hand
//! `(interp, this, args)` to the host callable.

use super::Interp;
use crate::environment::EnvRef;
use crate::errors::{not_a_function, Control, EvalResult};
use crate::stack::CallFrame;
use crate::value::{BuiltinValue, FunctionValue, Value};
use std::rc::Rc;

impl Interp {
    /// Dispatch a call. `receiver` is the `this` supplied by method
    /// syntax (a bound callee wins over it); `whence` is the prototype
    /// level the callee was fetched from, made visible to `super`
    /// inside the body.
    pub fn call_value(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        whence: Option<Value>,
        args: &[Value],
    ) -> EvalResult {
        match callee {
            Value::Function(func) => self.call_function(&func, receiver, whence, args),
            Value::Builtin(builtin) => self.call_builtin(&builtin, receiver, args),
            _ => Err(not_a_function()),
        }
    }

    fn call_function(
        &mut self,
        func: &Rc<FunctionValue>,
        receiver: Option<Value>,
        whence: Option<Value>,
        args: &[Value],
    ) -> EvalResult {
        tracing::trace!(
            function = %func.display,
            argc = args.len(),
            depth = self.stack.depth(),
            "call"
        );
        let this = func
            .this
            .clone()
            .or(receiver)
            .unwrap_or(Value::Nil);

        // Save the three context registers; restored below on every
        // exit path.
        let saved_env = std::mem::replace(&mut self.env, EnvRef::push(&func.closure));
        let saved_this = std::mem::replace(&mut self.this, this.clone());
        let saved_whence = std::mem::replace(&mut self.whence, whence);
        self.stack.push(CallFrame {
            filename: func.filename.clone(),
            context: func.display.clone(),
        });

        self.env.define(self.names.this_, this);
        for (i, (_, param)) in func.node.params.iter().enumerate() {
            // Missing arguments default to nil; extras are ignored.
            let value = args.get(i).cloned().unwrap_or(Value::Nil);
            self.env.define(*param, value);
        }

        let result = self.eval_block(&func.node.body);
        // A Return unwraps exactly once, here at the boundary that
        // produced it. Errors keep propagating. Break/Continue cannot
        // escape a body (the resolver rejects them statically).
        let result = match result {
            Err(Control::Return(value)) => Ok(value),
            other => other,
        };

        self.stack.pop();
        self.whence = saved_whence;
        self.this = saved_this;
        self.env = saved_env;
        result
    }

    fn call_builtin(
        &mut self,
        builtin: &Rc<BuiltinValue>,
        receiver: Option<Value>,
        args: &[Value],
    ) -> EvalResult {
        let this = builtin
            .this
            .clone()
            .or(receiver)
            .unwrap_or(Value::Nil);
        self.stack.push(CallFrame {
            filename: self.builtin_filename.clone(),
            context: builtin.display.clone(),
        });
        let func = Rc::clone(&builtin.func);
        let result = (func.as_ref())(self, this, args);
        self.stack.pop();
        result
    }
}
