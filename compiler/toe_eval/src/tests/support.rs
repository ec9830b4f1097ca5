use crate::errors::{Control, EvalResult};
use crate::interpreter::Interp;
use crate::print_handler::{BufferPrintHandler, PrintHandler};
use crate::value::Value;
use std::rc::Rc;
use toe_ir::SharedInterner;
use toe_resolve::Resolver;

/// A REPL-shaped harness: one persistent module frame, resolver and
/// context, fed source snippets one at a time.
pub(crate) struct Runner {
    pub interp: Interp,
    interner: SharedInterner,
    resolver: Resolver,
    buffer: Rc<BufferPrintHandler>,
}

impl Runner {
    pub fn new() -> Self {
        let interner = SharedInterner::new();
        let resolver = Resolver::new("<test>", interner.clone());
        let mut interp = Interp::new(interner.clone());
        let buffer = Rc::new(BufferPrintHandler::new());
        interp.set_print_handler(buffer.clone());
        interp.open_module("<test>");
        Runner {
            interp,
            interner,
            resolver,
            buffer,
        }
    }

    /// Evaluate a snippet; the result is the last statement's value.
    /// Frontend errors panic: these tests exercise the evaluator.
    pub fn eval(&mut self, source: &str) -> EvalResult {
        let lexed = toe_lexer::lex("<test>", source, &self.interner);
        assert!(lexed.is_ok(), "lex errors: {:?}", lexed.errors);
        let parsed = toe_parse::parse("<test>", lexed.tokens, &self.interner);
        assert!(parsed.is_ok(), "parse errors: {:?}", parsed.errors);
        for stmt in &parsed.module.stmts {
            self.resolver.resolve_stmt(stmt);
        }
        assert!(
            self.resolver.is_ok(),
            "resolve errors: {:?}",
            self.resolver.errors
        );
        let mut last = Ok(Value::Nil);
        for stmt in &parsed.module.stmts {
            match self.interp.eval_stmt(stmt) {
                Ok(value) => last = Ok(value),
                Err(control) => return Err(control),
            }
        }
        last
    }

    /// Evaluate and render: the inspect-string of the value, or the
    /// rendered error ("Error: ..." with trace).
    pub fn show(&mut self, source: &str) -> String {
        match self.eval(source) {
            Ok(value) => self
                .interp
                .inspect_value(&value)
                .unwrap_or_else(|_| "<inspect failed>".to_string()),
            Err(Control::Error(error)) => self.interp.render_error(&error),
            Err(other) => panic!("unconsumed control signal: {other:?}"),
        }
    }

    /// Evaluate expecting an error; returns the raw reason string
    /// (or the debug form for non-string reasons).
    pub fn fail(&mut self, source: &str) -> String {
        match self.eval(source) {
            Err(Control::Error(error)) => match &error.reason {
                Value::Str(s) => s.to_string(),
                other => format!("{other:?}"),
            },
            Ok(value) => panic!("expected an error, got {value:?}"),
            Err(other) => panic!("expected an error, got {other:?}"),
        }
    }

    /// Evaluate expecting an error; returns the full runtime error.
    pub fn fail_full(&mut self, source: &str) -> crate::errors::RuntimeError {
        match self.eval(source) {
            Err(Control::Error(error)) => error,
            other => panic!("expected an error, got {other:?}"),
        }
    }

    /// Everything `puts` wrote so far.
    pub fn output(&self) -> String {
        self.buffer.output()
    }
}

/// One-shot convenience: evaluate and show.
pub(crate) fn show(source: &str) -> String {
    Runner::new().show(source)
}

/// One-shot convenience: evaluate expecting an error reason.
pub(crate) fn fail(source: &str) -> String {
    Runner::new().fail(source)
}
