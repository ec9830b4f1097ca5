//! Identifier resolution and syntactic validation for toe.
//!
//! The resolver walks the AST once and records, on every `Identifier`
//! and `Assign` node, the distance (in scope hops) from the use site to
//! the scope that defines the name. The evaluator then reaches the
//! binding with `ancestor(distance)` and never searches by name.
//!
//! It also enforces the purely syntactic rules the evaluator relies on:
//! `break`/`continue` only inside loops, `return`/`super` only inside
//! functions, no double-`let` of a name in one scope, and no reading a
//! variable inside its own initializer (except function self-reference,
//! which is what makes recursion work).
//!
//! Scope 0 is the module scope. It is pre-seeded with the global
//! builtin names so that module-level code resolves `Object`, `puts`
//! and friends at a stable distance. Inside a function body, a name
//! that is not statically visible resolves to the module scope: the
//! module may define it later, before the function is called.
//!
//! The resolver is stateful so a REPL can keep one alive across lines
//! (`resolve_stmt`), preserving the module scope.

use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;
use toe_ir::ast::{Block, Expr, FunctionLit, Module, Stmt};
use toe_ir::{Name, Position, SharedInterner, Token};

/// Stop resolving after this many errors.
pub const MAX_ERRORS: usize = 10;

/// A resolution error with its source location.
#[derive(Clone, Debug)]
pub struct ResolveError {
    pub filename: Rc<str>,
    pub pos: Position,
    pub message: String,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.filename, self.pos, self.message)
    }
}

impl std::error::Error for ResolveError {}

// Control context: whether we are inside a loop and/or a function.
// Two bits so save/restore is one copy.
const IN_LOOP: u8 = 1 << 0;
const IN_FUNC: u8 = 1 << 1;

/// One lexical scope: name → fully-initialized flag.
///
/// A name is present-but-false while its own initializer is being
/// resolved, which is how `let a = a;` is caught.
type Scope = FxHashMap<Name, bool>;

/// The resolver. Create one per module (or one per REPL session).
pub struct Resolver {
    filename: Rc<str>,
    interner: SharedInterner,
    scopes: Vec<Scope>,
    ctrl: u8,
    this_name: Name,
    pub errors: Vec<ResolveError>,
}

impl Resolver {
    /// Create a resolver whose module scope is pre-seeded with the
    /// standard global names (`toe_ir::builtins::GLOBALS`).
    pub fn new(filename: &str, interner: SharedInterner) -> Self {
        let mut module_scope = Scope::default();
        for name in toe_ir::builtins::GLOBALS {
            module_scope.insert(interner.intern(name), true);
        }
        let this_name = interner.intern("this");
        Resolver {
            filename: Rc::from(filename),
            interner,
            scopes: vec![module_scope],
            ctrl: 0,
            this_name,
            errors: Vec::new(),
        }
    }

    /// Resolve a whole module. Distances are stamped in place.
    pub fn resolve(&mut self, module: &Module) {
        for stmt in &module.stmts {
            self.resolve_stmt(stmt);
            if self.errors.len() >= MAX_ERRORS {
                break;
            }
        }
    }

    /// Resolve a single statement (REPL entry point).
    pub fn resolve_stmt(&mut self, stmt: &Stmt) {
        self.stmt(stmt);
    }

    /// True when no errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the accumulated errors, clearing them (for REPL reuse).
    pub fn take_errors(&mut self) -> Vec<ResolveError> {
        std::mem::take(&mut self.errors)
    }

    fn err(&mut self, token: &Token, message: impl Into<String>) {
        self.errors.push(ResolveError {
            filename: self.filename.clone(),
            pos: token.pos,
            message: message.into(),
        });
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn current(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack never empty")
    }

    // Statements

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(s) => {
                if self.current().contains_key(&s.name_id) {
                    self.err(&s.name, "already a variable with this name in scope");
                }
                self.current().insert(s.name_id, false);
                self.expr(&s.value);
                self.current().insert(s.name_id, true);
                stamp_function_name(&s.value, s.name_id);
            }
            Stmt::Block(b) => self.block(b),
            Stmt::If(s) => {
                self.expr(&s.cond);
                self.stmt(&s.then);
                if let Some(otherwise) = &s.otherwise {
                    self.stmt(otherwise);
                }
            }
            Stmt::While(s) => {
                self.expr(&s.cond);
                let ctrl = self.ctrl;
                self.ctrl |= IN_LOOP;
                self.stmt(&s.body);
                self.ctrl = ctrl;
            }
            Stmt::For(s) => {
                self.expr(&s.iter);
                self.push_scope();
                let ctrl = self.ctrl;
                self.ctrl |= IN_LOOP;
                self.current().insert(s.name_id, true);
                self.stmt(&s.body);
                self.ctrl = ctrl;
                self.pop_scope();
            }
            Stmt::Return(s) => {
                if self.ctrl & IN_FUNC == 0 {
                    self.err(&s.token, "return outside of function");
                }
                if let Some(expr) = &s.expr {
                    self.expr(expr);
                }
            }
            Stmt::Break(token) => {
                if self.ctrl & IN_LOOP == 0 {
                    self.err(token, "break outside of loop");
                }
            }
            Stmt::Continue(token) => {
                if self.ctrl & IN_LOOP == 0 {
                    self.err(token, "continue outside of loop");
                }
            }
            Stmt::Expr(s) => self.expr(&s.expr),
        }
    }

    fn block(&mut self, block: &Block) {
        self.push_scope();
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.pop_scope();
    }

    // Expressions

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Binary(e) => {
                self.expr(&e.left);
                self.expr(&e.right);
            }
            Expr::And(e) | Expr::Or(e) => {
                self.expr(&e.left);
                self.expr(&e.right);
            }
            Expr::Assign(e) => {
                self.expr(&e.right);
                stamp_function_name(&e.right, e.name_id);
                if let Some(distance) = self.lookup(&e.name, e.name_id) {
                    e.distance.set(Some(distance));
                }
            }
            Expr::Unary(e) => self.expr(&e.right),
            Expr::Get(e) => self.expr(&e.object),
            Expr::Set(e) => {
                self.expr(&e.right);
                stamp_function_name(&e.right, e.name_id);
                self.expr(&e.object);
            }
            Expr::Method(e) => {
                self.expr(&e.object);
                for arg in &e.args {
                    self.expr(arg);
                }
            }
            Expr::Call(e) => {
                self.expr(&e.callee);
                for arg in &e.args {
                    self.expr(arg);
                }
            }
            Expr::Identifier(e) => {
                if let Some(distance) = self.lookup(&e.token, e.name) {
                    e.distance.set(Some(distance));
                }
            }
            Expr::Literal(_) => {}
            Expr::Array(e) => {
                for elem in &e.elements {
                    self.expr(elem);
                }
            }
            Expr::Hash(e) => {
                for (k, v) in &e.pairs {
                    self.expr(k);
                    self.expr(v);
                }
            }
            Expr::Function(e) => self.function(e),
            Expr::Super(e) => {
                if self.ctrl & IN_FUNC == 0 {
                    self.err(&e.token, "super outside of function");
                }
            }
        }
    }

    fn function(&mut self, func: &Rc<FunctionLit>) {
        let ctrl = self.ctrl;
        // A fresh function body: loops outside it do not admit `break`.
        self.ctrl = IN_FUNC;
        // One scope for `this` and the parameters, mirroring the frame
        // the call protocol pushes; the body block adds its own.
        self.push_scope();
        let this_name = self.this_name;
        self.current().insert(this_name, true);
        for (_, name) in &func.params {
            self.current().insert(*name, true);
        }
        self.block(&func.body);
        self.pop_scope();
        self.ctrl = ctrl;
    }

    /// Find `name`, stamping errors for uninitialized reads. Returns
    /// the distance, or `None` when an error was recorded.
    fn lookup(&mut self, token: &Token, name: Name) -> Option<u32> {
        let curr = self.scopes.len() - 1;
        for i in (0..=curr).rev() {
            if let Some(&initialized) = self.scopes[i].get(&name) {
                // Reading a variable inside its own initializer is an
                // error, unless we are in a function or the binding is
                // in an enclosing scope (function self-reference).
                if !initialized && self.ctrl & IN_FUNC == 0 && i == curr {
                    let text = self.interner.lookup(name);
                    self.err(
                        token,
                        format!("cannot access {text:?} before initialization"),
                    );
                    return None;
                }
                return Some(u32::try_from(curr - i).unwrap_or(u32::MAX));
            }
        }
        if self.ctrl & IN_FUNC != 0 {
            // Inside a function, fall back to the module scope: the
            // module may define the name before the call happens.
            return Some(u32::try_from(curr).unwrap_or(u32::MAX));
        }
        let text = self.interner.lookup(name);
        self.err(token, format!("undefined variable {text:?}"));
        None
    }
}

/// Give anonymous function literals the name of the binding they are
/// assigned to, for display in stack traces.
fn stamp_function_name(expr: &Expr, name: Name) {
    if let Expr::Function(func) = expr {
        if func.name.get().is_none() {
            func.name.set(Some(name));
        }
    }
}

#[cfg(test)]
mod tests;
