//! AST nodes produced by the parser.
//!
//! Every node keeps its originating token so later phases can point
//! diagnostics at real source positions. `Identifier` and `Assign`
//! carry a scope distance stamped by the resolver (`Cell<Option<u32>>`,
//! `None` until resolution). `Function` nodes are `Rc`-shared because
//! closure values hold onto them at runtime.
//!
//! `pretty()` renders a parenthesized form used by the `toec parse`
//! command and the parser tests.

use crate::{Name, StringInterner, Token, TokenKind};
use std::cell::Cell;
use std::rc::Rc;

/// A parsed module: one source file (or one REPL line).
#[derive(Debug)]
pub struct Module {
    pub filename: Rc<str>,
    pub stmts: Vec<Stmt>,
}

// Statements

#[derive(Debug)]
pub enum Stmt {
    Let(Let),
    Block(Block),
    If(If),
    While(While),
    For(For),
    Return(Return),
    Break(Token),
    Continue(Token),
    Expr(ExprStmt),
}

/// `let name = value;`
#[derive(Debug)]
pub struct Let {
    pub token: Token,
    pub name: Token,
    pub name_id: Name,
    pub value: Expr,
}

/// `{ ... }`
#[derive(Debug)]
pub struct Block {
    pub token: Token,
    pub stmts: Vec<Stmt>,
}

/// `if (cond) then else otherwise`
#[derive(Debug)]
pub struct If {
    pub token: Token,
    pub cond: Expr,
    pub then: Box<Stmt>,
    pub otherwise: Option<Box<Stmt>>,
}

/// `while (cond) body`
#[derive(Debug)]
pub struct While {
    pub token: Token,
    pub cond: Expr,
    pub body: Box<Stmt>,
}

/// `for (name : iter) body`
#[derive(Debug)]
pub struct For {
    pub token: Token,
    pub name: Token,
    pub name_id: Name,
    pub iter: Expr,
    pub body: Box<Stmt>,
}

/// `return expr?;`
#[derive(Debug)]
pub struct Return {
    pub token: Token,
    pub expr: Option<Expr>,
}

/// An expression in statement position.
#[derive(Debug)]
pub struct ExprStmt {
    pub expr: Expr,
}

// Expressions

#[derive(Debug)]
pub enum Expr {
    Binary(Box<Binary>),
    And(Box<Logical>),
    Or(Box<Logical>),
    Assign(Box<Assign>),
    Unary(Box<Unary>),
    Get(Box<Get>),
    Set(Box<Set>),
    Method(Box<Method>),
    Call(Box<Call>),
    Identifier(Identifier),
    Literal(Literal),
    Array(Box<ArrayLit>),
    Hash(Box<HashLit>),
    Function(Rc<FunctionLit>),
    Super(Super),
}

/// `left op right` for arithmetic/comparison/equality operators.
#[derive(Debug)]
pub struct Binary {
    pub op: Token,
    pub left: Expr,
    pub right: Expr,
}

/// `left && right` / `left || right` (short-circuiting).
#[derive(Debug)]
pub struct Logical {
    pub op: Token,
    pub left: Expr,
    pub right: Expr,
}

/// `name = right` where `name` is a resolved variable.
#[derive(Debug)]
pub struct Assign {
    pub name: Token,
    pub name_id: Name,
    pub distance: Cell<Option<u32>>,
    pub right: Expr,
}

/// `!right` / `-right`.
#[derive(Debug)]
pub struct Unary {
    pub op: Token,
    pub right: Expr,
}

/// `object.name` (bound) or `object->name` (unbound).
#[derive(Debug)]
pub struct Get {
    pub object: Expr,
    pub name: Token,
    pub name_id: Name,
    pub bound: bool,
}

/// `object.name = right` (bound) or `object->name = right` (unbound).
#[derive(Debug)]
pub struct Set {
    pub object: Expr,
    pub name: Token,
    pub name_id: Name,
    pub bound: bool,
    pub right: Expr,
}

/// `object.name(args...)`: slot fetch plus call, with the receiver
/// threaded through as `this`.
#[derive(Debug)]
pub struct Method {
    pub object: Expr,
    pub name: Token,
    pub name_id: Name,
    pub lparen: Token,
    pub args: Vec<Expr>,
}

/// `callee(args...)`.
#[derive(Debug)]
pub struct Call {
    pub callee: Expr,
    pub lparen: Token,
    pub args: Vec<Expr>,
}

/// A variable reference, including `this`.
#[derive(Debug)]
pub struct Identifier {
    pub token: Token,
    pub name: Name,
    pub distance: Cell<Option<u32>>,
}

/// A literal token: number, string, `nil`, `true`, `false`.
#[derive(Debug)]
pub struct Literal {
    pub token: Token,
}

/// `[a, b, c]`.
#[derive(Debug)]
pub struct ArrayLit {
    pub token: Token,
    pub elements: Vec<Expr>,
}

/// `{k: v, ...}` in expression position.
#[derive(Debug)]
pub struct HashLit {
    pub token: Token,
    pub pairs: Vec<(Expr, Expr)>,
}

/// `fn (params) { body }`.
///
/// The display name is stamped by the resolver when the literal is the
/// right-hand side of a `let`, assignment, or slot set.
#[derive(Debug)]
pub struct FunctionLit {
    pub token: Token,
    pub name: Cell<Option<Name>>,
    pub params: Vec<(Token, Name)>,
    pub body: Block,
}

/// The `super` keyword.
#[derive(Debug)]
pub struct Super {
    pub token: Token,
}

impl Expr {
    /// The token diagnostics should anchor on for this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Binary(e) => &e.op,
            Expr::And(e) | Expr::Or(e) => &e.op,
            Expr::Assign(e) => &e.name,
            Expr::Unary(e) => &e.op,
            Expr::Get(e) => &e.name,
            Expr::Set(e) => &e.name,
            Expr::Method(e) => &e.name,
            Expr::Call(e) => &e.lparen,
            Expr::Identifier(e) => &e.token,
            Expr::Literal(e) => &e.token,
            Expr::Array(e) => &e.token,
            Expr::Hash(e) => &e.token,
            Expr::Function(e) => &e.token,
            Expr::Super(e) => &e.token,
        }
    }
}

// Printing
//
// The parenthesized form keeps parser tests independent of struct
// layout: `let x = 1 + 2;` prints as `(let x (+ 1 2))`. Rendering
// needs the interner that produced the names, so this is a method
// rather than `Display`.

impl Module {
    /// Render the module in parenthesized form, one statement per line.
    pub fn pretty(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        for (i, stmt) in self.stmts.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            stmt.pretty_into(interner, &mut out);
        }
        out
    }
}

impl Stmt {
    /// Render a single statement in parenthesized form.
    pub fn pretty(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.pretty_into(interner, &mut out);
        out
    }

    fn pretty_into(&self, it: &StringInterner, out: &mut String) {
        match self {
            Stmt::Let(s) => {
                out.push_str("(let ");
                out.push_str(it.lookup(s.name_id));
                out.push(' ');
                s.value.pretty_into(it, out);
                out.push(')');
            }
            Stmt::Block(b) => block_into(b, it, out),
            Stmt::If(s) => {
                out.push_str("(if ");
                s.cond.pretty_into(it, out);
                out.push(' ');
                s.then.pretty_into(it, out);
                if let Some(otherwise) = &s.otherwise {
                    out.push(' ');
                    otherwise.pretty_into(it, out);
                }
                out.push(')');
            }
            Stmt::While(s) => {
                out.push_str("(while ");
                s.cond.pretty_into(it, out);
                out.push(' ');
                s.body.pretty_into(it, out);
                out.push(')');
            }
            Stmt::For(s) => {
                out.push_str("(for ");
                out.push_str(it.lookup(s.name_id));
                out.push(' ');
                s.iter.pretty_into(it, out);
                out.push(' ');
                s.body.pretty_into(it, out);
                out.push(')');
            }
            Stmt::Return(s) => match &s.expr {
                Some(expr) => {
                    out.push_str("(return ");
                    expr.pretty_into(it, out);
                    out.push(')');
                }
                None => out.push_str("(return)"),
            },
            Stmt::Break(_) => out.push_str("(break)"),
            Stmt::Continue(_) => out.push_str("(continue)"),
            Stmt::Expr(s) => s.expr.pretty_into(it, out),
        }
    }
}

fn block_into(b: &Block, it: &StringInterner, out: &mut String) {
    out.push_str("(block");
    for stmt in &b.stmts {
        out.push(' ');
        stmt.pretty_into(it, out);
    }
    out.push(')');
}

impl Expr {
    /// Render a single expression in parenthesized form.
    pub fn pretty(&self, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.pretty_into(interner, &mut out);
        out
    }

    fn pretty_into(&self, it: &StringInterner, out: &mut String) {
        use std::fmt::Write as _;
        match self {
            Expr::Binary(e) => {
                let _ = write!(out, "({} ", e.op.kind);
                e.left.pretty_into(it, out);
                out.push(' ');
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::And(e) => {
                out.push_str("(&& ");
                e.left.pretty_into(it, out);
                out.push(' ');
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::Or(e) => {
                out.push_str("(|| ");
                e.left.pretty_into(it, out);
                out.push(' ');
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::Assign(e) => {
                out.push_str("(= ");
                out.push_str(it.lookup(e.name_id));
                out.push(' ');
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::Unary(e) => {
                let _ = write!(out, "({} ", e.op.kind);
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::Get(e) => {
                out.push_str(if e.bound { "(. " } else { "(-> " });
                e.object.pretty_into(it, out);
                out.push(' ');
                out.push_str(it.lookup(e.name_id));
                out.push(')');
            }
            Expr::Set(e) => {
                out.push_str(if e.bound { "(set. " } else { "(set-> " });
                e.object.pretty_into(it, out);
                out.push(' ');
                out.push_str(it.lookup(e.name_id));
                out.push(' ');
                e.right.pretty_into(it, out);
                out.push(')');
            }
            Expr::Method(e) => {
                out.push_str("(method ");
                e.object.pretty_into(it, out);
                out.push(' ');
                out.push_str(it.lookup(e.name_id));
                for arg in &e.args {
                    out.push(' ');
                    arg.pretty_into(it, out);
                }
                out.push(')');
            }
            Expr::Call(e) => {
                out.push_str("(call ");
                e.callee.pretty_into(it, out);
                for arg in &e.args {
                    out.push(' ');
                    arg.pretty_into(it, out);
                }
                out.push(')');
            }
            Expr::Identifier(e) => out.push_str(it.lookup(e.name)),
            Expr::Literal(e) => match e.token.kind {
                TokenKind::Number(bits) => {
                    let _ = write!(out, "{}", f64::from_bits(bits));
                }
                TokenKind::Str(name) => {
                    let _ = write!(out, "{:?}", it.lookup(name));
                }
                other => out.push_str(other.lexeme()),
            },
            Expr::Array(e) => {
                out.push_str("(array");
                for elem in &e.elements {
                    out.push(' ');
                    elem.pretty_into(it, out);
                }
                out.push(')');
            }
            Expr::Hash(e) => {
                out.push_str("(hash");
                for (k, v) in &e.pairs {
                    out.push_str(" (");
                    k.pretty_into(it, out);
                    out.push(' ');
                    v.pretty_into(it, out);
                    out.push(')');
                }
                out.push(')');
            }
            Expr::Function(e) => {
                out.push_str("(fn (");
                for (i, (_, name)) in e.params.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(it.lookup(*name));
                }
                out.push_str(") ");
                block_into(&e.body, it, out);
                out.push(')');
            }
            Expr::Super(_) => out.push_str("super"),
        }
    }
}


