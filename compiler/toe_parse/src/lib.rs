//! Pratt parser for toe.
//!
//! Consumes the token list from `toe_lexer` and produces a
//! [`toe_ir::ast::Module`] plus a list of parse errors. The parser never
//! panics on malformed input: each error is recorded and the cursor
//! synchronizes to the next statement boundary, so one mistake does not
//! hide the rest of the file.
//!
//! # Grammar
//!
//! ```text
//! declaration → letStmt | statement
//! statement   → for | while | if | block | break | continue | return | exprStmt
//! letStmt     → "let" IDENT "=" expression ";"
//! for         → "for" "(" IDENT ":" expression ")" statement
//! while       → "while" "(" expression ")" statement
//! if          → "if" "(" expression ")" statement ("else" statement)?
//! block       → "{" declaration* "}"
//! return      → "return" expression? ";"
//! exprStmt    → expression ";"
//! ```
//!
//! Expressions are parsed by precedence climbing; see [`Prec`]. The
//! postfix chain at call level covers `(args)`, `.name`, `->name` and
//! `.name(args)` (method dispatch with the receiver as `this`).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use toe_ir::ast::{
    ArrayLit, Assign, Binary, Block, Call, Expr, ExprStmt, For, FunctionLit, Get, HashLit,
    Identifier, If, Let, Literal, Logical, Method, Module, Return, Set, Stmt, Super, Unary, While,
};
use toe_ir::{Name, Position, StringInterner, Token, TokenKind};

/// Stop parsing after this many errors.
pub const MAX_ERRORS: usize = 10;

/// A parse error with its source location.
#[derive(Clone, Debug)]
pub struct ParseError {
    pub filename: Rc<str>,
    pub pos: Position,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.filename, self.pos, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Output of a parse run. `module` contains every statement that parsed
/// cleanly even when `errors` is non-empty.
#[derive(Debug)]
pub struct ParseOutput {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    /// True when parsing produced no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Binding strength, lowest to highest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Lowest,
    Assign,     // =
    Or,         // ||
    And,        // &&
    Equality,   // == !=
    Comparison, // < <= > >=
    Sum,        // + -
    Product,    // * /
    Unary,      // ! -
    Call,       // () . ->
}

type PResult<T> = Result<T, ParseError>;

/// Parse a token list into a module.
pub fn parse(filename: &str, tokens: Vec<Token>, interner: &StringInterner) -> ParseOutput {
    Parser::new(filename, tokens, interner).run()
}

struct Parser<'a> {
    filename: Rc<str>,
    tokens: Vec<Token>,
    curr: usize,
    errors: Vec<ParseError>,
    interner: &'a StringInterner,
    /// Pre-interned "this" for the `this` keyword token.
    this_name: Name,
}

impl<'a> Parser<'a> {
    fn new(filename: &str, tokens: Vec<Token>, interner: &'a StringInterner) -> Self {
        Parser {
            filename: Rc::from(filename),
            tokens,
            curr: 0,
            errors: Vec::new(),
            interner,
            this_name: interner.intern("this"),
        }
    }

    fn run(mut self) -> ParseOutput {
        let mut stmts = Vec::new();
        while !self.is_at_end() && self.errors.len() < MAX_ERRORS {
            match self.declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }
        ParseOutput {
            module: Module {
                filename: self.filename,
                stmts,
            },
            errors: self.errors,
        }
    }

    // Cursor helpers

    fn peek(&self) -> &Token {
        &self.tokens[self.curr]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.curr - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn consume(&mut self) -> Token {
        if !self.is_at_end() {
            self.curr += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.consume();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> PResult<Token> {
        if self.check(kind) {
            return Ok(self.consume());
        }
        Err(self.error_at(self.peek().pos, message))
    }

    fn expect_ident(&mut self, message: &str) -> PResult<(Token, Name)> {
        if let TokenKind::Ident(name) = self.peek().kind {
            let token = self.consume();
            return Ok((token, name));
        }
        Err(self.error_at(self.peek().pos, message))
    }

    fn error_at(&self, pos: Position, message: &str) -> ParseError {
        ParseError {
            filename: self.filename.clone(),
            pos,
            message: message.to_string(),
        }
    }

    /// Skip to the next statement boundary after an error.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous_is_semicolon() {
                return;
            }
            match self.peek().kind {
                TokenKind::Let
                | TokenKind::For
                | TokenKind::While
                | TokenKind::If
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::LBrace => return,
                _ => {
                    self.consume();
                }
            }
        }
    }

    fn previous_is_semicolon(&self) -> bool {
        self.curr > 0 && self.previous().kind == TokenKind::Semicolon
    }

    // Statements

    fn declaration(&mut self) -> PResult<Stmt> {
        if self.check(TokenKind::Let) {
            return self.let_stmt();
        }
        self.statement()
    }

    fn statement(&mut self) -> PResult<Stmt> {
        match self.peek().kind {
            TokenKind::For => self.for_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::If => self.if_stmt(),
            TokenKind::LBrace => self.block_stmt().map(Stmt::Block),
            TokenKind::Break => self.break_stmt(),
            TokenKind::Continue => self.continue_stmt(),
            TokenKind::Return => self.return_stmt(),
            _ => self.expr_stmt(),
        }
    }

    fn let_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        let (name, name_id) = self.expect_ident("expected an identifier after let")?;
        self.expect(TokenKind::Eq, "expected = after variable name")?;
        let value = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ; after variable declaration")?;
        Ok(Stmt::Let(Let {
            token,
            name,
            name_id,
            value,
        }))
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        self.expect(TokenKind::LParen, "expected ( after for")?;
        let (name, name_id) = self.expect_ident("expected a loop variable")?;
        self.expect(TokenKind::Colon, "expected : after loop variable")?;
        let iter = self.expression()?;
        self.expect(TokenKind::RParen, "unclosed (")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::For(For {
            token,
            name,
            name_id,
            iter,
            body,
        }))
    }

    fn while_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        self.expect(TokenKind::LParen, "expected ( after while")?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen, "unclosed (")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While(While { token, cond, body }))
    }

    fn if_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        self.expect(TokenKind::LParen, "expected ( after if")?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen, "unclosed (")?;
        let then = Box::new(self.statement()?);
        let otherwise = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If(If {
            token,
            cond,
            then,
            otherwise,
        }))
    }

    fn block_stmt(&mut self) -> PResult<Block> {
        let token = self.consume();
        let mut stmts = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::RBrace) {
            stmts.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "unmatched {")?;
        Ok(Block { token, stmts })
    }

    fn break_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        self.expect(TokenKind::Semicolon, "expected ; after break")?;
        Ok(Stmt::Break(token))
    }

    fn continue_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        self.expect(TokenKind::Semicolon, "expected ; after continue")?;
        Ok(Stmt::Continue(token))
    }

    fn return_stmt(&mut self) -> PResult<Stmt> {
        let token = self.consume();
        let expr = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "expected ; after return")?;
        Ok(Stmt::Return(Return { token, expr }))
    }

    fn expr_stmt(&mut self) -> PResult<Stmt> {
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ; after expression statement")?;
        Ok(Stmt::Expr(ExprStmt { expr }))
    }

    // Expressions

    fn expression(&mut self) -> PResult<Expr> {
        self.precedence(Prec::Lowest)
    }

    fn precedence(&mut self, prec: Prec) -> PResult<Expr> {
        let mut expr = self.prefix()?;
        while !self.check(TokenKind::Semicolon) && prec < self.peek_precedence() {
            expr = self.infix(expr)?;
        }
        Ok(expr)
    }

    fn peek_precedence(&self) -> Prec {
        match self.peek().kind {
            TokenKind::Eq => Prec::Assign,
            TokenKind::OrOr => Prec::Or,
            TokenKind::AndAnd => Prec::And,
            TokenKind::EqEq | TokenKind::BangEq => Prec::Equality,
            TokenKind::Less | TokenKind::LessEq | TokenKind::Greater | TokenKind::GreaterEq => {
                Prec::Comparison
            }
            TokenKind::Plus | TokenKind::Minus => Prec::Sum,
            TokenKind::Star | TokenKind::Slash => Prec::Product,
            TokenKind::LParen | TokenKind::Dot | TokenKind::Arrow => Prec::Call,
            _ => Prec::Lowest,
        }
    }

    fn prefix(&mut self) -> PResult<Expr> {
        match self.peek().kind {
            TokenKind::Number(_)
            | TokenKind::Str(_)
            | TokenKind::Nil
            | TokenKind::True
            | TokenKind::False => {
                let token = self.consume();
                Ok(Expr::Literal(Literal { token }))
            }
            TokenKind::Ident(name) => {
                let token = self.consume();
                Ok(Expr::Identifier(Identifier {
                    token,
                    name,
                    distance: Cell::new(None),
                }))
            }
            TokenKind::This => {
                let token = self.consume();
                Ok(Expr::Identifier(Identifier {
                    token,
                    name: self.this_name,
                    distance: Cell::new(None),
                }))
            }
            TokenKind::Super => {
                let token = self.consume();
                Ok(Expr::Super(Super { token }))
            }
            TokenKind::Bang | TokenKind::Minus => {
                let op = self.consume();
                let right = self.precedence(Prec::Product)?;
                Ok(Expr::Unary(Box::new(Unary { op, right })))
            }
            TokenKind::LParen => {
                self.consume();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "unmatched (")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.array_literal(),
            TokenKind::LBrace => self.hash_literal(),
            TokenKind::Fn => self.function_literal(),
            _ => {
                let pos = self.peek().pos;
                let message = format!("not an expression: {}", self.peek().kind);
                Err(self.error_at(pos, &message))
            }
        }
    }

    fn infix(&mut self, left: Expr) -> PResult<Expr> {
        match self.peek().kind {
            TokenKind::Eq => self.assign(left),
            TokenKind::AndAnd => {
                let op = self.consume();
                let right = self.precedence(Prec::And)?;
                Ok(Expr::And(Box::new(Logical { op, left, right })))
            }
            TokenKind::OrOr => {
                let op = self.consume();
                let right = self.precedence(Prec::Or)?;
                Ok(Expr::Or(Box::new(Logical { op, left, right })))
            }
            TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Less
            | TokenKind::LessEq
            | TokenKind::Greater
            | TokenKind::GreaterEq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash => {
                let prec = self.peek_precedence();
                let op = self.consume();
                let right = self.precedence(prec)?;
                Ok(Expr::Binary(Box::new(Binary { op, left, right })))
            }
            TokenKind::Dot => self.get_or_method(left, true),
            TokenKind::Arrow => self.get_or_method(left, false),
            TokenKind::LParen => self.call(left),
            _ => {
                // peek_precedence() said this token binds, so every kind
                // it names must be handled above.
                let pos = self.peek().pos;
                let message = format!("not an operator: {}", self.peek().kind);
                Err(self.error_at(pos, &message))
            }
        }
    }

    /// `=` after an identifier is assignment; after a get it is a slot
    /// set. Anything else is not a valid target.
    fn assign(&mut self, left: Expr) -> PResult<Expr> {
        let eq = self.consume();
        let right = self.precedence(Prec::Lowest)?;
        match left {
            Expr::Identifier(ident) => Ok(Expr::Assign(Box::new(Assign {
                name: ident.token,
                name_id: ident.name,
                distance: Cell::new(None),
                right,
            }))),
            Expr::Get(get) => Ok(Expr::Set(Box::new(Set {
                object: get.object,
                name: get.name,
                name_id: get.name_id,
                bound: get.bound,
                right,
            }))),
            _ => Err(self.error_at(eq.pos, "invalid assignment target")),
        }
    }

    /// Postfix `.name` / `->name`, promoting to a method call when an
    /// argument list follows a bound fetch.
    fn get_or_method(&mut self, object: Expr, bound: bool) -> PResult<Expr> {
        self.consume();
        let (name, name_id) = self.expect_ident(if bound {
            "expected an identifier after ."
        } else {
            "expected an identifier after ->"
        })?;
        if self.check(TokenKind::LParen) {
            let lparen = self.consume();
            let args = self.arguments()?;
            if bound {
                return Ok(Expr::Method(Box::new(Method {
                    object,
                    name,
                    name_id,
                    lparen,
                    args,
                })));
            }
            // `a->f(x)` fetches without binding and calls the bare value.
            let callee = Expr::Get(Box::new(Get {
                object,
                name,
                name_id,
                bound: false,
            }));
            return Ok(Expr::Call(Box::new(Call {
                callee,
                lparen,
                args,
            })));
        }
        Ok(Expr::Get(Box::new(Get {
            object,
            name,
            name_id,
            bound,
        })))
    }

    fn call(&mut self, callee: Expr) -> PResult<Expr> {
        let lparen = self.consume();
        let args = self.arguments()?;
        Ok(Expr::Call(Box::new(Call {
            callee,
            lparen,
            args,
        })))
    }

    /// Comma-separated arguments up to the closing paren (already past
    /// the opening one).
    fn arguments(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "unclosed (")?;
        Ok(args)
    }

    fn array_literal(&mut self) -> PResult<Expr> {
        let token = self.consume();
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "unclosed [")?;
        Ok(Expr::Array(Box::new(ArrayLit { token, elements })))
    }

    fn hash_literal(&mut self) -> PResult<Expr> {
        let token = self.consume();
        let mut pairs = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                let key = self.expression()?;
                self.expect(TokenKind::Colon, "expected : after hash key")?;
                let value = self.expression()?;
                pairs.push((key, value));
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "unclosed {")?;
        Ok(Expr::Hash(Box::new(HashLit { token, pairs })))
    }

    fn function_literal(&mut self) -> PResult<Expr> {
        let token = self.consume();
        self.expect(TokenKind::LParen, "expected ( after fn")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.expect_ident("expected a parameter name")?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "unclosed (")?;
        if !self.check(TokenKind::LBrace) {
            return Err(self.error_at(self.peek().pos, "expected { before function body"));
        }
        let body = self.block_stmt()?;
        Ok(Expr::Function(Rc::new(FunctionLit {
            token,
            name: Cell::new(None),
            params,
            body,
        })))
    }
}

#[cfg(test)]
mod tests;
