//! Lexer for toe using logos with string interning.
//!
//! The main entry point is [`lex()`], which converts source text into a
//! list of [`Token`]s plus a list of [`LexError`]s.
//!
//! # Token types
//!
//! - **Literals**: numbers (`42`, `3.14`), strings (`"hi\n"`)
//! - **Keywords**: `let`, `fn`, `for`, `while`, `if`, `else`, `return`,
//!   `break`, `continue`, `super`, `this`, `nil`, `true`, `false`
//! - **Symbols**: operators, delimiters, punctuation (including `->`)
//! - **Identifiers**: interned for cheap comparison downstream
//!
//! # Escape sequences
//!
//! String literals support `\\`, `\"`, `\0`, `\r`, `\n`. Any other
//! escape is an error. Strings are single-line; a raw newline before the
//! closing quote is an "unterminated string" error.
//!
//! # Error handling
//!
//! Errors carry filename/line/column/message. The lexer keeps going
//! after an error so one bad character does not hide the rest of the
//! file, but gives up after [`MAX_ERRORS`] to avoid error spam.

mod line_index;
mod raw_token;

use line_index::LineIndex;
use logos::Logos;
use raw_token::RawToken;
use std::fmt;
use std::rc::Rc;
use toe_ir::{Position, StringInterner, Token, TokenKind};

/// Stop lexing after this many errors.
pub const MAX_ERRORS: usize = 10;

/// A lexical error with its source location.
#[derive(Clone, Debug)]
pub struct LexError {
    pub filename: Rc<str>,
    pub pos: Position,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.filename, self.pos, self.message)
    }
}

impl std::error::Error for LexError {}

/// Output of a lexing run: the token list always ends with `Eof`.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    /// True when lexing produced no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lex source text into tokens.
///
/// Identifiers and string literals are interned via `interner`.
/// Positions are 1-based, with columns counted in characters.
pub fn lex(filename: &str, source: &str, interner: &StringInterner) -> LexOutput {
    let filename: Rc<str> = Rc::from(filename);
    let index = LineIndex::new(source);
    let mut out = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        if out.errors.len() >= MAX_ERRORS {
            break;
        }
        let pos = index.position(logos.span().start);
        let slice = logos.slice();
        match token_result {
            Ok(raw) => match convert(raw, slice, interner) {
                Ok(kind) => out.tokens.push(Token::new(kind, pos)),
                Err(message) => out.errors.push(LexError {
                    filename: filename.clone(),
                    pos,
                    message,
                }),
            },
            Err(()) => {
                let ch = slice.chars().next().unwrap_or('\u{fffd}');
                out.errors.push(LexError {
                    filename: filename.clone(),
                    pos,
                    message: format!("unexpected character {ch:?}"),
                });
            }
        }
    }

    out.tokens
        .push(Token::new(TokenKind::Eof, index.position(source.len())));
    out
}

/// Convert a raw logos token into a `TokenKind`, interning as needed.
fn convert(raw: RawToken, slice: &str, interner: &StringInterner) -> Result<TokenKind, String> {
    Ok(match raw {
        RawToken::Number => {
            let value: f64 = slice
                .parse()
                .map_err(|_| format!("invalid number literal {slice:?}"))?;
            TokenKind::number(value)
        }
        RawToken::Str => TokenKind::Str(interner.intern_owned(unescape(slice)?)),
        RawToken::UnterminatedStr => return Err("unterminated string".to_string()),
        RawToken::Ident => keyword_or_ident(slice, interner),
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Bang => TokenKind::Bang,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Less => TokenKind::Less,
        RawToken::LessEq => TokenKind::LessEq,
        RawToken::Greater => TokenKind::Greater,
        RawToken::GreaterEq => TokenKind::GreaterEq,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
    })
}

/// Map reserved words onto keyword kinds; everything else interns.
fn keyword_or_ident(word: &str, interner: &StringInterner) -> TokenKind {
    match word {
        "let" => TokenKind::Let,
        "fn" => TokenKind::Fn,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "super" => TokenKind::Super,
        "this" => TokenKind::This,
        "nil" => TokenKind::Nil,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => TokenKind::Ident(interner.intern(word)),
    }
}

/// Process escapes in a raw string literal (still wearing its quotes).
fn unescape(raw: &str) -> Result<String, String> {
    // Strip the surrounding quotes; the regex guarantees both exist.
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => {
                return Err(format!("invalid escape in string literal: {:?}", format!("\\{other}")))
            }
            None => return Err("unterminated string".to_string()),
        }
    }
    Ok(out)
}
