//! Logos-derived raw tokenizer.
//!
//! Raw tokens know nothing about interning or keywords; the conversion
//! pass in `lib.rs` turns them into `TokenKind`s.

use logos::Logos;

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum RawToken {
    /// Digits with an optional fraction. `1.foo` lexes as number, dot,
    /// identifier because the fraction requires a digit after the dot.
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    /// A complete single-line string literal, escapes unvalidated.
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#)]
    Str,

    /// A string that hit a newline or end of input before its closing
    /// quote. Kept as a token shape so the error message can say
    /// "unterminated string" instead of "unexpected character".
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*"#, priority = 2)]
    UnterminatedStr,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("->")]
    Arrow,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
}
