//! `run`, `lex` and `parse`: one-shot pipeline drivers.

use toe_eval::{Control, Interp};
use toe_ir::{SharedInterner, TokenKind};
use toe_resolve::Resolver;

/// Read, lex, parse, resolve and evaluate a file. Frontend errors
/// print one per line; a runtime error prints its rendered trace.
/// Exits non-zero on any error.
pub fn run_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();

    let lexed = toe_lexer::lex(path, &source, &interner);
    if !lexed.is_ok() {
        for error in &lexed.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }

    let parsed = toe_parse::parse(path, lexed.tokens, &interner);
    if !parsed.is_ok() {
        for error in &parsed.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }

    let mut resolver = Resolver::new(path, interner.clone());
    resolver.resolve(&parsed.module);
    if !resolver.is_ok() {
        for error in &resolver.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }

    let mut interp = Interp::new(interner);
    if let Err(Control::Error(error)) = interp.eval_module(&parsed.module) {
        eprintln!("{}", interp.render_error(&error));
        std::process::exit(1);
    }
}

/// Print the token stream, one token per line.
pub fn lex_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex(path, &source, &interner);
    for token in &lexed.tokens {
        let text = match token.kind {
            TokenKind::Number(bits) => format!("number {}", f64::from_bits(bits)),
            TokenKind::Str(name) => format!("string {:?}", interner.lookup(name)),
            TokenKind::Ident(name) => format!("ident {}", interner.lookup(name)),
            other => other.lexeme().to_string(),
        };
        println!("{}:{}\t{}", token.pos.line, token.pos.column, text);
    }
    if !lexed.is_ok() {
        for error in &lexed.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }
}

/// Print the parsed AST in parenthesized form.
pub fn parse_file(path: &str) {
    let source = read_source(path);
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex(path, &source, &interner);
    if !lexed.is_ok() {
        for error in &lexed.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }
    let parsed = toe_parse::parse(path, lexed.tokens, &interner);
    println!("{}", parsed.module.pretty(&interner));
    if !parsed.is_ok() {
        for error in &parsed.errors {
            eprintln!("{error}");
        }
        std::process::exit(1);
    }
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("toec: cannot read {path}: {error}");
            std::process::exit(1);
        }
    }
}
