//! The interactive shell.
//!
//! One interner, resolver and interpreter context persist for the
//! whole session, so definitions carry across lines. Each line runs
//! lex → parse → resolve → eval; any phase error prints and leaves
//! the session intact. EOF (or Ctrl-D) exits.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use toe_eval::{Control, Interp};
use toe_ir::SharedInterner;
use toe_resolve::Resolver;

const LOGO: &str = "
_|_ _  _
 |_(_)(/_
";

pub fn repl() {
    println!("{LOGO}");

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("toec: cannot start line editor: {error}");
            std::process::exit(1);
        }
    };

    let interner = SharedInterner::new();
    let mut resolver = Resolver::new("<stdin>", interner.clone());
    let mut interp = Interp::new(interner.clone());
    interp.open_module("<stdin>");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                run_line(&line, &interner, &mut resolver, &mut interp);
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                println!();
                return;
            }
            Err(error) => {
                eprintln!("toec: {error}");
                return;
            }
        }
    }
}

/// Run one line; print the last statement's inspect-string or the
/// first error.
fn run_line(line: &str, interner: &SharedInterner, resolver: &mut Resolver, interp: &mut Interp) {
    let lexed = toe_lexer::lex("<stdin>", line, interner);
    if !lexed.is_ok() {
        for error in &lexed.errors {
            eprintln!("{error}");
        }
        return;
    }

    let parsed = toe_parse::parse("<stdin>", lexed.tokens, interner);
    if !parsed.is_ok() {
        for error in &parsed.errors {
            eprintln!("{error}");
        }
        return;
    }

    for stmt in &parsed.module.stmts {
        resolver.resolve_stmt(stmt);
    }
    if !resolver.is_ok() {
        for error in resolver.take_errors() {
            eprintln!("{error}");
        }
        return;
    }

    let mut last = None;
    for stmt in &parsed.module.stmts {
        match interp.eval_stmt(stmt) {
            Ok(value) => last = Some(value),
            Err(Control::Error(error)) => {
                eprintln!("{}", interp.render_error(&error));
                return;
            }
            Err(other) => {
                // The resolver rejects stray break/continue/return, so
                // this is unreachable in practice.
                eprintln!("toec: unconsumed control signal: {other:?}");
                return;
            }
        }
    }

    if let Some(value) = last {
        match interp.inspect_value(&value) {
            Ok(rendered) => println!("{rendered}"),
            Err(Control::Error(error)) => eprintln!("{}", interp.render_error(&error)),
            Err(_) => {}
        }
    }
}
