//! Toe interpreter CLI.
//!
//! `toec` with no arguments starts the REPL; `toec run <file.toe>`
//! evaluates a file. `lex` and `parse` dump the intermediate phases
//! for debugging.

mod commands;
mod tracing_setup;

use commands::{lex_file, parse_file, repl, run_file};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        repl();
        return;
    }

    match args[1].as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: toec run <file.toe>");
                std::process::exit(1);
            }
            run_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: toec lex <file.toe>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: toec parse <file.toe>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "repl" => repl(),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-v" => {
            println!("toe {}", env!("CARGO_PKG_VERSION"));
        }
        command => {
            // A bare path is shorthand for `run`.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toe"))
            {
                run_file(command);
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("Toe interpreter");
    println!();
    println!("Usage: toec [command] [options]");
    println!();
    println!("Commands:");
    println!("  run <file.toe>       Evaluate a toe program");
    println!("  lex <file.toe>       Print the token stream");
    println!("  parse <file.toe>     Print the parsed AST");
    println!("  repl                 Start the interactive shell (default)");
    println!("  help                 Show this help");
    println!("  version              Show the version");
    println!();
    println!("Environment:");
    println!("  TOE_LOG              Log filter (RUST_LOG syntax)");
    println!("  TOE_LOG_TREE         Hierarchical log output");
}
