use super::*;
use toe_ir::ast::{Expr, Stmt};
use toe_ir::SharedInterner;

fn resolve_source(source: &str) -> (toe_ir::ast::Module, Vec<String>, SharedInterner) {
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex("<test>", source, &interner);
    assert!(lexed.is_ok(), "lex errors: {:?}", lexed.errors);
    let parsed = toe_parse::parse("<test>", lexed.tokens, &interner);
    assert!(parsed.is_ok(), "parse errors: {:?}", parsed.errors);
    let mut resolver = Resolver::new("<test>", interner.clone());
    resolver.resolve(&parsed.module);
    let errors = resolver.errors.into_iter().map(|e| e.message).collect();
    (parsed.module, errors, interner)
}

/// Walk the module and collect every identifier distance, in source
/// order, as (name, distance) pairs.
fn distances(module: &toe_ir::ast::Module, interner: &SharedInterner) -> Vec<(String, u32)> {
    fn walk_stmt(stmt: &Stmt, it: &SharedInterner, out: &mut Vec<(String, u32)>) {
        match stmt {
            Stmt::Let(s) => walk_expr(&s.value, it, out),
            Stmt::Block(b) => b.stmts.iter().for_each(|s| walk_stmt(s, it, out)),
            Stmt::If(s) => {
                walk_expr(&s.cond, it, out);
                walk_stmt(&s.then, it, out);
                if let Some(o) = &s.otherwise {
                    walk_stmt(o, it, out);
                }
            }
            Stmt::While(s) => {
                walk_expr(&s.cond, it, out);
                walk_stmt(&s.body, it, out);
            }
            Stmt::For(s) => {
                walk_expr(&s.iter, it, out);
                walk_stmt(&s.body, it, out);
            }
            Stmt::Return(s) => {
                if let Some(e) = &s.expr {
                    walk_expr(e, it, out);
                }
            }
            Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Expr(s) => walk_expr(&s.expr, it, out),
        }
    }
    fn walk_expr(expr: &Expr, it: &SharedInterner, out: &mut Vec<(String, u32)>) {
        match expr {
            Expr::Binary(e) => {
                walk_expr(&e.left, it, out);
                walk_expr(&e.right, it, out);
            }
            Expr::And(e) | Expr::Or(e) => {
                walk_expr(&e.left, it, out);
                walk_expr(&e.right, it, out);
            }
            Expr::Assign(e) => {
                walk_expr(&e.right, it, out);
                let d = e.distance.get().expect("assign distance stamped");
                out.push((it.lookup(e.name_id).to_string(), d));
            }
            Expr::Unary(e) => walk_expr(&e.right, it, out),
            Expr::Get(e) => walk_expr(&e.object, it, out),
            Expr::Set(e) => {
                walk_expr(&e.right, it, out);
                walk_expr(&e.object, it, out);
            }
            Expr::Method(e) => {
                walk_expr(&e.object, it, out);
                e.args.iter().for_each(|a| walk_expr(a, it, out));
            }
            Expr::Call(e) => {
                walk_expr(&e.callee, it, out);
                e.args.iter().for_each(|a| walk_expr(a, it, out));
            }
            Expr::Identifier(e) => {
                let d = e.distance.get().expect("identifier distance stamped");
                out.push((it.lookup(e.name).to_string(), d));
            }
            Expr::Literal(_) => {}
            Expr::Array(e) => e.elements.iter().for_each(|x| walk_expr(x, it, out)),
            Expr::Hash(e) => e.pairs.iter().for_each(|(k, v)| {
                walk_expr(k, it, out);
                walk_expr(v, it, out);
            }),
            Expr::Function(e) => e.body.stmts.iter().for_each(|s| walk_stmt(s, it, out)),
            Expr::Super(_) => {}
        }
    }
    let mut out = Vec::new();
    for stmt in &module.stmts {
        walk_stmt(stmt, interner, &mut out);
    }
    out
}

#[test]
fn test_module_level_distance_zero() {
    let (module, errors, it) = resolve_source("let a = 1; a;");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("a".to_string(), 0)]);
}

#[test]
fn test_block_shadowing() {
    let (module, errors, it) = resolve_source("let a = 1; { let a = 2; a; } a;");
    assert!(errors.is_empty(), "{errors:?}");
    // Inner `a` resolves in the block scope (0), outer at module (0).
    assert_eq!(
        distances(&module, &it),
        vec![("a".to_string(), 0), ("a".to_string(), 0)]
    );
}

#[test]
fn test_block_reaches_outer() {
    let (module, errors, it) = resolve_source("let a = 1; { a; }");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("a".to_string(), 1)]);
}

#[test]
fn test_function_closure_distance() {
    // Function body block (1 hop) + parameter frame (1 hop) = 2 hops
    // back to the module scope where `a` lives.
    let (module, errors, it) = resolve_source("let a = 1; let f = fn() { return a; };");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("a".to_string(), 2)]);
}

#[test]
fn test_parameter_distance() {
    let (module, errors, it) = resolve_source("let f = fn(x) { return x; };");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("x".to_string(), 1)]);
}

#[test]
fn test_this_resolves_in_function() {
    let (module, errors, it) = resolve_source("let f = fn() { return this; };");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("this".to_string(), 1)]);
}

#[test]
fn test_late_bound_global_inside_function() {
    // `b` is not yet defined when `f`'s body is resolved, but functions
    // defer unknown names to the module scope.
    let (module, errors, it) = resolve_source("let f = fn() { return b; }; let b = 3;");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("b".to_string(), 2)]);
}

#[test]
fn test_undefined_variable_at_module_level() {
    let (_, errors, _) = resolve_source("missing;");
    assert!(errors.iter().any(|e| e.contains("undefined variable \"missing\"")), "{errors:?}");
}

#[test]
fn test_double_let_rejected() {
    let (_, errors, _) = resolve_source("let a = 1; let a = 2;");
    assert!(errors.iter().any(|e| e.contains("already a variable")), "{errors:?}");
}

#[test]
fn test_self_initializer_rejected() {
    let (_, errors, _) = resolve_source("let a = a;");
    assert!(
        errors.iter().any(|e| e.contains("before initialization")),
        "{errors:?}"
    );
}

#[test]
fn test_function_self_reference_allowed() {
    let (_, errors, _) = resolve_source("let f = fn() { return f(); };");
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn test_break_outside_loop() {
    let (_, errors, _) = resolve_source("break;");
    assert!(errors.iter().any(|e| e.contains("break outside of loop")), "{errors:?}");
}

#[test]
fn test_continue_outside_loop() {
    let (_, errors, _) = resolve_source("continue;");
    assert!(errors.iter().any(|e| e.contains("continue outside of loop")), "{errors:?}");
}

#[test]
fn test_return_outside_function() {
    let (_, errors, _) = resolve_source("return 1;");
    assert!(errors.iter().any(|e| e.contains("return outside of function")), "{errors:?}");
}

#[test]
fn test_super_outside_function() {
    let (_, errors, _) = resolve_source("super.speak();");
    assert!(errors.iter().any(|e| e.contains("super outside of function")), "{errors:?}");
}

#[test]
fn test_break_not_inherited_through_function() {
    let (_, errors, _) = resolve_source("while (true) { let f = fn() { break; }; }");
    assert!(errors.iter().any(|e| e.contains("break outside of loop")), "{errors:?}");
}

#[test]
fn test_globals_are_pre_seeded() {
    let (module, errors, it) = resolve_source("Object;");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(distances(&module, &it), vec![("Object".to_string(), 0)]);
}

#[test]
fn test_function_display_name_stamped() {
    let (module, _, it) = resolve_source("let counter = fn() { return 1; };");
    let Stmt::Let(let_stmt) = &module.stmts[0] else {
        panic!("expected let");
    };
    let Expr::Function(func) = &let_stmt.value else {
        panic!("expected function literal");
    };
    let name = func.name.get().expect("name stamped");
    assert_eq!(it.lookup(name), "counter");
}

#[test]
fn test_repl_keeps_module_scope() {
    let interner = SharedInterner::new();
    let mut resolver = Resolver::new("<stdin>", interner.clone());

    let lexed = toe_lexer::lex("<stdin>", "let a = 1;", &interner);
    let parsed = toe_parse::parse("<stdin>", lexed.tokens, &interner);
    for stmt in &parsed.module.stmts {
        resolver.resolve_stmt(stmt);
    }
    assert!(resolver.is_ok());

    let lexed = toe_lexer::lex("<stdin>", "a;", &interner);
    let parsed = toe_parse::parse("<stdin>", lexed.tokens, &interner);
    for stmt in &parsed.module.stmts {
        resolver.resolve_stmt(stmt);
    }
    assert!(resolver.is_ok(), "{:?}", resolver.errors);
}
