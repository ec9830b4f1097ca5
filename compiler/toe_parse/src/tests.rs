use super::*;
use toe_ir::SharedInterner;

fn pretty(source: &str) -> String {
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex("<test>", source, &interner);
    assert!(lexed.is_ok(), "lex errors: {:?}", lexed.errors);
    let out = parse("<test>", lexed.tokens, &interner);
    assert!(out.is_ok(), "parse errors: {:?}", out.errors);
    out.module.pretty(&interner)
}

fn errors(source: &str) -> Vec<String> {
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex("<test>", source, &interner);
    let out = parse("<test>", lexed.tokens, &interner);
    out.errors.into_iter().map(|e| e.message).collect()
}

#[test]
fn test_let_and_precedence() {
    assert_eq!(pretty("let x = 1 + 2 * 3;"), "(let x (+ 1 (* 2 3)))");
    assert_eq!(pretty("let x = (1 + 2) * 3;"), "(let x (* (+ 1 2) 3))");
}

#[test]
fn test_comparison_binds_looser_than_sum() {
    assert_eq!(pretty("1 + 2 < 3 * 4;"), "(< (+ 1 2) (* 3 4))");
}

#[test]
fn test_logical_precedence() {
    // && binds tighter than ||.
    assert_eq!(pretty("a || b && c;"), "(|| a (&& b c))");
}

#[test]
fn test_equality_chain() {
    assert_eq!(pretty("1 == 2 != false;"), "(!= (== 1 2) false)");
}

#[test]
fn test_unary() {
    assert_eq!(pretty("-x * 2;"), "(* (- x) 2)");
    assert_eq!(pretty("!a && b;"), "(&& (! a) b)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(pretty("a = b = 1;"), "(= a (= b 1))");
}

#[test]
fn test_get_set_bound_and_unbound() {
    assert_eq!(pretty("a.b;"), "(. a b)");
    assert_eq!(pretty("a->b;"), "(-> a b)");
    assert_eq!(pretty("a.b = 1;"), "(set. a b 1)");
    assert_eq!(pretty("a->b = 1;"), "(set-> a b 1)");
}

#[test]
fn test_method_call_vs_unbound_fetch_call() {
    assert_eq!(pretty("a.f(1, 2);"), "(method a f 1 2)");
    assert_eq!(pretty("a->f(1);"), "(call (-> a f) 1)");
}

#[test]
fn test_chained_postfix() {
    assert_eq!(pretty("a.b.c(1).d;"), "(. (method (. a b) c 1) d)");
}

#[test]
fn test_call() {
    assert_eq!(pretty("f();"), "(call f)");
    assert_eq!(pretty("f(1)(2);"), "(call (call f 1) 2)");
}

#[test]
fn test_array_and_hash_literals() {
    assert_eq!(pretty("[1, 2, 3];"), "(array 1 2 3)");
    assert_eq!(pretty("let h = {\"a\": 1, \"b\": 2};"), "(let h (hash (\"a\" 1) (\"b\" 2)))");
}

#[test]
fn test_block_statement_not_hash() {
    // `{` in statement position opens a block, not a hash literal.
    assert_eq!(pretty("{ let x = 1; }"), "(block (let x 1))");
}

#[test]
fn test_control_flow() {
    assert_eq!(pretty("if (a) b; else c;"), "(if a b c)");
    assert_eq!(pretty("while (a) { b; }"), "(while a (block b))");
    assert_eq!(pretty("for (x : xs) { x; }"), "(for x xs (block x))");
    assert_eq!(pretty("while (a) { break; continue; }"), "(while a (block (break) (continue)))");
}

#[test]
fn test_return_forms() {
    let src = "let f = fn() { return; };";
    assert_eq!(pretty(src), "(let f (fn () (block (return))))");
    let src = "let f = fn(a, b) { return a + b; };";
    assert_eq!(pretty(src), "(let f (fn (a b) (block (return (+ a b)))))");
}

#[test]
fn test_super_postfix() {
    assert_eq!(pretty("let f = fn() { return super.speak(); };"), "(let f (fn () (block (return (method super speak)))))");
}

#[test]
fn test_this_is_an_identifier() {
    assert_eq!(pretty("let f = fn() { return this.n; };"), "(let f (fn () (block (return (. this n)))))");
}

#[test]
fn test_invalid_assignment_target() {
    let msgs = errors("1 = 2;");
    assert!(msgs.iter().any(|m| m.contains("invalid assignment target")), "{msgs:?}");
}

#[test]
fn test_missing_semicolon() {
    let msgs = errors("let x = 1");
    assert!(msgs.iter().any(|m| m.contains("expected ;")), "{msgs:?}");
}

#[test]
fn test_recovery_after_error() {
    // The bad statement is dropped; the following one still parses.
    let interner = SharedInterner::new();
    let lexed = toe_lexer::lex("<test>", "let = 1; let y = 2;", &interner);
    let out = parse("<test>", lexed.tokens, &interner);
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.module.pretty(&interner), "(let y 2)");
}

#[test]
fn test_not_an_expression() {
    let msgs = errors("let x = ;");
    assert!(msgs.iter().any(|m| m.contains("not an expression")), "{msgs:?}");
}
