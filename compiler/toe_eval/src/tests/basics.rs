use super::support::{fail, show};
use super::Runner;

#[test]
fn test_literals() {
    assert_eq!(show("1;"), "1");
    assert_eq!(show("3.25;"), "3.25");
    assert_eq!(show("\"hi\";"), "\"hi\"");
    assert_eq!(show("nil;"), "nil");
    assert_eq!(show("true;"), "true");
    assert_eq!(show("false;"), "false");
}

#[test]
fn test_arithmetic() {
    assert_eq!(show("1 + 2 * 3;"), "7");
    assert_eq!(show("(1 + 2) * 3;"), "9");
    assert_eq!(show("10 / 4;"), "2.5");
    assert_eq!(show("7 - 10;"), "-3");
}

#[test]
fn test_division_by_zero_is_ieee() {
    assert_eq!(show("1 / 0;"), "inf");
    assert_eq!(show("-1 / 0;"), "-inf");
}

#[test]
fn test_number_comparisons() {
    assert_eq!(show("1 < 2;"), "true");
    assert_eq!(show("2 <= 2;"), "true");
    assert_eq!(show("3 > 4;"), "false");
    assert_eq!(show("1 == 1;"), "true");
    assert_eq!(show("1 != 1;"), "false");
}

#[test]
fn test_nan_equality() {
    assert_eq!(show("let nan = 0 / 0; nan == nan;"), "false");
}

#[test]
fn test_string_operations() {
    assert_eq!(show("\"foo\" + \"bar\";"), "\"foobar\"");
    assert_eq!(show("\"a\" < \"b\";"), "true");
    assert_eq!(show("\"abc\" == \"abc\";"), "true");
    assert_eq!(show("\"abc\" == \"abd\";"), "false");
}

#[test]
fn test_mixed_equality_is_false_not_error() {
    assert_eq!(show("1 == \"1\";"), "false");
    assert_eq!(show("1 != \"1\";"), "true");
    assert_eq!(show("nil == false;"), "false");
}

#[test]
fn test_unsupported_operands() {
    assert_eq!(
        fail("1 + \"a\";"),
        "unsupported operands for \"+\": number and string"
    );
}

#[test]
fn test_unary() {
    assert_eq!(show("-3;"), "-3");
    assert_eq!(show("!true;"), "false");
    assert_eq!(show("!nil;"), "true");
    assert_eq!(show("!0;"), "false");
    assert_eq!(fail("-\"a\";"), "unsupported operand for \"-\": string");
}

#[test]
fn test_truthiness_in_logic() {
    // && and || yield the deciding operand, not a coerced boolean.
    assert_eq!(show("1 && 2;"), "2");
    assert_eq!(show("nil && 2;"), "nil");
    assert_eq!(show("nil || 3;"), "3");
    assert_eq!(show("false || nil;"), "nil");
    assert_eq!(show("0 || 9;"), "0");
}

#[test]
fn test_short_circuit_skips_rhs() {
    let mut runner = Runner::new();
    runner.show("let boom = fn() { Error.new(\"side effect\").throw(); };");
    assert_eq!(runner.show("false && boom();"), "false");
    assert_eq!(runner.show("true || boom();"), "true");
}

#[test]
fn test_if_else() {
    assert_eq!(show("let x = 0; if (1 < 2) x = 1; else x = 2; x;"), "1");
    assert_eq!(show("let x = 0; if (1 > 2) x = 1; else x = 2; x;"), "2");
    assert_eq!(show("if (false) 1;"), "nil");
}

#[test]
fn test_while_loop() {
    assert_eq!(show("let i = 0; while (i < 5) { i = i + 1; } i;"), "5");
}

#[test]
fn test_while_break_continue() {
    let source = "
        let i = 0;
        let n = 0;
        let odd = false;
        while (true) {
            i = i + 1;
            odd = !odd;
            if (i > 10) break;
            if (!odd) continue;
            n = n + 1;
        }
        n;
    ";
    // Odd numbers in 1..=10.
    assert_eq!(show(source), "5");
}

#[test]
fn test_block_scoping_and_shadowing() {
    assert_eq!(show("let a = 1; { let a = 2; } a;"), "1");
    assert_eq!(show("let a = 1; { a = 2; } a;"), "2");
}

#[test]
fn test_assignment_is_an_expression() {
    assert_eq!(show("let a = 0; let b = a = 3; b;"), "3");
}

#[test]
fn test_puts_writes_display_form() {
    let mut runner = Runner::new();
    runner.show("puts(\"hello\", 1 + 1, nil);");
    assert_eq!(runner.output(), "hello 2 nil\n");
}

#[test]
fn test_repl_state_persists_across_snippets() {
    let mut runner = Runner::new();
    runner.show("let a = 40;");
    assert_eq!(runner.show("a + 2;"), "42");
}
