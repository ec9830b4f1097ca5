use super::support::show;
use super::Runner;

#[test]
fn test_closure_captures_module_scope() {
    let source = "let a = 1; let a_inside = fn() { return a; }; a_inside();";
    assert_eq!(show(source), "1");
}

#[test]
fn test_closure_keeps_state() {
    let source = "
        let make = fn() {
            let n = 0;
            return fn() { n = n + 1; return n; };
        };
        let counter = make();
        counter();
        counter();
        counter();
    ";
    assert_eq!(show(source), "3");
}

#[test]
fn test_two_closures_do_not_share_frames() {
    let source = "
        let make = fn() {
            let n = 0;
            return fn() { n = n + 1; return n; };
        };
        let a = make();
        let b = make();
        a();
        a();
        b();
    ";
    assert_eq!(show(source), "1");
}

#[test]
fn test_recursion() {
    let source = "
        let fib = fn(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        };
        fib(10);
    ";
    assert_eq!(show(source), "55");
}

#[test]
fn test_late_bound_global() {
    let source = "
        let call_b = fn() { return b(); };
        let b = fn() { return 7; };
        call_b();
    ";
    assert_eq!(show(source), "7");
}

#[test]
fn test_missing_parameters_default_to_nil() {
    assert_eq!(show("let f = fn(a, b) { return b; }; f(1);"), "nil");
}

#[test]
fn test_extra_arguments_are_ignored() {
    assert_eq!(show("let f = fn(a) { return a; }; f(1, 2, 3);"), "1");
}

#[test]
fn test_return_without_value() {
    assert_eq!(show("let f = fn() { return; }; f();"), "nil");
}

#[test]
fn test_function_body_without_return_yields_last_value() {
    // No implicit return: the call yields the body's last statement
    // value only through the block result.
    assert_eq!(show("let f = fn() { 41 + 1; }; f();"), "42");
}

#[test]
fn test_return_escapes_nested_loop() {
    let source = "
        let find = fn() {
            while (true) {
                return 9;
            }
        };
        find();
    ";
    assert_eq!(show(source), "9");
}

#[test]
fn test_functions_are_objects_with_slots() {
    let mut runner = Runner::new();
    runner.show("let f = fn() { return 1; };");
    runner.show("f.tag = \"mine\";");
    assert_eq!(runner.show("f.tag;"), "\"mine\"");
}

#[test]
fn test_function_inspect_uses_binding_name() {
    assert_eq!(show("let speak = fn() { return 1; }; speak;"), "[Function speak]");
    assert_eq!(show("fn() { return 1; };"), "[Function]");
}
