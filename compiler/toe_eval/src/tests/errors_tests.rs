use super::support::{fail, show};
use super::Runner;

#[test]
fn test_canonical_reasons() {
    assert_eq!(fail("5();"), "not a function");
    assert_eq!(fail("5.x = 1;"), "cannot set slot \"x\" on object");
    assert_eq!(fail("[1].size(2);"), "expected 0 argument(s), got=1");
    assert_eq!(fail("[1].get();"), "expected 1 argument(s), got=0");
}

#[test]
fn test_super_without_whence() {
    assert_eq!(
        fail("let f = fn() { return super.speak(); }; f();"),
        "super used outside of a method"
    );
}

#[test]
fn test_trace_lists_module_before_function() {
    let mut runner = Runner::new();
    runner.show("let f = fn() { return Object.missing_slot; };");
    let rendered = match runner.eval("f();") {
        Err(crate::errors::Control::Error(error)) => runner.interp.render_error(&error),
        other => panic!("expected error, got {other:?}"),
    };
    let first = rendered.lines().next().unwrap();
    assert_eq!(first, "Error: \"object has no slot \\\"missing_slot\\\"\"");
    let module_at = rendered.find("[Module]").expect("module frame");
    let function_at = rendered.find("[Function f]").expect("function frame");
    assert!(
        module_at < function_at,
        "outermost frame renders first:\n{rendered}"
    );
}

#[test]
fn test_trace_positions_point_at_source() {
    let mut runner = Runner::new();
    let error = runner.fail_full("let g = fn() { return nil.x; };\ng();");
    // The innermost frame anchors on the `x` token at line 1.
    let innermost = error.trace.first().expect("at least one frame");
    assert_eq!(innermost.pos.line, 1);
    assert_eq!(&*innermost.context, "[Function g]");
    // The outermost frame is the call site on line 2.
    let outermost = error.trace.last().expect("call frame");
    assert_eq!(outermost.pos.line, 2);
    assert_eq!(&*outermost.context, "[Module]");
}

#[test]
fn test_nested_calls_build_nested_traces() {
    let mut runner = Runner::new();
    runner.show(
        "let inner = fn() { return nil.x; };
         let outer = fn() { return inner(); };",
    );
    let error = runner.fail_full("outer();");
    let contexts: Vec<&str> = error.trace.iter().map(|f| &*f.context).collect();
    assert_eq!(contexts, vec!["[Function inner]", "[Function outer]", "[Module]"]);
}

#[test]
fn test_builtin_errors_carry_zero_position() {
    let mut runner = Runner::new();
    let error = runner.fail_full("get_slot(Object.clone(), \"nope\");");
    let builtin_frame = error
        .trace
        .iter()
        .find(|f| &*f.context == "[Builtin get_slot]")
        .expect("builtin frame present");
    assert_eq!(builtin_frame.pos.line, 0);
    assert_eq!(builtin_frame.pos.column, 0);
    assert_eq!(&*builtin_frame.filename, "[builtin]");
}

#[test]
fn test_error_reaching_top_has_nonempty_trace() {
    let mut runner = Runner::new();
    let error = runner.fail_full("nil.x;");
    assert!(!error.trace.is_empty());
}

#[test]
fn test_user_thrown_error_keeps_reason_value() {
    let mut runner = Runner::new();
    runner.show("let e = Error.new(\"my reason\");");
    assert_eq!(runner.fail("e.throw();"), "my reason");
}

#[test]
fn test_error_stops_module_evaluation() {
    let mut runner = Runner::new();
    let _ = runner.eval("puts(\"before\"); nil.x; puts(\"after\");");
    assert_eq!(runner.output(), "before\n");
}

#[test]
fn test_for_loop_propagates_body_error() {
    assert_eq!(
        fail("for (x : [1]) { nil.boom; }"),
        "object has no slot \"boom\""
    );
}

#[test]
fn test_error_inside_condition_propagates() {
    assert_eq!(fail("while (nil.cond) { }"), "object has no slot \"cond\"");
    assert_eq!(fail("if (nil.cond) 1;"), "object has no slot \"cond\"");
}

#[test]
fn test_is_not_defined_reason() {
    // The resolver normally rejects unknown names; the runtime reason
    // surfaces through functions whose module binding never appears.
    assert_eq!(
        fail("let f = fn() { return ghost; }; f();"),
        "\"ghost\" is not defined"
    );
}

#[test]
fn test_trace_rendering_shape() {
    let rendered = show("nil.x;");
    assert!(rendered.starts_with("Error: "), "{rendered}");
    assert!(rendered.contains("\n  at <test>:1:5: in [Module]"), "{rendered}");
}
