use super::support::{fail, show};
use super::Runner;

#[test]
fn test_slot_set_get() {
    let source = "let d = Object.clone(); d.name = \"fido\"; d.name;";
    assert_eq!(show(source), "\"fido\"");
}

#[test]
fn test_missing_slot_errors() {
    assert_eq!(
        fail("let d = Object.clone(); d.missing;"),
        "object has no slot \"missing\""
    );
}

#[test]
fn test_new_runs_init_with_this() {
    let source = "
        let Counter = Object.clone();
        Counter.init = fn() { this.n = 0; };
        Counter.inc = fn() { this.n = this.n + 1; };
        let c = Counter.new();
        c.inc();
        c.inc();
        c.n;
    ";
    assert_eq!(show(source), "2");
}

#[test]
fn test_new_passes_arguments_to_init() {
    let source = "
        let Dog = Object.clone();
        Dog.init = fn(name) { this.name = name; };
        Dog.new(\"rex\").name;
    ";
    assert_eq!(show(source), "\"rex\"");
}

#[test]
fn test_clone_prototype_and_is_a() {
    let mut runner = Runner::new();
    runner.show("let base = Object.clone(); let kid = base.clone();");
    assert_eq!(runner.show("get_proto(kid) == base;"), "true");
    assert_eq!(runner.show("kid.is_a(base);"), "true");
    assert_eq!(runner.show("is_a(kid, Object);"), "true");
    assert_eq!(runner.show("base.is_a(kid);"), "false");
}

#[test]
fn test_prototype_method_dispatch() {
    let source = "
        let Animal = Object.clone();
        Animal.speak = fn() { return \"?\"; };
        let cat = Animal.clone();
        cat.speak();
    ";
    assert_eq!(show(source), "\"?\"");
}

#[test]
fn test_super_via_whence() {
    let source = "
        let Animal = Object.clone();
        Animal.speak = fn() { return \"?\"; };
        let Dog = Animal.clone();
        Dog.speak = fn() { return super.speak() + \"!\"; };
        Dog.new().speak();
    ";
    assert_eq!(show(source), "\"?!\"");
}

#[test]
fn test_super_sees_grandparent_through_chain() {
    // The whence register, not the receiver, decides where super
    // looks: a method inherited two levels down still finds its own
    // prototype's parent.
    let source = "
        let A = Object.clone();
        A.who = fn() { return \"a\"; };
        let B = A.clone();
        B.who = fn() { return super.who() + \"b\"; };
        let C = B.clone();
        C.new().who();
    ";
    assert_eq!(show(source), "\"ab\"");
}

#[test]
fn test_dot_binds_arrow_does_not() {
    let mut runner = Runner::new();
    runner.show("let obj = Object.clone(); obj.n = 5; obj.getter = fn() { return this.n; };");
    // Bound fetch: callable later with the receiver remembered.
    assert_eq!(runner.show("let g = obj.getter; g();"), "5");
    // Unbound fetch: this stays nil, so this.n fails.
    assert_eq!(
        runner.fail("let u = obj->getter; u();"),
        "object has no slot \"n\""
    );
}

#[test]
fn test_explicit_bind_and_call() {
    let mut runner = Runner::new();
    runner.show("let obj = Object.clone(); obj.n = 3;");
    runner.show("let getter = fn() { return this.n; };");
    assert_eq!(runner.show("getter.bind(obj)();"), "3");
    assert_eq!(runner.show("getter.call(obj);"), "3");
}

#[test]
fn test_bound_function_rebound_is_itself() {
    let mut runner = Runner::new();
    runner.show("let a = Object.clone(); let b = Object.clone();");
    runner.show("let f = fn() { return this; };");
    assert_eq!(runner.show("f.bind(a).bind(b) == f.bind(a);"), "true");
    assert_eq!(runner.show("f.bind(a) == f.bind(b);"), "false");
}

#[test]
fn test_method_call_binds_receiver_not_prototype() {
    // The function lives on the prototype; this is still the clone.
    let source = "
        let Proto = Object.clone();
        Proto.me = fn() { return this; };
        let kid = Proto.clone();
        kid.me() == kid;
    ";
    assert_eq!(show(source), "true");
}

#[test]
fn test_set_never_writes_prototype() {
    let mut runner = Runner::new();
    runner.show("let base = Object.clone(); base.x = 1; let kid = base.clone();");
    runner.show("kid.x = 2;");
    assert_eq!(runner.show("base.x;"), "1");
    assert_eq!(runner.show("kid.x;"), "2");
}

#[test]
fn test_object_equality_is_identity() {
    let mut runner = Runner::new();
    runner.show("let a = Object.clone(); let b = Object.clone();");
    assert_eq!(runner.show("a == a;"), "true");
    assert_eq!(runner.show("a == b;"), "false");
    assert_eq!(runner.show("a != b;"), "true");
}

#[test]
fn test_operator_slot_override() {
    let source = "
        let Vec = Object.clone();
        Vec.init = fn(x) { this.x = x; };
        set_slot(Vec, \"+\", fn(other) { return Vec.new(this.x + other.x); });
        let v = Vec.new(1) + Vec.new(2);
        v.x;
    ";
    assert_eq!(show(source), "3");
}

#[test]
fn test_equality_slot_override() {
    let source = "
        let Point = Object.clone();
        Point.init = fn(x) { this.x = x; };
        set_slot(Point, \"==\", fn(other) { return this.x == other.x; });
        Point.new(4) == Point.new(4);
    ";
    assert_eq!(show(source), "true");
}

#[test]
fn test_slot_helpers() {
    let mut runner = Runner::new();
    runner.show("let o = Object.clone(); o.a = 1; o.b = 2;");
    assert_eq!(runner.show("slot_names(o);"), "[\"a\", \"b\"]");
    assert_eq!(runner.show("get_slot(o, \"a\");"), "1");
    assert_eq!(runner.show("set_slot(o, \"c\", 3);"), "3");
    assert_eq!(runner.show("o.c;"), "3");
}

#[test]
fn test_inspect_of_plain_object_is_labelled() {
    let rendered = show("Object.clone();");
    assert!(rendered.starts_with("[Object 0x"), "{rendered}");
}

#[test]
fn test_throw_custom_error() {
    assert_eq!(
        fail("Error.new(\"kaboom\").throw();"),
        "kaboom"
    );
}

#[test]
fn test_number_string_methods_via_slots() {
    // Operator slots exist on the builtin prototypes too.
    assert_eq!(show("get_slot(Number, \"+\").call(1, 2);"), "3");
    assert_eq!(show("get_slot(String, \"+\").call(\"a\", \"b\");"), "\"ab\"");
}

#[test]
fn test_number_coercion() {
    assert_eq!(show("Number.new(\"42\") + 0;"), "42");
    assert_eq!(show("String.new(7) + \"\";"), "\"7\"");
    assert_eq!(fail("Number.new(\"xyz\");"), "cannot convert \"xyz\" to a number");
}

#[test]
fn test_hash_method_is_53_bit_number() {
    let mut runner = Runner::new();
    assert_eq!(runner.show("\"a\".hash() == \"a\".hash();"), "true");
    assert_eq!(runner.show("(1).hash() == (1).hash();"), "true");
    assert_eq!(runner.show("\"a\".hash() < 9007199254740992;"), "true");
    assert_eq!(runner.show("\"a\".hash() >= 0;"), "true");
}
