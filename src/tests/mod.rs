//! End-to-end interpreter tests: parse a source string, run it against
//! a fresh interpreter, and inspect the resulting bindings.

use crate::language::parser::parse_module;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;
use crate::runtime::Interpreter;

fn run(source: &str) -> Interpreter {
    let module = parse_module(source).expect("program should parse");
    let mut interpreter = Interpreter::new();
    interpreter.run(&module).expect("program should run");
    interpreter
}

fn run_err(source: &str) -> (Interpreter, RuntimeError) {
    let module = parse_module(source).expect("program should parse");
    let mut interpreter = Interpreter::new();
    let err = interpreter.run(&module).expect_err("program should fail");
    (interpreter, err)
}

fn lookup(interpreter: &Interpreter, name: &str) -> Value {
    interpreter.lookup(name).expect("binding should exist")
}

#[test]
fn function_call_results_are_stable() {
    let interpreter = run(concat!(
        "def identity(a):\n",
        "    a\n",
        "x = identity(2)\n",
        "y = identity(2)\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(2));
    assert_eq!(lookup(&interpreter, "x"), lookup(&interpreter, "y"));
}

#[test]
fn assignment_never_mutates_outer_binding() {
    let interpreter = run(concat!(
        "x = 1\n",
        "def shadow():\n",
        "    x = 2\n",
        "shadow()\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(1));
}

#[test]
fn attribute_write_then_read_round_trips() {
    let interpreter = run(concat!(
        "class Box():\n",
        "    def __init__(self, n):\n",
        "        self.n = n\n",
        "b = Box(1)\n",
        "b.extra = 7\n",
        "x = b.extra\n",
        "y = b.n\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(7));
    assert_eq!(lookup(&interpreter, "y"), Value::Int(1));
}

#[test]
fn constructor_always_returns_the_instance() {
    let interpreter = run(concat!(
        "class A():\n",
        "    def __init__(self, n):\n",
        "        self.n = n\n",
        "a = A(2)\n",
        "n = A(2).n\n",
    ));
    // __init__'s last statement is an assignment, which yields None; the
    // constructor result must be the instance regardless.
    assert_eq!(lookup(&interpreter, "a").render(), "object<A>");
    assert_eq!(lookup(&interpreter, "n"), Value::Int(2));
}

#[test]
fn calling_an_undefined_name_fails() {
    let (_, err) = run_err("zzz()\n");
    assert_eq!(err, RuntimeError::NameNotFound { name: "zzz".into() });
}

#[test]
fn method_dispatch_binds_the_receiver() {
    let interpreter = run(concat!(
        "class A():\n",
        "    def __init__(self, n):\n",
        "        self.n = n\n",
        "    def a(self):\n",
        "        self.n\n",
        "x = A(5).a()\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(5));
}

#[test]
fn scope_depth_is_restored_when_a_call_fails() {
    let (interpreter, err) = run_err(concat!(
        "def boom():\n",
        "    zzz\n",
        "boom()\n",
    ));
    assert_eq!(err, RuntimeError::NameNotFound { name: "zzz".into() });
    assert_eq!(interpreter.scope_depth(), 1);
}

#[test]
fn nested_call_failure_unwinds_every_frame() {
    let (interpreter, _) = run_err(concat!(
        "def inner():\n",
        "    missing.attr\n",
        "def outer():\n",
        "    inner()\n",
        "outer()\n",
    ));
    assert_eq!(interpreter.scope_depth(), 1);
}

#[test]
fn str_builtin_returns_a_bindable_string_value() {
    let interpreter = run(concat!(
        "s = str(5)\n",
        "t = str(s)\n",
    ));
    assert_eq!(lookup(&interpreter, "s"), Value::Str("5".into()));
    assert_eq!(lookup(&interpreter, "s").render(), "'5'");
    assert_eq!(lookup(&interpreter, "t"), Value::Str("'5'".into()));
}

#[test]
fn builtins_shadow_user_definitions() {
    let interpreter = run(concat!(
        "def str(x):\n",
        "    x\n",
        "y = str(7)\n",
    ));
    assert_eq!(lookup(&interpreter, "y"), Value::Str("7".into()));
}

#[test]
fn print_yields_none_value() {
    let interpreter = run("x = print(1, 2)\n");
    assert_eq!(lookup(&interpreter, "x"), Value::None);
}

#[test]
fn statement_results_default_to_none() {
    let interpreter = run(concat!(
        "def assigns(n):\n",
        "    x = n\n",
        "r = assigns(3)\n",
    ));
    assert_eq!(lookup(&interpreter, "r"), Value::None);
}

#[test]
fn definitions_register_in_the_root_scope() {
    let interpreter = run(concat!(
        "def outer():\n",
        "    def inner():\n",
        "        3\n",
        "outer()\n",
        "x = inner()\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(3));
}

#[test]
fn free_functions_chain_at_the_callers_scope() {
    // No closures: a callee sees the caller's bindings, not its
    // definition environment.
    let interpreter = run(concat!(
        "def show():\n",
        "    y\n",
        "def wrapper():\n",
        "    y = 7\n",
        "    show()\n",
        "x = wrapper()\n",
    ));
    assert_eq!(lookup(&interpreter, "x"), Value::Int(7));
}

#[test]
fn root_scope_holds_builtin_singletons() {
    let interpreter = run("");
    assert_eq!(lookup(&interpreter, "int").render(), "class<int>");
    assert_eq!(lookup(&interpreter, "object").render(), "class<object>");
    assert_eq!(lookup(&interpreter, "str").render(), "class<str>");
    assert_eq!(lookup(&interpreter, "bool").render(), "class<bool>");
    assert_eq!(lookup(&interpreter, "None"), Value::None);
}

#[test]
fn inherited_methods_are_invisible_by_default() {
    let (_, err) = run_err(concat!(
        "class Base():\n",
        "    def value(self):\n",
        "        self.n\n",
        "class Child(Base):\n",
        "    def __init__(self, n):\n",
        "        self.n = n\n",
        "x = Child(3).value()\n",
    ));
    assert_eq!(err, RuntimeError::NoSuchAttribute { name: "value".into() });
}

#[test]
fn inherited_lookup_mode_walks_the_base_chain() {
    let module = parse_module(concat!(
        "class Base():\n",
        "    def value(self):\n",
        "        self.n\n",
        "class Child(Base):\n",
        "    def __init__(self, n):\n",
        "        self.n = n\n",
        "x = Child(3).value()\n",
    ))
    .expect("program should parse");
    let mut interpreter = Interpreter::new().with_inherited_lookup(true);
    interpreter.run(&module).expect("program should run");
    assert_eq!(lookup(&interpreter, "x"), Value::Int(3));
}

#[test]
fn more_than_one_base_is_rejected() {
    let (_, err) = run_err(concat!(
        "class A():\n",
        "    def a(self):\n",
        "        self\n",
        "class B():\n",
        "    def b(self):\n",
        "        self\n",
        "class C(A, B):\n",
        "    def c(self):\n",
        "        self\n",
    ));
    assert_eq!(err, RuntimeError::TooManyBases);
}

#[test]
fn non_class_base_is_rejected() {
    let (_, err) = run_err(concat!(
        "x = 1\n",
        "class C(x):\n",
        "    def c(self):\n",
        "        self\n",
    ));
    assert_eq!(err, RuntimeError::BaseNotClass { name: "x".into() });
}

#[test]
fn non_function_class_member_is_rejected() {
    let (_, err) = run_err(concat!(
        "class C():\n",
        "    x = 1\n",
    ));
    assert_eq!(err, RuntimeError::UnsupportedClassMember);
}

#[test]
fn chained_assignment_is_rejected() {
    let (_, err) = run_err("a = b = 2\n");
    assert_eq!(err, RuntimeError::UnsupportedMultiAssign);
}

#[test]
fn float_literals_are_rejected_at_evaluation() {
    let (_, err) = run_err("x = 1.5\n");
    assert_eq!(err, RuntimeError::UnsupportedLiteral);
}

#[test]
fn calling_a_non_callable_value_fails() {
    let (_, err) = run_err(concat!(
        "x = 1\n",
        "x()\n",
    ));
    assert_eq!(err, RuntimeError::NotCallable);
}

#[test]
fn attribute_assignment_needs_a_field_map() {
    let (_, err) = run_err(concat!(
        "x = 1\n",
        "x.n = 2\n",
    ));
    assert_eq!(err, RuntimeError::UnsupportedAssignTarget);
}

#[test]
fn missing_attribute_is_reported() {
    let (_, err) = run_err(concat!(
        "class A():\n",
        "    def a(self):\n",
        "        self\n",
        "A().missing\n",
    ));
    assert_eq!(err, RuntimeError::NoSuchAttribute { name: "missing".into() });
}

#[test]
fn class_values_have_the_metaclass_tag() {
    // Attribute lookup on the class itself goes through the metaclass,
    // which defines no methods.
    let (_, err) = run_err(concat!(
        "class A():\n",
        "    def a(self):\n",
        "        self\n",
        "A.a\n",
    ));
    assert_eq!(err, RuntimeError::NoSuchAttribute { name: "a".into() });
}

#[test]
fn interpreter_stays_usable_after_an_error() {
    let (mut interpreter, _) = run_err(concat!(
        "x = 1\n",
        "zzz()\n",
    ));
    let module = parse_module("y = x\n").expect("program should parse");
    interpreter.run(&module).expect("second run should succeed");
    assert_eq!(lookup(&interpreter, "y"), Value::Int(1));
}
