use crate::runtime::value::Value;

/// Builtin names are resolved ahead of any user-scope lookup when they
/// appear as a bare call target.
pub fn is_builtin(name: &str) -> bool {
    matches!(name, "print" | "str")
}

/// Invokes a builtin. Both builtins are infallible and both stay inside
/// the closed value set; `str` in particular re-wraps its rendering as
/// a `Str` value so the result is bindable like any other.
pub fn call(name: &str, args: &[Value]) -> Option<Value> {
    match name {
        "print" => {
            let rendered: Vec<String> = args.iter().map(Value::render).collect();
            println!("{}", rendered.join(" "));
            Some(Value::None)
        }
        "str" => {
            let value = args.first().cloned().unwrap_or(Value::None);
            Some(Value::Str(value.render()))
        }
        _ => None,
    }
}
