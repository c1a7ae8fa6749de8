use crate::language::ast::Stmt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The closed set of runtime values. Every expression evaluates to one
/// of these, and every name binding holds one; raw host scalars never
/// escape into the environment.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    None,
    Function(Rc<FunctionValue>),
    BoundMethod(BoundMethod),
    Class(Rc<ClassValue>),
    Instance(Instance),
}

pub struct FunctionValue {
    pub label: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    /// Set at definition time when the function was defined inside a
    /// class body; never changes afterwards.
    pub owner: Option<Rc<ClassValue>>,
}

impl FunctionValue {
    pub fn is_method(&self) -> bool {
        self.owner.is_some()
    }
}

/// A method paired with the receiver it was looked up on. Attribute
/// resolution produces these so the receiver travels as an ordinary
/// value instead of through interpreter-global state.
#[derive(Clone)]
pub struct BoundMethod {
    pub receiver: Box<Value>,
    pub function: Rc<FunctionValue>,
}

pub struct ClassValue {
    pub label: String,
    pub base: Option<Rc<ClassValue>>,
    methods: RefCell<HashMap<String, Rc<FunctionValue>>>,
}

impl ClassValue {
    pub fn new(label: impl Into<String>, base: Option<Rc<ClassValue>>) -> Rc<Self> {
        Rc::new(Self {
            label: label.into(),
            base,
            methods: RefCell::new(HashMap::new()),
        })
    }

    pub fn define_method(&self, name: impl Into<String>, function: Rc<FunctionValue>) {
        self.methods.borrow_mut().insert(name.into(), function);
    }

    /// Methods defined directly on this class; inherited methods are
    /// never materialized here.
    pub fn own_method(&self, name: &str) -> Option<Rc<FunctionValue>> {
        self.methods.borrow().get(name).cloned()
    }

    /// Single-inheritance walk, used only by the opt-in inherited
    /// lookup mode.
    pub fn method_with_bases(&self, name: &str) -> Option<Rc<FunctionValue>> {
        if let Some(method) = self.own_method(name) {
            return Some(method);
        }
        let mut current = self.base.clone();
        while let Some(class) = current {
            if let Some(method) = class.own_method(name) {
                return Some(method);
            }
            current = class.base.clone();
        }
        None
    }
}

#[derive(Clone)]
pub struct Instance {
    pub class: Rc<ClassValue>,
    pub fields: Rc<RefCell<HashMap<String, Value>>>,
}

impl Instance {
    pub fn new(class: Rc<ClassValue>) -> Self {
        Self {
            class,
            fields: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

impl Value {
    /// Deterministic textual form; never fails.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "'{v}'"),
            Value::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            Value::None => write!(f, "object<NoneType>"),
            Value::Function(function) => write!(f, "function<{}>", function.label),
            Value::BoundMethod(method) => write!(f, "function<{}>", method.function.label),
            Value::Class(class) => write!(f, "class<{}>", class.label),
            Value::Instance(instance) => write!(f, "object<{}>", instance.class.label),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                Rc::ptr_eq(&a.function, &b.function) && a.receiver == b.receiver
            }
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(&a.fields, &b.fields),
            _ => false,
        }
    }
}

/// The built-in class singletons, created once per interpreter and
/// shared by every value whose type tag refers to them.
pub struct CoreClasses {
    pub object: Rc<ClassValue>,
    pub int: Rc<ClassValue>,
    pub str: Rc<ClassValue>,
    pub bool: Rc<ClassValue>,
    pub none_type: Rc<ClassValue>,
    pub functype: Rc<ClassValue>,
    pub metaclass: Rc<ClassValue>,
}

impl Default for CoreClasses {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreClasses {
    pub fn new() -> Self {
        let object = ClassValue::new("object", None);
        let int = ClassValue::new("int", Some(object.clone()));
        let str = ClassValue::new("str", Some(object.clone()));
        let bool = ClassValue::new("bool", Some(object.clone()));
        let none_type = ClassValue::new("NoneType", Some(object.clone()));
        let functype = ClassValue::new("functype", None);
        let metaclass = ClassValue::new("type", None);
        Self {
            object,
            int,
            str,
            bool,
            none_type,
            functype,
            metaclass,
        }
    }

    /// The type tag of any value.
    pub fn type_of(&self, value: &Value) -> Rc<ClassValue> {
        match value {
            Value::Int(_) => self.int.clone(),
            Value::Str(_) => self.str.clone(),
            Value::Bool(_) => self.bool.clone(),
            Value::None => self.none_type.clone(),
            Value::Function(_) | Value::BoundMethod(_) => self.functype.clone(),
            Value::Class(_) => self.metaclass.clone(),
            Value::Instance(instance) => instance.class.clone(),
        }
    }
}
