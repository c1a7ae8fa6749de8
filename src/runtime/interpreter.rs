use crate::language::ast::{
    Assign, AttributeExpr, CallExpr, ClassDef, Expr, FunctionDef, Module, Number, Stmt,
};
use crate::runtime::{
    builtins,
    environment::Environment,
    error::{RuntimeError, RuntimeResult},
    value::{BoundMethod, ClassValue, CoreClasses, FunctionValue, Instance, Value},
};
use std::collections::HashMap;
use std::rc::Rc;

pub struct Interpreter {
    env: Environment,
    core: CoreClasses,
    /// When set, attribute resolution walks the base-class chain instead
    /// of stopping at a class's own methods.
    inherited_lookup: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let core = CoreClasses::new();
        let mut env = Environment::new();
        env.bind("object", Value::Class(core.object.clone()));
        env.bind("int", Value::Class(core.int.clone()));
        env.bind("str", Value::Class(core.str.clone()));
        env.bind("bool", Value::Class(core.bool.clone()));
        env.bind("None", Value::None);
        Self {
            env,
            core,
            inherited_lookup: false,
        }
    }

    /// Opt-in deviation from the default single-level method lookup:
    /// methods defined on a base class become reachable through
    /// instances of its subclasses.
    pub fn with_inherited_lookup(mut self, enabled: bool) -> Self {
        self.inherited_lookup = enabled;
        self
    }

    /// Executes a module's top-level statements in order against the
    /// root scope, discarding their results.
    pub fn run(&mut self, module: &Module) -> RuntimeResult<()> {
        for stmt in &module.body {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Resolves a name through the current scope chain.
    pub fn lookup(&self, name: &str) -> RuntimeResult<Value> {
        self.env.lookup(name)
    }

    /// Current scope-chain depth; 1 when only the root scope is live.
    pub fn scope_depth(&self) -> usize {
        self.env.depth()
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> RuntimeResult<Value> {
        match stmt {
            Stmt::FunctionDef(def) => self.exec_function_def(def),
            Stmt::ClassDef(def) => self.exec_class_def(def),
            Stmt::Assign(assign) => self.exec_assign(assign),
            Stmt::Expr(stmt) => self.eval_expr(&stmt.value),
        }
    }

    fn exec_function_def(&mut self, def: &FunctionDef) -> RuntimeResult<Value> {
        let function = Rc::new(FunctionValue {
            label: def.name.clone(),
            params: def.params.clone(),
            body: def.body.clone(),
            owner: None,
        });
        self.env.bind_root(&def.name, Value::Function(function));
        Ok(Value::None)
    }

    fn exec_class_def(&mut self, def: &ClassDef) -> RuntimeResult<Value> {
        if def.bases.len() > 1 {
            return Err(RuntimeError::TooManyBases);
        }
        let base = match def.bases.first() {
            Some(base) => match self.env.lookup(&base.name)? {
                Value::Class(class) => Some(class),
                _ => {
                    return Err(RuntimeError::BaseNotClass {
                        name: base.name.clone(),
                    })
                }
            },
            None => None,
        };

        let class = ClassValue::new(def.name.as_str(), base);
        for stmt in &def.body {
            let Stmt::FunctionDef(method) = stmt else {
                return Err(RuntimeError::UnsupportedClassMember);
            };
            let function = Rc::new(FunctionValue {
                label: method.name.clone(),
                params: method.params.clone(),
                body: method.body.clone(),
                owner: Some(class.clone()),
            });
            class.define_method(method.name.as_str(), function);
        }
        self.env.bind_root(&def.name, Value::Class(class));
        Ok(Value::None)
    }

    fn exec_assign(&mut self, assign: &Assign) -> RuntimeResult<Value> {
        if assign.targets.len() > 1 {
            return Err(RuntimeError::UnsupportedMultiAssign);
        }
        let value = self.eval_expr(&assign.value)?;
        match assign.targets.first() {
            Some(Expr::Name(name)) => self.env.bind(&name.id, value),
            Some(Expr::Attribute(attr)) => {
                let object = self.eval_expr(&attr.value)?;
                let Value::Instance(instance) = object else {
                    return Err(RuntimeError::UnsupportedAssignTarget);
                };
                instance.set_field(attr.attr.as_str(), value);
            }
            _ => return Err(RuntimeError::UnsupportedAssignTarget),
        }
        Ok(Value::None)
    }

    fn eval_expr(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Num(num) => match num.value {
                Number::Int(n) => Ok(Value::Int(n)),
                Number::Float(_) => Err(RuntimeError::UnsupportedLiteral),
            },
            Expr::Name(name) => self.env.lookup(&name.id),
            Expr::Attribute(attr) => self.eval_attribute(attr),
            Expr::Call(call) => self.eval_call(call),
        }
    }

    fn eval_call(&mut self, call: &CallExpr) -> RuntimeResult<Value> {
        // Builtins win over any user binding of the same bare name.
        if let Expr::Name(name) = call.func.as_ref() {
            if builtins::is_builtin(&name.id) {
                let args = self.eval_args(&call.args)?;
                if let Some(value) = builtins::call(&name.id, &args) {
                    return Ok(value);
                }
            }
        }

        match self.eval_expr(&call.func)? {
            Value::Function(function) => {
                let args = self.eval_args(&call.args)?;
                let bindings = zip_params(&function.params, args);
                self.call_function(&function, bindings)
            }
            Value::BoundMethod(method) => {
                let args = self.eval_args(&call.args)?;
                let bindings = zip_method_params(&method, args);
                self.call_function(&method.function, bindings)
            }
            Value::Class(class) => {
                let args = self.eval_args(&call.args)?;
                let instance = Instance::new(class.clone());
                if let Some(init) = self.method_on(&class, "__init__") {
                    let receiver = BoundMethod {
                        receiver: Box::new(Value::Instance(instance.clone())),
                        function: init.clone(),
                    };
                    let bindings = zip_method_params(&receiver, args);
                    // Whatever __init__ evaluates to is discarded; the
                    // constructed instance is always the call's result.
                    self.call_function(&init, bindings)?;
                }
                Ok(Value::Instance(instance))
            }
            _ => Err(RuntimeError::NotCallable),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> RuntimeResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Runs a function body in a fresh frame chained at the caller's
    /// current scope. The frame is dropped on every exit path, so a
    /// failing body cannot leak scope depth.
    fn call_function(
        &mut self,
        function: &FunctionValue,
        bindings: HashMap<String, Value>,
    ) -> RuntimeResult<Value> {
        let depth = self.env.push_frame(bindings);
        let result = self.run_body(&function.body);
        self.env.restore(depth);
        result
    }

    /// A statement sequence's result is the value of its final statement.
    fn run_body(&mut self, body: &[Stmt]) -> RuntimeResult<Value> {
        let mut last = Value::None;
        for stmt in body {
            last = self.exec_stmt(stmt)?;
        }
        Ok(last)
    }

    fn eval_attribute(&mut self, attr: &AttributeExpr) -> RuntimeResult<Value> {
        let object = self.eval_expr(&attr.value)?;

        if let Value::Instance(instance) = &object {
            if let Some(value) = instance.get_field(&attr.attr) {
                return Ok(value);
            }
        }

        // Attribute access chained off a function or bound-method value
        // resolves through the owning class, with the function value
        // itself as the receiver.
        let owner = match &object {
            Value::Function(function) => function.owner.clone(),
            Value::BoundMethod(method) => method.function.owner.clone(),
            _ => None,
        };
        if let Some(owner) = owner {
            if let Some(method) = self.method_on(&owner, &attr.attr) {
                return Ok(Value::BoundMethod(BoundMethod {
                    receiver: Box::new(object.clone()),
                    function: method,
                }));
            }
        }

        let class = self.core.type_of(&object);
        if let Some(method) = self.method_on(&class, &attr.attr) {
            return Ok(Value::BoundMethod(BoundMethod {
                receiver: Box::new(object),
                function: method,
            }));
        }

        Err(RuntimeError::NoSuchAttribute {
            name: attr.attr.clone(),
        })
    }

    fn method_on(&self, class: &Rc<ClassValue>, name: &str) -> Option<Rc<FunctionValue>> {
        if self.inherited_lookup {
            class.method_with_bases(name)
        } else {
            class.own_method(name)
        }
    }
}

/// Pairwise zip of parameter names against arguments, exactly like the
/// call-frame construction this models: extra arguments are dropped and
/// missing parameters are left unbound.
fn zip_params(params: &[String], args: Vec<Value>) -> HashMap<String, Value> {
    params.iter().cloned().zip(args).collect()
}

/// Method frames bind the first parameter to the receiver and zip the
/// rest against the call arguments.
fn zip_method_params(method: &BoundMethod, args: Vec<Value>) -> HashMap<String, Value> {
    let mut params = method.function.params.iter();
    let mut bindings = HashMap::new();
    if let Some(first) = params.next() {
        bindings.insert(first.clone(), (*method.receiver).clone());
    }
    for (param, arg) in params.zip(args) {
        bindings.insert(param.clone(), arg);
    }
    bindings
}
