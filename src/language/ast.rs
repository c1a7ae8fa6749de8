use crate::language::span::Span;

/// Root node produced by the parser; the interpreter executes its body
/// statements in order.
#[derive(Clone, Debug)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Assign(Assign),
    Expr(ExprStmt),
}

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Class bodies are arbitrary statements here; the interpreter rejects
/// anything other than function definitions. The same goes for base
/// counts: the parser accepts any number, the interpreter allows at
/// most one.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Identifier>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ExprStmt {
    pub value: Expr,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Name(NameExpr),
    Num(NumExpr),
    Call(CallExpr),
    Attribute(AttributeExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Name(expr) => expr.span,
            Expr::Num(expr) => expr.span,
            Expr::Call(expr) => expr.span,
            Expr::Attribute(expr) => expr.span,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NameExpr {
    pub id: String,
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Clone, Debug)]
pub struct NumExpr {
    pub value: Number,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct AttributeExpr {
    pub value: Box<Expr>,
    pub attr: String,
    pub span: Span,
}
