use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Every runtime failure is fatal to the current evaluation; errors
/// propagate outward through the call chain without being caught.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RuntimeError {
    #[error("`{name}` missing")]
    NameNotFound { name: String },
    #[error("A class may declare at most one base")]
    TooManyBases,
    #[error("Class bodies may only contain function definitions")]
    UnsupportedClassMember,
    #[error("Multiple assignment targets are not supported")]
    UnsupportedMultiAssign,
    #[error("Cannot assign to this expression")]
    UnsupportedAssignTarget,
    #[error("Only integer literals are supported")]
    UnsupportedLiteral,
    #[error("Value is not callable")]
    NotCallable,
    #[error("No attribute `{name}`")]
    NoSuchAttribute { name: String },
    #[error("Base `{name}` is not a class")]
    BaseNotClass { name: String },
}
