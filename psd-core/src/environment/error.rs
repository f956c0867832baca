use crate::utils::prelude::SrcSpan;

use super::value::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    UndefinedVariable { name: String },
    Redeclaration { name: String },
    ConstantReassignment { name: String },
    WholeArrayAssignment { name: String },
    TypeMismatch {
        name: String,
        expected: ValueType,
        got: &'static str,
    },
    NotAnArray { name: String },
    IndexCountMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    IndexOutOfBounds {
        name: String,
        index: i64,
    },
    NonIntegerIndex { name: String },
    InvalidDimension,
    ConstArrayDeclaration,
    DivisionByZero,
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    InvalidAddOperands,
    ForBoundsNotNumeric,
    FormatNotText,
    InputExhausted,
    InputParse {
        raw: String,
        expected: ValueType,
    },
    InvalidInputTarget,
    InvalidCallTarget,
    UnknownFunction { name: String },
    WrongArity {
        function: &'static str,
        expected: usize,
    },
    InvalidLengthOperand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub span: SrcSpan
}

impl RuntimeError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            RuntimeErrorType::UndefinedVariable { name } => {
                (format!("Variable `{name}` is not defined"), vec![])
            },
            RuntimeErrorType::Redeclaration { name } => {
                (format!("`{name}` is already defined in this scope"), vec![])
            },
            RuntimeErrorType::ConstantReassignment { name } => {
                (format!("Cannot change the value of constant `{name}`"), vec![])
            },
            RuntimeErrorType::WholeArrayAssignment { name } => {
                (
                    format!("Cannot assign to the whole array `{name}`"),
                    vec!["Assign to an indexed element instead".to_string()]
                )
            },
            RuntimeErrorType::TypeMismatch { name, expected, got } => {
                (
                    "Type mismatch".to_string(),
                    vec![format!("`{name}` is declared `{expected}` but was given a `{got}` value")]
                )
            },
            RuntimeErrorType::NotAnArray { name } => {
                (format!("`{name}` is not an array"), vec![])
            },
            RuntimeErrorType::IndexCountMismatch { name, expected, got } => {
                (
                    "Wrong number of indices".to_string(),
                    vec![format!("`{name}` has {expected} dimension(s) but {got} index(es) were given")]
                )
            },
            RuntimeErrorType::IndexOutOfBounds { name, index } => {
                (format!("Index [{index}] is out of bounds for `{name}`"), vec![])
            },
            RuntimeErrorType::NonIntegerIndex { name } => {
                (format!("Indices of `{name}` must be integers"), vec![])
            },
            RuntimeErrorType::InvalidDimension => {
                ("Array dimensions must be positive integers".to_string(), vec![])
            },
            RuntimeErrorType::ConstArrayDeclaration => {
                ("Constant arrays are not supported".to_string(), vec![])
            },
            RuntimeErrorType::DivisionByZero => {
                ("Division by zero".to_string(), vec![])
            },
            RuntimeErrorType::OperandMustBeNumber => {
                ("Operand must be a number".to_string(), vec![])
            },
            RuntimeErrorType::OperandsMustBeNumbers => {
                ("Both operands must be numbers".to_string(), vec![])
            },
            RuntimeErrorType::InvalidAddOperands => {
                ("Operator `+` only combines numbers or text".to_string(), vec![])
            },
            RuntimeErrorType::ForBoundsNotNumeric => {
                ("The bounds of a for loop must be numbers".to_string(), vec![])
            },
            RuntimeErrorType::FormatNotText => {
                ("The first argument of outputf must be a format string".to_string(), vec![])
            },
            RuntimeErrorType::InputExhausted => {
                ("Not enough input for every target".to_string(), vec![])
            },
            RuntimeErrorType::InputParse { raw, expected } => {
                (format!("Input `{raw}` is not a valid {expected}"), vec![])
            },
            RuntimeErrorType::InvalidInputTarget => {
                ("Input targets must be variables or array elements".to_string(), vec![])
            },
            RuntimeErrorType::InvalidCallTarget => {
                ("Only named functions can be called".to_string(), vec![])
            },
            RuntimeErrorType::UnknownFunction { name } => {
                (format!("Function `{name}` is not defined"), vec![])
            },
            RuntimeErrorType::WrongArity { function, expected } => {
                (format!("Function {function}() expects {expected} argument(s)"), vec![])
            },
            RuntimeErrorType::InvalidLengthOperand => {
                ("Function length() only accepts text or an array".to_string(), vec![])
            }
        }
    }
}

pub fn runtime_error<T>(error: RuntimeErrorType, span: SrcSpan) -> Result<T, RuntimeError> {
    Err(RuntimeError { error, span })
}
