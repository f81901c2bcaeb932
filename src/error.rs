//! The error taxonomy shared by every stage of the pipeline.
//!
//! Each variant corresponds to one of the categories in the error taxonomy:
//! lexical, syntax, scope, type, arithmetic, overflow, and runtime errors.
//! Scanner and parser errors are collected rather than propagated immediately
//! (see [`crate::diagnostic`]); VM errors are returned directly and end the
//! run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("missing '{0}'")]
    MissingDelimiter(&'static str),

    #[error("expected a type name after ':'")]
    MissingTypeAnnotation,

    #[error("variable already exists in current scope: {0}")]
    RedeclaredVariable(String),

    #[error("undefined variable: {0}")]
    UnknownVariable(String),

    #[error("cannot exit the global scope")]
    GlobalScopeExit,

    #[error("return outside of a function body")]
    ReturnOutsideFunction,

    #[error("incompatible types for operation: {lhs} and {rhs}")]
    IncompatibleTypes { lhs: String, rhs: String },

    #[error("cannot convert {from} to {to}")]
    ConversionNotPermitted { from: String, to: String },

    #[error("invalid numeric literal '{0}' for conversion to {1}")]
    MalformedNumericLiteral(String, String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulus by zero")]
    ModulusByZero,

    #[error("integer conversion out of range: {value} does not fit in {target}")]
    IntegerOverflow { value: String, target: String },

    #[error("stack underflow")]
    StackUnderflow,

    #[error("unknown opcode at instruction {0}")]
    UnknownOpcode(usize),

    #[error("call to undefined function: {0}")]
    MissingFunction(String),

    #[error("jump target {0} is out of bounds")]
    MissingJumpTarget(u32),

    #[error("instruction limit of {0} exceeded")]
    InstructionLimitExceeded(u64),

    #[error("recursion limit of {0} exceeded")]
    RecursionLimitExceeded(usize),

    #[error("fell off the end of the program without HALT")]
    FellThrough,
}

impl Error {
    /// The diagnostic stage this error belongs to, per the taxonomy in the
    /// error-handling design.
    pub fn stage(&self) -> crate::diagnostic::Stage {
        use crate::diagnostic::Stage;
        match self {
            Error::InvalidCharacter(_) | Error::UnterminatedString => Stage::Lexical,
            Error::UnexpectedToken(_)
            | Error::MissingDelimiter(_)
            | Error::MissingTypeAnnotation => Stage::Syntax,
            Error::RedeclaredVariable(_)
            | Error::UnknownVariable(_)
            | Error::GlobalScopeExit
            | Error::ReturnOutsideFunction => Stage::Semantic,
            Error::IncompatibleTypes { .. }
            | Error::ConversionNotPermitted { .. }
            | Error::MalformedNumericLiteral(..)
            | Error::IntegerOverflow { .. } => Stage::Semantic,
            _ => Stage::Interpreting,
        }
    }
}
