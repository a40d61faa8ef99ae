//! Error types for tinsel operations.

use thiserror::Error;

use crate::tokenizer::TokenKind;

/// Errors that can occur while tokenizing, parsing, or evaluating CSS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The tokenizer hit a malformed lexical construct.
    #[error("lexical error at line {line}: {message}")]
    Lexical { message: String, line: u32 },

    /// A token was rejected by the current parser state. Fatal to the
    /// whole parse call; no resynchronization is attempted.
    #[error("syntax error at line {line}: unexpected token {token} in state {state}")]
    Syntax {
        state: &'static str,
        token: TokenKind,
        line: u32,
    },

    /// A value function was called that the evaluator does not know.
    #[error("undefined function: {0}")]
    UndefinedFunction(String),

    /// A value function was called with the wrong number of arguments.
    #[error("incorrect # of arguments for {0}()")]
    Arity(&'static str),

    /// A value could not be interpreted as a number.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// A declaration was evaluated without any value component.
    #[error("declaration has no value")]
    MissingValue,
}

pub type Result<T> = std::result::Result<T, Error>;
