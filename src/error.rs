// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

/// The main error type for ICL lexing, parsing, encoding and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IclError {
    /// Raised for characters the lexer has no token for.
    #[error("illegal character '{character}' at {line}:{column}")]
    IllegalCharacter {
        character: char,
        line: usize,
        column: usize,
    },

    /// Raised when a string literal is not closed before the end of input.
    #[error("unterminated string at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unexpected token: expected({expected}) found({found}) -- [line({line}) pos({column})]")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("no prefix parser found for {token} -- [line({line}) pos({column})]")]
    NoPrefixParser {
        token: String,
        line: usize,
        column: usize,
    },

    /// Every error the parser recorded while reading one document.
    #[error("{} syntax error(s): {}", .errors.len(), join_errors(.errors))]
    Syntax { errors: Vec<IclError> },

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// A field annotation whose key carries a malformed precision suffix.
    #[error("invalid icl key: {key}")]
    InvalidKey { key: String },

    #[error("invalid {expected} type {found}")]
    FieldShapeMismatch { expected: String, found: String },

    #[error("value {raw} out of range for {kind}")]
    NumericOutOfRange { raw: String, kind: String },

    #[error("cannot parse {raw:?} as {kind}")]
    InvalidNumber { raw: String, kind: String },

    #[error("map keys must be a string or identifier")]
    MapKeyType,

    #[error("multiple \"{key}\" blocks found for field that is not a sequence")]
    DuplicateBlock { key: String },

    #[error("unsupported field shape: {shape}")]
    UnsupportedFieldShape { shape: String },

    #[error(".param field {field} must be a string")]
    NonStringParam { field: String },

    #[error("root record cannot contain .param field {field}")]
    ParamOutsideBlock { field: String },

    #[error("env() macro not allowed on {shape} field")]
    EnvNotAllowed { shape: String },

    /// Wraps a decode/encode failure with the dotted field path and the
    /// source position the engine was looking at.
    #[error("{path}: {source}\nline({line}) pos({column})")]
    Located {
        path: String,
        line: usize,
        column: usize,
        source: Box<IclError>,
    },

    #[error("export error: {message}")]
    Export { message: String },

    #[error("file error '{path}': {message}")]
    File { path: String, message: String },
}

impl IclError {
    pub fn is_located(&self) -> bool {
        matches!(self, IclError::Located { .. })
    }

    /// Strip any `Located` wrapper and return the underlying error.
    pub fn root_cause(&self) -> &IclError {
        match self {
            IclError::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn join_errors(errors: &[IclError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
