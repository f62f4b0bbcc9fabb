//! Error handling.

use std::{error, fmt};

use crate::{Code, CodeSpan};

/// Kind of a symbol that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SymbolKind {
    /// Variable referenced by an expression.
    Variable,
    /// Function referenced by a call.
    Function,
    /// Binary (infix) operator.
    BinaryOperator,
    /// Unary operator preceding its operand.
    UnaryPrefixOperator,
    /// Unary operator following its operand.
    UnarySuffixOperator,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::BinaryOperator => "binary operator",
            Self::UnaryPrefixOperator => "unary prefix operator",
            Self::UnarySuffixOperator => "unary suffix operator",
        })
    }
}

/// Kind of an [`Error`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid character or malformed number literal.
    Tokenizer(String),

    /// Grammar mismatch, including premature end of input.
    UnexpectedToken(String),

    /// Variable, function or operator not found in the active context /
    /// configuration at evaluation time.
    UnresolvedReference {
        /// Name that failed to resolve.
        symbol: String,
        /// What the name was expected to denote.
        kind: SymbolKind,
    },

    /// Function invoked with the wrong number of arguments.
    InvalidArity {
        /// Name of the function.
        function: String,
        /// Number of arguments the function expects.
        expected: usize,
        /// Number of arguments the function was called with.
        actual: usize,
    },

    /// Any other evaluation-time failure (e.g., division by zero).
    Eval(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokenizer(message) | Self::UnexpectedToken(message) | Self::Eval(message) => {
                formatter.write_str(message)
            }
            Self::UnresolvedReference { symbol, kind } => {
                write!(formatter, "Unresolved reference to {kind} '{symbol}'")
            }
            Self::InvalidArity {
                function,
                expected,
                actual,
            } => write!(
                formatter,
                "Function '{function}' requires {expected} arguments, but got {actual}"
            ),
        }
    }
}

/// Error raised while tokenizing, parsing or evaluating an expression.
///
/// Carries the source buffer and the span that caused the failure; the
/// [`Display`](fmt::Display) output is the fully rendered report:
///
/// ```text
/// 00c872e7.fx: 1:21-1:28: Unresolved reference to variable 'an'
/// 1 | The line that caused an error within it.
///   |                      <^~~~~~>
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    span: CodeSpan,
    code: Code,
}

impl Error {
    /// Creates an error against the provided source buffer.
    pub fn new(kind: ErrorKind, span: CodeSpan, code: &Code) -> Self {
        Self {
            kind,
            span,
            code: code.clone(),
        }
    }

    /// Shorthand for a generic evaluation error. Intended for custom
    /// operators and functions that need to fail.
    pub fn eval(message: impl Into<String>, span: CodeSpan, code: &Code) -> Self {
        Self::new(ErrorKind::Eval(message.into()), span, code)
    }

    /// Kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Span this error points at.
    pub fn span(&self) -> CodeSpan {
        self.span
    }

    /// Source buffer this error was raised against.
    pub fn code(&self) -> &Code {
        &self.code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_pos = self.span.begin + self.span.length.saturating_sub(1);
        let (begin_line, begin_col) = self.code.line_col(self.span.begin).unwrap_or((1, 0));
        let (end_line, end_col) = self
            .code
            .line_col(last_pos)
            .unwrap_or((begin_line, begin_col));

        writeln!(
            formatter,
            "{}: {begin_line}:{begin_col}-{end_line}:{end_col}: {}",
            self.code.name(),
            self.kind
        )?;
        formatter.write_str(&self.span.preview(&self.code, 0))
    }
}

impl error::Error for Error {}

/// Error raised by [`Config`](crate::Config) manipulation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The named operator is not registered under the given fixity.
    UnknownOperator {
        /// Operator symbol.
        symbol: String,
        /// Fixity the operator was looked up under.
        kind: SymbolKind,
    },

    /// An operator with this symbol is already registered under the fixity.
    DuplicateOperator {
        /// Operator symbol.
        symbol: String,
        /// Fixity the operator was registered under.
        kind: SymbolKind,
    },

    /// The operator already occupies a precedence level and replacement was
    /// not requested.
    AlreadyAssigned {
        /// Operator symbol.
        symbol: String,
        /// Level the operator currently occupies.
        level: usize,
    },

    /// The requested precedence level does not exist.
    PrecedenceOutOfRange {
        /// Requested level.
        level: usize,
        /// Number of rows in the precedence table.
        rows: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOperator { symbol, kind } => {
                write!(formatter, "Cannot find {kind} `{symbol}`")
            }
            Self::DuplicateOperator { symbol, kind } => {
                write!(formatter, "Duplicate {kind} `{symbol}`")
            }
            Self::AlreadyAssigned { symbol, level } => write!(
                formatter,
                "Operator `{symbol}` already has precedence level {level}"
            ),
            Self::PrecedenceOutOfRange { level, rows } => write!(
                formatter,
                "Precedence level {level} is out of range for a table with {rows} row(s)"
            ),
        }
    }
}

impl error::Error for ConfigError {}

/// Error raised by [`Code`] position lookups for out-of-range inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// Byte position not covered by any line.
    Position(usize),
    /// 1-based line number outside the line table.
    Line(usize),
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(pos) => write!(formatter, "Position {pos} is out of range"),
            Self::Line(line) => write!(formatter, "Line number {line} is out of range"),
        }
    }
}

impl error::Error for OutOfRange {}
