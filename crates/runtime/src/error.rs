use crate::{DisplayContext, LValue, Module, Ptr};
use std::{error, fmt};
use thiserror::Error as ThisError;

/// The different error types that can be produced by the Lute runtime
#[derive(ThisError, Clone)]
#[allow(missing_docs)]
pub(crate) enum ErrorKind {
    #[error("{0}")]
    StringError(String),
    /// An error thrown by a Lute script
    ///
    /// The thrown value is rendered when the error is displayed, and is the payload that a
    /// `catch` construct wraps into an error value.
    #[error("{}", display_thrown_value(thrown_value))]
    Thrown { thrown_value: LValue },
    #[error("expected {expected}, found {}", get_value_types(unexpected))]
    UnexpectedType {
        expected: String,
        unexpected: Vec<LValue>,
    },
}

fn display_thrown_value(value: &LValue) -> String {
    let mut ctx = DisplayContext::default();
    value.display(&mut ctx);
    ctx.result()
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// An error produced by the Lute runtime
#[derive(Clone, Debug)]
pub struct Error {
    pub(crate) error: ErrorKind,
    pub(crate) trace: Vec<ErrorFrame>,
}

impl Error {
    /// Initializes an error with the given internal error type
    pub(crate) fn new(error: ErrorKind) -> Self {
        Self {
            error,
            trace: Vec::new(),
        }
    }

    /// Initializes an error from a thrown Lute value
    pub fn from_thrown_value(thrown_value: LValue) -> Self {
        Self::new(ErrorKind::Thrown { thrown_value })
    }

    /// Extends the error's call trace with the given [Module] and instruction index
    ///
    /// The dispatcher calls this while unwinding so that the error carries a frame for each
    /// call that was in flight when the error was thrown.
    pub fn extend_trace(&mut self, module: Ptr<Module>, instruction: u32) {
        self.trace.push(ErrorFrame {
            module,
            instruction,
        });
    }

    /// Modifies string errors to include the given prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        use ErrorKind::StringError;

        self.error = match self.error {
            StringError(message) => StringError(format!("{prefix}: {message}")),
            other => other,
        };

        self
    }

    /// Returns the error as a Lute value, suitable for a `catch` construct
    ///
    /// Thrown values are returned as-is, other errors are converted into their message string.
    pub fn to_error_value(&self) -> LValue {
        match &self.error {
            ErrorKind::Thrown { thrown_value } => thrown_value.clone(),
            other => LValue::from(other.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        for ErrorFrame {
            module,
            instruction,
        } in self.trace.iter()
        {
            write!(f, "\n--- in {} at instruction {instruction}", module.name())?;
        }

        Ok(())
    }
}

impl error::Error for Error {}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Self::new(ErrorKind::StringError(error))
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Self::new(ErrorKind::StringError(error.into()))
    }
}

impl From<ErrorKind> for Error {
    fn from(error: ErrorKind) -> Self {
        Self::new(error)
    }
}

/// A module and instruction index in a call stack where an error was thrown
#[derive(Clone, Debug)]
pub struct ErrorFrame {
    module: Ptr<Module>,
    instruction: u32,
}

/// The Result type used by the Lute runtime
pub type Result<T> = std::result::Result<T, Error>;

/// Creates a [crate::Error] from a message (with format-like behaviour), wrapped in `Err`
///
/// Wrapping the result in `Err` is a convenience for functions that need to return immediately
/// when an error has occured.
#[macro_export]
macro_rules! runtime_error {
    ($error:literal) => {
        Err($crate::Error::from(format!($error)))
    };
    ($error:expr) => {
        Err($crate::Error::from($error))
    };
    ($error:literal, $($y:expr),+ $(,)?) => {
        Err($crate::Error::from(format!($error, $($y),+)))
    };
}

/// Creates an error that describes a type mismatch
pub fn unexpected_type<T>(expected_str: &str, unexpected: &LValue) -> Result<T> {
    unexpected_type_with_slice(expected_str, &[unexpected.clone()])
}

/// Creates an error that describes a type mismatch with a slice of [LValue]s
pub fn unexpected_type_with_slice<T>(expected_str: &str, unexpected: &[LValue]) -> Result<T> {
    runtime_error!(ErrorKind::UnexpectedType {
        expected: expected_str.into(),
        unexpected: unexpected.into(),
    })
}

fn get_value_types(values: &[LValue]) -> String {
    match values {
        [] => "no args".to_string(),
        [single_value] => single_value.type_as_string().to_string(),
        _ => {
            let mut types = String::from('(');
            let mut first = true;
            for value in values {
                if !first {
                    types.push_str(", ");
                }
                first = false;
                types.push_str(&value.type_as_string());
            }
            types.push(')');
            types
        }
    }
}
