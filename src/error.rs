use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Metric used before `create`, or context used before any record was decoded or merged.
    NotInitialized,
    /// The metric type has no such capability (e.g. `add` on an untyped metric).
    UnsupportedOperation,
    /// Label values don't match the declared label dimensions.
    LabelArity,
    /// Truncated or structurally invalid wire bytes.
    MalformedRecord,
    Encoding,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::NotInitialized => "not initialized",
            ErrorKind::UnsupportedOperation => "unsupported operation",
            ErrorKind::LabelArity => "label arity mismatch",
            ErrorKind::MalformedRecord => "malformed record",
            ErrorKind::Encoding => "encoding failed",
            ErrorKind::Other => "error",
        };
        write!(f, "{}", s)
    }
}

pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }

    pub fn with_kind<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn not_initialized(what: &str) -> Self {
        Self::with_kind(
            ErrorKind::NotInitialized,
            format!("{} is not initialized", what),
        )
    }

    pub fn unsupported(message: &str) -> Self {
        Self::with_kind(ErrorKind::UnsupportedOperation, message)
    }

    pub fn malformed<M: Into<String>>(message: M) -> Self {
        Self::with_kind(ErrorKind::MalformedRecord, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unexpected error ({}): {}", self.kind, self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}. Source error: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(&**err),
            None => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(String, E)> for Error {
    fn from((message, err): (String, E)) -> Self {
        Self {
            kind: ErrorKind::Other,
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(&str, E)> for Error {
    fn from((message, err): (&str, E)) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        format!("{}", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
