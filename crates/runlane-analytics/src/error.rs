use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A malformed context reached the session (propagated from runlane-types).
    InvalidInput(String),
    /// An environment fact could not be resolved.
    Resolution {
        fact: &'static str,
        source: anyhow::Error,
    },
}

impl Error {
    pub(crate) fn resolution(fact: &'static str, source: anyhow::Error) -> Self {
        Error::Resolution { fact, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Resolution { fact, source } => {
                write!(f, "Could not resolve {}: {}", fact, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolution { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<runlane_types::Error> for Error {
    fn from(err: runlane_types::Error) -> Self {
        match err {
            runlane_types::Error::InvalidInput(msg) => Error::InvalidInput(msg),
        }
    }
}
