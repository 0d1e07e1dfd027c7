//! Error types for flatconf
//!
//! Only obtaining a configuration source can fail. Malformed lines,
//! unresolved references and unparseable numbers all degrade to a
//! silent drop or a caller-supplied default instead of an error.

use std::fmt;

/// Result type alias for flatconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for flatconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// File path or key the error relates to
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration source could not be opened
    SourceUnavailable,
    /// Reading or writing an already opened resource failed
    Io,
    /// Exporting entries failed
    Serialize,
}

impl Error {
    /// Create a source unavailable error
    pub fn source_unavailable(path: impl Into<String>, cause: impl Into<String>) -> Self {
        let path_str = path.into();
        Self {
            kind: ErrorKind::SourceUnavailable,
            path: Some(path_str.clone()),
            help: Some(format!(
                "Check that '{}' exists and is readable",
                path_str
            )),
            cause: Some(cause.into()),
        }
    }

    /// Create an I/O error
    pub fn io(path: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            path: Some(path.into()),
            help: None,
            cause: Some(cause.into()),
        }
    }

    /// Create a serialization error
    pub fn serialize(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Serialize,
            path: None,
            help: None,
            cause: Some(message.into()),
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Map an `std::io::Error` raised while opening `path`
    pub(crate) fn from_open(path: impl Into<String>, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => Self::io(path, err.to_string())
                .with_help("Configuration files must be valid UTF-8 text"),
            _ => Self::source_unavailable(path, err.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::SourceUnavailable => write!(f, "Can not open configuration file")?,
            ErrorKind::Io => write!(f, "I/O error")?,
            ErrorKind::Serialize => write!(f, "Serialization error")?,
        }

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_display() {
        let err = Error::source_unavailable("/etc/missing.cfg", "No such file or directory");
        let display = format!("{}", err);

        assert!(display.contains("Can not open configuration file"));
        assert!(display.contains("Path: /etc/missing.cfg"));
        assert!(display.contains("No such file or directory"));
        assert!(display.contains("Help: Check that '/etc/missing.cfg' exists"));
    }

    #[test]
    fn test_io_error_has_no_default_help() {
        let err = Error::io("out.cfg", "disk full");

        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.path, Some("out.cfg".into()));
        assert!(err.help.is_none());
        assert!(!format!("{}", err).contains("Help:"));
    }

    #[test]
    fn test_with_help() {
        let err = Error::serialize("bad map").with_help("Report this");
        let display = format!("{}", err);

        assert!(display.contains("Serialization error"));
        assert!(display.contains("Help: Report this"));
    }

    #[test]
    fn test_with_path_overrides() {
        let err = Error::io("a.cfg", "boom").with_path("b.cfg");
        assert_eq!(err.path.as_deref(), Some("b.cfg"));
    }

    #[test]
    fn test_from_open_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::from_open("x.cfg", &io_err);
        assert_eq!(err.kind, ErrorKind::SourceUnavailable);
    }

    #[test]
    fn test_from_open_invalid_data() {
        let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8");
        let err = Error::from_open("x.cfg", &io_err);
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.help.unwrap().contains("UTF-8"));
    }
}
