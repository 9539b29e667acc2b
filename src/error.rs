use miette::Diagnostic;
use thiserror::Error;

/// Main error type for region operations
#[derive(Error, Diagnostic, Debug)]
pub enum RegionError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(regions::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(regions::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A bad mode string, a non-positive subpixel factor, an unknown artist
    /// kind, a rejected metadata key or an inconsistent shape parameter.
    #[error("Invalid argument: {message}")]
    #[diagnostic(code(regions::invalid_argument))]
    InvalidArgument {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The operation exists but has no implementation for this shape.
    #[error("Not implemented: {message}")]
    #[diagnostic(code(regions::unimplemented))]
    Unimplemented {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A scalar-only operation received an array of coordinates.
    #[error("Type mismatch: {message}")]
    #[diagnostic(code(regions::type_mismatch))]
    TypeMismatch {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(regions::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl RegionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn unimplemented(message: impl Into<String>, help: Option<&str>) -> Self {
        Self::Unimplemented {
            message: message.into(),
            help: help.map(str::to_string),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn test_io_error_names_the_path() {
        let err = RegionError::Io {
            path: "sources.yaml".into(),
            message: "Failed to read region file: not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "IO error with sources.yaml: Failed to read region file: not found"
        );
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("regions::io"));
    }

    #[test]
    fn test_helpers_carry_help() {
        let err = RegionError::unimplemented("no exact mode", Some("use subpixels"));
        assert_eq!(err.help().map(|h| h.to_string()).as_deref(), Some("use subpixels"));
        assert!(matches!(RegionError::invalid("bad"), RegionError::InvalidArgument { help: None, .. }));
    }
}
