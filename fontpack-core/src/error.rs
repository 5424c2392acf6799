use thiserror::Error;

/// Errors surfaced by the conversion pipeline.
///
/// `EmptyBatch` and `UnsupportedFormat` are caller mistakes; everything else
/// is a failed or unreachable collaborator, or plain I/O trouble.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No font files supplied")]
    EmptyBatch,

    #[error("Unsupported target format: {0}")]
    UnsupportedFormat(String),

    #[error("Conversion of '{file}' failed: {message}")]
    Conversion { file: String, message: String },

    #[error("Conversion of '{file}' timed out after {seconds}s")]
    Timeout { file: String, seconds: u64 },

    #[error("Converter unavailable: {0}")]
    ConverterUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ConvertError {
    /// True for errors caused by the request itself rather than the
    /// converter or the host. HTTP handlers map these to 4xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConvertError::EmptyBatch | ConvertError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ConvertError::Conversion {
            file: "Arial.ttf".to_string(),
            message: "unsupported glyph table".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Conversion of 'Arial.ttf' failed: unsupported glyph table"
        );

        let error = ConvertError::Timeout {
            file: "Times.otf".to_string(),
            seconds: 30,
        };
        assert_eq!(error.to_string(), "Conversion of 'Times.otf' timed out after 30s");

        let error = ConvertError::UnsupportedFormat("eot".to_string());
        assert_eq!(error.to_string(), "Unsupported target format: eot");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ConvertError::EmptyBatch.is_client_error());
        assert!(ConvertError::UnsupportedFormat("eot".to_string()).is_client_error());

        assert!(!ConvertError::Conversion {
            file: "a.ttf".to_string(),
            message: "boom".to_string(),
        }
        .is_client_error());
        assert!(!ConvertError::ConverterUnavailable("no such file".to_string()).is_client_error());
        assert!(!ConvertError::Io(std::io::Error::other("disk full")).is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ConvertError = io_error.into();
        assert!(matches!(error, ConvertError::Io(_)));
    }
}
