//! FileHost error types.
//!
//! Errors are rendered on the wire as `{"error": "<message>"}` with the
//! status code carried by the error itself.

use std::fmt;

/// Well-known FileHost error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum FileHostErrorCode {
    /// The path exists but does not accept the request method.
    MethodNotAllowed,
    /// No route or no file with the requested id.
    NotFound,
    /// The request did not carry a file id.
    MissingFileId,
    /// The multipart body did not contain a `file` part.
    NoFileUploaded,
    /// The request is not `multipart/form-data` or has no boundary.
    InvalidContentType,
    /// A query parameter could not be interpreted.
    #[default]
    InvalidParameter,
    /// Anything that went wrong on the server side.
    InternalError,
}

impl FileHostErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::NotFound => "NotFound",
            Self::MissingFileId => "MissingFileId",
            Self::NoFileUploaded => "NoFileUploaded",
            Self::InvalidContentType => "InvalidContentType",
            Self::InvalidParameter => "InvalidParameter",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default message used when no custom message is given.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method not allowed",
            Self::NotFound => "Not found",
            Self::MissingFileId => "File ID required",
            Self::NoFileUploaded | Self::InvalidContentType => "No file uploaded",
            Self::InvalidParameter => "Invalid parameter",
            Self::InternalError => "Internal server error",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MissingFileId
            | Self::NoFileUploaded
            | Self::InvalidContentType
            | Self::InvalidParameter => http::StatusCode::BAD_REQUEST,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FileHostErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A FileHost error response.
#[derive(Debug)]
pub struct FileHostError {
    /// The error code.
    pub code: FileHostErrorCode,
    /// A human-readable error message, sent to the client verbatim.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for FileHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileHostError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for FileHostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl FileHostError {
    /// Create a new `FileHostError` from an error code with its default message.
    #[must_use]
    pub fn new(code: FileHostErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.default_message().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `FileHostError` with a custom message.
    #[must_use]
    pub fn with_message(code: FileHostErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Wrong HTTP method for a known route.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(FileHostErrorCode::MethodNotAllowed)
    }

    /// No route matched the request path.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::new(FileHostErrorCode::NotFound)
    }

    /// No stored file with the requested id.
    #[must_use]
    pub fn file_not_found() -> Self {
        Self::with_message(FileHostErrorCode::NotFound, "File not found")
    }

    /// The request carried no file id.
    #[must_use]
    pub fn missing_file_id() -> Self {
        Self::new(FileHostErrorCode::MissingFileId)
    }

    /// The upload carried no `file` part.
    #[must_use]
    pub fn no_file_uploaded() -> Self {
        Self::new(FileHostErrorCode::NoFileUploaded)
    }

    /// Invalid query parameter.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::with_message(FileHostErrorCode::InvalidParameter, message)
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(FileHostErrorCode::InternalError, message)
    }
}

/// Create a `FileHostError` from an error code.
///
/// # Examples
///
/// ```
/// use filehost_model::filehost_error;
/// use filehost_model::error::FileHostErrorCode;
///
/// let err = filehost_error!(NotFound);
/// assert_eq!(err.code, FileHostErrorCode::NotFound);
///
/// let err = filehost_error!(NotFound, "File not found");
/// assert_eq!(err.message, "File not found");
/// ```
#[macro_export]
macro_rules! filehost_error {
    ($code:ident) => {
        $crate::error::FileHostError::new($crate::error::FileHostErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::FileHostError::with_message($crate::error::FileHostErrorCode::$code, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_codes_to_status() {
        assert_eq!(
            FileHostErrorCode::MethodNotAllowed.default_status_code(),
            http::StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            FileHostErrorCode::NotFound.default_status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            FileHostErrorCode::NoFileUploaded.default_status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FileHostErrorCode::InternalError.default_status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_should_use_wire_messages() {
        assert_eq!(FileHostError::method_not_allowed().message, "Method not allowed");
        assert_eq!(FileHostError::missing_file_id().message, "File ID required");
        assert_eq!(FileHostError::no_file_uploaded().message, "No file uploaded");
        assert_eq!(FileHostError::file_not_found().message, "File not found");
    }

    #[test]
    fn test_should_keep_source() {
        let io = std::io::Error::other("disk on fire");
        let err = FileHostError::internal_error("boom").with_source(io);
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_should_display_code_and_message() {
        let err = filehost_error!(InvalidParameter, "limit must be positive");
        assert_eq!(
            err.to_string(),
            "FileHostError(InvalidParameter): limit must be positive"
        );
    }
}
