//! FileHost operation enum.

use std::fmt;

/// All supported FileHost operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileHostOperation {
    /// Store a file from a `multipart/form-data` body.
    UploadFile,
    /// List and search stored files.
    ListFiles,
    /// Serve the raw bytes of a stored file.
    DownloadFile,
    /// Permanently remove a stored file.
    DeleteFile,
    /// Report service and database status.
    GetStatus,
}

impl FileHostOperation {
    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadFile => "UploadFile",
            Self::ListFiles => "ListFiles",
            Self::DownloadFile => "DownloadFile",
            Self::DeleteFile => "DeleteFile",
            Self::GetStatus => "GetStatus",
        }
    }

    /// The HTTP method this operation is served on.
    #[must_use]
    pub fn method(&self) -> http::Method {
        match self {
            Self::UploadFile => http::Method::POST,
            Self::DeleteFile => http::Method::DELETE,
            Self::ListFiles | Self::DownloadFile | Self::GetStatus => http::Method::GET,
        }
    }

    /// Whether the operation addresses a single stored file by id.
    #[must_use]
    pub fn takes_file_id(&self) -> bool {
        matches!(self, Self::DownloadFile | Self::DeleteFile)
    }
}

impl fmt::Display for FileHostOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
