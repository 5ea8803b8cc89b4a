//! Storage error types.

use thiserror::Error;

/// Errors reported by the adapter to its host.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Configuration cannot be turned into a usable client setup.
    #[error("storage configuration error: {0}")]
    Config(String),

    /// The file descriptor violates the caller contract.
    #[error("invalid file descriptor: {0}")]
    InvalidFile(String),

    /// Uploading the object failed.
    #[error("upload failed: {cause}")]
    Upload {
        /// Underlying client failure.
        #[source]
        cause: ClientError,
    },

    /// Deleting the object failed.
    #[error("delete failed: {cause}")]
    Delete {
        /// Underlying client failure.
        #[source]
        cause: ClientError,
    },

    /// Presigning the object URL failed.
    #[error("signing failed: {cause}")]
    Sign {
        /// Underlying client failure.
        #[source]
        cause: ClientError,
    },
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid file error.
    #[must_use]
    pub fn invalid_file(msg: impl Into<String>) -> Self {
        Self::InvalidFile(msg.into())
    }

    /// Wrap a client failure raised while uploading.
    #[must_use]
    pub fn upload(cause: ClientError) -> Self {
        Self::Upload { cause }
    }

    /// Wrap a client failure raised while deleting.
    #[must_use]
    pub fn delete(cause: ClientError) -> Self {
        Self::Delete { cause }
    }

    /// Wrap a client failure raised while presigning.
    #[must_use]
    pub fn sign(cause: ClientError) -> Self {
        Self::Sign { cause }
    }
}

/// Failures raised by an object store client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The S3 request itself failed.
    #[error("s3 request failed: {0}")]
    S3(#[from] s3::error::S3Error),

    /// Credentials could not be built or discovered.
    #[error("credentials unavailable: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    /// The service answered with a non-success status.
    #[error("{operation} returned HTTP {status}")]
    Status {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// Any other client-side failure.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Create a generic client error.
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            StorageError::config("no bucket").to_string(),
            "storage configuration error: no bucket"
        );
        assert_eq!(
            StorageError::invalid_file("missing hash").to_string(),
            "invalid file descriptor: missing hash"
        );
        assert_eq!(
            StorageError::upload(ClientError::other("boom")).to_string(),
            "upload failed: boom"
        );
        assert_eq!(
            StorageError::delete(ClientError::Status {
                operation: "DeleteObject",
                status: 403,
            })
            .to_string(),
            "delete failed: DeleteObject returned HTTP 403"
        );
    }

    #[test]
    fn test_cause_is_exposed_as_source() {
        let err = StorageError::sign(ClientError::other("expired credentials"));
        let source = err.source().expect("sign error has a source");
        assert_eq!(source.to_string(), "expired credentials");
    }
}
