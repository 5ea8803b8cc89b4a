//! Storage types and data structures.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use tokio::io::AsyncRead;

/// Extra request parameters passed through to the client.
///
/// Keys use S3 API field names (`Bucket`, `Key`, `ACL`, `ContentType`,
/// `CacheControl`, ...). The well-known ones override values the adapter
/// computes; the rest reach the client untouched.
pub type RequestParams = BTreeMap<String, String>;

/// Streamed object body.
///
/// `Sync` keeps `&FileDescriptor` sendable, so adapter futures can be spawned.
pub type ByteStream = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// S3 canned ACL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Acl {
    /// Owner only.
    Private,
    /// Anyone can read.
    #[default]
    PublicRead,
    /// Anyone can read and write.
    PublicReadWrite,
    /// Any authenticated AWS principal can read.
    AuthenticatedRead,
    /// EC2 may read AMI bundles.
    AwsExecRead,
    /// Bucket owner can read.
    BucketOwnerRead,
    /// Bucket owner has full control.
    BucketOwnerFullControl,
    /// Provider-defined ACL not known here.
    Other(String),
}

impl Acl {
    /// Wire value of the ACL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::AwsExecRead => "aws-exec-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
            Self::Other(value) => value,
        }
    }

    /// Parse a wire value. Unknown values are kept as [`Acl::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "private" => Self::Private,
            "public-read" => Self::PublicRead,
            "public-read-write" => Self::PublicReadWrite,
            "authenticated-read" => Self::AuthenticatedRead,
            "aws-exec-read" => Self::AwsExecRead,
            "bucket-owner-read" => Self::BucketOwnerRead,
            "bucket-owner-full-control" => Self::BucketOwnerFullControl,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Acl {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Explicit access credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create credentials from a key pair.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// A file as handed over by the host.
///
/// `url` is the only field the adapter writes, on successful upload.
pub struct FileDescriptor {
    /// Optional folder below the root path.
    pub path: Option<String>,
    /// Content hash, the file's identity.
    pub hash: String,
    /// Extension including the leading dot.
    pub ext: String,
    /// MIME type sent as `Content-Type`.
    pub mime: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Streamed content. Preferred over `buffer` when both are set.
    pub stream: Option<ByteStream>,
    /// Buffered content.
    pub buffer: Option<Bytes>,
    /// Public or backend URL of the stored object.
    pub url: Option<String>,
}

impl FileDescriptor {
    /// Create a descriptor without content.
    #[must_use]
    pub fn new(hash: impl Into<String>, ext: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            path: None,
            hash: hash.into(),
            ext: ext.into(),
            mime: mime.into(),
            size_bytes: 0,
            stream: None,
            buffer: None,
            url: None,
        }
    }

    /// Set the folder below the root path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set buffered content; also records its size.
    #[must_use]
    pub fn with_buffer(mut self, buffer: impl Into<Bytes>) -> Self {
        let buffer = buffer.into();
        self.size_bytes = buffer.len() as u64;
        self.buffer = Some(buffer);
        self
    }

    /// Set streamed content of a known size.
    #[must_use]
    pub fn with_stream(mut self, stream: ByteStream, size_bytes: u64) -> Self {
        self.stream = Some(stream);
        self.size_bytes = size_bytes;
        self
    }

    /// Set the stored URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDescriptor")
            .field("path", &self.path)
            .field("hash", &self.hash)
            .field("ext", &self.ext)
            .field("mime", &self.mime)
            .field("size_bytes", &self.size_bytes)
            .field("stream", &self.stream.as_ref().map(|_| "<stream>"))
            .field("buffer", &self.buffer.as_ref().map(Bytes::len))
            .field("url", &self.url)
            .finish()
    }
}

/// Result of a signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// Presigned URL, or the original URL when it was not signed.
    pub url: Option<String>,
}
