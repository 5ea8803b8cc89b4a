//! Object store client abstraction and its `rust-s3` implementation.
//!
//! The adapter never talks HTTP itself. It hands fully resolved requests to an
//! [`ObjectStoreClient`]; retries, timeouts and connection pooling are the
//! client's business.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use s3::Region;
use s3::bucket::Bucket;
use tracing::debug;

use super::config::Configuration;
use super::error::{ClientError, StorageError};
use super::types::{Acl, ByteStream, Credentials, RequestParams};

/// Body of an object upload.
pub enum ObjectBody {
    /// Streamed content.
    Stream(ByteStream),
    /// Buffered content.
    Bytes(Bytes),
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("ObjectBody::Stream"),
            Self::Bytes(bytes) => write!(f, "ObjectBody::Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Fully resolved upload request.
#[derive(Debug)]
pub struct PutObjectRequest {
    /// Target bucket.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Canned ACL.
    pub acl: Acl,
    /// `Content-Type` of the object.
    pub content_type: String,
    /// Object content.
    pub body: ObjectBody,
    /// Provider-specific parameters passed through untouched.
    pub extra: RequestParams,
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Location reported by the backend; may lack a scheme.
    pub location: String,
}

/// Fully resolved delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteObjectRequest {
    /// Target bucket.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Provider-specific parameters passed through untouched.
    pub extra: RequestParams,
}

/// Backend acknowledgement of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteObjectOutput {
    /// HTTP status returned by the service.
    pub status_code: u16,
}

/// Fully resolved presign request for a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    /// Target bucket.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Lifetime of the URL in seconds.
    pub expires_in_secs: u64,
    /// Provider-specific parameters passed through untouched.
    pub extra: RequestParams,
}

/// Object store operations the adapter relies on.
pub trait ObjectStoreClient: Send + Sync {
    /// Store an object and report where it landed.
    fn put_object(
        &self,
        request: PutObjectRequest,
    ) -> impl std::future::Future<Output = Result<PutObjectOutput, ClientError>> + Send;

    /// Remove an object.
    fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> impl std::future::Future<Output = Result<DeleteObjectOutput, ClientError>> + Send;

    /// Produce a time-limited GET URL for an object.
    fn presign_get(
        &self,
        request: PresignRequest,
    ) -> impl std::future::Future<Output = Result<String, ClientError>> + Send;
}

/// Default region when none is configured.
const DEFAULT_REGION: &str = "us-east-1";

/// [`ObjectStoreClient`] backed by `rust-s3`.
pub struct S3Client {
    region: Region,
    credentials: s3::creds::Credentials,
    path_style: bool,
}

impl S3Client {
    /// Build a client from the canonical configuration.
    ///
    /// Without explicit credentials, credentials are discovered from the
    /// environment, the shared profile or instance metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] if no credentials can be obtained.
    pub fn from_config(config: &Configuration) -> Result<Self, StorageError> {
        let credentials = discover_credentials(config.credentials.as_ref())
            .map_err(|e| StorageError::config(e.to_string()))?;

        Ok(Self {
            region: region(config.region.as_deref(), config.endpoint.as_deref()),
            credentials,
            path_style: config.force_path_style,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, ClientError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

impl ObjectStoreClient for S3Client {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput, ClientError> {
        let mut bucket = self.bucket(&request.bucket)?;
        bucket.add_header("x-amz-acl", request.acl.as_str());
        for (name, value) in &request.extra {
            bucket.add_header(header_name(name), value);
        }

        let status = match request.body {
            ObjectBody::Bytes(bytes) => bucket
                .put_object_with_content_type(&request.key, &bytes, &request.content_type)
                .await?
                .status_code(),
            ObjectBody::Stream(mut reader) => bucket
                .put_object_stream_with_content_type(
                    &mut reader,
                    &request.key,
                    &request.content_type,
                )
                .await?
                .status_code(),
        };
        ensure_success("PutObject", status)?;

        debug!(bucket = %request.bucket, key = %request.key, status, "object stored");
        Ok(PutObjectOutput {
            location: format!("{}/{}", bucket.url(), request.key),
        })
    }

    async fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> Result<DeleteObjectOutput, ClientError> {
        let mut bucket = self.bucket(&request.bucket)?;
        for (name, value) in &request.extra {
            bucket.add_header(header_name(name), value);
        }

        let status = bucket.delete_object(&request.key).await?.status_code();
        ensure_success("DeleteObject", status)?;

        Ok(DeleteObjectOutput {
            status_code: status,
        })
    }

    async fn presign_get(&self, request: PresignRequest) -> Result<String, ClientError> {
        let bucket = self.bucket(&request.bucket)?;
        let expiry = u32::try_from(request.expires_in_secs).map_err(|_| {
            ClientError::other(format!(
                "presign expiry {} seconds out of range",
                request.expires_in_secs
            ))
        })?;

        let queries: HashMap<String, String> = request
            .extra
            .iter()
            .map(|(name, value)| (query_name(name).to_string(), value.clone()))
            .collect();
        let queries = (!queries.is_empty()).then_some(queries);

        Ok(bucket.presign_get(&request.key, expiry, queries).await?)
    }
}

/// Turn explicit credentials into client credentials, or discover them.
///
/// # Errors
///
/// Returns an error if explicit credentials are rejected or discovery finds
/// nothing usable.
pub fn discover_credentials(
    explicit: Option<&Credentials>,
) -> Result<s3::creds::Credentials, ClientError> {
    let credentials = match explicit {
        Some(creds) => s3::creds::Credentials::new(
            Some(creds.access_key_id.as_str()),
            Some(creds.secret_access_key.as_str()),
            creds.session_token.as_deref(),
            None,
            None,
        )?,
        None => s3::creds::Credentials::default()?,
    };
    Ok(credentials)
}

/// Region for the client: a custom endpoint if given, else the AWS endpoint.
fn region(name: Option<&str>, endpoint: Option<&str>) -> Region {
    let name = name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_REGION);
    match endpoint.filter(|e| !e.is_empty()) {
        Some(endpoint) => Region::Custom {
            region: name.to_string(),
            endpoint: endpoint.to_string(),
        },
        None => Region::Custom {
            region: name.to_string(),
            endpoint: format!("https://s3.{name}.amazonaws.com"),
        },
    }
}

fn ensure_success(operation: &'static str, status: u16) -> Result<(), ClientError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ClientError::Status { operation, status })
    }
}

/// HTTP header for an S3 API parameter name; unknown names are sent as-is.
fn header_name(param: &str) -> &str {
    match param {
        "CacheControl" => "Cache-Control",
        "ContentDisposition" => "Content-Disposition",
        "ContentEncoding" => "Content-Encoding",
        "ContentLanguage" => "Content-Language",
        "Expires" => "Expires",
        "StorageClass" => "x-amz-storage-class",
        "ServerSideEncryption" => "x-amz-server-side-encryption",
        "SSEKMSKeyId" => "x-amz-server-side-encryption-aws-kms-key-id",
        "Tagging" => "x-amz-tagging",
        "WebsiteRedirectLocation" => "x-amz-website-redirect-location",
        "ExpectedBucketOwner" => "x-amz-expected-bucket-owner",
        "MFA" => "x-amz-mfa",
        other => other,
    }
}

/// Query parameter for an S3 GetObject parameter name; unknown names as-is.
fn query_name(param: &str) -> &str {
    match param {
        "ResponseCacheControl" => "response-cache-control",
        "ResponseContentDisposition" => "response-content-disposition",
        "ResponseContentEncoding" => "response-content-encoding",
        "ResponseContentLanguage" => "response-content-language",
        "ResponseContentType" => "response-content-type",
        "ResponseExpires" => "response-expires",
        "VersionId" => "versionId",
        "PartNumber" => "partNumber",
        other => other,
    }
}
