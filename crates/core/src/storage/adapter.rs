//! Upload provider operations exposed to the host.

use std::sync::Arc;

use parking_lot::RwLock;
use s3_upload_shared::ProviderOptions;
use tracing::{error, info};

use super::client::{
    DeleteObjectOutput, DeleteObjectRequest, ObjectBody, ObjectStoreClient, PresignRequest,
    PutObjectRequest, S3Client,
};
use super::config::Configuration;
use super::error::StorageError;
use super::key::build_key;
use super::location::{is_url_from_bucket, normalize_location};
use super::types::{Acl, FileDescriptor, RequestParams, SignedUrl};

/// Upload provider backed by an object store client.
///
/// The configuration is an immutable snapshot; [`StoreAdapter::set_options`]
/// swaps in a new one. Operations read the snapshot current at the moment
/// they build their request, so an override racing an in-flight operation
/// may or may not apply to it.
pub struct StoreAdapter<C: ObjectStoreClient> {
    client: C,
    config: RwLock<Arc<Configuration>>,
}

impl StoreAdapter<S3Client> {
    /// Build an adapter talking to S3 from host options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] if no bucket is configured or no
    /// credentials can be obtained.
    pub fn from_options(options: &ProviderOptions) -> Result<Self, StorageError> {
        let config = Configuration::from_options(options)?;
        let client = S3Client::from_config(&config)?;
        Ok(Self::new(config, client))
    }
}

impl<C: ObjectStoreClient> StoreAdapter<C> {
    /// Create an adapter from a ready configuration.
    #[must_use]
    pub fn new(config: Configuration, client: C) -> Self {
        info!(
            bucket = %config.bucket,
            acl = %config.acl,
            root_path = ?config.root_path,
            "upload provider initialized"
        );
        Self {
            client,
            config: RwLock::new(Arc::new(config)),
        }
    }

    /// Merge host options and create an adapter around `client`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] if no bucket is configured.
    pub fn init(options: &ProviderOptions, client: C) -> Result<Self, StorageError> {
        Ok(Self::new(Configuration::from_options(options)?, client))
    }

    /// The underlying object store client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<Configuration> {
        Arc::clone(&self.config.read())
    }

    /// Bucket operations currently target.
    #[must_use]
    pub fn bucket(&self) -> String {
        self.config().effective_bucket().to_string()
    }

    /// ACL uploads currently use.
    #[must_use]
    pub fn acl(&self) -> Acl {
        self.config().effective_acl().clone()
    }

    /// True if uploads are currently private.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.config().effective_acl() == &Acl::Private
    }

    /// Redirect subsequent operations to `bucket`, optionally with a new ACL.
    ///
    /// Without `acl` the currently effective ACL stays in force. There is no
    /// way back to the base bucket short of building a new adapter.
    pub fn set_options(&self, bucket: impl Into<String>, acl: Option<Acl>) {
        let bucket = bucket.into();
        let mut guard = self.config.write();
        let next = guard.with_override(bucket, acl);
        info!(
            bucket = %next.effective_bucket(),
            acl = %next.effective_acl(),
            "storage override installed"
        );
        *guard = Arc::new(next);
    }

    /// Upload a file and record its URL in `file.url`.
    ///
    /// The streamed body is preferred over the buffer when both are present.
    /// `extra` entries named `Bucket`, `Key`, `ACL` or `ContentType` override
    /// the computed values; the rest go to the client untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidFile`] if the file has no hash or no
    /// content, and [`StorageError::Upload`] if the client fails. On error
    /// `file.url` is left as it was, but a streamed body has already been
    /// taken from `file.stream`; retrying needs a fresh stream.
    pub async fn upload(
        &self,
        file: &mut FileDescriptor,
        mut extra: RequestParams,
    ) -> Result<(), StorageError> {
        let root_path = self.config().root_path.clone();
        let key = build_key(root_path.as_deref(), file)?;

        let body = match (file.stream.take(), file.buffer.clone()) {
            (Some(stream), _) => ObjectBody::Stream(stream),
            (None, Some(buffer)) => ObjectBody::Bytes(buffer),
            (None, None) => {
                return Err(StorageError::invalid_file(format!(
                    "file {key} has neither a stream nor a buffer"
                )));
            }
        };

        let config = self.config();
        let request = PutObjectRequest {
            bucket: extra
                .remove("Bucket")
                .unwrap_or_else(|| config.effective_bucket().to_string()),
            key: extra.remove("Key").unwrap_or(key),
            acl: extra
                .remove("ACL")
                .map_or_else(|| config.effective_acl().clone(), |acl| Acl::parse(&acl)),
            content_type: extra
                .remove("ContentType")
                .unwrap_or_else(|| file.mime.clone()),
            body,
            extra,
        };
        drop(config);

        let bucket = request.bucket.clone();
        let key = request.key.clone();
        let output = self.client.put_object(request).await.map_err(|e| {
            error!(bucket = %bucket, key = %key, error = %e, "upload failed");
            StorageError::upload(e)
        })?;

        let base_url = self.config().base_url.clone();
        let url = normalize_location(&output.location, base_url.as_deref(), &key);
        info!(bucket = %bucket, key = %key, url = %url, "file uploaded");
        file.url = Some(url);
        Ok(())
    }

    /// Upload a streamed file. Same contract as [`StoreAdapter::upload`].
    ///
    /// # Errors
    ///
    /// See [`StoreAdapter::upload`].
    pub async fn upload_stream(
        &self,
        file: &mut FileDescriptor,
        extra: RequestParams,
    ) -> Result<(), StorageError> {
        self.upload(file, extra).await
    }

    /// Delete a file's object.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidFile`] if the file has no hash and
    /// [`StorageError::Delete`] if the client fails.
    pub async fn delete(
        &self,
        file: &FileDescriptor,
        mut extra: RequestParams,
    ) -> Result<DeleteObjectOutput, StorageError> {
        let config = self.config();
        let key = build_key(config.root_path.as_deref(), file)?;
        let request = DeleteObjectRequest {
            bucket: extra
                .remove("Bucket")
                .unwrap_or_else(|| config.effective_bucket().to_string()),
            key: extra.remove("Key").unwrap_or(key),
            extra,
        };
        drop(config);

        let bucket = request.bucket.clone();
        let key = request.key.clone();
        let ack = self.client.delete_object(request).await.map_err(|e| {
            error!(bucket = %bucket, key = %key, error = %e, "delete failed");
            StorageError::delete(e)
        })?;

        info!(bucket = %bucket, key = %key, status = ack.status_code, "file deleted");
        Ok(ack)
    }

    /// Get a URL granting temporary read access to a file.
    ///
    /// URLs that do not point into the current bucket (or under the base URL)
    /// are returned unchanged without signing. The descriptor is never
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidFile`] if the file has no hash and
    /// [`StorageError::Sign`] if the client fails.
    pub async fn get_signed_url(
        &self,
        file: &FileDescriptor,
        mut extra: RequestParams,
    ) -> Result<SignedUrl, StorageError> {
        let config = self.config();
        let bucket = config.effective_bucket().to_string();

        let Some(file_url) = file.url.as_deref() else {
            return Ok(SignedUrl { url: None });
        };
        if !is_url_from_bucket(file_url, &bucket, config.base_url.as_deref()) {
            return Ok(SignedUrl {
                url: Some(file_url.to_string()),
            });
        }

        let key = build_key(config.root_path.as_deref(), file)?;
        let request = PresignRequest {
            bucket: extra.remove("Bucket").unwrap_or(bucket),
            key: extra.remove("Key").unwrap_or(key),
            expires_in_secs: config.signed_url_expiry_secs,
            extra,
        };
        drop(config);

        let bucket = request.bucket.clone();
        let key = request.key.clone();
        let url = self.client.presign_get(request).await.map_err(|e| {
            error!(bucket = %bucket, key = %key, error = %e, "signing failed");
            StorageError::sign(e)
        })?;

        Ok(SignedUrl { url: Some(url) })
    }
}
