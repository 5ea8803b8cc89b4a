//! Test doubles shared by the storage tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::AsyncReadExt;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use super::client::{
    DeleteObjectOutput, DeleteObjectRequest, ObjectBody, ObjectStoreClient, PresignRequest,
    PutObjectOutput, PutObjectRequest,
};
use super::error::ClientError;
use super::types::{Acl, RequestParams};

/// How a body reached the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedBody {
    /// Came in as a stream.
    Stream(Vec<u8>),
    /// Came in as a buffer.
    Bytes(Vec<u8>),
}

/// Upload as seen by the client.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub bucket: String,
    pub key: String,
    pub acl: Acl,
    pub content_type: String,
    pub body: RecordedBody,
    pub extra: RequestParams,
}

/// Client that records every request and answers from canned values.
#[derive(Default)]
pub struct RecordingClient {
    pub puts: Mutex<Vec<RecordedPut>>,
    pub deletes: Mutex<Vec<DeleteObjectRequest>>,
    pub presigns: Mutex<Vec<PresignRequest>>,
    location: Option<String>,
    fail: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `location` for every upload instead of an AWS-style URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Fail every request.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn last_put(&self) -> RecordedPut {
        self.puts.lock().unwrap().last().cloned().expect("an upload was recorded")
    }

    pub fn presign_count(&self) -> usize {
        self.presigns.lock().unwrap().len()
    }
}

impl ObjectStoreClient for RecordingClient {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput, ClientError> {
        let body = match request.body {
            ObjectBody::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .await
                    .map_err(|e| ClientError::other(e.to_string()))?;
                RecordedBody::Stream(buf)
            }
            ObjectBody::Bytes(bytes) => RecordedBody::Bytes(bytes.to_vec()),
        };

        let location = self
            .location
            .clone()
            .unwrap_or_else(|| format!("https://{}.s3.amazonaws.com/{}", request.bucket, request.key));

        self.puts.lock().unwrap().push(RecordedPut {
            bucket: request.bucket,
            key: request.key,
            acl: request.acl,
            content_type: request.content_type,
            body,
            extra: request.extra,
        });

        if self.fail {
            return Err(ClientError::other("connection reset"));
        }
        Ok(PutObjectOutput { location })
    }

    async fn delete_object(
        &self,
        request: DeleteObjectRequest,
    ) -> Result<DeleteObjectOutput, ClientError> {
        self.deletes.lock().unwrap().push(request);
        if self.fail {
            return Err(ClientError::Status {
                operation: "DeleteObject",
                status: 403,
            });
        }
        Ok(DeleteObjectOutput { status_code: 204 })
    }

    async fn presign_get(&self, request: PresignRequest) -> Result<String, ClientError> {
        let mut url = format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
            request.bucket, request.key, request.expires_in_secs
        );
        for (name, value) in &request.extra {
            url.push_str(&format!("&{name}={value}"));
        }
        self.presigns.lock().unwrap().push(request);

        if self.fail {
            return Err(ClientError::other("credentials expired"));
        }
        Ok(url)
    }
}

/// Run `f` and count the WARN events it emits on this thread.
pub fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&counter)));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.load(Ordering::SeqCst))
}

struct WarnCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
