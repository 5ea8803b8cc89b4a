//! S3 upload provider.
//!
//! This module turns host options and file descriptors into object store
//! requests:
//! - Credential resolution and option merging (nested vs. legacy flat)
//! - Object key derivation
//! - Public URL normalization and presigned URL decisions
//! - The adapter composing them over an [`ObjectStoreClient`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ ProviderOptions ──► config::merge ──► Configuration (snapshot)   │
//! │                        ▲                       │                 │
//! │               credentials::resolve             ▼                 │
//! │ FileDescriptor ──► key::build_key ──► StoreAdapter ──► client    │
//! │                                           │                      │
//! │                                           ▼                      │
//! │                location::{normalize_location, is_url_from_bucket}│
//! └──────────────────────────────────────────────────────────────────┘
//! ```

mod adapter;
mod client;
mod config;
mod credentials;
mod error;
mod key;
mod location;
mod types;

#[cfg(test)]
mod key_props;
#[cfg(test)]
mod test_support;

pub use adapter::StoreAdapter;
pub use client::{
    DeleteObjectOutput, DeleteObjectRequest, ObjectBody, ObjectStoreClient, PresignRequest,
    PutObjectOutput, PutObjectRequest, S3Client, discover_credentials,
};
pub use config::{Configuration, apply_legacy, merge};
pub use credentials::resolve as resolve_credentials;
pub use error::{ClientError, StorageError};
pub use key::{build_key, key_prefix};
pub use location::{has_scheme, is_url_from_bucket, normalize_location};
pub use types::{Acl, ByteStream, Credentials, FileDescriptor, RequestParams, SignedUrl};
