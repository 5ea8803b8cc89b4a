//! Core logic of the S3 upload provider.
//!
//! The provider maps a host's "upload / delete / sign a file" contract onto an
//! S3-compatible object store. Everything with branching lives here; the wire
//! protocol is delegated to an [`storage::ObjectStoreClient`].
//!
//! # Modules
//!
//! - `storage` - Configuration merging, key derivation, URL handling and the
//!   adapter composing them

pub mod storage;

pub use storage::{
    Acl, FileDescriptor, ObjectStoreClient, RequestParams, S3Client, SignedUrl, StorageError,
    StoreAdapter,
};
