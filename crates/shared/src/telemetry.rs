//! Tracing subscriber setup.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "s3_upload_core=info,s3_upload_shared=info";

/// Installs a global fmt subscriber filtered by `RUST_LOG`.
///
/// Hosts that already install their own subscriber should skip this.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Like [`init`], but emits JSON lines for log shippers.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_json(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
}
