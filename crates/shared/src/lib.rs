//! Shared configuration and telemetry for the S3 upload provider.
//!
//! This crate provides the pieces every consumer of the provider needs:
//! - The raw provider options as the host hands them over (nested `s3Options`
//!   plus the deprecated flat shape)
//! - Loading those options from config files and the environment
//! - Tracing subscriber setup

pub mod config;
pub mod telemetry;


pub use config::{CredentialsOptions, ObjectParams, ProviderOptions, S3Options};
