//! Canonical storage configuration and option merging.

use s3_upload_shared::{ObjectParams, ProviderOptions, S3Options};
use tracing::warn;

use super::credentials;
use super::error::StorageError;
use super::types::{Acl, Credentials};

/// Canonical adapter configuration.
///
/// Built once from [`ProviderOptions`]; afterwards only replaced wholesale by
/// [`Configuration::with_override`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Absolute URL prefix for public links.
    pub base_url: Option<String>,
    /// Key prefix applied to every object.
    pub root_path: Option<String>,
    /// Base bucket.
    pub bucket: String,
    /// Bucket installed at runtime, wins over `bucket`.
    pub custom_bucket: Option<String>,
    /// Base canned ACL.
    pub acl: Acl,
    /// ACL installed at runtime, wins over `acl`.
    pub custom_acl: Option<Acl>,
    /// Presigned URL lifetime in seconds.
    pub signed_url_expiry_secs: u64,
    /// Explicit credentials; `None` means ambient discovery.
    pub credentials: Option<Credentials>,
    /// AWS region.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers.
    pub endpoint: Option<String>,
    /// Path-style bucket addressing.
    pub force_path_style: bool,
}

impl Configuration {
    /// Default presigned URL lifetime: 15 minutes.
    pub const DEFAULT_SIGNED_URL_EXPIRY: u64 = 900;

    /// Create a configuration for `bucket` with default settings.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            base_url: None,
            root_path: None,
            bucket: bucket.into(),
            custom_bucket: None,
            acl: Acl::default(),
            custom_acl: None,
            signed_url_expiry_secs: Self::DEFAULT_SIGNED_URL_EXPIRY,
            credentials: None,
            region: None,
            endpoint: None,
            force_path_style: false,
        }
    }

    /// Build the configuration from host options.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] if no bucket can be determined.
    pub fn from_options(options: &ProviderOptions) -> Result<Self, StorageError> {
        let nested = options.s3_options.clone().unwrap_or_default();
        let mut config = merge(&nested, &options.legacy)?;
        config.base_url = options.base_url.clone().filter(|url| !url.is_empty());
        config.root_path = options.root_path.clone().filter(|path| !path.is_empty());
        Ok(config)
    }

    /// Set the public URL prefix.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = Some(root_path.into());
        self
    }

    /// Set the base ACL.
    #[must_use]
    pub fn with_acl(mut self, acl: Acl) -> Self {
        self.acl = acl;
        self
    }

    /// Set the presigned URL lifetime.
    #[must_use]
    pub fn with_signed_url_expiry(mut self, secs: u64) -> Self {
        self.signed_url_expiry_secs = secs;
        self
    }

    /// Set explicit credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Bucket operations target: the override if set, else the base bucket.
    #[must_use]
    pub fn effective_bucket(&self) -> &str {
        self.custom_bucket.as_deref().unwrap_or(&self.bucket)
    }

    /// ACL uploads use: the override if set, else the base ACL.
    #[must_use]
    pub fn effective_acl(&self) -> &Acl {
        self.custom_acl.as_ref().unwrap_or(&self.acl)
    }

    /// Copy of this configuration with a runtime bucket/ACL override.
    ///
    /// Without `acl` the currently effective ACL stays in force.
    #[must_use]
    pub fn with_override(&self, bucket: impl Into<String>, acl: Option<Acl>) -> Self {
        let mut next = self.clone();
        next.custom_bucket = Some(bucket.into());
        if let Some(acl) = acl {
            next.custom_acl = Some(acl);
        }
        next
    }
}

/// Merge nested and legacy flat options into a canonical configuration.
///
/// Nested options are the base, legacy fields override them, and resolved
/// credentials override both. The ACL default applies after merging.
///
/// Every deprecated shape found is reported in a single warning.
///
/// # Errors
///
/// Returns [`StorageError::Config`] if no bucket can be determined.
pub fn merge(nested: &S3Options, legacy: &S3Options) -> Result<Configuration, StorageError> {
    let mut deprecated = Vec::new();
    if !legacy.is_empty() {
        deprecated.push("root-level S3 options (wrap them in s3Options)");
    }
    if credentials::uses_deprecated_pair(nested, legacy) {
        deprecated.push("s3Options.accessKeyId/secretAccessKey (use s3Options.credentials)");
    }
    if !deprecated.is_empty() {
        warn!(deprecated = ?deprecated, "deprecated provider options in use");
    }

    let credentials = credentials::resolve(nested, legacy);
    let merged = apply_legacy(nested, legacy);
    let params = merged.params.unwrap_or_default();

    let bucket = params
        .bucket
        .filter(|bucket| !bucket.trim().is_empty())
        .ok_or_else(|| StorageError::config("no bucket configured (s3Options.params.Bucket)"))?;

    let acl = params
        .acl
        .as_deref()
        .filter(|acl| !acl.is_empty())
        .map(Acl::parse)
        .unwrap_or_default();

    Ok(Configuration {
        base_url: None,
        root_path: None,
        bucket,
        custom_bucket: None,
        acl,
        custom_acl: None,
        signed_url_expiry_secs: params
            .signed_url_expires
            .unwrap_or(Configuration::DEFAULT_SIGNED_URL_EXPIRY),
        credentials,
        region: merged.region,
        endpoint: merged.endpoint,
        force_path_style: merged.force_path_style.unwrap_or(false),
    })
}

/// Map the deprecated flat shape onto the nested one, field by field.
///
/// Any field set in `legacy` replaces the nested value, including inside
/// `params`. Credentials are not merged here; see [`credentials::resolve`].
#[must_use]
pub fn apply_legacy(nested: &S3Options, legacy: &S3Options) -> S3Options {
    let params = match (&nested.params, &legacy.params) {
        (None, None) => None,
        (base, top) => {
            let base = base.clone().unwrap_or_default();
            let top = top.clone().unwrap_or_default();
            Some(ObjectParams {
                bucket: top.bucket.or(base.bucket),
                acl: top.acl.or(base.acl),
                signed_url_expires: top.signed_url_expires.or(base.signed_url_expires),
            })
        }
    };

    S3Options {
        region: legacy.region.clone().or_else(|| nested.region.clone()),
        endpoint: legacy.endpoint.clone().or_else(|| nested.endpoint.clone()),
        force_path_style: legacy.force_path_style.or(nested.force_path_style),
        access_key_id: None,
        secret_access_key: None,
        credentials: None,
        params,
    }
}
