//! Provider options as supplied by the host.
//!
//! The host hands the provider a single options bag. The current shape wraps
//! the S3 client settings in `s3Options`; older deployments put the same
//! fields at the top level. Both shapes deserialize into [`ProviderOptions`],
//! the flat one landing in [`ProviderOptions::legacy`].
//!
//! Lower-case aliases exist because the `config` crate lower-cases keys read
//! from environment variables. Those values also arrive as strings, so
//! numeric and boolean fields accept either form.

use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// Options recognized by the upload provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// Absolute URL prefix used for public links (e.g. a CDN).
    #[serde(default, alias = "baseurl")]
    pub base_url: Option<String>,
    /// Key prefix applied to every object.
    #[serde(default, alias = "rootpath")]
    pub root_path: Option<String>,
    /// Nested S3 client configuration.
    #[serde(default, alias = "s3options")]
    pub s3_options: Option<S3Options>,
    /// Deprecated top-level fields mirroring `s3Options`.
    #[serde(flatten)]
    pub legacy: S3Options,
}

/// S3 client configuration.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Options {
    /// AWS region.
    #[serde(default)]
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, alias = "forcepathstyle")]
    pub force_path_style: Option<bool>,
    /// Access key ID (deprecated location, use `credentials`).
    #[serde(default, alias = "accesskeyid")]
    pub access_key_id: Option<String>,
    /// Secret access key (deprecated location, use `credentials`).
    #[serde(default, alias = "secretaccesskey")]
    pub secret_access_key: Option<String>,
    /// Explicit credentials.
    #[serde(default)]
    pub credentials: Option<CredentialsOptions>,
    /// Default request parameters.
    #[serde(default)]
    pub params: Option<ObjectParams>,
}

impl S3Options {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Explicit credentials block.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsOptions {
    /// Access key ID.
    #[serde(default, alias = "accesskeyid")]
    pub access_key_id: Option<String>,
    /// Secret access key.
    #[serde(default, alias = "secretaccesskey")]
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials.
    #[serde(default, alias = "sessiontoken")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for CredentialsOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsOptions")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Default request parameters, named after the S3 API fields.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObjectParams {
    /// Target bucket.
    #[serde(default, rename = "Bucket", alias = "bucket")]
    pub bucket: Option<String>,
    /// Canned ACL applied to uploads.
    #[serde(default, rename = "ACL", alias = "acl")]
    pub acl: Option<String>,
    /// Lifetime of presigned URLs in seconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default, rename = "signedUrlExpires", alias = "signedurlexpires")]
    pub signed_url_expires: Option<u64>,
}

impl ProviderOptions {
    /// Parses options from the JSON value the host passes in.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match the options shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Loads options from config files and the environment.
    ///
    /// Sources, later ones winning:
    /// - `config/upload` (any format the `config` crate understands)
    /// - `config/upload.{RUN_MODE}`
    /// - `UPLOAD__*` environment variables, `__` separating nested keys
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/upload").required(false))
            .add_source(
                config::File::with_name(&format!("config/upload.{run_mode}")).required(false),
            )
            .add_source(config::Environment::with_prefix("UPLOAD").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
