//! URL normalization and bucket ownership checks.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Matches a leading URI scheme such as `https://` or `s3://`.
static SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w*://").expect("scheme pattern is valid"));

/// Matches AWS S3 hosts, capturing the virtual-hosted bucket prefix if any.
///
/// `bucket.s3.amazonaws.com`, `bucket.s3-eu-west-1.amazonaws.com`,
/// `s3.us-east-1.amazonaws.com`, ...
static ENDPOINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+\.)?s3[.-]([a-z0-9-]+)\.").expect("endpoint pattern is valid"));

/// True if `location` starts with a URI scheme.
#[must_use]
pub fn has_scheme(location: &str) -> bool {
    SCHEME_PATTERN.is_match(location)
}

/// Turn the location reported by the backend into the file's public URL.
///
/// A configured `base_url` always wins. Otherwise scheme-less locations get
/// `https://`; absolute ones are kept.
#[must_use]
pub fn normalize_location(location: &str, base_url: Option<&str>, key: &str) -> String {
    if let Some(base) = base_url.filter(|base| !base.is_empty()) {
        return format!("{base}/{key}");
    }
    if has_scheme(location) {
        location.to_string()
    } else {
        format!("https://{location}")
    }
}

/// Decide whether `file_url` points into `bucket`.
///
/// With a `base_url` the URL must live under it. Otherwise AWS-style URLs are
/// decoded (`s3://`, virtual-hosted and path-style hosts); for other
/// S3-compatible hosts the bucket must lead the host or appear as a path
/// segment. Unparseable URLs never belong.
#[must_use]
pub fn is_url_from_bucket(file_url: &str, bucket: &str, base_url: Option<&str>) -> bool {
    if let Some(base) = base_url.filter(|base| !base.is_empty()) {
        let base = base.trim_end_matches('/');
        return file_url
            .strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    }

    let Ok(url) = Url::parse(file_url) else {
        return false;
    };

    if let Some(found) = bucket_from_aws_url(&url) {
        return found == bucket;
    }

    let host = host_with_port(&url).unwrap_or_default();
    host.starts_with(&format!("{bucket}.")) || url.path().contains(&format!("/{bucket}/"))
}

/// Extract the bucket from an AWS S3 URL, if the URL names one.
fn bucket_from_aws_url(url: &Url) -> Option<String> {
    if url.scheme() == "s3" {
        return url
            .host_str()
            .filter(|host| !host.is_empty())
            .map(str::to_string);
    }

    let host = host_with_port(url)?;
    let captures = ENDPOINT_PATTERN.captures(&host)?;

    match captures.get(1) {
        // Virtual-hosted: <bucket>.s3.<region>.amazonaws.com
        Some(prefix) => {
            let prefix = prefix.as_str();
            Some(prefix[..prefix.len() - 1].to_string()).filter(|b| !b.is_empty())
        }
        // Path-style: s3.<region>.amazonaws.com/<bucket>/<key>
        None => url
            .path()
            .strip_prefix('/')
            .and_then(|path| path.split('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string),
    }
}

fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
