//! Explicit credential resolution.
//!
//! Returning `None` is not a failure: the canonical configuration then omits
//! credentials and the client discovers them from the environment.

use s3_upload_shared::{CredentialsOptions, S3Options};

use super::types::Credentials;

/// Resolve explicit credentials from the nested and legacy option bags.
///
/// First match wins:
/// 1. legacy top-level `accessKeyId` / `secretAccessKey`
/// 2. legacy top-level `credentials` block
/// 3. `s3Options.accessKeyId` / `s3Options.secretAccessKey` (deprecated)
/// 4. `s3Options.credentials` block
#[must_use]
pub fn resolve(nested: &S3Options, legacy: &S3Options) -> Option<Credentials> {
    legacy_credentials(legacy)
        .or_else(|| key_pair(nested))
        .or_else(|| nested.credentials.as_ref().and_then(from_block))
}

/// True when [`resolve`] picks the deprecated `s3Options` key pair.
#[must_use]
pub fn uses_deprecated_pair(nested: &S3Options, legacy: &S3Options) -> bool {
    legacy_credentials(legacy).is_none() && key_pair(nested).is_some()
}

fn legacy_credentials(legacy: &S3Options) -> Option<Credentials> {
    key_pair(legacy).or_else(|| legacy.credentials.as_ref().and_then(from_block))
}

fn key_pair(options: &S3Options) -> Option<Credentials> {
    pair(
        options.access_key_id.as_deref(),
        options.secret_access_key.as_deref(),
    )
}

fn from_block(block: &CredentialsOptions) -> Option<Credentials> {
    let creds = pair(
        block.access_key_id.as_deref(),
        block.secret_access_key.as_deref(),
    )?;
    Some(match block.session_token.as_deref() {
        Some(token) if !token.is_empty() => creds.with_session_token(token),
        _ => creds,
    })
}

fn pair(access_key_id: Option<&str>, secret_access_key: Option<&str>) -> Option<Credentials> {
    match (access_key_id, secret_access_key) {
        (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
            Some(Credentials::new(id, secret))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, secret: &str, token: Option<&str>) -> CredentialsOptions {
        CredentialsOptions {
            access_key_id: Some(id.to_string()),
            secret_access_key: Some(secret.to_string()),
            session_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_no_explicit_credentials_resolves_to_none() {
        assert_eq!(resolve(&S3Options::default(), &S3Options::default()), None);
    }

    #[test]
    fn test_nested_credentials_block() {
        let nested = S3Options {
            credentials: Some(block("AKIA", "secret", Some("session"))),
            ..S3Options::default()
        };

        let creds = resolve(&nested, &S3Options::default()).expect("credentials resolved");
        assert_eq!(creds.access_key_id, "AKIA");
        assert_eq!(creds.secret_access_key, "secret");
        assert_eq!(creds.session_token.as_deref(), Some("session"));
    }

    #[test]
    fn test_legacy_pair_wins_over_nested_block() {
        let nested = S3Options {
            credentials: Some(block("NESTED", "nested-secret", None)),
            ..S3Options::default()
        };
        let legacy = S3Options {
            access_key_id: Some("LEGACY".to_string()),
            secret_access_key: Some("legacy-secret".to_string()),
            ..S3Options::default()
        };

        let creds = resolve(&nested, &legacy).expect("credentials resolved");
        assert_eq!(creds.access_key_id, "LEGACY");
    }

    #[test]
    fn test_deprecated_nested_pair() {
        let nested = S3Options {
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..S3Options::default()
        };

        let creds = resolve(&nested, &S3Options::default()).expect("credentials resolved");
        assert_eq!(creds, Credentials::new("AKIA", "secret"));
    }

    #[test]
    fn test_deprecated_pair_detection() {
        let nested = S3Options {
            access_key_id: Some("AKIA".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..S3Options::default()
        };
        assert!(uses_deprecated_pair(&nested, &S3Options::default()));

        let legacy = S3Options {
            credentials: Some(block("LEGACY", "legacy-secret", None)),
            ..S3Options::default()
        };
        assert!(!uses_deprecated_pair(&nested, &legacy));
        assert!(!uses_deprecated_pair(&S3Options::default(), &S3Options::default()));
    }

    #[test]
    fn test_incomplete_pair_is_ignored() {
        let nested = S3Options {
            access_key_id: Some("AKIA".to_string()),
            credentials: Some(block("", "secret", None)),
            ..S3Options::default()
        };

        assert_eq!(resolve(&nested, &S3Options::default()), None);
    }

    #[test]
    fn test_empty_session_token_is_dropped() {
        let nested = S3Options {
            credentials: Some(block("AKIA", "secret", Some(""))),
            ..S3Options::default()
        };

        let creds = resolve(&nested, &S3Options::default()).expect("credentials resolved");
        assert_eq!(creds.session_token, None);
    }
}
