//! Object key derivation.
//!
//! Key format: `{root_path/}{path/}{hash}{ext}`. No escaping is applied;
//! hash and extension must not contain `/`.

use super::error::StorageError;
use super::types::FileDescriptor;

/// Prefix contributed by the root path, with trailing slashes collapsed.
#[must_use]
pub fn key_prefix(root_path: Option<&str>) -> String {
    match root_path.map(|root| root.trim_end_matches('/')) {
        Some(root) if !root.is_empty() => format!("{root}/"),
        _ => String::new(),
    }
}

/// Build the object key for `file`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidFile`] if the file has no hash.
pub fn build_key(root_path: Option<&str>, file: &FileDescriptor) -> Result<String, StorageError> {
    if file.hash.is_empty() {
        return Err(StorageError::invalid_file("file hash is required"));
    }

    let prefix = key_prefix(root_path);
    let subpath = match file.path.as_deref() {
        Some(path) if !path.is_empty() => format!("{path}/"),
        _ => String::new(),
    };

    Ok(format!("{prefix}{subpath}{}{}", file.hash, file.ext))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("media/"), Some("img"), "media/img/abc.png")]
    #[case(Some("media///"), Some("img"), "media/img/abc.png")]
    #[case(Some("media"), None, "media/abc.png")]
    #[case(None, Some("img"), "img/abc.png")]
    #[case(None, None, "abc.png")]
    #[case(Some(""), Some(""), "abc.png")]
    #[case(Some("/"), None, "abc.png")]
    fn test_build_key(
        #[case] root: Option<&str>,
        #[case] path: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut file = FileDescriptor::new("abc", ".png", "image/png");
        file.path = path.map(str::to_string);

        assert_eq!(build_key(root, &file).expect("key builds"), expected);
    }

    #[test]
    fn test_missing_hash_fails_fast() {
        let file = FileDescriptor::new("", ".png", "image/png");
        let err = build_key(Some("media"), &file).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFile(_)));
    }

    #[test]
    fn test_extension_is_appended_verbatim() {
        let file = FileDescriptor::new("abc", "", "application/octet-stream");
        assert_eq!(build_key(None, &file).expect("key builds"), "abc");
    }
}
