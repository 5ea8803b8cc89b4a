//! Property-based tests for object key derivation.

use proptest::prelude::*;

use super::key::build_key;
use super::types::FileDescriptor;

/// Strategy for a path segment without slashes.
fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}"
}

/// Strategy for an optional root path, possibly with trailing slashes.
fn root_path() -> impl Strategy<Value = Option<String>> {
    prop::option::of((segment(), 0usize..4).prop_map(|(root, slashes)| {
        format!("{root}{}", "/".repeat(slashes))
    }))
}

fn make_file(path: Option<String>, hash: &str, ext: &str, mime: &str, size: u64) -> FileDescriptor {
    let mut file = FileDescriptor::new(hash, ext, mime);
    file.path = path;
    file.size_bytes = size;
    file
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same inputs always give the same key.
    #[test]
    fn prop_key_is_deterministic(
        root in root_path(),
        path in prop::option::of(segment()),
        hash in segment(),
        ext in "\\.[a-z]{1,4}",
    ) {
        let a = make_file(path.clone(), &hash, &ext, "image/png", 1);
        let b = make_file(path, &hash, &ext, "image/png", 1);

        prop_assert_eq!(
            build_key(root.as_deref(), &a).unwrap(),
            build_key(root.as_deref(), &b).unwrap()
        );
    }

    /// MIME type and size never influence the key.
    #[test]
    fn prop_key_ignores_mime_and_size(
        root in root_path(),
        hash in segment(),
        mime_a in "[a-z]+/[a-z0-9-]+",
        mime_b in "[a-z]+/[a-z0-9-]+",
        size_a in any::<u64>(),
        size_b in any::<u64>(),
    ) {
        let a = make_file(None, &hash, ".bin", &mime_a, size_a);
        let b = make_file(None, &hash, ".bin", &mime_b, size_b);

        prop_assert_eq!(
            build_key(root.as_deref(), &a).unwrap(),
            build_key(root.as_deref(), &b).unwrap()
        );
    }

    /// Keys never start with a slash and never contain empty segments.
    #[test]
    fn prop_key_has_no_empty_segments(
        root in root_path(),
        path in prop::option::of(segment()),
        hash in segment(),
    ) {
        let file = make_file(path, &hash, ".png", "image/png", 0);
        let key = build_key(root.as_deref(), &file).unwrap();

        prop_assert!(!key.starts_with('/'));
        prop_assert!(!key.contains("//"));
        let suffix = format!("{hash}.png");
        prop_assert!(key.ends_with(&suffix));
    }
}
