use std::path::Path;

pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Derives the output extension (leading dot included) from an untrusted filename.
///
/// Only the last path component is looked at, so both `/` and `\` separated
/// paths are accepted. The suffix is kept, case included, only when it is
/// non-empty ASCII alphanumerics; anything else falls back to
/// [`DEFAULT_EXTENSION`]. The result is used verbatim as part of the stored
/// file name, so it must never need escaping by the storage backend.
pub fn resolve_extension(file_name: Option<&str>) -> String {
    let Some(file_name) = file_name.filter(|name| !name.is_empty()) else {
        return DEFAULT_EXTENSION.to_string();
    };

    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    match base_name.rsplit_once('.') {
        Some((_, extension)) if is_safe_extension(extension) => format!(".{extension}"),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

fn is_safe_extension(extension: &str) -> bool {
    !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Makes sure `dir` exists, creating missing parents. Existing directories are left untouched.
pub async fn ensure_directory(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolves_extension_from_file_name() {
        assert_eq!(resolve_extension(Some("image.jpg")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.png")), ".png");
        assert_eq!(resolve_extension(Some("document.pdf")), ".pdf");
    }

    #[test]
    fn resolves_extension_from_paths() {
        assert_eq!(resolve_extension(Some("/path/to/image.jpg")), ".jpg");
        assert_eq!(resolve_extension(Some("C:\\path\\to\\photo.png")), ".png");
        assert_eq!(resolve_extension(Some("/some.dir/image")), ".jpg");
    }

    #[test]
    fn falls_back_to_default_without_dot() {
        assert_eq!(resolve_extension(Some("image")), ".jpg");
        assert_eq!(resolve_extension(Some("file")), ".jpg");
    }

    #[test]
    fn falls_back_to_default_for_empty_or_missing() {
        assert_eq!(resolve_extension(Some("")), ".jpg");
        assert_eq!(resolve_extension(None), ".jpg");
    }

    #[test]
    fn uses_suffix_after_last_dot() {
        assert_eq!(resolve_extension(Some("image.backup.jpg")), ".jpg");
        assert_eq!(resolve_extension(Some("file.name.ext")), ".ext");
        assert_eq!(resolve_extension(Some("SHOUT.PNG")), ".PNG");
    }

    #[test]
    fn falls_back_to_default_for_unsafe_suffix() {
        assert_eq!(resolve_extension(Some("trailing.")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.p#ng")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.png?x=1")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.jp g")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.%2e%2e")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.pn\u{e9}")), ".jpg");
        assert_eq!(resolve_extension(Some("photo.webp2")), ".webp2");
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let tmp = tempdir().expect("tempdir");
        let dir = tmp.path().join("images");
        assert!(!dir.exists());

        ensure_directory(&dir).await.expect("create dir");

        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn ensure_directory_is_idempotent() {
        let tmp = tempdir().expect("tempdir");
        let dir = tmp.path().join("images");

        ensure_directory(&dir).await.expect("first call");
        ensure_directory(&dir).await.expect("second call");

        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn creates_nested_directories() {
        let tmp = tempdir().expect("tempdir");
        let nested = tmp.path().join("nested").join("deep");

        ensure_directory(&nested).await.expect("create nested");

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn concurrent_calls_for_same_path_succeed() {
        let tmp = tempdir().expect("tempdir");
        let dir = tmp.path().join("a").join("b").join("c");

        let results = futures::future::join_all((0..8).map(|_| ensure_directory(&dir))).await;

        assert!(results.iter().all(Result::is_ok));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn fails_when_path_is_a_file() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").expect("write file");

        assert!(ensure_directory(&file).await.is_err());
    }
}
