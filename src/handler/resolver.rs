//! Content resolution module
//!
//! Maps a request path to the source that will back the response body:
//! a regular file under the root, a listing of the root directory, or a
//! degraded error when the root itself cannot be read.

use std::io;
use std::path::Path;

use tokio::fs::{self, File};

use crate::logger;

/// Outcome of resolving a request path against the root directory.
pub enum Resolved {
    /// The path names a regular file; stream its bytes.
    File { file: File, len: u64 },
    /// The path does not name a regular file; stream the root listing.
    Listing(fs::ReadDir),
    /// The root directory itself could not be opened for iteration.
    Unavailable(io::Error),
}

/// Resolve a request path to its content source.
///
/// `root` is the canonicalized directory captured at startup; it never
/// changes, so resolution touches no shared mutable state. Anything that
/// is not a regular file under the root falls back to the root listing.
pub async fn resolve(root: &Path, request_path: &str) -> Resolved {
    if let Some((file, len)) = probe_file(root, request_path).await {
        return Resolved::File { file, len };
    }

    match fs::read_dir(root).await {
        Ok(entries) => Resolved::Listing(entries),
        Err(e) => Resolved::Unavailable(e),
    }
}

/// Probe the joined path for a regular file.
///
/// Returns `None` for anything else: missing path, directory, special
/// file, or a path that escapes the root. The probe handle is dropped
/// here whenever the target is rejected.
async fn probe_file(root: &Path, request_path: &str) -> Option<(File, u64)> {
    let target = root.join(request_path.trim_start_matches('/'));

    // A resolved path outside the root is treated like a non-regular file
    let canonical = fs::canonicalize(&target).await.ok()?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes served directory, serving listing instead: {}",
            target.display()
        ));
        return None;
    }

    let file = File::open(&canonical).await.ok()?;
    let metadata = file.metadata().await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    Some((file, metadata.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use std::path::PathBuf;

    fn scratch_root(dir: &tempfile::TempDir) -> PathBuf {
        // Canonicalize like startup does, so containment checks line up
        std_fs::canonicalize(dir.path()).unwrap()
    }

    #[tokio::test]
    async fn regular_file_resolves_to_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let root = scratch_root(&dir);
        std_fs::write(root.join("a.txt"), b"hi\n").unwrap();

        match resolve(&root, "/a.txt").await {
            Resolved::File { len, .. } => assert_eq!(len, 3),
            _ => panic!("expected file mode"),
        }
    }

    #[tokio::test]
    async fn nested_file_resolves_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = scratch_root(&dir);
        std_fs::create_dir(root.join("sub")).unwrap();
        std_fs::write(root.join("sub").join("b.txt"), b"data").unwrap();

        match resolve(&root, "/sub/b.txt").await {
            Resolved::File { len, .. } => assert_eq!(len, 4),
            _ => panic!("expected file mode"),
        }
    }

    #[tokio::test]
    async fn missing_path_falls_back_to_listing() {
        let dir = tempfile::tempdir().unwrap();
        let root = scratch_root(&dir);
        std_fs::write(root.join("a.txt"), b"hi\n").unwrap();

        assert!(matches!(
            resolve(&root, "/missing").await,
            Resolved::Listing(_)
        ));
    }

    #[tokio::test]
    async fn directory_path_falls_back_to_listing() {
        let dir = tempfile::tempdir().unwrap();
        let root = scratch_root(&dir);
        std_fs::create_dir(root.join("sub")).unwrap();

        assert!(matches!(resolve(&root, "/sub").await, Resolved::Listing(_)));
    }

    #[tokio::test]
    async fn traversal_outside_root_falls_back_to_listing() {
        let outer = tempfile::tempdir().unwrap();
        let outer_root = scratch_root(&outer);
        std_fs::write(outer_root.join("secret.txt"), b"secret").unwrap();
        std_fs::create_dir(outer_root.join("served")).unwrap();
        let root = outer_root.join("served");

        assert!(matches!(
            resolve(&root, "/../secret.txt").await,
            Resolved::Listing(_)
        ));
    }

    #[tokio::test]
    async fn unreadable_root_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let root = scratch_root(&dir).join("gone");

        assert!(matches!(
            resolve(&root, "/anything").await,
            Resolved::Unavailable(_)
        ));
    }
}
