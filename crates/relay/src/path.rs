use crate::error::{Error, Result};

use std::path::{Component, Path, PathBuf};

use tokio::fs;

/// Maps a log source name to `<root>/<name>.log`, confined to `root`.
///
/// The name comes straight from an untrusted connection target, so the
/// candidate path is normalized lexically (`..` pops a segment, `.` is
/// dropped) and then, for whatever part of it already exists on disk,
/// canonicalized so a symlink cannot point it outside the root. The
/// containment check compares whole path components; `/logs-evil` can never
/// pass for `/logs`.
///
/// # Errors
///
/// Returns [`Error::PathEscape`] when the resolved path would leave the
/// root, and [`Error::Read`] when the root itself cannot be canonicalized.
pub async fn resolve_log_path(root: &Path, name: &str) -> Result<PathBuf> {
    let root = fs::canonicalize(root).await.map_err(|source| Error::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let escape = || Error::PathEscape {
        name: name.to_string(),
    };

    let candidate = root.join(format!("{name}.log"));
    let mut normalized = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(escape());
                }
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }

    // The file itself may not exist yet. Canonicalize it if it does, else
    // its parent directory, to chase symlinks in whatever is on disk.
    let resolved = match fs::canonicalize(&normalized).await {
        Ok(real) => real,
        Err(_) => match normalized.parent() {
            Some(parent) => match (fs::canonicalize(parent).await, normalized.file_name()) {
                (Ok(real_parent), Some(file)) => real_parent.join(file),
                _ => normalized.clone(),
            },
            None => return Err(escape()),
        },
    };

    if resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(escape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[tokio::test]
    async fn plain_name_resolves_under_root() {
        let root = tempdir().unwrap();
        let path = resolve_log_path(root.path(), "myservice").await.unwrap();
        assert!(path.starts_with(root.path().canonicalize().unwrap()));
        assert!(path.ends_with("myservice.log"));
    }

    #[tokio::test]
    async fn traversal_name_is_rejected() {
        let root = tempdir().unwrap();
        let result = resolve_log_path(root.path(), "../../etc/passwd").await;
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[tokio::test]
    async fn absolute_name_is_rejected() {
        let root = tempdir().unwrap();
        let result = resolve_log_path(root.path(), "/etc/passwd").await;
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[tokio::test]
    async fn sibling_prefix_directory_is_rejected() {
        // "/tmp/xyz-evil" must not pass a containment check for "/tmp/xyz":
        // the comparison has to respect component boundaries.
        let parent = tempdir().unwrap();
        let root = parent.path().join("logs");
        let sibling = parent.path().join("logs-evil");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&sibling).unwrap();

        let result = resolve_log_path(&root, "../logs-evil/x").await;
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }

    #[tokio::test]
    async fn dotted_but_contained_name_is_allowed() {
        let root = tempdir().unwrap();
        let path = resolve_log_path(root.path(), "a/../myservice").await.unwrap();
        assert!(path.ends_with("myservice.log"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_file_escaping_root_is_rejected() {
        let outside = tempdir().unwrap();
        let target = outside.path().join("target.log");
        std::fs::write(&target, b"secret").unwrap();

        let root = tempdir().unwrap();
        std::os::unix::fs::symlink(&target, root.path().join("sneaky.log")).unwrap();

        let result = resolve_log_path(root.path(), "sneaky").await;
        assert!(matches!(result, Err(Error::PathEscape { .. })));
    }
}
