//! Persisting finished covers.
//!
//! The encoded PNG is written to a hidden sibling (`.name.png.tmp`) and renamed
//! over the target, so the final path only ever holds a complete image. Missing
//! parent directories are created.

use crate::paths::ResolvedPaths;
use crate::surface::{DrawingSurface, SurfaceError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode cover: {0}")]
    Encode(#[from] SurfaceError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

/// Write `bytes` to `target` atomically, creating parent directories.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let tmp = temp_path(target);
    if let Err(e) = fs::write(&tmp, bytes) {
        discard(&tmp);
        return Err(io_error(&tmp)(e));
    }
    if let Err(e) = fs::rename(&tmp, target) {
        discard(&tmp);
        return Err(io_error(target)(e));
    }
    Ok(())
}

/// Best effort: a temp file is useless once its write or rename failed.
fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %tmp.display(), error = %e, "could not remove temp file");
        }
    }
}

/// Encode `surface` and store it at `paths.file_path`.
///
/// Returns the site-relative path for embedding in page markup.
pub fn write<S: DrawingSurface + ?Sized>(
    surface: &S,
    paths: &ResolvedPaths,
) -> Result<String, WriteError> {
    let bytes = surface.encode_to_bytes()?;
    write_atomic(&paths.file_path, &bytes)?;
    tracing::debug!(
        path = %paths.file_path.display(),
        bytes = bytes.len(),
        "wrote cover"
    );
    Ok(paths.site_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::resolve;
    use crate::surface::CanvasSize;
    use crate::surface::canvas::tests::RecordingSurface;
    use tempfile::TempDir;

    #[test]
    fn write_creates_media_dir_and_returns_site_path() {
        let tmp = TempDir::new().unwrap();
        let paths = resolve(Some("src/posts/hello.md"), tmp.path()).unwrap();
        let surface = RecordingSurface::new(CanvasSize::DEFAULT);

        let site_path = write(&surface, &paths).unwrap();
        assert_eq!(site_path, "/media/hello-cover.png");
        assert!(tmp.path().join("media/hello-cover.png").exists());
        assert_eq!(
            fs::read(&paths.file_path).unwrap(),
            surface.encode_to_bytes().unwrap()
        );
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("media").join("x-cover.png");
        write_atomic(&target, b"png").unwrap();
        let names: Vec<_> = fs::read_dir(tmp.path().join("media"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["x-cover.png"]);
    }

    #[test]
    fn write_replaces_existing_cover() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("cover.png");
        write_atomic(&target, b"old").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn unwritable_parent_is_io_error() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the media directory should be
        let blocker = tmp.path().join("media");
        fs::write(&blocker, b"not a directory").unwrap();

        let target = blocker.join("x-cover.png");
        let err = write_atomic(&target, b"png").unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }

    #[test]
    fn failed_temp_write_leaves_nothing_behind() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("media").join("x-cover.png");
        // A directory squatting on the temp name makes the write itself fail
        fs::create_dir_all(temp_path(&target).join("occupied")).unwrap();

        let err = write_atomic(&target, b"png").unwrap_err();
        assert!(matches!(err, WriteError::Io { ref path, .. } if *path == temp_path(&target)));
        assert!(!target.exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the target makes the rename fail
        let target = tmp.path().join("x-cover.png");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = write_atomic(&target, b"png").unwrap_err();
        assert!(matches!(err, WriteError::Io { ref path, .. } if *path == target));
        assert!(!temp_path(&target).exists());
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path(Path::new("/out/media/a-cover.png")),
            Path::new("/out/media/.a-cover.png.tmp")
        );
    }
}
