//! Local filesystem adapter using std::fs.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use lamina_core::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem},
    },
    error::{LaminaError, LaminaResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> LaminaResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies the name.
        fs::symlink_metadata(path).is_ok()
    }

    fn entry_kind(&self, path: &Path) -> LaminaResult<EntryKind> {
        let file_type = fs::symlink_metadata(path)
            .map_err(|e| map_io_error(path, e, "read metadata"))?
            .file_type();
        Ok(if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn read_dir(&self, path: &Path) -> LaminaResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)
            .map_err(|e| map_io_error(path, e, "read directory"))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "read directory entry"))?;
        entries.sort();
        Ok(entries)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        // fs::copy carries the permission bits; the modification time is
        // restored separately. The handle is read-only since the copy may
        // already be read-only; setting times only requires ownership.
        if fs::symlink_metadata(to).is_ok_and(|m| !m.is_dir()) {
            // Replacing a read-only file must not fail on open.
            fs::remove_file(to).map_err(|e| map_io_error(to, e, "replace file"))?;
        }
        fs::copy(from, to).map_err(|e| map_io_error(from, e, "copy file"))?;

        let modified = fs::metadata(from)
            .and_then(|m| m.modified())
            .map_err(|e| map_io_error(from, e, "read modification time"))?;
        File::open(to)
            .and_then(|f| f.set_times(FileTimes::new().set_modified(modified)))
            .map_err(|e| map_io_error(to, e, "set modification time"))
    }

    fn copy_dir_metadata(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        let metadata = fs::metadata(from).map_err(|e| map_io_error(from, e, "read metadata"))?;
        // Times first: a read-only directory can still be opened for that.
        #[cfg(unix)]
        {
            let modified = metadata
                .modified()
                .map_err(|e| map_io_error(from, e, "read modification time"))?;
            File::open(to)
                .and_then(|dir| dir.set_times(FileTimes::new().set_modified(modified)))
                .map_err(|e| map_io_error(to, e, "set modification time"))?;
        }
        fs::set_permissions(to, metadata.permissions())
            .map_err(|e| map_io_error(to, e, "set permissions"))
    }

    fn rename(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_file(&self, path: &Path) -> LaminaResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir(&self, path: &Path) -> LaminaResult<()> {
        fs::remove_dir(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> LaminaResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> LaminaError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
