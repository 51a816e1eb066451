//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use lamina_core::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem},
    },
    error::LaminaResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryFile {
    content: Vec<u8>,
    executable: bool,
}

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle for
/// inspection while a service owns another.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, MemoryFile>,
    directories: BTreeSet<PathBuf>,
    /// Entries that are neither files nor directories (symlinks, sockets).
    special: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn kind(&self, path: &Path) -> Option<EntryKind> {
        if self.directories.contains(path) {
            Some(EntryKind::Directory)
        } else if self.files.contains_key(path) {
            Some(EntryKind::File)
        } else if self.special.contains(path) {
            Some(EntryKind::Other)
        } else {
            None
        }
    }

    fn add_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check_parent(&self, path: &Path) -> LaminaResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(not_found(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }

    fn remove_tree(&mut self, path: &Path) {
        self.directories.retain(|p| !p.starts_with(path));
        self.files.retain(|p, _| !p.starts_with(path));
        self.special.retain(|p| !p.starts_with(path));
    }

    fn children(&self, path: &Path) -> Vec<PathBuf> {
        let is_child = |p: &&PathBuf| p.parent() == Some(path);
        let mut out: Vec<PathBuf> = self
            .directories
            .iter()
            .filter(is_child)
            .chain(self.files.keys().filter(is_child))
            .chain(self.special.iter().filter(is_child))
            .cloned()
            .collect();
        out.sort();
        out
    }
}

fn not_found(path: &Path, reason: &str) -> lamina_core::error::LaminaError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    fn read(&self) -> LaminaResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> LaminaResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    /// Add a file, creating its parents (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_parents(parent);
            }
            inner.files.insert(
                path.to_path_buf(),
                MemoryFile {
                    content: content.as_ref().to_vec(),
                    executable: false,
                },
            );
        }
    }

    /// Add an entry that is neither a file nor a directory (testing helper).
    pub fn add_special(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_parents(parent);
            }
            inner.special.insert(path.to_path_buf());
        }
    }

    /// Mark a file executable (testing helper).
    pub fn set_executable(&self, path: &Path, executable: bool) {
        if let Ok(mut inner) = self.inner.write() {
            if let Some(file) = inner.files.get_mut(path) {
                file.executable = executable;
            }
        }
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.get(path).is_some_and(|f| f.executable))
            .unwrap_or(false)
    }

    /// File content as UTF-8, if present (testing helper).
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .and_then(|f| String::from_utf8(f.content.clone()).ok())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        if matches!(inner.kind(path), Some(EntryKind::File | EntryKind::Other)) {
            return Err(not_found(path, "Not a directory"));
        }
        inner.add_parents(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.kind(path).is_some())
            .unwrap_or(false)
    }

    fn entry_kind(&self, path: &Path) -> LaminaResult<EntryKind> {
        self.read()?
            .kind(path)
            .ok_or_else(|| not_found(path, "No such file or directory"))
    }

    fn read_dir(&self, path: &Path) -> LaminaResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if inner.kind(path) != Some(EntryKind::Directory) {
            return Err(not_found(path, "No such directory"));
        }
        Ok(inner.children(path))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        let file = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "No such file"))?;
        inner.check_parent(to)?;
        inner.files.insert(to.to_path_buf(), file);
        Ok(())
    }

    /// Directories carry no metadata here; both sides must still exist.
    fn copy_dir_metadata(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        let inner = self.read()?;
        for path in [from, to] {
            if inner.kind(path) != Some(EntryKind::Directory) {
                return Err(not_found(path, "No such directory"));
            }
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        if inner.kind(from).is_none() {
            return Err(not_found(from, "No such file or directory"));
        }
        inner.check_parent(to)?;
        inner.remove_tree(to);

        let rebase = |p: &PathBuf| -> Option<PathBuf> {
            p.strip_prefix(from).ok().map(|rest| {
                if rest.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(rest)
                }
            })
        };

        let directories: BTreeSet<PathBuf> = inner
            .directories
            .iter()
            .map(|p| rebase(p).unwrap_or_else(|| p.clone()))
            .collect();
        let files: BTreeMap<PathBuf, MemoryFile> = std::mem::take(&mut inner.files)
            .into_iter()
            .map(|(p, f)| (rebase(&p).unwrap_or(p), f))
            .collect();
        let special: BTreeSet<PathBuf> = inner
            .special
            .iter()
            .map(|p| rebase(p).unwrap_or_else(|| p.clone()))
            .collect();

        inner.directories = directories;
        inner.files = files;
        inner.special = special;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        if inner.files.remove(path).is_none() && !inner.special.remove(path) {
            return Err(not_found(path, "No such file"));
        }
        Ok(())
    }

    fn remove_dir(&self, path: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        if inner.kind(path) != Some(EntryKind::Directory) {
            return Err(not_found(path, "No such directory"));
        }
        if !inner.children(path).is_empty() {
            return Err(not_found(path, "Directory not empty"));
        }
        inner.directories.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> LaminaResult<()> {
        let mut inner = self.write()?;
        inner.remove_tree(path);
        Ok(())
    }
}
