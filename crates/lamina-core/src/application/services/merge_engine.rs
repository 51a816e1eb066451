//! Merge Engine - combines rendered layer trees into one project directory.
//!
//! Merging is a two-phase copy:
//!
//! 1. **Stage**: every layer's tree is copied, in layer order, into a private
//!    staging directory. Later layers replace earlier files; directories merge.
//! 2. **Promote**: the staged tree is copied to its destination.
//!
//! Rendered trees are never moved, so the scratch area stays intact until it
//! is dropped.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem},
    },
    domain::DomainValidator,
    error::LaminaResult,
};

/// Where the staged project lands relative to the output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// `output/<project name>`.
    #[default]
    Nested,
    /// `output` itself receives the project content.
    Inline,
}

/// Project directory produced by rendering one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLayer {
    pub layer_name: String,
    pub project_dir: PathBuf,
}

impl RenderedLayer {
    /// Final path component of the project directory.
    pub fn top_level_name(&self) -> String {
        self.project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of the staging phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    pub name: String,
    pub root: PathBuf,
}

pub struct MergeEngine<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> MergeEngine<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Destination of a project named `name` under `output`.
    pub fn destination(output: &Path, name: &str, placement: Placement) -> PathBuf {
        match placement {
            Placement::Nested => output.join(name),
            Placement::Inline => output.to_path_buf(),
        }
    }

    /// Fail with `OutputExists` when `destination` is present and overwriting
    /// was not requested.
    pub fn check_destination(&self, destination: &Path, overwrite: bool) -> LaminaResult<()> {
        if !overwrite && self.filesystem.exists(destination) {
            return Err(ApplicationError::OutputExists {
                path: destination.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    /// Copy every rendered tree, in order, into `staging_root/<name>`.
    ///
    /// Top-level names are compared before anything is copied.
    #[instrument(skip_all, fields(layers = layers.len()))]
    pub fn stage(&self, layers: &[RenderedLayer], staging_root: &Path) -> LaminaResult<StagedTree> {
        let names: Vec<(String, String)> = layers
            .iter()
            .map(|l| (l.layer_name.clone(), l.top_level_name()))
            .collect();
        let name = DomainValidator::validate_top_level_names(
            names.iter().map(|(layer, top)| (layer.as_str(), top.as_str())),
        )?;

        let root = staging_root.join(&name);
        for layer in layers {
            debug!(layer = %layer.layer_name, "Staging layer");
            self.copy_tree(&layer.project_dir, &root)?;
        }

        info!(project = %name, "Layers staged");
        Ok(StagedTree { name, root })
    }

    /// Copy the staged tree to its destination and return that path.
    ///
    /// A fresh destination is assembled in a hidden sibling and renamed into
    /// place. An existing destination (with `overwrite`) is written in place;
    /// a failure partway leaves it partially updated.
    #[instrument(skip_all, fields(project = %staged.name, output = %output.display(), placement = ?placement, overwrite = overwrite))]
    pub fn promote(
        &self,
        staged: &StagedTree,
        output: &Path,
        placement: Placement,
        overwrite: bool,
    ) -> LaminaResult<PathBuf> {
        let destination = Self::destination(output, &staged.name, placement);
        self.check_destination(&destination, overwrite)?;

        if self.filesystem.exists(&destination) {
            warn!(path = %destination.display(), "Writing into existing directory");
            self.copy_tree(&staged.root, &destination)?;
        } else {
            self.promote_fresh(&staged.root, &destination)?;
        }

        info!(path = %destination.display(), "Project written");
        Ok(destination)
    }

    fn promote_fresh(&self, from: &Path, destination: &Path) -> LaminaResult<()> {
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        self.filesystem.create_dir_all(parent)?;

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string());
        let temp = parent.join(format!(".{file_name}.lamina-tmp"));
        if self.filesystem.exists(&temp) {
            self.filesystem.remove_dir_all(&temp)?;
        }

        let result = self
            .copy_tree(from, &temp)
            .and_then(|()| self.filesystem.rename(&temp, destination));
        if result.is_err() {
            self.rollback(&temp);
        }
        result
    }

    /// Merge `from` into `to`, replacing files that already exist.
    fn copy_tree(&self, from: &Path, to: &Path) -> LaminaResult<()> {
        self.expect_directory(from)?;
        if self.filesystem.exists(to) && self.filesystem.entry_kind(to)? != EntryKind::Directory {
            self.filesystem.remove_file(to)?;
        }
        self.filesystem.create_dir_all(to)?;

        for entry in self.filesystem.read_dir(from)? {
            let Some(file_name) = entry.file_name() else {
                continue;
            };
            let target = to.join(file_name);

            match self.filesystem.entry_kind(&entry)? {
                EntryKind::Directory => self.copy_tree(&entry, &target)?,
                EntryKind::File => {
                    if self.filesystem.exists(&target)
                        && self.filesystem.entry_kind(&target)? == EntryKind::Directory
                    {
                        self.filesystem.remove_dir_all(&target)?;
                    }
                    self.filesystem.copy_file(&entry, &target)?;
                }
                EntryKind::Other => {
                    return Err(ApplicationError::UnsupportedFileType { path: entry }.into());
                }
            }
        }
        self.filesystem.copy_dir_metadata(from, to)
    }

    fn expect_directory(&self, path: &Path) -> LaminaResult<()> {
        match self.filesystem.entry_kind(path)? {
            EntryKind::Directory => Ok(()),
            _ => Err(ApplicationError::UnsupportedFileType {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    /// Best-effort cleanup of a half-written temporary tree.
    fn rollback(&self, path: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(path) {
            warn!(error = %e, path = %path.display(), "Rollback failed");
        } else {
            debug!(path = %path.display(), "Rollback successful");
        }
    }
}
