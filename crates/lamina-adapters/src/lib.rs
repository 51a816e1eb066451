//! Infrastructure adapters for Lamina.
//!
//! This crate implements the ports defined in `lamina-core::application::ports`.
//! It contains all external dependencies and I/O operations: the local and
//! in-memory filesystems, the template catalog, the renderers, git and the
//! validation hook.

pub mod catalog;
pub mod filesystem;
pub mod hook;
pub mod prompt;
pub mod renderer;
pub mod vcs;

// Re-export commonly used adapters
pub use catalog::FilesystemCatalog;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use hook::CommandHook;
pub use prompt::DefaultsPrompter;
pub use renderer::{CookiecutterRenderer, SimpleRenderer};
pub use vcs::GitCli;
