//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `lamina-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateCatalog`: Template discovery and loading
//!   - `Prompter`: Parameter collection
//!   - `Renderer`: Template rendering
//!   - `VersionControl`: Worktree, staging and commit operations
//!   - `ValidationHook`: Post-generation checks
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    EntryKind, Filesystem, HookOutcome, Prompter, Renderer, TemplateCatalog, ValidationHook,
    VersionControl,
};

#[cfg(test)]
pub use output::{
    MockFilesystem, MockPrompter, MockRenderer, MockTemplateCatalog, MockValidationHook,
    MockVersionControl,
};
