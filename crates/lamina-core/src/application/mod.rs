//! Application layer for Lamina.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ConfigureService, BuildService, UpgradeService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Composition rules live in `crate::domain`; services only sequence them
//! around calls to the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BuildOptions, BuildService, ConfigureService, LayerRenderer, MergeEngine, Placement,
    RenderedLayer, StagedTree, TemplateRegistry, UpgradeRequest, UpgradeService,
    UpgradeSettings,
};

pub use ports::{
    EntryKind, Filesystem, HookOutcome, Prompter, Renderer, TemplateCatalog, ValidationHook,
    VersionControl,
};

pub use error::ApplicationError;
