//! Lamina Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Lamina, a
//! layered project template composer: several templates are configured one
//! after another, rendered separately, and merged into a single project.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           lamina-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (Configure, Build, Upgrade, Registry)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Catalog, Prompter, Renderer, Git, ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    lamina-adapters (Infrastructure)     │
//! │ (FilesystemCatalog, LocalFilesystem...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Template, Layer, ConfigDocument, ...) │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lamina_core::prelude::*;
//!
//! let registry = Arc::new(TemplateRegistry::new(catalog));
//!
//! // 1. Configure layers
//! let configure = ConfigureService::new(Arc::clone(&registry), prompter);
//! let (_, doc) = configure.configure(&["docker".into()], ExpansionPolicy::default(), None)?;
//!
//! // 2. Build them into ./out
//! let build = BuildService::new(registry, renderer, filesystem);
//! let project = build.build(&doc, "./out".as_ref(), BuildOptions::default(), scratch.path())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildOptions, BuildService, ConfigureService, Placement, TemplateRegistry,
        UpgradeRequest, UpgradeService, UpgradeSettings,
        ports::{
            Filesystem, Prompter, Renderer, TemplateCatalog, ValidationHook, VersionControl,
        },
    };
    pub use crate::domain::{
        ConfigDocument, Expansion, ExpansionPolicy, Layer, Params, Template, TemplateSource,
    };
    pub use crate::error::{LaminaError, LaminaResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
