//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use cases: configure a set of layers, build a config document,
//! and upgrade an existing project.

pub mod build_service;
pub mod configure_service;
pub mod layer_renderer;
pub mod merge_engine;
pub mod registry;
pub mod upgrade_service;

pub use build_service::{BuildOptions, BuildService};
pub use configure_service::ConfigureService;
pub use layer_renderer::LayerRenderer;
pub use merge_engine::{MergeEngine, Placement, RenderedLayer, StagedTree};
pub use registry::TemplateRegistry;
pub use upgrade_service::{UpgradeRequest, UpgradeService, UpgradeSettings, commit_message};
