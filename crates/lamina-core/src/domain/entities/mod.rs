pub mod config_document;
pub mod layer;
pub mod pool;
pub mod template;

pub use config_document::{ConfigDocument, TemplateSource};
pub use layer::{Layer, Params};
pub use pool::SharedVariablePool;
pub use template::Template;
