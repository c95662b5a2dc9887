mod config_manager;
mod config_serializer;
mod content_provider;
mod validate;

pub use config_manager::ConfigManager;
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use content_provider::{ConfigContentProvider, FileContentConfigProvider, MemoryContentProvider};
pub use validate::{Validate, check_range};
