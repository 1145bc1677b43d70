pub mod settings;

pub use settings::{AuthConfig, DatabaseConfig, ProviderConfig, ServerConfig, Settings};
