//! Settings data model, engine configuration and credential handling.

mod credentials;
mod loader;
mod types;

pub use credentials::{AuthType, CredentialStatus, SecureString};
pub use loader::{ConfigError, EngineConfig, EventsConfig, ValidationConfig};
pub use types::{InferenceBaseConfig, LanguageConfig, ModelConfig, ProviderConfig, Settings};
