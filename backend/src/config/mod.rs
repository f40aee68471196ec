//! Process configuration read once at startup.

pub mod encryption;
pub mod settings;

pub use encryption::{ConfigurationError, cipher_key_from_env};
pub use settings::ClinicSettings;
