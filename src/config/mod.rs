//! Configuration module — `.stegpass.toml` settings.

pub mod settings;

pub use settings::Settings;
