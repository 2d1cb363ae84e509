//! Turns parsed Aptfile directives into an ordered, side-effect-free plan of
//! package-manager actions, and loads the paths those actions write to.

pub mod config;
pub mod plan;
pub mod render;

pub use config::{PlanConfig, DEFAULT_CONFIG_PATH};
pub use plan::{Action, Plan};
pub use render::{pin_contents, pin_value, sanitize_filename, source_line};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
