use thiserror::Error;

/// Errors from the fallible edges of the engine (configuration and registration).
/// Stepping the simulation itself never fails.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A body with this id is already registered.
    #[error("duplicate body id: {0}")]
    DuplicateId(String),
    /// Configuration text could not be parsed or written.
    #[error("config serde error: {0}")]
    Config(#[from] serde_json::Error),
}
