use ds_core::CoreError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised while setting up or driving a run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The world could not be generated from the configuration.
    #[error("world generation failed: {0}")]
    Generation(#[from] CoreError),

    /// The engine actor has exited.
    #[error("engine is no longer running")]
    ChannelClosed,

    /// A run setting is out of range or unparseable.
    #[error("invalid configuration: {0}")]
    Config(String),
}
