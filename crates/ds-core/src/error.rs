/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while configuring or generating a world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The grid is too small to hold the home room and its four neighbors.
    #[error("invalid grid size {size}: must be at least {min}")]
    InvalidGridSize {
        /// The requested grid size.
        size: usize,
        /// The smallest accepted grid size.
        min: usize,
    },

    /// A probability setting lies outside `0.0..=1.0`.
    #[error("invalid probability for {name}: {value} (expected 0.0..=1.0)")]
    InvalidProbability {
        /// Which setting was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The description pool size is zero or larger than the narrative table.
    #[error("description pool size {size} must be between 1 and {max}")]
    InvalidPool {
        /// The requested pool size.
        size: u8,
        /// The number of descriptions available.
        max: u8,
    },
}
