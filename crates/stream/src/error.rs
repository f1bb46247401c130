//! Error types for the presage_stream crate.

/// Error type for stream store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StreamError {
    /// Returned when resolving a name that is not in the store.
    #[error("stream not found: {name}")]
    NotFound {
        /// Name that failed to resolve.
        name: String,
    },

    /// Returned when creating a stream under a name that already exists.
    #[error("stream already exists: {name}")]
    AlreadyExists {
        /// Name that is already taken.
        name: String,
    },

    /// Returned when a requested shape has no elements or no axes.
    #[error("invalid shape for stream {name}: {shape:?}")]
    InvalidShape {
        /// Name of the stream being created.
        name: String,
        /// The rejected shape.
        shape: Vec<usize>,
    },
}
