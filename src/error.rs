//! Error types shared across the lifecycle subsystem.

/// Boxed error returned by [`Closer`](crate::listener::Closer) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A listener slot was left empty in a strict listener list.
    #[error("nil listener at position {position}")]
    MissingListener { position: usize },

    /// A listener or resource failed to release.
    #[error("failed to close {name}: {source}")]
    Close {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Name of the component whose close failed, if any.
    pub fn component(&self) -> Option<&str> {
        match self {
            Error::Close { name, .. } => Some(name),
            Error::MissingListener { .. } => None,
        }
    }
}
