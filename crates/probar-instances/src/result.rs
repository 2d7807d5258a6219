//! Result and error types for instance resolution.

use crate::category::Category;
use thiserror::Error;

/// Result type for resolution operations
pub type InstanceResult<T> = Result<T, InstanceError>;

/// Error raised by an object constructor that rejects its arguments.
///
/// Constructors registered on an [`ObjectRegistry`](crate::ObjectRegistry)
/// return this; the context wraps it in [`InstanceError::Construction`]
/// without altering the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConstructionError {
    message: String,
}

impl ConstructionError {
    /// Create a construction error with a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a missing positional argument
    #[must_use]
    pub fn missing_argument(index: usize) -> Self {
        Self::new(format!("missing argument at position {index}"))
    }

    /// Get the message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that can occur while resolving or building instances
#[derive(Debug, Error)]
pub enum InstanceError {
    /// No class registered under the canonical identifier
    #[error("Cannot resolve {category} '{name}': class {class} is not registered")]
    Resolution {
        /// Symbolic name requested by the caller
        name: String,
        /// Category the name was resolved in
        category: Category,
        /// Canonical class identifier that was looked up
        class: String,
    },

    /// Symbolic name is empty or not a valid identifier
    #[error("Invalid object name '{name}'")]
    InvalidName {
        /// Rejected name
        name: String,
    },

    /// Page did not become ready within the wait window
    #[error("{class} was not ready after {timeout_ms}ms: {message}")]
    ReadinessTimeout {
        /// Page class identifier
        class: String,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
        /// Timeout message
        message: String,
    },

    /// Class constructor rejected the arguments
    #[error("Failed to construct {class}: {source}")]
    Construction {
        /// Class identifier
        class: String,
        /// Error raised by the constructor
        #[source]
        source: ConstructionError,
    },

    /// Instance is not of the requested Rust type
    #[error("{class} is not a {expected}")]
    TypeMismatch {
        /// Class identifier of the cached instance
        class: String,
        /// Requested type name
        expected: &'static str,
    },

    /// Accessor called directly before it was ever installed
    #[error("Context has no accessor '{accessor}'")]
    UnknownAccessor {
        /// Accessor name
        accessor: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstanceError {
    /// Whether this error came from a constructor
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Whether this error is a readiness timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadinessTimeout { .. })
    }

    /// Whether this error is a resolution failure
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }
}
