//! Descriptor error types.
//!
//! All failures are local and synchronous: they are returned by the call that
//! triggered them and nothing is retried internally.

use typedesc_runtime::RegistryError;

/// Errors produced while building, parsing or converting descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// `build()` was called on a builder with no raw type.
    IncompleteDescriptor,

    /// An `and`-style call was made before any argument had been added.
    BuilderSequenceError {
        /// Raw type of the builder the call was made on, if set
        raw_type: Option<String>,
    },

    /// Descriptor text could not be parsed.
    MalformedDescriptorText {
        /// Byte offset in the input where scanning stopped
        position: usize,
        /// What was wrong at that offset
        reason: String,
    },

    /// A name did not resolve to a known raw type.
    TypeNotFound { name: String },

    /// The registry rejected an operation for a reason other than a missing type.
    Registry(RegistryError),
}

impl DescriptorError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        DescriptorError::MalformedDescriptorText {
            position,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorError::IncompleteDescriptor => {
                write!(f, "IncompleteDescriptor: builder has no raw type")
            }
            DescriptorError::BuilderSequenceError { raw_type } => {
                write!(
                    f,
                    "BuilderSequenceError: `and` used before any argument was added"
                )?;
                if let Some(raw) = raw_type {
                    write!(f, " (building {})", raw)?;
                }
                Ok(())
            }
            DescriptorError::MalformedDescriptorText { position, reason } => {
                write!(f, "MalformedDescriptorText at offset {}: {}", position, reason)
            }
            DescriptorError::TypeNotFound { name } => {
                write!(f, "TypeNotFound: {}", name)
            }
            DescriptorError::Registry(err) => write!(f, "registry error: {}", err),
        }
    }
}

impl std::error::Error for DescriptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DescriptorError::Registry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for DescriptorError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::TypeNotFound { name } => DescriptorError::TypeNotFound { name },
            other => DescriptorError::Registry(other),
        }
    }
}

/// Result alias for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;
