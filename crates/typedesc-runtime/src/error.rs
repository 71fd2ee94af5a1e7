//! Registry error types.

/// Errors raised while defining or looking up nominal types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No type is registered under this name.
    TypeNotFound { name: String },
    /// A type with this name is already registered.
    DuplicateType { name: String },
    /// A definition could not be turned into a type.
    InvalidDefinition { name: String, reason: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::TypeNotFound { name } => write!(f, "type not found: {}", name),
            RegistryError::DuplicateType { name } => {
                write!(f, "type already registered: {}", name)
            }
            RegistryError::InvalidDefinition { name, reason } => {
                write!(f, "invalid definition of {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
