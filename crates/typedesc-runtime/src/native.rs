//! Reflective generic-type metadata.
//!
//! [`NativeType`] is what the runtime reports about a use of a type: a plain
//! class, a parameterized type, a generic array, a type variable or a
//! wildcard. Supertype declarations in the registry are stored in this form,
//! and callers hand it to the descriptor converter.

use std::fmt;

use crate::handle::TypeHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    /// A plain nominal type.
    Class(TypeHandle),
    /// A nominal type known only by its binary name.
    Named(String),
    /// A raw type applied to ordered type arguments.
    Parameterized {
        raw: TypeHandle,
        arguments: Vec<NativeType>,
    },
    /// An array whose component type is generic, e.g. `List<String>[]`.
    GenericArray(Box<NativeType>),
    /// A type variable such as `E`. Unresolved unless bound by the consumer.
    TypeVariable {
        name: String,
        bounds: Vec<NativeType>,
    },
    /// `?`, `? extends T` or `? super T`.
    Wildcard {
        upper: Vec<NativeType>,
        lower: Vec<NativeType>,
    },
    /// A type the runtime cannot express as a nominal type.
    Opaque(String),
}

impl NativeType {
    pub fn parameterized(raw: TypeHandle, arguments: impl IntoIterator<Item = NativeType>) -> Self {
        NativeType::Parameterized {
            raw,
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn type_variable(name: impl Into<String>) -> Self {
        NativeType::TypeVariable {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn array_of(component: NativeType) -> Self {
        NativeType::GenericArray(Box::new(component))
    }

    /// Unbounded wildcard (`?`).
    pub fn wildcard() -> Self {
        NativeType::Wildcard {
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    /// The nominal type this metadata is built on, if it has one directly.
    pub fn raw_handle(&self) -> Option<&TypeHandle> {
        match self {
            NativeType::Class(handle) => Some(handle),
            NativeType::Parameterized { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Strip all generic-array layers, returning the innermost component and
    /// the number of layers removed.
    pub fn generic_array_base(&self) -> (&NativeType, usize) {
        let mut current = self;
        let mut dimensions = 0;
        while let NativeType::GenericArray(component) = current {
            current = component;
            dimensions += 1;
        }
        (current, dimensions)
    }
}

impl From<TypeHandle> for NativeType {
    fn from(handle: TypeHandle) -> Self {
        NativeType::Class(handle)
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[NativeType], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Class(handle) => write!(f, "{}", handle.name()),
            NativeType::Named(name) => f.write_str(name),
            NativeType::Parameterized { raw, arguments } => {
                write!(f, "{}<", raw.name())?;
                join(f, arguments, ", ")?;
                f.write_str(">")
            }
            NativeType::GenericArray(component) => write!(f, "{}[]", component),
            NativeType::TypeVariable { name, .. } => f.write_str(name),
            NativeType::Wildcard { upper, lower } => {
                f.write_str("?")?;
                if !lower.is_empty() {
                    f.write_str(" super ")?;
                    join(f, lower, " & ")?;
                } else if !upper.is_empty() {
                    f.write_str(" extends ")?;
                    join(f, upper, " & ")?;
                }
                Ok(())
            }
            NativeType::Opaque(description) => write!(f, "<opaque {}>", description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{TypeLookup, TypeRegistry};

    #[test]
    fn test_display() {
        let reg = TypeRegistry::with_java_lang().unwrap();
        let list = reg.lookup("java.util.List").unwrap();
        let string = reg.lookup("java.lang.String").unwrap();

        let native = NativeType::array_of(NativeType::parameterized(
            list,
            [NativeType::Wildcard {
                upper: vec![string.into()],
                lower: vec![],
            }],
        ));
        assert_eq!(
            native.to_string(),
            "java.util.List<? extends java.lang.String>[]"
        );
    }

    #[test]
    fn test_generic_array_base() {
        let native = NativeType::array_of(NativeType::array_of(NativeType::type_variable("T")));
        let (base, dims) = native.generic_array_base();
        assert_eq!(dims, 2);
        assert_eq!(base, &NativeType::type_variable("T"));
        assert!(base.raw_handle().is_none());
    }
}
