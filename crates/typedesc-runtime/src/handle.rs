//! Nominal type handles.
//!
//! A [`TypeHandle`] is the runtime's identity for one nominal type. Handles are
//! created by the [`TypeRegistry`](crate::registry::TypeRegistry) (or derived from
//! another handle through [`TypeHandle::array_of`]) and are immutable afterwards,
//! so they can be cloned and shared across threads freely.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::names::{array_binary_name, ArrayElement, ARRAY_INTERFACES};
use crate::native::NativeType;

/// What kind of nominal type a handle refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    /// Primitive type with its descriptor char (`I` for `int`).
    Primitive { descriptor: char },
    /// Array type. `component` is never itself an array.
    Array {
        component: TypeHandle,
        dimensions: usize,
    },
}

struct RawTypeInfo {
    name: String,
    simple_name: String,
    kind: TypeKind,
    type_parameters: Vec<String>,
    generic_superclass: Option<NativeType>,
    generic_interfaces: Vec<NativeType>,
    top: bool,
}

/// Handle to a nominal type.
///
/// Equality and hashing use the binary name.
#[derive(Clone)]
pub struct TypeHandle {
    info: Arc<RawTypeInfo>,
}

impl TypeHandle {
    pub(crate) fn declared(
        name: String,
        kind: TypeKind,
        type_parameters: Vec<String>,
        generic_superclass: Option<NativeType>,
        generic_interfaces: Vec<NativeType>,
    ) -> Self {
        let simple_name = crate::names::simple_name(&name).to_string();
        Self {
            info: Arc::new(RawTypeInfo {
                name,
                simple_name,
                kind,
                type_parameters,
                generic_superclass,
                generic_interfaces,
                top: false,
            }),
        }
    }

    pub(crate) fn top(name: String) -> Self {
        let simple_name = crate::names::simple_name(&name).to_string();
        Self {
            info: Arc::new(RawTypeInfo {
                name,
                simple_name,
                kind: TypeKind::Class,
                type_parameters: Vec::new(),
                generic_superclass: None,
                generic_interfaces: Vec::new(),
                top: true,
            }),
        }
    }

    /// Binary (fully-qualified) name, e.g. `java.util.Map` or `[Ljava.lang.String;`.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Short display name, e.g. `Map` or `String[]`.
    pub fn simple_name(&self) -> &str {
        &self.info.simple_name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.info.kind
    }

    /// Declared generic parameter names, in slot order.
    pub fn type_parameters(&self) -> &[String] {
        &self.info.type_parameters
    }

    /// Position of the generic parameter called `name`.
    pub fn type_parameter_index(&self, name: &str) -> Option<usize> {
        self.info.type_parameters.iter().position(|p| p == name)
    }

    pub fn generic_superclass(&self) -> Option<&NativeType> {
        self.info.generic_superclass.as_ref()
    }

    pub fn generic_interfaces(&self) -> &[NativeType] {
        &self.info.generic_interfaces
    }

    /// Whether this is the root of the nominal hierarchy.
    pub fn is_top(&self) -> bool {
        self.info.top
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.info.kind, TypeKind::Primitive { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.info.kind, TypeKind::Array { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.info.kind, TypeKind::Interface)
    }

    /// Element type and dimension count for arrays, `(self, 0)` otherwise.
    pub fn array_base(&self) -> (&TypeHandle, usize) {
        match &self.info.kind {
            TypeKind::Array {
                component,
                dimensions,
            } => (component, *dimensions),
            _ => (self, 0),
        }
    }

    /// Array type of this type with `dimensions` additional dimensions.
    ///
    /// Arrays of arrays collapse into a single handle, so
    /// `string.array_of(1).array_of(1)` is `[[Ljava.lang.String;`.
    pub fn array_of(&self, dimensions: usize) -> TypeHandle {
        if dimensions == 0 {
            return self.clone();
        }

        let (component, existing) = self.array_base();
        let dimensions = existing + dimensions;
        let element = match component.kind() {
            TypeKind::Primitive { descriptor } => ArrayElement::Primitive(*descriptor),
            _ => ArrayElement::Reference(component.name()),
        };
        let name = array_binary_name(element, dimensions);
        let simple_name = format!("{}{}", component.simple_name(), "[]".repeat(dimensions));

        Self {
            info: Arc::new(RawTypeInfo {
                name,
                simple_name,
                kind: TypeKind::Array {
                    component: component.clone(),
                    dimensions,
                },
                type_parameters: Vec::new(),
                generic_superclass: None,
                generic_interfaces: Vec::new(),
                top: false,
            }),
        }
    }

    /// Raw handles of the direct supertypes (superclass first, then interfaces).
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &TypeHandle> + '_ {
        self.info
            .generic_superclass
            .iter()
            .chain(self.info.generic_interfaces.iter())
            .filter_map(NativeType::raw_handle)
    }

    /// Number of distinct transitive supertypes.
    ///
    /// `0` for the top type, interfaces without superinterfaces and
    /// primitives. Arrays count the top type plus the array interfaces.
    pub fn inheritance_level(&self) -> usize {
        if self.is_array() {
            return 1 + ARRAY_INTERFACES.len();
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&TypeHandle> = self.direct_supertypes().collect();
        while let Some(supertype) = pending.pop() {
            if seen.insert(supertype.name()) {
                pending.extend(supertype.direct_supertypes());
            }
        }
        seen.len()
    }

    /// The top type and the array interfaces accept arrays of any element type.
    fn accepts_any_array(&self) -> bool {
        self.is_top() || ARRAY_INTERFACES.contains(&self.name())
    }

    /// Covariance test: can a value of type `other` be used where `self` is expected?
    pub fn is_assignable_from(&self, other: &TypeHandle) -> bool {
        if self == other {
            return true;
        }

        match (self.kind(), other.kind()) {
            (TypeKind::Primitive { .. }, _) | (_, TypeKind::Primitive { .. }) => false,
            (
                TypeKind::Array {
                    component: target,
                    dimensions: target_dims,
                },
                TypeKind::Array {
                    component: source,
                    dimensions: source_dims,
                },
            ) => {
                if target_dims == source_dims {
                    // Identical primitive arrays were caught by the equality check.
                    !target.is_primitive()
                        && !source.is_primitive()
                        && target.is_assignable_from(source)
                } else {
                    // Object[] accepts String[][], the reverse never holds.
                    target_dims < source_dims && target.accepts_any_array()
                }
            }
            (TypeKind::Array { .. }, _) => false,
            (_, TypeKind::Array { .. }) => self.accepts_any_array(),
            _ => {
                self.is_top()
                    || other
                        .direct_supertypes()
                        .any(|supertype| self.is_assignable_from(supertype))
            }
        }
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.info, &other.info) || self.info.name == other.info.name
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.name.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.info.name).finish()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info.name)
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::{TypeLookup, TypeRegistry};

    fn registry() -> TypeRegistry {
        TypeRegistry::with_java_lang().unwrap()
    }

    #[test]
    fn test_array_of_names() {
        let reg = registry();
        let string = reg.lookup("java.lang.String").unwrap();

        let array = string.array_of(1);
        assert_eq!(array.name(), "[Ljava.lang.String;");
        assert_eq!(array.simple_name(), "String[]");

        let nested = array.array_of(1);
        assert_eq!(nested.name(), "[[Ljava.lang.String;");
        assert_eq!(nested.array_base().0, &string);
        assert_eq!(nested.array_base().1, 2);

        let ints = reg.lookup("int").unwrap().array_of(1);
        assert_eq!(ints.name(), "[I");
        assert_eq!(ints.simple_name(), "int[]");
    }

    #[test]
    fn test_assignable_through_hierarchy() {
        let reg = registry();
        let object = reg.top_type();
        let list = reg.lookup("java.util.List").unwrap();
        let collection = reg.lookup("java.util.Collection").unwrap();
        let array_list = reg.lookup("java.util.ArrayList").unwrap();
        let string = reg.lookup("java.lang.String").unwrap();
        let char_seq = reg.lookup("java.lang.CharSequence").unwrap();

        assert!(list.is_assignable_from(&array_list));
        assert!(collection.is_assignable_from(&array_list));
        assert!(!array_list.is_assignable_from(&list));
        assert!(char_seq.is_assignable_from(&string));
        assert!(object.is_assignable_from(&list));
        assert!(object.is_assignable_from(&string));
        assert!(!string.is_assignable_from(&object));
    }

    #[test]
    fn test_assignable_primitives_and_arrays() {
        let reg = registry();
        let object = reg.top_type();
        let int = reg.lookup("int").unwrap();
        let integer = reg.lookup("java.lang.Integer").unwrap();
        let number = reg.lookup("java.lang.Number").unwrap();

        assert!(int.is_assignable_from(&int));
        assert!(!object.is_assignable_from(&int));
        assert!(!integer.is_assignable_from(&int));

        assert!(number.array_of(1).is_assignable_from(&integer.array_of(1)));
        assert!(!integer.array_of(1).is_assignable_from(&number.array_of(1)));
        assert!(object.array_of(1).is_assignable_from(&integer.array_of(2)));
        assert!(object.is_assignable_from(&int.array_of(1)));
        assert!(!object.array_of(1).is_assignable_from(&int.array_of(1)));
    }

    #[test]
    fn test_inheritance_level() {
        let reg = registry();
        let level = |name: &str| reg.lookup(name).unwrap().inheritance_level();

        assert_eq!(level("java.lang.Object"), 0);
        assert_eq!(level("int"), 0);
        assert!(level("java.lang.Number") < level("java.lang.Integer"));
        assert!(level("java.util.Collection") < level("java.util.List"));
        assert!(level("java.util.List") < level("java.util.ArrayList"));
        assert_eq!(reg.lookup("int").unwrap().array_of(2).inheritance_level(), 3);
    }

    #[test]
    fn test_arrays_implement_cloneable_and_serializable() {
        let reg = registry();
        let cloneable = reg.lookup("java.lang.Cloneable").unwrap();
        let serializable = reg.lookup("java.io.Serializable").unwrap();
        let int = reg.lookup("int").unwrap();
        let string = reg.lookup("java.lang.String").unwrap();

        assert!(cloneable.is_assignable_from(&int.array_of(1)));
        assert!(serializable.is_assignable_from(&string.array_of(2)));
        assert!(cloneable.array_of(1).is_assignable_from(&int.array_of(2)));
        assert!(!cloneable.array_of(1).is_assignable_from(&int.array_of(1)));
        assert!(!reg
            .lookup("java.lang.CharSequence")
            .unwrap()
            .is_assignable_from(&string.array_of(1)));
    }
}
