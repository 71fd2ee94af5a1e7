//! Conversion from runtime generic metadata to descriptors.
//!
//! [`ReflectiveConverter`] turns a [`NativeType`] (what the runtime knows about
//! a use of a type) into a [`TypeDescriptor`]. The model has no wildcards or
//! type variables, so those are approximated:
//!
//! - a type variable becomes its explicit binding, or the top type when
//!   unbound (erasure)
//! - a wildcard becomes its first upper bound, or the top type
//! - an argument the runtime cannot name ([`NativeType::Opaque`]) cuts the
//!   argument list short at that position

use std::collections::HashMap;

use tracing::debug;
use typedesc_runtime::{NativeType, TypeLookup};

use crate::descriptor::{Arguments, TypeDescriptor};
use crate::error::{DescriptorError, Result};

/// Converter from [`NativeType`] metadata to descriptors.
///
/// # Example
///
/// ```
/// use typedesc::ReflectiveConverter;
/// use typedesc_runtime::{NativeType, TypeLookup, TypeRegistry};
///
/// let reg = TypeRegistry::with_java_lang().unwrap();
/// let list = reg.lookup("java.util.List").unwrap();
///
/// // List<E>[] with E unbound erases to Object.
/// let native = NativeType::array_of(NativeType::parameterized(list, [NativeType::type_variable("E")]));
/// let descriptor = ReflectiveConverter::new(&reg).convert(&native).unwrap();
/// assert_eq!(descriptor.to_string(), "List[]<Object>");
/// ```
#[derive(Debug, Clone)]
pub struct ReflectiveConverter<L> {
    lookup: L,
    bindings: HashMap<String, TypeDescriptor>,
}

impl<L: TypeLookup> ReflectiveConverter<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            bindings: HashMap::new(),
        }
    }

    /// Resolve the type variable `name` to `descriptor` instead of erasing it.
    pub fn with_binding(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.bind(name, descriptor);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> &mut Self {
        self.bindings.insert(name.into(), descriptor);
        self
    }

    pub fn binding(&self, name: &str) -> Option<&TypeDescriptor> {
        self.bindings.get(name)
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Convert `native` into a descriptor.
    ///
    /// Fails with [`DescriptorError::TypeNotFound`] when a named type is not
    /// known to the lookup, or when `native` itself is opaque.
    pub fn convert(&self, native: &NativeType) -> Result<TypeDescriptor> {
        self.resolve(native)?
            .ok_or_else(|| DescriptorError::TypeNotFound {
                name: native.to_string(),
            })
    }

    /// Direct generic supertypes of `descriptor`, with its arguments
    /// substituted for the raw type's parameters.
    ///
    /// For `ArrayList<String>` this is `AbstractList<String>`, `List<String>`,
    /// `Cloneable` and `Serializable`. When the argument count does not match
    /// the declared parameters (a raw use), the parameters are erased.
    pub fn generic_supertypes<P>(&self, descriptor: &TypeDescriptor<P>) -> Result<Vec<TypeDescriptor>> {
        let raw = descriptor.raw_type();
        let mut scoped = ReflectiveConverter::new(&self.lookup);
        if raw.type_parameters().len() == descriptor.arguments().len() {
            for (parameter, argument) in raw.type_parameters().iter().zip(descriptor.arguments()) {
                scoped.bind(parameter.clone(), argument.clone());
            }
        }

        raw.generic_superclass()
            .into_iter()
            .chain(raw.generic_interfaces())
            .map(|supertype| scoped.convert(supertype))
            .collect()
    }

    /// `None` means the runtime could not name the type.
    fn resolve(&self, native: &NativeType) -> Result<Option<TypeDescriptor>> {
        let descriptor = match native {
            NativeType::Class(handle) => TypeDescriptor::leaf(handle.clone()),
            NativeType::Named(name) => TypeDescriptor::leaf(self.lookup.lookup(name)?),
            NativeType::Parameterized { raw, arguments } => {
                let mut converted = Arguments::new();
                for (index, argument) in arguments.iter().enumerate() {
                    match self.resolve(argument)? {
                        Some(descriptor) => converted.push(descriptor),
                        None => {
                            debug!(
                                raw = raw.name(),
                                index,
                                argument = %argument,
                                "truncating arguments at unresolvable type"
                            );
                            break;
                        }
                    }
                }
                TypeDescriptor::from_parts(raw.clone(), converted, false, ())
            }
            NativeType::GenericArray(_) => {
                let (component, dimensions) = native.generic_array_base();
                let Some(component) = self.resolve(component)? else {
                    return Ok(None);
                };
                // Same handle the parser resolves for this binary name.
                let array = component.raw_type().array_of(dimensions);
                TypeDescriptor::from_parts(
                    self.lookup.lookup(array.name())?,
                    component.arguments().iter().cloned().collect(),
                    false,
                    (),
                )
            }
            NativeType::TypeVariable { name, .. } => match self.bindings.get(name) {
                Some(bound) => bound.clone(),
                None => {
                    debug!(variable = %name, "erasing unbound type variable");
                    TypeDescriptor::leaf(self.lookup.top_type())
                }
            },
            NativeType::Wildcard { upper, .. } => match upper.first() {
                Some(bound) => return self.resolve(bound),
                None => TypeDescriptor::leaf(self.lookup.top_type()),
            },
            NativeType::Opaque(_) => return Ok(None),
        };
        Ok(Some(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DescriptorBuilder;
    use typedesc_runtime::{ClassDef, TypeRegistry};

    fn registry() -> TypeRegistry {
        TypeRegistry::with_java_lang().unwrap()
    }

    fn class(reg: &TypeRegistry, name: &str) -> NativeType {
        NativeType::Class(reg.lookup(name).unwrap())
    }

    #[test]
    fn test_convert_plain_and_parameterized() {
        let reg = registry();
        let converter = ReflectiveConverter::new(&reg);

        let string = converter.convert(&class(&reg, "java.lang.String")).unwrap();
        assert!(string.arguments().is_empty());

        let native = NativeType::parameterized(
            reg.lookup("java.util.Map").unwrap(),
            [
                class(&reg, "java.lang.String"),
                NativeType::parameterized(
                    reg.lookup("java.util.List").unwrap(),
                    [class(&reg, "java.lang.Integer")],
                ),
            ],
        );
        let map = converter.convert(&native).unwrap();
        assert_eq!(map.to_string(), "Map<String, List<Integer>>");
    }

    #[test]
    fn test_opaque_argument_truncates() {
        let reg = registry();
        let native = NativeType::parameterized(
            reg.lookup("java.util.Map").unwrap(),
            [
                class(&reg, "java.lang.String"),
                NativeType::Opaque("captured".to_string()),
            ],
        );
        let map = ReflectiveConverter::new(&reg).convert(&native).unwrap();
        assert_eq!(map.to_string(), "Map<String>");

        let first_opaque = NativeType::parameterized(
            reg.lookup("java.util.Map").unwrap(),
            [
                NativeType::array_of(NativeType::Opaque("captured".to_string())),
                class(&reg, "java.lang.String"),
            ],
        );
        let raw = ReflectiveConverter::new(&reg).convert(&first_opaque).unwrap();
        assert!(raw.arguments().is_empty());
    }

    #[test]
    fn test_opaque_top_level_fails() {
        let reg = registry();
        let err = ReflectiveConverter::new(&reg)
            .convert(&NativeType::Opaque("captured".to_string()))
            .unwrap_err();
        assert!(matches!(err, DescriptorError::TypeNotFound { .. }));

        let missing = ReflectiveConverter::new(&reg)
            .convert(&NativeType::Named("com.example.Missing".to_string()))
            .unwrap_err();
        assert_eq!(
            missing,
            DescriptorError::TypeNotFound {
                name: "com.example.Missing".to_string()
            }
        );
    }

    #[test]
    fn test_type_variables() {
        let reg = registry();
        let list_of_e = NativeType::parameterized(
            reg.lookup("java.util.List").unwrap(),
            [NativeType::type_variable("E")],
        );

        let erased = ReflectiveConverter::new(&reg).convert(&list_of_e).unwrap();
        assert_eq!(erased.to_string(), "List<Object>");

        let bound = ReflectiveConverter::new(&reg)
            .with_binding("E", TypeDescriptor::leaf(reg.lookup("java.lang.Long").unwrap()))
            .convert(&list_of_e)
            .unwrap();
        assert_eq!(bound.to_string(), "List<Long>");
    }

    #[test]
    fn test_wildcards() {
        let reg = registry();
        let converter = ReflectiveConverter::new(&reg);
        let list = reg.lookup("java.util.List").unwrap();

        let unbounded = NativeType::parameterized(list.clone(), [NativeType::wildcard()]);
        assert_eq!(converter.convert(&unbounded).unwrap().to_string(), "List<Object>");

        let extends = NativeType::parameterized(
            list.clone(),
            [NativeType::Wildcard {
                upper: vec![class(&reg, "java.lang.Number")],
                lower: vec![],
            }],
        );
        assert_eq!(converter.convert(&extends).unwrap().to_string(), "List<Number>");

        let super_bound = NativeType::parameterized(
            list,
            [NativeType::Wildcard {
                upper: vec![],
                lower: vec![class(&reg, "java.lang.Integer")],
            }],
        );
        assert_eq!(converter.convert(&super_bound).unwrap().to_string(), "List<Object>");
    }

    #[test]
    fn test_generic_array() {
        let reg = registry();
        // Class<List<String>>[][]
        let native = NativeType::array_of(NativeType::array_of(NativeType::parameterized(
            reg.lookup("java.lang.Class").unwrap(),
            [NativeType::parameterized(
                reg.lookup("java.util.List").unwrap(),
                [class(&reg, "java.lang.String")],
            )],
        )));
        let descriptor = ReflectiveConverter::new(&reg).convert(&native).unwrap();
        assert_eq!(
            descriptor.canonical_form(),
            "[[Ljava.lang.Class;<java.util.List<java.lang.String>>"
        );
        assert_eq!(descriptor.raw_type().array_base().1, 2);
    }

    #[test]
    fn test_generic_array_of_void_is_rejected() {
        let reg = registry();
        let err = ReflectiveConverter::new(&reg)
            .convert(&NativeType::array_of(class(&reg, "void")))
            .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::TypeNotFound {
                name: "[V".to_string()
            }
        );

        let ints = ReflectiveConverter::new(&reg)
            .convert(&NativeType::array_of(class(&reg, "int")))
            .unwrap();
        assert_eq!(ints.canonical_form(), "[I");
    }

    #[test]
    fn test_generic_supertypes() {
        let reg = registry();
        let array_list = DescriptorBuilder::of_type(reg.lookup("java.util.ArrayList").unwrap())
            .of(reg.lookup("java.lang.String").unwrap())
            .build()
            .unwrap();

        let converter = ReflectiveConverter::new(&reg);
        let supertypes: Vec<String> = converter
            .generic_supertypes(&array_list)
            .unwrap()
            .iter()
            .map(|d| d.to_string())
            .collect();
        assert_eq!(
            supertypes,
            ["AbstractList<String>", "List<String>", "Cloneable", "Serializable"]
        );

        let raw = TypeDescriptor::leaf(reg.lookup("java.util.ArrayList").unwrap());
        let erased = converter.generic_supertypes(&raw).unwrap();
        assert_eq!(erased[0].to_string(), "AbstractList<Object>");
    }

    #[test]
    fn test_generic_supertypes_self_reference() {
        let reg = registry();
        reg.define(
            ClassDef::class("com.example.Version")
                .implements("java.lang.Comparable<com.example.Version>"),
        )
        .unwrap();
        let version = TypeDescriptor::leaf(reg.lookup("com.example.Version").unwrap());
        let supertypes = ReflectiveConverter::new(&reg)
            .generic_supertypes(&version)
            .unwrap();
        assert_eq!(supertypes[1].to_string(), "Comparable<Version>");
    }
}
