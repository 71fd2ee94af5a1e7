//! Name-indexed registry of nominal types.
//!
//! The registry plays the part of a class loader: types are defined in
//! dependency order (supertypes first), and afterwards can be looked up by
//! binary name. Array types are never defined explicitly; they are built on
//! demand from their element type and cached.
//!
//! # Example
//!
//! ```
//! use typedesc_runtime::registry::{ClassDef, TypeLookup, TypeRegistry};
//!
//! let registry = TypeRegistry::with_java_lang().unwrap();
//! registry
//!     .define(
//!         ClassDef::class("com.example.Dict")
//!             .with_type_parameters(["K", "V"])
//!             .implements("java.util.Map<K, V>"),
//!     )
//!     .unwrap();
//!
//! let dict = registry.lookup("com.example.Dict").unwrap();
//! assert_eq!(dict.type_parameters(), ["K", "V"]);
//! assert!(registry.lookup("java.util.Map").unwrap().is_assignable_from(&dict));
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::handle::{TypeHandle, TypeKind};
use crate::names::{
    parse_array_binary_name, primitive_by_descriptor, primitive_of, wrapper_of, ArrayElement,
    PRIMITIVES,
};
use crate::native::NativeType;
use crate::signature::split_signature;

/// Binary name of the default root type.
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

// =============================================================================
// TypeLookup Trait
// =============================================================================

/// Lookup of nominal types by fully-qualified name.
///
/// This is the only capability the descriptor parser and converter need from
/// the runtime.
pub trait TypeLookup {
    /// Resolve a binary name to a handle.
    fn lookup(&self, name: &str) -> Result<TypeHandle, RegistryError>;

    /// The root of the nominal hierarchy, used for erasure.
    fn top_type(&self) -> TypeHandle;
}

impl<T: TypeLookup + ?Sized> TypeLookup for &T {
    fn lookup(&self, name: &str) -> Result<TypeHandle, RegistryError> {
        (**self).lookup(name)
    }

    fn top_type(&self) -> TypeHandle {
        (**self).top_type()
    }
}

impl<T: TypeLookup + ?Sized> TypeLookup for std::sync::Arc<T> {
    fn lookup(&self, name: &str) -> Result<TypeHandle, RegistryError> {
        (**self).lookup(name)
    }

    fn top_type(&self) -> TypeHandle {
        (**self).top_type()
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// Declaration of a class or interface.
///
/// Supertypes are signature strings (`java.util.AbstractList<E>`); a bare name
/// matching one of `type_parameters` denotes that type variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub interface: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Defaults to the root type for classes. Must be empty for interfaces.
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl ClassDef {
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface: false,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            interface: true,
            ..Self::class(name)
        }
    }

    pub fn with_type_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

// =============================================================================
// TypeRegistry
// =============================================================================

/// In-memory registry of nominal types, safe to share across threads.
pub struct TypeRegistry {
    types: RwLock<HashMap<String, TypeHandle>>,
    arrays: RwLock<HashMap<String, TypeHandle>>,
    top: TypeHandle,
}

impl TypeRegistry {
    /// Create a registry containing only the root type `top_name`.
    pub fn new(top_name: impl Into<String>) -> Self {
        let top = TypeHandle::top(top_name.into());
        let mut types = HashMap::new();
        types.insert(top.name().to_string(), top.clone());
        Self {
            types: RwLock::new(types),
            arrays: RwLock::new(HashMap::new()),
            top,
        }
    }

    /// Create a registry pre-populated with primitives and the core
    /// `java.lang` / `java.util` / `java.io` types.
    pub fn with_java_lang() -> Result<Self, RegistryError> {
        let registry = Self::new(JAVA_LANG_OBJECT);
        registry.define_primitives()?;
        for def in java_lang_definitions() {
            registry.define(def)?;
        }
        debug!(types = registry.len(), "bootstrapped java.lang registry");
        Ok(registry)
    }

    fn define_primitives(&self) -> Result<(), RegistryError> {
        for (name, descriptor, _) in PRIMITIVES {
            let handle = TypeHandle::declared(
                name.to_string(),
                TypeKind::Primitive { descriptor },
                Vec::new(),
                None,
                Vec::new(),
            );
            self.insert(handle)?;
        }
        Ok(())
    }

    /// Define a class or interface. Its supertypes must already be registered.
    pub fn define(&self, def: ClassDef) -> Result<TypeHandle, RegistryError> {
        validate_definition(&def)?;
        if self.contains(&def.name) {
            return Err(RegistryError::DuplicateType { name: def.name });
        }

        let generic_superclass = match (&def.superclass, def.interface) {
            (Some(_), true) => {
                return Err(invalid(&def.name, "interfaces cannot declare a superclass"));
            }
            (Some(signature), false) => {
                let superclass = self.resolve_signature(signature, &def)?;
                self.expect_kind(&def.name, &superclass, false)?;
                Some(superclass)
            }
            (None, false) => Some(NativeType::Class(self.top.clone())),
            (None, true) => None,
        };

        let mut generic_interfaces = Vec::with_capacity(def.interfaces.len());
        for signature in &def.interfaces {
            let interface = self.resolve_signature(signature, &def)?;
            self.expect_kind(&def.name, &interface, true)?;
            generic_interfaces.push(interface);
        }

        let kind = if def.interface {
            TypeKind::Interface
        } else {
            TypeKind::Class
        };
        let handle = TypeHandle::declared(
            def.name,
            kind,
            def.type_parameters,
            generic_superclass,
            generic_interfaces,
        );
        self.insert(handle.clone())?;
        debug!(name = handle.name(), "defined type");
        Ok(handle)
    }

    fn insert(&self, handle: TypeHandle) -> Result<(), RegistryError> {
        let mut types = self.types.write();
        if types.contains_key(handle.name()) {
            return Err(RegistryError::DuplicateType {
                name: handle.name().to_string(),
            });
        }
        types.insert(handle.name().to_string(), handle);
        Ok(())
    }

    fn resolve_signature(&self, signature: &str, def: &ClassDef) -> Result<NativeType, RegistryError> {
        let (base, args) = split_signature(signature)
            .ok_or_else(|| invalid(&def.name, &format!("malformed signature `{}`", signature)))?;

        if args.is_empty() {
            if def.type_parameters.iter().any(|p| p == base) {
                return Ok(NativeType::type_variable(base));
            }
            // `String implements Comparable<String>` refers to itself before it exists.
            if base == def.name {
                return Ok(NativeType::Named(base.to_string()));
            }
            return self.lookup(base).map(NativeType::Class);
        }

        let raw = self.lookup(base)?;
        if raw.type_parameters().len() != args.len() {
            return Err(invalid(
                &def.name,
                &format!(
                    "{} expects {} type arguments, got {}",
                    raw.name(),
                    raw.type_parameters().len(),
                    args.len()
                ),
            ));
        }
        let arguments = args
            .into_iter()
            .map(|arg| self.resolve_signature(arg, def))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NativeType::Parameterized { raw, arguments })
    }

    fn expect_kind(
        &self,
        name: &str,
        supertype: &NativeType,
        interface: bool,
    ) -> Result<(), RegistryError> {
        let ok = supertype.raw_handle().is_some_and(|raw| {
            if interface {
                raw.is_interface()
            } else {
                matches!(raw.kind(), TypeKind::Class)
            }
        });
        if ok {
            Ok(())
        } else {
            let expected = if interface { "an interface" } else { "a class" };
            Err(invalid(
                name,
                &format!("supertype {} is not {}", supertype, expected),
            ))
        }
    }

    /// Define every class in a JSON array of [`ClassDef`]s, in order.
    ///
    /// Returns the number of types defined.
    pub fn load_json(&self, json: &str) -> Result<usize> {
        let defs: Vec<ClassDef> =
            serde_json::from_str(json).context("Failed to parse type definitions")?;
        let count = defs.len();
        for def in defs {
            let name = def.name.clone();
            self.define(def)
                .with_context(|| format!("Failed to define {}", name))?;
        }
        debug!(count, "loaded type definitions");
        Ok(count)
    }

    /// Like [`load_json`](Self::load_json), reading the definitions from a file.
    pub fn load_json_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.load_json(&json)
    }

    /// Wrapper class of a primitive handle.
    pub fn box_type(&self, primitive: &TypeHandle) -> Option<TypeHandle> {
        if !primitive.is_primitive() {
            return None;
        }
        wrapper_of(primitive.name()).and_then(|wrapper| self.lookup(wrapper).ok())
    }

    /// Primitive handle wrapped by a wrapper class handle.
    pub fn unbox_type(&self, wrapper: &TypeHandle) -> Option<TypeHandle> {
        primitive_of(wrapper.name()).and_then(|primitive| self.lookup(primitive).ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Number of defined (non-array) types, including the root and primitives.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted names of all defined types.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl TypeLookup for TypeRegistry {
    fn lookup(&self, name: &str) -> Result<TypeHandle, RegistryError> {
        if let Some(handle) = self.types.read().get(name) {
            return Ok(handle.clone());
        }
        if let Some(handle) = self.arrays.read().get(name) {
            return Ok(handle.clone());
        }

        let not_found = || RegistryError::TypeNotFound {
            name: name.to_string(),
        };
        let (element, dimensions) = parse_array_binary_name(name).ok_or_else(not_found)?;
        let component = match element {
            ArrayElement::Primitive(descriptor) => {
                let primitive = primitive_by_descriptor(descriptor).ok_or_else(not_found)?;
                self.lookup(primitive).map_err(|_| not_found())?
            }
            ArrayElement::Reference(reference) => {
                let component = self.lookup(reference).map_err(|_| not_found())?;
                if component.is_primitive() {
                    return Err(not_found());
                }
                component
            }
        };

        let array = component.array_of(dimensions);
        let mut arrays = self.arrays.write();
        Ok(arrays.entry(name.to_string()).or_insert(array).clone())
    }

    fn top_type(&self) -> TypeHandle {
        self.top.clone()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("top", &self.top)
            .field("types", &self.len())
            .finish()
    }
}

fn invalid(name: &str, reason: &str) -> RegistryError {
    RegistryError::InvalidDefinition {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_definition(def: &ClassDef) -> Result<(), RegistryError> {
    let name = def.name.as_str();
    if name.is_empty() {
        return Err(invalid(name, "empty name"));
    }
    if name.starts_with('[') || name.contains(['<', '>', ',', ';']) || name.contains(char::is_whitespace)
    {
        return Err(invalid(name, "not a class binary name"));
    }
    for (i, parameter) in def.type_parameters.iter().enumerate() {
        if parameter.is_empty() || def.type_parameters[..i].contains(parameter) {
            return Err(invalid(
                name,
                &format!("bad type parameter `{}`", parameter),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// java.lang bootstrap
// =============================================================================

fn java_lang_definitions() -> Vec<ClassDef> {
    let mut defs = vec![
        ClassDef::interface("java.io.Serializable"),
        ClassDef::interface("java.lang.Cloneable"),
        ClassDef::interface("java.lang.CharSequence"),
        ClassDef::interface("java.lang.Comparable").with_type_parameters(["T"]),
        ClassDef::interface("java.lang.Iterable").with_type_parameters(["T"]),
        ClassDef::interface("java.util.Collection")
            .with_type_parameters(["E"])
            .implements("java.lang.Iterable<E>"),
        ClassDef::interface("java.util.List")
            .with_type_parameters(["E"])
            .implements("java.util.Collection<E>"),
        ClassDef::interface("java.util.Set")
            .with_type_parameters(["E"])
            .implements("java.util.Collection<E>"),
        ClassDef::interface("java.util.Map").with_type_parameters(["K", "V"]),
        ClassDef::class("java.lang.String")
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable<java.lang.String>")
            .implements("java.lang.CharSequence"),
        ClassDef::class("java.lang.Number").implements("java.io.Serializable"),
        ClassDef::class("java.lang.Void"),
        ClassDef::class("java.lang.Boolean")
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable<java.lang.Boolean>"),
        ClassDef::class("java.lang.Character")
            .implements("java.io.Serializable")
            .implements("java.lang.Comparable<java.lang.Character>"),
    ];

    for number in [
        "java.lang.Byte",
        "java.lang.Short",
        "java.lang.Integer",
        "java.lang.Long",
        "java.lang.Float",
        "java.lang.Double",
    ] {
        defs.push(
            ClassDef::class(number)
                .extends("java.lang.Number")
                .implements(format!("java.lang.Comparable<{}>", number)),
        );
    }

    defs.extend([
        ClassDef::class("java.lang.Class")
            .with_type_parameters(["T"])
            .implements("java.io.Serializable"),
        ClassDef::class("java.util.AbstractCollection")
            .with_type_parameters(["E"])
            .implements("java.util.Collection<E>"),
        ClassDef::class("java.util.AbstractList")
            .with_type_parameters(["E"])
            .extends("java.util.AbstractCollection<E>")
            .implements("java.util.List<E>"),
        ClassDef::class("java.util.ArrayList")
            .with_type_parameters(["E"])
            .extends("java.util.AbstractList<E>")
            .implements("java.util.List<E>")
            .implements("java.lang.Cloneable")
            .implements("java.io.Serializable"),
        ClassDef::class("java.util.AbstractSet")
            .with_type_parameters(["E"])
            .extends("java.util.AbstractCollection<E>")
            .implements("java.util.Set<E>"),
        ClassDef::class("java.util.HashSet")
            .with_type_parameters(["E"])
            .extends("java.util.AbstractSet<E>")
            .implements("java.util.Set<E>")
            .implements("java.lang.Cloneable")
            .implements("java.io.Serializable"),
        ClassDef::class("java.util.AbstractMap")
            .with_type_parameters(["K", "V"])
            .implements("java.util.Map<K, V>"),
        ClassDef::class("java.util.HashMap")
            .with_type_parameters(["K", "V"])
            .extends("java.util.AbstractMap<K, V>")
            .implements("java.util.Map<K, V>")
            .implements("java.lang.Cloneable")
            .implements("java.io.Serializable"),
    ]);

    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_java_lang().unwrap()
    }

    #[test]
    fn test_bootstrap_contents() {
        let reg = registry();
        assert!(reg.contains("java.lang.Object"));
        assert!(reg.contains("java.util.HashMap"));
        assert!(reg.contains("int"));
        assert!(reg.top_type().is_top());
        assert_eq!(reg.top_type().name(), JAVA_LANG_OBJECT);

        let map = reg.lookup("java.util.HashMap").unwrap();
        assert_eq!(map.type_parameters(), ["K", "V"]);
        assert_eq!(
            map.generic_superclass().map(|s| s.to_string()),
            Some("java.util.AbstractMap<K, V>".to_string())
        );
    }

    #[test]
    fn test_lookup_missing() {
        let reg = registry();
        let err = reg.lookup("com.example.Missing").unwrap_err();
        assert_eq!(
            err,
            RegistryError::TypeNotFound {
                name: "com.example.Missing".to_string()
            }
        );
        assert!(reg.lookup("[Lcom.example.Missing;").is_err());
        assert!(reg.lookup("[Lint;").is_err());
        assert!(reg.lookup("").is_err());
    }

    #[test]
    fn test_lookup_arrays_are_cached() {
        let reg = registry();
        let first = reg.lookup("[[Ljava.lang.Integer;").unwrap();
        let second = reg.lookup("[[Ljava.lang.Integer;").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.simple_name(), "Integer[][]");
        assert_eq!(reg.lookup("[J").unwrap().simple_name(), "long[]");
    }

    #[test]
    fn test_define_rejects_bad_definitions() {
        let reg = registry();

        let dup = reg.define(ClassDef::class("java.lang.String")).unwrap_err();
        assert!(matches!(dup, RegistryError::DuplicateType { .. }));

        let missing = reg
            .define(ClassDef::class("a.B").extends("a.Missing"))
            .unwrap_err();
        assert!(matches!(missing, RegistryError::TypeNotFound { .. }));

        let iface_super = reg
            .define(ClassDef::class("a.C").extends("java.util.List<java.lang.String>"))
            .unwrap_err();
        assert!(matches!(iface_super, RegistryError::InvalidDefinition { .. }));

        let arity = reg
            .define(ClassDef::class("a.D").implements("java.util.Map<java.lang.String>"))
            .unwrap_err();
        assert!(matches!(arity, RegistryError::InvalidDefinition { .. }));

        let bad_name = reg.define(ClassDef::class("a.E<T>")).unwrap_err();
        assert!(matches!(bad_name, RegistryError::InvalidDefinition { .. }));

        let with_super = reg
            .define(ClassDef::interface("a.F").extends("java.lang.Number"))
            .unwrap_err();
        assert!(matches!(with_super, RegistryError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_define_generic_class() {
        let reg = registry();
        let dict = reg
            .define(
                ClassDef::class("com.example.Outer$Dict")
                    .with_type_parameters(["K", "V"])
                    .extends("java.util.HashMap<K, java.util.List<V>>"),
            )
            .unwrap();

        assert_eq!(dict.simple_name(), "Dict");
        let superclass = dict.generic_superclass().unwrap();
        assert_eq!(
            superclass.to_string(),
            "java.util.HashMap<K, java.util.List<V>>"
        );
        assert!(reg.lookup("java.util.Map").unwrap().is_assignable_from(&dict));
    }

    #[test]
    fn test_box_unbox() {
        let reg = registry();
        let int = reg.lookup("int").unwrap();
        let integer = reg.lookup("java.lang.Integer").unwrap();
        assert_eq!(reg.box_type(&int), Some(integer.clone()));
        assert_eq!(reg.unbox_type(&integer), Some(int));
        assert_eq!(reg.box_type(&integer), None);
    }

    #[test]
    fn test_load_json() {
        let reg = registry();
        let json = r#"[
            {"name": "com.example.Animal"},
            {"name": "com.example.Dog", "superclass": "com.example.Animal"},
            {"name": "com.example.Box", "type_parameters": ["T"], "interfaces": ["java.lang.Iterable<T>"]}
        ]"#;
        assert_eq!(reg.load_json(json).unwrap(), 3);

        let animal = reg.lookup("com.example.Animal").unwrap();
        let dog = reg.lookup("com.example.Dog").unwrap();
        assert!(animal.is_assignable_from(&dog));

        let err = reg.load_json(r#"[{"name": "com.example.Cat", "superclass": "x.Y"}]"#);
        assert!(err.is_err());
        assert!(format!("{:#}", err.unwrap_err()).contains("com.example.Cat"));
    }

    #[test]
    fn test_load_json_file() {
        let reg = registry();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, r#"[{"name": "com.example.Marker", "interface": true}]"#).unwrap();

        assert_eq!(reg.load_json_file(&path).unwrap(), 1);
        assert!(reg.lookup("com.example.Marker").unwrap().is_interface());
        assert!(reg.load_json_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_shared_across_threads() {
        let reg = std::sync::Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reg = reg.clone();
                std::thread::spawn(move || reg.lookup("[Ljava.lang.String;").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().name(), "[Ljava.lang.String;");
        }
    }
}
