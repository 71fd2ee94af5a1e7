//! Fixture loading utilities for tests.
//!
//! Provides the standard registry used across the integration tests.

use std::path::Path;

use typedesc::{DescriptorBuilder, TypeDescriptor};
use typedesc_runtime::{TypeLookup, TypeRegistry};

/// Type definitions loaded on top of the `java.lang` bootstrap.
#[allow(dead_code)]
pub const FIXTURE_TYPES: &str = "tests/fixture/types.json";

/// Registry with the `java.lang` bootstrap plus the fixture types.
///
/// # Panics
///
/// Panics if the fixture file is missing or defines an invalid type.
#[allow(dead_code)]
pub fn fixture_registry() -> TypeRegistry {
    let registry = java_lang_registry();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(FIXTURE_TYPES);
    registry
        .load_json_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {:#}", path.display(), e));
    registry
}

/// Registry with only the `java.lang` bootstrap.
#[allow(dead_code)]
pub fn java_lang_registry() -> TypeRegistry {
    TypeRegistry::with_java_lang().expect("java.lang bootstrap")
}

/// Descriptor `raw<arguments...>` built from binary names.
#[allow(dead_code)]
pub fn descriptor(registry: &TypeRegistry, raw: &str, arguments: &[&str]) -> TypeDescriptor {
    DescriptorBuilder::of_type(lookup(registry, raw))
        .of_all(arguments.iter().map(|name| lookup(registry, name)))
        .build()
        .expect("fixture descriptor")
}

#[allow(dead_code)]
pub fn lookup(registry: &TypeRegistry, name: &str) -> typedesc_runtime::TypeHandle {
    registry
        .lookup(name)
        .unwrap_or_else(|e| panic!("fixture type {}: {}", name, e))
}
