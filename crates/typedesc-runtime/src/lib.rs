//! Host runtime model for typedesc.
//!
//! Descriptors refer to nominal types through handles that some runtime has to
//! provide. This crate is that runtime:
//!
//! - [`handle`]: [`TypeHandle`], the identity of one nominal type, with its
//!   covariance test
//! - [`registry`]: [`TypeRegistry`], name-indexed lookup and definition of types,
//!   and the [`TypeLookup`] trait consumers are written against
//! - [`native`]: [`NativeType`], reflective generic-type metadata
//! - [`names`]: binary name construction for arrays and primitives
//! - [`env_utils`]: typed environment variable access

pub mod env_utils;
pub mod error;
pub mod handle;
pub mod names;
pub mod native;
pub mod registry;
pub mod signature;

pub use error::RegistryError;
pub use handle::{TypeHandle, TypeKind};
pub use native::NativeType;
pub use registry::{ClassDef, TypeLookup, TypeRegistry, JAVA_LANG_OBJECT};
