//! Generic type descriptors
//!
//! An immutable tree model of parameterized types such as
//! `Map<String, List<Integer>>`, with everything needed to move it around:
//!
//! - **Model**: [`TypeDescriptor`], shareable and cheap to clone
//! - **Construction**: [`DescriptorBuilder`], a mutable builder with a fluent API
//! - **Text**: the [`serializer`] renders short and canonical forms, the
//!   [`parser`] reads canonical text back
//! - **Matching**: structural equality plus the shallow assignability check in
//!   [`comparator`]
//! - **Reflection**: [`ReflectiveConverter`] turns runtime generic metadata
//!   into descriptors
//!
//! Raw types come from a runtime implementing [`TypeLookup`]; the
//! [`runtime`] crate provides an in-memory [`TypeRegistry`].
//!
//! # Example
//!
//! ```
//! use typedesc::{DescriptorBuilder, DescriptorParser};
//! use typedesc_runtime::{TypeLookup, TypeRegistry};
//!
//! let registry = TypeRegistry::with_java_lang().unwrap();
//! let built = DescriptorBuilder::of_type(registry.lookup("java.util.Map").unwrap())
//!     .of(registry.lookup("java.lang.String").unwrap())
//!     .of(registry.lookup("java.lang.Integer").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let text = built.canonical_form();
//! assert_eq!(text, "java.util.Map<java.lang.String, java.lang.Integer>");
//!
//! let parsed = DescriptorParser::new(&registry).parse_one(&text).unwrap();
//! assert_eq!(parsed, built);
//! ```

pub mod builder;
pub mod comparator;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod parser;
pub mod reflect;
pub mod serializer;

pub use typedesc_runtime as runtime;

pub use builder::{ArgumentSource, DescriptorBuilder};
pub use comparator::Assignability;
pub use config::ParseConfig;
pub use descriptor::{TypeDescriptor, ValueCarrier};
pub use error::{DescriptorError, Result};
pub use parser::{parse_descriptor, parse_descriptors, DescriptorParser};
pub use reflect::ReflectiveConverter;
pub use typedesc_runtime::{NativeType, TypeHandle, TypeLookup, TypeRegistry};
