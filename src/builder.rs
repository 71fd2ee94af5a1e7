//! Mutable construction of descriptor trees.
//!
//! [`DescriptorBuilder`] collects a raw type and an ordered list of
//! arguments, then freezes the whole tree with [`build`](DescriptorBuilder::build).
//! Building does not consume the builder, so the same builder can be built
//! again (or extended and built again) later.
//!
//! # Example
//!
//! ```
//! use typedesc::DescriptorBuilder;
//! use typedesc_runtime::{TypeLookup, TypeRegistry};
//!
//! let reg = TypeRegistry::with_java_lang().unwrap();
//! let map = DescriptorBuilder::of_type(reg.lookup("java.util.Map").unwrap())
//!     .of(reg.lookup("java.lang.String").unwrap())
//!     .and(
//!         DescriptorBuilder::of_type(reg.lookup("java.util.List").unwrap())
//!             .of(reg.lookup("java.lang.Integer").unwrap()),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(map.to_string(), "Map<String, List<Integer>>");
//! ```

use typedesc_runtime::TypeHandle;

use crate::descriptor::{Arguments, TypeDescriptor};
use crate::error::{DescriptorError, Result};

/// Anything that can be added as a type argument.
///
/// Raw handles become argument-less child builders and structural
/// descriptors are decomposed back into builder trees. Identity-mode
/// descriptors are kept as they are, so the argument stays the very marker
/// that was passed in.
#[derive(Debug, Clone)]
pub enum ArgumentSource {
    Raw(TypeHandle),
    Builder(DescriptorBuilder),
    Built(TypeDescriptor),
}

impl ArgumentSource {
    /// Raw type of the argument, if one has been set.
    pub fn raw_type(&self) -> Option<&TypeHandle> {
        match self {
            ArgumentSource::Raw(handle) => Some(handle),
            ArgumentSource::Builder(builder) => builder.raw_type(),
            ArgumentSource::Built(descriptor) => Some(descriptor.raw_type()),
        }
    }

    /// Number of type arguments below this one.
    pub fn argument_count(&self) -> usize {
        match self {
            ArgumentSource::Raw(_) => 0,
            ArgumentSource::Builder(builder) => builder.arguments().len(),
            ArgumentSource::Built(descriptor) => descriptor.arguments().len(),
        }
    }

    fn build(&self) -> Result<TypeDescriptor> {
        match self {
            ArgumentSource::Raw(handle) => Ok(TypeDescriptor::leaf(handle.clone())),
            ArgumentSource::Builder(builder) => builder.build(),
            ArgumentSource::Built(descriptor) => Ok(descriptor.clone()),
        }
    }
}

impl From<TypeHandle> for ArgumentSource {
    fn from(handle: TypeHandle) -> Self {
        ArgumentSource::Raw(handle)
    }
}

impl From<&TypeHandle> for ArgumentSource {
    fn from(handle: &TypeHandle) -> Self {
        ArgumentSource::Raw(handle.clone())
    }
}

impl From<DescriptorBuilder> for ArgumentSource {
    fn from(builder: DescriptorBuilder) -> Self {
        ArgumentSource::Builder(builder)
    }
}

impl From<TypeDescriptor> for ArgumentSource {
    fn from(descriptor: TypeDescriptor) -> Self {
        if descriptor.is_identity() {
            ArgumentSource::Built(descriptor)
        } else {
            ArgumentSource::Builder(descriptor.to_builder())
        }
    }
}

impl From<&TypeDescriptor> for ArgumentSource {
    fn from(descriptor: &TypeDescriptor) -> Self {
        ArgumentSource::from(descriptor.clone())
    }
}

/// Builder for [`TypeDescriptor`] trees.
///
/// Not meant to be shared between threads while it is being filled in; the
/// descriptors it builds are.
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    raw_type: Option<TypeHandle>,
    arguments: Vec<ArgumentSource>,
    identity: bool,
}

impl DescriptorBuilder {
    /// An empty builder. A raw type must be set before building.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder for `raw_type` with no arguments yet.
    pub fn of_type(raw_type: TypeHandle) -> Self {
        Self {
            raw_type: Some(raw_type),
            ..Self::default()
        }
    }

    pub fn raw_type(&self) -> Option<&TypeHandle> {
        self.raw_type.as_ref()
    }

    pub fn arguments(&self) -> &[ArgumentSource] {
        &self.arguments
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn set_raw_type(&mut self, raw_type: TypeHandle) -> &mut Self {
        self.raw_type = Some(raw_type);
        self
    }

    /// Build this node in identity mode (see [`TypeDescriptor::is_identity`]).
    pub fn set_identity(&mut self, identity: bool) -> &mut Self {
        self.identity = identity;
        self
    }

    pub fn add_argument(&mut self, argument: impl Into<ArgumentSource>) -> &mut Self {
        self.arguments.push(argument.into());
        self
    }

    /// Append arguments in order.
    pub fn add_arguments<I, A>(&mut self, arguments: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgumentSource>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Like [`add_arguments`](Self::add_arguments), but only valid once at
    /// least one argument has been added.
    pub fn require_non_empty_then_add<I, A>(&mut self, arguments: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgumentSource>,
    {
        if self.arguments.is_empty() {
            return Err(DescriptorError::BuilderSequenceError {
                raw_type: self.raw_type.as_ref().map(|raw| raw.name().to_string()),
            });
        }
        Ok(self.add_arguments(arguments))
    }

    // Fluent forms ------------------------------------------------------------

    /// Append one argument.
    pub fn of(mut self, argument: impl Into<ArgumentSource>) -> Self {
        self.add_argument(argument);
        self
    }

    /// Append several arguments.
    pub fn of_all<I, A>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgumentSource>,
    {
        self.add_arguments(arguments);
        self
    }

    /// Append one more argument after an earlier [`of`](Self::of).
    ///
    /// `Map.of(String).and(List)` is fine; `Map.and(List)` fails with
    /// [`DescriptorError::BuilderSequenceError`].
    pub fn and(mut self, argument: impl Into<ArgumentSource>) -> Result<Self> {
        self.require_non_empty_then_add([argument])?;
        Ok(self)
    }

    /// Build in identity mode.
    pub fn unique(mut self) -> Self {
        self.identity = true;
        self
    }

    // Building ----------------------------------------------------------------

    /// Freeze the tree. Children are built before their parent; identity-mode
    /// arguments added as descriptors are attached unchanged.
    pub fn build(&self) -> Result<TypeDescriptor> {
        self.build_with(())
    }

    /// Freeze the tree with `payload` attached to the root.
    pub fn build_with<P>(&self, payload: P) -> Result<TypeDescriptor<P>> {
        let raw_type = self
            .raw_type
            .clone()
            .ok_or(DescriptorError::IncompleteDescriptor)?;
        let arguments = self
            .arguments
            .iter()
            .map(ArgumentSource::build)
            .collect::<Result<Arguments>>()?;
        Ok(TypeDescriptor::from_parts(
            raw_type,
            arguments,
            self.identity,
            payload,
        ))
    }
}
