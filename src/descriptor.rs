//! The immutable type descriptor tree.
//!
//! A [`TypeDescriptor`] names a raw type plus its ordered type arguments, e.g.
//! `java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>`.
//! Descriptors are created by the [`DescriptorBuilder`], the
//! [`parser`](crate::parser) or the [`ReflectiveConverter`](crate::reflect::ReflectiveConverter)
//! and never change afterwards, so clones are cheap pointer copies and can be
//! shared across threads.
//!
//! # Equality
//!
//! Descriptors compare structurally: same raw type, pairwise-equal arguments
//! in the same order, and equal payloads. A descriptor in *identity mode*
//! compares (and hashes) by object identity instead, so it is only ever equal
//! to itself and its clones.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;
use typedesc_runtime::TypeHandle;

use crate::builder::DescriptorBuilder;

/// Inline storage for argument lists; most generic types take one or two.
pub(crate) type Arguments = SmallVec<[TypeDescriptor; 2]>;

struct Node<P> {
    raw_type: TypeHandle,
    arguments: Arguments,
    identity: bool,
    payload: P,
}

/// Immutable descriptor of a (possibly parameterized) type.
///
/// `P` is an optional payload carried by the root node, which lets the same
/// model serve as a typed container key ([`ValueCarrier`]). Argument nodes
/// never carry a payload.
pub struct TypeDescriptor<P = ()> {
    node: Arc<Node<P>>,
}

/// A descriptor paired with a value.
pub type ValueCarrier<V> = TypeDescriptor<V>;

impl<P> Clone for TypeDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl TypeDescriptor {
    /// Descriptor of `raw_type` with no arguments.
    pub fn leaf(raw_type: TypeHandle) -> Self {
        Self::from_parts(raw_type, Arguments::new(), false, ())
    }
}

impl<P> TypeDescriptor<P> {
    pub(crate) fn from_parts(
        raw_type: TypeHandle,
        arguments: Arguments,
        identity: bool,
        payload: P,
    ) -> Self {
        Self {
            node: Arc::new(Node {
                raw_type,
                arguments,
                identity,
                payload,
            }),
        }
    }

    pub fn raw_type(&self) -> &TypeHandle {
        &self.node.raw_type
    }

    /// Type arguments in generic parameter order.
    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.node.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&TypeDescriptor> {
        self.node.arguments.get(index)
    }

    /// Argument bound to the raw type's generic parameter called `parameter`.
    ///
    /// `Map<String, Integer>` answers `"V"` with `Integer`.
    pub fn argument_named(&self, parameter: &str) -> Option<&TypeDescriptor> {
        self.node
            .raw_type
            .type_parameter_index(parameter)
            .and_then(|index| self.argument(index))
    }

    pub fn is_generic(&self) -> bool {
        !self.node.arguments.is_empty()
    }

    /// Whether this descriptor compares by identity.
    pub fn is_identity(&self) -> bool {
        self.node.identity
    }

    pub fn payload(&self) -> &P {
        &self.node.payload
    }

    /// Nesting depth: 0 for a descriptor without arguments.
    pub fn depth(&self) -> usize {
        self.node
            .arguments
            .iter()
            .map(|arg| arg.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Whether two handles point at the same descriptor object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// A builder holding this descriptor's tree, for deriving new descriptors.
    ///
    /// The payload is not carried over; identity mode is. Identity-mode
    /// arguments stay attached as the same nodes.
    pub fn to_builder(&self) -> DescriptorBuilder {
        let mut builder = DescriptorBuilder::of_type(self.node.raw_type.clone());
        builder.set_identity(self.node.identity);
        builder.add_arguments(self.node.arguments.iter());
        builder
    }

    /// Same descriptor with `payload` attached.
    pub fn with_payload<V>(&self, payload: V) -> TypeDescriptor<V> {
        TypeDescriptor::from_parts(
            self.node.raw_type.clone(),
            self.node.arguments.clone(),
            self.node.identity,
            payload,
        )
    }

    /// Same descriptor without its payload.
    pub fn without_payload(&self) -> TypeDescriptor {
        self.with_payload(())
    }
}

impl<P: Clone> TypeDescriptor<P> {
    /// Identity-mode version of this descriptor.
    ///
    /// Returns `self` if it already is in identity mode; otherwise a new
    /// descriptor that is distinct from every other descriptor, including
    /// other results of this call.
    pub fn to_identity(&self) -> Self {
        if self.node.identity {
            return self.clone();
        }
        Self::from_parts(
            self.node.raw_type.clone(),
            self.node.arguments.clone(),
            true,
            self.node.payload.clone(),
        )
    }
}

impl<P: PartialEq> PartialEq for TypeDescriptor<P> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        if self.node.identity || other.node.identity {
            return false;
        }
        self.node.raw_type == other.node.raw_type
            && self.node.arguments == other.node.arguments
            && self.node.payload == other.node.payload
    }
}

impl<P: Eq> Eq for TypeDescriptor<P> {}

impl<P: Hash> Hash for TypeDescriptor<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.node.identity {
            (Arc::as_ptr(&self.node) as *const () as usize).hash(state);
            return;
        }
        self.node.raw_type.hash(state);
        self.node.arguments.hash(state);
        self.node.payload.hash(state);
    }
}

impl<P: fmt::Debug> fmt::Debug for TypeDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TypeDescriptor");
        s.field("raw_type", &self.node.raw_type.name());
        if !self.node.arguments.is_empty() {
            s.field("arguments", &self.node.arguments);
        }
        if self.node.identity {
            s.field("identity", &true);
        }
        s.field("payload", &self.node.payload);
        s.finish()
    }
}
