//! Assignability comparison between descriptors.
//!
//! Structural equality and hashing live on [`TypeDescriptor`] itself
//! (`PartialEq`/`Hash`). This module adds the shallow assignability check:
//! the raw types and the raw types of the immediate arguments are compared
//! with the runtime's covariance test, nested arguments are not inspected.
//!
//! It also holds two looser relations: equality up to primitive boxing
//! ([`TypeDescriptor::is_normalized_eq`]) and the specificity ordering used
//! to sort candidate types ([`TypeDescriptor::specificity_cmp`]).

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use tracing::debug;
use typedesc_runtime::{TypeLookup, TypeRegistry};

use crate::descriptor::TypeDescriptor;
use crate::reflect::ReflectiveConverter;

/// Outcome of [`TypeDescriptor::compare_assignable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignability {
    /// Raw types and every argument position are covariant.
    Exact,
    /// Raw types match, but at least one argument position only holds in
    /// the reverse direction.
    Contravariant,
    /// Raw types, arity or some argument position do not match in either
    /// direction.
    Incompatible,
}

impl Assignability {
    /// Integer form: `0` exact, `1` contravariant, `-1` incompatible.
    pub fn code(self) -> i32 {
        match self {
            Assignability::Exact => 0,
            Assignability::Contravariant => 1,
            Assignability::Incompatible => -1,
        }
    }

    /// Whether the lenient comparison accepts this outcome.
    pub fn is_accepted(self) -> bool {
        self != Assignability::Incompatible
    }
}

impl<P> TypeDescriptor<P> {
    /// Shallow three-way assignability of `candidate` to `self`.
    pub fn compare_assignable<Q>(&self, candidate: &TypeDescriptor<Q>) -> Assignability {
        if !self.raw_type().is_assignable_from(candidate.raw_type())
            || self.arguments().len() != candidate.arguments().len()
        {
            return Assignability::Incompatible;
        }

        let mut outcome = Assignability::Exact;
        for (expected, actual) in self.arguments().iter().zip(candidate.arguments()) {
            let (expected, actual) = (expected.raw_type(), actual.raw_type());
            if expected.is_assignable_from(actual) {
                continue;
            }
            if actual.is_assignable_from(expected) {
                outcome = Assignability::Contravariant;
            } else {
                return Assignability::Incompatible;
            }
        }
        outcome
    }

    /// Strict shallow check: can a `candidate` be used where `self` is expected?
    ///
    /// `List<Number>` accepts `ArrayList<Integer>` but not `List<Object>`,
    /// and never a `Map<K, V>` with a different argument count.
    pub fn is_assignable_from<Q>(&self, candidate: &TypeDescriptor<Q>) -> bool {
        self.compare_assignable(candidate) == Assignability::Exact
    }

    /// Like [`is_assignable_from`](Self::is_assignable_from), but also accepts
    /// argument positions that are only assignable in the reverse direction.
    pub fn is_assignable_from_lenient<Q>(&self, candidate: &TypeDescriptor<Q>) -> bool {
        self.compare_assignable(candidate).is_accepted()
    }

    /// Strict check against `candidate` and all of its generic supertypes.
    ///
    /// `Map<String, Integer>` accepts a `StringIntMap` declared as
    /// `extends HashMap<String, Integer>`, which the shallow check rejects on
    /// arity. Supertypes that fail to convert are skipped.
    pub fn is_assignable_from_hierarchy<Q, L: TypeLookup>(
        &self,
        candidate: &TypeDescriptor<Q>,
        lookup: L,
    ) -> bool {
        if self.is_assignable_from(candidate) {
            return true;
        }

        let converter = ReflectiveConverter::new(lookup);
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([candidate.without_payload()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if self.is_assignable_from(&current) {
                return true;
            }
            match converter.generic_supertypes(&current) {
                Ok(supertypes) => queue.extend(supertypes),
                Err(err) => {
                    debug!(descriptor = %current, error = %err, "skipping supertypes");
                }
            }
        }
        false
    }
}

impl<P> TypeDescriptor<P> {
    /// Orders descriptors from general to specific.
    ///
    /// Different raw types compare by [`inheritance_level`], so a type sorts
    /// after all of its supertypes; ties between unrelated types fall back to
    /// the binary name. Equal raw types compare by argument count, then
    /// argument by argument. The result is a total order, usable with
    /// `sort_by`.
    ///
    /// [`inheritance_level`]: typedesc_runtime::TypeHandle::inheritance_level
    pub fn specificity_cmp<Q>(&self, other: &TypeDescriptor<Q>) -> Ordering {
        let (raw, other_raw) = (self.raw_type(), other.raw_type());
        if raw != other_raw {
            return raw
                .inheritance_level()
                .cmp(&other_raw.inheritance_level())
                .then_with(|| raw.name().cmp(other_raw.name()));
        }
        self.arguments()
            .len()
            .cmp(&other.arguments().len())
            .then_with(|| {
                self.arguments()
                    .iter()
                    .zip(other.arguments())
                    .map(|(a, b)| a.specificity_cmp(b))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

impl<P: PartialEq> TypeDescriptor<P> {
    /// Equality that treats a primitive and its wrapper class as the same type.
    ///
    /// `int` matches `java.lang.Integer` either way round but not `long`.
    /// Generic descriptors, and pairs where neither side is primitive, use
    /// structural equality.
    pub fn is_normalized_eq(&self, other: &Self, registry: &TypeRegistry) -> bool {
        if self.is_generic() || other.is_generic() {
            return self == other;
        }
        let (raw, other_raw) = (self.raw_type(), other.raw_type());
        match (raw.is_primitive(), other_raw.is_primitive()) {
            (false, false) => self == other,
            (true, true) => raw == other_raw,
            (true, false) => registry.box_type(raw).as_ref() == Some(other_raw),
            (false, true) => registry.unbox_type(raw).as_ref() == Some(other_raw),
        }
    }
}

impl<P: Hash> TypeDescriptor<P> {
    /// Hash of the raw type and the ordered arguments (identity hash in
    /// identity mode), as used by `Hash`.
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
