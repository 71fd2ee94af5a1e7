//! Textual rendering of descriptors.
//!
//! Two forms share one recursive algorithm and differ only in how a raw type
//! is named:
//!
//! - display form, using simple names: `Map<String, List<Integer>>`
//! - canonical form, using binary names:
//!   `java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>`
//!
//! The canonical form is what [`parser`](crate::parser) reads back. Identity
//! mode and payloads have no textual representation and are dropped.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};
use typedesc_runtime::TypeHandle;

use crate::descriptor::TypeDescriptor;

fn simple_name(handle: &TypeHandle) -> Cow<'_, str> {
    Cow::Borrowed(handle.simple_name())
}

fn binary_name(handle: &TypeHandle) -> Cow<'_, str> {
    Cow::Borrowed(handle.name())
}

/// Write `descriptor` to `out`, naming each raw type with `name`.
pub fn write_with<P, W, F>(descriptor: &TypeDescriptor<P>, out: &mut W, name: &F) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    F: Fn(&TypeHandle) -> Cow<'_, str>,
{
    out.write_str(&name(descriptor.raw_type()))?;
    if descriptor.arguments().is_empty() {
        return Ok(());
    }
    out.write_char('<')?;
    for (i, argument) in descriptor.arguments().iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_with(argument, out, name)?;
    }
    out.write_char('>')
}

/// Render `descriptor` with a caller-supplied naming function.
///
/// ```
/// use std::borrow::Cow;
/// use typedesc::{serializer::render_with, DescriptorBuilder};
/// use typedesc_runtime::{TypeLookup, TypeRegistry};
///
/// let reg = TypeRegistry::with_java_lang().unwrap();
/// let list = DescriptorBuilder::of_type(reg.lookup("java.util.List").unwrap())
///     .of(reg.lookup("java.lang.String").unwrap())
///     .build()
///     .unwrap();
///
/// let upper = render_with(&list, |h| Cow::Owned(h.simple_name().to_uppercase()));
/// assert_eq!(upper, "LIST<STRING>");
/// ```
pub fn render_with<P, F>(descriptor: &TypeDescriptor<P>, name: F) -> String
where
    F: Fn(&TypeHandle) -> Cow<'_, str>,
{
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_with(descriptor, &mut out, &name);
    out
}

impl<P> TypeDescriptor<P> {
    /// Short-name rendering, e.g. `Map<String, Integer>`.
    pub fn display_form(&self) -> String {
        render_with(self, simple_name)
    }

    /// Fully-qualified rendering accepted by the parser.
    pub fn canonical_form(&self) -> String {
        render_with(self, binary_name)
    }
}

/// `{}` renders the display form, `{:#}` the canonical form.
impl<P> fmt::Display for TypeDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write_with(self, f, &binary_name)
        } else {
            write_with(self, f, &simple_name)
        }
    }
}

impl<P> Serialize for TypeDescriptor<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:#}", self))
    }
}
