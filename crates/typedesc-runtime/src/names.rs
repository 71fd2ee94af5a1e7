//! Binary name utilities.
//!
//! Nominal types are identified by their binary name:
//! - Classes and interfaces: `java.lang.String`, `pkg.Outer$Inner`
//! - Primitives: `int`, `boolean`, ...
//! - Arrays: one `[` per dimension followed by the element encoding,
//!   `L<name>;` for reference elements or the primitive descriptor char
//!   (`[Ljava.lang.Integer;`, `[[I`).
//!
//! Array names are always built from a component name and a dimension count,
//! never by slicing another type's rendered form.

/// Primitive types as `(name, descriptor, wrapper)`.
pub const PRIMITIVES: [(&str, char, &str); 9] = [
    ("boolean", 'Z', "java.lang.Boolean"),
    ("byte", 'B', "java.lang.Byte"),
    ("char", 'C', "java.lang.Character"),
    ("short", 'S', "java.lang.Short"),
    ("int", 'I', "java.lang.Integer"),
    ("long", 'J', "java.lang.Long"),
    ("float", 'F', "java.lang.Float"),
    ("double", 'D', "java.lang.Double"),
    ("void", 'V', "java.lang.Void"),
];

/// Interfaces every array type implements besides the top type.
pub const ARRAY_INTERFACES: [&str; 2] = ["java.lang.Cloneable", "java.io.Serializable"];

/// Element of an array binary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayElement<'a> {
    /// Primitive element, identified by its descriptor char.
    Primitive(char),
    /// Reference element, identified by its binary name.
    Reference(&'a str),
}

/// Build the binary name of an array type.
///
/// # Examples
///
/// ```
/// use typedesc_runtime::names::{array_binary_name, ArrayElement};
///
/// assert_eq!(
///     array_binary_name(ArrayElement::Reference("java.lang.Integer"), 1),
///     "[Ljava.lang.Integer;"
/// );
/// assert_eq!(array_binary_name(ArrayElement::Primitive('I'), 2), "[[I");
/// ```
pub fn array_binary_name(element: ArrayElement<'_>, dimensions: usize) -> String {
    let mut name = "[".repeat(dimensions);
    match element {
        ArrayElement::Primitive(descriptor) => name.push(descriptor),
        ArrayElement::Reference(component) => {
            name.push('L');
            name.push_str(component);
            name.push(';');
        }
    }
    name
}

/// Split an array binary name into its element and dimension count.
///
/// Returns `None` if `name` is not a well-formed array binary name.
pub fn parse_array_binary_name(name: &str) -> Option<(ArrayElement<'_>, usize)> {
    let element = name.trim_start_matches('[');
    let dimensions = name.len() - element.len();
    if dimensions == 0 {
        return None;
    }

    if let Some(reference) = element
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        if reference.is_empty() || reference.contains(['[', ';']) {
            return None;
        }
        return Some((ArrayElement::Reference(reference), dimensions));
    }

    let mut chars = element.chars();
    match (chars.next(), chars.next()) {
        (Some(descriptor), None) if primitive_by_descriptor(descriptor).is_some() => {
            // `void` has a descriptor but no array type.
            if descriptor == 'V' {
                None
            } else {
                Some((ArrayElement::Primitive(descriptor), dimensions))
            }
        }
        _ => None,
    }
}

/// Short name of a class: the segment after the last `.` and the last `$`.
pub fn simple_name(binary_name: &str) -> &str {
    let after_package = binary_name
        .rsplit_once('.')
        .map(|(_, tail)| tail)
        .unwrap_or(binary_name);
    after_package
        .rsplit_once('$')
        .map(|(_, tail)| tail)
        .unwrap_or(after_package)
}

/// Look up a primitive by its descriptor char, returning its name.
pub fn primitive_by_descriptor(descriptor: char) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(_, d, _)| *d == descriptor)
        .map(|(name, _, _)| *name)
}

/// Look up a primitive's descriptor char by name.
pub fn primitive_descriptor(name: &str) -> Option<char> {
    PRIMITIVES
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, d, _)| *d)
}

/// Wrapper class name of a primitive.
pub fn wrapper_of(primitive: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(n, _, _)| *n == primitive)
        .map(|(_, _, wrapper)| *wrapper)
}

/// Primitive name wrapped by a wrapper class.
pub fn primitive_of(wrapper: &str) -> Option<&'static str> {
    PRIMITIVES
        .iter()
        .find(|(_, _, w)| *w == wrapper)
        .map(|(name, _, _)| *name)
}
