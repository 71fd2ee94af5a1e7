//! Parsing canonical descriptor text.
//!
//! The input is the canonical form produced by the serializer, possibly
//! holding several top-level descriptors separated by `", "`:
//!
//! ```text
//! java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>, java.lang.String
//! ```
//!
//! Whitespace is only allowed after a separating comma and around the
//! whole input.
//!
//! Parsing is a single left-to-right scan with an explicit stack of open
//! [`DescriptorBuilder`]s, so input nesting never turns into call-stack
//! recursion. Nesting is still bounded by [`ParseConfig::max_depth`].

use tracing::{trace, warn};
use typedesc_runtime::{TypeHandle, TypeLookup};

use crate::builder::DescriptorBuilder;
use crate::config::ParseConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{DescriptorError, Result};

/// Parser resolving names through a [`TypeLookup`].
///
/// # Example
///
/// ```
/// use typedesc::DescriptorParser;
/// use typedesc_runtime::TypeRegistry;
///
/// let registry = TypeRegistry::with_java_lang().unwrap();
/// let parser = DescriptorParser::new(&registry);
///
/// let map = parser
///     .parse_one("java.util.Map<java.lang.String, java.lang.Integer>")
///     .unwrap();
/// assert_eq!(map.to_string(), "Map<String, Integer>");
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorParser<L> {
    lookup: L,
    config: ParseConfig,
}

impl<L: TypeLookup> DescriptorParser<L> {
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, ParseConfig::default())
    }

    pub fn with_config(lookup: L, config: ParseConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Parse every top-level descriptor in `text`, in order.
    ///
    /// Empty (or all-whitespace) input yields an empty list.
    pub fn parse_all(&self, text: &str) -> Result<Vec<TypeDescriptor>> {
        let offset = text.len() - text.trim_start().len();
        Scan::new(self).run(text.trim(), offset)
    }

    /// Parse `text`, which must hold exactly one descriptor.
    pub fn parse_one(&self, text: &str) -> Result<TypeDescriptor> {
        let mut descriptors = self.parse_all(text)?;
        let count = descriptors.len();
        match descriptors.pop() {
            Some(descriptor) if count == 1 => Ok(descriptor),
            _ => Err(DescriptorError::malformed(
                text.len(),
                format!("expected exactly one descriptor, found {}", count),
            )),
        }
    }
}

/// Parse all descriptors in `text` with the default configuration.
pub fn parse_descriptors<L: TypeLookup>(lookup: L, text: &str) -> Result<Vec<TypeDescriptor>> {
    DescriptorParser::new(lookup).parse_all(text)
}

/// Parse exactly one descriptor from `text` with the default configuration.
pub fn parse_descriptor<L: TypeLookup>(lookup: L, text: &str) -> Result<TypeDescriptor> {
    DescriptorParser::new(lookup).parse_one(text)
}

// =============================================================================
// Scanner
// =============================================================================

struct Scan<'p, L> {
    parser: &'p DescriptorParser<L>,
    /// Open descriptors, innermost last. Children are attached on close.
    stack: Vec<DescriptorBuilder>,
    output: Vec<TypeDescriptor>,
}

impl<'p, L: TypeLookup> Scan<'p, L> {
    fn new(parser: &'p DescriptorParser<L>) -> Self {
        Self {
            parser,
            stack: Vec::new(),
            output: Vec::new(),
        }
    }

    /// `body` must already be trimmed; `base` is its offset in the caller's text.
    fn run(mut self, body: &str, base: usize) -> Result<Vec<TypeDescriptor>> {
        // Start of the name currently being read.
        let mut token: Option<usize> = None;
        // Whether the previous significant character was a closing `>`.
        let mut after_close = false;

        let mut chars = body.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let position = base + i;
            match c {
                '<' => {
                    let name = take(body, &mut token, i)
                        .ok_or_else(|| DescriptorError::malformed(position, "`<` without a type name"))?;
                    self.open(name, position)?;
                    after_close = false;
                }
                ',' => {
                    match take(body, &mut token, i) {
                        Some(name) => self.push_name(name, position)?,
                        None if after_close => {}
                        None => {
                            return Err(DescriptorError::malformed(position, "empty type argument"))
                        }
                    }
                    after_close = false;
                    if chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
                        chars.next();
                    }
                }
                '>' => {
                    if self.stack.is_empty() {
                        return Err(DescriptorError::malformed(position, "unbalanced `>`"));
                    }
                    match take(body, &mut token, i) {
                        Some(name) => self.push_name(name, position)?,
                        None if after_close => {}
                        None => {
                            return Err(DescriptorError::malformed(position, "empty type argument"))
                        }
                    }
                    self.close(position)?;
                    after_close = true;
                }
                c if c.is_whitespace() => {
                    return Err(DescriptorError::malformed(position, "unexpected whitespace"));
                }
                _ => {
                    if after_close {
                        return Err(DescriptorError::malformed(
                            position,
                            "type name directly after `>`",
                        ));
                    }
                    token.get_or_insert(i);
                }
            }
        }

        let end = base + body.len();
        if body.ends_with(',') {
            return Err(DescriptorError::malformed(end - 1, "trailing `,`"));
        }

        if !self.stack.is_empty() {
            if !self.parser.config.lenient_unterminated {
                return Err(DescriptorError::malformed(
                    end,
                    format!("unterminated `<` ({} still open)", self.stack.len()),
                ));
            }
            warn!(
                open = self.stack.len(),
                "closing unterminated descriptors at end of input"
            );
            while !self.stack.is_empty() {
                self.close(end)?;
            }
        }

        // A bare trailing name is always a top-level descriptor: the stack is
        // empty here in both strict and lenient mode.
        if let Some(name) = take(body, &mut token, body.len()) {
            self.push_name(name, end)?;
        }

        Ok(self.output)
    }

    fn resolve(&self, name: &str, position: usize) -> Result<TypeHandle> {
        trace!(name, position, "resolving type name");
        self.parser
            .lookup
            .lookup(name)
            .map_err(DescriptorError::from)
    }

    fn open(&mut self, name: &str, position: usize) -> Result<()> {
        let max_depth = self.parser.config.max_depth;
        if self.stack.len() >= max_depth {
            return Err(DescriptorError::malformed(
                position,
                format!("nesting deeper than {} levels", max_depth),
            ));
        }
        let raw = self.resolve(name, position)?;
        self.stack.push(DescriptorBuilder::of_type(raw));
        Ok(())
    }

    /// Add a bare name to the innermost open descriptor, or emit it as a
    /// top-level descriptor when nothing is open.
    fn push_name(&mut self, name: &str, position: usize) -> Result<()> {
        let raw = self.resolve(name, position)?;
        match self.stack.last_mut() {
            Some(open) => {
                open.add_argument(raw);
            }
            None => self.output.push(TypeDescriptor::leaf(raw)),
        }
        Ok(())
    }

    fn close(&mut self, position: usize) -> Result<()> {
        let closed = self
            .stack
            .pop()
            .ok_or_else(|| DescriptorError::malformed(position, "unbalanced `>`"))?;
        match self.stack.last_mut() {
            Some(parent) => {
                parent.add_argument(closed);
            }
            None => {
                let descriptor = closed.build()?;
                trace!(descriptor = %descriptor, "parsed descriptor");
                self.output.push(descriptor);
            }
        }
        Ok(())
    }
}

/// Take the pending name ending at `end`, if any.
fn take<'a>(body: &'a str, token: &mut Option<usize>, end: usize) -> Option<&'a str> {
    token.take().map(|start| &body[start..end])
}
