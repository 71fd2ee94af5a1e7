//! Parser configuration.

use serde::{Deserialize, Serialize};
use typedesc_runtime::env_utils::{env_bool_or, env_var_or};

/// Default limit on open `<` nesting levels.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Environment variable overriding [`ParseConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "TYPEDESC_MAX_DEPTH";

/// Environment variable overriding [`ParseConfig::lenient_unterminated`].
pub const ENV_LENIENT_UNTERMINATED: &str = "TYPEDESC_LENIENT_UNTERMINATED";

/// Configuration for [`DescriptorParser`](crate::parser::DescriptorParser).
///
/// # Example
///
/// ```
/// use typedesc::ParseConfig;
///
/// let config = ParseConfig::default()
///     .with_max_depth(8)
///     .with_lenient_unterminated(true);
/// assert_eq!(config.max_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum number of simultaneously open `<` levels (default: 64).
    ///
    /// Input nesting deeper than this fails with `MalformedDescriptorText`.
    pub max_depth: usize,

    /// Close still-open descriptors at end of input instead of failing
    /// (default: false).
    ///
    /// With this set, `java.util.List<java.lang.String` parses as if the
    /// missing `>` were present.
    pub lenient_unterminated: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_unterminated: false,
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that recovers unterminated nesting at end of input.
    pub fn lenient() -> Self {
        Self::default().with_lenient_unterminated(true)
    }

    /// Defaults overridden by `TYPEDESC_MAX_DEPTH` and
    /// `TYPEDESC_LENIENT_UNTERMINATED` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: env_var_or(ENV_MAX_DEPTH, defaults.max_depth),
            lenient_unterminated: env_bool_or(
                ENV_LENIENT_UNTERMINATED,
                defaults.lenient_unterminated,
            ),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_lenient_unterminated(mut self, lenient: bool) -> Self {
        self.lenient_unterminated = lenient;
        self
    }
}
