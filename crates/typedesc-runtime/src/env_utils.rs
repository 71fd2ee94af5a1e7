//! Environment variable parsing utilities.
//!
//! Typed access to environment variables with defaults, replacing the usual
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<usize>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! # Example
//!
//! ```
//! use typedesc_runtime::env_utils::{env_bool_or, env_var_or};
//!
//! let max_depth: usize = env_var_or("TYPEDESC_MAX_DEPTH", 64);
//! let lenient = env_bool_or("TYPEDESC_LENIENT_UNTERMINATED", false);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or unparsable.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a boolean flag.
///
/// "1", "true", "yes" and "on" (case-insensitive) are true, "0", "false",
/// "no" and "off" are false. Anything else, or an unset variable, yields
/// `None`.
pub fn env_bool_opt(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag with a default.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    env_bool_opt(key).unwrap_or(default)
}
