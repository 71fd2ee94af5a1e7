//! Custom assertion utilities for tests.
//!
//! Provides assertion helpers that give better error messages and
//! standardize common assertion patterns.

use typedesc::DescriptorError;

/// Assert that a result is Ok and return the inner value.
///
/// # Panics
///
/// Panics with `context` and the error if the result is `Err`.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that a result is Err and return the error.
#[allow(dead_code)]
pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => e,
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert that parsing failed with `MalformedDescriptorText` and return the
/// reported offset.
#[allow(dead_code)]
pub fn assert_malformed<T: std::fmt::Debug>(
    result: Result<T, DescriptorError>,
    context: &str,
) -> usize {
    match assert_err(result, context) {
        DescriptorError::MalformedDescriptorText { position, .. } => position,
        other => panic!(
            "{}: expected MalformedDescriptorText, got: {:?}",
            context, other
        ),
    }
}
