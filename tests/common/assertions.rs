//! Custom assertion utilities for tests.

use tvm_introspect::types::Address;
use tvm_introspect::MockEmulator;

/// Assert that a result is Ok and return the inner value.
///
/// # Panics
///
/// Panics with `context` and the error if the result is `Err`.
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that an error message contains expected text, ignoring case.
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

/// Assert the exact sequence of methods the emulator ran against `address`.
pub fn assert_only_methods(emulator: &MockEmulator, address: &Address, expected: &[&str]) {
    let actual: Vec<String> = emulator
        .calls_to(address)
        .into_iter()
        .map(|c| c.method)
        .collect();
    assert_eq!(
        actual,
        expected,
        "get-methods run against {}",
        address.to_raw()
    );
}
