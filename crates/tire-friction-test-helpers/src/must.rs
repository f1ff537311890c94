//! Unwrap helper with a good error message.
//!
//! Replaces `expect()` in test code, with `#[track_caller]` for accurate
//! panic locations.

/// Unwrap an `Option`, panicking with a custom message if `None`.
///
/// # Example
///
/// ```rust
/// use tire_friction_test_helpers::must_some;
///
/// let coefficient = Some(0.55_f64);
/// assert!((must_some(coefficient, "expected a coefficient") - 0.55).abs() < 1e-12);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`, with the provided message.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}
