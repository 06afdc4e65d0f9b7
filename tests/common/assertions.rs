//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a response carries the API error body for `status`
#[macro_export]
macro_rules! assert_api_error {
    ($response:expr, $status:expr, $code:expr) => {{
        let response = &$response;
        assert_eq!(response.status_code(), $status, "unexpected status");
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], $code, "unexpected error code in {}", body);
        assert_eq!(body["status"], $status.as_u16(), "status field in {}", body);
        assert!(body["message"].is_string(), "missing message in {}", body);
    }};
}

/// Assert that two values are approximately equal (for floating point)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {
        let diff = ($left - $right).abs();
        assert!(
            diff < $epsilon,
            "Values are not approximately equal: {} vs {} (diff: {})",
            $left,
            $right,
            diff
        );
    };
}

/// Assert that a value is within a range
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $min:expr, $max:expr) => {
        assert!(
            $value >= $min && $value <= $max,
            "Value {} is not in range [{}, {}]",
            $value,
            $min,
            $max
        );
    };
}
