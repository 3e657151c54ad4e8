//! Environment variable utilities
//!
//! Generic `env_get<T>` for parsing overrides with defaults. Used by the
//! pool configuration (`OFL_*` variables) and the logging setup.

use std::str::FromStr;

/// Get environment variable parsed as type T, or return the default.
///
/// Works with any `FromStr` type; parse failures fall back to the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean.
///
/// Accepts "1", "true", "yes", "on" (case-insensitive) as true; anything
/// else set is false; unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Get environment variable as optional value.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Get environment variable as string, or return the default.
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value).
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var(key).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_returns_default() {
        let val: usize = env_get("__OFL_TEST_UNSET_VAR__", 42);
        assert_eq!(val, 42);

        assert!(env_get_bool("__OFL_TEST_UNSET_VAR__", true));
        assert!(!env_get_bool("__OFL_TEST_UNSET_VAR__", false));

        let opt: Option<u16> = env_get_opt("__OFL_TEST_UNSET_VAR__");
        assert!(opt.is_none());

        assert!(!env_is_set("__OFL_TEST_UNSET_VAR__"));
    }

    #[test]
    fn test_set_and_parse() {
        std::env::set_var("__OFL_TEST_SET_VAR__", "17");
        let val: usize = env_get("__OFL_TEST_SET_VAR__", 0);
        assert_eq!(val, 17);
        assert!(env_is_set("__OFL_TEST_SET_VAR__"));
        std::env::remove_var("__OFL_TEST_SET_VAR__");
    }
}
