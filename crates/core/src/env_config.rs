//! Environment variable helpers with warn-level logging for invalid values.

/// Read a string variable, treating unset and blank values the same.
#[must_use]
pub fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Read a string variable with a default for unset or blank values.
#[must_use]
pub fn env_or(var: &str, default: &str) -> String {
    env_non_empty(var).unwrap_or_else(|| default.to_owned())
}

/// Parse an environment variable with a default fallback.
///
/// - Unset or blank: returns `default` silently.
/// - Set but unparseable: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    let Some(raw) = env_non_empty(var) else {
        return default;
    };
    match raw.parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(
                var,
                value = %raw,
                default = %default,
                "invalid env var value, using default"
            );
            default
        },
    }
}
