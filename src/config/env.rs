//! # Environment Variable Utilities
//!
//! Provides helpers for reading environment variables with common type conversions.
//! Includes parsing for boolean flags, numbers and durations with fallback defaults.
//!
//! Every reader has a `*_from` variant taking a provider closure, so
//! configuration loaders can be tested without touching the process
//! environment.
//!
//! # Examples
//! ```rust,no_run
//! use postboard::config::env::{read_flag, read_u32};
//!
//! let debug = read_flag("DEBUG", false);
//! let port = read_u32("PORT", 8080);
//! ```

use std::time::Duration;

/// Reads a boolean flag from an environment variable.
///
/// Returns `true` for any of the following case-insensitive values:
/// `"1"`, `"true"`, `"yes"`, `"on"`.
pub fn read_flag(name: &str, default: bool) -> bool {
    read_flag_from(|k| std::env::var(k).ok(), name, default)
}

/// Reads a boolean flag using a custom provider function.
///
/// # Example
/// ```rust
/// use postboard::config::env::read_flag_from;
///
/// let val = read_flag_from(|_| Some("true".into()), "ENABLE_FEATURE", false);
/// assert!(val);
/// ```
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => {
            let s = v.trim().trim_matches(|c| c == '"' || c == '\'');
            matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        None => default,
    }
}

/// Reads an unsigned integer (`u32`) from an environment variable,
/// returning the provided default if parsing fails.
pub fn read_u32(name: &str, default: u32) -> u32 {
    read_u32_from(|k| std::env::var(k).ok(), name, default)
}

/// Provider-based variant of [`read_u32`].
pub fn read_u32_from<F>(provider: F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

/// Reads a duration such as `"15m"` using a custom provider function.
///
/// Missing or unparsable values fall back to `default`.
pub fn read_duration_from<F>(provider: F, name: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| parse_duration(&s))
        .unwrap_or(default)
}

/// Parses a whole-second duration.
///
/// Accepts a bare number of seconds or a number followed by one of the
/// units `s`, `m`, `h`, `d`.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use postboard::config::env::parse_duration;
///
/// assert_eq!(parse_duration("15m"), Some(Duration::from_secs(900)));
/// assert_eq!(parse_duration("42"), Some(Duration::from_secs(42)));
/// assert_eq!(parse_duration("soon"), None);
/// ```
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let s = raw.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let n: u64 = digits.parse().ok()?;

    let factor = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return None,
    };

    n.checked_mul(factor).map(Duration::from_secs)
}
