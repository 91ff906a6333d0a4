//! Environment variable helpers shared by the `from_env` constructors.
//!
//! Every helper takes a lookup function instead of reading the process
//! environment directly, so configuration parsing can be tested with a plain
//! map. [`process_env`] is the lookup used in production.

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Lookup backed by `std::env::var`.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Trimmed value of `name`, treating blank values as unset.
pub fn var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First set variable among `names`, in order.
pub fn first_var<F>(lookup: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| var(lookup, name))
}

/// Parse `name` into `T`, failing loudly on malformed values.
pub fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(lookup, name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::invalid(name, &raw, "could not be parsed")),
        None => Ok(None),
    }
}

/// Millisecond duration stored in `name`.
pub fn duration_ms_var<F>(lookup: &F, name: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_var::<F, u64>(lookup, name)?.map(Duration::from_millis))
}

/// `"true"`/`"1"` enable, `"false"`/`"0"` disable.
pub fn bool_var<F>(lookup: &F, name: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(lookup, name) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::invalid(name, &raw, "expected true or false")),
        },
        None => Ok(None),
    }
}

/// Comma-separated list, with blanks dropped.
pub fn list_var<F>(lookup: &F, name: &str) -> Option<Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    var(lookup, name).map(|raw| split_list(&raw))
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
