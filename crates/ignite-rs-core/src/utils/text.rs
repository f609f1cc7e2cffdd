//! String utility functions.

use regex::Regex;
use std::sync::OnceLock;

/// Turns an identifier into a human-readable title.
///
/// Words are split on underscores, hyphens and whitespace, and each word's
/// first character is upper-cased.
///
/// # Examples
///
/// ```
/// use ignite_rs_core::utils::text::headline;
///
/// assert_eq!(headline("first_name"), "First Name");
/// assert_eq!(headline("title"), "Title");
/// ```
pub fn headline(s: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[_\-\s]+").unwrap());

    separators
        .split(s)
        .filter(|word| !word.is_empty())
        .map(capfirst)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use ignite_rs_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("hello"), "Hello");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
