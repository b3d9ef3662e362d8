//! SQL LIKE pattern helpers

/// Escape character used in generated `LIKE` patterns
pub const LIKE_ESCAPE: char = '\\';

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// # Example
///
/// ```
/// use sieve_compiler::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("100% match_test"), "100\\% match\\_test");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern matching values that contain `s`
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(s))
}

/// Pattern matching values that start with `s`
pub fn starts_with_pattern(s: &str) -> String {
    format!("{}%", escape_like_pattern(s))
}

/// Pattern matching values that end with `s`
pub fn ends_with_pattern(s: &str) -> String {
    format!("%{}", escape_like_pattern(s))
}
