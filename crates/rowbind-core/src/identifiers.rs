//! SQL identifier quoting and name sanitization utilities.

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them (`"` → `""`), so the
/// result is safe for any input string.
///
/// # Examples
///
/// ```
/// use rowbind_core::identifiers::quote_ansi;
///
/// assert_eq!(quote_ansi("orders"), "\"orders\"");
/// assert_eq!(quote_ansi("select"), "\"select\""); // SQL keyword
/// ```
#[inline]
#[must_use]
pub fn quote_ansi(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// Embedded backticks are escaped by doubling them.
#[inline]
#[must_use]
pub fn quote_backtick(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Sanitize a name for use as a parameter name by stripping everything that
/// is not `[0-9a-zA-Z_]`.
///
/// Characters are stripped rather than erroring; an input of only invalid
/// characters yields an empty string.
#[inline]
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Convert a PascalCase/camelCase name to snake_case.
///
/// Already-snake names pass through unchanged. Consecutive uppercase runs
/// are kept together (`HTTPCode` → `http_code`).
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_ascii_lowercase();
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase();
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
