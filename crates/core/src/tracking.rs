//! Public tracking short codes.
//!
//! Customers look an order up with the last four characters of its
//! identifier, without authentication. The code is written to an indexed
//! column at creation time, so lookups are a single equality match.

/// Length of the public tracking code.
pub const SHORT_CODE_LEN: usize = 4;

/// Derive the short code stored alongside a new order: the last four hex
/// characters of its UUID.
pub fn short_code_from_id(id: &uuid::Uuid) -> String {
    let simple = id.simple().to_string();
    simple[simple.len() - SHORT_CODE_LEN..].to_string()
}

/// Normalize a user-typed lookup code: strip everything that is not ASCII
/// alphanumeric, lowercase, keep the last [`SHORT_CODE_LEN`] characters.
///
/// Returns `None` when nothing alphanumeric remains; the caller renders a
/// neutral empty state instead of querying.
pub fn normalize_lookup_code(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let start = cleaned.len().saturating_sub(SHORT_CODE_LEN);
    Some(cleaned[start..].to_string())
}
