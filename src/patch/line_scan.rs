use super::{insert_siblings, is_key, Patched};
use crate::fixture::INVALID_REASON_KEY;

/// Insert a `comments: []` sibling after every line whose stripped content
/// starts with `invalid_reason:`, at that line's own indentation.
///
/// Works at any nesting depth. A record that already has a `comments` key
/// (before or after `invalid_reason`) is left as is.
pub fn line_scan(text: &str) -> Patched {
    insert_siblings(text, |content| {
        is_key(content.trim_start(), INVALID_REASON_KEY)
    })
}
