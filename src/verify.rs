use anyhow::Result;
use serde_yaml::Value;

use crate::fixture::{email_records, parse_document, RecordLocation, COMMENTS_KEY};

/// Locations of every email-address record that has no `comments` key.
/// Empty means the migration is complete.
pub fn missing_comments(doc: &Value) -> Result<Vec<RecordLocation>> {
    Ok(email_records(doc)?
        .into_iter()
        .filter(|(_, record)| !record.contains_key(COMMENTS_KEY))
        .map(|(loc, _)| loc)
        .collect())
}

/// Parse `text` and run [`missing_comments`] on it.
pub fn check_text(text: &str) -> Result<Vec<RecordLocation>> {
    missing_comments(&parse_document(text)?)
}
