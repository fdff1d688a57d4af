use anyhow::{Context, Result};
use serde_yaml::Value;
use tracing::debug;

use super::Patched;
use crate::fixture::{email_records_mut, parse_document, COMMENTS_KEY};

/// Parse the fixture, add `comments: []` (as the last key) to every
/// email-address record missing it, and dump the document again.
///
/// The dump normalises formatting, so when nothing needed adding the
/// original text is returned untouched.
pub fn structured(text: &str) -> Result<Patched> {
    let mut doc = parse_document(text)?;

    let mut inserted = 0;
    for (loc, record) in email_records_mut(&mut doc)? {
        if record.contains_key(COMMENTS_KEY) {
            continue;
        }
        record.insert(
            Value::String(COMMENTS_KEY.to_string()),
            Value::Sequence(Vec::new()),
        );
        debug!(%loc, "added comments");
        inserted += 1;
    }

    let text = if inserted == 0 {
        text.to_string()
    } else {
        serde_yaml::to_string(&doc).context("serializing patched fixture")?
    };
    Ok(Patched { text, inserted })
}
