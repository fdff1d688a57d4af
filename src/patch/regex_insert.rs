use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

use super::{insert_siblings, Patched};
use crate::fixture::{DEFAULT_REGEX_INDENT, INVALID_REASON_KEY};

static DEFAULT_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    anchor_regex(DEFAULT_REGEX_INDENT).expect("anchor pattern for default indent compiles")
});

/// `invalid_reason: <anything>` at exactly `indent` spaces, one line.
fn anchor_regex(indent: usize) -> Result<Regex> {
    // `R`: CRLF-aware `$`, so `\r` never ends up inside the match
    let pattern = format!(r"(?mR)^ {{{indent}}}{INVALID_REASON_KEY}: .*$");
    Regex::new(&pattern).with_context(|| format!("compiling anchor pattern {pattern}"))
}

/// Insert `comments: []` below every `invalid_reason:` line indented by
/// exactly `indent` spaces.
///
/// Lines at other depths are left alone, so one pass covers either the
/// single-address results (8) or the `email_addresses` entries (16). Records
/// that already carry `comments` anywhere are skipped.
pub fn regex_insert(text: &str, indent: usize) -> Result<Patched> {
    let re: Cow<'_, Regex> = if indent == DEFAULT_REGEX_INDENT {
        Cow::Borrowed(&*DEFAULT_ANCHOR)
    } else {
        Cow::Owned(anchor_regex(indent)?)
    };
    debug!(pattern = re.as_str(), "regex anchor");

    Ok(insert_siblings(text, |content| re.is_match(content)))
}
