pub mod line_scan;
pub mod regex_insert;
pub mod structured;

use anyhow::Result;
use tracing::{debug, warn};

use crate::fixture::{Strategy, COMMENTS_KEY, INVALID_REASON_KEY};

pub use line_scan::line_scan;
pub use regex_insert::regex_insert;
pub use structured::structured;

/// Outcome of one patch pass over a fixture's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    /// Number of `comments` fields added.
    pub inserted: usize,
}

impl Patched {
    pub fn changed(&self) -> bool {
        self.inserted > 0
    }
}

/// Run `strategy` over `text`.
pub fn apply(strategy: Strategy, text: &str) -> Result<Patched> {
    match strategy {
        Strategy::Structured => structured(text),
        Strategy::LineScan => Ok(line_scan(text)),
        Strategy::Regex { indent } => regex_insert(text, indent),
    }
}

/// The line both text strategies insert, minus indentation and line ending.
fn sibling_line() -> String {
    format!("{COMMENTS_KEY}: []")
}

/// Line ending to use for inserted lines: CRLF if the file already uses it.
fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Split a line (as yielded by `split_inclusive('\n')`) into content and ending.
fn split_ending(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\r', '\n']);
    (content, &line[content.len()..])
}

/// `true` if `body` (already left-trimmed) is a mapping entry for `key`.
fn is_key(body: &str, key: &str) -> bool {
    body.strip_prefix(key)
        .map_or(false, |rest| rest.starts_with(':'))
}

/// Insert a `comments: []` sibling for every line whose content (without
/// its ending) satisfies `is_anchor`, at the anchor's own indentation.
///
/// Records that already have a `comments` key are skipped. An anchor whose
/// value is a block scalar (`|` / `>`) gets the sibling after the scalar's
/// body instead of inside it.
fn insert_siblings<F>(text: &str, is_anchor: F) -> Patched
where
    F: Fn(&str) -> bool,
{
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let sibling = sibling_line();
    let eol = line_ending(text);

    // (line to insert after, indentation)
    let mut pending: Vec<(usize, &str)> = Vec::new();
    let mut scalar_until = None;
    for (i, line) in lines.iter().enumerate() {
        if scalar_until.map_or(false, |end| i <= end) {
            continue;
        }
        let (content, _) = split_ending(line);
        if !is_anchor(content) {
            continue;
        }

        let body = content.trim_start();
        let indent = &content[..content.len() - body.len()];
        if record_has_key(&lines, i, indent.len(), COMMENTS_KEY) {
            debug!(line = i + 1, "record already has comments");
            continue;
        }

        let after = if opens_block_scalar(body) {
            let end = block_scalar_end(&lines, i, indent.len());
            warn!(
                line = i + 1,
                "{INVALID_REASON_KEY} is a block scalar, adding comments after its body"
            );
            scalar_until = Some(end);
            end
        } else {
            i
        };
        pending.push((after, indent));
    }
    pending.sort_by_key(|(after, _)| *after);

    let mut out = String::with_capacity(text.len() + pending.len() * 32);
    let mut queue = pending.iter().peekable();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(line);
        let (_, ending) = split_ending(line);
        while let Some((_, indent)) = queue.next_if(|(after, _)| *after == i) {
            // last line without a newline: break it, and leave the new last line bare
            if ending.is_empty() {
                out.push_str(eol);
            }
            out.push_str(indent);
            out.push_str(&sibling);
            out.push_str(ending);
        }
    }

    Patched {
        text: out,
        inserted: pending.len(),
    }
}

/// Does the block mapping containing `lines[at]` (keys at `indent`) have `key`?
fn record_has_key(lines: &[&str], at: usize, indent: usize, key: &str) -> bool {
    // forward: siblings until something shallower
    for line in &lines[at + 1..] {
        match classify(line) {
            Line::Blank => continue,
            Line::Entry { indent: n, body } if n == indent => {
                if is_key(body, key) {
                    return true;
                }
            }
            Line::Entry { indent: n, .. } if n > indent => continue,
            Line::Entry { .. } => break,
        }
    }

    // backward: siblings, then possibly the `- key:` line that opens the record
    for line in lines[..at].iter().rev() {
        match classify(line) {
            Line::Blank => continue,
            Line::Entry { indent: n, body } if n == indent => {
                if is_key(body, key) {
                    return true;
                }
            }
            Line::Entry { indent: n, .. } if n > indent => continue,
            Line::Entry { indent: n, body } => {
                if n + 2 == indent {
                    if let Some(first) = body.strip_prefix("- ") {
                        return is_key(first.trim_start(), key);
                    }
                }
                break;
            }
        }
    }
    false
}

/// `key: |` / `key: >-` and friends.
fn opens_block_scalar(body: &str) -> bool {
    body.split_once(':')
        .map(|(_, value)| value.trim_start())
        .map_or(false, |v| v.starts_with('|') || v.starts_with('>'))
}

/// Last line of the block scalar opened at `lines[at]`: the final non-blank
/// line indented deeper than the key.
fn block_scalar_end(lines: &[&str], at: usize, indent: usize) -> usize {
    let mut end = at;
    for (j, line) in lines.iter().enumerate().skip(at + 1) {
        let (content, _) = split_ending(line);
        let body = content.trim_start();
        if body.is_empty() {
            continue;
        }
        if content.len() - body.len() <= indent {
            break;
        }
        end = j;
    }
    end
}

enum Line<'a> {
    Blank,
    Entry { indent: usize, body: &'a str },
}

fn classify(line: &str) -> Line<'_> {
    let (content, _) = split_ending(line);
    let body = content.trim_start();
    if body.is_empty() || body.starts_with('#') {
        Line::Blank
    } else {
        Line::Entry {
            indent: content.len() - body.len(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::sample::FIXTURE;
    use crate::verify::check_text;

    #[test]
    fn test_every_strategy_leaves_valid_yaml() {
        for strategy in [
            Strategy::Structured,
            Strategy::LineScan,
            Strategy::Regex { indent: 8 },
            Strategy::Regex { indent: 16 },
        ] {
            let out = apply(strategy, FIXTURE).unwrap();
            assert!(out.changed(), "{} changed nothing", strategy.as_str());
            check_text(&out.text).unwrap();
        }
    }

    #[test]
    fn test_full_coverage_strategies() {
        for strategy in [Strategy::Structured, Strategy::LineScan] {
            let out = apply(strategy, FIXTURE).unwrap();
            assert_eq!(out.inserted, 3);
            assert!(check_text(&out.text).unwrap().is_empty());
        }
    }

    #[test]
    fn test_regex_passes_combine() {
        let first = apply(Strategy::Regex { indent: 8 }, FIXTURE).unwrap();
        let second = apply(Strategy::Regex { indent: 16 }, &first.text).unwrap();
        assert_eq!(first.inserted + second.inserted, 3);
        assert!(check_text(&second.text).unwrap().is_empty());
    }

    #[test]
    fn test_split_ending() {
        assert_eq!(split_ending("  a: b\r\n"), ("  a: b", "\r\n"));
        assert_eq!(split_ending("  a: b"), ("  a: b", ""));
        assert!(is_key("comments: []", "comments"));
        assert!(!is_key("comments_extra: 1", "comments"));
    }

    #[test]
    fn test_block_scalar_detection() {
        assert!(opens_block_scalar("invalid_reason: >"));
        assert!(opens_block_scalar("invalid_reason: |-"));
        assert!(!opens_block_scalar("invalid_reason: 'a > b'"));
        assert!(!opens_block_scalar("invalid_reason: null"));

        let lines = ["r:\n", "  k: >\n", "    one\n", "\n", "    two\n", "  next: 1\n"];
        assert_eq!(block_scalar_end(&lines, 1, 2), 4);
    }

    #[test]
    fn test_text_strategies_never_duplicate_comments() {
        let filled = "\
-
    result:
        invalid_reason: null
        comments:
            - work
-
    result:
        comments: []
        invalid_reason: null
";
        for strategy in [Strategy::LineScan, Strategy::Regex { indent: 8 }] {
            let out = apply(strategy, filled).unwrap();
            assert_eq!(out.inserted, 0, "{}", strategy.as_str());
            assert_eq!(out.text, filled);
            assert!(check_text(&out.text).unwrap().is_empty());
        }
    }
}
