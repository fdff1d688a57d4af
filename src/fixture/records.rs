use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::warn;

use super::EMAIL_ADDRESSES_KEY;

/// Where an email-address record sits in the fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RecordLocation {
    /// Index of the test case in the top-level sequence.
    pub test: usize,
    /// Index inside `email_addresses`, `None` for a single-address result.
    pub email: Option<usize>,
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.email {
            Some(e) => write!(f, "test #{} email #{}", self.test, e),
            None => write!(f, "test #{}", self.test),
        }
    }
}

/// Parse fixture text into a YAML value.
pub fn parse_document(text: &str) -> Result<Value> {
    serde_yaml::from_str(text).context("parsing fixture YAML")
}

fn test_cases(doc: &Value) -> Result<&[Value]> {
    match doc {
        Value::Sequence(seq) => Ok(seq),
        Value::Null => Ok(&[]),
        other => bail!(
            "fixture top level must be a sequence of test cases, got {}",
            kind(other)
        ),
    }
}

fn test_cases_mut(doc: &mut Value) -> Result<&mut [Value]> {
    match doc {
        Value::Sequence(seq) => Ok(seq),
        Value::Null => Ok(&mut []),
        other => bail!(
            "fixture top level must be a sequence of test cases, got {}",
            kind(other)
        ),
    }
}

/// All email-address records in document order.
///
/// A result carrying `email_addresses` contributes each mapping of that
/// sequence; any other mapping result is itself the record. Cases without a
/// result (or with a null one) contribute nothing.
pub fn email_records(doc: &Value) -> Result<Vec<(RecordLocation, &Mapping)>> {
    let mut out = Vec::new();
    for (ti, case) in test_cases(doc)?.iter().enumerate() {
        let result = match case.get("result") {
            Some(Value::Mapping(m)) => m,
            Some(Value::Null) | None => continue,
            Some(other) => {
                warn!(test = ti, kind = kind(other), "skipping non-mapping result");
                continue;
            }
        };

        match result.get(EMAIL_ADDRESSES_KEY) {
            Some(Value::Sequence(seq)) => {
                for (ei, entry) in seq.iter().enumerate() {
                    let loc = RecordLocation {
                        test: ti,
                        email: Some(ei),
                    };
                    match entry {
                        Value::Mapping(m) => out.push((loc, m)),
                        other => warn!(%loc, kind = kind(other), "skipping non-mapping record"),
                    }
                }
            }
            Some(Value::Null) => {}
            Some(other) => {
                warn!(test = ti, kind = kind(other), "email_addresses is not a sequence")
            }
            None => out.push((
                RecordLocation {
                    test: ti,
                    email: None,
                },
                result,
            )),
        }
    }
    Ok(out)
}

/// Mutable counterpart of [`email_records`], same traversal rules.
pub fn email_records_mut(doc: &mut Value) -> Result<Vec<(RecordLocation, &mut Mapping)>> {
    let mut out = Vec::new();
    for (ti, case) in test_cases_mut(doc)?.iter_mut().enumerate() {
        let result = match case.get_mut("result") {
            Some(Value::Mapping(m)) => m,
            Some(Value::Null) | None => continue,
            Some(other) => {
                warn!(test = ti, kind = kind(other), "skipping non-mapping result");
                continue;
            }
        };

        if !result.contains_key(EMAIL_ADDRESSES_KEY) {
            out.push((
                RecordLocation {
                    test: ti,
                    email: None,
                },
                result,
            ));
            continue;
        }

        match result.get_mut(EMAIL_ADDRESSES_KEY) {
            Some(Value::Sequence(seq)) => {
                for (ei, entry) in seq.iter_mut().enumerate() {
                    let loc = RecordLocation {
                        test: ti,
                        email: Some(ei),
                    };
                    match entry {
                        Value::Mapping(m) => out.push((loc, m)),
                        other => warn!(%loc, kind = kind(other), "skipping non-mapping record"),
                    }
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                warn!(test = ti, kind = kind(other), "email_addresses is not a sequence")
            }
        }
    }
    Ok(out)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
