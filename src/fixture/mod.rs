pub mod records;
pub mod store;
pub mod strategy;

pub use records::{email_records, email_records_mut, parse_document, RecordLocation};
pub use store::{expand_paths, read_fixture, write_fixture, DEFAULT_FIXTURE_PATH};
pub use strategy::{Strategy, DEFAULT_REGEX_INDENT};

/// Key whose presence every email-address record must have after a migration.
pub const COMMENTS_KEY: &str = "comments";
/// Key the text strategies anchor on.
pub const INVALID_REASON_KEY: &str = "invalid_reason";
/// Key holding the per-address records of a multiple-address result.
pub const EMAIL_ADDRESSES_KEY: &str = "email_addresses";

#[cfg(test)]
pub(crate) mod sample;
