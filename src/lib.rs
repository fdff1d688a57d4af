pub mod fixture;
pub mod migrate;
pub mod patch;
pub mod verify;

pub use fixture::{RecordLocation, Strategy};
pub use migrate::{migrate_file, MigrateOptions, MigrationReport};
pub use patch::Patched;
