pub mod ledger;
pub mod migrations;
pub mod project_store;
pub mod records;
pub mod schema;

pub use ledger::{CreatedMigration, Drift, LedgerEntry, MigrationLedger, MigrationStatus};
pub use migrations::{Migration, Version};
pub use project_store::ProjectStore;
pub use schema::{BASELINE, SchemaScript};
