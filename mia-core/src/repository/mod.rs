//! Data access layer (Repository pattern)

pub mod marshal;
pub mod profile;

pub use marshal::Item;
pub use profile::{DynamoDbProfileStore, ProfileStore, ScanPage};
