//! Business logic layer

pub mod profile;

pub use profile::{ProfileCreator, ProfileService};
