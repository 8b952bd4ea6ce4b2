//! Domain models for Mia Core

pub mod profile;

pub use profile::*;
