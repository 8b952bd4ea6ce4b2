//! Directory lifecycle triggers

pub mod post_confirmation;

pub use post_confirmation::{handle as handle_post_confirmation, PostConfirmationEvent};
