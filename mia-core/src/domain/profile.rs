//! Profile domain model

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Symbols used for generated profile ids. The letter `O` is deliberately absent.
pub const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNPQRSTUVWXYZ123456789";

/// Length of a generated profile id
pub const ID_LENGTH: usize = 15;

/// Generate a profile id.
///
/// No collision check is made against existing rows.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    /// Subject identifier assigned by the directory service
    pub sub: String,
    pub display_name: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Profile {
    /// Build a fresh profile from a creation request.
    ///
    /// `created` and `updated` share one instant, truncated to the millisecond
    /// precision of the stored timestamp format.
    pub fn new(input: &CreateProfileInput) -> Self {
        let now = Utc::now().trunc_subsecs(3);
        Self {
            id: generate_id(),
            sub: input.sub.clone(),
            display_name: input.name.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            picture: input.picture.clone(),
            created: now,
            updated: now,
        }
    }
}

/// Input for creating a new profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateProfileInput {
    /// Directory username, accepted but not persisted
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub sub: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    pub picture: Option<String>,
    /// Directory pool id, accepted but not persisted
    pub pool_id: Option<String>,
}
