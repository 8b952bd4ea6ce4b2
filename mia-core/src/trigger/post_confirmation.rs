//! Post-confirmation trigger
//!
//! Invoked by the user directory once an account is confirmed. Creates the
//! profile row and hands the event back untouched.

use crate::domain::CreateProfileInput;
use crate::error::{AppError, Result};
use crate::service::ProfileCreator;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Typed view over the fields of a post-confirmation event we read.
///
/// Everything else in the payload is ignored here and preserved in the
/// returned event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationEvent {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_pool_id: Option<String>,
    pub request: PostConfirmationRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostConfirmationRequest {
    #[serde(default)]
    pub user_attributes: UserAttributes,
}

/// Directory attributes of the confirmed account
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAttributes {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub picture: Option<String>,
}

impl PostConfirmationEvent {
    /// Map the event onto a creation request, failing on missing identity attributes.
    pub fn to_create_input(&self) -> Result<CreateProfileInput> {
        let attributes = &self.request.user_attributes;

        Ok(CreateProfileInput {
            username: self.user_name.clone(),
            sub: required(&attributes.sub, "sub")?,
            name: required(&attributes.given_name, "given_name")?,
            email: required(&attributes.email, "email")?,
            picture: attributes.picture.clone(),
            pool_id: self.user_pool_id.clone(),
        })
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::MalformedEvent(format!(
            "user attribute '{}' is required",
            name
        ))),
    }
}

/// Handle one confirmation event and return it unchanged.
///
/// Failures from the creator propagate as-is so the directory applies its own
/// signup failure policy.
pub async fn handle<C>(creator: &C, event: Value) -> Result<Value>
where
    C: ProfileCreator + ?Sized,
{
    let parsed = PostConfirmationEvent::deserialize(&event)
        .map_err(|e| AppError::MalformedEvent(e.to_string()))?;
    let input = parsed.to_create_input()?;

    info!(
        sub = %input.sub,
        pool_id = parsed.user_pool_id.as_deref().unwrap_or_default(),
        "Handling post confirmation"
    );
    creator.create_profile(input).await?;

    Ok(event)
}
