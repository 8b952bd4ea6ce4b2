//! Tagged attribute encoding for profile rows

use crate::domain::Profile;
use crate::error::{AppError, Result};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

/// A stored row: attribute name to tagged wire value
pub type Item = HashMap<String, AttributeValue>;

/// Partition value marking profile rows, also used as the secondary grouping value
pub const PROFILE_KIND: &str = "profile";

// Key schema
pub const ATTR_KEY: &str = "key";
pub const ATTR_SORT: &str = "sort";
pub const ATTR_GSI: &str = "gsi";
pub const ATTR_GSI_SORT: &str = "gsiSort";

// Profile attributes
pub const ATTR_ID: &str = "id";
pub const ATTR_SUB: &str = "sub";
pub const ATTR_DISPLAY_NAME: &str = "displayName";
pub const ATTR_NAME: &str = "name";
pub const ATTR_EMAIL: &str = "email";
pub const ATTR_PICTURE: &str = "picture";
pub const ATTR_CREATED: &str = "created";
pub const ATTR_UPDATED: &str = "updated";

/// Render a timestamp in the sortable stored format, e.g. `2024-05-01T09:30:00.000Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the primary key of the row holding `sub`'s profile
pub fn profile_key(sub: &str) -> Item {
    HashMap::from([
        (ATTR_KEY.to_string(), AttributeValue::S(PROFILE_KIND.to_string())),
        (ATTR_SORT.to_string(), AttributeValue::S(sub.to_string())),
    ])
}

/// Encode a profile as a single row carrying both the primary `(key, sort)` and
/// the secondary `(gsi, gsiSort)` composite keys.
pub fn profile_to_item(profile: &Profile) -> Item {
    let mut item = profile_key(&profile.sub);
    put_s(&mut item, ATTR_GSI, PROFILE_KIND);
    put_s(&mut item, ATTR_GSI_SORT, &profile.id);
    put_s(&mut item, ATTR_ID, &profile.id);
    put_s(&mut item, ATTR_SUB, &profile.sub);
    put_s(&mut item, ATTR_DISPLAY_NAME, &profile.display_name);
    put_s(&mut item, ATTR_NAME, &profile.name);
    put_s(&mut item, ATTR_EMAIL, &profile.email);
    put_optional_s(&mut item, ATTR_PICTURE, profile.picture.as_deref());
    put_s(&mut item, ATTR_CREATED, &format_timestamp(&profile.created));
    put_s(&mut item, ATTR_UPDATED, &format_timestamp(&profile.updated));
    item
}

/// Decode a stored row back into a profile
pub fn item_to_profile(item: &Item) -> Result<Profile> {
    Ok(Profile {
        id: required_s(item, ATTR_ID)?,
        sub: required_s(item, ATTR_SUB)?,
        display_name: required_s(item, ATTR_DISPLAY_NAME)?,
        name: required_s(item, ATTR_NAME)?,
        email: required_s(item, ATTR_EMAIL)?,
        picture: optional_s(item, ATTR_PICTURE)?,
        created: timestamp(item, ATTR_CREATED)?,
        updated: timestamp(item, ATTR_UPDATED)?,
    })
}

/// Whether a row lives in the profile partition
pub fn is_profile_item(item: &Item) -> bool {
    matches!(item.get(ATTR_KEY), Some(AttributeValue::S(kind)) if kind == PROFILE_KIND)
}

fn put_s(item: &mut Item, name: &str, value: &str) {
    item.insert(name.to_string(), AttributeValue::S(value.to_string()));
}

// Absent values are left out of the row entirely.
fn put_optional_s(item: &mut Item, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        put_s(item, name, value);
    }
}

fn required_s(item: &Item, name: &str) -> Result<String> {
    optional_s(item, name)?
        .ok_or_else(|| AppError::Decode(format!("missing attribute '{}'", name)))
}

fn optional_s(item: &Item, name: &str) -> Result<Option<String>> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(AppError::Decode(format!(
            "attribute '{}' is not a string",
            name
        ))),
    }
}

fn timestamp(item: &Item, name: &str) -> Result<DateTime<Utc>> {
    let raw = required_s(item, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Decode(format!("attribute '{}' is not a timestamp: {}", name, e)))
}
