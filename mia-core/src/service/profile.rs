//! Profile business logic

use crate::config::DEFAULT_SCAN_PAGE_SIZE;
use crate::domain::{CreateProfileInput, Profile};
use crate::error::{AppError, Result};
use crate::repository::marshal::{
    is_profile_item, item_to_profile, profile_to_item, ATTR_SORT, PROFILE_KIND,
};
use crate::repository::ProfileStore;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

/// Creates profiles on behalf of signup triggers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCreator: Send + Sync {
    async fn create_profile(&self, input: CreateProfileInput) -> Result<Profile>;
}

pub struct ProfileService<S: ProfileStore> {
    store: Arc<S>,
    scan_page_size: i32,
}

impl<S: ProfileStore> ProfileService<S> {
    pub fn new(store: Arc<S>) -> Self {
        debug!("Loading ProfileService");
        Self {
            store,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }

    pub fn with_scan_page_size(mut self, scan_page_size: i32) -> Self {
        self.scan_page_size = scan_page_size;
        self
    }

    /// Enumerate every profile in the table.
    ///
    /// Pages are fetched until the store stops returning a continuation key.
    /// Result order follows the store's scan order, which is unspecified.
    /// A profile row that cannot be decoded is logged and skipped.
    pub async fn list_all_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles = Vec::new();
        let mut start_key = None;

        loop {
            let page = self
                .store
                .scan_page(start_key.take(), self.scan_page_size)
                .await?;

            for item in page.items.iter().filter(|item| is_profile_item(item)) {
                match item_to_profile(item) {
                    Ok(profile) => profiles.push(profile),
                    Err(e) => {
                        let sort = match item.get(ATTR_SORT) {
                            Some(AttributeValue::S(sort)) => sort.as_str(),
                            _ => "",
                        };
                        warn!(sort = %sort, error = %e, "Skipping undecodable profile row");
                    }
                }
            }

            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        Ok(profiles)
    }

    /// Look up a profile by subject. A miss is `Ok(None)`.
    pub async fn get_profile(&self, sub: &str) -> Result<Option<Profile>> {
        info!(sub = %sub, "Requesting profile");
        self.store
            .get(PROFILE_KIND, sub)
            .await?
            .map(|item| item_to_profile(&item))
            .transpose()
    }

    pub async fn create_profile(&self, input: CreateProfileInput) -> Result<Profile> {
        input.validate()?;
        let profile = Profile::new(&input);
        self.persist(&profile).await?;
        Ok(profile)
    }

    async fn persist(&self, profile: &Profile) -> Result<()> {
        match self.store.put(profile_to_item(profile)).await {
            Ok(()) => {
                info!(sub = %profile.sub, id = %profile.id, "Created profile");
                Ok(())
            }
            Err(e) => {
                error!(sub = %profile.sub, error = %e, "Failed to create profile");
                Err(AppError::ProfileCreation {
                    sub: profile.sub.clone(),
                })
            }
        }
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileCreator for ProfileService<S> {
    async fn create_profile(&self, input: CreateProfileInput) -> Result<Profile> {
        ProfileService::create_profile(self, input).await
    }
}
