//! Profile store

use super::marshal::{Item, ATTR_KEY, ATTR_SORT};
use crate::config::DynamoDbConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

/// One page of a table scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Continuation key; `None` once the table is exhausted
    pub last_evaluated_key: Option<Item>,
}

/// Two-part-key row store holding profile rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, key: &str, sort: &str) -> Result<Option<Item>>;
    /// Unconditional upsert
    async fn put(&self, item: Item) -> Result<()>;
    async fn scan_page(
        &self,
        exclusive_start_key: Option<Item>,
        page_size: i32,
    ) -> Result<ScanPage>;
}

/// DynamoDB-backed profile store
#[derive(Clone)]
pub struct DynamoDbProfileStore {
    client: Client,
    table_name: String,
}

impl std::fmt::Debug for DynamoDbProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbProfileStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl DynamoDbProfileStore {
    /// Build a store client from the shared SDK config plus our overrides
    pub fn from_config(
        sdk_config: &aws_config::SdkConfig,
        table_name: impl Into<String>,
        config: &DynamoDbConfig,
    ) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region) = &config.region {
            builder = builder.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ProfileStore for DynamoDbProfileStore {
    async fn get(&self, key: &str, sort: &str) -> Result<Option<Item>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_KEY, AttributeValue::S(key.to_string()))
            .key(ATTR_SORT, AttributeValue::S(sort.to_string()))
            .send()
            .await
            .map_err(|e| {
                AppError::Store(format!("DynamoDB GetItem failed: {}", DisplayErrorContext(&e)))
            })?;

        Ok(response.item().cloned())
    }

    async fn put(&self, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                AppError::Store(format!("DynamoDB PutItem failed: {}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }

    async fn scan_page(
        &self,
        exclusive_start_key: Option<Item>,
        page_size: i32,
    ) -> Result<ScanPage> {
        let response = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(page_size)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|e| {
                AppError::Store(format!("DynamoDB Scan failed: {}", DisplayErrorContext(&e)))
            })?;

        Ok(ScanPage {
            items: response.items().to_vec(),
            last_evaluated_key: response.last_evaluated_key().cloned(),
        })
    }
}
