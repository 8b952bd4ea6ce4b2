//! Configuration management for Mia Core

use anyhow::{anyhow, Context, Result};
use std::env;

/// Default number of rows requested per scan page
pub const DEFAULT_SCAN_PAGE_SIZE: i32 = 100;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the table holding profile rows
    pub data_table_name: String,
    /// Store client configuration
    pub dynamodb: DynamoDbConfig,
}

#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// Region override, falls back to the SDK default chain
    pub region: Option<String>,
    /// Endpoint override (e.g. a local emulator)
    pub endpoint: Option<String>,
    pub scan_page_size: i32,
}

impl Default for DynamoDbConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }
}

/// Logging configuration, loaded ahead of `Config` so startup faults are logged
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "text"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "json".to_string(),
            service_name: "profile-service".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "profile-service".to_string()),
        }
    }
}

/// Read a required environment variable. Absent and empty values are both errors.
pub fn mandatory_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(anyhow!("{} not found", key)),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_table_name: mandatory_env("DATA_TABLE_NAME")?,
            dynamodb: DynamoDbConfig {
                region: env::var("AWS_REGION").ok().filter(|s| !s.is_empty()),
                endpoint: env::var("DYNAMODB_ENDPOINT_URL")
                    .ok()
                    .filter(|s| !s.is_empty()),
                scan_page_size: parse_scan_page_size(
                    &env::var("PROFILE_SCAN_PAGE_SIZE")
                        .unwrap_or_else(|_| DEFAULT_SCAN_PAGE_SIZE.to_string()),
                )?,
            },
        })
    }
}

/// The store rejects a scan limit below 1, so catch it before the first invocation.
fn parse_scan_page_size(raw: &str) -> Result<i32> {
    let size: i32 = raw.parse().context("Invalid PROFILE_SCAN_PAGE_SIZE")?;
    if size < 1 {
        return Err(anyhow!(
            "Invalid PROFILE_SCAN_PAGE_SIZE: must be at least 1, got {}",
            size
        ));
    }
    Ok(size)
}
