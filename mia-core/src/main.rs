use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use mia_core::config::{Config, TelemetryConfig};
use mia_core::repository::DynamoDbProfileStore;
use mia_core::service::ProfileService;
use mia_core::{telemetry, trigger};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let telemetry_config = TelemetryConfig::from_env();
    telemetry::init(&telemetry_config);

    // Missing table configuration is fatal before the first invocation.
    let config = Config::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let sdk_config = aws_config::load_from_env().await;
    let store = DynamoDbProfileStore::from_config(
        &sdk_config,
        config.data_table_name.clone(),
        &config.dynamodb,
    );
    let service = Arc::new(
        ProfileService::new(Arc::new(store)).with_scan_page_size(config.dynamodb.scan_page_size),
    );

    info!(
        service = %telemetry_config.service_name,
        table = %config.data_table_name,
        "Starting post confirmation handler"
    );

    run(service_fn(move |event: LambdaEvent<Value>| {
        let service = Arc::clone(&service);
        let span = info_span!(
            "post_confirmation",
            service = %telemetry_config.service_name,
            request_id = %event.context.request_id
        );
        async move {
            trigger::handle_post_confirmation(service.as_ref(), event.payload)
                .await
                .map_err(Error::from)
        }
        .instrument(span)
    }))
    .await
}
