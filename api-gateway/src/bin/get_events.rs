//! Get Events Lambda - Handles GET /api/get-events.
//!
//! Returns the stored events document, or `{ "events": [] }` when nothing
//! has been saved yet.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{error_response, json_response};
use shared::{read_document, BlobStore, Config, S3BlobStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    store: Arc<dyn BlobStore>,
    document_key: String,
    seed_empty: bool,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);

        Ok(Self {
            store: Arc::new(S3BlobStore::new(s3_client, config.bucket.clone())),
            document_key: config.document_key(),
            seed_empty: config.seed_empty_document,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    info!("Get events request: {} {}", event.method(), event.uri().path());

    match read_document(state.store.as_ref(), &state.document_key, state.seed_empty).await {
        Ok(document) => {
            info!("Returning {} events", document.events.len());
            json_response(200, &document)
        }
        Err(e) => {
            error!("Failed to read events: {}", e);
            error_response(500, e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = state.clone();
        async move { handler(state, event).await }
    }))
    .await
}
