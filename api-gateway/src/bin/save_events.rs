//! Save Events Lambda - Handles POST /api/save-events.
//!
//! Replaces the stored events document with the request body. There is no
//! merge: the last writer wins.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::http::{body_bytes, error_response, failure_response, message_response, parse_document};
use shared::{write_document, BlobStore, Config, S3BlobStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    store: Arc<dyn BlobStore>,
    document_key: String,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);

        Ok(Self {
            store: Arc::new(S3BlobStore::new(s3_client, config.bucket.clone())),
            document_key: config.document_key(),
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    info!("Save events request: {} {}", event.method(), event.uri().path());

    if *event.method() != Method::POST {
        return error_response(405, "Method Not Allowed");
    }

    let bytes = match body_bytes(event.body()) {
        Some(bytes) => bytes,
        None => return error_response(400, "Bad Request: Missing body"),
    };

    let document = match parse_document(bytes) {
        Ok(document) => document,
        Err(e) => {
            warn!("Rejected events document: {}", e);
            return failure_response(&e);
        }
    };

    match write_document(state.store.as_ref(), &state.document_key, &document).await {
        Ok(()) => message_response("Events saved successfully"),
        Err(e) => {
            error!("Failed to save events: {}", e);
            failure_response(&e)
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
