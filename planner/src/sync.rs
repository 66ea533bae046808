//! Talking to the events functions: load once, then debounced saves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use shared::{Document, Error, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::state::PlannerState;

/// Quiet period after the last change before the events are saved.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(1000);

/// Remote side of the planner: the get/save events endpoints.
#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn fetch(&self) -> Result<Document>;

    async fn save(&self, document: &Document) -> Result<()>;
}

/// Events API over HTTP.
pub struct HttpEventsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEventsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn fetch(&self) -> Result<Document> {
        let response = self
            .client
            .get(self.endpoint("get-events"))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch events: {}", e)))?;

        let bytes = check_status(response)
            .await?
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read events: {}", e)))?;

        Document::from_slice(&bytes)
    }

    async fn save(&self, document: &Document) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("save-events"))
            .json(document)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to save events: {}", e)))?;

        check_status(response).await?;
        Ok(())
    }
}

/// Fetch the stored events into `state`. Returns how many were loaded.
pub async fn load_events(api: &dyn EventsApi, state: &mut PlannerState) -> Result<usize> {
    let document = api.fetch().await?;
    let count = document.events.len();
    state.replace_events(document.events);
    info!("Loaded {} events", count);
    Ok(count)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The document waiting for its quiet period, tagged with the schedule call
/// that stored it.
#[derive(Default)]
struct Pending {
    generation: u64,
    document: Option<Document>,
}

impl Pending {
    fn replace(&mut self, document: Document) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.document = Some(document);
        self.generation
    }

    /// Take the document only if no newer schedule call replaced it. A timer
    /// that was aborted while already running must not send a document whose
    /// own quiet period has not passed.
    fn take_if_current(&mut self, generation: u64) -> Option<Document> {
        if self.generation == generation {
            self.document.take()
        } else {
            None
        }
    }
}

/// Debounced saving of the whole events document.
///
/// Each [`schedule`](SaveScheduler::schedule) call replaces the pending
/// document and restarts the quiet-period timer. When the timer runs out the
/// latest document is handed to a single writer task, so at most one write is
/// in flight and writes that have started are never cancelled. Failed writes
/// are logged and dropped.
pub struct SaveScheduler {
    delay: Duration,
    pending: Arc<Mutex<Pending>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    writes: mpsc::UnboundedSender<Document>,
    writer: JoinHandle<()>,
    saving: watch::Receiver<bool>,
}

impl SaveScheduler {
    /// Start the writer task. Must be called inside a Tokio runtime.
    pub fn new(api: Arc<dyn EventsApi>, delay: Duration) -> Self {
        let (writes, queue) = mpsc::unbounded_channel();
        let (saving_tx, saving) = watch::channel(false);
        let writer = tokio::spawn(run_writer(api, queue, saving_tx));

        Self {
            delay,
            pending: Arc::new(Mutex::new(Pending::default())),
            timer: Mutex::new(None),
            writes,
            writer,
            saving,
        }
    }

    /// Queue `document` for saving once the quiet period has passed.
    pub fn schedule(&self, document: Document) {
        let mut timer = lock(&self.timer);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        let generation = lock(&self.pending).replace(document);

        let pending = Arc::clone(&self.pending);
        let writes = self.writes.clone();
        let delay = self.delay;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let document = lock(&pending).take_if_current(generation);
            if let Some(document) = document {
                debug!("Quiet period over, saving {} events", document.events.len());
                let _ = writes.send(document);
            }
        }));
    }

    /// Hand any pending document to the writer now, skipping the wait.
    pub fn flush(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
        let document = lock(&self.pending).document.take();
        if let Some(document) = document {
            let _ = self.writes.send(document);
        }
    }

    /// Whether a write is currently in flight.
    pub fn is_saving(&self) -> bool {
        *self.saving.borrow()
    }

    /// Watch the saving indicator.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.saving.clone()
    }

    /// Flush and wait until every queued write has finished.
    pub async fn close(self) {
        self.flush();
        let SaveScheduler { writes, writer, .. } = self;
        drop(writes);
        if let Err(e) = writer.await {
            error!("Save writer task failed: {}", e);
        }
    }
}

async fn run_writer(
    api: Arc<dyn EventsApi>,
    mut queue: mpsc::UnboundedReceiver<Document>,
    saving: watch::Sender<bool>,
) {
    while let Some(document) = queue.recv().await {
        saving.send_replace(true);
        match api.save(&document).await {
            Ok(()) => info!("Saved {} events", document.events.len()),
            Err(e) => error!("Failed to save events: {}", e),
        }
        saving.send_replace(false);
    }
}
