//! # Presentation Coordinator
//!
//! Owns the observable state the screen renders and is its only writer.
//!
//! ```text
//! Coordinator
//! ├── movies:     watch<Slot<CatalogPayload>>   // search results
//! ├── details:    watch<Slot<DetailRecord>>     // selected title
//! └── last_error: watch<Option<ErrorInfo>>      // latest failure from either slot
//! ```
//!
//! ## Sequencing
//!
//! Every fetch bumps its slot's `generation` and publishes `Pending`. When the
//! repository call returns, the result is written only if the slot's
//! generation still matches the one the fetch was issued with. Both steps run
//! inside the watch channel's own lock (`send_modify` / `send_if_modified`),
//! so issue and publish are totally ordered per slot and a slow, outdated
//! response can never overwrite a newer one.
//!
//! Superseded tasks are also aborted, but that only saves work: the
//! generation check alone decides what gets published.

use std::future::Future;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::catalog::{CatalogPayload, CatalogRepository, DetailRecord, ErrorInfo, Fetched};

/// What a slot currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing published yet for the latest fetch (or no fetch issued).
    Pending,
    Ready(Fetched<T>),
}

/// A snapshot of one observable slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<T> {
    /// Sequence number of the most recently issued fetch; 0 before the first.
    pub generation: u64,
    pub state: LoadState<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: LoadState::Pending,
        }
    }
}

impl<T> Slot<T> {
    /// True until the first fetch is issued.
    pub fn is_idle(&self) -> bool {
        self.generation == 0
    }

    /// True while the latest issued fetch has not landed.
    pub fn is_loading(&self) -> bool {
        !self.is_idle() && matches!(self.state, LoadState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(Ok(value)) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match &self.state {
            LoadState::Ready(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// Writes `result` into the slot only if `generation` is still the latest issued.
/// Returns whether it landed.
fn publish<T>(sender: &watch::Sender<Slot<T>>, generation: u64, result: Fetched<T>) -> bool {
    sender.send_if_modified(|slot| {
        if slot.generation != generation {
            return false;
        }
        slot.state = LoadState::Ready(result);
        true
    })
}

/// Write side of one slot plus the task currently filling it.
struct SlotWriter<T> {
    sender: Arc<watch::Sender<Slot<T>>>,
    in_flight: Option<AbortHandle>,
}

impl<T: Send + Sync + 'static> SlotWriter<T> {
    fn new() -> Self {
        let (sender, _) = watch::channel(Slot::default());
        Self {
            sender: Arc::new(sender),
            in_flight: None,
        }
    }

    /// Starts a new generation: the slot goes `Pending` and any older task is cancelled.
    fn issue(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        let mut generation = 0;
        self.sender.send_modify(|slot| {
            slot.generation += 1;
            slot.state = LoadState::Pending;
            generation = slot.generation;
        });
        generation
    }

    /// Issues a generation and runs `fetch` in the background, publishing its
    /// result if nothing newer was issued in the meantime.
    fn spawn<F>(
        &mut self,
        errors: &Arc<watch::Sender<Option<ErrorInfo>>>,
        label: &'static str,
        fetch: F,
    ) -> u64
    where
        F: Future<Output = Fetched<T>> + Send + 'static,
    {
        let generation = self.issue();
        let sender = self.sender.clone();
        let errors = errors.clone();

        let handle = tokio::spawn(async move {
            let result = fetch.await;
            let failure = result.as_ref().err().cloned();
            if publish(&sender, generation, result) {
                debug!("{} #{} published", label, generation);
                if let Some(info) = failure {
                    errors.send_replace(Some(info));
                }
            } else {
                debug!("{} #{} superseded, discarding result", label, generation);
            }
        });

        self.in_flight = Some(handle.abort_handle());
        generation
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Issues catalog fetches and publishes their results to observable slots.
///
/// Must be used from within a tokio runtime: fetches run as spawned tasks.
/// Dropping the coordinator aborts anything still in flight.
pub struct Coordinator {
    repository: Arc<dyn CatalogRepository>,
    api_key: String,
    movies: SlotWriter<CatalogPayload>,
    details: SlotWriter<DetailRecord>,
    errors: Arc<watch::Sender<Option<ErrorInfo>>>,
}

impl Coordinator {
    pub fn new(repository: Arc<dyn CatalogRepository>, api_key: String) -> Self {
        let (errors, _) = watch::channel(None);
        Self {
            repository,
            api_key,
            movies: SlotWriter::new(),
            details: SlotWriter::new(),
            errors: Arc::new(errors),
        }
    }

    /// Searches the catalog for `query`. A blank query is ignored: no request,
    /// no state change. Returns whether a fetch was issued.
    pub fn fetch_movies(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank search query");
            return false;
        }

        let repository = self.repository.clone();
        let api_key = self.api_key.clone();
        let owned_query = query.to_string();
        let generation = self.movies.spawn(&self.errors, "search", async move {
            repository.search_catalog(&api_key, &owned_query).await
        });

        info!(
            "Issued search #{} for {:?} via {}",
            generation,
            query,
            self.repository.name()
        );
        true
    }

    /// Fetches the detail record for `id`. A blank id is ignored.
    /// Returns whether a fetch was issued.
    pub fn fetch_details(&mut self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            debug!("Ignoring blank detail id");
            return false;
        }

        let repository = self.repository.clone();
        let api_key = self.api_key.clone();
        let owned_id = id.to_string();
        let generation = self.details.spawn(&self.errors, "detail", async move {
            repository.fetch_detail(&api_key, &owned_id).await
        });

        info!(
            "Issued detail #{} for {} via {}",
            generation,
            id,
            self.repository.name()
        );
        true
    }

    pub fn subscribe_movies(&self) -> watch::Receiver<Slot<CatalogPayload>> {
        self.movies.sender.subscribe()
    }

    pub fn subscribe_details(&self) -> watch::Receiver<Slot<DetailRecord>> {
        self.details.sender.subscribe()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<ErrorInfo>> {
        self.errors.subscribe()
    }

    /// Latest published search slot. Never blocks.
    pub fn movies(&self) -> Slot<CatalogPayload> {
        self.movies.sender.borrow().clone()
    }

    /// Latest published detail slot. Never blocks.
    pub fn details(&self) -> Slot<DetailRecord> {
        self.details.sender.borrow().clone()
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.errors.borrow().clone()
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.movies.cancel();
        self.details.cancel();
    }
}
