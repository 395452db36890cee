use crate::core::fetcher::PaginatedFetcher;
use crate::domain::model::{Film, Starship};
use crate::utils::error::ScatterError;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Immutable view of a store at one point in time.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub loading: bool,
    pub data: Arc<Vec<T>>,
    /// Generation of the fetch that produced `data`; 0 until the first success.
    pub generation: u64,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            data: Arc::clone(&self.data),
            generation: self.generation,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: Arc::new(Vec::new()),
            generation: 0,
        }
    }
}

/// Result of a store fetch. Callers that only care about the snapshot may
/// drop it; failures have already been logged.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded { count: usize },
    Failed { error: ScatterError },
    /// A newer fetch was issued while this one was in flight; its result was discarded.
    Superseded,
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded { .. })
    }

    pub fn error(&self) -> Option<&ScatterError> {
        match self {
            FetchOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// In-memory snapshot of one catalog resource, refreshed via the paginated
/// fetcher and observed through `snapshot()` or `subscribe()`.
pub struct ResourceStore<T> {
    name: &'static str,
    endpoint: String,
    fetcher: PaginatedFetcher,
    state: watch::Sender<Snapshot<T>>,
    issued: AtomicU64,
}

pub type FilmCatalog = ResourceStore<Film>;
pub type StarshipStore = ResourceStore<Starship>;

impl FilmCatalog {
    pub fn films(endpoint: impl Into<String>, fetcher: PaginatedFetcher) -> Self {
        Self::new("films", endpoint, fetcher)
    }
}

impl StarshipStore {
    pub fn starships(endpoint: impl Into<String>, fetcher: PaginatedFetcher) -> Self {
        Self::new("starships", endpoint, fetcher)
    }
}

impl<T> ResourceStore<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(name: &'static str, endpoint: impl Into<String>, fetcher: PaginatedFetcher) -> Self {
        Self {
            name,
            endpoint: endpoint.into(),
            fetcher,
            state: watch::Sender::new(Snapshot::default()),
            issued: AtomicU64::new(0),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.state.borrow().data)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver that wakes on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    pub fn set_data(&self, data: Vec<T>) {
        self.state.send_modify(|snapshot| {
            snapshot.data = Arc::new(data);
        });
    }

    /// Fetches every page of the resource and publishes the result.
    ///
    /// Loading is raised for the duration. On failure the held data is left
    /// as it was. Only the most recently issued fetch may publish; an older
    /// one that finishes later reports `Superseded`.
    pub async fn fetch(&self) -> FetchOutcome {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|snapshot| snapshot.loading = true);
        tracing::debug!("Fetching {} (generation {})", self.name, generation);

        let result = self.fetcher.fetch_all::<T>(&self.endpoint).await;

        if self.issued.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                "Discarding {} result from generation {}; a newer fetch is in flight",
                self.name,
                generation
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.state.send_modify(|snapshot| {
                    snapshot.data = Arc::new(items);
                    snapshot.loading = false;
                    snapshot.generation = generation;
                });
                tracing::info!("Loaded {} {}", count, self.name);
                FetchOutcome::Loaded { count }
            }
            Err(error) => {
                self.state.send_modify(|snapshot| snapshot.loading = false);
                tracing::warn!("Fetching {} failed, keeping previous data: {}", self.name, error);
                FetchOutcome::Failed { error }
            }
        }
    }
}
