// Background batch fetching and card picture loading with caching

use crate::domain::Item;
use crate::preview::{decode_picture, CardPicture};
use crate::source::{ImageSource, SourceError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

/// Maximum number of cached pictures
const CACHE_SIZE: usize = 10;

/// Result of one batch fetch as the deck consumes it.
///
/// A failed fetch still carries a (empty) batch; `error` is display text.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub items: Vec<Item>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn from_result(result: Result<Vec<Item>, SourceError>) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(e) => Self {
                items: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Runs at most one batch fetch at a time, polled from the event loop
pub struct BatchFetcher {
    handle: Handle,
    source: Arc<dyn ImageSource>,
    batch_size: usize,
    receiver: Option<oneshot::Receiver<FetchOutcome>>,
}

impl BatchFetcher {
    pub fn new(handle: Handle, source: Arc<dyn ImageSource>, batch_size: usize) -> Self {
        Self {
            handle,
            source,
            batch_size,
            receiver: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.receiver.is_some()
    }

    /// Starts a fetch. Refused (false) while another is outstanding.
    pub fn start(&mut self) -> bool {
        if self.is_in_flight() {
            debug!("Batch fetch already in flight");
            return false;
        }

        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let limit = self.batch_size;
        self.handle.spawn(async move {
            let outcome = FetchOutcome::from_result(source.fetch_batch(limit).await);
            let _ = tx.send(outcome);
        });

        info!(limit, "Batch fetch started");
        self.receiver = Some(rx);
        true
    }

    /// Returns the outcome once, when the fetch has finished
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let rx = self.receiver.as_mut()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.receiver = None;
                Some(outcome)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                Some(FetchOutcome {
                    items: Vec::new(),
                    error: Some("An unexpected error occurred while fetching cats.".to_string()),
                })
            }
        }
    }
}

/// Loading state of one card picture
#[derive(Debug, Clone)]
pub enum CardImageState {
    Loading,
    Ready(Arc<CardPicture>),
    Error(String),
}

struct PictureRequest {
    item: Item,
    response_tx: oneshot::Sender<Result<Arc<CardPicture>, String>>,
}

/// LRU-like cache keyed by item id
#[derive(Debug)]
struct PictureCache {
    cache: HashMap<String, Arc<CardPicture>>,
    /// Most recent at end
    access_order: Vec<String>,
    max_size: usize,
}

impl PictureCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            access_order: Vec::new(),
            max_size,
        }
    }

    fn get(&mut self, id: &str) -> Option<Arc<CardPicture>> {
        let picture = self.cache.get(id).cloned()?;
        self.access_order.retain(|k| k != id);
        self.access_order.push(id.to_string());
        Some(picture)
    }

    fn insert(&mut self, id: String, picture: Arc<CardPicture>) {
        if self.cache.contains_key(&id) {
            self.access_order.retain(|k| k != &id);
        } else if self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(id.clone(), picture);
        self.access_order.push(id);
    }

    #[cfg(test)]
    fn contains(&self, id: &str) -> bool {
        self.cache.contains_key(id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.cache.len()
    }
}

/// Downloads and decodes card pictures off the UI thread.
///
/// Requests are served in order by one worker, so the current card is
/// fetched before the prefetched next one.
pub struct CardImageManager {
    request_tx: mpsc::UnboundedSender<PictureRequest>,
    cache: Arc<Mutex<PictureCache>>,
    pending: HashMap<String, oneshot::Receiver<Result<Arc<CardPicture>, String>>>,
    failed: HashMap<String, String>,
}

impl CardImageManager {
    pub fn new(handle: Handle, source: Arc<dyn ImageSource>) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let cache = Arc::new(Mutex::new(PictureCache::new(CACHE_SIZE)));

        let worker_cache = Arc::clone(&cache);
        handle.spawn(async move {
            Self::worker(request_rx, source, worker_cache).await;
        });

        Self {
            request_tx,
            cache,
            pending: HashMap::new(),
            failed: HashMap::new(),
        }
    }

    async fn worker(
        mut request_rx: mpsc::UnboundedReceiver<PictureRequest>,
        source: Arc<dyn ImageSource>,
        cache: Arc<Mutex<PictureCache>>,
    ) {
        while let Some(PictureRequest { item, response_tx }) = request_rx.recv().await {
            // Requester moved on (deck reset)
            if response_tx.is_closed() {
                continue;
            }

            if let Some(cached) = cache.lock().await.get(&item.id) {
                let _ = response_tx.send(Ok(cached));
                continue;
            }

            let result = match source.fetch_image(&item).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode_picture(&bytes))
                    .await
                    .map_err(|e| format!("Decode task failed: {}", e))
                    .and_then(|decoded| decoded.map_err(|e| e.to_string())),
                Err(e) => Err(e.to_string()),
            };

            let result = match result {
                Ok(picture) => {
                    let picture = Arc::new(picture);
                    cache
                        .lock()
                        .await
                        .insert(item.id.clone(), Arc::clone(&picture));
                    Ok(picture)
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Card picture failed");
                    Err(e)
                }
            };

            let _ = response_tx.send(result);
        }
    }

    /// Current state of an item's picture, starting a download if needed
    pub fn request(&mut self, item: &Item) -> CardImageState {
        if let Some(error) = self.failed.get(&item.id) {
            return CardImageState::Error(error.clone());
        }

        if let Some(rx) = self.pending.get_mut(&item.id) {
            match rx.try_recv() {
                Ok(Ok(picture)) => {
                    self.pending.remove(&item.id);
                    return CardImageState::Ready(picture);
                }
                Ok(Err(error)) => {
                    self.pending.remove(&item.id);
                    self.failed.insert(item.id.clone(), error.clone());
                    return CardImageState::Error(error);
                }
                Err(oneshot::error::TryRecvError::Empty) => return CardImageState::Loading,
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.pending.remove(&item.id);
                }
            }
        }

        if let Some(cached) = self.cached(&item.id) {
            return CardImageState::Ready(cached);
        }

        let (response_tx, rx) = oneshot::channel();
        let request = PictureRequest {
            item: item.clone(),
            response_tx,
        };
        if self.request_tx.send(request).is_err() {
            return CardImageState::Error("Picture loader shut down".to_string());
        }

        self.pending.insert(item.id.clone(), rx);
        CardImageState::Loading
    }

    /// Drops in-flight requests and failures for items not in `keep`
    pub fn retain(&mut self, keep: &[&str]) {
        self.pending.retain(|id, _| keep.contains(&id.as_str()));
        self.failed.retain(|id, _| keep.contains(&id.as_str()));
    }

    fn cached(&self, id: &str) -> Option<Arc<CardPicture>> {
        self.cache.try_lock().ok()?.get(id)
    }
}
