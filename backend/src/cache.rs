//! Data Cache
//!
//! Time-boxed memoisation of the last fetched [`FestivalSnapshot`].
//!
//! # Critical Invariants
//!
//! 1. **No redundant I/O**: an unforced refresh inside the cache window never
//!    touches the network
//! 2. **Atomic replacement**: readers see either the old or the new snapshot,
//!    never a mix; a failed fetch leaves the cache untouched
//! 3. **Single flight**: at most one fetch is outstanding; concurrent callers
//!    await the same shared future
//! 4. **Serialised writers**: replacement and vitals patching take the same lock
//!
//! Every new snapshot (fetched or patched) is published on a watch channel;
//! other components call [`DataCache::subscribe`] instead of reading a global.

use crate::api::{FestivalApi, FetchError};
use crate::models::FestivalSnapshot;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

type SnapshotResult = Result<Arc<FestivalSnapshot>, FetchError>;
type InflightFetch = Shared<BoxFuture<'static, SnapshotResult>>;

/// Where a refreshed snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    Cache,
    Network,
}

/// Result of [`DataCache::refresh`]
#[derive(Debug, Clone)]
pub struct Refreshed {
    pub snapshot: Arc<FestivalSnapshot>,
    pub origin: RefreshOrigin,
}

impl Refreshed {
    pub fn is_fresh(&self) -> bool {
        self.origin == RefreshOrigin::Network
    }
}

struct CacheEntry {
    snapshot: Arc<FestivalSnapshot>,
    /// When the request that produced this snapshot started
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    inflight: Option<InflightFetch>,
}

struct CacheShared {
    state: Mutex<CacheState>,
    publisher: watch::Sender<Option<Arc<FestivalSnapshot>>>,
}

impl CacheShared {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Snapshot cache in front of a [`FestivalApi`]
pub struct DataCache<A: FestivalApi> {
    api: Arc<A>,
    window: Duration,
    shared: Arc<CacheShared>,
}

impl<A: FestivalApi> DataCache<A> {
    pub fn new(api: Arc<A>, window: Duration) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            api,
            window,
            shared: Arc::new(CacheShared {
                state: Mutex::new(CacheState::default()),
                publisher,
            }),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Return the cached snapshot when fresh, otherwise fetch.
    ///
    /// `force` bypasses the freshness check but still joins a fetch that is
    /// already in flight.
    pub async fn refresh(&self, force: bool) -> Result<Refreshed, FetchError> {
        let fetch = {
            let mut state = self.shared.lock();

            if !force {
                if let Some(entry) = &state.entry {
                    if entry.fetched_at.elapsed() < self.window {
                        debug!("Using cached festival data");
                        return Ok(Refreshed {
                            snapshot: Arc::clone(&entry.snapshot),
                            origin: RefreshOrigin::Cache,
                        });
                    }
                }
            }

            match &state.inflight {
                Some(inflight) => {
                    debug!("Joining in-flight festival data request");
                    inflight.clone()
                }
                None => {
                    let fetch = self.start_fetch();
                    state.inflight = Some(fetch.clone());
                    fetch
                }
            }
        };

        let snapshot = fetch.await?;
        Ok(Refreshed {
            snapshot,
            origin: RefreshOrigin::Network,
        })
    }

    /// Build the shared fetch future. The future itself commits the result,
    /// so the cache is updated exactly once however many callers await it.
    fn start_fetch(&self) -> InflightFetch {
        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let started_at = Instant::now();

        async move {
            info!("Loading festival data");
            let result = api.fetch_snapshot().await;

            let mut state = shared.lock();
            state.inflight = None;
            match result {
                Ok(snapshot) => {
                    let snapshot = Arc::new(snapshot);
                    state.entry = Some(CacheEntry {
                        snapshot: Arc::clone(&snapshot),
                        fetched_at: started_at,
                    });
                    shared.publisher.send_replace(Some(Arc::clone(&snapshot)));
                    info!("Festival data loaded successfully");
                    Ok(snapshot)
                }
                Err(err) => {
                    warn!(error = %err, "Festival data request failed; keeping previous snapshot");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    /// The cached snapshot, fresh or not
    pub fn current(&self) -> Option<Arc<FestivalSnapshot>> {
        self.shared
            .lock()
            .entry
            .as_ref()
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// Patch budget and reputation on the cached snapshot and publish it.
    ///
    /// The cache timestamp is left alone: a patch is not a fetch.
    /// Returns the patched snapshot, or `None` when nothing is cached.
    pub fn patch_vitals(
        &self,
        budget: Option<f64>,
        reputation: Option<f64>,
    ) -> Option<Arc<FestivalSnapshot>> {
        let mut state = self.shared.lock();
        let entry = state.entry.as_mut()?;

        if !Arc::make_mut(&mut entry.snapshot).apply_vitals(budget, reputation) {
            warn!("Cached snapshot has no festival object; vitals not patched");
        }
        let patched = Arc::clone(&entry.snapshot);
        self.shared.publisher.send_replace(Some(Arc::clone(&patched)));
        Some(patched)
    }

    /// Subscribe to snapshot publications (latest value only)
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<FestivalSnapshot>>> {
        self.shared.publisher.subscribe()
    }
}
