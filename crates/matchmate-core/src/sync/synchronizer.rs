//! Profile synchronization between the remote source and the local cache.
//!
//! `ProfileSynchronizer` owns the in-memory profile list. It prefers fresh
//! data from the `ProfileSource`, falls back to the `CacheManager` when the
//! source fails, and writes every status decision through to the cache.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::{ProfileSource, RemoteUser};
use crate::cache::{CacheManager, ProfileRecord};
use crate::models::{MatchStatus, Profile};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch channel.
/// Fetches are user-triggered, so only a handful are ever queued.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Completion of one remote fetch, sent from the background task
#[derive(Debug)]
enum FetchResult {
    Profiles(Vec<RemoteUser>),
    Failed(String),
}

/// Which data a fetch-and-refresh ended up publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The remote fetch succeeded with this many profiles
    Fetched(usize),
    /// The remote fetch failed and this many profiles were reloaded from cache
    FromCache(usize),
    /// The remote fetch and the cache read both failed; the list was kept
    Unchanged,
}

impl RefreshOutcome {
    pub fn is_fresh(&self) -> bool {
        matches!(self, RefreshOutcome::Fetched(_))
    }
}

/// Result of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Changed in memory and in the cache
    Updated,
    /// Changed in memory only; the cache had no matching record or could not be written
    NotPersisted,
    /// No profile with that id in the current list
    NotFound,
}

/// Handle returned by [`ProfileSynchronizer::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&[Profile]) + Send>;

pub struct ProfileSynchronizer {
    source: Arc<dyn ProfileSource>,
    cache: CacheManager,
    profiles: Vec<Profile>,

    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,

    // Background fetch channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
    fetches_in_flight: usize,
}

impl ProfileSynchronizer {
    /// Create a synchronizer with an empty list.
    /// Call `load_from_cache` to show the previous session before the first fetch.
    pub fn new(source: Arc<dyn ProfileSource>, cache: CacheManager) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            source,
            cache,
            profiles: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            fetch_rx: rx,
            fetch_tx: tx,
            fetches_in_flight: 0,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, id: Uuid) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Age of the cached batch for display ("5m ago"), if one exists
    pub fn cache_age(&self) -> Option<String> {
        self.cache.profiles_age()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback that receives the full list after every change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[Profile]) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn publish(&self) {
        for (_, callback) in &self.subscribers {
            callback(&self.profiles);
        }
    }

    // =========================================================================
    // Fetch and refresh
    // =========================================================================

    /// Fetch a new batch and wait for it, falling back to the cache on failure
    pub async fn fetch_and_refresh(&mut self) -> RefreshOutcome {
        let result = Self::fetch(self.source.as_ref()).await;
        self.apply_fetch_result(result)
    }

    /// Start a fetch on the tokio runtime without waiting for it.
    ///
    /// The result is only applied once the owner calls
    /// `check_background_tasks` or `wait_for_fetch`, so the list is never
    /// touched from the background task itself.
    pub fn trigger_fetch(&mut self) {
        info!("Starting background profile fetch");

        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = Self::fetch(source.as_ref()).await;
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });

        self.fetches_in_flight += 1;
    }

    /// Number of triggered fetches whose results have not been applied yet
    pub fn fetches_in_flight(&self) -> usize {
        self.fetches_in_flight
    }

    /// Apply every fetch result that has already arrived, without blocking
    pub fn check_background_tasks(&mut self) -> Vec<RefreshOutcome> {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }

        results
            .into_iter()
            .map(|result| {
                self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
                self.apply_fetch_result(result)
            })
            .collect()
    }

    /// Wait for the next triggered fetch to finish and apply it.
    /// Returns None immediately if nothing is in flight.
    pub async fn wait_for_fetch(&mut self) -> Option<RefreshOutcome> {
        if self.fetches_in_flight == 0 {
            return None;
        }
        let result = self.fetch_rx.recv().await?;
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        Some(self.apply_fetch_result(result))
    }

    async fn fetch(source: &dyn ProfileSource) -> FetchResult {
        match source.fetch_profiles().await {
            Ok(users) => {
                debug!(count = users.len(), "Profiles fetched successfully");
                FetchResult::Profiles(users)
            }
            Err(e) => FetchResult::Failed(format!("{:#}", e)),
        }
    }

    fn apply_fetch_result(&mut self, result: FetchResult) -> RefreshOutcome {
        match result {
            FetchResult::Profiles(users) => {
                let profiles: Vec<Profile> = users.iter().map(RemoteUser::to_profile).collect();
                let records: Vec<ProfileRecord> = profiles.iter().map(ProfileRecord::from).collect();

                if let Err(e) = self.cache.replace_all(&records) {
                    error!(error = %e, "Failed to cache fetched profiles");
                }

                let count = profiles.len();
                self.profiles = profiles;
                self.publish();
                info!(count, "Profile list refreshed from remote");
                RefreshOutcome::Fetched(count)
            }
            FetchResult::Failed(reason) => {
                warn!(error = %reason, "Profile fetch failed, falling back to cached profiles");
                match self.load_from_cache() {
                    Ok(count) => RefreshOutcome::FromCache(count),
                    Err(_) => RefreshOutcome::Unchanged,
                }
            }
        }
    }

    // =========================================================================
    // Cache
    // =========================================================================

    /// Replace the list with every cached profile, in stored order.
    /// On a read failure the list is left as it was.
    pub fn load_from_cache(&mut self) -> Result<usize> {
        let records = match self.cache.fetch_all() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Failed to load cached profiles");
                return Err(e);
            }
        };

        self.profiles = records.iter().map(ProfileRecord::to_profile).collect();
        self.publish();
        debug!(count = self.profiles.len(), "Profiles loaded from cache");
        Ok(self.profiles.len())
    }

    // =========================================================================
    // Status updates
    // =========================================================================

    /// Record a decision for one profile in memory and in the cache
    pub fn update_status(&mut self, id: Uuid, status: MatchStatus) -> StatusUpdate {
        let Some(profile) = self.profiles.iter_mut().find(|p| p.id == id) else {
            debug!(%id, "Status update for unknown profile ignored");
            return StatusUpdate::NotFound;
        };

        profile.status = status;
        self.publish();

        match self.cache.update_status(id, status) {
            Ok(true) => {
                debug!(%id, %status, "Profile status updated");
                StatusUpdate::Updated
            }
            Ok(false) => {
                warn!(%id, "No cached record for profile, status not persisted");
                StatusUpdate::NotPersisted
            }
            Err(e) => {
                error!(%id, error = %e, "Failed to persist profile status");
                StatusUpdate::NotPersisted
            }
        }
    }

    pub fn accept(&mut self, id: Uuid) -> StatusUpdate {
        self.update_status(id, MatchStatus::Accepted)
    }

    pub fn decline(&mut self, id: Uuid) -> StatusUpdate {
        self.update_status(id, MatchStatus::Declined)
    }
}
