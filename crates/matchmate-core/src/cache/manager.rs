use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ProfileRecord;
use crate::models::MatchStatus;

/// Consider cache stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

/// Cache name for the profile batch
const PROFILES_CACHE: &str = "profiles";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Negative ages come from clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Durable store for the profile batch.
///
/// Clone shares the write lock, so clones handed to different owners still
/// serialize their writes.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self {
            cache_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow!("Cache write lock poisoned"))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    /// Write the whole file to a temporary sibling, then rename it into place.
    /// Callers must hold the write lock.
    fn write<T: Serialize>(&self, name: &str, cached: &CachedData<T>) -> Result<()> {
        let path = self.cache_path(name);
        let tmp_path = self
            .cache_dir
            .join(format!("{}.json.{}.tmp", name, Uuid::new_v4().simple()));

        let contents = serde_json::to_string_pretty(cached)?;
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        std::fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to replace cache file: {}", name))?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.cache_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache file: {}", name))?;
        }
        Ok(())
    }

    // ===== Profiles =====

    /// Read the batch as stored. The flag is set when at least one record
    /// had no id and was given a fresh one while decoding.
    fn read_profiles(&self) -> Result<Option<(CachedData<Vec<ProfileRecord>>, bool)>> {
        let Some(raw) = self.load::<Vec<serde_json::Value>>(PROFILES_CACHE)? else {
            return Ok(None);
        };

        let assigned_ids = raw.data.iter().any(|v| v.get("id").is_none());
        let data = raw
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<ProfileRecord>>>()
            .with_context(|| format!("Failed to parse cache file: {}", PROFILES_CACHE))?;

        Ok(Some((
            CachedData {
                data,
                cached_at: raw.cached_at,
            },
            assigned_ids,
        )))
    }

    /// Load the batch. Records stored without an id get one, and the ids are
    /// written back so every later load returns the same ids.
    pub fn load_profiles(&self) -> Result<Option<CachedData<Vec<ProfileRecord>>>> {
        match self.read_profiles()? {
            Some((_, true)) => {
                let _guard = self.lock()?;
                // Re-read under the lock so a write that landed in between is kept
                let Some((cached, assigned_ids)) = self.read_profiles()? else {
                    return Ok(None);
                };
                if assigned_ids {
                    match self.write(PROFILES_CACHE, &cached) {
                        Ok(()) => info!("Assigned ids to cached profiles stored without one"),
                        Err(e) => warn!(error = %e, "Failed to persist ids assigned to cached profiles"),
                    }
                }
                Ok(Some(cached))
            }
            other => Ok(other.map(|(cached, _)| cached)),
        }
    }

    /// Every persisted record, in stored order. An absent cache is empty.
    pub fn fetch_all(&self) -> Result<Vec<ProfileRecord>> {
        Ok(self.load_profiles()?.map(|c| c.data).unwrap_or_default())
    }

    pub fn fetch_by_id(&self, id: Uuid) -> Result<Option<ProfileRecord>> {
        Ok(self.fetch_all()?.into_iter().find(|r| r.id == id))
    }

    /// Append a record. Ids must be unique within the store.
    pub fn insert(&self, record: ProfileRecord) -> Result<()> {
        let _guard = self.lock()?;
        let mut cached = self
            .read_profiles()?
            .map(|(cached, _)| cached)
            .unwrap_or_else(|| CachedData::new(Vec::new()));

        if cached.data.iter().any(|r| r.id == record.id) {
            bail!("Profile {} is already cached", record.id);
        }
        cached.data.push(record);
        self.write(PROFILES_CACHE, &cached)
    }

    /// Set the stored status of one record.
    /// Returns false if no record has this id; nothing is written in that case.
    pub fn update_status(&self, id: Uuid, status: MatchStatus) -> Result<bool> {
        let _guard = self.lock()?;
        let Some((mut cached, _)) = self.read_profiles()? else {
            return Ok(false);
        };

        let Some(record) = cached.data.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.status = Some(status.as_str().to_string());

        // Keeps the original cached_at: the batch age is that of the fetch
        self.write(PROFILES_CACHE, &cached)?;
        Ok(true)
    }

    pub fn delete_all(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.remove(PROFILES_CACHE)
    }

    /// Replace the whole batch in one step.
    pub fn replace_all(&self, records: &[ProfileRecord]) -> Result<()> {
        let _guard = self.lock()?;
        self.write(PROFILES_CACHE, &CachedData::new(records))?;
        debug!(count = records.len(), "Profile cache replaced");
        Ok(())
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(&self, name: &str, loader: impl FnOnce() -> Result<Option<CachedData<T>>>) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    /// Age of the cached batch for display, or None if nothing is cached
    pub fn profiles_age(&self) -> Option<String> {
        self.load_age(PROFILES_CACHE, || self.load_profiles())
    }

    /// True if there is no cached batch, it cannot be read, or it is older than an hour
    pub fn is_stale(&self) -> bool {
        match self.load_profiles() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true,
            Err(e) => {
                debug!(cache = PROFILES_CACHE, error = %e, "Failed to load cache for staleness check");
                true
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
