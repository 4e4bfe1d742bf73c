//! Registry of live search sessions opened over HTTP.
//!
//! Each session is owned by the user who opened it; a session id presented by
//! anyone else is reported as missing. Sessions with an open view stream are
//! never idle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use recipesaver_core::recipes::RecipeServiceTrait;
use recipesaver_core::search::{SearchQuery, SearchSessionHandle, SessionSettings};
use recipesaver_core::users::Identity;
use recipesaver_core::{Error, Result};
use tokio::time::Instant;
use uuid::Uuid;

struct SessionEntry {
    owner_id: String,
    handle: SearchSessionHandle,
    last_access: Arc<Mutex<Instant>>,
}

impl SessionEntry {
    fn touch(&self) {
        touch(&self.last_access);
    }

    fn is_watched(&self) -> bool {
        Arc::strong_count(&self.last_access) > 1
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last = *self.last_access.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last)
    }
}

fn touch(last_access: &Mutex<Instant>) {
    *last_access.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
}

/// Held by an open view stream. Dropping it counts as activity.
pub struct ViewLease {
    last_access: Arc<Mutex<Instant>>,
}

impl Drop for ViewLease {
    fn drop(&mut self) {
        touch(&self.last_access);
    }
}

pub struct SearchSessions {
    service: Arc<dyn RecipeServiceTrait>,
    settings: SessionSettings,
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl SearchSessions {
    pub fn new(service: Arc<dyn RecipeServiceTrait>, settings: SessionSettings) -> Self {
        Self {
            service,
            settings,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Spawns a session for `identity` and returns its id with the handle.
    pub fn open(&self, identity: Identity, query: SearchQuery) -> (String, SearchSessionHandle) {
        let id = Uuid::new_v4().to_string();
        let owner_id = identity.user_id.clone();
        let handle = SearchSessionHandle::spawn_with_query(
            identity,
            self.service.clone(),
            self.settings.clone(),
            query,
        );
        self.lock().insert(
            id.clone(),
            SessionEntry {
                owner_id: owner_id.clone(),
                handle: handle.clone(),
                last_access: Arc::new(Mutex::new(Instant::now())),
            },
        );
        tracing::debug!("Opened search session {} for {}", id, owner_id);
        (id, handle)
    }

    /// Looks up a session of `identity` and marks it as used.
    pub fn get(&self, identity: &Identity, id: &str) -> Result<SearchSessionHandle> {
        self.with_entry(identity, id, |entry| entry.handle.clone())
    }

    /// Like [`get`](Self::get), plus a lease that keeps the session alive
    /// while the caller streams its views.
    pub fn watch(
        &self,
        identity: &Identity,
        id: &str,
    ) -> Result<(SearchSessionHandle, ViewLease)> {
        self.with_entry(identity, id, |entry| {
            let lease = ViewLease {
                last_access: entry.last_access.clone(),
            };
            (entry.handle.clone(), lease)
        })
    }

    fn with_entry<T>(
        &self,
        identity: &Identity,
        id: &str,
        f: impl FnOnce(&SessionEntry) -> T,
    ) -> Result<T> {
        let entries = self.lock();
        match entries.get(id) {
            Some(entry) if entry.owner_id == identity.user_id && !entry.handle.is_closed() => {
                entry.touch();
                Ok(f(entry))
            }
            _ => Err(Error::not_found(format!("Search session {}", id))),
        }
    }

    pub async fn close(&self, identity: &Identity, id: &str) -> Result<()> {
        let entry = {
            let mut entries = self.lock();
            match entries.get(id) {
                Some(entry) if entry.owner_id == identity.user_id => entries.remove(id),
                _ => None,
            }
        };
        let entry = entry.ok_or_else(|| Error::not_found(format!("Search session {}", id)))?;
        // Already stopped sessions have nothing left to close.
        let _ = entry.handle.close().await;
        tracing::debug!("Closed search session {}", id);
        Ok(())
    }

    /// Closes every session of `identity`. Returns how many were closed.
    pub async fn close_owned_by(&self, identity: &Identity) -> usize {
        let owned: Vec<(String, SessionEntry)> = {
            let mut entries = self.lock();
            let ids: Vec<String> = entries
                .iter()
                .filter(|(_, e)| e.owner_id == identity.user_id)
                .map(|(id, _)| id.clone())
                .collect();
            ids.into_iter()
                .filter_map(|id| entries.remove(&id).map(|e| (id, e)))
                .collect()
        };
        for (id, entry) in &owned {
            let _ = entry.handle.close().await;
            tracing::debug!("Closed search session {} of {}", id, identity.user_id);
        }
        owned.len()
    }

    /// Closes sessions untouched for longer than `max_idle`. Returns how many were closed.
    pub async fn close_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<(String, SessionEntry)> = {
            let mut entries = self.lock();
            let ids: Vec<String> = entries
                .iter()
                .filter(|(_, e)| {
                    e.handle.is_closed() || (!e.is_watched() && e.idle_for(now) > max_idle)
                })
                .map(|(id, _)| id.clone())
                .collect();
            ids.into_iter()
                .filter_map(|id| entries.remove(&id).map(|e| (id, e)))
                .collect()
        };
        for (id, entry) in &expired {
            let _ = entry.handle.close().await;
            tracing::debug!("Closed idle search session {}", id);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
