//! Standalone optimistic favorite toggles, one per recipe card in flight.
//!
//! A toggle lives here only while its write is pending, so a second request
//! for the same recipe lands on the busy toggle and is ignored. Writes run on
//! their own task and settle even if the request that started them is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use recipesaver_core::optimistic::{FavoriteToggle, ToggleOutcome};
use recipesaver_core::recipes::RecipeServiceTrait;
use recipesaver_core::users::Identity;
use recipesaver_core::{Error, Result};

type ToggleKey = (String, String);
type PendingMap = Mutex<HashMap<ToggleKey, Arc<FavoriteToggle>>>;

#[derive(Default)]
pub struct FavoriteToggles {
    pending: Arc<PendingMap>,
}

impl FavoriteToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the favorite flag of `recipe_id` optimistically.
    pub async fn toggle(
        &self,
        identity: &Identity,
        recipe_id: &str,
        service: Arc<dyn RecipeServiceTrait>,
    ) -> Result<ToggleOutcome> {
        let key = (identity.user_id.clone(), recipe_id.to_string());
        if lock(&self.pending).contains_key(&key) {
            return Ok(ToggleOutcome::Ignored);
        }

        let recipe = service.get_recipe(identity, recipe_id).await?;
        let toggle = {
            let mut pending = lock(&self.pending);
            if pending.contains_key(&key) {
                return Ok(ToggleOutcome::Ignored);
            }
            let toggle = Arc::new(FavoriteToggle::new(&recipe, identity.clone(), service));
            pending.insert(key.clone(), toggle.clone());
            toggle
        };

        let entry = PendingEntry {
            pending: self.pending.clone(),
            key,
        };
        let write = tokio::spawn(async move {
            let _entry = entry;
            toggle.toggle().await
        });
        write
            .await
            .map_err(|e| Error::Unexpected(format!("Favorite toggle task failed: {e}")))
    }

    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// Removes its key from the pending map when the write task ends.
struct PendingEntry {
    pending: Arc<PendingMap>,
    key: ToggleKey,
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        lock(&self.pending).remove(&self.key);
    }
}

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<ToggleKey, Arc<FavoriteToggle>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}
