use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;
use serde::Serialize;

use super::cell::OptimisticCell;
use crate::recipes::{Recipe, RecipeServiceTrait};
use crate::users::Identity;

/// Result of triggering a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ToggleOutcome {
    /// The write succeeded; the flag keeps its new value.
    Committed { is_favorite: bool },
    /// The write failed; the flag is back to its previous value.
    RolledBack { is_favorite: bool },
    /// A toggle for this record was already in flight.
    Ignored,
}

/// Favorite control for a single recipe card.
///
/// Reads see the optimistic value while the write is in flight.
pub struct FavoriteToggle {
    recipe_id: String,
    identity: Identity,
    service: Arc<dyn RecipeServiceTrait>,
    state: Mutex<OptimisticCell<bool>>,
}

impl FavoriteToggle {
    pub fn new(
        recipe: &Recipe,
        identity: Identity,
        service: Arc<dyn RecipeServiceTrait>,
    ) -> Self {
        Self {
            recipe_id: recipe.id.clone(),
            identity,
            service,
            state: Mutex::new(OptimisticCell::new(recipe.is_favorite)),
        }
    }

    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn is_favorite(&self) -> bool {
        *self.lock().get()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    /// Flips the flag immediately and writes it. Failures are logged and rolled back.
    pub async fn toggle(&self) -> ToggleOutcome {
        let next = {
            let mut cell = self.lock();
            let next = !*cell.get();
            if !cell.begin(next) {
                return ToggleOutcome::Ignored;
            }
            next
        };

        let mut pending = PendingWrite {
            toggle: self,
            settled: false,
        };
        let result = self
            .service
            .set_favorite(&self.identity, &self.recipe_id, next)
            .await;
        pending.settled = true;

        let mut cell = self.lock();
        cell.settle(&result);
        match result {
            Ok(_) => ToggleOutcome::Committed { is_favorite: next },
            Err(e) => {
                warn!(
                    "Favorite toggle for recipe {} rolled back: {}",
                    self.recipe_id, e
                );
                ToggleOutcome::RolledBack {
                    is_favorite: *cell.get(),
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, OptimisticCell<bool>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rolls the cell back if a toggle is dropped before its write settles.
struct PendingWrite<'a> {
    toggle: &'a FavoriteToggle,
    settled: bool,
}

impl Drop for PendingWrite<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(
            "Favorite toggle for recipe {} cancelled mid-write; rolling back",
            self.toggle.recipe_id
        );
        self.toggle.lock().rollback();
    }
}
