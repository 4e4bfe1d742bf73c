//! Web domain event sink implementation.

use recipesaver_core::events::{DomainEvent, DomainEventSink};
use serde_json::json;

use crate::events::{
    EventBus, ServerEvent, RECIPE_CREATED, RECIPE_FAVORITE_CHANGED, RECIPE_UPDATED,
};

/// Domain event sink for the web server runtime.
pub struct WebDomainEventSink {
    event_bus: EventBus,
}

impl WebDomainEventSink {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        tracing::debug!("Forwarding domain event: {:?}", event);
        self.event_bus.publish(to_server_event(&event));
    }
}

fn to_server_event(event: &DomainEvent) -> ServerEvent {
    match event {
        DomainEvent::RecipeCreated {
            owner_id,
            recipe_id,
        } => ServerEvent::for_owner(RECIPE_CREATED, owner_id, json!({ "recipeId": recipe_id })),
        DomainEvent::RecipeUpdated {
            owner_id,
            recipe_id,
        } => ServerEvent::for_owner(RECIPE_UPDATED, owner_id, json!({ "recipeId": recipe_id })),
        DomainEvent::FavoriteChanged {
            owner_id,
            recipe_id,
            is_favorite,
        } => ServerEvent::for_owner(
            RECIPE_FAVORITE_CHANGED,
            owner_id,
            json!({ "recipeId": recipe_id, "isFavorite": is_favorite }),
        ),
    }
}
