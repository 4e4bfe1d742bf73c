use serde_json::Value;
use tokio::sync::broadcast;

/// Canonical event names pushed to browser clients.
pub const RECIPE_CREATED: &str = "recipe:created";
pub const RECIPE_UPDATED: &str = "recipe:updated";
pub const RECIPE_FAVORITE_CHANGED: &str = "recipe:favorite-changed";

/// Serializable envelope that carries event names and optional payloads.
///
/// `owner_id` scopes the event to one user's streams; `None` goes to everyone.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub owner_id: Option<String>,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            owner_id: None,
            payload: None,
        }
    }

    pub fn for_owner(name: &'static str, owner_id: impl Into<String>, payload: Value) -> Self {
        Self {
            name,
            owner_id: Some(owner_id.into()),
            payload: Some(payload),
        }
    }

    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.owner_id.as_deref().map_or(true, |owner| owner == user_id)
    }
}

/// Lightweight broadcast bus that fans out events to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // Lagging listeners are ignored to avoid blocking producers.
        let _ = self.sender.send(event);
    }
}
