//! Domain events runtime bridge for the web server.
//!
//! Receives domain events from the recipe service via `DomainEventSink` and
//! republishes them on the SSE [`EventBus`](crate::events::EventBus), so a
//! client can refresh any view that shows the affected recipe.

mod sink;

pub use sink::WebDomainEventSink;
