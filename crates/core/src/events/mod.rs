//! Domain events module.
//!
//! Event types and the sink trait recipe services emit through after a
//! successful write. The server implements the sink on top of its SSE bus.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
