//! Application-level plumbing shared by views and services.

mod events;

pub use events::{EventBus, EventHandler, RowListEvent, SubscriberId};
