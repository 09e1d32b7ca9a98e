//! Business services layer.
//!
//! This module contains the services that drive list views, coordinating
//! between data sources, the page state store, and the view layer.
//!
//! # Architecture
//!
//! ```text
//! View Layer (pagination, sort and filter controls)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//! Data sources (RowListSource implementations)
//! ```
//!
//! # Services Overview
//!
//! - [`RequestGate`]: Debounced, cancelable wrapper around a single fetch
//! - [`PageStateStore`]: Keyed store that restores list state across navigation
//! - [`RowListController`]: Paging, sorting and filtering engine for one list
//! - [`ConfigurationService`]: Current display mode for responsive views

mod configuration_service;
mod page_state_service;
mod request_gate;
mod row_list_service;

pub use configuration_service::{
    Configuration, ConfigurationService, ConfigurationUpdate, DisplayMode,
};
pub use page_state_service::{PageStateEntry, PageStateError, PageStateResult, PageStateStore};
pub use request_gate::{
    AbortStage, GateAbortHandle, GateError, GateResult, RequestGate, DEFAULT_REQUEST_DELAY,
};
pub use row_list_service::{RefreshOutcome, RowListController, RowListSource, RowListView};
