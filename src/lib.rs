//! rowlist - data loading core for paginated, sortable, filterable lists
//!
//! This crate provides the machinery behind list views: a debounced,
//! cancelable request gate, a controller that owns a list's filter, sort
//! and paging state, and a store that restores that state across
//! navigation.

pub mod app;
pub mod config;
pub mod domain;
pub mod services;

pub use services::{RowListController, RowListSource};
