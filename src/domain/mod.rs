//! Domain layer types for row lists.
//!
//! This module contains the plain data shared by the list services: list
//! identities, sort requests, restorable list state, fetch results, paging
//! arithmetic, code tables and filter value helpers.

mod code_table;
mod filter;
mod pagination;
mod state;
mod types;

pub use code_table::{CodeDescription, CodeTable, CodeTableError, CodeTableLoader};
pub use filter::{map_to_code_description, unwrap_filter_value, wrap_filter_value, FilterValue};
pub use pagination::{
    make_summary, PageSizeOption, PageWindow, PaginationWidth, Summary, DEFAULT_PAGE_SIZES,
    NO_RECORDS,
};
pub use state::{LoadRowListResult, RowListState};
pub use types::{ListKey, Sort, SortDirection};
