//! Restorable list view state and fetch results.

use serde::{Deserialize, Serialize};

use super::types::{Sort, SortDirection};

/// Snapshot of a list view that survives navigation.
///
/// The filter payload is opaque to the list machinery; each list kind picks
/// its own shape. All fields are plain data so a snapshot can be deep-copied
/// through serialization without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowListState<F> {
    /// Caller-defined filter payload.
    pub filter: F,
    /// Rows per page.
    pub page_size: u32,
    /// Current page, 1-indexed.
    pub page_number: u32,
    /// Code of the sorted column, `None` when unsorted.
    pub sort_active: Option<String>,
    /// Sort direction.
    pub sort_direction: SortDirection,
}

impl<F> RowListState<F> {
    /// Creates a state on the first page, unsorted.
    pub fn new(filter: F, page_size: u32) -> Self {
        Self {
            filter,
            page_size,
            page_number: 1,
            sort_active: None,
            sort_direction: SortDirection::Asc,
        }
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_active = Some(column.into());
        self.sort_direction = direction;
        self
    }

    /// Returns the current sort as a [`Sort`].
    pub fn sort(&self) -> Sort {
        Sort {
            active: self.sort_active.clone(),
            direction: self.sort_direction,
        }
    }

    /// Zero-based index of the first row on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Raises a zero page number to 1 and replaces a zero page size with
    /// `default_page_size`.
    pub(crate) fn normalize(&mut self, default_page_size: u32) {
        if self.page_number == 0 {
            self.page_number = 1;
        }
        if self.page_size == 0 {
            self.page_size = default_page_size.max(1);
        }
    }
}

/// Outcome of one page fetch, already mapped for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRowListResult<R> {
    /// Rows of the requested page, in fetch order.
    pub rows: Vec<R>,
    /// Row count across all pages.
    pub total_row_count: u64,
}

impl<R> LoadRowListResult<R> {
    /// Creates a result from a page of rows and the overall count.
    pub fn new(rows: Vec<R>, total_row_count: u64) -> Self {
        Self {
            rows,
            total_row_count,
        }
    }

    /// The empty-but-valid result a failed load degrades to.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_row_count: 0,
        }
    }
}

impl<R> Default for LoadRowListResult<R> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct PermitFilter {
        status: Vec<String>,
        search: String,
    }

    #[test]
    fn new_state_starts_on_first_page() {
        let state = RowListState::new((), 20);
        assert_eq!(state.page_number, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.sort_active, None);
    }

    #[test]
    fn state_survives_json_deep_copy() {
        let state = RowListState::new(
            PermitFilter {
                status: vec!["ACTIVE".to_string(), "PENDING".to_string()],
                search: "north".to_string(),
            },
            50,
        )
        .with_sort("issuedDate", SortDirection::Desc);

        let value = serde_json::to_value(&state).unwrap();
        let copy: RowListState<PermitFilter> = serde_json::from_value(value).unwrap();

        assert_eq!(copy, state);
    }

    #[test]
    fn state_uses_camel_case_fields() {
        let state = RowListState::new((), 10);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["pageNumber"], 1);
        assert_eq!(value["sortDirection"], "asc");
    }

    #[test]
    fn offset_follows_page_number() {
        let mut state = RowListState::new((), 10);
        assert_eq!(state.offset(), 0);
        state.page_number = 3;
        assert_eq!(state.offset(), 20);
    }

    #[test]
    fn normalize_raises_zero_page() {
        let mut state = RowListState::new((), 10);
        state.page_number = 0;
        state.normalize(20);
        assert_eq!(state.page_number, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn normalize_replaces_zero_page_size() {
        let mut state = RowListState::new((), 0);
        state.normalize(20);
        assert_eq!(state.page_size, 20);

        let mut state = RowListState::new((), 0);
        state.normalize(0);
        assert_eq!(state.page_size, 1);
    }

    #[test]
    fn empty_result() {
        let result: LoadRowListResult<String> = LoadRowListResult::empty();
        assert!(result.rows.is_empty());
        assert_eq!(result.total_row_count, 0);
    }
}
