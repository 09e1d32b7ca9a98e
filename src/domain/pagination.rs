//! Pagination arithmetic and the "Showing X to Y of Z" summary.
//!
//! These are pure functions of the row count, page number and page size;
//! both the pagination control and the compact mobile summary use them.

use serde::{Deserialize, Serialize};

/// Summary text shown when there is nothing to page through.
pub const NO_RECORDS: &str = "No records to display.";

/// Page sizes offered by the pagination control.
pub const DEFAULT_PAGE_SIZES: [u32; 5] = [5, 10, 20, 50, 100];

/// Human-readable paging summary plus whether paging controls are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// "Showing {first} to {last} of {total}" or [`NO_RECORDS`].
    pub text: String,
    /// Whether there is anything to page through.
    pub show_paging: bool,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            text: NO_RECORDS.to_string(),
            show_paging: false,
        }
    }
}

/// Builds the paging summary.
///
/// A missing or zero row count, or a zero page size, produces [`NO_RECORDS`].
/// A page number past the end is clamped to the last page.
pub fn make_summary(row_count: Option<u64>, page_number: u32, page_size: u32) -> Summary {
    let window = PageWindow::new(row_count.unwrap_or(0), page_number, page_size);
    if !window.has_rows() {
        return Summary::default();
    }

    Summary {
        text: format!(
            "Showing {} to {} of {}",
            window.first_row, window.last_row, window.row_count
        ),
        show_paging: true,
    }
}

/// The rows visible on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageWindow {
    /// Rows across all pages.
    pub row_count: u64,
    /// Number of pages, 0 when there are no rows.
    pub page_count: u64,
    /// 1-based index of the first visible row, 0 when there are no rows.
    pub first_row: u64,
    /// 1-based index of the last visible row, 0 when there are no rows.
    pub last_row: u64,
}

impl PageWindow {
    /// Computes the window for the given page.
    pub fn new(row_count: u64, page_number: u32, page_size: u32) -> Self {
        if row_count == 0 || page_size == 0 {
            return Self::default();
        }

        let size = u64::from(page_size);
        let page_count = row_count.div_ceil(size);
        let page = page_count.min(u64::from(page_number)).max(1);
        let first_row = (page - 1) * size + 1;
        let last_row = (first_row + size - 1).min(row_count);

        Self {
            row_count,
            page_count,
            first_row,
            last_row,
        }
    }

    /// Whether any rows fall on a page.
    pub fn has_rows(&self) -> bool {
        self.page_count > 0
    }
}

/// Width class of the pagination control, which decides how many page
/// links fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationWidth {
    /// Wider than 600px.
    Sufficient,
    /// Wider than 500px.
    Tight,
    /// Anything narrower.
    Restrictive,
}

impl PaginationWidth {
    /// Classifies a measured width in pixels. Returns `None` for an
    /// unmeasured (zero) width.
    pub fn for_width(width: u32) -> Option<Self> {
        match width {
            0 => None,
            w if w > 600 => Some(Self::Sufficient),
            w if w > 500 => Some(Self::Tight),
            _ => Some(Self::Restrictive),
        }
    }

    /// Maximum number of page links to render.
    pub fn max_page_links(self) -> u32 {
        match self {
            Self::Sufficient => 5,
            Self::Tight => 3,
            Self::Restrictive => 4,
        }
    }
}

/// One entry of the page size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeOption {
    /// Rows per page.
    pub size: u32,
    /// Display label, e.g. "20 Rows".
    pub label: String,
}

impl PageSizeOption {
    /// Creates an option labelled "{size} Rows".
    pub fn new(size: u32) -> Self {
        Self {
            size,
            label: format!("{size} Rows"),
        }
    }

    /// Options for the given sizes, in order.
    pub fn from_sizes(sizes: &[u32]) -> Vec<Self> {
        sizes.iter().copied().map(Self::new).collect()
    }

    /// The default 5/10/20/50/100 options.
    pub fn defaults() -> Vec<Self> {
        Self::from_sizes(&DEFAULT_PAGE_SIZES)
    }
}
