//! Core identifier and sorting types shared by list views.
//!
//! These newtype wrappers provide type safety for list identities,
//! preventing accidental mixing with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a list kind.
///
/// Every controller built for the same kind of list (e.g. "permits") uses the
/// same key, so state saved by one instance is restored by the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListKey(pub String);

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ListKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ListKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Direction of the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Returns the wire code for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort request emitted by a sort control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    /// Code of the column to sort by, `None` for unsorted.
    pub active: Option<String>,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Sort {
    /// Creates a sort on the given column.
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active: Some(column.into()),
            direction,
        }
    }

    /// Creates an unsorted request.
    pub fn unsorted() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_key_display() {
        let key = ListKey("permit-list".to_string());
        assert_eq!(key.to_string(), "permit-list");
    }

    #[test]
    fn list_key_equality() {
        let key1 = ListKey::from("permit-list");
        let key2 = ListKey::from("permit-list".to_string());
        assert_eq!(key1, key2);
    }

    #[test]
    fn list_key_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ListKey::from("a"));
        assert!(set.contains(&ListKey::from("a")));
    }

    #[test]
    fn sort_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SortDirection::Desc).unwrap(), "\"desc\"");
        let parsed: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(parsed, SortDirection::Asc);
    }

    #[test]
    fn sort_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }

    #[test]
    fn sort_by_column() {
        let sort = Sort::by("name", SortDirection::Desc);
        assert_eq!(sort.active.as_deref(), Some("name"));
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(Sort::unsorted().active, None);
    }
}
