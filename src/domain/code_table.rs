//! Code/description lookup tables for filter options and sort columns.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A code and its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeDescription {
    /// Machine code.
    pub code: String,
    /// Display text.
    pub description: String,
}

impl CodeDescription {
    /// Creates a new entry.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Errors that can occur while reloading a code table.
#[derive(Debug, Error)]
pub enum CodeTableError {
    /// The table was built without a loader.
    #[error("no reload defined")]
    NoReload,

    /// The loader failed.
    #[error("code table reload failed: {0}")]
    Load(anyhow::Error),
}

/// Loader that fetches a fresh set of entries.
pub type CodeTableLoader =
    Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<Vec<CodeDescription>>> + Send + Sync>;

/// An ordered set of code/description entries, optionally reloadable.
pub struct CodeTable {
    items: Vec<CodeDescription>,
    loader: Option<CodeTableLoader>,
}

impl CodeTable {
    /// Creates a static table.
    pub fn new(items: Vec<CodeDescription>) -> Self {
        Self {
            items,
            loader: None,
        }
    }

    /// Creates a table that can refresh its entries with `loader`.
    pub fn with_reload<L>(items: Vec<CodeDescription>, loader: L) -> Self
    where
        L: Fn() -> BoxFuture<'static, anyhow::Result<Vec<CodeDescription>>> + Send + Sync + 'static,
    {
        Self {
            items,
            loader: Some(Box::new(loader)),
        }
    }

    /// Current entries.
    pub fn items(&self) -> &[CodeDescription] {
        &self.items
    }

    /// Looks up the entry for `code`.
    pub fn for_code(&self, code: &str) -> Option<&CodeDescription> {
        self.items.iter().find(|item| item.code == code)
    }

    /// Description for `code`, if present.
    pub fn describe(&self, code: &str) -> Option<&str> {
        self.for_code(code).map(|item| item.description.as_str())
    }

    /// Replaces the entries with a fresh load. On failure the previous
    /// entries are kept.
    pub async fn reload(&mut self) -> Result<(), CodeTableError> {
        let loader = self.loader.as_ref().ok_or(CodeTableError::NoReload)?;
        let items = loader().await.map_err(CodeTableError::Load)?;
        tracing::debug!(count = items.len(), "code table reloaded");
        self.items = items;
        Ok(())
    }
}

impl std::fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeTable")
            .field("items", &self.items)
            .field("reloadable", &self.loader.is_some())
            .finish()
    }
}
