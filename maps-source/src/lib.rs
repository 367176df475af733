//! List data sources for the map widget.
//!
//! This crate provides:
//! - [`ListValue`], [`ObjectItem`] and [`AttributeValue`], the snapshot of a
//!   bound list data source as handed to the map on every render
//! - [`ListSource`] config enum for choosing between mock and file-backed lists
//! - [`ListProvider`] trait for abstracting list access
//! - [`FileListProvider`] provider that reads named lists from a JSON file
//! - [`MockListProvider`] mock provider with pre-configured name → items mappings
//!
//! ## Usage with ListSource (Recommended)
//!
//! ```ignore
//! use maps_source::ListSource;
//! use std::collections::HashMap;
//!
//! // Development/testing: use mock data
//! let mut lists = HashMap::new();
//! lists.insert("heatmap".to_string(), items);
//! let provider = ListSource::mock(lists).into_provider();
//!
//! // Production: read from disk
//! let provider = ListSource::file("data/lists.json").into_provider();
//!
//! let list = provider.fetch("heatmap").await?;
//! ```

mod mock;

pub use mock::MockListProvider;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ListSourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("list not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ListSourceError>;

/// Loading state of a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStatus {
    Loading,
    Unavailable,
    Available,
}

/// A single attribute value of a list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Decimal(f64),
    Boolean(bool),
    Text(String),
    Empty,
}

impl AttributeValue {
    /// Numeric view of the value. Text is parsed, so `"52.09"` reads as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Boolean(_) | Self::Empty => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One object of a list data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectItem {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ObjectItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Snapshot of a list data source: its status and, once available, its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListValue {
    pub status: ValueStatus,
    #[serde(default)]
    pub items: Vec<ObjectItem>,
}

impl ListValue {
    pub fn available(items: Vec<ObjectItem>) -> Self {
        Self {
            status: ValueStatus::Available,
            items,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: ValueStatus::Unavailable,
            items: Vec::new(),
        }
    }

    pub fn loading() -> Self {
        Self {
            status: ValueStatus::Loading,
            items: Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == ValueStatus::Available
    }
}

/// Trait for fetching list data sources by name.
///
/// Production code uses [`FileListProvider`], while tests can use
/// [`MockListProvider`].
#[async_trait]
pub trait ListProvider: Send + Sync {
    /// Fetch the current items of a named list.
    async fn fetch(&self, name: &str) -> Result<ListValue>;

    /// Names of all lists this provider knows about.
    async fn names(&self) -> Result<Vec<String>>;
}

/// Fetch a list, reporting it as unavailable instead of failing.
///
/// Mirrors how a host hands a list to the widget: a list that could not be
/// loaded is simply not available yet.
pub async fn fetch_or_unavailable(provider: &dyn ListProvider, name: &str) -> ListValue {
    match provider.fetch(name).await {
        Ok(list) => list,
        Err(error) => {
            tracing::warn!(list = %name, error = %error, "List unavailable");
            ListValue::unavailable()
        }
    }
}

/// Provider that reads named lists from a JSON file.
///
/// The file holds an object of `name -> [item, ...]`. It is re-read on every
/// fetch so edits on disk show up on the next render.
///
/// ```ignore
/// let provider = FileListProvider::new("data/lists.json");
/// let list = provider.fetch("heatmap").await?;
/// ```
pub struct FileListProvider {
    path: PathBuf,
}

impl FileListProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileListProvider { path: path.into() }
    }

    async fn load(&self) -> Result<HashMap<String, Vec<ObjectItem>>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let lists = serde_json::from_str(&contents)?;
        Ok(lists)
    }
}

#[async_trait]
impl ListProvider for FileListProvider {
    async fn fetch(&self, name: &str) -> Result<ListValue> {
        let mut lists = self.load().await?;
        let items = lists
            .remove(name)
            .ok_or_else(|| ListSourceError::NotFound(name.to_string()))?;

        tracing::debug!(list = %name, items = items.len(), "Loaded list from file");
        Ok(ListValue::available(items))
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.load().await?.into_keys().collect();
        names.sort();
        Ok(names)
    }
}

/// Configuration for the list data source.
///
/// Use this to explicitly choose between mock and file-backed lists.
#[derive(Debug, Clone)]
pub enum ListSource {
    /// Use mock lists with pre-configured name → items mappings.
    Mock(HashMap<String, Vec<ObjectItem>>),

    /// Read lists from a JSON file.
    File {
        /// Path to the JSON file
        path: PathBuf,
    },
}

impl ListSource {
    /// Create a mock list source with the given name → items mappings.
    pub fn mock(lists: HashMap<String, Vec<ObjectItem>>) -> Self {
        Self::Mock(lists)
    }

    /// Create a file-backed list source.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Create the appropriate ListProvider implementation.
    pub fn into_provider(self) -> Box<dyn ListProvider> {
        match self {
            Self::Mock(lists) => Box::new(MockListProvider::with_lists(lists)),
            Self::File { path } => Box::new(FileListProvider::new(path)),
        }
    }
}
