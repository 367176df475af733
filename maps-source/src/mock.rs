//! Mock list provider for testing and local development.
//!
//! The `MockListProvider` can be pre-populated with name → items mappings,
//! and lists can be replaced or marked as loading while a test runs.
//!
//! # Example
//!
//! ```ignore
//! use maps_source::{ListProvider, MockListProvider, ObjectItem};
//!
//! let provider = MockListProvider::new();
//! provider.register_list("heatmap", vec![ObjectItem::new("1").with("lat", 52.0)]);
//! let list = provider.fetch("heatmap").await?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::{ListProvider, ListSourceError, ListValue, ObjectItem, Result};

/// Mock list provider that returns pre-configured lists.
pub struct MockListProvider {
    /// Map of list name -> current value
    lists: RwLock<HashMap<String, ListValue>>,
}

impl MockListProvider {
    /// Create a new empty mock provider.
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
        }
    }

    /// Create a mock provider pre-populated with available lists.
    pub fn with_lists(lists: HashMap<String, Vec<ObjectItem>>) -> Self {
        let provider = Self::new();
        for (name, items) in lists {
            provider.register_list(&name, items);
        }
        provider
    }

    /// Register (or replace) an available list.
    pub fn register_list(&self, name: &str, items: Vec<ObjectItem>) {
        self.set_value(name, ListValue::available(items));
    }

    /// Mark a list as still loading. Its previous items are dropped.
    pub fn mark_loading(&self, name: &str) {
        self.set_value(name, ListValue::loading());
    }

    fn set_value(&self, name: &str, value: ListValue) {
        self.lists
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }

    /// Check if a list is registered in the mock.
    pub fn has_list(&self, name: &str) -> bool {
        self.lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Get the number of registered lists.
    pub fn len(&self) -> usize {
        self.lists.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the mock is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockListProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListProvider for MockListProvider {
    async fn fetch(&self, name: &str) -> Result<ListValue> {
        self.lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| ListSourceError::NotFound(format!("list not found in mock: {}", name)))
    }

    async fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .lists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueStatus;

    fn point(id: &str, lat: f64, lng: f64) -> ObjectItem {
        ObjectItem::new(id).with("lat", lat).with("lng", lng)
    }

    #[tokio::test]
    async fn test_mock_provider_with_lists() {
        let mut lists = HashMap::new();
        lists.insert("a".to_string(), vec![point("1", 1.0, 2.0)]);
        lists.insert("b".to_string(), vec![]);
        let provider = MockListProvider::with_lists(lists);

        assert_eq!(provider.len(), 2);
        assert!(provider.has_list("a"));
        assert!(provider.has_list("b"));
        assert!(!provider.has_list("c"));
        assert_eq!(provider.names().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_mock_provider_fetch() {
        let provider = MockListProvider::new();
        provider.register_list("points", vec![point("1", 1.0, 2.0), point("2", 3.0, 4.0)]);

        let list = provider.fetch("points").await.unwrap();
        assert_eq!(list.status, ValueStatus::Available);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].id, "2");
    }

    #[tokio::test]
    async fn test_mock_provider_loading() {
        let provider = MockListProvider::new();
        provider.register_list("points", vec![point("1", 1.0, 2.0)]);
        provider.mark_loading("points");

        let list = provider.fetch("points").await.unwrap();
        assert_eq!(list.status, ValueStatus::Loading);
        assert!(list.items.is_empty());
    }

    #[tokio::test]
    async fn test_mock_provider_not_found() {
        let provider = MockListProvider::new();

        let result = provider.fetch("unknown").await;
        if let Err(ListSourceError::NotFound(msg)) = result {
            assert!(msg.contains("unknown"));
        } else {
            panic!("Expected NotFound error");
        }
    }
}
