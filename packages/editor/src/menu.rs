//! # Navigation Menu Tree
//!
//! Flat table of menu items with a nullable parent reference, looked up by
//! id. Items are ordered within their sibling group and positions in every
//! group stay contiguous from zero.
//!
//! Nesting is limited to two levels. The limit is enforced when an item is
//! inserted: a parent must itself be top-level.

use pagecraft_common::{MenuItem, MenuItemId, MenuStore, StoreResult};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    #[error("Menu item already exists: {0}")]
    DuplicateItem(String),

    #[error("Menu item {0} is nested and cannot take children")]
    DepthExceeded(String),
}

#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    items: HashMap<MenuItemId, MenuItem>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored items; sibling positions are renumbered in stored order
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        let mut tree = Self {
            items: items.into_iter().map(|item| (item.id.clone(), item)).collect(),
        };

        let mut parents: Vec<Option<MenuItemId>> =
            tree.items.values().map(|item| item.parent_id.clone()).collect();
        parents.sort();
        parents.dedup();
        for parent in parents {
            tree.reindex(parent.as_deref());
        }
        tree
    }

    /// Load a tenant's menu from storage
    pub fn load<S: MenuStore + ?Sized>(store: &S, tenant_id: &str) -> StoreResult<Self> {
        Ok(Self::from_items(store.list_menu_items(tenant_id)?))
    }

    /// Persist the order of one sibling group
    pub fn save_order<S: MenuStore + ?Sized>(
        &self,
        store: &mut S,
        tenant_id: &str,
        parent: Option<&str>,
    ) -> StoreResult<()> {
        store.reorder_menu_items(tenant_id, parent, &self.ordered_ids(parent))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// Items under `parent` (top level when `None`) in position order
    pub fn children(&self, parent: Option<&str>) -> Vec<&MenuItem> {
        let mut children: Vec<&MenuItem> = self
            .items
            .values()
            .filter(|item| item.parent_id.as_deref() == parent)
            .collect();
        children.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        children
    }

    pub fn ordered_ids(&self, parent: Option<&str>) -> Vec<MenuItemId> {
        self.children(parent)
            .into_iter()
            .map(|item| item.id.clone())
            .collect()
    }

    /// Insert an item under `parent` at `index` (clamped to the group size).
    /// The item's own `parent_id` and `position` are overwritten.
    pub fn insert(&mut self, mut item: MenuItem, parent: Option<&str>, index: usize) -> Result<(), MenuError> {
        if self.items.contains_key(&item.id) {
            return Err(MenuError::DuplicateItem(item.id));
        }
        if let Some(parent_id) = parent {
            let parent_item = self
                .items
                .get(parent_id)
                .ok_or_else(|| MenuError::ItemNotFound(parent_id.to_string()))?;
            if !parent_item.is_top_level() {
                return Err(MenuError::DepthExceeded(parent_id.to_string()));
            }
        }

        let mut order = self.ordered_ids(parent);
        let index = index.min(order.len());
        order.insert(index, item.id.clone());

        item.parent_id = parent.map(str::to_string);
        self.items.insert(item.id.clone(), item);
        self.apply_order(&order);
        Ok(())
    }

    /// Remove an item and its children
    pub fn remove(&mut self, id: &str) -> Result<Vec<MenuItem>, MenuError> {
        let item = self
            .items
            .remove(id)
            .ok_or_else(|| MenuError::ItemNotFound(id.to_string()))?;

        let child_ids = self.ordered_ids(Some(id));
        let mut removed = vec![item];
        for child_id in child_ids {
            if let Some(child) = self.items.remove(&child_id) {
                removed.push(child);
            }
        }

        self.reindex(removed[0].parent_id.as_deref());
        Ok(removed)
    }

    /// Array-move within one sibling group. Returns whether the order changed.
    pub fn move_within(&mut self, parent: Option<&str>, from: usize, to: usize) -> bool {
        let mut order = self.ordered_ids(parent);
        if from >= order.len() {
            return false;
        }
        let to = to.min(order.len() - 1);
        if from == to {
            return false;
        }

        let id = order.remove(from);
        order.insert(to, id);
        self.apply_order(&order);
        true
    }

    fn reindex(&mut self, parent: Option<&str>) {
        let order = self.ordered_ids(parent);
        self.apply_order(&order);
    }

    fn apply_order(&mut self, order: &[MenuItemId]) {
        for (index, id) in order.iter().enumerate() {
            if let Some(item) = self.items.get_mut(id) {
                item.position = index as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            tenant_id: "church".to_string(),
            parent_id: None,
            label: id.to_uppercase(),
            url: format!("/{}", id),
            position: 0,
        }
    }

    fn positions(tree: &MenuTree, parent: Option<&str>) -> Vec<u32> {
        tree.children(parent).iter().map(|i| i.position).collect()
    }

    #[test]
    fn test_insert_top_level_and_children() {
        let mut tree = MenuTree::new();
        tree.insert(item("home"), None, 0).unwrap();
        tree.insert(item("about"), None, 1).unwrap();
        tree.insert(item("events"), None, 1).unwrap();
        tree.insert(item("staff"), Some("about"), 0).unwrap();
        tree.insert(item("history"), Some("about"), 0).unwrap();

        assert_eq!(tree.ordered_ids(None), vec!["home", "events", "about"]);
        assert_eq!(tree.ordered_ids(Some("about")), vec!["history", "staff"]);
        assert_eq!(positions(&tree, None), vec![0, 1, 2]);
        assert_eq!(positions(&tree, Some("about")), vec![0, 1]);
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = MenuTree::new();
        tree.insert(item("about"), None, 0).unwrap();
        tree.insert(item("staff"), Some("about"), 0).unwrap();

        let err = tree.insert(item("pastors"), Some("staff"), 0).unwrap_err();
        assert_eq!(err, MenuError::DepthExceeded("staff".to_string()));
        assert!(tree.get("pastors").is_none());
    }

    #[test]
    fn test_insert_errors() {
        let mut tree = MenuTree::new();
        tree.insert(item("home"), None, 0).unwrap();
        assert_eq!(
            tree.insert(item("home"), None, 0),
            Err(MenuError::DuplicateItem("home".to_string()))
        );
        assert_eq!(
            tree.insert(item("x"), Some("missing"), 0),
            Err(MenuError::ItemNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_remove_cascades_and_closes_gap() {
        let mut tree = MenuTree::new();
        tree.insert(item("home"), None, 0).unwrap();
        tree.insert(item("about"), None, 1).unwrap();
        tree.insert(item("give"), None, 2).unwrap();
        tree.insert(item("staff"), Some("about"), 0).unwrap();

        let removed = tree.remove("about").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(tree.get("staff").is_none());
        assert_eq!(tree.ordered_ids(None), vec!["home", "give"]);
        assert_eq!(positions(&tree, None), vec![0, 1]);
    }

    #[test]
    fn test_move_within_group() {
        let mut tree = MenuTree::new();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            tree.insert(item(id), None, i).unwrap();
        }

        assert!(tree.move_within(None, 2, 0));
        assert_eq!(tree.ordered_ids(None), vec!["c", "a", "b"]);
        assert!(!tree.move_within(None, 1, 1));
        assert!(!tree.move_within(None, 7, 0));
    }

    #[test]
    fn test_from_items_renumbers() {
        let mut a = item("a");
        a.position = 5;
        let mut b = item("b");
        b.position = 2;
        let mut child = item("child");
        child.parent_id = Some("a".to_string());
        child.position = 9;

        let tree = MenuTree::from_items(vec![a, b, child]);
        assert_eq!(tree.ordered_ids(None), vec!["b", "a"]);
        assert_eq!(positions(&tree, None), vec![0, 1]);
        assert_eq!(positions(&tree, Some("a")), vec![0]);
    }
}
