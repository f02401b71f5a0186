//! Persistence contracts for page sections and navigation menus.
//!
//! The editor talks to storage only through [`SectionStore`] and
//! [`MenuStore`]. Backends must make every reorder all-or-nothing: on any
//! error the stored positions are exactly what they were before the call.

use crate::model::{MenuItem, MenuItemId, Section, SectionId, SectionKind, SectionPatch};
use crate::result::StoreResult;
use serde_json::Value;

pub trait SectionStore {
    /// Sections of a page in stored position order
    fn list_sections(&self, page_id: &str) -> StoreResult<Vec<Section>>;

    /// Append a section after the current last position (or at 0)
    fn create_section(
        &mut self,
        page_id: &str,
        kind: SectionKind,
        data: Value,
    ) -> StoreResult<Section>;

    /// Update type tag and/or payload. Never touches position.
    fn update_section(&mut self, id: &str, patch: SectionPatch) -> StoreResult<Section>;

    /// Hard-delete a section. Positions of the remaining sections are left as
    /// they are until the next reorder.
    fn delete_section(&mut self, id: &str) -> StoreResult<()>;

    /// Rewrite every position of the page to its index in `ordered_ids`.
    ///
    /// Fails with `ReorderConflict` unless `ordered_ids` is exactly the set of
    /// sections currently stored for the page, without duplicates.
    fn reorder_sections(&mut self, page_id: &str, ordered_ids: &[SectionId]) -> StoreResult<()>;
}

pub trait MenuStore {
    /// Every menu item of a tenant, ordered by parent then position
    fn list_menu_items(&self, tenant_id: &str) -> StoreResult<Vec<MenuItem>>;

    /// Append an item to its sibling group. Fails with `MenuDepthExceeded`
    /// when `parent_id` is itself nested.
    fn create_menu_item(
        &mut self,
        tenant_id: &str,
        parent_id: Option<&str>,
        label: &str,
        url: &str,
    ) -> StoreResult<MenuItem>;

    /// Delete an item together with its children
    fn delete_menu_item(&mut self, id: &str) -> StoreResult<()>;

    /// Same contract as [`SectionStore::reorder_sections`], scoped to one
    /// sibling group (`parent_id = None` is the top level).
    fn reorder_menu_items(
        &mut self,
        tenant_id: &str,
        parent_id: Option<&str>,
        ordered_ids: &[MenuItemId],
    ) -> StoreResult<()>;
}

/// Compare a client-supplied order against the ids currently stored for a scope.
///
/// Returns `(missing, unexpected)`: stored ids absent from `ordered`, and
/// ordered ids that are not stored or appear more than once.
pub fn diff_order(stored: &[SectionId], ordered: &[SectionId]) -> (Vec<String>, Vec<String>) {
    use std::collections::HashSet;

    let stored_set: HashSet<&str> = stored.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unexpected = Vec::new();

    for id in ordered {
        if !stored_set.contains(id.as_str()) || !seen.insert(id.as_str()) {
            unexpected.push(id.clone());
        }
    }

    let missing = stored
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    (missing, unexpected)
}

/// Scope label used in conflict errors for a page
pub fn page_scope(page_id: &str) -> String {
    format!("page {}", page_id)
}

/// Scope label used in conflict errors for a menu sibling group
pub fn menu_scope(tenant_id: &str, parent_id: Option<&str>) -> String {
    match parent_id {
        Some(parent) => format!("menu {}/{}", tenant_id, parent),
        None => format!("menu {}", tenant_id),
    }
}
