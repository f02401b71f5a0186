//! [`MenuStore`] over SQLite.

use crate::sqlite::{new_id, SqlResultExt, SqliteStore};
use pagecraft_common::{
    diff_order, menu_scope, MenuItem, MenuItemId, MenuStore, StoreError, StoreResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info, instrument, warn};

const MENU_COLUMNS: &str = "id, tenant_id, parent_id, label, url, position";

fn menu_item_from_row(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        parent_id: row.get(2)?,
        label: row.get(3)?,
        url: row.get(4)?,
        position: row.get(5)?,
    })
}

fn fetch_menu_item(conn: &Connection, id: &str) -> StoreResult<MenuItem> {
    let sql = format!("SELECT {} FROM menu_items WHERE id = ?1", MENU_COLUMNS);
    conn.query_row(&sql, params![id], menu_item_from_row)
        .optional()
        .or_unavailable()?
        .ok_or_else(|| StoreError::MenuItemNotFound(id.to_string()))
}

/// Ids of one sibling group in stored order
fn sibling_ids(conn: &Connection, tenant_id: &str, parent_id: Option<&str>) -> StoreResult<Vec<MenuItemId>> {
    let mut stmt = conn
        .prepare(
            "SELECT id FROM menu_items WHERE tenant_id = ?1 AND parent_id IS ?2
             ORDER BY position, id",
        )
        .or_unavailable()?;
    let ids = stmt
        .query_map(params![tenant_id, parent_id], |row| row.get(0))
        .or_unavailable()?
        .collect::<rusqlite::Result<Vec<String>>>()
        .or_unavailable()?;
    Ok(ids)
}

impl MenuStore for SqliteStore {
    fn list_menu_items(&self, tenant_id: &str) -> StoreResult<Vec<MenuItem>> {
        let sql = format!(
            "SELECT {} FROM menu_items WHERE tenant_id = ?1
             ORDER BY parent_id IS NOT NULL, parent_id, position, id",
            MENU_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).or_unavailable()?;
        let items = stmt
            .query_map(params![tenant_id], menu_item_from_row)
            .or_unavailable()?
            .collect::<rusqlite::Result<Vec<_>>>()
            .or_unavailable()?;
        Ok(items)
    }

    fn create_menu_item(
        &mut self,
        tenant_id: &str,
        parent_id: Option<&str>,
        label: &str,
        url: &str,
    ) -> StoreResult<MenuItem> {
        let tx = self.conn.transaction().or_unavailable()?;

        if let Some(parent_id) = parent_id {
            let parent = fetch_menu_item(&tx, parent_id)?;
            if parent.tenant_id != tenant_id {
                return Err(StoreError::MenuItemNotFound(parent_id.to_string()));
            }
            if !parent.is_top_level() {
                return Err(StoreError::MenuDepthExceeded(parent_id.to_string()));
            }
        }

        let id = new_id();
        tx.execute(
            "INSERT INTO menu_items (id, tenant_id, parent_id, label, url, position)
             SELECT ?1, ?2, ?3, ?4, ?5, COALESCE(MAX(position) + 1, 0)
             FROM menu_items WHERE tenant_id = ?2 AND parent_id IS ?3",
            params![id, tenant_id, parent_id, label, url],
        )
        .or_unavailable()?;
        let item = fetch_menu_item(&tx, &id)?;
        tx.commit().or_unavailable()?;

        info!(menu_item_id = %id, tenant_id, parent_id = ?parent_id, "Created menu item");
        Ok(item)
    }

    fn delete_menu_item(&mut self, id: &str) -> StoreResult<()> {
        let tx = self.conn.transaction().or_unavailable()?;
        fetch_menu_item(&tx, id)?;

        let children = tx
            .execute("DELETE FROM menu_items WHERE parent_id = ?1", params![id])
            .or_unavailable()?;
        tx.execute("DELETE FROM menu_items WHERE id = ?1", params![id])
            .or_unavailable()?;
        tx.commit().or_unavailable()?;

        debug!(menu_item_id = %id, children, "Deleted menu item");
        Ok(())
    }

    #[instrument(skip(self, ordered_ids), fields(count = ordered_ids.len()))]
    fn reorder_menu_items(
        &mut self,
        tenant_id: &str,
        parent_id: Option<&str>,
        ordered_ids: &[MenuItemId],
    ) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .or_unavailable()?;

        let stored = sibling_ids(&tx, tenant_id, parent_id)?;
        let (missing, unexpected) = diff_order(&stored, ordered_ids);
        if !missing.is_empty() || !unexpected.is_empty() {
            warn!(?missing, ?unexpected, "Rejected menu reorder");
            return Err(StoreError::reorder_conflict(
                menu_scope(tenant_id, parent_id),
                missing,
                unexpected,
            ));
        }

        {
            let mut stmt = tx
                .prepare("UPDATE menu_items SET position = ?1 WHERE id = ?2")
                .or_unavailable()?;
            for (position, id) in ordered_ids.iter().enumerate() {
                stmt.execute(params![position as u32, id]).or_unavailable()?;
            }
        }

        tx.commit().or_unavailable()?;
        debug!("Reordered menu items");
        Ok(())
    }
}
