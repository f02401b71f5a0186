//! Tenant-scoped pages with a soft-delete tombstone.
//!
//! A deleted page keeps its row (and its sections) but disappears from every
//! listing, and section operations on it fail with `PageNotFound`.

use crate::sqlite::{new_id, parse_datetime, require_live_page, SqlResultExt, SqliteStore};
use chrono::Utc;
use pagecraft_common::{Page, StoreError, StoreResult};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

const PAGE_COLUMNS: &str = "id, tenant_id, title, slug, published, homepage, created_at, deleted_at";

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
    Ok(Page {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        title: row.get(2)?,
        slug: row.get(3)?,
        published: row.get(4)?,
        homepage: row.get(5)?,
        created_at: parse_datetime(row.get(6)?),
        deleted_at: row.get::<_, Option<String>>(7)?.map(parse_datetime),
    })
}

impl SqliteStore {
    pub fn create_page(&mut self, tenant_id: &str, title: &str, slug: &str) -> StoreResult<Page> {
        let id = new_id();
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO pages (id, tenant_id, title, slug, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, tenant_id, title, slug, now],
            )
            .or_unavailable()?;

        info!(page_id = %id, tenant_id, slug, "Created page");
        self.get_page(&id)
    }

    /// A live page by id
    pub fn get_page(&self, id: &str) -> StoreResult<Page> {
        let sql = format!(
            "SELECT {} FROM pages WHERE id = ?1 AND deleted_at IS NULL",
            PAGE_COLUMNS
        );
        self.conn
            .query_row(&sql, params![id], page_from_row)
            .optional()
            .or_unavailable()?
            .ok_or_else(|| StoreError::PageNotFound(id.to_string()))
    }

    /// Live pages of a tenant, oldest first
    pub fn list_pages(&self, tenant_id: &str) -> StoreResult<Vec<Page>> {
        let sql = format!(
            "SELECT {} FROM pages WHERE tenant_id = ?1 AND deleted_at IS NULL ORDER BY created_at, id",
            PAGE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).or_unavailable()?;
        let pages = stmt
            .query_map(params![tenant_id], page_from_row)
            .or_unavailable()?
            .collect::<rusqlite::Result<Vec<_>>>()
            .or_unavailable()?;
        Ok(pages)
    }

    pub fn set_published(&mut self, id: &str, published: bool) -> StoreResult<Page> {
        let updated = self
            .conn
            .execute(
                "UPDATE pages SET published = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![published, id],
            )
            .or_unavailable()?;

        if updated == 0 {
            return Err(StoreError::PageNotFound(id.to_string()));
        }
        debug!(page_id = %id, published, "Updated page visibility");
        self.get_page(id)
    }

    /// Make a page its tenant's homepage, clearing the flag on any other page
    pub fn set_homepage(&mut self, id: &str) -> StoreResult<Page> {
        let tx = self.conn.transaction().or_unavailable()?;

        let tenant_id: String = tx
            .query_row(
                "SELECT tenant_id FROM pages WHERE id = ?1 AND deleted_at IS NULL",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .or_unavailable()?
            .ok_or_else(|| StoreError::PageNotFound(id.to_string()))?;

        tx.execute(
            "UPDATE pages SET homepage = 0 WHERE tenant_id = ?1 AND homepage = 1",
            params![tenant_id],
        )
        .or_unavailable()?;
        tx.execute("UPDATE pages SET homepage = 1 WHERE id = ?1", params![id])
            .or_unavailable()?;
        tx.commit().or_unavailable()?;

        info!(page_id = %id, tenant_id = %tenant_id, "Set homepage");
        self.get_page(id)
    }

    /// Soft delete. The page also stops being the homepage.
    pub fn delete_page(&mut self, id: &str) -> StoreResult<()> {
        require_live_page(&self.conn, id)?;

        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "UPDATE pages SET deleted_at = ?1, homepage = 0 WHERE id = ?2",
                params![now, id],
            )
            .or_unavailable()?;

        info!(page_id = %id, "Deleted page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let page = store.create_page("church", "About us", "about").unwrap();

        assert_eq!(page.tenant_id, "church");
        assert_eq!(page.slug, "about");
        assert!(!page.published);
        assert!(!page.homepage);
        assert!(!page.is_deleted());
        assert_eq!(store.get_page(&page.id).unwrap(), page);
    }

    #[test]
    fn test_list_is_tenant_scoped() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.create_page("church", "Home", "home").unwrap();
        store.create_page("church", "Events", "events").unwrap();
        store.create_page("school", "Home", "home").unwrap();

        assert_eq!(store.list_pages("church").unwrap().len(), 2);
        assert_eq!(store.list_pages("school").unwrap().len(), 1);
        assert!(store.list_pages("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_single_homepage_per_tenant() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let home = store.create_page("church", "Home", "home").unwrap();
        let welcome = store.create_page("church", "Welcome", "welcome").unwrap();
        let other = store.create_page("school", "Home", "home").unwrap();

        store.set_homepage(&home.id).unwrap();
        store.set_homepage(&other.id).unwrap();
        store.set_homepage(&welcome.id).unwrap();

        assert!(!store.get_page(&home.id).unwrap().homepage);
        assert!(store.get_page(&welcome.id).unwrap().homepage);
        assert!(store.get_page(&other.id).unwrap().homepage);
    }

    #[test]
    fn test_publish() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let page = store.create_page("church", "Home", "home").unwrap();

        assert!(store.set_published(&page.id, true).unwrap().published);
        assert!(!store.set_published(&page.id, false).unwrap().published);
        assert_eq!(
            store.set_published("missing", true),
            Err(StoreError::PageNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_soft_delete_hides_page() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let page = store.create_page("church", "Home", "home").unwrap();
        store.set_homepage(&page.id).unwrap();

        store.delete_page(&page.id).unwrap();

        assert_eq!(
            store.get_page(&page.id),
            Err(StoreError::PageNotFound(page.id.clone()))
        );
        assert!(store.list_pages("church").unwrap().is_empty());
        assert!(store.delete_page(&page.id).is_err());
        assert!(store.set_homepage(&page.id).is_err());

        // The row is kept as a tombstone
        let deleted_at: Option<String> = store
            .conn
            .query_row("SELECT deleted_at FROM pages WHERE id = ?1", params![page.id], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(deleted_at.is_some());
    }
}
