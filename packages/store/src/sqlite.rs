//! SQLite-backed storage for pages, sections and menus.
//!
//! One [`SqliteStore`] owns one connection. Section and menu operations live
//! in their own modules as further `impl SqliteStore` blocks; this module
//! holds opening, schema setup and the row helpers they share.

use crate::config::StoreConfig;
use chrono::{DateTime, Utc};
use pagecraft_common::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Database version for migrations
const SCHEMA_VERSION: i32 = 1;

/// The persistence store backed by SQLite
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

/// Map driver errors onto the storage error model
pub(crate) trait SqlResultExt<T> {
    fn or_unavailable(self) -> StoreResult<T>;
}

impl<T> SqlResultExt<T> for rusqlite::Result<T> {
    fn or_unavailable(self) -> StoreResult<T> {
        self.map_err(StoreError::unavailable)
    }
}

impl SqliteStore {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::unavailable(format!("failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path).or_unavailable()?;
        debug!(path = %path.display(), "Opened database");
        Self::with_connection(conn)
    }

    /// Open the database named by the config, relative to `base_dir`
    pub fn from_config(config: &StoreConfig, base_dir: &Path) -> StoreResult<Self> {
        Self::open(&config.resolve_path(base_dir))
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().or_unavailable()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;").or_unavailable()?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Current schema version (0 before the schema exists)
    pub fn schema_version(&self) -> StoreResult<i32> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='meta'",
                [],
                |_| Ok(true),
            )
            .optional()
            .or_unavailable()?
            .unwrap_or(false);

        if !exists {
            return Ok(0);
        }

        let version: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'schema_version'", [], |row| {
                row.get(0)
            })
            .optional()
            .or_unavailable()?;

        Ok(version.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    fn initialize(&mut self) -> StoreResult<()> {
        let version = self.schema_version()?;

        if version == 0 {
            self.create_schema()?;
            info!(version = SCHEMA_VERSION, "Created database schema");
        } else if version < SCHEMA_VERSION {
            self.migrate(version)?;
        }

        Ok(())
    }

    fn create_schema(&mut self) -> StoreResult<()> {
        self.conn
            .execute_batch(
                r#"
            -- Metadata table for schema versioning
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Pages; deleted_at marks a soft delete
            CREATE TABLE IF NOT EXISTS pages (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                title TEXT NOT NULL,
                slug TEXT NOT NULL,
                published INTEGER NOT NULL DEFAULT 0,
                homepage INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                deleted_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_pages_tenant ON pages(tenant_id);

            -- Sections; position is not unique so a reorder can rewrite rows one by one
            CREATE TABLE IF NOT EXISTS sections (
                id TEXT PRIMARY KEY,
                page_id TEXT NOT NULL,
                type TEXT NOT NULL,
                data TEXT NOT NULL,
                position INTEGER NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages(id)
            );

            CREATE INDEX IF NOT EXISTS idx_sections_page ON sections(page_id, position);

            -- Navigation menu, two levels deep
            CREATE TABLE IF NOT EXISTS menu_items (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                parent_id TEXT,
                label TEXT NOT NULL,
                url TEXT NOT NULL,
                position INTEGER NOT NULL,
                FOREIGN KEY (parent_id) REFERENCES menu_items(id)
            );

            CREATE INDEX IF NOT EXISTS idx_menu_items_tenant ON menu_items(tenant_id, parent_id, position);

            INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', '1');
        "#,
            )
            .or_unavailable()
    }

    fn migrate(&mut self, from_version: i32) -> StoreResult<()> {
        debug!(from_version, to_version = SCHEMA_VERSION, "No migrations to run");
        Ok(())
    }
}

/// Fail with `PageNotFound` unless the page exists and is not deleted
pub(crate) fn require_live_page(conn: &Connection, page_id: &str) -> StoreResult<()> {
    let live = conn
        .query_row(
            "SELECT 1 FROM pages WHERE id = ?1 AND deleted_at IS NULL",
            params![page_id],
            |_| Ok(()),
        )
        .optional()
        .or_unavailable()?;

    live.ok_or_else(|| StoreError::PageNotFound(page_id.to_string()))
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_created_once() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pages.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.create_page("church", "Home", "home").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.list_pages("church").unwrap().len(), 1);
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::from_config(&StoreConfig::default(), dir.path()).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(dir.path().join("pagecraft.db").exists());
    }

    #[test]
    fn test_unparseable_timestamp() {
        assert_eq!(parse_datetime("yesterday".to_string()), DateTime::<Utc>::default());
    }
}
