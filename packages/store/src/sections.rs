//! [`SectionStore`] over SQLite.
//!
//! A reorder runs in one `IMMEDIATE` transaction: the stored id set is read
//! and compared against the requested order under the write lock, then every
//! row is updated. Any failure rolls the whole transaction back when the
//! transaction is dropped.

use crate::sqlite::{new_id, require_live_page, SqlResultExt, SqliteStore};
use pagecraft_common::{
    diff_order, page_scope, Section, SectionId, SectionKind, SectionPatch, SectionStore, StoreError,
    StoreResult,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

struct SectionRow {
    id: String,
    page_id: String,
    kind: String,
    data: String,
    position: u32,
}

impl SectionRow {
    fn into_section(self) -> StoreResult<Section> {
        Ok(Section {
            data: serde_json::from_str(&self.data)?,
            kind: SectionKind::parse(&self.kind),
            id: self.id,
            page_id: self.page_id,
            position: self.position,
        })
    }
}

fn ensure_object(data: &Value) -> StoreResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidPayload(format!(
            "section data must be a JSON object, got {}",
            data
        )))
    }
}

fn fetch_section(conn: &Connection, id: &str) -> StoreResult<Section> {
    let row = conn
        .query_row(
            "SELECT id, page_id, type, data, position FROM sections WHERE id = ?1",
            params![id],
            |row| {
                Ok(SectionRow {
                    id: row.get(0)?,
                    page_id: row.get(1)?,
                    kind: row.get(2)?,
                    data: row.get(3)?,
                    position: row.get(4)?,
                })
            },
        )
        .optional()
        .or_unavailable()?
        .ok_or_else(|| StoreError::SectionNotFound(id.to_string()))?;

    row.into_section()
}

fn stored_ids(conn: &Connection, page_id: &str) -> StoreResult<Vec<SectionId>> {
    let mut stmt = conn
        .prepare("SELECT id FROM sections WHERE page_id = ?1 ORDER BY position, id")
        .or_unavailable()?;
    let ids = stmt
        .query_map(params![page_id], |row| row.get(0))
        .or_unavailable()?
        .collect::<rusqlite::Result<Vec<String>>>()
        .or_unavailable()?;
    Ok(ids)
}

impl SectionStore for SqliteStore {
    fn list_sections(&self, page_id: &str) -> StoreResult<Vec<Section>> {
        require_live_page(&self.conn, page_id)?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, page_id, type, data, position FROM sections
                 WHERE page_id = ?1 ORDER BY position, id",
            )
            .or_unavailable()?;

        let rows = stmt
            .query_map(params![page_id], |row| {
                Ok(SectionRow {
                    id: row.get(0)?,
                    page_id: row.get(1)?,
                    kind: row.get(2)?,
                    data: row.get(3)?,
                    position: row.get(4)?,
                })
            })
            .or_unavailable()?
            .collect::<rusqlite::Result<Vec<_>>>()
            .or_unavailable()?;

        rows.into_iter().map(SectionRow::into_section).collect()
    }

    fn create_section(&mut self, page_id: &str, kind: SectionKind, data: Value) -> StoreResult<Section> {
        ensure_object(&data)?;
        let id = new_id();
        let payload = serde_json::to_string(&data)?;

        let tx = self.conn.transaction().or_unavailable()?;
        require_live_page(&tx, page_id)?;
        tx.execute(
            "INSERT INTO sections (id, page_id, type, data, position)
             SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(position) + 1, 0) FROM sections WHERE page_id = ?2",
            params![id, page_id, kind.as_str(), payload],
        )
        .or_unavailable()?;
        let section = fetch_section(&tx, &id)?;
        tx.commit().or_unavailable()?;

        info!(section_id = %id, page_id, kind = %section.kind, position = section.position, "Created section");
        Ok(section)
    }

    fn update_section(&mut self, id: &str, patch: SectionPatch) -> StoreResult<Section> {
        if let Some(data) = &patch.data {
            ensure_object(data)?;
        }

        let tx = self.conn.transaction().or_unavailable()?;
        let current = fetch_section(&tx, id)?;
        require_live_page(&tx, &current.page_id)?;

        if let Some(kind) = &patch.kind {
            tx.execute(
                "UPDATE sections SET type = ?1 WHERE id = ?2",
                params![kind.as_str(), id],
            )
            .or_unavailable()?;
        }
        if let Some(data) = &patch.data {
            tx.execute(
                "UPDATE sections SET data = ?1 WHERE id = ?2",
                params![serde_json::to_string(data)?, id],
            )
            .or_unavailable()?;
        }

        let updated = fetch_section(&tx, id)?;
        tx.commit().or_unavailable()?;

        debug!(section_id = %id, "Updated section");
        Ok(updated)
    }

    fn delete_section(&mut self, id: &str) -> StoreResult<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM sections WHERE id = ?1", params![id])
            .or_unavailable()?;

        if deleted == 0 {
            return Err(StoreError::SectionNotFound(id.to_string()));
        }
        debug!(section_id = %id, "Deleted section");
        Ok(())
    }

    #[instrument(skip(self, ordered_ids), fields(count = ordered_ids.len()))]
    fn reorder_sections(&mut self, page_id: &str, ordered_ids: &[SectionId]) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .or_unavailable()?;

        require_live_page(&tx, page_id)?;

        let stored = stored_ids(&tx, page_id)?;
        let (missing, unexpected) = diff_order(&stored, ordered_ids);
        if !missing.is_empty() || !unexpected.is_empty() {
            warn!(?missing, ?unexpected, "Rejected section reorder");
            return Err(StoreError::reorder_conflict(page_scope(page_id), missing, unexpected));
        }

        {
            let mut stmt = tx
                .prepare("UPDATE sections SET position = ?1 WHERE id = ?2 AND page_id = ?3")
                .or_unavailable()?;
            for (position, id) in ordered_ids.iter().enumerate() {
                stmt.execute(params![position as u32, id, page_id])
                    .or_unavailable()?;
            }
        }

        tx.commit().or_unavailable()?;
        debug!("Reordered sections");
        Ok(())
    }
}
