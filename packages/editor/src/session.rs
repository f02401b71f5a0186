//! # Edit Session Management
//!
//! One editor's view of a page: the working section list, the selection, the
//! drag in progress and the structural edits that storage has not confirmed.
//!
//! Structural edits (insert, remove, move) are applied to the working list at
//! once and queued as pending mutations. [`EditSession::commit`] flushes them:
//! deletions first, then one atomic reorder of the whole page.
//!
//! The session also keeps a `confirmed` list mirroring what storage holds.
//! When a commit fails:
//!
//! - **Conflict**: storage changed underneath us. The session reloads the page
//!   from storage and replays the pending mutations that still make sense.
//!   They stay pending so the caller can commit again or discard them.
//! - **Unavailable**: the working list is rolled back to the confirmed list
//!   and the attempted mutations are stashed for [`EditSession::retry`].
//!
//! Either way the caller gets a [`CommitWarning`] to show; the visible order
//! is never swapped out silently.

use crate::config::EditorConfig;
use crate::drag::{DragEnd, DragGesture};
use crate::mutations::Mutation;
use crate::placement::{self, Placement, PickerMode};
use crate::registry;
use crate::section_list::SectionList;
use crate::selection::{ScrollRequest, SelectionState, Viewport};
use crate::{EditorError, EditorResult};
use pagecraft_common::{
    Rect, Section, SectionId, SectionKind, SectionPatch, SectionStore, Size, StoreError,
};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, instrument, warn};

/// Single edit session over one page
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Current selection / edit panel
    pub selection: SelectionState,

    /// Drag gesture in progress
    pub drag: DragGesture,

    config: EditorConfig,

    /// Working order shown to the user
    list: SectionList,

    /// Last order known to be in storage
    confirmed: SectionList,

    /// Structural mutations waiting for storage
    pending_mutations: Vec<PendingMutation>,

    /// Mutations rolled back after a failed commit, kept for retry
    stashed: Vec<PendingMutation>,

    /// Rows were deleted since the last successful reorder, so stored
    /// positions may have a gap until the next reorder goes through
    order_dirty: bool,

    next_mutation: u64,
}

/// Mutation waiting for storage to confirm it
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// Unique mutation ID
    pub id: String,

    /// The mutation
    pub mutation: Mutation,

    /// When it was created
    pub timestamp: u64,
}

/// Non-fatal outcome of a commit that did not go through
#[derive(Debug, Clone, PartialEq)]
pub enum CommitWarning {
    /// Storage no longer matched the session. The list was reloaded and
    /// `replayed` pending mutations re-applied; `dropped` no longer applied.
    Conflict { replayed: usize, dropped: usize },

    /// Storage could not be reached. Local edits were rolled back and
    /// `attempted` mutations stashed for retry.
    Unavailable { attempted: usize, reason: String },
}

impl EditSession {
    /// Create a session over a list that mirrors storage
    pub fn new(id: String, list: SectionList) -> Self {
        Self {
            id,
            selection: SelectionState::default(),
            drag: DragGesture::new(),
            config: EditorConfig::default(),
            confirmed: list.clone(),
            list,
            pending_mutations: Vec::new(),
            stashed: Vec::new(),
            order_dirty: false,
            next_mutation: 0,
        }
    }

    /// Open a session on a page, loading its sections from storage
    pub fn load<S: SectionStore + ?Sized>(id: String, store: &S, page_id: &str) -> EditorResult<Self> {
        let sections = store.list_sections(page_id)?;
        debug!(page_id, count = sections.len(), "Loaded page sections");
        Ok(Self::new(id, SectionList::from_stored(page_id, sections)))
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Working order
    pub fn list(&self) -> &SectionList {
        &self.list
    }

    /// Order last confirmed by storage
    pub fn confirmed(&self) -> &SectionList {
        &self.confirmed
    }

    pub fn pending_mutations(&self) -> &[PendingMutation] {
        &self.pending_mutations
    }

    /// Get number of pending mutations
    pub fn pending_count(&self) -> usize {
        self.pending_mutations.len()
    }

    /// Number of rolled-back mutations available to [`retry`](Self::retry)
    pub fn stashed_count(&self) -> usize {
        self.stashed.len()
    }

    /// Whether stored positions still need a reorder after earlier deletes
    pub fn needs_reorder(&self) -> bool {
        self.order_dirty
    }

    /// Apply a mutation to the working list right away.
    ///
    /// Structural mutations that change the list are queued for the next
    /// commit. Returns whether the list changed.
    pub fn apply_optimistic(&mut self, mutation: Mutation) -> EditorResult<bool> {
        let changed = mutation.apply(&mut self.list)?;

        if let Mutation::RemoveSection { section_id } = &mutation {
            self.selection.forget(section_id);
        }

        if changed && mutation.is_structural() {
            let id = format!("{}-{}", self.id, self.next_mutation);
            self.next_mutation += 1;
            self.pending_mutations.push(PendingMutation {
                id,
                mutation,
                timestamp: current_timestamp(),
            });
        }

        Ok(changed)
    }

    /// Move by index within the working list
    pub fn move_section(&mut self, from: usize, to: usize) -> EditorResult<bool> {
        let Some(section) = self.list.sections().get(from) else {
            return Ok(false);
        };
        let mutation = Mutation::MoveSection {
            section_id: section.id.clone(),
            to_index: to,
        };
        self.apply_optimistic(mutation)
    }

    /// Apply a drop reported by the gesture layer. Drops outside any section
    /// leave the list unchanged.
    pub fn drop_dragged(&mut self, end: &DragEnd) -> EditorResult<bool> {
        match end.to_mutation(&self.list) {
            Some(mutation) => self.apply_optimistic(mutation),
            None => Ok(false),
        }
    }

    /// Finish the session's own drag gesture
    pub fn end_drag(&mut self) -> EditorResult<bool> {
        match self.drag.end() {
            Some(end) => self.drop_dragged(&end),
            None => Ok(false),
        }
    }

    /// Create a section in storage and place it at `index` in the working list.
    ///
    /// Storage appends new sections at the end; the requested index is
    /// reached by the next commit's reorder. `data` defaults to the
    /// registry's payload for the kind.
    pub fn add_section<S: SectionStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: i64,
        kind: SectionKind,
        data: Option<Value>,
    ) -> EditorResult<SectionId> {
        let data = data.unwrap_or_else(|| registry::default_payload(&kind));
        let section = store.create_section(self.list.page_id(), kind, data)?;
        let id = section.id.clone();

        self.confirmed.insert_at(self.confirmed.len() as i64, section.clone());
        self.apply_optimistic(Mutation::InsertSection { index, section })?;

        info!(section_id = %id, index, "Added section");
        Ok(id)
    }

    /// Remove a section from the working list; storage is updated on commit
    pub fn remove_section(&mut self, id: &str) -> EditorResult<bool> {
        self.apply_optimistic(Mutation::RemoveSection {
            section_id: id.to_string(),
        })
    }

    /// Update a section's type tag and/or payload in storage, then locally
    pub fn update_section<S: SectionStore + ?Sized>(
        &mut self,
        store: &mut S,
        id: &str,
        patch: SectionPatch,
    ) -> EditorResult<Section> {
        Mutation::UpdateSection {
            section_id: id.to_string(),
            patch: patch.clone(),
        }
        .validate(&self.list)?;

        let updated = store.update_section(id, patch.clone())?;
        self.list.update(id, &patch);
        self.confirmed.update(id, &patch);
        Ok(updated)
    }

    /// Flush pending mutations to storage.
    ///
    /// Returns `Ok(None)` when storage now matches the working list (or there
    /// was nothing to do), `Ok(Some(warning))` when the commit was rejected or
    /// storage was unreachable, and `Err` for anything else.
    #[instrument(skip(self, store), fields(session = %self.id, page_id = %self.list.page_id()))]
    pub fn commit<S: SectionStore + ?Sized>(&mut self, store: &mut S) -> EditorResult<Option<CommitWarning>> {
        if self.pending_mutations.is_empty() && !self.order_dirty {
            return Ok(None);
        }

        match self.flush(store) {
            Ok(()) => {
                info!(mutations = self.pending_mutations.len(), "Committed section order");
                self.confirmed = self.list.clone();
                self.pending_mutations.clear();
                Ok(None)
            }
            Err(StoreError::ReorderConflict { missing, unexpected, .. }) => {
                warn!(?missing, ?unexpected, "Section order conflicts with storage, rebasing");
                let stored = store.list_sections(self.list.page_id())?;
                let (replayed, dropped) = self.rebase(stored);
                Ok(Some(CommitWarning::Conflict { replayed, dropped }))
            }
            Err(StoreError::PersistenceUnavailable(reason)) => {
                warn!(%reason, "Storage unavailable, rolling back section order");
                let attempted = self.rollback();
                Ok(Some(CommitWarning::Unavailable { attempted, reason }))
            }
            Err(err) => Err(EditorError::Store(err)),
        }
    }

    /// Re-apply mutations stashed by a rollback and commit again
    pub fn retry<S: SectionStore + ?Sized>(&mut self, store: &mut S) -> EditorResult<Option<CommitWarning>> {
        let stashed = std::mem::take(&mut self.stashed);
        let (replayed, dropped) = self.replay(stashed);
        debug!(replayed, dropped, "Replayed stashed mutations");
        self.commit(store)
    }

    /// Replace local state with the stored sections and replay pending
    /// mutations on top. Returns `(replayed, dropped)`.
    pub fn rebase(&mut self, stored: Vec<Section>) -> (usize, usize) {
        let page_id = self.list.page_id().to_string();
        self.confirmed = SectionList::from_stored(page_id, stored);
        self.list = self.confirmed.clone();

        let pending = std::mem::take(&mut self.pending_mutations);
        let result = self.replay(pending);
        self.forget_missing_selection();
        result
    }

    /// Drop local edits that storage never confirmed
    pub fn discard_pending(&mut self) {
        self.pending_mutations.clear();
        self.stashed.clear();
        self.list = self.confirmed.clone();
        self.forget_missing_selection();
    }

    /// Where the section picker should open for a trigger control
    pub fn picker_placement(&self, trigger: &Rect, viewport: Size, mode: Option<PickerMode>) -> Placement {
        let mode = mode.unwrap_or(self.config.default_picker_mode);
        placement::resolve(trigger, viewport, mode, &self.config.picker)
    }

    /// Close the edit panel using the configured header offset
    pub fn close_edit(&mut self, section_rect: Option<&Rect>, viewport: &Viewport) -> Option<ScrollRequest> {
        self.selection
            .close_edit(section_rect, viewport, self.config.scroll.header_offset)
    }

    fn flush<S: SectionStore + ?Sized>(&mut self, store: &mut S) -> Result<(), StoreError> {
        let removals: Vec<SectionId> = self
            .pending_mutations
            .iter()
            .filter_map(|pm| match &pm.mutation {
                Mutation::RemoveSection { section_id } => Some(section_id.clone()),
                _ => None,
            })
            .collect();

        for section_id in removals {
            if !self.confirmed.contains(&section_id) {
                continue;
            }
            match store.delete_section(&section_id) {
                Ok(()) | Err(StoreError::SectionNotFound(_)) => {
                    self.order_dirty = true;
                    self.confirmed.remove_by_id(&section_id);
                }
                Err(err) => return Err(err),
            }
        }

        store.reorder_sections(self.list.page_id(), &self.list.ids())?;
        self.order_dirty = false;
        Ok(())
    }

    fn rollback(&mut self) -> usize {
        let attempted = std::mem::take(&mut self.pending_mutations);
        let count = attempted.len();
        self.stashed.extend(attempted);
        self.list = self.confirmed.clone();
        self.forget_missing_selection();
        count
    }

    fn replay(&mut self, mutations: Vec<PendingMutation>) -> (usize, usize) {
        let mut replayed = 0;
        let mut dropped = 0;

        for pm in mutations {
            // Only sections that still exist in storage can be placed again
            if let Mutation::InsertSection { section, .. } = &pm.mutation {
                if !self.confirmed.contains(&section.id) {
                    dropped += 1;
                    continue;
                }
            }

            match pm.mutation.apply(&mut self.list) {
                Ok(true) => {
                    replayed += 1;
                    self.pending_mutations.push(pm);
                }
                Ok(false) | Err(_) => dropped += 1,
            }
        }

        (replayed, dropped)
    }

    fn forget_missing_selection(&mut self) {
        if let Some(id) = self.selection.selected().map(str::to_string) {
            if !self.list.contains(&id) {
                self.selection.deselect();
            }
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
