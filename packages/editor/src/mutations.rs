//! # Section Mutations
//!
//! Structural and content edits applied to a [`SectionList`].
//!
//! Mutations are recorded by the edit session while they wait for storage to
//! confirm them, and replayed when local state has to be rebuilt. They are
//! therefore keyed by section id rather than by index wherever possible.
//!
//! ## Semantics
//!
//! ### InsertSection
//! - Index is clamped to the list bounds
//! - Inserting an id that is already present repositions it instead
//!
//! ### RemoveSection
//! - No-op if the id is absent (deletes may race with reordering)
//!
//! ### MoveSection
//! - Array-move of the section to `to_index` (index after removal)
//! - Fails if the section is gone
//!
//! ### UpdateSection
//! - Replaces type tag and/or payload, never the position

use crate::section_list::SectionList;
use pagecraft_common::{Section, SectionId, SectionPatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Insert a section at index
    #[serde(rename_all = "camelCase")]
    InsertSection { index: i64, section: Section },

    /// Remove a section from the page
    #[serde(rename_all = "camelCase")]
    RemoveSection { section_id: SectionId },

    /// Move a section to a new index
    #[serde(rename_all = "camelCase")]
    MoveSection { section_id: SectionId, to_index: usize },

    /// Update type tag and/or payload
    #[serde(rename_all = "camelCase")]
    UpdateSection {
        section_id: SectionId,
        patch: SectionPatch,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section {section_id} belongs to page {found}, not {expected}")]
    PageMismatch {
        section_id: String,
        expected: String,
        found: String,
    },

    #[error("Empty patch for section {0}")]
    EmptyPatch(String),
}

impl Mutation {
    /// Whether this mutation changes the order of the list
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::UpdateSection { .. })
    }

    /// Validate without applying
    pub fn validate(&self, list: &SectionList) -> Result<(), MutationError> {
        match self {
            Mutation::InsertSection { section, .. } => {
                if section.page_id != list.page_id() {
                    return Err(MutationError::PageMismatch {
                        section_id: section.id.clone(),
                        expected: list.page_id().to_string(),
                        found: section.page_id.clone(),
                    });
                }
                Ok(())
            }

            Mutation::RemoveSection { .. } => Ok(()),

            Mutation::MoveSection { section_id, .. } => {
                if !list.contains(section_id) {
                    return Err(MutationError::SectionNotFound(section_id.clone()));
                }
                Ok(())
            }

            Mutation::UpdateSection { section_id, patch } => {
                if !list.contains(section_id) {
                    return Err(MutationError::SectionNotFound(section_id.clone()));
                }
                if patch.is_empty() {
                    return Err(MutationError::EmptyPatch(section_id.clone()));
                }
                Ok(())
            }
        }
    }

    /// Apply with validation. Returns whether the list changed.
    pub fn apply(&self, list: &mut SectionList) -> Result<bool, MutationError> {
        self.validate(list)?;

        let changed = match self {
            Mutation::InsertSection { index, section } => {
                list.remove_by_id(&section.id);
                list.insert_at(*index, section.clone());
                true
            }

            Mutation::RemoveSection { section_id } => list.remove_by_id(section_id).is_some(),

            Mutation::MoveSection {
                section_id,
                to_index,
            } => match list.index_of(section_id) {
                Some(from) => list.move_by_index(from, *to_index),
                None => false,
            },

            Mutation::UpdateSection { section_id, patch } => list.update(section_id, patch),
        };

        Ok(changed)
    }
}
