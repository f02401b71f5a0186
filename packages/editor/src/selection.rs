//! # Selection and Editing
//!
//! Which section is selected, and which one (at most one) has its edit panel
//! open. Editing always implies selection, so the state is a single enum:
//!
//! ```text
//!            select(a)               edit(a)
//!   Idle ─────────────▶ Selected(a) ─────────▶ Editing(a)
//!    ▲                   │   ▲                   │
//!    └── select(a) ──────┘   └──── close_edit ───┘
//!        deselect (from any state) → Idle
//! ```
//!
//! Closing an edit panel may leave the section off-screen (the panel changes
//! document height above it), so `close_edit` reports the scroll needed to
//! bring the section back just below the fixed header.

use crate::errors::{EditorError, EditorResult};
use pagecraft_common::{Rect, SectionId, Size};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(SectionId),
    Editing(SectionId),
}

/// Visible viewport and its current document scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub scroll_top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Request to scroll the document to an absolute offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(id) | SelectionState::Editing(id) => Some(id),
        }
    }

    pub fn editing(&self) -> Option<&str> {
        match self {
            SelectionState::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, SelectionState::Editing(_))
    }

    /// Select a section. Selecting the already-selected section clears the
    /// selection; selecting another one abandons any open edit.
    pub fn select(&mut self, id: &str) {
        if self.selected() == Some(id) {
            *self = SelectionState::Idle;
        } else {
            *self = SelectionState::Selected(id.to_string());
        }
    }

    /// Open the edit panel. The section must already be selected.
    pub fn edit(&mut self, id: &str) -> EditorResult<()> {
        if self.selected() != Some(id) {
            return Err(EditorError::InvalidTransition(format!(
                "cannot edit {} while it is not selected",
                id
            )));
        }
        *self = SelectionState::Editing(id.to_string());
        Ok(())
    }

    /// Close the edit panel, keeping the section selected.
    ///
    /// `section_rect` is the section's on-screen rectangle after the panel
    /// closed. When its top edge sits under the header band or below the
    /// viewport, a smooth scroll bringing it to `header_offset` is returned.
    pub fn close_edit(
        &mut self,
        section_rect: Option<&Rect>,
        viewport: &Viewport,
        header_offset: f64,
    ) -> Option<ScrollRequest> {
        let id = match self {
            SelectionState::Editing(id) => std::mem::take(id),
            _ => return None,
        };
        *self = SelectionState::Selected(id);

        let rect = section_rect?;
        let drifted = rect.top < header_offset || rect.top > viewport.size.height;
        if !drifted {
            return None;
        }

        Some(ScrollRequest {
            top: (viewport.scroll_top + rect.top - header_offset).max(0.0),
            behavior: ScrollBehavior::Smooth,
        })
    }

    pub fn deselect(&mut self) {
        *self = SelectionState::Idle;
    }

    /// Drop any reference to a section that no longer exists
    pub fn forget(&mut self, id: &str) {
        if self.selected() == Some(id) {
            *self = SelectionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            size: Size::new(1200.0, 800.0),
            scroll_top: 1000.0,
        }
    }

    #[test]
    fn test_select_toggles() {
        let mut state = SelectionState::default();
        state.select("a");
        assert_eq!(state, SelectionState::Selected("a".to_string()));
        state.select("a");
        assert_eq!(state, SelectionState::Idle);
    }

    #[test]
    fn test_select_other_replaces() {
        let mut state = SelectionState::Selected("a".to_string());
        state.select("b");
        assert_eq!(state.selected(), Some("b"));
    }

    #[test]
    fn test_edit_requires_selection() {
        let mut state = SelectionState::default();
        assert!(state.edit("a").is_err());
        assert_eq!(state, SelectionState::Idle);

        state.select("a");
        assert!(state.edit("b").is_err());
        state.edit("a").unwrap();
        assert_eq!(state.editing(), Some("a"));
        assert_eq!(state.selected(), Some("a"));
    }

    #[test]
    fn test_selecting_while_editing() {
        let mut state = SelectionState::Editing("a".to_string());
        state.select("a");
        assert_eq!(state, SelectionState::Idle);

        let mut state = SelectionState::Editing("a".to_string());
        state.select("b");
        assert_eq!(state, SelectionState::Selected("b".to_string()));
        assert!(!state.is_editing());
    }

    #[test]
    fn test_close_edit_in_view_does_not_scroll() {
        let mut state = SelectionState::Editing("a".to_string());
        let rect = Rect::new(0.0, 200.0, 1200.0, 300.0);
        assert_eq!(state.close_edit(Some(&rect), &viewport(), 80.0), None);
        assert_eq!(state, SelectionState::Selected("a".to_string()));
    }

    #[test]
    fn test_close_edit_above_header_scrolls_up() {
        let mut state = SelectionState::Editing("a".to_string());
        let rect = Rect::new(0.0, -400.0, 1200.0, 300.0);
        let request = state.close_edit(Some(&rect), &viewport(), 80.0).unwrap();
        assert_eq!(request.top, 1000.0 - 400.0 - 80.0);
        assert_eq!(request.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_close_edit_below_viewport_scrolls_down() {
        let mut state = SelectionState::Editing("a".to_string());
        let rect = Rect::new(0.0, 950.0, 1200.0, 300.0);
        let request = state.close_edit(Some(&rect), &viewport(), 80.0).unwrap();
        assert_eq!(request.top, 1000.0 + 950.0 - 80.0);
    }

    #[test]
    fn test_close_edit_when_not_editing() {
        let mut state = SelectionState::Selected("a".to_string());
        let rect = Rect::new(0.0, -400.0, 1200.0, 300.0);
        assert_eq!(state.close_edit(Some(&rect), &viewport(), 80.0), None);
        assert_eq!(state, SelectionState::Selected("a".to_string()));
    }

    #[test]
    fn test_forget_removed_section() {
        let mut state = SelectionState::Editing("a".to_string());
        state.forget("b");
        assert!(state.is_editing());
        state.forget("a");
        assert_eq!(state, SelectionState::Idle);
    }
}
