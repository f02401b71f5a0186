//! # Pagecraft Editor
//!
//! Editing engine for section-based pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ gestures: selection, drag, picker trigger   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession over a SectionList      │
//! │  - Resolve picker placement                 │
//! │  - Look up section types in the registry    │
//! │  - Apply mutations optimistically           │
//! │  - Commit, rebase or roll back              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: SectionStore (atomic reorder)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Order is the list**: positions are always the array indices `0..n`
//! 2. **Storage decides**: a rejected commit rebuilds local state from storage
//! 3. **Whole-page reorders**: storage receives the complete order at once
//! 4. **Unknown types degrade**: a section with an unregistered type still
//!    renders as a placeholder and can be moved or deleted
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{EditSession, DragEnd};
//! use pagecraft_common::SectionKind;
//!
//! let mut session = EditSession::load("client-1".into(), &store, "home")?;
//!
//! // Insert a call-to-action after the first section
//! session.add_section(&mut store, 1, SectionKind::Cta, None)?;
//!
//! // Drop the third section onto the first
//! session.drop_dragged(&DragEnd { source: "c".into(), target: Some("a".into()) })?;
//!
//! if let Some(warning) = session.commit(&mut store)? {
//!     // show a toast, the list has been rebuilt or rolled back
//! }
//! ```

mod config;
mod drag;
mod errors;
mod menu;
mod mutations;
mod placement;
pub mod registry;
mod section_list;
mod selection;
mod session;

pub use config::{EditorConfig, ScrollConfig, DEFAULT_CONFIG_NAME};
pub use drag::{closest_center, on_reorder, DragEnd, DragGesture, Droppable};
pub use errors::{EditorError, EditorResult};
pub use menu::{MenuError, MenuTree};
pub use mutations::{Mutation, MutationError};
pub use placement::{popover_position, PickerMetrics, PickerMode, Placement};
pub use registry::{RegistryError, SectionDescriptor};
pub use section_list::SectionList;
pub use selection::{ScrollBehavior, ScrollRequest, SelectionState, Viewport};
pub use session::{CommitWarning, EditSession, PendingMutation};

/// Resolve where the section picker opens
pub use placement::resolve as resolve_placement;
