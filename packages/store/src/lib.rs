//! # Pagecraft Store
//!
//! SQLite persistence for pages, their sections and the navigation menu.
//!
//! [`SqliteStore`] implements the [`SectionStore`] and [`MenuStore`]
//! contracts from `pagecraft-common`. Reorders are transactional: either
//! every position is rewritten or none is.
//!
//! ```rust,ignore
//! use pagecraft_store::SqliteStore;
//! use pagecraft_common::{SectionKind, SectionStore};
//!
//! let mut store = SqliteStore::open(Path::new("pagecraft.db"))?;
//! let page = store.create_page("church", "Home", "home")?;
//! let hero = store.create_section(&page.id, SectionKind::Hero, json!({}))?;
//! ```

mod config;
mod menu;
mod pages;
mod sections;
mod sqlite;

pub use config::StoreConfig;
pub use sqlite::SqliteStore;

pub use pagecraft_common::{MenuStore, SectionStore, StoreError, StoreResult};
