//! # Page Model
//!
//! Records shared between the editor and the persistence backends.
//!
//! A [`Page`] owns an ordered collection of [`Section`]s. For every page the
//! positions of its sections form the contiguous range `0..n-1`; the editor
//! derives positions from list order and the store rewrites them atomically.
//!
//! [`MenuItem`]s follow the same contiguity rule, scoped to one sibling group
//! (items sharing a parent).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub type PageId = String;
pub type SectionId = String;
pub type MenuItemId = String;

/// Type tag of a section.
///
/// The wire form is a plain string. Tags this build does not know about are
/// kept verbatim in [`SectionKind::Unknown`] so they round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Hero,
    Banner,
    FeatureList,
    Gallery,
    Cta,
    Testimonials,
    Generic,
    Unknown(String),
}

impl SectionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Banner => "banner",
            SectionKind::FeatureList => "feature-list",
            SectionKind::Gallery => "gallery",
            SectionKind::Cta => "cta",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Generic => "generic",
            SectionKind::Unknown(tag) => tag,
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag {
            "hero" => SectionKind::Hero,
            "banner" => SectionKind::Banner,
            "feature-list" => SectionKind::FeatureList,
            "gallery" => SectionKind::Gallery,
            "cta" => SectionKind::Cta,
            "testimonials" => SectionKind::Testimonials,
            "generic" => SectionKind::Generic,
            other => SectionKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for SectionKind {
    fn from(tag: String) -> Self {
        SectionKind::parse(&tag)
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One composable block on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Opaque per-type payload (always a JSON object)
    pub data: Value,
    /// Zero-based rank within the page
    pub position: u32,
}

/// Partial update for a section. Position is never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SectionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SectionPatch {
    pub fn data(data: Value) -> Self {
        Self {
            kind: None,
            data: Some(data),
        }
    }

    pub fn kind(kind: SectionKind) -> Self {
        Self {
            kind: Some(kind),
            data: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.data.is_none()
    }

    /// Apply the patch to a section in place
    pub fn apply_to(&self, section: &mut Section) {
        if let Some(kind) = &self.kind {
            section.kind = kind.clone();
        }
        if let Some(data) = &self.data {
            section.data = data.clone();
        }
    }
}

/// A page document, scoped to a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub tenant_id: String,
    pub title: String,
    pub slug: String,
    pub published: bool,
    pub homepage: bool,
    pub created_at: DateTime<Utc>,
    /// Tombstone; deleted pages are never physically removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Site navigation entry. Two levels only: a child never has children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub tenant_id: String,
    #[serde(default)]
    pub parent_id: Option<MenuItemId>,
    pub label: String,
    pub url: String,
    /// Zero-based rank among siblings
    pub position: u32,
}

impl MenuItem {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
