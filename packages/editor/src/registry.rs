//! # Section Type Registry
//!
//! Static table mapping a section type tag to its default payload, its
//! read-only preview renderer and its editor form.
//!
//! Lookups never touch state and are safe from any thread. A miss is a
//! [`RegistryError::UnknownSectionType`]; page rendering goes through
//! [`resolve`], which substitutes the generic placeholder instead of failing.

use pagecraft_common::{Section, SectionKind};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown section type: {0}")]
    UnknownSectionType(String),
}

/// Read-only summary of a section as shown in the page outline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPreview {
    pub heading: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    LongText,
    Url,
    Image,
    ImageList,
    ItemList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Fields presented when a section is opened for editing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorForm {
    pub fields: Vec<FormField>,
}

/// Registry entry for one section type
pub struct SectionDescriptor {
    pub kind: SectionKind,
    pub label: &'static str,
    default_payload: fn() -> Value,
    render: fn(&Value) -> SectionPreview,
    fields: &'static [FormField],
}

impl SectionDescriptor {
    pub fn default_payload(&self) -> Value {
        (self.default_payload)()
    }

    pub fn render(&self, data: &Value) -> SectionPreview {
        (self.render)(data)
    }

    pub fn editor_form(&self) -> EditorForm {
        EditorForm {
            fields: self.fields.to_vec(),
        }
    }
}

impl std::fmt::Debug for SectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionDescriptor")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .finish()
    }
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FormField {
    FormField { key, label, kind }
}

fn text<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn count(data: &Value, key: &str) -> usize {
    data.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

fn preview(heading: &str, fallback: &str, summary: String) -> SectionPreview {
    let heading = if heading.trim().is_empty() {
        fallback.to_string()
    } else {
        heading.to_string()
    };
    SectionPreview { heading, summary }
}

static HERO_FIELDS: [FormField; 5] = [
    field("title", "Title", FieldKind::Text),
    field("subtitle", "Subtitle", FieldKind::LongText),
    field("backgroundImage", "Background image", FieldKind::Image),
    field("buttonText", "Button text", FieldKind::Text),
    field("buttonLink", "Button link", FieldKind::Url),
];

static BANNER_FIELDS: [FormField; 2] = [
    field("text", "Text", FieldKind::Text),
    field("link", "Link", FieldKind::Url),
];

static FEATURE_LIST_FIELDS: [FormField; 2] = [
    field("title", "Title", FieldKind::Text),
    field("items", "Features", FieldKind::ItemList),
];

static GALLERY_FIELDS: [FormField; 2] = [
    field("title", "Title", FieldKind::Text),
    field("images", "Images", FieldKind::ImageList),
];

static CTA_FIELDS: [FormField; 4] = [
    field("title", "Title", FieldKind::Text),
    field("description", "Description", FieldKind::LongText),
    field("buttonText", "Button text", FieldKind::Text),
    field("buttonLink", "Button link", FieldKind::Url),
];

static TESTIMONIALS_FIELDS: [FormField; 2] = [
    field("title", "Title", FieldKind::Text),
    field("items", "Testimonials", FieldKind::ItemList),
];

static GENERIC_FIELDS: [FormField; 0] = [];

static REGISTRY: [SectionDescriptor; 6] = [
    SectionDescriptor {
        kind: SectionKind::Hero,
        label: "Hero",
        default_payload: || {
            json!({
                "title": "Welcome",
                "subtitle": "",
                "backgroundImage": null,
                "buttonText": "Learn more",
                "buttonLink": "/"
            })
        },
        render: |data| {
            preview(
                text(data, "title"),
                "Hero",
                text(data, "subtitle").to_string(),
            )
        },
        fields: &HERO_FIELDS,
    },
    SectionDescriptor {
        kind: SectionKind::Banner,
        label: "Banner",
        default_payload: || json!({ "text": "Announcement", "link": null }),
        render: |data| {
            let summary = match data.get("link").and_then(Value::as_str) {
                Some(link) => format!("Links to {}", link),
                None => String::new(),
            };
            preview(text(data, "text"), "Banner", summary)
        },
        fields: &BANNER_FIELDS,
    },
    SectionDescriptor {
        kind: SectionKind::FeatureList,
        label: "Feature list",
        default_payload: || json!({ "title": "Features", "items": [] }),
        render: |data| {
            preview(
                text(data, "title"),
                "Feature list",
                format!("{} features", count(data, "items")),
            )
        },
        fields: &FEATURE_LIST_FIELDS,
    },
    SectionDescriptor {
        kind: SectionKind::Gallery,
        label: "Gallery",
        default_payload: || json!({ "title": "Gallery", "images": [] }),
        render: |data| {
            preview(
                text(data, "title"),
                "Gallery",
                format!("{} images", count(data, "images")),
            )
        },
        fields: &GALLERY_FIELDS,
    },
    SectionDescriptor {
        kind: SectionKind::Cta,
        label: "Call to action",
        default_payload: || {
            json!({
                "title": "Get involved",
                "description": "",
                "buttonText": "Contact us",
                "buttonLink": "/contact"
            })
        },
        render: |data| {
            preview(
                text(data, "title"),
                "Call to action",
                text(data, "buttonText").to_string(),
            )
        },
        fields: &CTA_FIELDS,
    },
    SectionDescriptor {
        kind: SectionKind::Testimonials,
        label: "Testimonials",
        default_payload: || json!({ "title": "What people say", "items": [] }),
        render: |data| {
            preview(
                text(data, "title"),
                "Testimonials",
                format!("{} testimonials", count(data, "items")),
            )
        },
        fields: &TESTIMONIALS_FIELDS,
    },
];

static GENERIC: SectionDescriptor = SectionDescriptor {
    kind: SectionKind::Generic,
    label: "Section",
    default_payload: || json!({}),
    render: |data| {
        let keys = data.as_object().map_or(0, |map| map.len());
        SectionPreview {
            heading: "Section".to_string(),
            summary: format!("{} fields", keys),
        }
    },
    fields: &GENERIC_FIELDS,
};

/// Look up the descriptor for a type tag
pub fn lookup(tag: &str) -> Result<&'static SectionDescriptor, RegistryError> {
    let kind = SectionKind::parse(tag);
    if kind == SectionKind::Generic {
        return Ok(&GENERIC);
    }

    REGISTRY
        .iter()
        .find(|descriptor| descriptor.kind == kind)
        .ok_or_else(|| RegistryError::UnknownSectionType(tag.to_string()))
}

/// Look up a descriptor, substituting the generic placeholder on a miss
pub fn resolve(kind: &SectionKind) -> &'static SectionDescriptor {
    match lookup(kind.as_str()) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            tracing::warn!(error = %err, "Falling back to generic section placeholder");
            &GENERIC
        }
    }
}

/// Kinds offered in the section picker, in picker order
pub fn kinds() -> impl Iterator<Item = &'static SectionKind> {
    REGISTRY.iter().map(|descriptor| &descriptor.kind)
}

/// Default payload for a new section of the given kind
pub fn default_payload(kind: &SectionKind) -> Value {
    resolve(kind).default_payload()
}

/// Render the read-only preview of a section. Never fails.
pub fn render_section(section: &Section) -> SectionPreview {
    resolve(&section.kind).render(&section.data)
}

/// Editor form for a section. Unknown kinds get an empty form.
pub fn editor_form(section: &Section) -> EditorForm {
    resolve(&section.kind).editor_form()
}
