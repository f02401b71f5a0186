//! # Section Picker Placement
//!
//! Decides where the floating "add section" picker opens relative to the
//! control that triggered it.
//!
//! Sidebar and centered modes are fixed layout slots. Popover mode anchors
//! the picker to the trigger:
//!
//! 1. Horizontally centered on the trigger, clamped to stay `viewport_padding`
//!    away from both viewport edges.
//! 2. Below the trigger when the space below fits the picker plus
//!    `trigger_offset`; otherwise above when that fits; otherwise vertically
//!    centered in the viewport.
//!
//! Pure geometry: inputs out of range are clamped, never rejected.

use pagecraft_common::{Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerMode {
    Sidebar,
    Center,
    #[default]
    Popover,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Sidebar,
    Center,
    Popover { left: f64, top: f64 },
}

/// Picker dimensions and spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerMetrics {
    pub width: f64,
    pub height: f64,
    /// Minimum gap between the picker and any viewport edge
    pub viewport_padding: f64,
    /// Gap between the trigger and the picker
    pub trigger_offset: f64,
}

impl Default for PickerMetrics {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 500.0,
            viewport_padding: 16.0,
            trigger_offset: 8.0,
        }
    }
}

/// Resolve the picker placement for a mode
pub fn resolve(trigger: &Rect, viewport: Size, mode: PickerMode, metrics: &PickerMetrics) -> Placement {
    match mode {
        PickerMode::Sidebar => Placement::Sidebar,
        PickerMode::Center => Placement::Center,
        PickerMode::Popover => {
            let (left, top) = popover_position(trigger, viewport, metrics);
            Placement::Popover { left, top }
        }
    }
}

/// Top-left corner of an anchored popover
pub fn popover_position(trigger: &Rect, viewport: Size, metrics: &PickerMetrics) -> (f64, f64) {
    let padding = metrics.viewport_padding;
    let offset = metrics.trigger_offset;
    let (trigger_center_x, _) = trigger.center();

    let left = clamp_lenient(
        trigger_center_x - metrics.width / 2.0,
        padding,
        viewport.width - metrics.width - padding,
    );

    let space_below = viewport.height - trigger.bottom();
    let space_above = trigger.top;
    let needed = metrics.height + offset;

    let top = if space_below > needed {
        clamp_lenient(trigger.bottom() + offset, 0.0, viewport.height - metrics.height)
    } else if space_above > needed {
        clamp_lenient(trigger.top - metrics.height - offset, 0.0, viewport.height - metrics.height)
    } else {
        clamp_lenient(
            (viewport.height - metrics.height) / 2.0,
            padding,
            viewport.height - metrics.height - padding,
        )
    };

    (left, top)
}

/// Clamp to `[min, max]`; when the range is empty (viewport smaller than
/// the picker) the lower bound wins.
fn clamp_lenient(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
