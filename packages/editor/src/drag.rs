//! # Drag Reorder
//!
//! Turns a finished drag gesture into a new section order.
//!
//! The gesture layer only has to report which section is being dragged and
//! which section ended up under it; [`closest_center`] picks the drop target
//! among the section rectangles. [`on_reorder`] is a pure function of
//! `(order, source, target)` and never talks to storage: the caller decides
//! when the new order is committed.

use crate::mutations::Mutation;
use crate::section_list::SectionList;
use pagecraft_common::{Rect, SectionId};

/// A section rectangle that can receive a drop
#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    pub id: SectionId,
    pub rect: Rect,
}

/// Collision detection: the droppable whose center is nearest to the center
/// of the dragged rectangle. Ties keep the earliest droppable.
pub fn closest_center<'a>(active: &Rect, droppables: &'a [Droppable]) -> Option<&'a SectionId> {
    let mut best: Option<(&'a Droppable, f64)> = None;

    for droppable in droppables {
        let distance = active.center_distance(&droppable.rect);
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((droppable, distance)),
        }
    }

    best.map(|(droppable, _)| &droppable.id)
}

/// New order after dropping `source` onto `target`, or `None` when nothing
/// moves (no target, same id, or either id unknown).
pub fn on_reorder(order: &[SectionId], source: &str, target: Option<&str>) -> Option<Vec<SectionId>> {
    let target = target?;
    if source == target {
        return None;
    }

    let from = order.iter().position(|id| id == source)?;
    let to = order.iter().position(|id| id == target)?;

    let mut next = order.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Some(next)
}

/// Drag-end event as reported by the gesture layer
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub source: SectionId,
    pub target: Option<SectionId>,
}

impl DragEnd {
    /// The move this drop stands for, if any
    pub fn to_mutation(&self, list: &SectionList) -> Option<Mutation> {
        let target = self.target.as_deref()?;
        if target == self.source {
            return None;
        }

        list.index_of(&self.source)?;
        let to_index = list.index_of(target)?;

        Some(Mutation::MoveSection {
            section_id: self.source.clone(),
            to_index,
        })
    }
}

/// Tracks one drag from pick-up to drop
#[derive(Debug, Default)]
pub struct DragGesture {
    active: Option<SectionId>,
    over: Option<SectionId>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a section
    pub fn start(&mut self, id: impl Into<SectionId>) {
        self.active = Some(id.into());
        self.over = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn over(&self) -> Option<&str> {
        self.over.as_deref()
    }

    /// Pointer moved: recompute the collision target from the dragged rect
    pub fn update(&mut self, active_rect: &Rect, droppables: &[Droppable]) -> Option<&str> {
        if self.active.is_none() {
            return None;
        }
        self.over = closest_center(active_rect, droppables).cloned();
        self.over.as_deref()
    }

    /// Pointer left the section list
    pub fn leave(&mut self) {
        self.over = None;
    }

    /// Abort without dropping
    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }

    /// Drop. Returns `None` if nothing was being dragged.
    pub fn end(&mut self) -> Option<DragEnd> {
        let source = self.active.take()?;
        let target = self.over.take();
        tracing::debug!(source = %source, drop_target = ?target, "Drag ended");
        Some(DragEnd { source, target })
    }
}
