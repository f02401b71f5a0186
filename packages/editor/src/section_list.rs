//! # Section List
//!
//! In-memory ordered sections of one page during an editing session.
//!
//! The list order is the source of truth until it is committed. Positions are
//! never edited directly: after every operation each section's `position` is
//! rewritten to its array index, so the positions of a list are always
//! exactly `0..len`.

use pagecraft_common::{PageId, Section, SectionId, SectionPatch};

#[derive(Debug, Clone, PartialEq)]
pub struct SectionList {
    page_id: PageId,
    sections: Vec<Section>,
}

impl SectionList {
    /// Create an empty list for a page
    pub fn new(page_id: impl Into<PageId>) -> Self {
        Self {
            page_id: page_id.into(),
            sections: Vec::new(),
        }
    }

    /// Build a list from stored sections, ordered by their stored position.
    ///
    /// Stored positions may contain gaps (after a delete that was not followed
    /// by a reorder); they are renumbered here.
    pub fn from_stored(page_id: impl Into<PageId>, mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.position);
        let mut list = Self {
            page_id: page_id.into(),
            sections,
        };
        list.reindex();
        list
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Section ids in list order
    pub fn ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    /// Insert a section. `index` is clamped to `0..=len`; returns the index used.
    pub fn insert_at(&mut self, index: i64, section: Section) -> usize {
        let index = index.clamp(0, self.sections.len() as i64) as usize;
        self.sections.insert(index, section);
        self.reindex();
        index
    }

    /// Remove a section by id. Absent ids are a no-op.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Section> {
        let index = self.index_of(id)?;
        let removed = self.sections.remove(index);
        self.reindex();
        Some(removed)
    }

    /// Array-move: take the element at `from` out, then insert it at `to`
    /// (an index into the list *after* removal, clamped to the end).
    ///
    /// Returns whether the order changed.
    pub fn move_by_index(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sections.len() {
            return false;
        }
        let to = to.min(self.sections.len() - 1);
        if from == to {
            return false;
        }

        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        self.reindex();
        true
    }

    /// Apply a payload/type patch. Returns false if the id is absent.
    pub fn update(&mut self, id: &str, patch: &SectionPatch) -> bool {
        match self.sections.iter_mut().find(|s| s.id == id) {
            Some(section) => {
                patch.apply_to(section);
                true
            }
            None => false,
        }
    }

    fn reindex(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.position = index as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_common::SectionKind;
    use serde_json::json;

    fn section(id: &str, kind: SectionKind) -> Section {
        Section {
            id: id.to_string(),
            page_id: "home".to_string(),
            kind,
            data: json!({}),
            position: 0,
        }
    }

    fn abc() -> SectionList {
        let mut list = SectionList::new("home");
        list.insert_at(0, section("a", SectionKind::Hero));
        list.insert_at(1, section("b", SectionKind::Banner));
        list.insert_at(2, section("c", SectionKind::Gallery));
        list
    }

    fn positions(list: &SectionList) -> Vec<u32> {
        list.sections().iter().map(|s| s.position).collect()
    }

    #[test]
    fn test_insert_in_middle() {
        let mut list = SectionList::new("home");
        list.insert_at(0, section("a", SectionKind::Hero));
        list.insert_at(1, section("b", SectionKind::Banner));

        let used = list.insert_at(1, section("cta", SectionKind::Cta));

        assert_eq!(used, 1);
        assert_eq!(list.ids(), vec!["a", "cta", "b"]);
        assert_eq!(positions(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut list = abc();
        assert_eq!(list.insert_at(-5, section("x", SectionKind::Cta)), 0);
        assert_eq!(list.insert_at(99, section("y", SectionKind::Cta)), 4);
        assert_eq!(list.ids(), vec!["x", "a", "b", "c", "y"]);
        assert_eq!(positions(&list), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_shifts_down() {
        let mut list = abc();
        let removed = list.remove_by_id("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(list.ids(), vec!["b", "c"]);
        assert_eq!(positions(&list), vec![0, 1]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut list = abc();
        assert!(list.remove_by_id("zzz").is_none());
        assert_eq!(list, abc());
    }

    #[test]
    fn test_move_uses_post_removal_index() {
        let mut list = abc();
        assert!(list.move_by_index(0, 2));
        assert_eq!(list.ids(), vec!["b", "c", "a"]);

        let mut list = abc();
        assert!(list.move_by_index(2, 0));
        assert_eq!(list.ids(), vec!["c", "a", "b"]);
        assert_eq!(positions(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_out_of_range() {
        let mut list = abc();
        assert!(!list.move_by_index(3, 0));
        assert!(list.move_by_index(0, 10));
        assert_eq!(list.ids(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_from_stored_closes_gaps() {
        let mut a = section("a", SectionKind::Hero);
        a.position = 4;
        let mut b = section("b", SectionKind::Banner);
        b.position = 0;
        let mut c = section("c", SectionKind::Gallery);
        c.position = 2;

        let list = SectionList::from_stored("home", vec![a, b, c]);
        assert_eq!(list.ids(), vec!["b", "c", "a"]);
        assert_eq!(positions(&list), vec![0, 1, 2]);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut list = abc();
        assert!(list.update("b", &SectionPatch::data(json!({ "text": "Hi" }))));
        assert_eq!(list.get("b").unwrap().data, json!({ "text": "Hi" }));
        assert_eq!(list.get("b").unwrap().position, 1);
        assert!(!list.update("zzz", &SectionPatch::data(json!({}))));
    }
}
