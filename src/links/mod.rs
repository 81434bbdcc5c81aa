//! Link groups across a score and its excerpts
//!
//! Corresponding elements in parallel copies of a score form a link group.
//! Groups are explicit sets of [`ElementRef`]s rather than back-pointers
//! between elements.

use crate::models::ElementRef;
use std::collections::{BTreeSet, HashMap};

/// Resolves the link group of an element
pub trait LinkResolver {
    /// Every element linked to `element`, including `element` itself
    fn linked_elements_of(&self, element: ElementRef) -> Vec<ElementRef>;
}

#[derive(Clone, Debug, Default)]
pub struct LinkRegistry {
    groups: Vec<BTreeSet<ElementRef>>,
    group_of: HashMap<ElementRef, usize>,
    /// Emptied group slots, reused before the list grows
    free: Vec<usize>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `a` and `b` into the same link group, merging groups if needed
    pub fn link(&mut self, a: ElementRef, b: ElementRef) {
        match (self.group_of.get(&a).copied(), self.group_of.get(&b).copied()) {
            (Some(ga), Some(gb)) if ga == gb => {}
            (Some(ga), Some(gb)) => {
                let moved = std::mem::take(&mut self.groups[gb]);
                for member in &moved {
                    self.group_of.insert(*member, ga);
                }
                self.groups[ga].extend(moved);
                self.free.push(gb);
            }
            (Some(group), None) => self.add_to_group(group, b),
            (None, Some(group)) => self.add_to_group(group, a),
            (None, None) => {
                let group = self.new_group();
                self.add_to_group(group, a);
                self.add_to_group(group, b);
            }
        }
    }

    fn new_group(&mut self) -> usize {
        match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.groups.push(BTreeSet::new());
                self.groups.len() - 1
            }
        }
    }

    fn add_to_group(&mut self, group: usize, element: ElementRef) {
        self.groups[group].insert(element);
        self.group_of.insert(element, group);
    }

    /// Remove `element` from its link group
    pub fn unlink(&mut self, element: ElementRef) {
        if let Some(group) = self.group_of.remove(&element) {
            self.groups[group].remove(&element);
            if self.groups[group].is_empty() {
                self.free.push(group);
            }
        }
    }

    /// Number of non-empty link groups
    pub fn group_count(&self) -> usize {
        self.groups.len() - self.free.len()
    }

    pub fn is_linked(&self, a: ElementRef, b: ElementRef) -> bool {
        match (self.group_of.get(&a), self.group_of.get(&b)) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }
}

impl LinkResolver for LinkRegistry {
    fn linked_elements_of(&self, element: ElementRef) -> Vec<ElementRef> {
        match self.group_of.get(&element) {
            Some(group) => self.groups[*group].iter().copied().collect(),
            None => vec![element],
        }
    }
}
