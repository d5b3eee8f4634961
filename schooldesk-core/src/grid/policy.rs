//! Per-role data-visibility rules.
//!
//! Each actor kind computes the filters it forces onto every grid request.
//! The reconciler applies them on top of whatever the UI selected.

use std::collections::HashSet;

use schooldesk_model::{ActorKind, FilterSet, Profile, filter_keys as keys};
use serde_json::Value;

/// Filters an actor forces onto a request, and UI keys it strips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enforcement {
    pub set: FilterSet,
    pub remove: Vec<&'static str>,
}

impl Enforcement {
    /// Apply to `filters`: strip first, then overwrite.
    pub fn apply_to(&self, filters: &mut FilterSet) {
        for key in &self.remove {
            filters.remove(key);
        }
        filters.overlay(&self.set);
    }

    fn force(&mut self, key: &'static str, value: Option<i64>) {
        match value {
            Some(value) => self.set.insert(key, value),
            None => self.remove.push(key),
        }
    }
}

/// Role strategy derived from the actor profile.
#[derive(Debug, Clone, Copy)]
pub enum ActorPolicy<'a> {
    Admin,
    Teacher(&'a Profile),
    Student(&'a Profile),
}

impl<'a> ActorPolicy<'a> {
    pub fn for_profile(profile: &'a Profile) -> Self {
        match profile.kind {
            ActorKind::Admin => ActorPolicy::Admin,
            ActorKind::Teacher => ActorPolicy::Teacher(profile),
            ActorKind::Student => ActorPolicy::Student(profile),
        }
    }

    /// Admin landing pages load unfiltered the first time.
    pub fn suppresses_first_load(&self) -> bool {
        matches!(self, ActorPolicy::Admin)
    }

    /// Filters this actor forces given what the UI currently selects.
    pub fn enforced_filters(&self, ui: &FilterSet) -> Enforcement {
        match self {
            ActorPolicy::Admin => Enforcement::default(),
            ActorPolicy::Student(profile) => student_scope(profile),
            ActorPolicy::Teacher(profile) => teacher_scope(profile, ui),
        }
    }
}

fn student_scope(profile: &Profile) -> Enforcement {
    let mut enforcement = Enforcement::default();
    enforcement.force(keys::SCHOOL_ID, profile.school_id);
    enforcement.force(keys::CLASS_ID, profile.class_id);
    enforcement.force(keys::DIVISION_ID, profile.division_id);
    enforcement
}

fn teacher_scope(profile: &Profile, ui: &FilterSet) -> Enforcement {
    let mut enforcement = Enforcement::default();
    enforcement.force(keys::SCHOOL_ID, profile.school_id);

    // A specific class or division selection replaces the allocation lists.
    if ui.is_selected(keys::CLASS_ID) || ui.is_selected(keys::DIVISION_ID) {
        enforcement.remove.push(keys::CLASS_LIST);
        enforcement.remove.push(keys::DIVISION_LIST);
        return enforcement;
    }

    let classes = dedup(profile.allocations.iter().map(|a| a.class_id));
    let divisions =
        dedup(profile.allocations.iter().filter_map(|a| a.division_id));
    enforcement.set.insert(keys::CLASS_LIST, to_list(classes));
    enforcement.set.insert(keys::DIVISION_LIST, to_list(divisions));
    enforcement
}

/// First-seen order, duplicates dropped.
fn dedup(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

fn to_list(ids: Vec<i64>) -> Value {
    Value::Array(ids.into_iter().map(Value::from).collect())
}
