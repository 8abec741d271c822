use std::collections::HashMap;

use crate::item::ItemKind;
use crate::matcher::CLONE_SUFFIX;

/// Stack size and weight of an item type as first seen in this process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedOriginal {
    stack_size: i32,
    weight: f32,
}

impl TrackedOriginal {
    pub fn stack_size(&self) -> i32 {
        self.stack_size
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_stackable(&self) -> bool {
        self.stack_size > 1
    }

    /// `max(1, round(original * multiplier))`, rounding halves to even.
    pub fn scaled_stack_size(&self, multiplier: f32) -> i32 {
        let scaled = (self.stack_size as f32 * multiplier).round_ties_even();
        // `as` saturates, so huge multipliers pin at i32::MAX.
        (scaled as i32).max(1)
    }

    pub fn scaled_weight(&self, multiplier: f32) -> f32 {
        self.weight * multiplier
    }
}

/// What [`OriginalTracker::apply`] changed on an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub stack_updated: bool,
    pub weight_updated: bool,
    pub non_stackable: bool,
}

/// Remembers the original values of every item type touched by a pass.
///
/// Entries are created on first sight and never change or go away, so every
/// pass scales from the same baseline no matter how often it runs.
#[derive(Debug, Default)]
pub struct OriginalTracker {
    originals: HashMap<String, TrackedOriginal>,
    /// Items with no shared name, keyed by prefab name. Kept apart so a
    /// prefab can never seed the baseline of a shared name.
    unnamed: HashMap<String, TrackedOriginal>,
}

enum Identity {
    Shared(String),
    Prefab(String),
}

impl OriginalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.originals.len() + self.unnamed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty() && self.unnamed.is_empty()
    }

    pub fn original(&self, shared_name: &str) -> Option<&TrackedOriginal> {
        self.originals.get(shared_name)
    }

    /// Baseline of an item that has no shared name.
    pub fn original_by_prefab(&self, prefab_name: &str) -> Option<&TrackedOriginal> {
        self.unnamed.get(prefab_name)
    }

    /// Looks up the baseline for `item`, recording its current values if this
    /// is the first time the type is seen.
    pub fn get_or_track<T: ItemKind + ?Sized>(&mut self, item: &T) -> Option<TrackedOriginal> {
        let (map, key) = match identity_of(item)? {
            Identity::Shared(name) => (&mut self.originals, name),
            Identity::Prefab(name) => (&mut self.unnamed, name),
        };
        let original = map
            .entry(key)
            .or_insert_with(|| TrackedOriginal {
                stack_size: item.stack_size(),
                weight: item.weight(),
            });
        Some(*original)
    }

    /// Rescales `item` from its tracked original.
    ///
    /// Multipliers must already be clamped to `[0, +inf)`.
    pub fn apply<T: ItemKind + ?Sized>(
        &mut self,
        item: &mut T,
        stack_multiplier: Option<f32>,
        weight_multiplier: Option<f32>,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        let Some(original) = self.get_or_track(item) else {
            return outcome;
        };

        if let Some(multiplier) = stack_multiplier {
            if original.is_stackable() {
                item.set_stack_size(original.scaled_stack_size(multiplier));
                outcome.stack_updated = true;
            } else {
                outcome.non_stackable = true;
            }
        }

        if let Some(multiplier) = weight_multiplier {
            item.set_weight(original.scaled_weight(multiplier));
            outcome.weight_updated = true;
        }

        outcome
    }
}

/// Items are keyed by shared name. Items without one fall back to their
/// prefab name minus the clone suffix.
fn identity_of<T: ItemKind + ?Sized>(item: &T) -> Option<Identity> {
    if let Some(shared) = item.shared_name() {
        return Some(Identity::Shared(shared.to_string()));
    }
    let prefab = item.prefab_name()?.replace(CLONE_SUFFIX, "");
    let prefab = prefab.trim();
    (!prefab.is_empty()).then(|| Identity::Prefab(prefab.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemCategory, ItemRecord};

    fn pork() -> ItemRecord {
        ItemRecord::new(ItemCategory::Consumable, "rk_pork", 5, 2.0)
    }

    #[test]
    fn scales_from_original() {
        let mut tracker = OriginalTracker::new();
        let mut item = pork();
        tracker.apply(&mut item, Some(10.0), Some(0.1));
        assert_eq!(item.stack_size, 50);
        assert!((item.weight - 0.2).abs() < 1e-6);
    }

    #[test]
    fn reapplying_does_not_compound() {
        let mut tracker = OriginalTracker::new();
        let mut item = pork();
        tracker.apply(&mut item, Some(10.0), Some(0.1));
        let once = item.clone();
        tracker.apply(&mut item, Some(10.0), Some(0.1));
        assert_eq!(item, once);
    }

    #[test]
    fn later_multiplier_starts_from_baseline() {
        let mut tracker = OriginalTracker::new();
        let mut item = pork();
        tracker.apply(&mut item, Some(10.0), None);
        tracker.apply(&mut item, Some(2.0), None);
        assert_eq!(item.stack_size, 10);
        assert_eq!(tracker.original("rk_pork").unwrap().stack_size(), 5);
    }

    #[test]
    fn stack_size_never_drops_below_one() {
        let mut tracker = OriginalTracker::new();
        let mut item = ItemRecord::new(ItemCategory::Material, "$item_wood", 50, 2.0);
        tracker.apply(&mut item, Some(0.0), None);
        assert_eq!(item.stack_size, 1);
        tracker.apply(&mut item, Some(0.019), None);
        assert_eq!(item.stack_size, 1);
    }

    #[test]
    fn rounds_half_to_even() {
        let original = TrackedOriginal {
            stack_size: 5,
            weight: 1.0,
        };
        assert_eq!(original.scaled_stack_size(0.5), 2);
        assert_eq!(original.scaled_stack_size(1.5), 8);
        assert_eq!(original.scaled_stack_size(f32::MAX), i32::MAX);
    }

    #[test]
    fn ties_round_on_the_f32_product() {
        let mut tracker = OriginalTracker::new();
        let mut arrows = ItemRecord::new(ItemCategory::Ammo, "$item_arrow", 25, 0.1);
        tracker.apply(&mut arrows, Some(0.1), None);
        assert_eq!(arrows.stack_size, 2);
    }

    #[test]
    fn prefab_fallback_does_not_share_shared_name_baseline() {
        let mut tracker = OriginalTracker::new();
        let mut unnamed = ItemRecord {
            category: ItemCategory::Consumable,
            shared_name: None,
            prefab_name: Some("rk_pork(Clone)".to_string()),
            stack_size: 99,
            weight: 9.0,
        };
        tracker.apply(&mut unnamed, None, None);

        let mut item = pork();
        tracker.apply(&mut item, Some(10.0), None);
        assert_eq!(item.stack_size, 50);
        assert_eq!(tracker.original("rk_pork").unwrap().stack_size(), 5);
        assert_eq!(tracker.original_by_prefab("rk_pork").unwrap().stack_size(), 99);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn non_stackable_items_keep_stack_size() {
        let mut tracker = OriginalTracker::new();
        let mut sword = ItemRecord::new(ItemCategory::OneHandedWeapon, "$item_sword_iron", 1, 1.5);
        let outcome = tracker.apply(&mut sword, Some(10.0), Some(0.5));
        assert_eq!(sword.stack_size, 1);
        assert!(outcome.non_stackable);
        assert!(!outcome.stack_updated);
        assert!((sword.weight - 0.75).abs() < 1e-6);
    }

    #[test]
    fn weight_has_no_floor() {
        let mut tracker = OriginalTracker::new();
        let mut item = pork();
        tracker.apply(&mut item, None, Some(0.0));
        assert_eq!(item.weight, 0.0);
        assert_eq!(item.stack_size, 5);
    }

    #[test]
    fn first_sight_freezes_the_baseline() {
        let mut tracker = OriginalTracker::new();
        let mut item = pork();
        tracker.apply(&mut item, None, None);
        item.stack_size = 99;
        tracker.apply(&mut item, Some(2.0), None);
        assert_eq!(item.stack_size, 10);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn unnamed_items_fall_back_to_prefab_identity() {
        let mut tracker = OriginalTracker::new();
        let mut item = ItemRecord {
            category: ItemCategory::Misc,
            shared_name: None,
            prefab_name: Some("Flint(Clone)".to_string()),
            stack_size: 20,
            weight: 1.0,
        };
        tracker.apply(&mut item, Some(2.0), None);
        assert_eq!(item.stack_size, 40);
        assert!(tracker.original_by_prefab("Flint").is_some());
        assert!(tracker.original("Flint").is_none());

        let mut ghost = ItemRecord {
            shared_name: None,
            prefab_name: None,
            ..item.clone()
        };
        let outcome = tracker.apply(&mut ghost, Some(2.0), Some(2.0));
        assert_eq!(outcome, ApplyOutcome::default());
        assert_eq!(tracker.len(), 1);
    }
}
