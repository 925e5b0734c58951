#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Aggregation of equipment and temporary stat modifiers.
//!
//! Equipped items are folded into one [`EffectiveStats`] snapshot whenever
//! the loadout changes; temporary effects are tracked by handle and layered
//! over the persisted totals at read time. Percent bonuses of the same kind
//! always sum, never compound.

use rampart_core::{EffectiveStats, Event, ModifierHandle, StatKind, StatModifier};

/// Accumulates equipped and temporary stat modifiers into effective stats.
#[derive(Debug, Default)]
pub struct StatAggregator {
    equipped: EffectiveStats,
    temporaries: Vec<(ModifierHandle, StatModifier)>,
    next_handle: u64,
}

fn fold(stats: &mut EffectiveStats, modifier: &StatModifier) {
    match modifier.kind {
        StatKind::GlobalAttackDamage => stats.attack_damage_pct += modifier.value,
        StatKind::GlobalAttackSpeed => stats.attack_speed_pct += modifier.value,
        StatKind::GlobalAttackRange => stats.attack_range_pct += modifier.value,
        StatKind::GlobalSkillDamage => stats.skill_damage_pct += modifier.value,
        StatKind::TowerDamage(class) => stats.class_damage_pct[class.index()] += modifier.value,
        StatKind::GoldPerSecond => stats.gold_per_second += modifier.value,
        StatKind::StartGold => stats.start_gold += modifier.value,
        StatKind::MaxHp => stats.max_hp += modifier.value,
    }
}

impl StatAggregator {
    /// Creates an aggregator holding only baseline stats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            equipped: EffectiveStats::baseline(),
            temporaries: Vec::new(),
            next_handle: 0,
        }
    }

    /// Replaces the equipment contribution with a fresh fold over the
    /// provided modifiers.
    ///
    /// Always starts from the baseline constants so repeated recomputes
    /// over the same loadout are idempotent. Emits [`Event::StatsRecomputed`]
    /// with the new effective snapshot.
    pub fn recompute(&mut self, equipped: &[StatModifier], out_events: &mut Vec<Event>) {
        let mut stats = EffectiveStats::baseline();
        for modifier in equipped {
            fold(&mut stats, modifier);
        }
        self.equipped = stats;
        out_events.push(Event::StatsRecomputed {
            stats: self.effective(),
        });
    }

    /// Registers a temporary modifier and returns the handle that removes
    /// exactly this copy later. Emits [`Event::StatsRecomputed`].
    pub fn add_temporary(
        &mut self,
        modifier: StatModifier,
        out_events: &mut Vec<Event>,
    ) -> ModifierHandle {
        let handle = ModifierHandle::new(self.next_handle);
        self.next_handle += 1;
        self.temporaries.push((handle, modifier));
        out_events.push(Event::StatsRecomputed {
            stats: self.effective(),
        });
        handle
    }

    /// Removes the temporary modifier registered under `handle`.
    ///
    /// Returns whether a modifier was removed; unknown handles leave the
    /// aggregate untouched and emit nothing.
    pub fn remove_temporary(&mut self, handle: ModifierHandle, out_events: &mut Vec<Event>) -> bool {
        let before = self.temporaries.len();
        self.temporaries.retain(|(candidate, _)| *candidate != handle);
        if self.temporaries.len() == before {
            return false;
        }
        out_events.push(Event::StatsRecomputed {
            stats: self.effective(),
        });
        true
    }

    /// Current effective stats: the equipped fold with every live
    /// temporary modifier layered on top.
    #[must_use]
    pub fn effective(&self) -> EffectiveStats {
        let mut stats = self.equipped;
        for (_, modifier) in &self.temporaries {
            fold(&mut stats, modifier);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::StatAggregator;
    use rampart_core::{EffectiveStats, Event, StatKind, StatModifier, TowerClass};

    fn modifier(kind: StatKind, value: f32) -> StatModifier {
        StatModifier { kind, value }
    }

    #[test]
    fn recompute_is_idempotent_over_the_same_loadout() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        let loadout = [
            modifier(StatKind::GlobalAttackDamage, 10.0),
            modifier(StatKind::MaxHp, 5.0),
        ];
        aggregator.recompute(&loadout, &mut events);
        let first = aggregator.effective();
        aggregator.recompute(&loadout, &mut events);
        assert_eq!(aggregator.effective(), first);
    }

    #[test]
    fn percent_bonuses_sum_instead_of_compounding() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        aggregator.recompute(
            &[
                modifier(StatKind::GlobalAttackDamage, 10.0),
                modifier(StatKind::GlobalAttackDamage, 10.0),
            ],
            &mut events,
        );
        assert!((aggregator.effective().attack_damage_pct - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn class_bonuses_land_in_their_own_bucket() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        aggregator.recompute(
            &[modifier(StatKind::TowerDamage(TowerClass::Laser), 30.0)],
            &mut events,
        );
        let stats = aggregator.effective();
        assert!((stats.class_damage_pct(TowerClass::Laser) - 30.0).abs() < f32::EPSILON);
        assert_eq!(stats.class_damage_pct(TowerClass::Arrow), 0.0);
        assert_eq!(stats.attack_damage_pct, 0.0);
    }

    #[test]
    fn flat_kinds_add_to_their_baselines() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        aggregator.recompute(
            &[
                modifier(StatKind::StartGold, 100.0),
                modifier(StatKind::GoldPerSecond, 2.5),
            ],
            &mut events,
        );
        let baseline = EffectiveStats::baseline();
        let stats = aggregator.effective();
        assert!((stats.start_gold - (baseline.start_gold + 100.0)).abs() < f32::EPSILON);
        assert!((stats.gold_per_second - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn removing_a_duplicate_temporary_restores_prior_state_exactly() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        let boost = modifier(StatKind::GlobalAttackSpeed, 15.0);
        let first = aggregator.add_temporary(boost, &mut events);
        let before_second = aggregator.effective();
        let second = aggregator.add_temporary(boost, &mut events);
        assert_ne!(first, second);
        assert!(aggregator.remove_temporary(second, &mut events));
        assert_eq!(aggregator.effective(), before_second);
    }

    #[test]
    fn unknown_handle_removal_is_inert() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        let handle = aggregator.add_temporary(modifier(StatKind::MaxHp, 3.0), &mut events);
        assert!(aggregator.remove_temporary(handle, &mut events));
        events.clear();
        assert!(!aggregator.remove_temporary(handle, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn every_mutation_announces_the_new_snapshot() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        aggregator.recompute(&[modifier(StatKind::GlobalAttackRange, 5.0)], &mut events);
        let handle = aggregator.add_temporary(modifier(StatKind::GlobalAttackRange, 5.0), &mut events);
        assert!(aggregator.remove_temporary(handle, &mut events));
        assert_eq!(events.len(), 3);
        for event in &events {
            assert!(matches!(event, Event::StatsRecomputed { .. }));
        }
        match events.last() {
            Some(Event::StatsRecomputed { stats }) => {
                assert!((stats.attack_range_pct - 5.0).abs() < f32::EPSILON);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn temporaries_layer_over_equipment_without_mutating_it() {
        let mut aggregator = StatAggregator::new();
        let mut events = Vec::new();
        aggregator.recompute(&[modifier(StatKind::GlobalAttackDamage, 10.0)], &mut events);
        let handle =
            aggregator.add_temporary(modifier(StatKind::GlobalAttackDamage, 25.0), &mut events);
        assert!((aggregator.effective().attack_damage_pct - 35.0).abs() < f32::EPSILON);
        aggregator.recompute(&[modifier(StatKind::GlobalAttackDamage, 10.0)], &mut events);
        assert!((aggregator.effective().attack_damage_pct - 35.0).abs() < f32::EPSILON);
        assert!(aggregator.remove_temporary(handle, &mut events));
        assert!((aggregator.effective().attack_damage_pct - 10.0).abs() < f32::EPSILON);
    }
}
