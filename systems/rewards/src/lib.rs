#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted wave-clear reward selection.
//!
//! Offers are drawn without replacement from a filtered pool, a fixed skip
//! option is appended outside the weighted draw, and applying a chosen
//! offer produces plain world commands. The pool itself is never mutated;
//! drawn offers are resolved copies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rampart_core::{Command, EquipmentId, Event, PerkGrant, Rarity, TowerClass, UpgradeLane};

/// Effect a reward definition carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RewardKind {
    /// Restores player hit points.
    Heal,
    /// Grants gold scaled by the cleared wave.
    Gold,
    /// Grants banked skill points.
    SkillPoints,
    /// Grants one physical-lane upgrade level.
    PhysicalUpgrade,
    /// Grants one magical-lane upgrade level.
    MagicalUpgrade,
    /// Adds to the run's bonus score.
    Score,
    /// Drops an equipment item; duplicates convert to currency.
    Equipment {
        /// Item identity used for the duplicate check.
        id: EquipmentId,
        /// Rarity governing the duplicate conversion amount.
        rarity: Rarity,
    },
    /// Meta-currency grant, produced by duplicate equipment conversion.
    Currency,
    /// Declines the reward for a small score bonus.
    Skip,
    /// Enables a run-long perk.
    Perk(PerkGrant),
}

/// One entry of the reward pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardDef {
    /// Stable index identifying the effect across draws.
    pub index: u32,
    /// Effect granted when chosen.
    pub kind: RewardKind,
    /// Draw weight; higher is more likely.
    pub weight: u32,
    /// Base magnitude of the effect.
    pub value: i64,
    /// Optional `[min, max)` multiplier rolled on top of the base value.
    pub roll: Option<(i64, i64)>,
}

/// A resolved offer presented to the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardOffer {
    /// Index of the definition the offer was drawn from.
    pub index: u32,
    /// Resolved effect, after duplicate-equipment conversion.
    pub kind: RewardKind,
    /// Resolved magnitude.
    pub value: i64,
}

/// Player-facing state the draw filters against.
#[derive(Clone, Copy, Debug)]
pub struct DrawContext<'a> {
    /// Heal offers are withheld while the player is at full hit points.
    pub player_at_full_hp: bool,
    /// Skill-point offers are withheld under the specialist perk.
    pub specialist: bool,
    /// Zero-based index of the wave that was just cleared.
    pub wave_index: u32,
    /// Equipment the player already owns, for the duplicate check.
    pub owned_equipment: &'a [EquipmentId],
}

/// Gold granted by the wave-scaled gold reward.
///
/// Linear growth with a steep quadratic ramp once the cleared wave index
/// reaches 20.
#[must_use]
pub fn wave_gold_reward(wave_index: u32) -> i64 {
    let wave = i64::from(wave_index);
    let mut gold = 200 + 50 * wave;
    if wave >= 20 {
        let effective = wave - 20 + 1;
        gold += 200 * effective * effective;
    }
    gold
}

fn select_weighted(pool: &[RewardDef], draw: u32) -> Option<usize> {
    let mut running = 0;
    for (position, def) in pool.iter().enumerate() {
        running += def.weight;
        if draw <= running {
            return Some(position);
        }
    }
    None
}

/// Draws reward offers and applies chosen ones.
#[derive(Debug)]
pub struct RewardSelector {
    rng: ChaCha8Rng,
}

impl RewardSelector {
    /// Creates a selector seeded for deterministic draws.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws up to `count` weighted offers without replacement, then
    /// appends the fixed skip option outside the draw.
    ///
    /// The pool is filtered first: heal offers vanish at full HP and
    /// skill-point offers vanish under the specialist perk. An equipment
    /// offer duplicating an owned item is converted to a currency grant
    /// scaled by its rarity.
    #[must_use]
    pub fn draw_offers(
        &mut self,
        pool: &[RewardDef],
        skip: Option<&RewardDef>,
        count: usize,
        context: &DrawContext<'_>,
    ) -> Vec<RewardOffer> {
        let mut available: Vec<RewardDef> = pool
            .iter()
            .filter(|def| {
                if context.player_at_full_hp && def.kind == RewardKind::Heal {
                    return false;
                }
                if context.specialist && def.kind == RewardKind::SkillPoints {
                    return false;
                }
                true
            })
            .copied()
            .collect();

        let mut offers = Vec::with_capacity(count + 1);
        for _ in 0..count {
            let total: u32 = available.iter().map(|def| def.weight).sum();
            if total == 0 {
                break;
            }
            let draw = self.rng.gen_range(1..=total);
            let Some(position) = select_weighted(&available, draw) else {
                break;
            };
            let chosen = available.remove(position);
            offers.push(self.resolve(&chosen, context));
        }

        if let Some(skip) = skip {
            offers.push(RewardOffer {
                index: skip.index,
                kind: skip.kind,
                value: skip.value,
            });
        }
        offers
    }

    fn resolve(&mut self, def: &RewardDef, context: &DrawContext<'_>) -> RewardOffer {
        let mut value = match def.kind {
            RewardKind::Gold => wave_gold_reward(context.wave_index),
            _ => def.value,
        };
        if def.kind != RewardKind::Gold {
            if let Some((min, max)) = def.roll {
                if max > min {
                    value *= self.rng.gen_range(min..max);
                }
            }
        }
        if let RewardKind::Equipment { id, rarity } = def.kind {
            if context.owned_equipment.contains(&id) {
                return RewardOffer {
                    index: def.index,
                    kind: RewardKind::Currency,
                    value: rarity.duplicate_currency() as i64,
                };
            }
        }
        RewardOffer {
            index: def.index,
            kind: def.kind,
            value,
        }
    }

    /// Picks the class surrendered by a freshly drawn sacrifice perk.
    #[must_use]
    pub fn roll_sacrifice_class(&mut self) -> TowerClass {
        TowerClass::ALL[self.rng.gen_range(0..TowerClass::ALL.len())]
    }
}

/// Translates a chosen offer into world commands and announces the choice.
///
/// Score and skip offers carry no world effect; equipment acquisition is
/// handled by the loadout layer, so only its duplicate-conversion currency
/// reaches the world.
pub fn apply_offer(offer: &RewardOffer, out_commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
    match offer.kind {
        RewardKind::Heal => out_commands.push(Command::HealPlayer {
            amount: offer.value as f32,
        }),
        RewardKind::Gold => out_commands.push(Command::GrantGold {
            amount: offer.value,
        }),
        RewardKind::SkillPoints => out_commands.push(Command::GrantSkillPoints {
            amount: offer.value as f32,
        }),
        RewardKind::PhysicalUpgrade => out_commands.push(Command::GrantUpgrade {
            lane: UpgradeLane::Physical,
        }),
        RewardKind::MagicalUpgrade => out_commands.push(Command::GrantUpgrade {
            lane: UpgradeLane::Magical,
        }),
        RewardKind::Currency => out_commands.push(Command::GrantCurrency {
            amount: offer.value.max(0) as u64,
        }),
        RewardKind::Perk(perk) => out_commands.push(Command::EnablePerk { perk }),
        RewardKind::Score | RewardKind::Skip | RewardKind::Equipment { .. } => {}
    }
    out_events.push(Event::RewardChosen { index: offer.index });
}

/// The standard wave-clear pool.
#[must_use]
pub fn standard_pool() -> Vec<RewardDef> {
    vec![
        RewardDef {
            index: 0,
            kind: RewardKind::Heal,
            weight: 20,
            value: 2,
            roll: Some((1, 4)),
        },
        RewardDef {
            index: 1,
            kind: RewardKind::Gold,
            weight: 25,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 2,
            kind: RewardKind::SkillPoints,
            weight: 20,
            value: 20,
            roll: Some((1, 3)),
        },
        RewardDef {
            index: 3,
            kind: RewardKind::PhysicalUpgrade,
            weight: 12,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 4,
            kind: RewardKind::MagicalUpgrade,
            weight: 12,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 6,
            kind: RewardKind::Score,
            weight: 5,
            value: 1_000,
            roll: None,
        },
        RewardDef {
            index: 7,
            kind: RewardKind::Equipment {
                id: EquipmentId::new(0),
                rarity: Rarity::Common,
            },
            weight: 6,
            value: 0,
            roll: None,
        },
    ]
}

/// The fixed skip option appended outside the weighted draw.
#[must_use]
pub fn skip_option() -> RewardDef {
    RewardDef {
        index: 8,
        kind: RewardKind::Skip,
        weight: 0,
        value: 500,
        roll: None,
    }
}

/// The perk pool offered after the first cleared wave.
#[must_use]
pub fn first_wave_perk_pool(sacrifice_class: TowerClass) -> Vec<RewardDef> {
    vec![
        RewardDef {
            index: 202,
            kind: RewardKind::Perk(PerkGrant::Executioner),
            weight: 10,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 203,
            kind: RewardKind::Perk(PerkGrant::Sacrifice {
                class: sacrifice_class,
            }),
            weight: 10,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 204,
            kind: RewardKind::Perk(PerkGrant::Interest),
            weight: 10,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 206,
            kind: RewardKind::Perk(PerkGrant::HazardPay),
            weight: 10,
            value: 0,
            roll: None,
        },
        RewardDef {
            index: 209,
            kind: RewardKind::Perk(PerkGrant::Specialist),
            weight: 10,
            value: 0,
            roll: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{
        apply_offer, first_wave_perk_pool, select_weighted, skip_option, standard_pool,
        wave_gold_reward, DrawContext, RewardDef, RewardKind, RewardOffer, RewardSelector,
    };
    use rampart_core::{Command, EquipmentId, Event, Rarity};

    fn context(full_hp: bool, specialist: bool) -> DrawContext<'static> {
        DrawContext {
            player_at_full_hp: full_hp,
            specialist,
            wave_index: 0,
            owned_equipment: &[],
        }
    }

    #[test]
    fn cumulative_walk_picks_the_first_entry_reaching_the_draw() {
        let pool: Vec<RewardDef> = [1, 2, 3]
            .iter()
            .enumerate()
            .map(|(index, weight)| RewardDef {
                index: index as u32,
                kind: RewardKind::Score,
                weight: *weight,
                value: 0,
                roll: None,
            })
            .collect();
        assert_eq!(select_weighted(&pool, 1), Some(0));
        assert_eq!(select_weighted(&pool, 2), Some(1));
        assert_eq!(select_weighted(&pool, 3), Some(1));
        assert_eq!(select_weighted(&pool, 4), Some(2));
        assert_eq!(select_weighted(&pool, 6), Some(2));
        assert_eq!(select_weighted(&pool, 7), None);
    }

    #[test]
    fn heal_is_withheld_at_full_hp() {
        let mut selector = RewardSelector::new(1);
        let pool = standard_pool();
        for _ in 0..50 {
            let offers = selector.draw_offers(&pool, None, 3, &context(true, false));
            assert!(offers.iter().all(|offer| offer.kind != RewardKind::Heal));
        }
    }

    #[test]
    fn skill_points_are_withheld_under_specialist() {
        let mut selector = RewardSelector::new(2);
        let pool = standard_pool();
        for _ in 0..50 {
            let offers = selector.draw_offers(&pool, None, 3, &context(false, true));
            assert!(offers
                .iter()
                .all(|offer| offer.kind != RewardKind::SkillPoints));
        }
    }

    #[test]
    fn draws_never_repeat_an_index_within_one_panel() {
        let mut selector = RewardSelector::new(3);
        let pool = standard_pool();
        for _ in 0..50 {
            let offers = selector.draw_offers(&pool, None, 4, &context(false, false));
            let mut indices: Vec<u32> = offers.iter().map(|offer| offer.index).collect();
            indices.sort_unstable();
            indices.dedup();
            assert_eq!(indices.len(), offers.len());
        }
    }

    #[test]
    fn skip_is_always_appended_last_outside_the_draw() {
        let mut selector = RewardSelector::new(4);
        let pool = standard_pool();
        let skip = skip_option();
        let offers = selector.draw_offers(&pool, Some(&skip), 2, &context(false, false));
        assert_eq!(offers.len(), 3);
        assert_eq!(offers.last().map(|offer| offer.kind), Some(RewardKind::Skip));
    }

    #[test]
    fn drawing_drains_but_never_mutates_the_pool() {
        let mut selector = RewardSelector::new(5);
        let pool = standard_pool();
        let before = pool.clone();
        let offers = selector.draw_offers(&pool, None, 100, &context(false, false));
        assert_eq!(pool, before);
        assert_eq!(offers.len(), before.len());
    }

    #[test]
    fn duplicate_equipment_converts_to_rarity_currency() {
        let mut selector = RewardSelector::new(6);
        let owned = [EquipmentId::new(0)];
        let duplicate_context = DrawContext {
            player_at_full_hp: false,
            specialist: false,
            wave_index: 0,
            owned_equipment: &owned,
        };
        let pool = vec![RewardDef {
            index: 7,
            kind: RewardKind::Equipment {
                id: EquipmentId::new(0),
                rarity: Rarity::Rare,
            },
            weight: 1,
            value: 0,
            roll: None,
        }];
        let offers = selector.draw_offers(&pool, None, 1, &duplicate_context);
        assert_eq!(offers[0].kind, RewardKind::Currency);
        assert_eq!(offers[0].value, 50_000);
    }

    #[test]
    fn gold_reward_scales_with_the_cleared_wave() {
        assert_eq!(wave_gold_reward(0), 200);
        assert_eq!(wave_gold_reward(19), 1_150);
        assert_eq!(wave_gold_reward(20), 1_400);
        assert_eq!(wave_gold_reward(21), 2_050);
    }

    #[test]
    fn applying_offers_yields_the_matching_commands() {
        let mut commands = Vec::new();
        let mut events = Vec::new();
        apply_offer(
            &RewardOffer {
                index: 0,
                kind: RewardKind::Heal,
                value: 4,
            },
            &mut commands,
            &mut events,
        );
        apply_offer(
            &RewardOffer {
                index: 8,
                kind: RewardKind::Skip,
                value: 500,
            },
            &mut commands,
            &mut events,
        );
        assert_eq!(commands, vec![Command::HealPlayer { amount: 4.0 }]);
        assert_eq!(
            events,
            vec![
                Event::RewardChosen { index: 0 },
                Event::RewardChosen { index: 8 },
            ]
        );
    }

    #[test]
    fn perk_pool_offers_apply_as_perk_enables() {
        let mut selector = RewardSelector::new(7);
        let class = selector.roll_sacrifice_class();
        let pool = first_wave_perk_pool(class);
        let offers = selector.draw_offers(&pool, None, 2, &context(false, false));
        assert_eq!(offers.len(), 2);
        let mut commands = Vec::new();
        let mut events = Vec::new();
        apply_offer(&offers[0], &mut commands, &mut events);
        assert!(matches!(commands[0], Command::EnablePerk { .. }));
    }

    #[test]
    fn identical_seeds_draw_identical_panels() {
        let pool = standard_pool();
        let draw = |seed: u64| {
            let mut selector = RewardSelector::new(seed);
            selector.draw_offers(&pool, Some(&skip_option()), 3, &context(false, false))
        };
        assert_eq!(draw(11), draw(11));
    }
}
