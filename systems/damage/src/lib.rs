#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure damage resolution for tower strikes.
//!
//! Every function here is a closed-form computation over attacker and
//! defender profiles. Nothing in this crate mutates state or draws random
//! numbers, so strike application stays deterministic and unit-testable in
//! isolation.

use rampart_core::{
    DamageType, EffectiveStats, EnemyTier, PerkState, TowerArchetype, UpgradeCoefficient,
};

/// Armor softening constant in the mitigation denominator.
pub const DEFENSE_COEFFICIENT: f32 = 500.0;
/// Floor of the attack cycle duration in time units.
pub const MIN_ATTACK_CYCLE: f32 = 0.1;
/// Efficiency applied to the summed lane curves of hybrid towers.
pub const HYBRID_UPGRADE_EFFICIENCY: f32 = 0.6;
/// HP fraction at or below which the executioner perk kills outright.
pub const EXECUTE_HP_FRACTION: f32 = 0.10;

/// Attacker-side inputs to one strike, fully resolved against upgrades,
/// buffs, aggregated stats, and perks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerProfile {
    /// Pre-mitigation damage after upgrade, buff, and multiplier folding.
    pub damage: f32,
    /// Physical armor ignored before mitigation.
    pub physic_penetration: f32,
    /// Magical armor ignored before mitigation.
    pub magic_penetration: f32,
    /// Damage school the strike mitigates through.
    pub damage_type: DamageType,
    /// Fraction of the defender's max HP added as true damage.
    pub percent_max_hp: f32,
}

/// Defender-side inputs to one strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderProfile {
    /// Tier of the defender; only the lowest tier can be executed.
    pub tier: EnemyTier,
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Current physical armor, already clamped at zero by the owner.
    pub physic_armor: f32,
    /// Current magical armor, already clamped at zero by the owner.
    pub magic_armor: f32,
}

/// Converts an effective attack-speed stat into a cycle duration.
///
/// Higher speed shortens the cycle; the result never drops below
/// [`MIN_ATTACK_CYCLE`]. Speed zero is the always-on sentinel of
/// continuous towers and simply yields the longest cycle.
#[must_use]
pub fn attack_cycle(effective_speed: f32) -> f32 {
    (50.0 / (effective_speed + 20.0)).max(MIN_ATTACK_CYCLE)
}

/// Attack-speed stat after the global percentage bonus.
#[must_use]
pub fn effective_attack_speed(base_speed: f32, stats: &EffectiveStats) -> f32 {
    base_speed * (1.0 + stats.attack_speed_pct / 100.0)
}

/// Targeting range after the global percentage bonus.
#[must_use]
pub fn effective_range(base_range: f32, stats: &EffectiveStats) -> f32 {
    base_range * (1.0 + stats.attack_range_pct / 100.0)
}

fn lane_curve(linear: f32, quadratic: f32, level: u32) -> f32 {
    let level = level as f32;
    linear * level + quadratic * level * level
}

/// Damage added on top of the archetype base by the tower's upgrade levels.
///
/// Physical and magical towers grow from their own lane only; hybrid
/// towers sum both lane curves scaled by [`HYBRID_UPGRADE_EFFICIENCY`].
#[must_use]
pub fn upgrade_added_damage(
    coefficient: &UpgradeCoefficient,
    damage_type: DamageType,
    physic_level: u32,
    magic_level: u32,
) -> f32 {
    match damage_type {
        DamageType::Physical => {
            lane_curve(coefficient.damage, coefficient.damage_quadratic, physic_level)
        }
        DamageType::Magical => {
            lane_curve(coefficient.damage, coefficient.damage_quadratic, magic_level)
        }
        DamageType::Hybrid => {
            let physic = lane_curve(coefficient.damage, coefficient.damage_quadratic, physic_level);
            let magic = lane_curve(coefficient.damage, coefficient.damage_quadratic, magic_level);
            (physic + magic) * HYBRID_UPGRADE_EFFICIENCY
        }
    }
}

/// Penetration added on top of the archetype base by the tower's upgrade
/// levels, returned as `(physical, magical)`.
///
/// Each lane grows only when the damage type reaches through it; hybrid
/// towers grow both lanes at full efficiency.
#[must_use]
pub fn upgrade_added_penetration(
    coefficient: &UpgradeCoefficient,
    damage_type: DamageType,
    physic_level: u32,
    magic_level: u32,
) -> (f32, f32) {
    let physic = lane_curve(
        coefficient.penetrate,
        coefficient.penetrate_quadratic,
        physic_level,
    );
    let magic = lane_curve(
        coefficient.penetrate,
        coefficient.penetrate_quadratic,
        magic_level,
    );
    match damage_type {
        DamageType::Physical => (physic, 0.0),
        DamageType::Magical => (0.0, magic),
        DamageType::Hybrid => (physic, magic),
    }
}

/// Resolves a tower's archetype, upgrade levels, buff accumulator,
/// aggregated stats, and perks into one attacker profile.
///
/// Multipliers compound across sources but percentages within one source
/// were already summed by the aggregator, so two +10% items yield +20%,
/// never +21%.
#[must_use]
pub fn attacker_profile(
    archetype: &TowerArchetype,
    physic_level: u32,
    magic_level: u32,
    buff_damage: f32,
    stats: &EffectiveStats,
    perks: &PerkState,
) -> AttackerProfile {
    let added = upgrade_added_damage(
        &archetype.coefficient,
        archetype.damage_type,
        physic_level,
        magic_level,
    );
    let (added_physic_pen, added_magic_pen) = upgrade_added_penetration(
        &archetype.coefficient,
        archetype.damage_type,
        physic_level,
        magic_level,
    );

    let base = archetype.damage + added + buff_damage.max(0.0);
    let global = 1.0 + stats.attack_damage_pct / 100.0;
    let class = 1.0 + stats.class_damage_pct(archetype.class) / 100.0;
    let mut damage = base * global * class;
    if perks.sacrifice_active() {
        damage *= 1.0 + perks.sacrifice_bonus;
    }

    AttackerProfile {
        damage,
        physic_penetration: archetype.physic_penetrate + added_physic_pen,
        magic_penetration: archetype.magic_penetrate + added_magic_pen,
        damage_type: archetype.damage_type,
        percent_max_hp: archetype.percent_max_hp_damage,
    }
}

fn reduction(armor: f32, penetration: f32) -> f32 {
    let effective = (armor - penetration).max(0.0);
    effective / (effective + DEFENSE_COEFFICIENT)
}

/// Resolves the final damage one strike deals to a defender.
///
/// The executioner check runs before any arithmetic: with the perk active,
/// a lowest-tier defender at or below [`EXECUTE_HP_FRACTION`] of max HP
/// takes its full max HP. Otherwise mitigation reduces the attacker's
/// damage by `armor / (armor + coefficient)` in the matching lane (hybrid
/// averages both lanes), percent-of-max-HP true damage is added after
/// mitigation, and the result is clamped at zero.
#[must_use]
pub fn resolve(attacker: &AttackerProfile, defender: &DefenderProfile, perks: &PerkState) -> f32 {
    if perks.executioner
        && defender.tier == EnemyTier::Default
        && defender.max_hp > 0.0
        && defender.hp / defender.max_hp <= EXECUTE_HP_FRACTION
    {
        return defender.max_hp;
    }

    let damage_reduction = match attacker.damage_type {
        DamageType::Physical => reduction(defender.physic_armor, attacker.physic_penetration),
        DamageType::Magical => reduction(defender.magic_armor, attacker.magic_penetration),
        DamageType::Hybrid => {
            let physic = reduction(defender.physic_armor, attacker.physic_penetration);
            let magic = reduction(defender.magic_armor, attacker.magic_penetration);
            (physic + magic) / 2.0
        }
    };

    let mut damage = attacker.damage * (1.0 - damage_reduction);
    if attacker.percent_max_hp > 0.0 {
        damage += defender.max_hp * attacker.percent_max_hp;
    }
    damage.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::{
        attack_cycle, attacker_profile, resolve, upgrade_added_damage, upgrade_added_penetration,
        AttackerProfile, DefenderProfile, HYBRID_UPGRADE_EFFICIENCY, MIN_ATTACK_CYCLE,
    };
    use rampart_core::{
        AttackTiming, DamageType, EffectiveStats, EnemyTier, PerkState, TowerArchetype, TowerClass,
        UpgradeCoefficient,
    };

    fn archetype(damage_type: DamageType) -> TowerArchetype {
        TowerArchetype {
            class: TowerClass::Arrow,
            damage: 30.0,
            physic_penetrate: 10.0,
            magic_penetrate: 5.0,
            attack_speed: 30.0,
            range: 4.0,
            cost: 120,
            damage_type,
            multi_target: false,
            timing: AttackTiming::Projectile,
            coefficient: UpgradeCoefficient {
                damage: 2.0,
                damage_quadratic: 0.5,
                penetrate: 1.0,
                penetrate_quadratic: 0.25,
            },
            percent_max_hp_damage: 0.0,
        }
    }

    fn attacker(damage: f32, damage_type: DamageType) -> AttackerProfile {
        AttackerProfile {
            damage,
            physic_penetration: 0.0,
            magic_penetration: 0.0,
            damage_type,
            percent_max_hp: 0.0,
        }
    }

    fn defender(hp: f32, max_hp: f32, physic_armor: f32, magic_armor: f32) -> DefenderProfile {
        DefenderProfile {
            tier: EnemyTier::Default,
            hp,
            max_hp,
            physic_armor,
            magic_armor,
        }
    }

    #[test]
    fn attack_cycle_follows_the_curve() {
        assert!((attack_cycle(0.0) - 2.5).abs() < 1e-6);
        assert!((attack_cycle(30.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn attack_cycle_never_drops_below_floor() {
        assert_eq!(attack_cycle(10_000.0), MIN_ATTACK_CYCLE);
    }

    #[test]
    fn upgrade_damage_uses_the_matching_lane() {
        let coefficient = archetype(DamageType::Physical).coefficient;
        let physical = upgrade_added_damage(&coefficient, DamageType::Physical, 3, 9);
        assert!((physical - (2.0 * 3.0 + 0.5 * 9.0)).abs() < 1e-6);
        let magical = upgrade_added_damage(&coefficient, DamageType::Magical, 3, 9);
        assert!((magical - (2.0 * 9.0 + 0.5 * 81.0)).abs() < 1e-6);
    }

    #[test]
    fn hybrid_upgrade_sums_lanes_at_reduced_efficiency() {
        let coefficient = archetype(DamageType::Hybrid).coefficient;
        let physical = upgrade_added_damage(&coefficient, DamageType::Physical, 4, 0);
        let magical = upgrade_added_damage(&coefficient, DamageType::Magical, 0, 4);
        let hybrid = upgrade_added_damage(&coefficient, DamageType::Hybrid, 4, 4);
        assert!((hybrid - (physical + magical) * HYBRID_UPGRADE_EFFICIENCY).abs() < 1e-5);
        assert!(hybrid < physical + magical);
    }

    #[test]
    fn penetration_grows_only_through_the_active_lane() {
        let coefficient = archetype(DamageType::Physical).coefficient;
        assert_eq!(
            upgrade_added_penetration(&coefficient, DamageType::Physical, 2, 7),
            (1.0 * 2.0 + 0.25 * 4.0, 0.0)
        );
        assert_eq!(
            upgrade_added_penetration(&coefficient, DamageType::Magical, 2, 2),
            (0.0, 1.0 * 2.0 + 0.25 * 4.0)
        );
        let (physic, magic) = upgrade_added_penetration(&coefficient, DamageType::Hybrid, 2, 2);
        assert!(physic > 0.0 && magic > 0.0);
    }

    #[test]
    fn attacker_damage_folds_buffs_and_percent_bonuses() {
        let archetype = archetype(DamageType::Physical);
        let mut stats = EffectiveStats::baseline();
        stats.attack_damage_pct = 50.0;
        stats.class_damage_pct[TowerClass::Arrow.index()] = 100.0;
        let profile = attacker_profile(&archetype, 0, 0, 10.0, &stats, &PerkState::default());
        // (30 + 10) * 1.5 * 2.0
        assert!((profile.damage - 120.0).abs() < 1e-4);
    }

    #[test]
    fn sacrifice_perk_multiplies_final_damage() {
        let archetype = archetype(DamageType::Physical);
        let stats = EffectiveStats::baseline();
        let mut perks = PerkState::default();
        let plain = attacker_profile(&archetype, 0, 0, 0.0, &stats, &perks);
        perks.sacrifice_bonus = 0.25;
        perks.sacrificed_class = Some(TowerClass::Sword);
        let boosted = attacker_profile(&archetype, 0, 0, 0.0, &stats, &perks);
        assert!((boosted.damage - plain.damage * 1.25).abs() < 1e-4);
    }

    #[test]
    fn more_armor_never_increases_damage() {
        let attacker = attacker(100.0, DamageType::Physical);
        let mut previous = f32::INFINITY;
        for armor in [0.0, 50.0, 200.0, 1_000.0, 10_000.0] {
            let dealt = resolve(&attacker, &defender(500.0, 500.0, armor, 0.0), &PerkState::default());
            assert!(dealt <= previous);
            assert!(dealt > 0.0, "reduction must stay below 1");
            previous = dealt;
        }
    }

    #[test]
    fn penetration_below_armor_is_clamped() {
        let mut attacker = attacker(100.0, DamageType::Physical);
        attacker.physic_penetration = 500.0;
        let dealt = resolve(&attacker, &defender(500.0, 500.0, 50.0, 0.0), &PerkState::default());
        // over-penetration behaves as zero armor
        assert!((dealt - 100.0).abs() < 1e-4);
    }

    #[test]
    fn hybrid_mitigation_averages_both_lanes() {
        let physical = resolve(
            &attacker(100.0, DamageType::Physical),
            &defender(500.0, 500.0, 500.0, 0.0),
            &PerkState::default(),
        );
        let magical = resolve(
            &attacker(100.0, DamageType::Magical),
            &defender(500.0, 500.0, 500.0, 0.0),
            &PerkState::default(),
        );
        let hybrid = resolve(
            &attacker(100.0, DamageType::Hybrid),
            &defender(500.0, 500.0, 500.0, 0.0),
            &PerkState::default(),
        );
        assert!((hybrid - (physical + magical) / 2.0).abs() < 1e-4);
    }

    #[test]
    fn executioner_kills_low_default_enemies_outright() {
        let mut perks = PerkState::default();
        perks.executioner = true;
        let weak_hit = attacker(1.0, DamageType::Physical);
        let dealt = resolve(&weak_hit, &defender(50.0, 500.0, 10_000.0, 0.0), &perks);
        assert_eq!(dealt, 500.0);
    }

    #[test]
    fn executioner_ignores_higher_tiers_and_healthy_enemies() {
        let mut perks = PerkState::default();
        perks.executioner = true;
        let weak_hit = attacker(1.0, DamageType::Physical);

        let mut boss = defender(50.0, 500.0, 0.0, 0.0);
        boss.tier = EnemyTier::Boss;
        assert!(resolve(&weak_hit, &boss, &perks) < 500.0);

        let healthy = defender(51.0, 500.0, 0.0, 0.0);
        assert!(resolve(&weak_hit, &healthy, &perks) < 500.0);
    }

    #[test]
    fn percent_max_hp_damage_lands_after_mitigation() {
        let mut attacker = attacker(100.0, DamageType::Physical);
        attacker.percent_max_hp = 0.01;
        let target = defender(1_000.0, 1_000.0, 500.0, 0.0);
        let dealt = resolve(&attacker, &target, &PerkState::default());
        // 100 * (1 - 0.5) + 1000 * 0.01
        assert!((dealt - 60.0).abs() < 1e-4);
    }

    #[test]
    fn resolved_damage_is_never_negative() {
        let dealt = resolve(
            &attacker(0.0, DamageType::Physical),
            &defender(10.0, 10.0, 9_999.0, 9_999.0),
            &PerkState::default(),
        );
        assert_eq!(dealt, 0.0);
    }
}
