#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Rampart combat simulation.
//!
//! The world owns every mutable collection (enemies, towers, the player's
//! vitals and economy, the current stat snapshot, perks) and changes only
//! through [`apply`]. Systems observe it through the read-only accessors in
//! [`query`] and never touch the collections directly.

use log::{debug, warn};

use rampart_core::{
    ArchetypeStore, Command, EffectiveStats, EnemyId, Event, GameMode, PerkGrant, PerkState,
    PlacementError, Position, TowerId, UpgradeLane,
};
use rampart_system_damage as damage;

mod enemies;
mod towers;

use enemies::Enemy;
use towers::Tower;

/// Distance at which an enemy is considered to have reached a waypoint.
pub const WAYPOINT_EPSILON: f32 = 0.04;

const ARRIVAL_DAMAGE: f32 = 1.0;

/// The player's vitals and economy.
#[derive(Debug)]
pub struct PlayerState {
    hp: f32,
    max_hp: f32,
    gold: i64,
    skill_points: f32,
    currency: u64,
    physic_level: u32,
    magic_level: u32,
    defeated: bool,
}

impl PlayerState {
    fn new(stats: &EffectiveStats) -> Self {
        Self {
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            gold: stats.start_gold as i64,
            skill_points: 0.0,
            currency: 0,
            physic_level: 0,
            magic_level: 0,
            defeated: false,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> f32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Banked gold.
    #[must_use]
    pub const fn gold(&self) -> i64 {
        self.gold
    }

    /// Banked skill points.
    #[must_use]
    pub const fn skill_points(&self) -> f32 {
        self.skill_points
    }

    /// Meta-currency converted from duplicate equipment drops.
    #[must_use]
    pub const fn currency(&self) -> u64 {
        self.currency
    }

    /// Player-wide physical upgrade level.
    #[must_use]
    pub const fn physic_level(&self) -> u32 {
        self.physic_level
    }

    /// Player-wide magical upgrade level.
    #[must_use]
    pub const fn magic_level(&self) -> u32 {
        self.magic_level
    }

    /// Whether the player's hit points have reached zero.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.defeated
    }
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    mode: GameMode,
    path: Vec<Position>,
    archetypes: ArchetypeStore,
    enemies: Vec<Enemy>,
    towers: Vec<Tower>,
    player: PlayerState,
    stats: EffectiveStats,
    perks: PerkState,
    next_enemy_id: u32,
    next_tower_id: u32,
    gold_fraction: f32,
}

impl World {
    /// Creates a new world for the given mode, ordered path waypoints,
    /// tower templates, and initial stat snapshot.
    ///
    /// The player's starting bank and hit points come from `stats`, so the
    /// loadout fold has to happen before construction for start-gold
    /// contributions to count.
    #[must_use]
    pub fn new(
        mode: GameMode,
        path: Vec<Position>,
        archetypes: ArchetypeStore,
        stats: EffectiveStats,
    ) -> Self {
        Self {
            mode,
            path,
            archetypes,
            enemies: Vec::new(),
            towers: Vec::new(),
            player: PlayerState::new(&stats),
            stats,
            perks: PerkState::default(),
            next_enemy_id: 0,
            next_tower_id: 0,
            gold_fraction: 0.0,
        }
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_tower_id(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        id
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn accrue_gold(&mut self, dt: f32) {
        self.gold_fraction += self.stats.gold_per_second * dt;
        if self.gold_fraction >= 1.0 {
            let whole = self.gold_fraction.floor();
            self.player.gold = self.player.gold.saturating_add(whole as i64);
            self.gold_fraction -= whole;
        }
    }

    fn damage_player(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        if amount <= 0.0 || self.player.defeated {
            return;
        }
        self.player.hp = (self.player.hp - amount).max(0.0);
        out_events.push(Event::PlayerDamaged {
            amount,
            remaining: self.player.hp,
        });
        if self.player.hp <= 0.0 {
            self.player.defeated = true;
            out_events.push(Event::PlayerDefeated);
        }
    }

    fn advance_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        if self.path.is_empty() {
            return;
        }
        let last_index = self.path.len() - 1;
        let mut arrived: Vec<EnemyId> = Vec::new();

        let path = &self.path;
        for enemy in self.enemies.iter_mut() {
            let target_index = enemy.waypoint_index.min(last_index);
            let target = path[target_index];
            enemy.position = enemy.position.step_toward(target, enemy.move_speed * dt);
            if enemy.position.distance(target) > WAYPOINT_EPSILON {
                continue;
            }
            if target_index < last_index {
                enemy.waypoint_index = target_index + 1;
                continue;
            }
            match self.mode {
                GameMode::Finite => arrived.push(enemy.id),
                GameMode::Infinite => {
                    // Recirculate from the path start; the enemy stays a
                    // live target until killed.
                    enemy.position = path[0];
                    enemy.waypoint_index = last_index.min(1);
                }
            }
        }

        for enemy_id in arrived {
            if let Some(index) = self.enemy_index(enemy_id) {
                let _ = self.enemies.remove(index);
                out_events.push(Event::EnemyArrived { enemy: enemy_id });
                self.damage_player(ARRIVAL_DAMAGE, out_events);
            }
        }
    }

    fn apply_strike(&mut self, tower: TowerId, targets: &[EnemyId], out_events: &mut Vec<Event>) {
        let Some(striker) = self.towers.iter().find(|candidate| candidate.id == tower) else {
            debug!("strike from unknown tower {}", tower.get());
            return;
        };
        let Some(archetype) = self.archetypes.get(striker.class).copied() else {
            warn!("no archetype loaded for {:?}", striker.class);
            return;
        };
        let attacker = damage::attacker_profile(
            &archetype,
            striker.physic_level,
            striker.magic_level,
            striker.buff_damage,
            &self.stats,
            &self.perks,
        );

        let mut killed: Vec<EnemyId> = Vec::new();
        for target in targets {
            let Some(index) = self.enemy_index(*target) else {
                // Target despawned between commit and application.
                debug!("stale strike target {}", target.get());
                continue;
            };
            let enemy = &mut self.enemies[index];
            let defender = damage::DefenderProfile {
                tier: enemy.tier,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
                physic_armor: enemy.physic_armor,
                magic_armor: enemy.magic_armor,
            };
            let dealt = damage::resolve(&attacker, &defender, &self.perks);
            enemy.hp -= dealt;
            out_events.push(Event::DamageDealt {
                tower,
                enemy: *target,
                amount: dealt,
            });
            if enemy.hp <= 0.0 {
                killed.push(*target);
            }
        }

        for enemy_id in killed {
            if let Some(index) = self.enemy_index(enemy_id) {
                let gold = self.enemies[index].gold;
                let _ = self.enemies.remove(index);
                self.player.gold = self.player.gold.saturating_add(gold);
                out_events.push(Event::EnemyKilled {
                    enemy: enemy_id,
                    gold,
                });
            }
        }
    }

    fn enable_perk(&mut self, perk: PerkGrant) {
        match perk {
            PerkGrant::Executioner => self.perks.executioner = true,
            PerkGrant::Sacrifice { class } => {
                self.perks.sacrifice_bonus = 0.25;
                self.perks.sacrificed_class = Some(class);
            }
            PerkGrant::HazardPay => {
                self.perks.enemy_speed_multiplier = 1.15;
                self.perks.gold_multiplier = 1.2;
            }
            PerkGrant::Interest => self.perks.interest = true,
            PerkGrant::Specialist => self.perks.specialist = true,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.accrue_gold(dt);
            world.advance_enemies(dt, out_events);
        }
        Command::SpawnEnemy { spec } => {
            let Some(start) = world.path.first().copied() else {
                warn!("spawn requested with no path configured");
                return;
            };
            let id = world.allocate_enemy_id();
            let enemy = Enemy::from_spec(id, &spec, start, &world.perks);
            world.enemies.push(enemy);
            out_events.push(Event::EnemySpawned {
                enemy: id,
                tier: spec.tier,
            });
        }
        Command::Strike { tower, targets } => {
            world.apply_strike(tower, &targets, out_events);
        }
        Command::PlaceTower {
            class,
            slot,
            position,
        } => {
            let reject = |reason| Event::TowerPlacementRejected {
                class,
                slot,
                reason,
            };
            if world.perks.sacrificed_class == Some(class) {
                out_events.push(reject(PlacementError::ClassSacrificed));
                return;
            }
            if world.towers.iter().any(|tower| tower.slot == slot) {
                out_events.push(reject(PlacementError::SlotOccupied));
                return;
            }
            let Some(archetype) = world.archetypes.get(class).copied() else {
                out_events.push(reject(PlacementError::UnknownArchetype));
                return;
            };
            if world.player.gold < archetype.cost {
                out_events.push(reject(PlacementError::InsufficientFunds));
                return;
            }
            world.player.gold -= archetype.cost;
            let id = world.allocate_tower_id();
            world.towers.push(Tower {
                id,
                class,
                slot,
                position,
                physic_level: world.player.physic_level,
                magic_level: world.player.magic_level,
                buff_damage: 0.0,
                cost: archetype.cost,
            });
            out_events.push(Event::TowerPlaced {
                tower: id,
                class,
                slot,
            });
        }
        Command::SellTower { tower } => {
            let Some(index) = world
                .towers
                .iter()
                .position(|candidate| candidate.id == tower)
            else {
                warn!("sell requested for unknown tower {}", tower.get());
                return;
            };
            let refund = world.towers[index].sell_refund();
            let _ = world.towers.remove(index);
            world.player.gold = world.player.gold.saturating_add(refund);
            out_events.push(Event::TowerSold { tower, refund });
        }
        Command::GrantUpgrade { lane } => {
            let level = match lane {
                UpgradeLane::Physical => {
                    world.player.physic_level += 1;
                    world.player.physic_level
                }
                UpgradeLane::Magical => {
                    world.player.magic_level += 1;
                    world.player.magic_level
                }
            };
            // Existing towers catch up to the player-wide level; levels
            // never decrease.
            for tower in world.towers.iter_mut() {
                match lane {
                    UpgradeLane::Physical => {
                        tower.physic_level = tower.physic_level.max(level);
                    }
                    UpgradeLane::Magical => {
                        tower.magic_level = tower.magic_level.max(level);
                    }
                }
            }
            out_events.push(Event::UpgradeGranted { lane, level });
        }
        Command::SetTowerBuff { tower, amount } => {
            if let Some(tower) = world
                .towers
                .iter_mut()
                .find(|candidate| candidate.id == tower)
            {
                tower.buff_damage = amount.max(0.0);
            }
        }
        Command::ShredArmor {
            enemy,
            source,
            physical,
            magical,
        } => {
            if let Some(index) = world.enemy_index(enemy) {
                if !world.enemies[index].shred_armor(source, physical, magical) {
                    debug!("armor shred from source {source} already applied");
                }
            }
        }
        Command::SyncStats { stats } => {
            world.stats = stats;
            world.player.max_hp = stats.max_hp;
            world.player.hp = world.player.hp.min(stats.max_hp);
        }
        Command::HealPlayer { amount } => {
            world.player.hp = (world.player.hp + amount.max(0.0)).min(world.player.max_hp);
        }
        Command::DamagePlayer { amount } => {
            world.damage_player(amount, out_events);
        }
        Command::GrantGold { amount } => {
            world.player.gold = world.player.gold.saturating_add(amount).max(0);
        }
        Command::GrantSkillPoints { amount } => {
            world.player.skill_points =
                (world.player.skill_points + amount).clamp(0.0, world.stats.max_skill_points);
        }
        Command::GrantCurrency { amount } => {
            world.player.currency = world.player.currency.saturating_add(amount);
        }
        Command::EnablePerk { perk } => {
            world.enable_perk(perk);
        }
        Command::ClearEnemies => {
            world.enemies.clear();
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{PlayerState, World};
    use rampart_core::{
        ArchetypeStore, EffectiveStats, EnemySnapshot, EnemyView, GameMode, PerkState, Position,
        TowerSnapshot, TowerView,
    };

    /// Mode the world was created for.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Ordered path waypoints enemies traverse.
    #[must_use]
    pub fn path(world: &World) -> &[Position] {
        &world.path
    }

    /// Tower templates loaded at startup.
    #[must_use]
    pub fn archetypes(world: &World) -> &ArchetypeStore {
        &world.archetypes
    }

    /// The player's vitals and economy.
    #[must_use]
    pub fn player(world: &World) -> &PlayerState {
        &world.player
    }

    /// The stat snapshot the world currently resolves strikes against.
    #[must_use]
    pub fn stats(world: &World) -> &EffectiveStats {
        &world.stats
    }

    /// Run-long perk toggles.
    #[must_use]
    pub fn perks(world: &World) -> &PerkState {
        &world.perks
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    tier: enemy.tier,
                    position: enemy.position,
                    hp: enemy.hp,
                    max_hp: enemy.max_hp,
                    physic_armor: enemy.physic_armor,
                    magic_armor: enemy.magic_armor,
                    tint: enemy.tint,
                    gold: enemy.gold,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every constructed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    class: tower.class,
                    slot: tower.slot,
                    position: tower.position,
                    physic_level: tower.physic_level,
                    magic_level: tower.magic_level,
                    buff_damage: tower.buff_damage,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World, WAYPOINT_EPSILON};
    use rampart_core::{
        ArchetypeStore, AttackTiming, Command, DamageType, EffectiveStats, EnemyId, EnemyKind,
        EnemySpec, EnemyTier, Event, GameMode, PerkGrant, PlacementError, Position, SlotId,
        TintColor, TowerArchetype, TowerClass, TowerId, UpgradeCoefficient, UpgradeLane,
    };

    fn archetype(class: TowerClass) -> TowerArchetype {
        TowerArchetype {
            class,
            damage: 50.0,
            physic_penetrate: 0.0,
            magic_penetrate: 0.0,
            attack_speed: 30.0,
            range: 5.0,
            cost: 120,
            damage_type: DamageType::Physical,
            multi_target: false,
            timing: AttackTiming::Instant,
            coefficient: UpgradeCoefficient {
                damage: 2.0,
                damage_quadratic: 0.0,
                penetrate: 0.0,
                penetrate_quadratic: 0.0,
            },
            percent_max_hp_damage: 0.0,
        }
    }

    fn test_world(mode: GameMode) -> World {
        World::new(
            mode,
            vec![
                Position::new(0.0, 0.0),
                Position::new(10.0, 0.0),
                Position::new(10.0, 10.0),
            ],
            ArchetypeStore::new(vec![archetype(TowerClass::Arrow)]),
            EffectiveStats::baseline(),
        )
    }

    fn spec(max_hp: f32) -> EnemySpec {
        EnemySpec {
            kind: EnemyKind::new(0),
            tier: EnemyTier::Default,
            max_hp,
            physic_armor: 0.0,
            magic_armor: 0.0,
            move_speed: 1.0,
            tint: TintColor::from_rgb(255, 255, 255),
            wave_index: 0,
        }
    }

    fn spawn(world: &mut World, max_hp: f32) -> EnemyId {
        let mut events = Vec::new();
        apply(world, Command::SpawnEnemy { spec: spec(max_hp) }, &mut events);
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events {other:?}"),
        }
    }

    fn place_tower(world: &mut World, slot: u32) -> TowerId {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceTower {
                class: TowerClass::Arrow,
                slot: SlotId::new(slot),
                position: Position::new(5.0, 1.0),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::TowerPlaced { tower, .. }] => *tower,
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn enemies_walk_waypoints_and_arrivals_damage_the_player() {
        let mut world = test_world(GameMode::Finite);
        let enemy = spawn(&mut world, 100.0);
        let hp_before = query::player(&world).hp();
        let mut events = Vec::new();
        // Path length is 20 units; plenty of time at speed 1.
        for _ in 0..2_100 {
            apply(&mut world, Command::Tick { dt: 0.01 }, &mut events);
        }
        assert!(query::enemy_view(&world).is_empty());
        assert!(events.contains(&Event::EnemyArrived { enemy }));
        assert!((query::player(&world).hp() - (hp_before - 1.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn infinite_mode_recirculates_instead_of_arriving() {
        let mut world = test_world(GameMode::Infinite);
        let _ = spawn(&mut world, 100.0);
        let mut events = Vec::new();
        for _ in 0..2_100 {
            apply(&mut world, Command::Tick { dt: 0.01 }, &mut events);
        }
        let view = query::enemy_view(&world);
        assert_eq!(view.len(), 1);
        assert!(!events.iter().any(|event| matches!(event, Event::EnemyArrived { .. })));
    }

    #[test]
    fn waypoint_switch_happens_within_epsilon() {
        let mut world = test_world(GameMode::Finite);
        let enemy = spawn(&mut world, 100.0);
        let mut events = Vec::new();
        // One long tick carries the enemy just short of the first corner.
        apply(&mut world, Command::Tick { dt: 9.9 }, &mut events);
        let before = query::enemy_view(&world).get(enemy).copied();
        apply(&mut world, Command::Tick { dt: 0.07 }, &mut events);
        let after = query::enemy_view(&world)
            .get(enemy)
            .copied()
            .expect("enemy alive");
        let corner = Position::new(10.0, 0.0);
        assert!(before.expect("enemy alive").position.distance(corner) > WAYPOINT_EPSILON);
        assert!(after.position.distance(corner) <= WAYPOINT_EPSILON);
    }

    #[test]
    fn strikes_deal_damage_and_kills_grant_spawn_fixed_gold() {
        let mut world = test_world(GameMode::Finite);
        let tower = place_tower(&mut world, 0);
        let enemy = spawn(&mut world, 40.0);
        let gold_before = query::player(&world).gold();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Strike {
                tower,
                targets: vec![enemy],
            },
            &mut events,
        );
        assert!(events.contains(&Event::EnemyKilled { enemy, gold: 10 }));
        assert_eq!(query::player(&world).gold(), gold_before + 10);
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn stale_strike_targets_are_silent_no_ops() {
        let mut world = test_world(GameMode::Finite);
        let tower = place_tower(&mut world, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Strike {
                tower,
                targets: vec![EnemyId::new(999)],
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn placement_rejects_occupied_slots_and_missing_funds() {
        let mut world = test_world(GameMode::Finite);
        let _ = place_tower(&mut world, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTower {
                class: TowerClass::Arrow,
                slot: SlotId::new(0),
                position: Position::new(5.0, 1.0),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::SlotOccupied,
                ..
            }]
        ));

        events.clear();
        let bank = query::player(&world).gold();
        apply(&mut world, Command::GrantGold { amount: -bank }, &mut events);
        apply(
            &mut world,
            Command::PlaceTower {
                class: TowerClass::Arrow,
                slot: SlotId::new(1),
                position: Position::new(6.0, 1.0),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::InsufficientFunds,
                ..
            }]
        ));
    }

    #[test]
    fn sacrificed_classes_cannot_be_built() {
        let mut world = test_world(GameMode::Finite);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnablePerk {
                perk: PerkGrant::Sacrifice {
                    class: TowerClass::Arrow,
                },
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceTower {
                class: TowerClass::Arrow,
                slot: SlotId::new(0),
                position: Position::new(5.0, 1.0),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::ClassSacrificed,
                ..
            }]
        ));
    }

    #[test]
    fn selling_refunds_two_thirds_and_frees_the_slot() {
        let mut world = test_world(GameMode::Finite);
        let tower = place_tower(&mut world, 0);
        let gold_before = query::player(&world).gold();
        let mut events = Vec::new();
        apply(&mut world, Command::SellTower { tower }, &mut events);
        assert!(events.contains(&Event::TowerSold { tower, refund: 80 }));
        assert_eq!(query::player(&world).gold(), gold_before + 80);
        let _ = place_tower(&mut world, 0);
    }

    #[test]
    fn upgrades_propagate_to_towers_and_never_decrease() {
        let mut world = test_world(GameMode::Finite);
        let tower = place_tower(&mut world, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::GrantUpgrade {
                lane: UpgradeLane::Physical,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::GrantUpgrade {
                lane: UpgradeLane::Physical,
            },
            &mut events,
        );
        let view = query::tower_view(&world);
        let snapshot = view
            .iter()
            .find(|snapshot| snapshot.id == tower)
            .expect("tower exists");
        assert_eq!(snapshot.physic_level, 2);
        assert_eq!(snapshot.magic_level, 0);
        assert!(events.contains(&Event::UpgradeGranted {
            lane: UpgradeLane::Physical,
            level: 2,
        }));
        // New towers inherit the player-wide level.
        let late = place_tower(&mut world, 1);
        let view = query::tower_view(&world);
        let late_snapshot = view
            .iter()
            .find(|snapshot| snapshot.id == late)
            .expect("tower exists");
        assert_eq!(late_snapshot.physic_level, 2);
    }

    #[test]
    fn gold_per_second_accrues_whole_units() {
        let mut world = test_world(GameMode::Finite);
        let mut stats = EffectiveStats::baseline();
        stats.gold_per_second = 2.0;
        let mut events = Vec::new();
        apply(&mut world, Command::SyncStats { stats }, &mut events);
        let before = query::player(&world).gold();
        for _ in 0..10 {
            apply(&mut world, Command::Tick { dt: 0.1 }, &mut events);
        }
        assert_eq!(query::player(&world).gold(), before + 2);
    }

    #[test]
    fn start_gold_contributions_land_in_the_opening_bank() {
        let mut stats = EffectiveStats::baseline();
        stats.start_gold += 300.0;
        let world = World::new(
            GameMode::Finite,
            vec![Position::new(0.0, 0.0), Position::new(10.0, 0.0)],
            ArchetypeStore::new(vec![archetype(TowerClass::Arrow)]),
            stats,
        );
        let baseline = EffectiveStats::baseline().start_gold as i64;
        assert_eq!(query::player(&world).gold(), baseline + 300);
    }

    #[test]
    fn player_defeat_fires_exactly_once() {
        let mut world = test_world(GameMode::Finite);
        let mut events = Vec::new();
        apply(&mut world, Command::DamagePlayer { amount: 50.0 }, &mut events);
        apply(&mut world, Command::DamagePlayer { amount: 5.0 }, &mut events);
        let defeats = events
            .iter()
            .filter(|event| matches!(event, Event::PlayerDefeated))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn clear_enemies_sweeps_without_gold() {
        let mut world = test_world(GameMode::Finite);
        let _ = spawn(&mut world, 100.0);
        let _ = spawn(&mut world, 100.0);
        let gold_before = query::player(&world).gold();
        let mut events = Vec::new();
        apply(&mut world, Command::ClearEnemies, &mut events);
        assert!(query::enemy_view(&world).is_empty());
        assert_eq!(query::player(&world).gold(), gold_before);
        assert!(events.is_empty());
    }

    #[test]
    fn skill_points_clamp_to_the_cap() {
        let mut world = test_world(GameMode::Finite);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::GrantSkillPoints { amount: 500.0 },
            &mut events,
        );
        let cap = query::stats(&world).max_skill_points;
        assert!((query::player(&world).skill_points() - cap).abs() < f32::EPSILON);
    }
}
