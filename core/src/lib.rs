#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart combat engine.
//!
//! This crate defines the message surface that connects the authoritative
//! world, pure systems, and adapters. Systems consume immutable snapshot
//! views and respond with [`Command`] batches; the world executes commands
//! through its `apply` entry point and broadcasts [`Event`] values that
//! systems and collaborators (economy, presentation, analytics) react to
//! deterministically.

use serde::{Deserialize, Serialize};

/// Gameplay mode selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Thirty precomputed waves ending in a boss; enemies that reach the
    /// path end damage the player and despawn.
    Finite,
    /// Unbounded procedurally scaled waves; enemies recirculate the path
    /// until killed and each wave runs against a wall-clock timer.
    Infinite,
}

/// Damage school a tower attacks with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Mitigated by the defender's physical armor only.
    Physical,
    /// Mitigated by the defender's magical armor only.
    Magical,
    /// Blends both lanes: upgrade curves sum at reduced efficiency and
    /// mitigation averages the two reductions.
    Hybrid,
}

/// Point within an attack cycle at which damage is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackTiming {
    /// Damage lands at 35% of the cycle, abstracting projectile travel.
    Projectile,
    /// Damage lands at 20% of the cycle.
    Instant,
    /// Damage lands immediately with no windup; attack speed zero is the
    /// sentinel for always-active towers of this style.
    Continuous,
}

/// Tier of an enemy within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyTier {
    /// Ordinary wave filler; the only tier subject to execute effects.
    Default,
    /// Tougher mid-wave checkpoint enemy.
    MiddleBoss,
    /// Single heavily armored wave capstone.
    Boss,
}

/// Upgrade lane a tower level belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeLane {
    /// Physical damage and penetration lane.
    Physical,
    /// Magical damage and penetration lane.
    Magical,
}

/// Classes of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerClass {
    /// Baseline single-target tower.
    Default,
    /// Long-range projectile tower.
    Arrow,
    /// Continuous-beam tower.
    Laser,
    /// Support tower dealing magical damage.
    Priests,
    /// Piercing multi-target tower.
    Spear,
    /// Short-range hybrid tower.
    Sword,
}

impl TowerClass {
    /// Every constructible class, in canonical order.
    pub const ALL: [TowerClass; 6] = [
        TowerClass::Default,
        TowerClass::Arrow,
        TowerClass::Laser,
        TowerClass::Priests,
        TowerClass::Spear,
        TowerClass::Sword,
    ];

    /// Canonical index of the class, used for per-class stat tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TowerClass::Default => 0,
            TowerClass::Arrow => 1,
            TowerClass::Laser => 2,
            TowerClass::Priests => 3,
            TowerClass::Spear => 4,
            TowerClass::Sword => 5,
        }
    }
}

/// Unique identifier assigned to a tower instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Placement slot a tower occupies; at most one tower per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of an enemy archetype within the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyKind(u32);

impl EnemyKind {
    /// Creates a new enemy kind identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the kind.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of an equipment item in the drop pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(u32);

impl EquipmentId {
    /// Creates a new equipment identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle issued for a temporary stat modifier so one copy can be removed
/// even when identical values are layered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierHandle(u64);

impl ModifierHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Two-dimensional position in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from world-unit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves at most `max_step` world units toward `target`, landing exactly
    /// on the target when it is closer than the step.
    #[must_use]
    pub fn step_toward(self, target: Position, max_step: f32) -> Position {
        let distance = self.distance(target);
        if distance <= max_step || distance == 0.0 {
            return target;
        }
        let scale = max_step / distance;
        Position::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }
}

/// RGB tint applied to an enemy variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TintColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TintColor {
    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Per-level growth coefficients applied when a tower lane is upgraded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeCoefficient {
    /// Damage added per level (linear term).
    pub damage: f32,
    /// Damage added per squared level (quadratic term).
    pub damage_quadratic: f32,
    /// Penetration added per level (linear term).
    pub penetrate: f32,
    /// Penetration added per squared level (quadratic term).
    pub penetrate_quadratic: f32,
}

/// Immutable template describing a constructible tower. Loaded once at run
/// start and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerArchetype {
    /// Class this template describes.
    pub class: TowerClass,
    /// Base damage before upgrades, buffs, and multipliers.
    pub damage: f32,
    /// Physical armor ignored before mitigation.
    pub physic_penetrate: f32,
    /// Magical armor ignored before mitigation.
    pub magic_penetrate: f32,
    /// Attack speed stat; zero is the continuous-attack sentinel.
    pub attack_speed: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Construction cost in gold.
    pub cost: i64,
    /// Damage school used for mitigation.
    pub damage_type: DamageType,
    /// Whether the tower engages every enemy in range at once.
    pub multi_target: bool,
    /// Point within the attack cycle at which damage lands.
    pub timing: AttackTiming,
    /// Growth applied per upgrade level.
    pub coefficient: UpgradeCoefficient,
    /// Fraction of the defender's max HP added as true damage after
    /// mitigation; zero disables the effect.
    pub percent_max_hp_damage: f32,
}

/// Read-only lookup of tower templates, keyed by class.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeStore {
    entries: Vec<TowerArchetype>,
}

impl ArchetypeStore {
    /// Creates a store from the provided templates.
    #[must_use]
    pub fn new(entries: Vec<TowerArchetype>) -> Self {
        Self { entries }
    }

    /// Looks up the template for a class, if one was loaded.
    #[must_use]
    pub fn get(&self, class: TowerClass) -> Option<&TowerArchetype> {
        self.entries.iter().find(|entry| entry.class == class)
    }

    /// Iterator over every loaded template.
    pub fn iter(&self) -> impl Iterator<Item = &TowerArchetype> {
        self.entries.iter()
    }

    /// Reports whether the store holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable template describing a base enemy before per-wave scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    /// Roster identifier of the base enemy.
    pub kind: EnemyKind,
    /// Hit points before difficulty and wave scaling.
    pub base_hp: f32,
    /// Path traversal speed in world units per time unit.
    pub move_speed: f32,
}

/// Fully resolved request to spawn one enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpec {
    /// Roster kind the variant was cloned from.
    pub kind: EnemyKind,
    /// Tier within the wave.
    pub tier: EnemyTier,
    /// Scaled maximum hit points.
    pub max_hp: f32,
    /// Physical armor share of the wave's armor budget.
    pub physic_armor: f32,
    /// Magical armor share of the wave's armor budget.
    pub magic_armor: f32,
    /// Path traversal speed before perk scaling.
    pub move_speed: f32,
    /// Cosmetic tint of the variant.
    pub tint: TintColor,
    /// Wave index the enemy belongs to; fixes its gold value at spawn.
    pub wave_index: u32,
}

/// Stat kinds a modifier can contribute to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StatKind {
    /// Percentage bonus to every tower's damage.
    GlobalAttackDamage,
    /// Percentage bonus to every tower's attack speed.
    GlobalAttackSpeed,
    /// Percentage bonus to every tower's range.
    GlobalAttackRange,
    /// Percentage bonus to skill damage.
    GlobalSkillDamage,
    /// Percentage damage bonus restricted to one tower class.
    TowerDamage(TowerClass),
    /// Additive gold income per time unit.
    GoldPerSecond,
    /// Additive gold granted at run start.
    StartGold,
    /// Additive player maximum hit points.
    MaxHp,
}

/// A single stat contribution sourced from equipment or a temporary effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    /// Stat the modifier contributes to.
    pub kind: StatKind,
    /// Magnitude; percentages for multiplicative kinds, flat otherwise.
    pub value: f32,
}

/// Aggregated effective stats consumed by damage resolution and targeting.
///
/// Percentage fields accumulate additively within a kind; they are combined
/// multiplicatively with base values only at the point of use.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    /// Percentage bonus applied to every tower's damage.
    pub attack_damage_pct: f32,
    /// Percentage bonus applied to every tower's attack speed.
    pub attack_speed_pct: f32,
    /// Percentage bonus applied to every tower's range.
    pub attack_range_pct: f32,
    /// Percentage bonus applied to skill damage.
    pub skill_damage_pct: f32,
    /// Per-class percentage damage bonuses, indexed by [`TowerClass::index`].
    pub class_damage_pct: [f32; 6],
    /// Gold accrued per time unit.
    pub gold_per_second: f32,
    /// Gold granted at run start.
    pub start_gold: f32,
    /// Player maximum hit points.
    pub max_hp: f32,
    /// Cap on banked skill points.
    pub max_skill_points: f32,
}

impl EffectiveStats {
    /// Baseline stats before any equipment contribution.
    #[must_use]
    pub const fn baseline() -> Self {
        Self {
            attack_damage_pct: 0.0,
            attack_speed_pct: 0.0,
            attack_range_pct: 0.0,
            skill_damage_pct: 0.0,
            class_damage_pct: [0.0; 6],
            gold_per_second: 0.0,
            start_gold: 400.0,
            max_hp: 20.0,
            max_skill_points: 200.0,
        }
    }

    /// Percentage damage bonus for one tower class.
    #[must_use]
    pub fn class_damage_pct(&self, class: TowerClass) -> f32 {
        self.class_damage_pct[class.index()]
    }
}

impl Default for EffectiveStats {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Run-long formula toggles selected through rewards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerkState {
    /// Default-tier enemies at or below 10% HP die to any hit.
    pub executioner: bool,
    /// Flat damage multiplier bonus granted by the sacrifice perk; zero
    /// while the perk is inactive.
    pub sacrifice_bonus: f32,
    /// Class surrendered to the sacrifice perk, no longer constructible.
    pub sacrificed_class: Option<TowerClass>,
    /// Enemy move-speed multiplier from the hazard-pay perk.
    pub enemy_speed_multiplier: f32,
    /// Enemy gold-value multiplier from the hazard-pay perk.
    pub gold_multiplier: f32,
    /// Skill-point rewards are excluded while the specialist perk is active.
    pub specialist: bool,
    /// Grants 10% of banked gold on each wave clear.
    pub interest: bool,
}

impl PerkState {
    /// Reports whether the sacrifice damage bonus applies.
    #[must_use]
    pub fn sacrifice_active(&self) -> bool {
        self.sacrifice_bonus > 0.0
    }
}

impl Default for PerkState {
    fn default() -> Self {
        Self {
            executioner: false,
            sacrifice_bonus: 0.0,
            sacrificed_class: None,
            enemy_speed_multiplier: 1.0,
            gold_multiplier: 1.0,
            specialist: false,
            interest: false,
        }
    }
}

/// Perk unlock carried by a reward choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PerkGrant {
    /// Enables the execute-below-threshold rule.
    Executioner,
    /// Enables the +25% damage bonus and surrenders one tower class.
    Sacrifice {
        /// Class that can no longer be built.
        class: TowerClass,
    },
    /// Enemies move 15% faster and award 20% more gold.
    HazardPay,
    /// Grants 10% of banked gold on each wave clear.
    Interest,
    /// Trades skill-point rewards away for a larger build stipend.
    Specialist,
}

/// Rarity tier of a droppable equipment item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Most common drop tier.
    Common,
    /// Slightly elevated drop tier.
    Uncommon,
    /// Mid drop tier.
    Rare,
    /// High drop tier.
    Epic,
    /// Highest drop tier.
    Legendary,
}

impl Rarity {
    /// Currency granted when a drop of this rarity duplicates an owned item.
    #[must_use]
    pub const fn duplicate_currency(self) -> u64 {
        match self {
            Rarity::Common => 10_000,
            Rarity::Uncommon => 20_000,
            Rarity::Rare => 50_000,
            Rarity::Epic => 100_000,
            Rarity::Legendary => 200_000,
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// Another tower already occupies the requested slot.
    SlotOccupied,
    /// No template is loaded for the requested class.
    UnknownArchetype,
    /// The requested class was surrendered to the sacrifice perk.
    ClassSacrificed,
    /// The player cannot afford the construction cost.
    InsufficientFunds,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Simulated time units elapsed since the previous tick.
        dt: f32,
    },
    /// Spawns one enemy at the path start.
    SpawnEnemy {
        /// Fully resolved variant to spawn.
        spec: EnemySpec,
    },
    /// Applies one attack from a tower to the listed targets. Targets that
    /// despawned since the strike was scheduled are skipped silently.
    Strike {
        /// Tower delivering the attack.
        tower: TowerId,
        /// Enemies the attack was committed against.
        targets: Vec<EnemyId>,
    },
    /// Requests construction of a tower in a placement slot.
    PlaceTower {
        /// Class of tower to construct.
        class: TowerClass,
        /// Slot the tower will occupy.
        slot: SlotId,
        /// World position of the slot.
        position: Position,
    },
    /// Sells an existing tower, refunding part of its cost.
    SellTower {
        /// Tower to sell.
        tower: TowerId,
    },
    /// Raises the player-wide upgrade level of one lane by one.
    GrantUpgrade {
        /// Lane receiving the level.
        lane: UpgradeLane,
    },
    /// Sets the external buff damage accumulator of a tower.
    SetTowerBuff {
        /// Tower whose buff accumulator changes.
        tower: TowerId,
        /// New accumulator value; clamped at zero.
        amount: f32,
    },
    /// Lowers an enemy's armor. Each source applies at most once per enemy.
    ShredArmor {
        /// Enemy losing armor.
        enemy: EnemyId,
        /// Identity of the debuff source.
        source: u32,
        /// Physical armor removed.
        physical: f32,
        /// Magical armor removed.
        magical: f32,
    },
    /// Replaces the world's effective-stat snapshot.
    SyncStats {
        /// Freshly aggregated stats.
        stats: EffectiveStats,
    },
    /// Restores player hit points, clamped to the maximum.
    HealPlayer {
        /// Hit points restored.
        amount: f32,
    },
    /// Deals damage to the player.
    DamagePlayer {
        /// Hit points lost.
        amount: f32,
    },
    /// Adds gold to the player's bank.
    GrantGold {
        /// Gold granted; may be negative for costs settled externally.
        amount: i64,
    },
    /// Adds banked skill points, clamped to the configured cap.
    GrantSkillPoints {
        /// Skill points granted.
        amount: f32,
    },
    /// Adds meta-currency converted from duplicate equipment drops.
    GrantCurrency {
        /// Currency granted.
        amount: u64,
    },
    /// Enables a run-long perk.
    EnablePerk {
        /// Perk to enable.
        perk: PerkGrant,
    },
    /// Removes every live enemy without awarding gold; used by the
    /// infinite-mode timer sweep.
    ClearEnemies,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Simulated time units elapsed in the tick.
        dt: f32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier of the enemy within its wave.
        tier: EnemyTier,
    },
    /// Reports that an enemy died to tower damage.
    EnemyKilled {
        /// Identifier of the dead enemy.
        enemy: EnemyId,
        /// Gold credited to the player, fixed at the enemy's spawn.
        gold: i64,
    },
    /// Reports that an enemy reached the end of the path in finite mode.
    EnemyArrived {
        /// Identifier of the arriving enemy.
        enemy: EnemyId,
    },
    /// Reports damage applied to an enemy.
    DamageDealt {
        /// Tower that delivered the damage.
        tower: TowerId,
        /// Enemy that received the damage.
        enemy: EnemyId,
        /// Final mitigated amount.
        amount: f32,
    },
    /// Confirms that a tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Class of the constructed tower.
        class: TowerClass,
        /// Slot the tower occupies.
        slot: SlotId,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Gold refunded to the player.
        refund: i64,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Class requested for placement.
        class: TowerClass,
        /// Slot provided in the request.
        slot: SlotId,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a player-wide upgrade level was granted.
    UpgradeGranted {
        /// Lane that leveled up.
        lane: UpgradeLane,
        /// New level of the lane.
        level: u32,
    },
    /// Announces a freshly aggregated stat snapshot; the seam dependent
    /// presentation layers subscribe to.
    StatsRecomputed {
        /// The new effective stats.
        stats: EffectiveStats,
    },
    /// Reports that the player lost hit points.
    PlayerDamaged {
        /// Hit points lost.
        amount: f32,
        /// Hit points remaining afterwards.
        remaining: f32,
    },
    /// Announces that player hit points reached zero.
    PlayerDefeated,
    /// Announces that a wave began spawning.
    WaveStarted {
        /// Zero-based wave index.
        index: u32,
        /// Tier of the wave's enemies.
        tier: EnemyTier,
    },
    /// Announces that every enemy of a wave was spawned and removed.
    WaveCleared {
        /// Zero-based index of the cleared wave.
        index: u32,
    },
    /// Reports that the infinite-mode wave timer expired before clear.
    WaveTimedOut {
        /// Zero-based index of the expired wave.
        index: u32,
        /// Enemies still alive when the timer expired.
        remaining: u32,
    },
    /// Confirms that the player locked in a reward.
    RewardChosen {
        /// Index identifying the reward effect.
        index: u32,
    },
    /// Announces that the final finite-mode wave was cleared.
    CampaignComplete {
        /// Number of waves cleared over the run.
        waves_cleared: u32,
    },
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Roster kind the enemy was cloned from.
    pub kind: EnemyKind,
    /// Tier within its wave.
    pub tier: EnemyTier,
    /// Current position along the path.
    pub position: Position,
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Current physical armor after reductions.
    pub physic_armor: f32,
    /// Current magical armor after reductions.
    pub magic_armor: f32,
    /// Cosmetic tint of the variant.
    pub tint: TintColor,
    /// Gold credited on kill, fixed at spawn.
    pub gold: i64,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for one enemy, if it is still alive.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Class of the constructed tower.
    pub class: TowerClass,
    /// Slot the tower occupies.
    pub slot: SlotId,
    /// World position of the tower.
    pub position: Position,
    /// Physical-lane upgrade level.
    pub physic_level: u32,
    /// Magical-lane upgrade level.
    pub magic_level: u32,
    /// External buff damage currently applied to the tower.
    pub buff_damage: f32,
}

/// Read-only snapshot describing all constructed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
