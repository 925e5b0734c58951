#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduling for finite campaigns and infinite scaling runs.
//!
//! The scheduler owns the wave state machine
//! (`Idle → Spawning → Monitoring → RewardPending → Spawning …`), emits
//! spawn commands at the wave's cadence, detects clears, and gates wave
//! progression on reward acknowledgement. All randomness flows through
//! per-wave seeds derived from the run's global seed, so identical
//! configurations replay identically.

use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use rampart_core::{
    Command, EnemyArchetype, EnemySpec, EnemyTier, EnemyView, Event, GameMode, TintColor,
};

/// Number of waves in a finite campaign.
pub const FINITE_WAVE_COUNT: u32 = 30;
/// Zero-based index of the finite campaign's mid-boss wave.
pub const FINITE_MIDDLE_BOSS_INDEX: u32 = 19;
/// Wall-clock budget per infinite-mode wave, in time units.
pub const WAVE_TIME_LIMIT: f32 = 120.0;

const RUN_ROSTER_LABEL: &str = "run-roster";

/// Configuration the scheduler is created with.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Mode the run plays in.
    pub mode: GameMode,
    /// Global seed every per-wave seed derives from.
    pub seed: u64,
    /// Enemy health multiplier from the difficulty curve.
    pub health_multiplier: f32,
    /// Armor budget multiplier from the difficulty curve.
    pub defense_multiplier: f32,
    /// Cosmetic tint palette variants are drawn from.
    pub palette: Vec<TintColor>,
    /// Base enemies a wave's variant can be cloned from.
    pub roster: Vec<EnemyArchetype>,
    /// Number of path waypoints; zero refuses to start.
    pub path_waypoints: usize,
}

/// Reasons the scheduler refuses to start a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaveError {
    /// No path waypoints were configured.
    #[error("no path waypoints configured")]
    MissingPath,
    /// The enemy roster holds no base enemies.
    #[error("enemy roster is empty")]
    EmptyRoster,
}

/// Observable phase of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No run started yet.
    Idle,
    /// The current wave is still emitting spawn commands.
    Spawning,
    /// Every enemy spawned; waiting for the field to empty.
    Monitoring,
    /// Wave cleared or timed out; blocked on reward acknowledgement.
    RewardPending,
    /// The finite campaign's final wave was cleared.
    Complete,
}

/// Shape of one infinite-mode wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveProfile {
    /// Tier of the wave's enemies.
    pub tier: EnemyTier,
    /// Number of enemies to spawn.
    pub count: u32,
    /// Total armor points split between the physical and magical lanes.
    pub armor_budget: f32,
}

/// Classifies an infinite-mode wave by its one-based number.
///
/// Every tenth wave is a boss, every remaining fifth a mid-boss, the rest
/// standard filler with a slowly climbing armor budget.
#[must_use]
pub fn infinite_wave_profile(wave_number: u32) -> WaveProfile {
    if wave_number % 10 == 0 {
        WaveProfile {
            tier: EnemyTier::Boss,
            count: 1,
            armor_budget: 150.0 * (wave_number / 10) as f32,
        }
    } else if wave_number % 5 == 0 {
        WaveProfile {
            tier: EnemyTier::MiddleBoss,
            count: 10,
            armor_budget: 70.0 * (wave_number / 5) as f32,
        }
    } else {
        WaveProfile {
            tier: EnemyTier::Default,
            count: 30,
            armor_budget: 20.0 + 5.0 * wave_number as f32,
        }
    }
}

/// Seconds between spawns for the zero-based wave index, floored at 0.1.
#[must_use]
pub fn spawn_interval(wave_index: u32) -> f32 {
    (1.0 - 0.01 * wave_index as f32).max(0.1)
}

#[derive(Clone, Copy, Debug)]
struct Variant {
    archetype: EnemyArchetype,
    physic_armor: f32,
    magic_armor: f32,
    tint: TintColor,
}

#[derive(Clone, Copy, Debug)]
struct WavePlan {
    tier: EnemyTier,
    count: u32,
    interval: f32,
    variant: Variant,
}

#[derive(Clone, Copy, Debug)]
struct RunVariants {
    standard: Variant,
    middle: Variant,
    boss: Variant,
}

/// Drives wave progression for one run.
#[derive(Debug)]
pub struct WaveScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    wave_index: u32,
    plan: Option<WavePlan>,
    spawned: u32,
    spawn_timer: f32,
    wave_timer: f32,
    reward_chosen: bool,
    run_variants: Option<RunVariants>,
}

impl WaveScheduler {
    /// Creates an idle scheduler for the provided configuration.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
            wave_index: 0,
            plan: None,
            spawned: 0,
            spawn_timer: 0.0,
            wave_timer: 0.0,
            reward_chosen: false,
            run_variants: None,
        }
    }

    /// Current phase of the scheduler.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Zero-based index of the wave currently in flight.
    #[must_use]
    pub const fn wave_index(&self) -> u32 {
        self.wave_index
    }

    /// Validates the configuration and starts wave zero.
    ///
    /// Refuses with a typed error when no path or roster is configured;
    /// nothing spawns in that case.
    pub fn begin(&mut self, out_events: &mut Vec<Event>) -> Result<(), WaveError> {
        if self.config.path_waypoints == 0 {
            warn!("refusing wave start: no path waypoints");
            return Err(WaveError::MissingPath);
        }
        if self.config.roster.is_empty() {
            warn!("refusing wave start: empty roster");
            return Err(WaveError::EmptyRoster);
        }
        if self.config.mode == GameMode::Finite {
            let mut rng =
                ChaCha8Rng::seed_from_u64(derive_labeled_seed(self.config.seed, RUN_ROSTER_LABEL));
            self.run_variants = Some(self.pick_run_variants(&mut rng));
        }
        self.begin_wave(0, out_events);
        Ok(())
    }

    /// Unblocks wave progression after the player locked in a reward.
    pub fn notify_reward_chosen(&mut self) {
        if self.state == SchedulerState::RewardPending {
            self.reward_chosen = true;
        }
    }

    /// Advances the scheduler by `dt`, reading the live-enemy snapshot and
    /// appending spawn or sweep commands and progression events.
    pub fn advance(
        &mut self,
        dt: f32,
        enemies: &EnemyView,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        match self.state {
            SchedulerState::Idle | SchedulerState::Complete => {}
            SchedulerState::RewardPending => {
                if self.reward_chosen {
                    let next = self.wave_index + 1;
                    self.begin_wave(next, out_events);
                }
            }
            SchedulerState::Spawning => {
                self.wave_timer += dt;
                if self.timed_out(enemies, out_commands, out_events) {
                    return;
                }
                self.spawn_timer += dt;
                let plan = self.plan.expect("spawning state always carries a plan");
                while self.spawned < plan.count && self.spawn_timer >= plan.interval {
                    self.spawn_timer -= plan.interval;
                    self.spawned += 1;
                    out_commands.push(Command::SpawnEnemy {
                        spec: self.spec_for(&plan),
                    });
                }
                if self.spawned == plan.count {
                    // Clear detection waits one advance so the world has
                    // applied the final spawn command.
                    self.state = SchedulerState::Monitoring;
                }
            }
            SchedulerState::Monitoring => {
                self.wave_timer += dt;
                if self.timed_out(enemies, out_commands, out_events) {
                    return;
                }
                if enemies.is_empty() {
                    self.finish_wave(out_events);
                }
            }
        }
    }

    fn timed_out(
        &mut self,
        enemies: &EnemyView,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if self.config.mode != GameMode::Infinite || self.wave_timer < WAVE_TIME_LIMIT {
            return false;
        }
        let remaining = enemies.len() as u32;
        out_events.push(Event::WaveTimedOut {
            index: self.wave_index,
            remaining,
        });
        // Every survivor punches through for one hit point, then the
        // field is swept without gold.
        out_commands.push(Command::DamagePlayer {
            amount: remaining as f32,
        });
        out_commands.push(Command::ClearEnemies);
        self.state = SchedulerState::RewardPending;
        self.reward_chosen = false;
        true
    }

    fn finish_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.config.mode == GameMode::Finite && self.wave_index == FINITE_WAVE_COUNT - 1 {
            self.state = SchedulerState::Complete;
            out_events.push(Event::CampaignComplete {
                waves_cleared: FINITE_WAVE_COUNT,
            });
            return;
        }
        out_events.push(Event::WaveCleared {
            index: self.wave_index,
        });
        self.state = SchedulerState::RewardPending;
        self.reward_chosen = false;
    }

    fn begin_wave(&mut self, index: u32, out_events: &mut Vec<Event>) {
        let plan = self.plan_wave(index);
        self.wave_index = index;
        self.spawned = 0;
        // Pre-charged so the first enemy spawns on the next advance.
        self.spawn_timer = plan.interval;
        self.wave_timer = 0.0;
        self.reward_chosen = false;
        self.state = SchedulerState::Spawning;
        out_events.push(Event::WaveStarted {
            index,
            tier: plan.tier,
        });
        self.plan = Some(plan);
    }

    fn plan_wave(&mut self, index: u32) -> WavePlan {
        match self.config.mode {
            GameMode::Finite => {
                let run = self
                    .run_variants
                    .expect("finite runs pick their variants at begin");
                if index == FINITE_MIDDLE_BOSS_INDEX {
                    WavePlan {
                        tier: EnemyTier::MiddleBoss,
                        count: 10,
                        interval: 1.5,
                        variant: run.middle,
                    }
                } else if index == FINITE_WAVE_COUNT - 1 {
                    WavePlan {
                        tier: EnemyTier::Boss,
                        count: 1,
                        interval: 1.0,
                        variant: run.boss,
                    }
                } else {
                    WavePlan {
                        tier: EnemyTier::Default,
                        count: 20,
                        interval: 1.0,
                        variant: run.standard,
                    }
                }
            }
            GameMode::Infinite => {
                let profile = infinite_wave_profile(index + 1);
                let mut rng =
                    ChaCha8Rng::seed_from_u64(derive_wave_seed(self.config.seed, index));
                let variant = self.make_variant(&mut rng, profile.armor_budget);
                WavePlan {
                    tier: profile.tier,
                    count: profile.count,
                    interval: spawn_interval(index),
                    variant,
                }
            }
        }
    }

    fn spec_for(&self, plan: &WavePlan) -> EnemySpec {
        EnemySpec {
            kind: plan.variant.archetype.kind,
            tier: plan.tier,
            max_hp: plan.variant.archetype.base_hp * self.config.health_multiplier,
            physic_armor: plan.variant.physic_armor,
            magic_armor: plan.variant.magic_armor,
            move_speed: plan.variant.archetype.move_speed,
            tint: plan.variant.tint,
            wave_index: self.wave_index,
        }
    }

    fn make_variant(&self, rng: &mut ChaCha8Rng, armor_budget: f32) -> Variant {
        let archetype = self.config.roster[rng.gen_range(0..self.config.roster.len())];
        self.variant_from(rng, archetype, armor_budget)
    }

    fn variant_from(
        &self,
        rng: &mut ChaCha8Rng,
        archetype: EnemyArchetype,
        armor_budget: f32,
    ) -> Variant {
        let budget = armor_budget * self.config.defense_multiplier;
        // Uniform split with no per-lane floor; either lane may get it all.
        let physic_armor = rng.gen_range(0.0..=budget.max(0.0));
        let tint = if self.config.palette.is_empty() {
            TintColor::from_rgb(255, 255, 255)
        } else {
            self.config.palette[rng.gen_range(0..self.config.palette.len())]
        };
        Variant {
            archetype,
            physic_armor,
            magic_armor: budget - physic_armor,
            tint,
        }
    }

    fn pick_run_variants(&self, rng: &mut ChaCha8Rng) -> RunVariants {
        let mut pool: Vec<usize> = (0..self.config.roster.len()).collect();
        let mut draw = |rng: &mut ChaCha8Rng, pool: &mut Vec<usize>| -> EnemyArchetype {
            if pool.is_empty() {
                pool.extend(0..self.config.roster.len());
            }
            let picked = pool.remove(rng.gen_range(0..pool.len()));
            self.config.roster[picked]
        };
        let boss = draw(rng, &mut pool);
        let middle = draw(rng, &mut pool);
        let standard = draw(rng, &mut pool);
        RunVariants {
            boss: self.variant_from(rng, boss, 100.0),
            middle: self.variant_from(rng, middle, 50.0),
            standard: self.variant_from(rng, standard, 30.0),
        }
    }
}

fn derive_wave_seed(global_seed: u64, wave_index: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave_index.to_le_bytes());
    finalize_seed(hasher)
}

fn derive_labeled_seed(global_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}
