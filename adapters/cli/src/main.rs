#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Rampart combat simulation.
//!
//! Wires the world, targeting, wave scheduling, stats, difficulty, and
//! reward systems into a fixed-timestep loop, auto-resolving reward
//! panels so whole campaigns replay deterministically from a seed.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use log::{debug, info, warn};

use rampart_core::{
    ArchetypeStore, AttackTiming, Command, DamageType, EnemyArchetype, EnemyKind, EquipmentId,
    Event, GameMode, Position, SlotId, StatKind, StatModifier, TowerArchetype, TowerClass,
    UpgradeCoefficient,
};
use rampart_system_difficulty::DifficultyCurve;
use rampart_system_rewards::{
    apply_offer, first_wave_perk_pool, skip_option, standard_pool, DrawContext, RewardKind,
    RewardSelector,
};
use rampart_system_stats::StatAggregator;
use rampart_system_targeting::TowerTargeting;
use rampart_system_waves::{SchedulerConfig, SchedulerState, WaveScheduler};
use rampart_world::{apply, query, World};

/// Fixed simulation timestep, in seconds.
const TICK_SECONDS: f32 = 0.1;

/// Build order the auto-buyer cycles through.
const BUILD_ORDER: [TowerClass; 5] = [
    TowerClass::Arrow,
    TowerClass::Laser,
    TowerClass::Spear,
    TowerClass::Priests,
    TowerClass::Sword,
];

/// Run mode selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Thirty-wave campaign with a fixed run roster.
    Finite,
    /// Endless scaling waves with a per-wave time limit.
    Infinite,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Finite => GameMode::Finite,
            ModeArg::Infinite => GameMode::Infinite,
        }
    }
}

/// Headless Rampart combat simulation.
#[derive(Debug, Parser)]
#[command(name = "rampart")]
struct Args {
    /// Run mode.
    #[arg(long, value_enum, default_value = "finite")]
    mode: ModeArg,

    /// Difficulty level, clamped to 1..=100.
    #[arg(long, default_value_t = 1)]
    difficulty: u32,

    /// Global seed; identical seeds replay identical runs.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Simulation tick budget before the run is cut short.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let outcome = run(&args)?;
    print_summary(&args, &outcome);
    Ok(())
}

/// Final tallies printed once the loop ends.
#[derive(Debug)]
struct RunOutcome {
    waves_cleared: u32,
    campaign_complete: bool,
    defeated: bool,
    ticks: u64,
    final_hp: f32,
    final_gold: i64,
    final_skill_points: f32,
    final_currency: u64,
    towers_placed: usize,
}

fn run(args: &Args) -> Result<RunOutcome> {
    let mode = GameMode::from(args.mode);
    let curve = DifficultyCurve::new(args.difficulty);
    let path = serpentine_path();
    let slots = tower_slots(&path);
    let path_waypoints = path.len();

    let mut events = Vec::new();
    let mut commands = Vec::new();

    // A fixed loadout stands in for a persisted equipment screen; folding it
    // before construction lets start-gold contributions seed the bank.
    let mut aggregator = StatAggregator::new();
    aggregator.recompute(&starting_loadout(), &mut events);

    let mut world = World::new(mode, path, tower_catalog(), aggregator.effective());
    let mut targeting = TowerTargeting::new();
    let mut selector = RewardSelector::new(args.seed);
    let mut scheduler = WaveScheduler::new(SchedulerConfig {
        mode,
        seed: args.seed,
        health_multiplier: curve.health_multiplier(),
        defense_multiplier: curve.defense_multiplier(),
        palette: curve.tint_palette(),
        roster: default_roster(),
        path_waypoints,
    });

    scheduler
        .begin(&mut events)
        .context("starting the wave schedule")?;
    info!(
        "run started: mode {mode:?}, difficulty {}, seed {}",
        curve.level(),
        args.seed
    );

    let mut next_slot = 0;
    let mut build_cursor = 0;
    let mut first_perks_offered = false;
    let mut owned_equipment: Vec<EquipmentId> = Vec::new();
    let mut waves_cleared = 0;
    let mut campaign_complete = false;
    let mut ticks = 0;

    while ticks < args.max_ticks {
        ticks += 1;
        apply(&mut world, Command::Tick { dt: TICK_SECONDS }, &mut events);

        {
            let towers = query::tower_view(&world);
            let enemies = query::enemy_view(&world);
            targeting.advance(
                TICK_SECONDS,
                &towers,
                &enemies,
                query::archetypes(&world),
                query::stats(&world),
                &mut commands,
            );
        }
        flush(&mut world, &mut commands, &mut events);

        {
            let enemies = query::enemy_view(&world);
            scheduler.advance(TICK_SECONDS, &enemies, &mut commands, &mut events);
        }
        flush(&mut world, &mut commands, &mut events);

        buy_towers(
            &mut world,
            &slots,
            &mut next_slot,
            &mut build_cursor,
            &mut events,
        );

        let mut stop = false;
        for event in events.drain(..) {
            match event {
                Event::WaveStarted { index, tier } => {
                    info!("wave {index} started ({tier:?})");
                }
                Event::WaveCleared { index } => {
                    info!("wave {index} cleared");
                    waves_cleared = index + 1;
                    acknowledge_wave_clear(
                        &mut world,
                        &mut scheduler,
                        &mut selector,
                        &mut owned_equipment,
                        &mut first_perks_offered,
                        index,
                    );
                }
                Event::WaveTimedOut { index, remaining } => {
                    warn!("wave {index} timed out with {remaining} survivors");
                    waves_cleared = index + 1;
                    acknowledge_wave_clear(
                        &mut world,
                        &mut scheduler,
                        &mut selector,
                        &mut owned_equipment,
                        &mut first_perks_offered,
                        index,
                    );
                }
                Event::CampaignComplete { waves_cleared: total } => {
                    info!("campaign complete: {total} waves cleared");
                    waves_cleared = total;
                    campaign_complete = true;
                    stop = true;
                }
                Event::PlayerDefeated => {
                    warn!("player defeated on wave {}", scheduler.wave_index());
                    stop = true;
                }
                Event::TowerPlacementRejected { class, slot, reason } => {
                    debug!("placement of {class:?} at {slot:?} rejected: {reason:?}");
                }
                _ => {}
            }
        }
        if stop || scheduler.state() == SchedulerState::Complete {
            break;
        }
        if query::player(&world).is_defeated() {
            break;
        }
    }

    let player = query::player(&world);
    Ok(RunOutcome {
        waves_cleared,
        campaign_complete,
        defeated: player.is_defeated(),
        ticks,
        final_hp: player.hp(),
        final_gold: player.gold(),
        final_skill_points: player.skill_points(),
        final_currency: player.currency(),
        towers_placed: next_slot,
    })
}

fn flush(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        apply(world, command, events);
    }
}

/// Settles the reward panel for a finished wave and unblocks the next one.
///
/// Grants the flat wave-clear stipend and interest first, then draws two
/// weighted offers plus the skip option and locks in the top offer. The
/// first finished wave draws from the perk pool instead.
fn acknowledge_wave_clear(
    world: &mut World,
    scheduler: &mut WaveScheduler,
    selector: &mut RewardSelector,
    owned_equipment: &mut Vec<EquipmentId>,
    first_perks_offered: &mut bool,
    wave_index: u32,
) {
    let mut commands = Vec::new();
    let mut events = Vec::new();

    let perks = query::perks(world);
    let specialist = perks.specialist;
    let interest = perks.interest;
    if !specialist {
        commands.push(Command::GrantSkillPoints { amount: 20.0 });
    }
    if interest {
        commands.push(Command::GrantGold {
            amount: query::player(world).gold() / 10,
        });
    }

    let pool = if *first_perks_offered {
        standard_pool()
    } else {
        *first_perks_offered = true;
        first_wave_perk_pool(selector.roll_sacrifice_class())
    };
    let player = query::player(world);
    let context = DrawContext {
        player_at_full_hp: player.hp() >= player.max_hp(),
        specialist,
        wave_index,
        owned_equipment,
    };
    let skip = skip_option();
    let offers = selector.draw_offers(&pool, Some(&skip), 2, &context);

    // Auto-resolve: take the first drawn offer, fall back to skip.
    if let Some(chosen) = offers.first() {
        info!("wave {wave_index} reward: {:?} ({})", chosen.kind, chosen.value);
        if let RewardKind::Equipment { id, .. } = chosen.kind {
            owned_equipment.push(id);
        }
        apply_offer(chosen, &mut commands, &mut events);
    }

    for command in commands.drain(..) {
        apply(world, command, &mut events);
    }
    for event in events.drain(..) {
        if let Event::RewardChosen { index } = event {
            debug!("reward {index} locked in");
        }
    }
    scheduler.notify_reward_chosen();
}

/// Places the next tower in the build order whenever gold allows.
fn buy_towers(
    world: &mut World,
    slots: &[(SlotId, Position)],
    next_slot: &mut usize,
    build_cursor: &mut usize,
    events: &mut Vec<Event>,
) {
    while *next_slot < slots.len() {
        let mut class = BUILD_ORDER[*build_cursor % BUILD_ORDER.len()];
        if query::perks(world).sacrificed_class == Some(class) {
            *build_cursor += 1;
            class = BUILD_ORDER[*build_cursor % BUILD_ORDER.len()];
        }
        let Some(archetype) = query::archetypes(world).get(class) else {
            return;
        };
        if query::player(world).gold() < archetype.cost {
            return;
        }
        let (slot, position) = slots[*next_slot];
        apply(
            world,
            Command::PlaceTower {
                class,
                slot,
                position,
            },
            events,
        );
        *next_slot += 1;
        *build_cursor += 1;
    }
}

/// Serpentine enemy path sweeping left-to-right and back across five rows.
fn serpentine_path() -> Vec<Position> {
    const ROWS: u32 = 5;
    const WIDTH: f32 = 14.0;
    const ROW_SPACING: f32 = 2.0;

    let mut points = Vec::new();
    for row in 0..ROWS {
        let y = row as f32 * ROW_SPACING;
        let (from, to) = if row % 2 == 0 {
            (Vec2::new(0.0, y), Vec2::new(WIDTH, y))
        } else {
            (Vec2::new(WIDTH, y), Vec2::new(0.0, y))
        };
        points.push(from);
        points.push(to);
    }
    points
        .into_iter()
        .map(|point| Position::new(point.x, point.y))
        .collect()
}

/// Tower slots hugging the midpoint of every path segment, alternating
/// sides so coverage overlaps between rows.
fn tower_slots(path: &[Position]) -> Vec<(SlotId, Position)> {
    let mut slots = Vec::new();
    for (index, pair) in path.windows(2).enumerate() {
        let from = Vec2::new(pair[0].x(), pair[0].y());
        let to = Vec2::new(pair[1].x(), pair[1].y());
        let midpoint = from.lerp(to, 0.5);
        let side = if index % 2 == 0 { 1.0 } else { -1.0 };
        let slot = midpoint + Vec2::new(0.0, side);
        slots.push((SlotId::new(index as u32), Position::new(slot.x, slot.y)));
    }
    slots
}

/// Fixed equipment loadout applied at run start.
fn starting_loadout() -> Vec<StatModifier> {
    vec![
        StatModifier {
            kind: StatKind::GlobalAttackDamage,
            value: 10.0,
        },
        StatModifier {
            kind: StatKind::GlobalAttackSpeed,
            value: 5.0,
        },
        StatModifier {
            kind: StatKind::GoldPerSecond,
            value: 1.0,
        },
        StatModifier {
            kind: StatKind::StartGold,
            value: 100.0,
        },
    ]
}

/// Tower templates available for construction.
fn tower_catalog() -> ArchetypeStore {
    let flat = UpgradeCoefficient {
        damage: 2.0,
        damage_quadratic: 0.1,
        penetrate: 1.0,
        penetrate_quadratic: 0.05,
    };
    ArchetypeStore::new(vec![
        TowerArchetype {
            class: TowerClass::Arrow,
            damage: 12.0,
            physic_penetrate: 5.0,
            magic_penetrate: 0.0,
            attack_speed: 30.0,
            range: 3.5,
            cost: 100,
            damage_type: DamageType::Physical,
            multi_target: false,
            timing: AttackTiming::Projectile,
            coefficient: flat,
            percent_max_hp_damage: 0.0,
        },
        TowerArchetype {
            class: TowerClass::Laser,
            damage: 4.0,
            physic_penetrate: 0.0,
            magic_penetrate: 6.0,
            attack_speed: 45.0,
            range: 3.0,
            cost: 120,
            damage_type: DamageType::Magical,
            multi_target: false,
            timing: AttackTiming::Continuous,
            coefficient: flat,
            percent_max_hp_damage: 0.002,
        },
        TowerArchetype {
            class: TowerClass::Priests,
            damage: 10.0,
            physic_penetrate: 3.0,
            magic_penetrate: 3.0,
            attack_speed: 20.0,
            range: 2.5,
            cost: 160,
            damage_type: DamageType::Hybrid,
            multi_target: true,
            timing: AttackTiming::Instant,
            coefficient: flat,
            percent_max_hp_damage: 0.0,
        },
        TowerArchetype {
            class: TowerClass::Spear,
            damage: 20.0,
            physic_penetrate: 10.0,
            magic_penetrate: 0.0,
            attack_speed: 18.0,
            range: 4.0,
            cost: 140,
            damage_type: DamageType::Physical,
            multi_target: false,
            timing: AttackTiming::Projectile,
            coefficient: flat,
            percent_max_hp_damage: 0.01,
        },
        TowerArchetype {
            class: TowerClass::Sword,
            damage: 25.0,
            physic_penetrate: 8.0,
            magic_penetrate: 0.0,
            attack_speed: 25.0,
            range: 1.5,
            cost: 90,
            damage_type: DamageType::Physical,
            multi_target: false,
            timing: AttackTiming::Instant,
            coefficient: flat,
            percent_max_hp_damage: 0.0,
        },
    ])
}

/// Base enemies waves draw their variants from.
fn default_roster() -> Vec<EnemyArchetype> {
    vec![
        EnemyArchetype {
            kind: EnemyKind::new(0),
            base_hp: 40.0,
            move_speed: 1.0,
        },
        EnemyArchetype {
            kind: EnemyKind::new(1),
            base_hp: 60.0,
            move_speed: 0.8,
        },
        EnemyArchetype {
            kind: EnemyKind::new(2),
            base_hp: 30.0,
            move_speed: 1.4,
        },
        EnemyArchetype {
            kind: EnemyKind::new(3),
            base_hp: 90.0,
            move_speed: 0.7,
        },
    ]
}

fn print_summary(args: &Args, outcome: &RunOutcome) {
    let verdict = if outcome.campaign_complete {
        "campaign complete"
    } else if outcome.defeated {
        "defeated"
    } else {
        "tick budget exhausted"
    };
    println!("rampart run summary");
    println!("  mode:          {:?}", args.mode);
    println!("  difficulty:    {}", DifficultyCurve::new(args.difficulty).level());
    println!("  seed:          {}", args.seed);
    println!("  verdict:       {verdict}");
    println!("  waves cleared: {}", outcome.waves_cleared);
    println!("  ticks:         {}", outcome.ticks);
    println!("  hp:            {:.1}", outcome.final_hp);
    println!("  gold:          {}", outcome.final_gold);
    println!("  skill points:  {:.0}", outcome.final_skill_points);
    println!("  currency:      {}", outcome.final_currency);
    println!("  towers:        {}", outcome.towers_placed);
}
