#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tower targeting state machines.
//!
//! Each constructed tower runs a two-state machine: `Searching` re-scans
//! the enemy snapshot every tick, `Attacking` validates its committed
//! targets, strikes once at the timing point of the attack cycle, and
//! returns to searching when the cycle elapses. The system owns no world
//! state; it reads snapshots and emits [`Command::Strike`] batches.

use rampart_core::{
    ArchetypeStore, AttackTiming, Command, EffectiveStats, EnemyId, EnemyView, TowerArchetype,
    TowerId, TowerSnapshot, TowerView,
};
use rampart_system_damage::{attack_cycle, effective_attack_speed, effective_range};

/// Fraction of the attack cycle at which a projectile strike lands.
pub const PROJECTILE_STRIKE_RATIO: f32 = 0.35;
/// Fraction of the attack cycle at which an instant strike lands.
pub const INSTANT_STRIKE_RATIO: f32 = 0.2;

#[derive(Clone, Debug, PartialEq)]
enum EngagementState {
    Searching,
    Attacking {
        targets: Vec<EnemyId>,
        elapsed: f32,
        cycle: f32,
        strike_at: f32,
        struck: bool,
    },
}

#[derive(Clone, Debug)]
struct Engagement {
    tower: TowerId,
    state: EngagementState,
}

/// Targeting system driving one state machine per constructed tower.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    engagements: Vec<Engagement>,
    cancelled: Vec<TowerId>,
    scratch: Vec<EnemyId>,
}

impl TowerTargeting {
    /// Creates a new targeting system with no tracked towers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that a tower abandon its current engagement.
    ///
    /// Honored cooperatively at the start of the next [`advance`] call;
    /// a strike already committed this tick still applies.
    ///
    /// [`advance`]: TowerTargeting::advance
    pub fn cancel(&mut self, tower: TowerId) {
        if !self.cancelled.contains(&tower) {
            self.cancelled.push(tower);
        }
    }

    /// Advances every tower's state machine by `dt`, appending strike
    /// commands to `out`.
    ///
    /// Towers missing from the view lose their state; newly placed towers
    /// start searching. Iteration follows the view's id order, so output
    /// is deterministic for identical snapshots.
    pub fn advance(
        &mut self,
        dt: f32,
        towers: &TowerView,
        enemies: &EnemyView,
        archetypes: &ArchetypeStore,
        stats: &EffectiveStats,
        out: &mut Vec<Command>,
    ) {
        self.sync_with(towers);
        self.honor_cancellations();

        for engagement in self.engagements.iter_mut() {
            let Some(snapshot) = towers.iter().find(|tower| tower.id == engagement.tower) else {
                continue;
            };
            let Some(archetype) = archetypes.get(snapshot.class) else {
                continue;
            };
            advance_engagement(engagement, dt, snapshot, archetype, enemies, stats, &mut self.scratch, out);
        }
    }

    fn sync_with(&mut self, towers: &TowerView) {
        self.engagements
            .retain(|engagement| towers.iter().any(|tower| tower.id == engagement.tower));
        for tower in towers.iter() {
            if !self
                .engagements
                .iter()
                .any(|engagement| engagement.tower == tower.id)
            {
                self.engagements.push(Engagement {
                    tower: tower.id,
                    state: EngagementState::Searching,
                });
            }
        }
        self.engagements.sort_by_key(|engagement| engagement.tower);
    }

    fn honor_cancellations(&mut self) {
        for tower in self.cancelled.drain(..) {
            if let Some(engagement) = self
                .engagements
                .iter_mut()
                .find(|engagement| engagement.tower == tower)
            {
                engagement.state = EngagementState::Searching;
            }
        }
    }
}

fn strike_ratio(timing: AttackTiming) -> f32 {
    match timing {
        AttackTiming::Projectile => PROJECTILE_STRIKE_RATIO,
        AttackTiming::Instant => INSTANT_STRIKE_RATIO,
        AttackTiming::Continuous => 0.0,
    }
}

fn collect_targets(
    snapshot: &TowerSnapshot,
    archetype: &TowerArchetype,
    enemies: &EnemyView,
    stats: &EffectiveStats,
    scratch: &mut Vec<EnemyId>,
) {
    scratch.clear();
    let range = effective_range(archetype.range, stats);
    if archetype.multi_target {
        for enemy in enemies.iter() {
            if enemy.position.distance(snapshot.position) <= range {
                scratch.push(enemy.id);
            }
        }
    } else {
        let mut best: Option<(f32, EnemyId)> = None;
        // View order is ascending by id; strict comparison keeps the
        // smaller id on distance ties.
        for enemy in enemies.iter() {
            let distance = enemy.position.distance(snapshot.position);
            if distance > range {
                continue;
            }
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, enemy.id)),
            }
        }
        if let Some((_, enemy)) = best {
            scratch.push(enemy);
        }
    }
}

fn retain_valid_targets(
    targets: &mut Vec<EnemyId>,
    snapshot: &TowerSnapshot,
    archetype: &TowerArchetype,
    enemies: &EnemyView,
    stats: &EffectiveStats,
) {
    let range = effective_range(archetype.range, stats);
    targets.retain(|target| {
        enemies
            .get(*target)
            .is_some_and(|enemy| enemy.position.distance(snapshot.position) <= range)
    });
}

#[allow(clippy::too_many_arguments)]
fn advance_engagement(
    engagement: &mut Engagement,
    dt: f32,
    snapshot: &TowerSnapshot,
    archetype: &TowerArchetype,
    enemies: &EnemyView,
    stats: &EffectiveStats,
    scratch: &mut Vec<EnemyId>,
    out: &mut Vec<Command>,
) {
    match &mut engagement.state {
        EngagementState::Searching => {
            collect_targets(snapshot, archetype, enemies, stats, scratch);
            if scratch.is_empty() {
                return;
            }
            if archetype.timing == AttackTiming::Continuous {
                // No windup: strike now and keep scanning next tick.
                out.push(Command::Strike {
                    tower: engagement.tower,
                    targets: scratch.clone(),
                });
                return;
            }
            let speed = effective_attack_speed(archetype.attack_speed, stats);
            let cycle = attack_cycle(speed);
            engagement.state = EngagementState::Attacking {
                targets: scratch.clone(),
                elapsed: 0.0,
                cycle,
                strike_at: cycle * strike_ratio(archetype.timing),
                struck: false,
            };
        }
        EngagementState::Attacking {
            targets,
            elapsed,
            cycle,
            strike_at,
            struck,
        } => {
            retain_valid_targets(targets, snapshot, archetype, enemies, stats);
            if targets.is_empty() {
                engagement.state = EngagementState::Searching;
                return;
            }
            *elapsed += dt;
            if !*struck && *elapsed >= *strike_at {
                out.push(Command::Strike {
                    tower: engagement.tower,
                    targets: targets.clone(),
                });
                *struck = true;
            }
            if *elapsed >= *cycle {
                engagement.state = EngagementState::Searching;
            }
        }
    }
}
