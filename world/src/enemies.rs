use rampart_core::{EnemyId, EnemyKind, EnemySpec, EnemyTier, PerkState, Position, TintColor};

/// Gold value of an enemy belonging to the given wave, before perk scaling.
///
/// Linear growth with a quadratic late-game ramp past wave 19.
#[must_use]
pub(crate) fn base_gold_value(wave_index: u32) -> i64 {
    let wave = i64::from(wave_index);
    let mut gold = 10 + 5 * wave;
    if wave >= 20 {
        gold += 10 * (wave - 19) * (wave - 19);
    }
    gold
}

/// A live enemy traversing the path.
#[derive(Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) tier: EnemyTier,
    pub(crate) position: Position,
    pub(crate) waypoint_index: usize,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) physic_armor: f32,
    pub(crate) magic_armor: f32,
    pub(crate) move_speed: f32,
    pub(crate) tint: TintColor,
    pub(crate) gold: i64,
    shred_sources: Vec<u32>,
}

impl Enemy {
    /// Materializes a spawn request at the path start, fixing the gold
    /// value and perk-scaled move speed for the enemy's whole lifetime.
    pub(crate) fn from_spec(id: EnemyId, spec: &EnemySpec, start: Position, perks: &PerkState) -> Self {
        let gold = (base_gold_value(spec.wave_index) as f64 * f64::from(perks.gold_multiplier))
            .round() as i64;
        Self {
            id,
            kind: spec.kind,
            tier: spec.tier,
            position: start,
            waypoint_index: 1,
            hp: spec.max_hp,
            max_hp: spec.max_hp,
            physic_armor: spec.physic_armor.max(0.0),
            magic_armor: spec.magic_armor.max(0.0),
            move_speed: spec.move_speed * perks.enemy_speed_multiplier,
            tint: spec.tint,
            gold,
            shred_sources: Vec::new(),
        }
    }

    /// Applies an armor reduction once per debuff source; repeat
    /// applications from the same source are ignored.
    ///
    /// Returns whether the shred was applied.
    pub(crate) fn shred_armor(&mut self, source: u32, physical: f32, magical: f32) -> bool {
        if self.shred_sources.contains(&source) {
            return false;
        }
        self.shred_sources.push(source);
        self.physic_armor = (self.physic_armor - physical).max(0.0);
        self.magic_armor = (self.magic_armor - magical).max(0.0);
        true
    }
}
