#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty scaling curve for enemy health, defense, and cosmetics.
//!
//! A selected difficulty level (clamped to 1..=100) maps onto piecewise
//! multipliers with deliberate jumps at the band boundaries, and onto a
//! cosmetic tint palette that gains one themed band per 20 levels.

use rampart_core::TintColor;

/// Lowest selectable difficulty level.
pub const MIN_LEVEL: u32 = 1;
/// Highest selectable difficulty level.
pub const MAX_LEVEL: u32 = 100;

/// Difficulty curve evaluated for one clamped level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyCurve {
    level: u32,
}

impl DifficultyCurve {
    /// Creates a curve for the provided level, clamping it into the
    /// supported range.
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
        }
    }

    /// The clamped difficulty level the curve evaluates at.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Enemy health multiplier for the level.
    ///
    /// Piecewise linear with jumps at levels 20 and 80: the early band
    /// climbs from 1.0, the middle band restarts at 4.0 with a shallower
    /// slope, and the late band restarts at 8.0.
    #[must_use]
    pub fn health_multiplier(&self) -> f32 {
        let level = self.level as f32;
        if self.level < 20 {
            1.0 + (level - 1.0) * 0.1
        } else if self.level < 80 {
            4.0 + (level - 20.0) * 0.05
        } else {
            8.0 + (level - 80.0) * 0.1
        }
    }

    /// Enemy defense multiplier for the level; shares the health curve.
    #[must_use]
    pub fn defense_multiplier(&self) -> f32 {
        self.health_multiplier()
    }

    /// Cosmetic tint palette unlocked at the level.
    ///
    /// Always contains the untinted base entry; each 20-level threshold
    /// appends one themed band of four colors (pastel, gem, earth,
    /// corrupted).
    #[must_use]
    pub fn tint_palette(&self) -> Vec<TintColor> {
        let mut palette = vec![TintColor::from_rgb(255, 255, 255)];
        if self.level >= 20 {
            palette.extend([
                TintColor::from_rgb(173, 216, 230),
                TintColor::from_rgb(255, 182, 193),
                TintColor::from_rgb(144, 238, 144),
                TintColor::from_rgb(255, 255, 160),
            ]);
        }
        if self.level >= 40 {
            palette.extend([
                TintColor::from_rgb(220, 20, 60),
                TintColor::from_rgb(0, 0, 205),
                TintColor::from_rgb(0, 128, 0),
                TintColor::from_rgb(148, 0, 211),
            ]);
        }
        if self.level >= 60 {
            palette.extend([
                TintColor::from_rgb(139, 69, 19),
                TintColor::from_rgb(85, 107, 47),
                TintColor::from_rgb(112, 128, 144),
                TintColor::from_rgb(210, 180, 140),
            ]);
        }
        if self.level >= 80 {
            palette.extend([
                TintColor::from_rgb(128, 0, 128),
                TintColor::from_rgb(50, 205, 50),
                TintColor::from_rgb(255, 140, 0),
                TintColor::from_rgb(0, 206, 209),
            ]);
        }
        palette
    }
}
