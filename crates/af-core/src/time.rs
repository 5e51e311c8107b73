//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter advanced once per host
//! game-loop step.  Every timer in the simulation (goal validity, perch
//! duration, landing cooldown, spawn interval) counts ticks, never wall time.

use std::fmt;

/// Ticks in one full day/night cycle of the host world.
pub const DAY_LENGTH_TICKS: u64 = 24_000;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The following tick.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// `true` on every `interval`-th tick (tick 0 included).  An interval of
    /// zero never fires.
    #[inline]
    pub fn is_every(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── DayPhase ──────────────────────────────────────────────────────────────────

/// Coarse time of day used for spawn eligibility.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Phase for a world day-time counter: the first half of each cycle is day.
    pub fn from_day_time(day_time: u64) -> DayPhase {
        if day_time % DAY_LENGTH_TICKS < DAY_LENGTH_TICKS / 2 {
            DayPhase::Day
        } else {
            DayPhase::Night
        }
    }

    #[inline]
    pub fn is_day(self) -> bool {
        matches!(self, DayPhase::Day)
    }
}
