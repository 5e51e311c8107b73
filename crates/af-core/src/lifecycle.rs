//! Agent lifecycle state shared by the agent, behavior and driver crates.

/// The state-machine phase an agent is in.
///
/// `Dying` is terminal: once entered it is never left, and the agent is
/// removed from the registry from within it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleState {
    /// Free flight: flocking, goal seeking, scanning for perches.
    #[default]
    Flying,
    /// Descending onto a chosen perch cell.
    Landing,
    /// Sitting on a perch cell.
    Perched,
    /// Short climb out of a perch before resuming flight.
    TakingOff,
    /// Falling out of the world at the end of the agent's lifetime.
    Dying,
}

impl LifecycleState {
    /// All states, in declaration order.
    pub const ALL: [LifecycleState; 5] = [
        LifecycleState::Flying,
        LifecycleState::Landing,
        LifecycleState::Perched,
        LifecycleState::TakingOff,
        LifecycleState::Dying,
    ];

    /// `true` for states that influence neighbors' flocking.  Perched and
    /// dying agents are ignored by cohesion, alignment and separation.
    #[inline]
    pub fn is_active(self) -> bool {
        !matches!(self, LifecycleState::Perched | LifecycleState::Dying)
    }

    /// Lowercase label, used by render sprite keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Flying    => "flying",
            LifecycleState::Landing   => "landing",
            LifecycleState::Perched   => "perched",
            LifecycleState::TakingOff => "taking_off",
            LifecycleState::Dying     => "dying",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
