//! Cross-agent effects requested during the behavior phase.
//!
//! An agent may only mutate itself while its behavior runs.  Anything that
//! touches another agent, or removes the agent from the registry, is returned
//! as an [`Intent`] and applied by the driver after every agent has ticked.

use af_agent::{Agent, LandingTarget};
use af_core::{AgentId, LifecycleState};

/// Timer given to a perched agent that joins a flockmate's take-off.
pub const JOIN_TAKEOFF_TICKS: i32 = 5;

/// Base landing cooldown after any take-off; time spent perched is added.
pub const TAKEOFF_COOLDOWN: u32 = 100;

/// Why an agent is leaving the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DespawnReason {
    /// Fell below the world's floor.
    FellOutOfWorld,
    /// Dying for longer than the grace period.
    Expired,
    /// No participating player within despawn range.
    OutOfRange,
}

impl DespawnReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DespawnReason::FellOutOfWorld => "fell_out_of_world",
            DespawnReason::Expired        => "expired",
            DespawnReason::OutOfRange     => "out_of_range",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Ask a flockmate to land at `target`.  Ignored unless the recipient is
    /// still flying when the intent is applied.
    InviteLanding { to: AgentId, target: LandingTarget },

    /// Ask a perched flockmate to take off.  Ignored unless the recipient is
    /// still perched when the intent is applied.
    JoinTakeoff { to: AgentId },

    /// Remove the emitting agent from the registry.
    Despawn(DespawnReason),
}

impl Intent {
    /// The agent an intent is addressed to, `None` for self-directed intents.
    pub fn recipient(&self) -> Option<AgentId> {
        match self {
            Intent::InviteLanding { to, .. } | Intent::JoinTakeoff { to } => Some(*to),
            Intent::Despawn(_) => None,
        }
    }

    /// Apply a cross-agent intent to its recipient.  Returns `true` if the
    /// recipient changed state.
    pub fn apply_to(&self, recipient: &mut Agent) -> bool {
        match self {
            Intent::InviteLanding { target, .. } => accept_landing(recipient, *target),
            Intent::JoinTakeoff { .. } => join_takeoff(recipient),
            Intent::Despawn(_) => false,
        }
    }
}

fn accept_landing(agent: &mut Agent, target: LandingTarget) -> bool {
    if agent.state != LifecycleState::Flying {
        return false;
    }
    agent.state = LifecycleState::Landing;
    agent.landing = Some(target);
    true
}

fn join_takeoff(agent: &mut Agent) -> bool {
    if agent.state != LifecycleState::Perched {
        return false;
    }
    agent.state = LifecycleState::TakingOff;
    agent.pose.frame = 1;
    agent.perch_timer = JOIN_TAKEOFF_TICKS;
    agent.landing_cooldown = TAKEOFF_COOLDOWN + agent.perched_ticks;
    agent.perch = None;
    true
}
