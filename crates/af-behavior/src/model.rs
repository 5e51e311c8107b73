//! The `BehaviorModel` trait, the per-species extension point.

use af_agent::Agent;

use crate::{Intent, TickContext};

/// Pluggable per-tick agent behavior.
///
/// The driver calls [`tick`][Self::tick] once per live agent per tick with
/// exclusive access to that agent and a shared [`TickContext`].  The model
/// mutates the agent directly (state, velocity, position, timers) and returns
/// [`Intent`]s for anything that affects other agents or the registry.
///
/// # Thread safety
///
/// Agents may be ticked in parallel, so implementations must be
/// `Send + Sync`.  Per-agent state, randomness included, lives on the
/// [`Agent`]; the model itself holds configuration at most.
pub trait BehaviorModel: Send + Sync + 'static {
    fn tick(&self, agent: &mut Agent, ctx: &TickContext<'_>) -> Vec<Intent>;

    /// Short name for log lines.
    fn name(&self) -> &'static str {
        "behavior"
    }
}
