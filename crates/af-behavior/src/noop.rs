//! A no-op behavior model: agents hang in place and never emit intents.

use af_agent::Agent;

use crate::{BehaviorModel, Intent, TickContext};

/// A [`BehaviorModel`] that only records the previous position.
///
/// Useful in tests that exercise the registry, spawner or driver without
/// agents wandering off.
pub struct NoopBehavior;

impl BehaviorModel for NoopBehavior {
    fn tick(&self, agent: &mut Agent, _ctx: &TickContext<'_>) -> Vec<Intent> {
        agent.previous = agent.position;
        vec![]
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
