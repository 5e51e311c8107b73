//! `af-sim` — tick driver for the atmospheric fauna simulation.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ① Spawn     — AmbientSpawner on its interval; on_spawn for new agents.
//!   ② Cull      — agents out of range of every player are removed.
//!   ③ Snapshot  — FlockIndex over all agents in the world.
//!   ④ Behavior  — BehaviorModel::tick for each agent
//!                 (parallel with the `parallel` feature).
//!   ⑤ Apply     — in arena order:
//!                   InviteLanding / JoinTakeoff → delivered to recipient
//!                   Despawn(reason)             → removed, on_despawn
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the behavior phase on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use af_agent::SpeciesCatalog;
//! use af_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SpeciesCatalog::with_defaults()).seed(42).build()?;
//! sim.run_ticks(1_000, &world, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickStats};
