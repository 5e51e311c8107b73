//! `af-behavior` — per-tick agent behavior.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`context`]  | `TickContext<'a>`, the read-only tick snapshot shared by all agents |
//! | [`model`]    | `BehaviorModel` trait                                           |
//! | [`intent`]   | `Intent` (group perch, group take-off, despawn), `DespawnReason` |
//! | [`steering`] | cohesion, alignment, separation, goal seeking, speed clamps     |
//! | [`probe`]    | ground sampling, look-ahead collision, perch-site tests         |
//! | [`flock`]    | `FlockBehavior`, the five-state bird state machine               |
//! | [`noop`]     | `NoopBehavior`, a placeholder that never moves                   |
//!
//! # Design notes
//!
//! The tick loop in af-sim runs in two phases:
//!
//! 1. **Behavior phase** (optionally parallel): every agent is ticked with
//!    `&mut Agent` and a shared `&TickContext`.  An agent mutates only itself.
//!
//! 2. **Apply phase** (sequential): the collected `Intent`s are applied in
//!    agent order: invitations and take-off requests to their recipients,
//!    then removals.
//!
//! The neighbor index in the context is built before the behavior phase, so
//! results do not depend on the order agents are processed in.

pub mod context;
pub mod flock;
pub mod intent;
pub mod model;
pub mod noop;
pub mod probe;
pub mod steering;


pub use context::TickContext;
pub use flock::{FlockBehavior, choose_new_goal};
pub use intent::{DespawnReason, Intent};
pub use model::BehaviorModel;
pub use noop::NoopBehavior;
