//! `FlockBehavior`: the flying / landing / perched / taking-off / dying
//! state machine for flocking birds.
//!
//! # Per-tick flow
//!
//! 1. Record the previous position, run down the landing cooldown, age the
//!    agent and enter `Dying` once the lifetime is used up.
//! 2. Remove agents that fell below the world floor or outlived the death
//!    grace period (a `Despawn` intent; nothing else runs).
//! 3. Run the handler for the current state.
//! 4. Advance the wing-flap animation and facing.
//! 5. Integrate: `position += velocity`.
//!
//! All tuning comes from the agent's [`SpeciesParams`]; the constants below
//! are shared by every species.

use af_agent::{Agent, FlockIndex, LandingTarget, NeighborView, SpeciesParams, flap_period};
use af_core::space::{clamp_horizontal, horizontal_len, unit_or_none};
use af_core::{DVec3, IVec3, LifecycleState};
use tracing::debug;

use crate::intent::{DespawnReason, TAKEOFF_COOLDOWN};
use crate::{BehaviorModel, Intent, TickContext, probe, steering};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Ticks a dying agent may keep falling past its lifetime before removal.
pub const DEATH_GRACE_TICKS: u32 = 200;
/// Downward acceleration while dying.
pub const DYING_GRAVITY: f64 = 0.02;

/// Distance at which a goal counts as reached.
pub const GOAL_REACHED: f64 = 0.5;
/// Inner radius of the annulus new goals are drawn from.
pub const GOAL_MIN_RADIUS: f64 = 2.5;
/// Radius within which a flying agent looks for perched flockmates to join.
pub const JOIN_PERCH_RADIUS: f64 = 12.0;

/// Horizontal damping applied every landing tick.
pub const LANDING_DAMPING: f64 = 0.98;
/// Cap on the horizontal speed an agent approaches its perch with.
pub const MAX_LANDING_SPEED: f64 = 0.07;
/// Fraction of the horizontal velocity error corrected each landing tick.
pub const LANDING_STEER: f64 = 0.25;
/// Slowest sink rate while landing.
pub const MIN_DESCENT: f64 = 0.06;
/// Fastest sink rate while landing.
pub const MAX_DESCENT: f64 = 0.20;

/// Per-tick chance a perched agent shuffles its idle frame.
pub const IDLE_FRAME_CHANCE: f64 = 0.05;
/// Vertical band within which a player can startle a perched agent.
pub const SCARE_HEIGHT: f64 = 3.0;
/// Take-off timer after being startled or losing the perch.
pub const FORCED_TAKEOFF_TICKS: i32 = 12;
/// Take-off timer when the perch timer simply runs out.
pub const NATURAL_TAKEOFF_TICKS: i32 = 20;

/// Every how many ticks the debug line is written.
const DEBUG_EVERY: u32 = 10;
/// Every how many ticks the sprite facing is recomputed.
const FACING_EVERY: u32 = 3;

// ── FlockBehavior ─────────────────────────────────────────────────────────────

/// Behavior for every bird species.  Stateless; all per-agent state lives on
/// the [`Agent`] and all tuning on its [`SpeciesParams`].
#[derive(Default)]
pub struct FlockBehavior;

impl BehaviorModel for FlockBehavior {
    fn tick(&self, agent: &mut Agent, ctx: &TickContext<'_>) -> Vec<Intent> {
        let Some(params) = ctx.species(agent.species) else {
            agent.previous = agent.position;
            return vec![];
        };
        let mut intents = Vec::new();

        agent.previous = agent.position;
        agent.landing_cooldown = agent.landing_cooldown.saturating_sub(1);

        let expired = agent.age >= agent.lifetime;
        agent.age = agent.age.saturating_add(1);
        if expired && agent.begin_dying() && ctx.debug {
            debug!(agent = %agent.id, species = %params.name, age = agent.age, "lifetime over, dying");
        }

        if let Some(reason) = removal_reason(agent, ctx) {
            if ctx.debug {
                debug!(agent = %agent.id, species = %params.name, age = agent.age, reason = reason.as_str(), "removing agent");
            }
            intents.push(Intent::Despawn(reason));
            return intents;
        }

        match agent.state {
            LifecycleState::Flying    => tick_flying(agent, params, ctx, &mut intents),
            LifecycleState::Landing   => tick_landing(agent, params, ctx),
            LifecycleState::Perched   => tick_perched(agent, params, ctx, &mut intents),
            LifecycleState::TakingOff => tick_taking_off(agent, params, ctx),
            LifecycleState::Dying     => tick_dying(agent),
        }

        animate(agent, params, ctx);

        if ctx.debug && agent.age.is_multiple_of(DEBUG_EVERY) {
            debug!(
                agent = %agent.id,
                species = %params.name,
                state = %agent.state,
                height = format_args!("{:.2}", agent.position.y),
                vx = format_args!("{:.3}", agent.velocity.x),
                vy = format_args!("{:.3}", agent.velocity.y),
                vz = format_args!("{:.3}", agent.velocity.z),
            );
        }

        agent.position += agent.velocity;
        intents
    }

    fn name(&self) -> &'static str {
        "flock"
    }
}

fn removal_reason(agent: &Agent, ctx: &TickContext<'_>) -> Option<DespawnReason> {
    if agent.position.y < ctx.world.min_y() as f64 {
        Some(DespawnReason::FellOutOfWorld)
    } else if agent.age > agent.lifetime.saturating_add(DEATH_GRACE_TICKS) {
        Some(DespawnReason::Expired)
    } else {
        None
    }
}

fn animate(agent: &mut Agent, params: &SpeciesParams, ctx: &TickContext<'_>) {
    if matches!(agent.state, LifecycleState::Dying | LifecycleState::Perched) {
        return;
    }
    let period = flap_period(params.wing_flap_speed, agent.velocity.y);
    if (agent.age as i64) % (period as i64) == agent.pose.flap_offset as i64 {
        agent.pose.toggle_frame();
    }
    if agent.age.is_multiple_of(FACING_EVERY) {
        agent.pose.update_facing(agent.velocity, ctx.camera_yaw);
    }
}

// ── Neighbors ─────────────────────────────────────────────────────────────────

fn neighbors<'c>(agent: &Agent, ctx: &TickContext<'c>, radius: f64) -> Vec<&'c NeighborView> {
    let flock: &'c FlockIndex = ctx.flock;
    flock.within(agent.position, radius, agent.species, agent.id)
}

fn fresh_offset(agent: &mut Agent) -> (f64, f64) {
    (agent.rng.centered(0.8), agent.rng.centered(0.8))
}

fn landing_on(cell: IVec3, offset: (f64, f64), params: &SpeciesParams) -> LandingTarget {
    LandingTarget {
        cell,
        target_y: cell.y as f64 + 1.0 + params.quad_size,
        offset,
    }
}

// ── Goals ─────────────────────────────────────────────────────────────────────

/// Pick a fresh wander goal.
///
/// The goal lies on a random annulus around the agent, jittered along the
/// current velocity.  Its height climbs when the agent is low or has just
/// taken off, sinks when it is near the ceiling and otherwise wanders.  With
/// flockmates nearby the goal is blended toward their centroid and given a
/// shorter timer so the flock re-converges often.
pub fn choose_new_goal(agent: &mut Agent, params: &SpeciesParams, ctx: &TickContext<'_>) {
    let pos = agent.position;
    let vel = agent.velocity;
    let rng = &mut agent.rng;

    let radius = GOAL_MIN_RADIUS + rng.unit() * (params.goal_radius - GOAL_MIN_RADIUS);
    let angle = rng.unit() * std::f64::consts::TAU;
    let nx = angle.cos() * radius + vel.x * 5.0 * (rng.unit() - 0.5);
    let nz = angle.sin() * radius + vel.z * 5.0 * (rng.unit() - 0.5);

    let ground = probe::ground_height(ctx.world, pos.x, pos.z, pos.y);
    let ceiling = ground + params.max_flight_height;
    let floor = ground + params.min_flight_height;
    let ny = if pos.y <= floor + 0.5 || agent.landing_cooldown > 0 {
        pos.y + 2.5 + rng.unit() * 2.5
    } else if pos.y >= ceiling - 1.0 {
        floor.max(ceiling - 2.0 - rng.unit() * 3.0)
    } else {
        (pos.y + (rng.unit() - 0.5) * 2.0 + vel.y * 1.5).max(floor)
    };

    let span = params.goal_duration_max.saturating_sub(params.goal_duration_min);
    let fresh_timer = params.goal_duration_min as i32 + (rng.unit() * span as f64) as i32;

    let flock = neighbors(agent, ctx, params.flock_radius);
    if let Some(center) = steering::centroid(&flock) {
        let base = DVec3::new(pos.x + nx, ny, pos.z + nz);
        let bias = params.flock_goal_bias;
        agent.goal = Some(base * (1.0 - bias) + center * bias);
        let short = ((params.goal_duration_min + params.goal_duration_max) / 4) as i32;
        agent.goal_timer = fresh_timer.min(short).max(1);
        return;
    }

    let min_y = ctx.world.min_y() as f64 + 1.0;
    agent.goal = Some(DVec3::new(pos.x + nx, ny.clamp(min_y, ceiling.max(min_y)), pos.z + nz));
    agent.goal_timer = fresh_timer.max(1);
}

// ── Flying ────────────────────────────────────────────────────────────────────

fn tick_flying(
    agent: &mut Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    intents: &mut Vec<Intent>,
) {
    let pos = agent.position;
    let ground = probe::ground_height(ctx.world, pos.x, pos.z, pos.y);

    let needs_goal = match agent.goal {
        None => true,
        Some(goal) => {
            let expired = agent.goal_timer <= 0;
            agent.goal_timer -= 1;
            expired || goal.distance_squared(pos) < GOAL_REACHED * GOAL_REACHED
        }
    };
    if needs_goal {
        choose_new_goal(agent, params, ctx);
    }

    let flock = neighbors(agent, ctx, params.flock_radius);
    agent.velocity += steering::flocking(pos, agent.velocity, &flock, params);

    let ceiling = ground + params.max_flight_height;
    let near_ceiling = pos.y >= ceiling - 0.5;
    if let Some(goal) = agent.goal.as_mut() {
        if pos.y <= ground + params.min_flight_height + 0.3 {
            goal.y = goal.y.max(pos.y + params.takeoff_climb + agent.rng.unit() * 1.5);
            agent.goal_timer = agent.goal_timer.max(20);
        }
        if near_ceiling {
            goal.y = goal.y.min(ceiling - 2.0 - agent.rng.unit() * 2.0);
            agent.goal_timer = agent.goal_timer.min(40);
        }
    }

    if let Some(goal) = agent.goal {
        agent.velocity += steering::seek(pos, agent.velocity, goal, params, near_ceiling);
    }
    agent.velocity = steering::clamp_speed(agent.velocity, params.fly_speed, params.max_vertical_speed);

    avoid_obstacles(agent, params, ctx);

    if agent.landing_cooldown == 0 && agent.rng.unit() < params.perching_chance {
        try_perch(agent, params, ctx, intents);
    }
}

/// Look ahead along the velocity; climb over an obstacle when there is
/// headroom, otherwise swerve sideways with a short-lived evasive goal.
fn avoid_obstacles(agent: &mut Agent, params: &SpeciesParams, ctx: &TickContext<'_>) {
    let pos = agent.position;
    let ahead = pos + agent.velocity * params.look_ahead;
    if !probe::is_blocked(ctx.world, ahead) {
        return;
    }
    if !probe::is_blocked(ctx.world, pos + DVec3::new(0.0, 2.0, 0.0)) {
        agent.velocity.y = agent.velocity.y.max(0.12);
        return;
    }
    let rng = &mut agent.rng;
    let turn = if rng.unit() < 0.5 { std::f64::consts::FRAC_PI_2 } else { -std::f64::consts::FRAC_PI_2 };
    let angle = agent.velocity.z.atan2(agent.velocity.x) + turn;
    let dist_x = 2.0 + rng.unit() * 3.0;
    let rise = (rng.unit() * 2.0).max(0.5);
    let dist_z = 2.0 + rng.unit() * 3.0;
    agent.goal = Some(DVec3::new(
        pos.x + angle.cos() * dist_x,
        pos.y + rise,
        pos.z + angle.sin() * dist_z,
    ));
    agent.goal_timer = 20 + (rng.unit() * 40.0) as i32;
}

/// Choose a perch: a flockmate's perch if one is still open, otherwise the
/// nearest perch site below.  On success the agent starts landing and invites
/// its flying flockmates along.
fn try_perch(
    agent: &mut Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    intents: &mut Vec<Intent>,
) {
    let joined = neighbors(agent, ctx, JOIN_PERCH_RADIUS)
        .into_iter()
        .filter(|n| n.state == LifecycleState::Perched)
        .filter_map(|n| n.perch)
        .find(|&cell| probe::perch_still_open(ctx.world, cell));

    let Some(cell) = joined.or_else(|| {
        probe::find_perch_below(ctx.world, agent.position, params.perching_distance)
    }) else {
        return;
    };

    let offset = fresh_offset(agent);
    agent.state = LifecycleState::Landing;
    agent.landing = Some(landing_on(cell, offset, params));
    group_perch(agent, params, ctx, cell, intents);
}

fn group_perch(
    agent: &mut Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    cell: IVec3,
    intents: &mut Vec<Intent>,
) {
    for n in neighbors(agent, ctx, params.flock_radius) {
        if n.state != LifecycleState::Flying {
            continue;
        }
        let site = probe::variant_site(ctx.world, cell, &mut agent.rng);
        let offset = fresh_offset(agent);
        intents.push(Intent::InviteLanding { to: n.id, target: landing_on(site, offset, params) });
    }
}

// ── Landing ───────────────────────────────────────────────────────────────────

fn abort_landing(agent: &mut Agent) {
    agent.state = LifecycleState::Flying;
    agent.landing = None;
}

fn tick_landing(agent: &mut Agent, params: &SpeciesParams, ctx: &TickContext<'_>) {
    agent.perched_ticks = 0;

    let Some(target) = agent.landing else {
        abort_landing(agent);
        return;
    };
    if ctx.world.is_air(target.cell) {
        abort_landing(agent);
        return;
    }

    let touchdown = target.point();
    let pos = agent.position;

    agent.velocity.x *= LANDING_DAMPING;
    agent.velocity.z *= LANDING_DAMPING;

    let vertical = pos.y - target.target_y;
    let time_to_land = if agent.velocity.y < -0.001 {
        (vertical / -agent.velocity.y).max(0.1)
    } else {
        (vertical / MIN_DESCENT).max(0.5)
    };

    let desired = clamp_horizontal(
        DVec3::new(
            (touchdown.x - pos.x) / time_to_land,
            0.0,
            (touchdown.z - pos.z) / time_to_land,
        ),
        MAX_LANDING_SPEED,
    );
    agent.velocity.x += (desired.x - agent.velocity.x) * LANDING_STEER;
    agent.velocity.z += (desired.z - agent.velocity.z) * LANDING_STEER;
    agent.velocity.y = -(vertical * 0.03).clamp(MIN_DESCENT, MAX_DESCENT);

    let horizontal = horizontal_len(touchdown - pos);
    let speed = horizontal_len(agent.velocity);
    let settled = horizontal < 0.35 && (pos.y - target.target_y).abs() < 0.25 && speed < 0.06;
    let passed = pos.y <= target.target_y + 0.2 && horizontal < 0.6;
    if settled || passed {
        touch_down(agent, params, target);
    }
}

fn touch_down(agent: &mut Agent, params: &SpeciesParams, target: LandingTarget) {
    agent.position = target.point();
    agent.velocity = DVec3::ZERO;
    agent.state = LifecycleState::Perched;
    agent.pose.frame = 1;
    let base = params.perching_time as f64;
    agent.perch_timer = (base + agent.rng.unit() * base) as i32;
    agent.perch = Some(target.cell);
    agent.landing = None;
}

// ── Perched ───────────────────────────────────────────────────────────────────

fn tick_perched(
    agent: &mut Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    intents: &mut Vec<Intent>,
) {
    agent.perched_ticks = agent.perched_ticks.saturating_add(1);
    agent.velocity = DVec3::ZERO;

    if agent.rng.unit() < IDLE_FRAME_CHANCE {
        agent.pose.frame = 1 + (agent.rng.unit() * 2.0) as u8;
    }

    if agent.perch.is_some_and(|cell| ctx.world.is_air(cell)) {
        take_off(agent, params, ctx, None, intents);
        return;
    }

    let pos = agent.position;
    let scare2 = params.scare_radius * params.scare_radius;
    let scarer = ctx.participants().find(|p| {
        let dx = p.position.x - pos.x;
        let dz = p.position.z - pos.z;
        dx * dx + dz * dz <= scare2 && (p.position.y - pos.y).abs() < SCARE_HEIGHT
    });
    if let Some(player) = scarer {
        take_off(agent, params, ctx, Some(player.position), intents);
        return;
    }

    let expired = agent.perch_timer <= 0;
    agent.perch_timer -= 1;
    if expired {
        agent.state = LifecycleState::TakingOff;
        agent.pose.frame = 1;
        agent.perch_timer = NATURAL_TAKEOFF_TICKS;
        group_takeoff(agent, params, ctx, intents);
    }
}

/// Leave the perch immediately.  With a `threat`, flee horizontally away from
/// it at scare speed; otherwise drift off in a random direction.
fn take_off(
    agent: &mut Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    threat: Option<DVec3>,
    intents: &mut Vec<Intent>,
) {
    let rng = &mut agent.rng;
    match threat {
        Some(from) => {
            let mut away = DVec3::new(agent.position.x - from.x, 0.0, agent.position.z - from.z);
            if horizontal_len(away) < 0.001 {
                away = DVec3::new(rng.centered(1.0), 0.0, rng.centered(1.0));
            }
            let dir = unit_or_none(away, 0.0).unwrap_or(DVec3::X);
            agent.velocity.x = dir.x * params.scare_takeoff_speed + rng.centered(0.05);
            agent.velocity.z = dir.z * params.scare_takeoff_speed + rng.centered(0.05);
        }
        None => {
            agent.velocity.x = rng.centered(0.08);
            agent.velocity.z = rng.centered(0.08);
        }
    }
    agent.velocity.y = 0.12 + rng.unit() * 0.05;
    agent.perch_timer = FORCED_TAKEOFF_TICKS;
    agent.landing_cooldown = TAKEOFF_COOLDOWN + agent.perched_ticks;
    agent.perch = None;
    agent.state = LifecycleState::TakingOff;
    agent.pose.frame = 1;
    group_takeoff(agent, params, ctx, intents);
}

fn group_takeoff(
    agent: &Agent,
    params: &SpeciesParams,
    ctx: &TickContext<'_>,
    intents: &mut Vec<Intent>,
) {
    intents.extend(
        neighbors(agent, ctx, params.flock_radius)
            .into_iter()
            .filter(|n| n.state == LifecycleState::Perched)
            .map(|n| Intent::JoinTakeoff { to: n.id }),
    );
}

// ── Taking off ────────────────────────────────────────────────────────────────

fn tick_taking_off(agent: &mut Agent, params: &SpeciesParams, ctx: &TickContext<'_>) {
    agent.landing = None;
    agent.perch = None;

    agent.position.y += 0.05;
    agent.velocity.y = 0.12 + agent.rng.unit() * 0.06;
    agent.velocity.x += agent.rng.centered(0.05);
    agent.velocity.z += agent.rng.centered(0.05);

    let expired = agent.perch_timer <= 0;
    agent.perch_timer -= 1;
    if expired {
        agent.state = LifecycleState::Flying;
        agent.landing_cooldown = TAKEOFF_COOLDOWN;
        choose_new_goal(agent, params, ctx);
        agent.goal_timer = 30 + (agent.rng.unit() * 40.0) as i32;
    }
}

// ── Dying ─────────────────────────────────────────────────────────────────────

fn tick_dying(agent: &mut Agent) {
    agent.velocity.y -= DYING_GRAVITY;
}
