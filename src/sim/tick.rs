//! Per-frame simulation tick
//!
//! One call = one display refresh while the session is running.

use super::collision::{Collision, find_collision};
use super::state::Session;
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump requested since the previous tick (click/tap/space)
    pub jump: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Obstacles that scrolled off the left edge this tick
    pub cleared: u32,
    /// Terminal collision, if any
    pub collision: Option<Collision>,
}

/// Advance a running session by one tick
///
/// Order: gravity, jump override, integrate, spawn, advance, retire/score,
/// collide. A finished session is left untouched.
pub fn tick(session: &mut Session, input: &TickInput, settings: &Settings) -> TickOutcome {
    if session.over {
        return TickOutcome::default();
    }
    session.time_ticks += 1;

    // Entity
    session.entity.apply_gravity(settings.gravity);
    if input.jump {
        session.entity.impulse(settings.jump_force);
    }
    session.entity.integrate();

    // Obstacles
    session.obstacles.maybe_spawn(
        session.viewport,
        settings.gap_height,
        settings.obstacle_spacing,
        settings.spawn_margin,
        &mut session.rng,
    );
    session.obstacles.advance(settings.obstacle_speed);
    let cleared = session.obstacles.retire_and_score(settings.obstacle_width);
    session.score += cleared;

    let collision = find_collision(
        &session.entity,
        session.obstacles.as_slice(),
        session.viewport,
        settings.obstacle_width,
    );
    if collision.is_some() {
        session.over = true;
    }

    TickOutcome { cleared, collision }
}
