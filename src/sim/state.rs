//! Session state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::obstacles::ObstacleField;
use crate::settings::Settings;

/// Play field size in pixels (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled falling square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    /// Fixed horizontal position (left edge)
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Vertical velocity (positive = falling)
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Entity {
    /// Entity at rest, vertically centred in the viewport
    pub fn new(x: f32, size: f32, viewport: Viewport) -> Self {
        Self {
            x,
            y: viewport.height / 2.0,
            vel_y: 0.0,
            width: size,
            height: size,
        }
    }

    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.vel_y += gravity;
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.y += self.vel_y;
    }

    /// Jump: override the velocity regardless of current fall speed
    #[inline]
    pub fn impulse(&mut self, force: f32) {
        self.vel_y = force;
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A gated obstacle: a top bar and a bottom bar around a vertical gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Bottom of the top bar / top of the gap
    pub gap_top: f32,
    pub gap_height: f32,
}

impl Obstacle {
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }
}

/// One play-through, from the end of the countdown to the terminal collision
#[derive(Debug, Clone)]
pub struct Session {
    pub entity: Entity,
    pub obstacles: ObstacleField,
    pub viewport: Viewport,
    /// Obstacles cleared this session
    pub score: u32,
    /// Terminal flag, set by the first collision
    pub over: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl Session {
    /// Fresh session: score 0, no obstacles, entity centred at rest
    pub fn new(settings: &Settings, viewport: Viewport, seed: u64) -> Self {
        Self {
            entity: Entity::new(settings.entity_x, settings.entity_size, viewport),
            obstacles: ObstacleField::new(),
            viewport,
            score: 0,
            over: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Apply a viewport change; a live session recentres the entity
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.over {
            self.entity.y = viewport.height / 2.0;
        }
    }
}
