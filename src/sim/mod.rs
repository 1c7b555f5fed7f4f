//! Simulation module
//!
//! All gameplay logic lives here: physics, obstacles, collisions, scoring.
//! No rendering, timers or platform dependencies.

pub mod collision;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Collision, collides, find_collision};
pub use obstacles::ObstacleField;
pub use state::{Entity, Obstacle, Session, Viewport};
pub use tick::{TickInput, TickOutcome, tick};
