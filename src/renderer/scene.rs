//! Draw list for a session
//!
//! Everything on screen is a rectangle in viewport pixels. Text (score,
//! countdown, game over) is drawn by the HUD, not here.

use glam::Vec2;

use super::shapes::rect;
use super::vertex::{Vertex, colors};
use crate::sim::{Obstacle, Session};

/// Vertices for one obstacle: the top bar above the gap, the bottom bar below
pub fn obstacle(obstacle: &Obstacle, width: f32, viewport_height: f32) -> Vec<Vertex> {
    let mut vertices = rect(
        Vec2::new(obstacle.x, 0.0),
        Vec2::new(width, obstacle.gap_top),
        colors::OBSTACLE,
    );
    vertices.extend(rect(
        Vec2::new(obstacle.x, obstacle.gap_bottom()),
        Vec2::new(width, viewport_height - obstacle.gap_bottom()),
        colors::OBSTACLE,
    ));
    vertices
}

/// Full frame for a running or finished session
pub fn build(session: &Session, obstacle_width: f32) -> Vec<Vertex> {
    let viewport = session.viewport;
    let mut vertices = Vec::with_capacity((session.obstacles.len() * 2 + 2) * 6);

    for o in session.obstacles.iter() {
        vertices.extend(obstacle(o, obstacle_width, viewport.height));
    }

    let entity = &session.entity;
    vertices.extend(rect(
        Vec2::new(entity.x, entity.y),
        Vec2::new(entity.width, entity.height),
        colors::ENTITY,
    ));

    if session.over {
        vertices.extend(rect(
            Vec2::ZERO,
            Vec2::new(viewport.width, viewport.height),
            colors::GAME_OVER_SHADE,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::Viewport;

    #[test]
    fn test_obstacle_bars() {
        let o = Obstacle {
            x: 100.0,
            gap_top: 100.0,
            gap_height: 250.0,
        };
        let vertices = obstacle(&o, 30.0, 600.0);
        assert_eq!(vertices.len(), 12);

        let top_max_y = vertices[..6].iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        let bottom_min_y = vertices[6..].iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        let bottom_max_y = vertices[6..].iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(top_max_y, 100.0);
        assert_eq!(bottom_min_y, 350.0);
        assert_eq!(bottom_max_y, 600.0);
    }

    #[test]
    fn test_scene_counts() {
        let settings = Settings::default();
        let mut session = Session::new(&settings, Viewport::new(400.0, 600.0), 1);
        session.obstacles.push(Obstacle {
            x: 200.0,
            gap_top: 100.0,
            gap_height: 250.0,
        });
        assert_eq!(build(&session, 30.0).len(), 18);

        session.over = true;
        assert_eq!(build(&session, 30.0).len(), 24);
    }
}
