//! Collision detection
//!
//! Pure functions of entity, obstacles and viewport. Everything is an
//! axis-aligned rectangle, so every test is a pair of interval checks.

use glam::Vec2;

use super::state::{Entity, Obstacle, Viewport};

/// What the entity hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Top edge went above the viewport
    Ceiling,
    /// Bottom edge went below the viewport
    Floor,
    /// Touched the bars of the obstacle at this index
    Obstacle(usize),
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn of_entity(entity: &Entity) -> Self {
        Self::new(
            Vec2::new(entity.x, entity.y),
            Vec2::new(entity.right(), entity.bottom()),
        )
    }

    /// Horizontal spans overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// Entity left the play field vertically
pub fn boundary_collision(entity: &Entity, viewport: Viewport) -> Option<Collision> {
    if entity.bottom() > viewport.height {
        Some(Collision::Floor)
    } else if entity.y < 0.0 {
        Some(Collision::Ceiling)
    } else {
        None
    }
}

/// Entity overlaps this obstacle's top or bottom bar
pub fn obstacle_collision(entity: &Entity, obstacle: &Obstacle, obstacle_width: f32) -> bool {
    let bounds = Aabb::of_entity(entity);
    if !bounds.overlaps_x(obstacle.x, obstacle.x + obstacle_width) {
        return false;
    }
    bounds.min.y < obstacle.gap_top || bounds.max.y > obstacle.gap_bottom()
}

/// First collision found, boundaries before obstacles
pub fn find_collision(
    entity: &Entity,
    obstacles: &[Obstacle],
    viewport: Viewport,
    obstacle_width: f32,
) -> Option<Collision> {
    boundary_collision(entity, viewport).or_else(|| {
        obstacles
            .iter()
            .position(|o| obstacle_collision(entity, o, obstacle_width))
            .map(Collision::Obstacle)
    })
}

/// Terminal-condition predicate
#[inline]
pub fn collides(
    entity: &Entity,
    obstacles: &[Obstacle],
    viewport: Viewport,
    obstacle_width: f32,
) -> bool {
    find_collision(entity, obstacles, viewport, obstacle_width).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEW: Viewport = Viewport::new(400.0, 600.0);

    fn entity_at(x: f32, y: f32) -> Entity {
        Entity {
            x,
            y,
            vel_y: 0.0,
            width: 20.0,
            height: 20.0,
        }
    }

    fn gate(x: f32) -> Obstacle {
        Obstacle {
            x,
            gap_top: 100.0,
            gap_height: 250.0,
        }
    }

    #[test]
    fn test_fresh_spawn_is_out_of_reach() {
        // Just spawned at the right edge: no horizontal overlap yet
        assert!(!collides(&entity_at(50.0, 80.0), &[gate(400.0)], VIEW, 30.0));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        // 150 >= 100 and 170 <= 350
        assert!(!collides(&entity_at(50.0, 150.0), &[gate(45.0)], VIEW, 30.0));
    }

    #[test]
    fn test_above_gap_hits_top_bar() {
        assert_eq!(
            find_collision(&entity_at(50.0, 80.0), &[gate(45.0)], VIEW, 30.0),
            Some(Collision::Obstacle(0))
        );
    }

    #[test]
    fn test_below_gap_hits_bottom_bar() {
        assert!(collides(&entity_at(50.0, 331.0), &[gate(60.0)], VIEW, 30.0));
        assert!(!collides(&entity_at(50.0, 330.0), &[gate(60.0)], VIEW, 30.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        // Obstacle right edge exactly at the entity's left edge
        assert!(!collides(&entity_at(50.0, 0.0), &[gate(20.0)], VIEW, 30.0));
        // Obstacle left edge exactly at the entity's right edge
        assert!(!collides(&entity_at(50.0, 0.0), &[gate(70.0)], VIEW, 30.0));
        assert!(collides(&entity_at(50.0, 0.0), &[gate(69.9)], VIEW, 30.0));
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(
            boundary_collision(&entity_at(50.0, -0.5), VIEW),
            Some(Collision::Ceiling)
        );
        assert_eq!(
            boundary_collision(&entity_at(50.0, 580.5), VIEW),
            Some(Collision::Floor)
        );
        assert_eq!(boundary_collision(&entity_at(50.0, 0.0), VIEW), None);
        assert_eq!(boundary_collision(&entity_at(50.0, 580.0), VIEW), None);
    }

    #[test]
    fn test_reports_first_hit_obstacle() {
        let obstacles = [gate(-100.0), gate(55.0), gate(60.0)];
        assert_eq!(
            find_collision(&entity_at(50.0, 20.0), &obstacles, VIEW, 30.0),
            Some(Collision::Obstacle(1))
        );
    }

    proptest! {
        #[test]
        fn prop_collision_is_deterministic(
            y in -50.0f32..650.0,
            ox in -50.0f32..450.0,
            gap_top in 0.0f32..400.0,
        ) {
            let entity = entity_at(50.0, y);
            let obstacles = [Obstacle { x: ox, gap_top, gap_height: 250.0 }];
            let first = collides(&entity, &obstacles, VIEW, 30.0);
            let (entity2, obstacles2) = (entity, obstacles);
            let second = collides(&entity2, &obstacles2, VIEW, 30.0);
            prop_assert_eq!(first, second);
        }
    }
}
