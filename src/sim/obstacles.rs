//! Obstacle spawning, scrolling and retirement
//!
//! Obstacles live in spawn order, which is also left-to-right order since
//! they all scroll at the same speed and never reorder.

use rand::Rng;

use super::state::{Obstacle, Viewport};

/// Ordered obstacle sequence (index 0 = oldest = leftmost)
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Most recently spawned obstacle
    pub fn last(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }

    /// Append an obstacle; it must not lie left of the current tail
    pub fn push(&mut self, obstacle: Obstacle) {
        debug_assert!(self.last().is_none_or(|last| last.x <= obstacle.x));
        self.obstacles.push(obstacle);
    }

    /// True when a new obstacle is due at the right edge
    pub fn spawn_due(&self, viewport: Viewport, min_spacing: f32) -> bool {
        match self.last() {
            None => true,
            Some(last) => viewport.width - last.x >= min_spacing,
        }
    }

    /// Spawn an obstacle at the right edge if the spacing allows it
    ///
    /// The gap top is drawn uniformly from
    /// `[margin, viewport.height - gap_height - margin]`. When the viewport is
    /// too short for the configured gap, the gap shrinks to the free band
    /// between the margins; if there is no free band at all, nothing spawns.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        viewport: Viewport,
        gap_height: f32,
        min_spacing: f32,
        margin: f32,
        rng: &mut R,
    ) -> Option<Obstacle> {
        if !self.spawn_due(viewport, min_spacing) {
            return None;
        }

        let free_band = viewport.height - 2.0 * margin;
        if free_band <= 0.0 || !free_band.is_finite() {
            log::warn!(
                "Viewport height {} leaves no room for a gap, skipping spawn",
                viewport.height
            );
            return None;
        }

        let gap_height = gap_height.min(free_band);
        let max_top = viewport.height - gap_height - margin;
        let gap_top = if max_top > margin {
            rng.random_range(margin..=max_top)
        } else {
            margin
        };

        let obstacle = Obstacle {
            x: viewport.width,
            gap_top,
            gap_height,
        };
        self.push(obstacle);
        Some(obstacle)
    }

    /// Scroll every obstacle left by `speed`
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Remove obstacles that have fully left the screen
    ///
    /// Returns how many were removed; each one is a cleared obstacle.
    pub fn retire_and_score(&mut self, obstacle_width: f32) -> u32 {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.x + obstacle_width >= 0.0);
        (before - self.obstacles.len()) as u32
    }
}
