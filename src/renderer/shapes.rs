//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Generate vertices for a filled axis-aligned rectangle
///
/// `min` is the top-left corner in viewport pixels. Empty or inverted
/// rectangles produce no vertices.
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let max = min + size;

    // Two triangles
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}
