//! Point generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

/// Outline of a star with `points` tips, first tip pointing straight up.
/// Alternates outer and inner vertices, so the result has `points * 2` entries.
pub fn star_points(center: Vec2, outer_radius: f32, inner_radius: f32, points: u32) -> Vec<Vec2> {
    let count = points.max(2) * 2;
    let step = PI / (count / 2) as f32;

    (0..count)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            // Screen y grows downward, so -PI/2 is up
            let theta = -PI / 2.0 + i as f32 * step;
            center + Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Axis-aligned rectangle shrunk by `inset` on every side
pub fn inset_rect(x: f32, y: f32, width: f32, height: f32, inset: f32) -> (f32, f32, f32, f32) {
    (
        x + inset,
        y + inset,
        (width - inset * 2.0).max(0.0),
        (height - inset * 2.0).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_vertex_radii() {
        let center = Vec2::new(100.0, 100.0);
        let star = star_points(center, 10.0, 5.0, 5);
        assert_eq!(star.len(), 10);
        for (i, p) in star.iter().enumerate() {
            let expected = if i % 2 == 0 { 10.0 } else { 5.0 };
            assert!((p.distance(center) - expected).abs() < 1e-4);
        }
        // First tip straight up
        assert!((star[0] - Vec2::new(100.0, 90.0)).length() < 1e-4);
    }

    #[test]
    fn test_inset_rect() {
        assert_eq!(inset_rect(20.0, 40.0, 20.0, 20.0, 1.0), (21.0, 41.0, 18.0, 18.0));
        assert_eq!(inset_rect(0.0, 0.0, 1.0, 1.0, 1.0), (1.0, 1.0, 0.0, 0.0));
    }
}
