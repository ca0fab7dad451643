//! Shaped entities and overlap tests
//!
//! Every entity in the games is either an axis-aligned box (position is the
//! top-left corner) or a circle (position is the center).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Extent of a shaped entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    /// Axis-aligned box anchored at its top-left corner
    Box { width: f32, height: f32 },
    /// Circle centered on the entity position
    Circle { radius: f32 },
}

/// A positioned, shaped entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub pos: Vec2,
    pub extent: Extent,
}

impl Shape {
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            extent: Extent::Box { width, height },
        }
    }

    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            extent: Extent::Circle { radius },
        }
    }

    /// Width and height of the bounding box
    pub fn size(&self) -> Vec2 {
        match self.extent {
            Extent::Box { width, height } => Vec2::new(width, height),
            Extent::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    /// Topmost y coordinate
    pub fn top(&self) -> f32 {
        match self.extent {
            Extent::Box { .. } => self.pos.y,
            Extent::Circle { radius } => self.pos.y - radius,
        }
    }

    /// Geometric center
    pub fn center(&self) -> Vec2 {
        match self.extent {
            Extent::Box { width, height } => self.pos + Vec2::new(width, height) / 2.0,
            Extent::Circle { .. } => self.pos,
        }
    }

    /// Point containment (boundary counts as inside)
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self.extent {
            Extent::Box { width, height } => {
                point.x >= self.pos.x
                    && point.x <= self.pos.x + width
                    && point.y >= self.pos.y
                    && point.y <= self.pos.y + height
            }
            Extent::Circle { radius } => self.pos.distance(point) <= radius,
        }
    }

    /// Strict overlap test between any two shapes
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self.extent, other.extent) {
            (Extent::Circle { radius: ra }, Extent::Circle { radius: rb }) => {
                self.pos.distance_squared(other.pos) < (ra + rb) * (ra + rb)
            }
            (Extent::Circle { radius }, Extent::Box { width, height }) => {
                circle_rect_collision(self.pos, radius, other.pos, Vec2::new(width, height)).hit
            }
            (Extent::Box { width, height }, Extent::Circle { radius }) => {
                circle_rect_collision(other.pos, radius, self.pos, Vec2::new(width, height)).hit
            }
            (Extent::Box { .. }, Extent::Box { .. }) => {
                let a = self.size();
                let b = other.size();
                self.pos.x < other.pos.x + b.x
                    && self.pos.x + a.x > other.pos.x
                    && self.pos.y < other.pos.y + b.y
                    && self.pos.y + a.y > other.pos.y
            }
        }
    }
}

/// Result of a circle-vs-box check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Closest point on the box to the circle center
    pub closest: Vec2,
    /// Squared distance from the circle center to `closest`
    pub distance_sq: f32,
}

/// Circle vs axis-aligned box using closest-point clamping
///
/// The circle center is clamped into the box; the shapes overlap when the
/// clamped point lies strictly inside the circle (`distance² < r²`).
pub fn circle_rect_collision(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> CollisionResult {
    let closest = center.clamp(rect_pos, rect_pos + rect_size);
    let distance_sq = center.distance_squared(closest);
    CollisionResult {
        hit: distance_sq < radius * radius,
        closest,
        distance_sq,
    }
}

/// Minimum pairwise center distance among circles (None for fewer than two)
pub fn min_separation(centers: &[Vec2]) -> Option<f32> {
    let mut best: Option<f32> = None;
    for (i, a) in centers.iter().enumerate() {
        for b in &centers[i + 1..] {
            let d = a.distance(*b);
            best = Some(best.map_or(d, |m: f32| m.min(d)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_inside_player_box_hits() {
        let player = Shape::rect(200.0, 350.0, 25.0, 50.0);
        let obstacle = Shape::circle(210.0, 360.0, 10.0);

        let result = circle_rect_collision(obstacle.pos, 10.0, player.pos, player.size());
        assert!(result.hit);
        assert_eq!(result.distance_sq, 0.0);
        assert!(obstacle.overlaps(&player));
        assert!(player.overlaps(&obstacle));
    }

    #[test]
    fn test_circle_near_corner_misses() {
        // Diagonal distance from (190, 340) to corner (200, 350) is ~14.1
        let result = circle_rect_collision(
            Vec2::new(190.0, 340.0),
            10.0,
            Vec2::new(200.0, 350.0),
            Vec2::new(25.0, 50.0),
        );
        assert!(!result.hit);
        assert_eq!(result.closest, Vec2::new(200.0, 350.0));
        assert!((result.distance_sq - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_touching_edge_is_not_overlap() {
        // Circle bottom exactly touches box top
        let result = circle_rect_collision(
            Vec2::new(210.0, 340.0),
            10.0,
            Vec2::new(200.0, 350.0),
            Vec2::new(25.0, 50.0),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_circle_overlap() {
        let a = Shape::circle(0.0, 0.0, 30.0);
        let b = Shape::circle(50.0, 0.0, 30.0);
        let c = Shape::circle(60.0, 0.0, 30.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_box_box_overlap() {
        let a = Shape::rect(0.0, 0.0, 30.0, 30.0);
        let b = Shape::rect(29.0, 29.0, 30.0, 30.0);
        let c = Shape::rect(30.0, 0.0, 30.0, 30.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_contains_point() {
        let target = Shape::circle(100.0, 100.0, 30.0);
        assert!(target.contains_point(Vec2::new(130.0, 100.0)));
        assert!(!target.contains_point(Vec2::new(131.0, 100.0)));

        let player = Shape::rect(0.0, 0.0, 10.0, 10.0);
        assert!(player.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!player.contains_point(Vec2::new(10.5, 5.0)));
    }

    #[test]
    fn test_top_and_center() {
        let circle = Shape::circle(50.0, -10.0, 10.0);
        assert_eq!(circle.top(), -20.0);
        assert_eq!(circle.center(), Vec2::new(50.0, -10.0));

        let player = Shape::rect(200.0, 350.0, 25.0, 50.0);
        assert_eq!(player.top(), 350.0);
        assert_eq!(player.center(), Vec2::new(212.5, 375.0));
    }

    #[test]
    fn test_min_separation() {
        assert_eq!(min_separation(&[Vec2::ZERO]), None);
        let centers = [Vec2::ZERO, Vec2::new(3.0, 4.0), Vec2::new(100.0, 0.0)];
        assert_eq!(min_separation(&centers), Some(5.0));
    }
}
