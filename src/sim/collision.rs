//! Geometric overlap tests shared by the resolver passes

use glam::Vec2;

use super::state::{Crate, Obstacle};

/// Circle-vs-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let combined = ra + rb;
    a.distance_squared(b) < combined * combined
}

/// Circle-vs-obstacle blocking test. The circle is treated as its bounding
/// square, so a corner graze still blocks.
#[inline]
pub fn circle_blocked_by(center: Vec2, radius: f32, obstacle: &Obstacle) -> bool {
    center.x + radius > obstacle.min.x
        && center.x - radius < obstacle.max.x
        && center.y + radius > obstacle.min.y
        && center.y - radius < obstacle.max.y
}

/// True if a circle at `center` cannot occupy the position
pub fn position_blocked(
    center: Vec2,
    radius: f32,
    obstacles: &[Obstacle],
    crates: &[Crate],
) -> bool {
    if obstacles.iter().any(|o| circle_blocked_by(center, radius, o)) {
        return true;
    }
    crates
        .iter()
        .any(|c| circles_overlap(center, radius, c.pos, c.radius))
}

/// Impulse pushing `target` directly away from `source`. Zero when the two
/// coincide (no direction to push).
pub fn knockback(target: Vec2, source: Vec2, strength: f32) -> Vec2 {
    (target - source).normalize_or_zero() * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_overlap_uses_combined_radii() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(15.0, 0.0);
        assert!(circles_overlap(a, 10.0, b, 10.0));
        assert!(!circles_overlap(a, 5.0, b, 5.0));
    }

    #[test]
    fn obstacle_blocks_bounding_square() {
        let obstacle = Obstacle::new(100.0, 100.0, 50.0, 50.0);
        // Center left of the box but the radius reaches in
        assert!(circle_blocked_by(Vec2::new(95.0, 120.0), 10.0, &obstacle));
        assert!(!circle_blocked_by(Vec2::new(80.0, 120.0), 10.0, &obstacle));
        // Corner graze blocks even though the true circle would miss
        assert!(circle_blocked_by(Vec2::new(95.0, 95.0), 8.0, &obstacle));
    }

    #[test]
    fn crates_block_positions() {
        let crates = vec![Crate {
            id: 1,
            pos: Vec2::new(200.0, 200.0),
            radius: 20.0,
            hp: 3,
        }];
        assert!(position_blocked(
            Vec2::new(210.0, 200.0),
            22.0,
            &[],
            &crates
        ));
        assert!(!position_blocked(
            Vec2::new(300.0, 200.0),
            22.0,
            &[],
            &crates
        ));
    }

    #[test]
    fn knockback_points_away_from_source() {
        let push = knockback(Vec2::new(10.0, 0.0), Vec2::new(0.0, 0.0), 5.0);
        assert!((push.x - 5.0).abs() < 1e-5);
        assert!(push.y.abs() < 1e-5);
        // Coincident points produce no impulse
        assert_eq!(knockback(Vec2::ZERO, Vec2::ZERO, 5.0), Vec2::ZERO);
    }
}
