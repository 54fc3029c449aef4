//! Axis-aligned bodies and static-geometry collision
//!
//! Dynamic bodies (player, enemies) fall under gravity and are pushed out of
//! static boxes (ground, walls). They never push each other; contact between
//! them is detected by overlap only.

use glam::Vec2;

use crate::consts::GRAVITY;

/// Axis-aligned bounding box in screen space (+y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_top_left(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) < radius * radius
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

/// Velocity state of a dynamic body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub vel: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn jump(&mut self, force: f32) {
        self.vel.y = -force;
        self.grounded = false;
    }
}

/// Which sides were blocked during a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub floor: bool,
    pub ceiling: bool,
    pub wall: bool,
}

/// Move `aabb` by `delta`, one axis at a time, resolving against `statics`
pub fn move_and_collide(aabb: &mut Aabb, delta: Vec2, statics: &[Aabb]) -> CollisionFlags {
    let mut flags = CollisionFlags::default();

    if delta.x != 0.0 {
        *aabb = aabb.translated(Vec2::new(delta.x, 0.0));
        for s in statics {
            if aabb.overlaps(s) {
                let push = if delta.x > 0.0 {
                    s.min.x - aabb.max.x
                } else {
                    s.max.x - aabb.min.x
                };
                *aabb = aabb.translated(Vec2::new(push, 0.0));
                flags.wall = true;
            }
        }
    }

    if delta.y != 0.0 {
        *aabb = aabb.translated(Vec2::new(0.0, delta.y));
        for s in statics {
            if aabb.overlaps(s) {
                if delta.y > 0.0 {
                    let push = s.min.y - aabb.max.y;
                    *aabb = aabb.translated(Vec2::new(0.0, push));
                    flags.floor = true;
                } else {
                    let push = s.max.y - aabb.min.y;
                    *aabb = aabb.translated(Vec2::new(0.0, push));
                    flags.ceiling = true;
                }
            }
        }
    }

    flags
}

/// Push a box that spawned inside static geometry back out (smallest axis first)
pub fn depenetrate(aabb: &mut Aabb, statics: &[Aabb]) {
    for s in statics {
        if !aabb.overlaps(s) {
            continue;
        }
        let candidates = [
            Vec2::new(s.min.x - aabb.max.x, 0.0),
            Vec2::new(s.max.x - aabb.min.x, 0.0),
            Vec2::new(0.0, s.min.y - aabb.max.y),
            Vec2::new(0.0, s.max.y - aabb.min.y),
        ];
        let push = candidates
            .into_iter()
            .min_by(|a, b| {
                a.length_squared()
                    .partial_cmp(&b.length_squared())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Vec2::ZERO);
        *aabb = aabb.translated(push);
    }
}

/// Integrate one step of a dynamic body: gravity, velocity, plus a one-frame
/// displacement (`intent` in px/s, like a kinematic `move`)
pub fn step_body(
    aabb: &mut Aabb,
    body: &mut Body,
    intent: Vec2,
    statics: &[Aabb],
    dt: f32,
) -> CollisionFlags {
    body.vel.y += GRAVITY * dt;
    let delta = (body.vel + intent) * dt;
    let flags = move_and_collide(aabb, delta, statics);

    if flags.floor && body.vel.y > 0.0 {
        body.vel.y = 0.0;
    }
    if flags.ceiling && body.vel.y < 0.0 {
        body.vel.y = 0.0;
    }
    body.grounded = flags.floor;
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Aabb {
        Aabb::from_top_left(Vec2::new(0.0, 600.0), Vec2::new(800.0, 48.0))
    }

    #[test]
    fn test_overlap_excludes_touching() {
        let a = Aabb::from_top_left(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_top_left(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::from_top_left(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_body_lands_on_ground() {
        let statics = [ground()];
        let mut aabb = Aabb::from_top_left(Vec2::new(100.0, 500.0), Vec2::splat(64.0));
        let mut body = Body::default();
        for _ in 0..240 {
            step_body(&mut aabb, &mut body, Vec2::ZERO, &statics, 1.0 / 120.0);
        }
        assert!(body.grounded);
        assert!((aabb.max.y - 600.0).abs() < 0.01);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_wall_blocks_horizontal_move() {
        let wall = Aabb::from_top_left(Vec2::new(800.0, 0.0), Vec2::new(20.0, 648.0));
        let mut aabb = Aabb::from_top_left(Vec2::new(730.0, 100.0), Vec2::splat(64.0));
        let flags = move_and_collide(&mut aabb, Vec2::new(50.0, 0.0), &[wall]);
        assert!(flags.wall);
        assert!((aabb.max.x - 800.0).abs() < 0.01);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let statics = [ground()];
        let mut aabb = Aabb::from_top_left(Vec2::new(100.0, 536.0), Vec2::splat(64.0));
        let mut body = Body::default();
        step_body(&mut aabb, &mut body, Vec2::ZERO, &statics, 1.0 / 120.0);
        assert!(body.grounded);
        body.jump(600.0);
        step_body(&mut aabb, &mut body, Vec2::ZERO, &statics, 1.0 / 120.0);
        assert!(!body.grounded);
        assert!(aabb.max.y < 600.0);
    }

    #[test]
    fn test_depenetrate_uses_smallest_push() {
        let wall = Aabb::from_top_left(Vec2::new(-20.0, 0.0), Vec2::new(20.0, 600.0));
        let mut aabb = Aabb::from_center(Vec2::new(10.0, 300.0), Vec2::new(61.0, 53.0));
        depenetrate(&mut aabb, &[wall]);
        assert!(!aabb.overlaps(&wall));
        assert!((aabb.min.x - 0.0).abs() < 0.01);
    }
}
