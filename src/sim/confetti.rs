//! Confetti bursts for kills and level-ups

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

/// Particles per burst
pub const CONFETTI_COUNT: usize = 50;
/// Confetti falls under its own, lighter gravity (px/s²)
pub const CONFETTI_GRAVITY: f32 = 980.0;
/// Remaining lifetime below which a particle starts fading out
pub const CONFETTI_FADE_SECS: f32 = 0.7;

pub const CONFETTI_PALETTE: [[u8; 3]; 8] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [255, 165, 0],
    [128, 0, 128],
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfettiShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, clockwise
    pub angle: f32,
    /// Degrees per 60 Hz frame
    pub rot_speed: f32,
    /// Seconds left to live
    pub lifespan: f32,
    pub opacity: f32,
    pub color: [u8; 3],
    pub shape: ConfettiShape,
}

impl Confetti {
    /// Advance one step; returns false once the particle has expired
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += CONFETTI_GRAVITY * dt;
        self.angle += self.rot_speed * dt * 60.0;
        self.lifespan -= dt;

        if self.lifespan < CONFETTI_FADE_SECS {
            self.opacity = (self.lifespan / CONFETTI_FADE_SECS).max(0.0);
        }
        self.lifespan > 0.0
    }
}

/// Build a burst of confetti flying up and out from `pos`
pub fn spawn_confetti(rng: &mut Pcg32, pos: Vec2) -> Vec<Confetti> {
    (0..CONFETTI_COUNT)
        .map(|_| {
            let color = CONFETTI_PALETTE[rng.random_range(0..CONFETTI_PALETTE.len())];
            let size: f32 = rng.random_range(2.0..10.0);
            let shape = if rng.random::<f32>() > 0.5 {
                ConfettiShape::Circle { radius: size / 2.0 }
            } else {
                ConfettiShape::Rect {
                    width: size,
                    height: size / 2.0,
                }
            };

            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(100.0..500.0);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 200.0);

            Confetti {
                pos,
                vel,
                angle: rng.random_range(0.0..360.0),
                rot_speed: rng.random_range(-5.0..5.0),
                lifespan: rng.random_range(1.0..2.0),
                opacity: 1.0,
                color,
                shape,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_burst_size_and_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let burst = spawn_confetti(&mut rng, Vec2::new(100.0, 100.0));
        assert_eq!(burst.len(), CONFETTI_COUNT);
        for c in &burst {
            assert!((1.0..2.0).contains(&c.lifespan));
            assert!(CONFETTI_PALETTE.contains(&c.color));
            assert_eq!(c.opacity, 1.0);
            // biased upward by 200 px/s on top of a speed of at most 500
            assert!(c.vel.y < 300.0 + 1e-3);
            assert!((-5.0..5.0).contains(&c.rot_speed));
        }
    }

    #[test]
    fn test_confetti_fades_and_expires() {
        let mut c = Confetti {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            rot_speed: 5.0,
            lifespan: 1.0,
            opacity: 1.0,
            color: [255, 0, 0],
            shape: ConfettiShape::Circle { radius: 3.0 },
        };
        assert!(c.update(0.1));
        assert_eq!(c.opacity, 1.0);
        // position integrates the velocity from before gravity was applied
        assert_eq!(c.pos, Vec2::ZERO);
        assert!(c.vel.y > 0.0);
        assert!((c.angle - 30.0).abs() < 1e-4);

        assert!(c.update(0.55));
        assert!(c.opacity < 0.55 && c.opacity > 0.45);

        assert!(!c.update(0.5));
        assert_eq!(c.opacity, 0.0);
    }
}
