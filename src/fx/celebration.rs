//! Celebration overlay: fireworks once the countdown hits zero.
//!
//! Shells launch from the bottom edge at a constant per-frame chance, climb
//! against gravity and burst at their apex into a fan of particles. A shell
//! owns its particles from the moment it bursts and leaves the pool once the
//! last of them has faded. The overlay never clears fully; a translucent fill
//! each frame leaves motion trails.

use std::f64::consts::TAU;

use rand::Rng;

use super::draw::{DrawCmd, Glow};
use super::lifecycle::{Fading, Spawner, prune};
use super::{BACKDROP, Bounds, Color, Cursor, FESTIVE_PALETTE, Scene, WHITE, pick_color};

pub const SHELL_GRAVITY: f64 = 0.15;
/// A climbing shell bursts once its vertical velocity rises to this value.
pub const BURST_VELOCITY: f64 = -0.5;
pub const BURST_MIN: usize = 100;
pub const BURST_MAX: usize = 149;
pub const TRAIL_ALPHA: f64 = 0.15;

const SHELL_RADIUS: f64 = 2.0;
const PARTICLE_FRICTION: f64 = 0.96;
const PARTICLE_GRAVITY: f64 = 0.15;
const TWINKLE_CHANCE: f64 = 0.1;

/// Short-lived spark thrown out when a shell bursts.
#[derive(Clone, Debug, PartialEq)]
pub struct BurstParticle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
    pub color: Color,
    pub friction: f64,
    pub gravity: f64,
    pub size: f64,
    pub decay: f64,
    /// Drawn with a white glow this frame.
    pub twinkle: bool,
}

impl BurstParticle {
    pub fn spawn<R: Rng + ?Sized>(x: f64, y: f64, color: Color, rng: &mut R) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(2.0..10.0);
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            alpha: 1.0,
            color,
            friction: PARTICLE_FRICTION,
            gravity: PARTICLE_GRAVITY,
            size: rng.gen_range(0.5..3.0),
            decay: rng.gen_range(0.005..0.02),
            twinkle: false,
        }
    }

    /// Friction, then gravity, then position; alpha drops by `decay`.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.vx *= self.friction;
        self.vy *= self.friction;
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;
        self.alpha -= self.decay;
        self.twinkle = rng.gen_bool(TWINKLE_CHANCE);
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        let glow = if self.twinkle {
            Glow {
                blur: 15.0,
                color: WHITE,
            }
        } else {
            Glow {
                blur: 5.0,
                color: self.color,
            }
        };
        out.push(DrawCmd::Disc {
            x: self.x,
            y: self.y,
            radius: self.size,
            paint: self.color.with_alpha(self.alpha),
            glow: Some(glow),
        });
    }
}

impl Fading for BurstParticle {
    fn alpha(&self) -> f64 {
        self.alpha
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Flight {
    Climbing,
    Burst(Vec<BurstParticle>),
}

/// A shell climbing from the bottom edge, later the owner of its burst.
#[derive(Clone, Debug, PartialEq)]
pub struct Firework {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: Color,
    flight: Flight,
}

impl Firework {
    /// A shell at a random point of the bottom edge, heading up.
    pub fn launch<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: bounds.height,
            vx: rng.gen_range(-2.0..2.0),
            vy: -rng.gen_range(12.0..24.0),
            color: pick_color(&FESTIVE_PALETTE, rng),
            flight: Flight::Climbing,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Flight::Burst(particles) = &mut self.flight {
            for p in particles.iter_mut() {
                p.update(rng);
            }
            prune(particles);
            return;
        }
        self.x += self.vx;
        self.y += self.vy;
        self.vy += SHELL_GRAVITY;
        if self.vy >= BURST_VELOCITY {
            self.burst(rng);
        }
    }

    fn burst<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = rng.gen_range(BURST_MIN..=BURST_MAX);
        let (x, y, color) = (self.x, self.y, self.color);
        let particles = std::iter::repeat_with(|| BurstParticle::spawn(x, y, color, rng))
            .take(count)
            .collect();
        self.flight = Flight::Burst(particles);
    }

    pub fn has_burst(&self) -> bool {
        matches!(self.flight, Flight::Burst(_))
    }

    /// Burst particles still alive; empty while climbing.
    pub fn particles(&self) -> &[BurstParticle] {
        match &self.flight {
            Flight::Climbing => &[],
            Flight::Burst(particles) => particles,
        }
    }

    /// Burst and every particle faded: ready to leave the pool.
    pub fn is_spent(&self) -> bool {
        matches!(&self.flight, Flight::Burst(p) if p.is_empty())
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        match &self.flight {
            Flight::Climbing => out.push(DrawCmd::Disc {
                x: self.x,
                y: self.y,
                radius: SHELL_RADIUS,
                paint: self.color.with_alpha(1.0),
                glow: Some(Glow {
                    blur: 10.0,
                    color: self.color,
                }),
            }),
            Flight::Burst(particles) => {
                for p in particles {
                    p.draw(out);
                }
            }
        }
    }
}

pub struct CelebrationScene {
    bounds: Bounds,
    spawner: Spawner,
    fireworks: Vec<Firework>,
    launched: u64,
}

impl CelebrationScene {
    pub fn new(bounds: Bounds, launch_chance: f64) -> Self {
        Self {
            bounds,
            spawner: Spawner::new(launch_chance),
            fireworks: Vec::new(),
            launched: 0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    /// Shells launched since the scene was created.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn live_particles(&self) -> usize {
        self.fireworks.iter().map(|f| f.particles().len()).sum()
    }

    /// Launch one shell right away, outside the per-frame roll.
    pub fn launch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.fireworks.push(Firework::launch(self.bounds, rng));
        self.launched += 1;
    }

    /// One frame: trail fill, maybe launch, advance every shell and burst, drop
    /// spent fireworks, then draw what is left.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Fill(BACKDROP.with_alpha(TRAIL_ALPHA)));
        if self.spawner.roll(rng) {
            self.launch(rng);
        }
        for firework in &mut self.fireworks {
            firework.update(rng);
        }
        self.fireworks.retain(|f| !f.is_spent());
        for firework in &self.fireworks {
            firework.draw(out);
        }
    }
}

impl Scene for CelebrationScene {
    fn resize(&mut self, bounds: Bounds, _rng: &mut dyn rand::RngCore) {
        // shells in flight keep going; only new launches use the new size
        self.bounds = bounds;
    }

    fn frame(&mut self, _cursor: Cursor, rng: &mut dyn rand::RngCore, out: &mut Vec<DrawCmd>) {
        self.step(rng, out);
    }
}
