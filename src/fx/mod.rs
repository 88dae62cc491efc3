//! Canvas effects: the ambient background and the celebration overlay.
//!
//! Both layers are built the same way. Each visual kind lives in its own
//! homogeneous pool, every animation frame steps a pool and then lets it append
//! [`DrawCmd`]s to a reused buffer, and the [`stage`] replays that buffer onto a
//! 2D canvas context. Only `draw::paint_commands` and `stage` touch the browser,
//! so everything else here runs in host tests.

pub mod ambient;
pub mod celebration;
pub mod draw;
pub mod lifecycle;
pub mod stage;

pub use ambient::{AmbientScene, AmbientVariant};
pub use celebration::{BurstParticle, CelebrationScene, Firework};
pub use draw::{DrawCmd, Figure, Glow};
pub use stage::Stage;

use rand::Rng;

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Last known pointer position. Starts far off-canvas so nothing glows before
/// the first mouse move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cursor {
    pub x: f64,
    pub y: f64,
}

impl Cursor {
    pub const OFFSCREEN: Cursor = Cursor {
        x: -1000.0,
        y: -1000.0,
    };

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::OFFSCREEN
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pair this color with an opacity, clamped into [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Paint {
        Paint {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub alpha: f64,
}

impl Paint {
    pub fn css(&self) -> String {
        let Color { r, g, b } = self.color;
        format!("rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

/// Page background, `#020617`.
pub const BACKDROP: Color = Color::rgb(2, 6, 23);
pub const WHITE: Color = Color::rgb(255, 255, 255);

/// Cyan, emerald, amber, blue, orange.
pub const AMBIENT_PALETTE: [Color; 5] = [
    Color::rgb(6, 182, 212),
    Color::rgb(16, 185, 129),
    Color::rgb(245, 158, 11),
    Color::rgb(59, 130, 246),
    Color::rgb(249, 115, 22),
];

/// Emerald, blue, sky, gold, ghost white, teal.
pub const FESTIVE_PALETTE: [Color; 6] = [
    Color::rgb(16, 185, 129),
    Color::rgb(59, 130, 246),
    Color::rgb(96, 165, 250),
    Color::rgb(251, 191, 36),
    Color::rgb(248, 250, 252),
    Color::rgb(45, 212, 191),
];

pub fn pick_color<R: Rng + ?Sized>(palette: &[Color], rng: &mut R) -> Color {
    if palette.is_empty() {
        return WHITE;
    }
    palette[rng.gen_range(0..palette.len())]
}

/// Canvas area covered by one ambient node.
pub const NODE_AREA: f64 = 8_000.0;

/// Every visual entity kind. Pools are keyed by kind; a kind's update and draw
/// rules never change during an entity's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Node,
    Orbital,
    Shape,
    Confetti,
    Sparkle,
    Bubble,
    Shell,
    Burst,
}

impl Kind {
    /// Kinds with a fixed, preallocated population that are recycled in place.
    pub const RECYCLED: [Kind; 6] = [
        Kind::Node,
        Kind::Orbital,
        Kind::Shape,
        Kind::Confetti,
        Kind::Sparkle,
        Kind::Bubble,
    ];

    /// Preallocated pool size for a canvas of `bounds`. Transient kinds (shells,
    /// burst particles) are spawned on demand and report 0.
    pub fn population(self, bounds: Bounds) -> usize {
        match self {
            Kind::Node => (bounds.area() / NODE_AREA).floor() as usize,
            Kind::Orbital => 8,
            Kind::Shape => 20,
            Kind::Confetti => 80,
            Kind::Sparkle => 40,
            Kind::Bubble => 24,
            Kind::Shell | Kind::Burst => 0,
        }
    }
}

/// A canvas layer driven by a [`Stage`].
pub trait Scene {
    /// Canvas size changed; rebuild anything that depends on it.
    fn resize(&mut self, bounds: Bounds, rng: &mut dyn rand::RngCore);

    /// Advance one animation frame and append this frame's drawing to `out`.
    fn frame(&mut self, cursor: Cursor, rng: &mut dyn rand::RngCore, out: &mut Vec<DrawCmd>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_population_scales_with_area() {
        assert_eq!(Kind::Node.population(Bounds::new(800.0, 600.0)), 60);
        assert_eq!(Kind::Node.population(Bounds::new(1920.0, 1080.0)), 259);
        assert_eq!(Kind::Node.population(Bounds::new(0.0, 0.0)), 0);
        assert_eq!(Kind::Burst.population(Bounds::new(1920.0, 1080.0)), 0);
    }

    #[test]
    fn paint_clamps_alpha_and_formats_css() {
        let p = Color::rgb(6, 182, 212).with_alpha(1.7);
        assert_eq!(p.alpha, 1.0);
        assert_eq!(p.css(), "rgba(6, 182, 212, 1)");
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(-0.2).alpha, 0.0);
        assert_eq!(BACKDROP.css(), "rgb(2, 6, 23)");
    }

    #[test]
    fn cursor_distance() {
        let c = Cursor { x: 0.0, y: 0.0 };
        assert!((c.distance_to(3.0, 4.0) - 5.0).abs() < 1e-9);
        assert_eq!(Cursor::default(), Cursor::OFFSCREEN);
    }
}
