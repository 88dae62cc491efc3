//! Ambient background: always-on decorative motion behind the page.
//!
//! Classic variant: drifting nodes that glow and link up near the cursor,
//! slowly turning orbit arcs around the canvas center, and faint outlines
//! floating upward. The festive variant adds falling confetti, pulsing sparkles
//! and rising bubbles. Every pool here is preallocated from the canvas size and
//! recycled in place; nothing is spawned or removed between resizes.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use rand::Rng;
use serde::Deserialize;

use super::draw::{DrawCmd, Figure, Glow};
use super::lifecycle::{Exit, recycle_vertical, reflect, refill};
use super::{AMBIENT_PALETTE, BACKDROP, Bounds, Color, Cursor, FESTIVE_PALETTE, Kind, Scene, pick_color};

/// Cursor distance under which nodes glow and links are drawn.
pub const GLOW_RADIUS: f64 = 250.0;
/// Maximum distance between two linked nodes.
pub const LINK_DISTANCE: f64 = 120.0;
const LINK_OPACITY: f64 = 0.15;
const LINK_WIDTH: f64 = 0.5;
const NODE_SPEED: f64 = 0.2;

const ORBITAL_ALPHA: f64 = 0.08;
const SHAPE_ALPHA: f64 = 0.05;
const SHAPE_RISE: f64 = 0.15;
const SHAPE_MARGIN: f64 = 50.0;

const CONFETTI_GRAVITY: f64 = 0.05;
const CONFETTI_MAX_FALL: f64 = 3.0;
const CONFETTI_MARGIN: f64 = 20.0;
const CONFETTI_ALPHA: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientVariant {
    #[default]
    Classic,
    Festive,
}

impl AmbientVariant {
    /// Kinds this variant keeps populated.
    pub fn kinds(self) -> &'static [Kind] {
        match self {
            AmbientVariant::Classic => &[Kind::Node, Kind::Orbital, Kind::Shape],
            AmbientVariant::Festive => &Kind::RECYCLED,
        }
    }
}

// --- Entities ---------------------------------------------------------------

/// Drifting point that bounces off the canvas edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: Color,
    pub alpha: f64,
}

impl Node {
    pub fn spawn<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            vx: rng.gen_range(-NODE_SPEED..NODE_SPEED),
            vy: rng.gen_range(-NODE_SPEED..NODE_SPEED),
            size: rng.gen_range(1.0..3.0),
            color: pick_color(&AMBIENT_PALETTE, rng),
            alpha: rng.gen_range(0.1..0.4),
        }
    }

    pub fn update(&mut self, bounds: Bounds) {
        self.x += self.vx;
        self.y += self.vy;
        reflect(self.x, &mut self.vx, bounds.width);
        reflect(self.y, &mut self.vy, bounds.height);
    }

    /// 1 at the cursor, falling linearly to 0 at [`GLOW_RADIUS`].
    pub fn glow(&self, cursor: Cursor) -> f64 {
        let dist = cursor.distance_to(self.x, self.y);
        if dist < GLOW_RADIUS {
            1.0 - dist / GLOW_RADIUS
        } else {
            0.0
        }
    }

    pub fn draw(&self, cursor: Cursor, out: &mut Vec<DrawCmd>) {
        let glow = self.glow(cursor);
        out.push(DrawCmd::Disc {
            x: self.x,
            y: self.y,
            radius: self.size + glow * 3.0,
            paint: self.color.with_alpha(self.alpha + glow),
            glow: (glow > 0.5).then_some(Glow {
                blur: 10.0 * glow,
                color: self.color,
            }),
        });
    }
}

/// Quarter-arc segments turning around the canvas center.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbital {
    pub radius: f64,
    pub angle: f64,
    pub speed: f64,
    pub thickness: f64,
    pub color: Color,
    pub segments: u8,
}

impl Orbital {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            radius: rng.gen_range(100.0..500.0),
            angle: rng.gen_range(0.0..TAU),
            speed: rng.gen_range(-0.0025..0.0025),
            thickness: rng.gen_range(0.5..2.0),
            color: pick_color(&AMBIENT_PALETTE, rng),
            segments: rng.gen_range(1..=3),
        }
    }

    pub fn update(&mut self) {
        self.angle = (self.angle + self.speed).rem_euclid(TAU);
    }

    pub fn draw(&self, center: (f64, f64), out: &mut Vec<DrawCmd>) {
        let paint = self.color.with_alpha(ORBITAL_ALPHA);
        for i in 0..self.segments {
            let start = self.angle + f64::from(i) * PI;
            out.push(DrawCmd::Arc {
                cx: center.0,
                cy: center.1,
                radius: self.radius,
                start,
                end: start + FRAC_PI_2,
                paint,
                width: self.thickness,
            });
        }
    }
}

/// Faint square or triangle outline that rotates while floating upward.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingShape {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub angle: f64,
    pub spin: f64,
    pub color: Color,
    pub figure: Figure,
}

impl FloatingShape {
    pub fn spawn<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            size: rng.gen_range(10.0..40.0),
            angle: rng.gen_range(0.0..TAU),
            spin: rng.gen_range(-0.005..0.005),
            color: pick_color(&AMBIENT_PALETTE, rng),
            figure: if rng.gen_bool(0.5) {
                Figure::Square
            } else {
                Figure::Triangle
            },
        }
    }

    pub fn update(&mut self, bounds: Bounds) {
        self.angle += self.spin;
        self.y -= SHAPE_RISE;
        recycle_vertical(&mut self.y, bounds.height, SHAPE_MARGIN, Exit::Top);
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Outline {
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: self.angle,
            figure: self.figure,
            paint: self.color.with_alpha(SHAPE_ALPHA),
            width: 1.0,
            filled: false,
        });
    }
}

/// Tumbling paper strip falling under gravity, swaying sideways.
#[derive(Clone, Debug, PartialEq)]
pub struct Confetti {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub angle: f64,
    pub spin: f64,
    pub sway: f64,
    pub color: Color,
}

impl Confetti {
    pub fn spawn<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            vx: rng.gen_range(-0.5..0.5),
            vy: rng.gen_range(0.5..2.0),
            size: rng.gen_range(6.0..12.0),
            angle: rng.gen_range(0.0..TAU),
            spin: rng.gen_range(-0.1..0.1),
            sway: rng.gen_range(0.0..TAU),
            color: pick_color(&FESTIVE_PALETTE, rng),
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.vy = (self.vy + CONFETTI_GRAVITY).min(CONFETTI_MAX_FALL);
        self.sway += 0.05;
        self.x += self.vx + self.sway.sin() * 0.5;
        self.y += self.vy;
        self.angle += self.spin;
        if recycle_vertical(&mut self.y, bounds.height, CONFETTI_MARGIN, Exit::Bottom) {
            self.x = rng.gen_range(0.0..=bounds.width);
            self.vy = rng.gen_range(0.5..2.0);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Outline {
            x: self.x,
            y: self.y,
            size: self.size,
            rotation: self.angle,
            figure: Figure::Strip,
            paint: self.color.with_alpha(CONFETTI_ALPHA),
            width: 0.0,
            filled: true,
        });
    }
}

/// Point of light that swells and fades in a loop, jumping somewhere new each cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Sparkle {
    pub x: f64,
    pub y: f64,
    /// Position in the pulse cycle, in [0, 1).
    pub phase: f64,
    pub rate: f64,
    pub max_size: f64,
    pub color: Color,
}

impl Sparkle {
    pub fn spawn<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            phase: rng.gen_range(0.0..1.0),
            rate: rng.gen_range(0.005..0.02),
            max_size: rng.gen_range(1.0..3.0),
            color: pick_color(&FESTIVE_PALETTE, rng),
        }
    }

    /// Rises from 0 to 1 over the first half of the cycle and back down over the second.
    pub fn intensity(&self) -> f64 {
        (self.phase * PI).sin().max(0.0)
    }

    pub fn update<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.phase += self.rate;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            self.x = rng.gen_range(0.0..=bounds.width);
            self.y = rng.gen_range(0.0..=bounds.height);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        let k = self.intensity();
        out.push(DrawCmd::Disc {
            x: self.x,
            y: self.y,
            radius: self.max_size * k,
            paint: self.color.with_alpha(0.9 * k),
            glow: Some(Glow {
                blur: 8.0 * k,
                color: self.color,
            }),
        });
    }
}

/// Hollow circle rising with a side-to-side wobble.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub rise: f64,
    pub radius: f64,
    pub wobble: f64,
    pub phase: f64,
    pub color: Color,
    pub alpha: f64,
}

impl Bubble {
    pub fn spawn<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..=bounds.width),
            y: rng.gen_range(0.0..=bounds.height),
            rise: rng.gen_range(0.3..1.0),
            radius: rng.gen_range(4.0..16.0),
            wobble: rng.gen_range(0.2..0.6),
            phase: rng.gen_range(0.0..TAU),
            color: pick_color(&FESTIVE_PALETTE, rng),
            alpha: rng.gen_range(0.1..0.25),
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.phase += 0.02;
        self.x += self.phase.sin() * self.wobble;
        self.y -= self.rise;
        if recycle_vertical(&mut self.y, bounds.height, self.radius, Exit::Top) {
            self.x = rng.gen_range(0.0..=bounds.width);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Ring {
            x: self.x,
            y: self.y,
            radius: self.radius,
            paint: self.color.with_alpha(self.alpha),
            width: 1.0,
        });
    }
}

// --- Scene ------------------------------------------------------------------

pub struct AmbientScene {
    bounds: Bounds,
    variant: AmbientVariant,
    nodes: Vec<Node>,
    orbitals: Vec<Orbital>,
    shapes: Vec<FloatingShape>,
    confetti: Vec<Confetti>,
    sparkles: Vec<Sparkle>,
    bubbles: Vec<Bubble>,
    // per-frame scratch: which nodes sit inside the cursor glow
    near_cursor: Vec<bool>,
}

impl AmbientScene {
    pub fn new<R: Rng + ?Sized>(bounds: Bounds, variant: AmbientVariant, rng: &mut R) -> Self {
        let mut scene = Self {
            bounds,
            variant,
            nodes: Vec::new(),
            orbitals: Vec::new(),
            shapes: Vec::new(),
            confetti: Vec::new(),
            sparkles: Vec::new(),
            bubbles: Vec::new(),
            near_cursor: Vec::new(),
        };
        scene.populate(rng);
        scene
    }

    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let b = self.bounds;
        let kinds = self.variant.kinds();
        // kinds outside the variant get an empty pool
        let count = |kind: Kind| if kinds.contains(&kind) { kind.population(b) } else { 0 };
        refill(&mut self.nodes, count(Kind::Node), || Node::spawn(b, rng));
        refill(&mut self.orbitals, count(Kind::Orbital), || Orbital::spawn(rng));
        refill(&mut self.shapes, count(Kind::Shape), || FloatingShape::spawn(b, rng));
        refill(&mut self.confetti, count(Kind::Confetti), || Confetti::spawn(b, rng));
        refill(&mut self.sparkles, count(Kind::Sparkle), || Sparkle::spawn(b, rng));
        refill(&mut self.bubbles, count(Kind::Bubble), || Bubble::spawn(b, rng));
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn variant(&self) -> AmbientVariant {
        self.variant
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn orbitals(&self) -> &[Orbital] {
        &self.orbitals
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    pub fn confetti(&self) -> &[Confetti] {
        &self.confetti
    }

    pub fn sparkles(&self) -> &[Sparkle] {
        &self.sparkles
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Live pool size for `kind`; always 0 for the transient celebration kinds.
    pub fn population(&self, kind: Kind) -> usize {
        match kind {
            Kind::Node => self.nodes.len(),
            Kind::Orbital => self.orbitals.len(),
            Kind::Shape => self.shapes.len(),
            Kind::Confetti => self.confetti.len(),
            Kind::Sparkle => self.sparkles.len(),
            Kind::Bubble => self.bubbles.len(),
            Kind::Shell | Kind::Burst => 0,
        }
    }

    /// Rebuild every size-dependent pool for the new canvas size.
    pub fn reset<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) {
        self.bounds = bounds;
        self.populate(rng);
    }

    /// One animation frame: opaque clear, then update and draw each pool in turn.
    pub fn step<R: Rng + ?Sized>(&mut self, cursor: Cursor, rng: &mut R, out: &mut Vec<DrawCmd>) {
        let b = self.bounds;
        out.push(DrawCmd::Fill(BACKDROP.with_alpha(1.0)));

        let center = b.center();
        for orbital in &mut self.orbitals {
            orbital.update();
            orbital.draw(center, out);
        }
        for shape in &mut self.shapes {
            shape.update(b);
            shape.draw(out);
        }
        for bubble in &mut self.bubbles {
            bubble.update(b, rng);
            bubble.draw(out);
        }
        for flake in &mut self.confetti {
            flake.update(b, rng);
            flake.draw(out);
        }
        for sparkle in &mut self.sparkles {
            sparkle.update(b, rng);
            sparkle.draw(out);
        }

        for node in &mut self.nodes {
            node.update(b);
        }
        link_nodes(&self.nodes, &mut self.near_cursor, cursor, out);
        for node in &self.nodes {
            node.draw(cursor, out);
        }
    }
}

impl Scene for AmbientScene {
    fn resize(&mut self, bounds: Bounds, rng: &mut dyn rand::RngCore) {
        self.reset(bounds, rng);
    }

    fn frame(&mut self, cursor: Cursor, rng: &mut dyn rand::RngCore, out: &mut Vec<DrawCmd>) {
        self.step(cursor, rng, out);
    }
}

/// Link every pair of nodes closer than [`LINK_DISTANCE`] when at least one of
/// them is inside the cursor glow. Opacity falls off linearly with distance.
pub fn link_nodes(nodes: &[Node], near: &mut Vec<bool>, cursor: Cursor, out: &mut Vec<DrawCmd>) {
    near.clear();
    near.extend(
        nodes
            .iter()
            .map(|n| cursor.distance_to(n.x, n.y) < GLOW_RADIUS),
    );
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            if !(near[i] || near[j]) {
                continue;
            }
            let dist = (a.x - b.x).hypot(a.y - b.y);
            if dist < LINK_DISTANCE {
                out.push(DrawCmd::Segment {
                    from: (a.x, a.y),
                    to: (b.x, b.y),
                    paint: a
                        .color
                        .with_alpha((1.0 - dist / LINK_DISTANCE) * LINK_OPACITY),
                    width: LINK_WIDTH,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn node_at(x: f64, y: f64) -> Node {
        Node {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            color: AMBIENT_PALETTE[0],
            alpha: 0.2,
        }
    }

    fn segments(out: &[DrawCmd]) -> Vec<&DrawCmd> {
        out.iter()
            .filter(|c| matches!(c, DrawCmd::Segment { .. }))
            .collect()
    }

    #[test]
    fn same_size_same_counts_regardless_of_seed() {
        let bounds = Bounds::new(1280.0, 720.0);
        let a = AmbientScene::new(bounds, AmbientVariant::Festive, &mut StdRng::seed_from_u64(1));
        let b = AmbientScene::new(bounds, AmbientVariant::Festive, &mut StdRng::seed_from_u64(99));
        for kind in Kind::RECYCLED {
            assert_eq!(a.population(kind), b.population(kind), "{kind:?}");
            assert_eq!(a.population(kind), kind.population(bounds), "{kind:?}");
        }
        assert_eq!(a.nodes().len(), 115);
    }

    #[test]
    fn classic_variant_has_no_festive_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let scene = AmbientScene::new(Bounds::new(800.0, 600.0), AmbientVariant::Classic, &mut rng);
        assert_eq!(scene.population(Kind::Node), 60);
        assert_eq!(scene.population(Kind::Orbital), 8);
        assert_eq!(scene.population(Kind::Shape), 20);
        assert!(scene.confetti().is_empty());
        assert!(scene.sparkles().is_empty());
        assert!(scene.bubbles().is_empty());
        assert_eq!(AmbientVariant::Classic.kinds(), &[Kind::Node, Kind::Orbital, Kind::Shape]);
    }

    #[test]
    fn pools_follow_variant_kinds() {
        let bounds = Bounds::new(1024.0, 768.0);
        for variant in [AmbientVariant::Classic, AmbientVariant::Festive] {
            let scene = AmbientScene::new(bounds, variant, &mut StdRng::seed_from_u64(8));
            for kind in Kind::RECYCLED {
                let expected = if variant.kinds().contains(&kind) {
                    kind.population(bounds)
                } else {
                    0
                };
                assert_eq!(scene.population(kind), expected, "{variant:?} {kind:?}");
            }
        }
    }

    #[test]
    fn reset_rebuilds_for_new_size() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = AmbientScene::new(Bounds::new(800.0, 600.0), AmbientVariant::Classic, &mut rng);
        scene.reset(Bounds::new(400.0, 200.0), &mut rng);
        assert_eq!(scene.population(Kind::Node), 10);
        assert_eq!(scene.bounds(), Bounds::new(400.0, 200.0));
        assert!(scene.nodes().iter().all(|n| n.x <= 400.0 && n.y <= 200.0));
    }

    #[test]
    fn node_reflects_off_edges_without_energy_loss() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut node = node_at(99.9, 0.1);
        node.vx = 0.2;
        node.vy = -0.3;
        node.update(bounds);
        assert_eq!(node.vx, -0.2);
        assert_eq!(node.vy, 0.3);
        node.update(bounds);
        assert!(node.x < 100.0 && node.y > 0.0);
    }

    #[test]
    fn glow_is_linear_inside_radius() {
        let node = node_at(0.0, 0.0);
        assert!((node.glow(Cursor { x: 125.0, y: 0.0 }) - 0.5).abs() < 1e-12);
        assert_eq!(node.glow(Cursor { x: 0.0, y: 0.0 }), 1.0);
        assert_eq!(node.glow(Cursor { x: 250.0, y: 0.0 }), 0.0);
        assert_eq!(node.glow(Cursor::OFFSCREEN), 0.0);
    }

    #[test]
    fn bright_nodes_grow_and_cast_a_shadow() {
        let node = node_at(0.0, 0.0);
        let mut out = Vec::new();
        node.draw(Cursor { x: 50.0, y: 0.0 }, &mut out);
        match out[0] {
            DrawCmd::Disc {
                radius, paint, glow, ..
            } => {
                assert!((radius - (2.0 + 0.8 * 3.0)).abs() < 1e-9);
                assert!((paint.alpha - 1.0).abs() < 1e-9);
                assert!((glow.unwrap().blur - 8.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected {other:?}"),
        }
        out.clear();
        node.draw(Cursor { x: 200.0, y: 0.0 }, &mut out);
        assert!(matches!(out[0], DrawCmd::Disc { glow: None, .. }));
    }

    #[test]
    fn links_need_proximity_and_cursor() {
        let nodes = vec![node_at(0.0, 0.0), node_at(60.0, 0.0), node_at(400.0, 0.0)];
        let mut near = Vec::new();
        let mut out = Vec::new();

        link_nodes(&nodes, &mut near, Cursor::OFFSCREEN, &mut out);
        assert!(out.is_empty());

        link_nodes(&nodes, &mut near, Cursor { x: 0.0, y: 10.0 }, &mut out);
        let segs = segments(&out);
        assert_eq!(segs.len(), 1);
        assert!((segs[0].paint().alpha - 0.075).abs() < 1e-12);
    }

    #[test]
    fn link_drawn_when_only_second_endpoint_is_near() {
        let nodes = vec![node_at(0.0, 0.0), node_at(100.0, 0.0)];
        let mut near = Vec::new();
        let mut out = Vec::new();
        // 340 from the first node, 240 from the second
        link_nodes(&nodes, &mut near, Cursor { x: 340.0, y: 0.0 }, &mut out);
        assert_eq!(segments(&out).len(), 1);
    }

    #[test]
    fn orbital_turns_and_draws_its_segments() {
        let mut orbital = Orbital {
            radius: 200.0,
            angle: 1.0,
            speed: 0.002,
            thickness: 1.0,
            color: AMBIENT_PALETTE[1],
            segments: 3,
        };
        orbital.update();
        assert!((orbital.angle - 1.002).abs() < 1e-12);
        let mut out = Vec::new();
        orbital.draw((400.0, 300.0), &mut out);
        assert_eq!(out.len(), 3);
        match out[1] {
            DrawCmd::Arc { start, end, cx, .. } => {
                assert!((start - (1.002 + PI)).abs() < 1e-12);
                assert!((end - start - FRAC_PI_2).abs() < 1e-12);
                assert_eq!(cx, 400.0);
            }
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn shape_recycles_to_bottom_in_same_update() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = Bounds::new(800.0, 600.0);
        let mut shape = FloatingShape::spawn(bounds, &mut rng);
        shape.y = -49.9;
        shape.update(bounds);
        assert_eq!(shape.y, 650.0);
    }

    #[test]
    fn confetti_recycles_to_top() {
        let mut rng = StdRng::seed_from_u64(6);
        let bounds = Bounds::new(800.0, 600.0);
        let mut flake = Confetti::spawn(bounds, &mut rng);
        flake.y = 619.5;
        flake.vy = 2.0;
        flake.update(bounds, &mut rng);
        assert_eq!(flake.y, -CONFETTI_MARGIN);
        assert!((0.0..=800.0).contains(&flake.x));
    }

    #[test]
    fn confetti_fall_speed_is_capped() {
        let mut rng = StdRng::seed_from_u64(8);
        let bounds = Bounds::new(800.0, 1e9);
        let mut flake = Confetti::spawn(bounds, &mut rng);
        for _ in 0..500 {
            flake.update(bounds, &mut rng);
        }
        assert_eq!(flake.vy, CONFETTI_MAX_FALL);
    }

    #[test]
    fn bubble_recycles_to_bottom() {
        let mut rng = StdRng::seed_from_u64(9);
        let bounds = Bounds::new(800.0, 600.0);
        let mut bubble = Bubble::spawn(bounds, &mut rng);
        bubble.y = -bubble.radius;
        bubble.update(bounds, &mut rng);
        assert_eq!(bubble.y, 600.0 + bubble.radius);
    }

    #[test]
    fn sparkle_pulses_then_jumps() {
        let mut rng = StdRng::seed_from_u64(10);
        let bounds = Bounds::new(800.0, 600.0);
        let mut sparkle = Sparkle::spawn(bounds, &mut rng);
        sparkle.phase = 0.5;
        assert!((sparkle.intensity() - 1.0).abs() < 1e-12);

        sparkle.phase = 0.99;
        sparkle.rate = 0.02;
        sparkle.x = -5.0;
        sparkle.update(bounds, &mut rng);
        assert!((sparkle.phase - 0.01).abs() < 1e-9);
        assert!((0.0..=800.0).contains(&sparkle.x));
        assert!(sparkle.intensity() < 0.1);
    }

    #[test]
    fn frame_starts_with_opaque_clear_and_keeps_populations() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = AmbientScene::new(Bounds::new(640.0, 480.0), AmbientVariant::Festive, &mut rng);
        let mut out = Vec::new();
        for _ in 0..200 {
            out.clear();
            scene.step(Cursor { x: 320.0, y: 240.0 }, &mut rng, &mut out);
        }
        assert_eq!(out[0], DrawCmd::Fill(BACKDROP.with_alpha(1.0)));
        for kind in Kind::RECYCLED {
            assert_eq!(scene.population(kind), kind.population(scene.bounds()));
        }
        let discs = out.iter().filter(|c| matches!(c, DrawCmd::Disc { .. })).count();
        assert_eq!(discs, scene.nodes().len() + scene.sparkles().len());
    }
}
