//! Pool lifecycle rules shared by the scenes: preallocated pools rebuilt on
//! resize, in-place recycling at the canvas edges, per-frame spawn rolls and
//! pruning of faded entities.

use rand::Rng;

/// Entities that fade out and leave their pool once fully transparent.
pub trait Fading {
    fn alpha(&self) -> f64;

    fn is_alive(&self) -> bool {
        self.alpha() > 0.0
    }
}

/// Drop every faded entry. Runs every frame so the pool never carries dead weight
/// into the next draw pass. Returns how many were removed.
pub fn prune<T: Fading>(pool: &mut Vec<T>) -> usize {
    let before = pool.len();
    pool.retain(|item| item.is_alive());
    before - pool.len()
}

/// Rebuild a preallocated pool with exactly `count` fresh entries.
pub fn refill<T>(pool: &mut Vec<T>, count: usize, make: impl FnMut() -> T) {
    pool.clear();
    pool.reserve(count);
    pool.extend(std::iter::repeat_with(make).take(count));
}

/// Constant per-frame spawn probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawner {
    chance: f64,
}

impl Spawner {
    pub fn new(chance: f64) -> Self {
        let chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
        Self { chance }
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.chance)
    }
}

/// Edge a recycled entity leaves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Rising kinds; they come back in below the bottom edge.
    Top,
    /// Falling kinds; they come back in above the top edge.
    Bottom,
}

/// Move `y` to the opposite edge once it is more than `margin` past `exit`.
/// Returns whether it wrapped.
pub fn recycle_vertical(y: &mut f64, height: f64, margin: f64, exit: Exit) -> bool {
    match exit {
        Exit::Top if *y < -margin => {
            *y = height + margin;
            true
        }
        Exit::Bottom if *y > height + margin => {
            *y = -margin;
            true
        }
        _ => false,
    }
}

/// Exact reflection: negate the velocity component when `pos` is outside `[0, extent]`.
pub fn reflect(pos: f64, vel: &mut f64, extent: f64) {
    if pos < 0.0 || pos > extent {
        *vel = -*vel;
    }
}
