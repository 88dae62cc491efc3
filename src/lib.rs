//! Dawn Countdown core crate.
//!
//! A new-year landing page rendered from wasm: an always-on ambient canvas
//! (drifting nodes, orbit arcs, floating outlines), a fireworks overlay mounted
//! once the countdown reaches zero, and a rotating list of short predictions.
//! The simulation, countdown arithmetic and text rotation are plain Rust and run
//! under `cargo test` on the host; `page` and `fx::stage` hold the browser glue.

use wasm_bindgen::prelude::*;

#[macro_use]
mod log;

pub mod config;
pub mod countdown;
pub mod fx;
pub mod inspiration;
pub mod rotation;

mod page;
mod timer;

pub use page::{start_page, stop_page};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Countdown fields between two epoch-millisecond instants, as a JSON object
/// (`days`, `hours`, `minutes`, `seconds`, `total`).
#[wasm_bindgen]
pub fn time_left_json(target_ms: f64, now_ms: f64) -> String {
    let left = countdown::TimeLeft::until(target_ms as i64, now_ms as i64);
    serde_json::to_string(&left).unwrap_or_default()
}
