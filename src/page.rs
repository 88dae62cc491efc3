//! Page wiring: background stage, countdown timer, prediction rotation and the
//! celebration overlay, all held in one thread-local so JS callbacks can reach it.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, window};

use crate::config::{ElementIds, MIN_TARGET_YEAR, PageConfig};
use crate::countdown::{Countdown, TimeLeft};
use crate::fx::{AmbientScene, Bounds, CelebrationScene, Stage};
use crate::inspiration::{self, Inspiration};
use crate::rotation::Rotation;
use crate::timer::Interval;

const BACKGROUND_STYLE: &str =
    "position:fixed; inset:0; width:100%; height:100%; z-index:-10; display:block; background:#020617;";
const CELEBRATION_STYLE: &str =
    "position:fixed; inset:0; width:100%; height:100%; z-index:50; pointer-events:none;";
const CELEBRATING_CLASS: &str = "celebrating";

struct PageState {
    /// Tags async work started by this page; results carrying another
    /// generation belong to a page that has since been torn down.
    generation: u64,
    config: PageConfig,
    background: Option<Stage>,
    celebration: Option<Stage>,
    countdown: Countdown,
    countdown_timer: Option<Interval>,
    rotation: Rotation<Inspiration>,
    rotation_timer: Option<Interval>,
}

thread_local! {
    static PAGE: RefCell<Option<PageState>> = const { RefCell::new(None) };
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

fn next_generation() -> u64 {
    GENERATION.with(|g| {
        let next = g.get().wrapping_add(1);
        g.set(next);
        next
    })
}

/// Mount the page. `config_json` is an optional JSON object (see `PageConfig`).
/// Calling it again restarts from scratch.
#[wasm_bindgen]
pub fn start_page(config_json: Option<String>) -> Result<(), JsValue> {
    stop_page();
    let config = PageConfig::from_json(config_json.as_deref())
        .map_err(|e| JsValue::from_str(&format!("invalid page config: {e}")))?;
    let doc = document()?;

    let (target_ms, year) = resolve_target(&config);
    console_log!("counting down to {year} (epoch ms {target_ms})");

    let canvas = ensure_canvas(&doc, &config.ids.background_canvas, BACKGROUND_STYLE)?;
    let variant = config.variant;
    let background = Stage::mount("background", canvas, true, move |bounds, rng| {
        AmbientScene::new(bounds, variant, rng)
    })?;

    let period = config.countdown_period_ms;
    let loader_config = config.clone();
    let generation = next_generation();
    PAGE.with(|cell| {
        cell.replace(Some(PageState {
            generation,
            config,
            background: Some(background),
            celebration: None,
            countdown: Countdown::new(target_ms),
            countdown_timer: None,
            rotation: Rotation::default(),
            rotation_timer: None,
        }))
    });

    // paint the fields right away instead of waiting a full period
    on_countdown_tick();
    let already_over = PAGE.with(|cell| {
        cell.borrow()
            .as_ref()
            .is_none_or(|st| st.countdown.is_celebrating())
    });
    if !already_over {
        let timer = Interval::every(period, on_countdown_tick)?;
        with_page(|st| st.countdown_timer = Some(timer));
    }

    wasm_bindgen_futures::spawn_local(async move {
        let items = inspiration::load(&loader_config, year).await;
        install_predictions(generation, items);
    });
    Ok(())
}

/// Tear the page down: cancel every timer and animation frame, detach listeners.
#[wasm_bindgen]
pub fn stop_page() {
    // take first so the drops run outside the RefCell borrow
    let state = PAGE.with(|cell| cell.borrow_mut().take());
    let Some(mut state) = state else { return };
    let celebrated = state.celebration.is_some();
    for mut stage in [state.celebration.take(), state.background.take()].into_iter().flatten() {
        stage.unmount();
    }
    drop(state);
    if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
        let _ = body.class_list().remove_1(CELEBRATING_CLASS);
    }
    console_log!("page stopped (celebrated: {celebrated})");
}

fn with_page(f: impl FnOnce(&mut PageState)) {
    PAGE.with(|cell| {
        if let Some(st) = cell.borrow_mut().as_mut() {
            f(st);
        }
    });
}

fn on_countdown_tick() {
    let now = js_sys::Date::now() as i64;
    let mut celebrate = false;
    with_page(|st| {
        let tick = st.countdown.tick(now);
        render_time_left(&st.config.ids, &tick.left);
        if tick.celebrate {
            if let Some(timer) = st.countdown_timer.as_mut() {
                timer.cancel();
            }
            celebrate = true;
        }
    });
    if celebrate {
        if let Err(err) = begin_celebration() {
            console_warn!("could not start celebration: {err:?}");
        }
    }
}

fn begin_celebration() -> Result<(), JsValue> {
    let doc = document()?;
    let mut result = Ok(());
    with_page(|st| {
        // the overlay is mounted at most once per page
        if st.celebration.as_ref().is_some_and(Stage::is_running) {
            return;
        }
        let chance = st.config.firework_chance;
        result = ensure_canvas(&doc, &st.config.ids.celebration_canvas, CELEBRATION_STYLE)
            .and_then(|canvas| {
                Stage::mount("celebration", canvas, false, move |bounds: Bounds, _rng| {
                    CelebrationScene::new(bounds, chance)
                })
            })
            .map(|stage| st.celebration = Some(stage));
        console_log!(
            "countdown finished; celebration mounted (timer armed: {})",
            st.countdown_timer.as_ref().is_some_and(Interval::is_armed)
        );
    });
    result?;
    if let Some(body) = doc.body() {
        body.class_list().add_1(CELEBRATING_CLASS)?;
    }
    Ok(())
}

fn install_predictions(generation: u64, items: Vec<Inspiration>) {
    with_page(|st| {
        if !accept_predictions(st, generation, items) {
            console_log!("dropping predictions loaded for an earlier page");
            return;
        }
        render_prediction(&st.config.ids, st.rotation.current());
        // re-arm for the new collection; stays disarmed while empty
        st.rotation_timer = None;
        if st.rotation.is_empty() {
            return;
        }
        match Interval::every(st.config.rotation_period_ms, on_rotation_tick) {
            Ok(timer) => st.rotation_timer = Some(timer),
            Err(err) => console_warn!("could not arm prediction rotation: {err:?}"),
        }
    });
}

/// Swap `items` into the rotation if they were loaded for this page.
fn accept_predictions(st: &mut PageState, generation: u64, items: Vec<Inspiration>) -> bool {
    if st.generation != generation {
        return false;
    }
    st.rotation.replace(items);
    true
}

fn on_rotation_tick() {
    with_page(|st| {
        let current = st.rotation.advance();
        render_prediction(&st.config.ids, current);
    });
}

// --- DOM helpers ------------------------------------------------------------

fn document() -> Result<Document, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Reuse the canvas with `id`, or create one on `<body>` with `style`.
fn ensure_canvas(doc: &Document, id: &str, style: &str) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return el.dyn_into().map_err(|_| JsValue::from_str("element is not a canvas"));
    }
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id(id);
    canvas.set_attribute("style", style)?;
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&canvas)?;
    Ok(canvas)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        el.set_text_content(Some(text));
    }
}

fn render_time_left(ids: &ElementIds, left: &TimeLeft) {
    let [days, hours, minutes, seconds] = left.padded();
    set_text(&ids.days, &days);
    set_text(&ids.hours, &hours);
    set_text(&ids.minutes, &minutes);
    set_text(&ids.seconds, &seconds);
}

fn render_prediction(ids: &ElementIds, current: Option<&Inspiration>) {
    if let Some(item) = current {
        set_text(&ids.inspiration_text, &item.text);
        set_text(&ids.inspiration_topic, item.topic_label());
    }
}

/// Deadline in epoch ms plus the year it opens.
fn resolve_target(config: &PageConfig) -> (i64, i32) {
    let this_year = js_sys::Date::new_0().get_full_year() as i32;
    if let Some(ms) = config.target_epoch_ms {
        let year = js_sys::Date::new(&JsValue::from_f64(ms)).get_full_year() as i32;
        return (ms as i64, year);
    }
    let year = config.target_year.unwrap_or(this_year + 1);
    // local midnight, January 1st; `PageConfig` rejects years below 100, which
    // `Date` would read as 19xx
    let full_year = u32::try_from(year.max(MIN_TARGET_YEAR)).unwrap_or(u32::MAX);
    let target = js_sys::Date::new_with_year_month_day(full_year, 0, 1);
    (target.get_time() as i64, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(generation: u64) -> PageState {
        PageState {
            generation,
            config: PageConfig::default(),
            background: None,
            celebration: None,
            countdown: Countdown::new(0),
            countdown_timer: None,
            rotation: Rotation::default(),
            rotation_timer: None,
        }
    }

    #[test]
    fn predictions_from_an_earlier_page_are_dropped() {
        let first = next_generation();
        let second = next_generation();
        assert_ne!(first, second);

        let mut st = page(second);
        st.rotation.replace(vec![Inspiration::new("current", "Now")]);
        let stale = vec![Inspiration::new("stale", "Then"), Inspiration::new("stale 2", "Then")];
        assert!(!accept_predictions(&mut st, first, stale));
        assert_eq!(st.rotation.len(), 1);
        assert_eq!(st.rotation.current().map(|i| i.text.as_str()), Some("current"));

        assert!(accept_predictions(&mut st, second, inspiration::fallback()));
        assert_eq!(st.rotation.len(), 10);
    }
}
