// Browser tests for the canvas stage and page lifecycle.
// Run with `wasm-pack test --headless --firefox` (or --chrome).
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use dawn_countdown::fx::{BACKDROP, Bounds, Cursor, DrawCmd, Scene, Stage};
use dawn_countdown::{start_page, stop_page};
use rand::RngCore;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

struct Counting(Rc<Cell<u32>>);

impl Scene for Counting {
    fn resize(&mut self, _bounds: Bounds, _rng: &mut dyn RngCore) {}

    fn frame(&mut self, _cursor: Cursor, _rng: &mut dyn RngCore, out: &mut Vec<DrawCmd>) {
        self.0.set(self.0.get() + 1);
        out.push(DrawCmd::Fill(BACKDROP.with_alpha(1.0)));
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn canvas(id: &str) -> HtmlCanvasElement {
    let doc = document();
    let canvas: HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_id(id);
    doc.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn frames(n: usize) {
    for _ in 0..n {
        next_frame().await;
    }
}

fn canvases_with_id(id: &str) -> u32 {
    let all = document().get_elements_by_tag_name("canvas");
    (0..all.length())
        .filter_map(|i| all.item(i))
        .filter(|el| el.id() == id)
        .count() as u32
}

#[wasm_bindgen_test]
async fn unmounted_stage_stops_painting() {
    let painted = Rc::new(Cell::new(0));
    let counter = painted.clone();
    let mut stage =
        Stage::mount("unmount", canvas("web-unmount"), true, move |_, _| Counting(counter)).unwrap();
    frames(3).await;
    assert!(stage.is_running());
    assert!(painted.get() > 0);

    stage.unmount();
    assert!(!stage.is_running());
    let before = painted.get();
    frames(3).await;
    assert_eq!(painted.get(), before);

    // a second unmount is a no-op
    stage.unmount();
    assert!(!stage.is_running());
}

#[wasm_bindgen_test]
async fn dropped_stage_stops_painting() {
    let painted = Rc::new(Cell::new(0));
    let counter = painted.clone();
    let stage =
        Stage::mount("drop", canvas("web-drop"), false, move |_, _| Counting(counter)).unwrap();
    frames(2).await;
    drop(stage);
    let before = painted.get();
    frames(3).await;
    assert_eq!(painted.get(), before);
}

#[wasm_bindgen_test]
fn past_deadline_mounts_one_overlay() {
    let config = r#"{"targetEpochMs": 1000, "ids": {"backgroundCanvas": "web-bg", "celebrationCanvas": "web-fx"}}"#;
    start_page(Some(config.to_string())).unwrap();
    start_page(Some(config.to_string())).unwrap();

    let body = document().body().unwrap();
    assert!(body.class_list().contains("celebrating"));
    assert_eq!(canvases_with_id("web-fx"), 1);
    assert_eq!(canvases_with_id("web-bg"), 1);

    stop_page();
    assert!(!body.class_list().contains("celebrating"));
}

#[wasm_bindgen_test]
fn two_digit_year_is_rejected() {
    assert!(start_page(Some(r#"{"targetYear": 26}"#.to_string())).is_err());
}
