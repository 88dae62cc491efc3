//! Frame driver: binds a [`Scene`] to a canvas and repaints it every animation
//! frame until unmounted.
//!
//! The stage owns the `requestAnimationFrame` closure, the window `resize`
//! listener and (for scenes that react to the pointer) the `mousemove` listener.
//! Dropping or unmounting the stage cancels the pending frame and removes both
//! listeners before returning, so no callback can reach a torn-down canvas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window, window};

use super::draw::{self, DrawCmd};
use super::{Bounds, Cursor, Scene};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct StageState<S> {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    bounds: Bounds,
    scene: S,
    rng: StdRng,
    // reused every frame so steady-state frames don't allocate
    commands: Vec<DrawCmd>,
}

pub struct Stage {
    name: &'static str,
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    frame: FrameCallback,
    on_resize: Option<Closure<dyn FnMut(web_sys::Event)>>,
    on_move: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl Stage {
    /// Size `canvas` to the window, build the scene for that size and start
    /// repainting. With `track_cursor` the scene sees the pointer position.
    pub fn mount<S, F>(
        name: &'static str,
        canvas: HtmlCanvasElement,
        track_cursor: bool,
        build: F,
    ) -> Result<Stage, JsValue>
    where
        S: Scene + 'static,
        F: FnOnce(Bounds, &mut StdRng) -> S,
    {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        let bounds = fit_to_window(&win, &canvas);
        let mut rng = StdRng::from_entropy();
        let scene = build(bounds, &mut rng);
        console_log!(
            "stage {name}: mounted at {}x{}",
            bounds.width,
            bounds.height
        );

        let state = Rc::new(RefCell::new(StageState {
            canvas,
            ctx,
            bounds,
            scene,
            rng,
            commands: Vec::new(),
        }));
        let cursor = Rc::new(Cell::new(Cursor::OFFSCREEN));
        let running = Rc::new(Cell::new(true));
        let frame_id = Rc::new(Cell::new(None));
        let frame: FrameCallback = Rc::new(RefCell::new(None));

        {
            let f = frame.clone();
            let state = state.clone();
            let cursor = cursor.clone();
            let running = running.clone();
            let frame_id = frame_id.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
                if !running.get() {
                    return;
                }
                {
                    let mut guard = state.borrow_mut();
                    let st = &mut *guard;
                    st.commands.clear();
                    st.scene.frame(cursor.get(), &mut st.rng, &mut st.commands);
                    if let Err(err) = draw::paint_commands(&st.ctx, st.bounds, &st.commands) {
                        console_warn!("stage {name}: paint failed: {err:?}");
                    }
                }
                frame_id.set(request_frame(&f));
            }) as Box<dyn FnMut(f64)>));
        }

        // owned by the stage from here on, so an early return tears down
        // whatever was already attached
        let mut stage = Stage {
            name,
            running,
            frame_id,
            frame,
            on_resize: None,
            on_move: None,
        };

        let on_resize = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(win) = window() else { return };
            let mut guard = state.borrow_mut();
            let st = &mut *guard;
            st.bounds = fit_to_window(&win, &st.canvas);
            st.scene.resize(st.bounds, &mut st.rng);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        stage.on_resize = Some(on_resize);

        if track_cursor {
            let on_move = Closure::wrap(Box::new(move |evt: MouseEvent| {
                cursor.set(Cursor {
                    x: f64::from(evt.client_x()),
                    y: f64::from(evt.client_y()),
                });
            }) as Box<dyn FnMut(_)>);
            win.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
            stage.on_move = Some(on_move);
        }

        stage.frame_id.set(request_frame(&stage.frame));
        Ok(stage)
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop repainting and detach every listener.
    pub fn unmount(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(win) = window() {
            if let Some(id) = self.frame_id.take() {
                let _ = win.cancel_animation_frame(id);
            }
            if let Some(cb) = self.on_resize.take() {
                let _ = win
                    .remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
            }
            if let Some(cb) = self.on_move.take() {
                let _ = win
                    .remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
            }
        }
        // the frame closure holds a handle to itself; dropping it breaks the cycle
        self.frame.borrow_mut().take();
        console_log!("stage {}: unmounted", self.name);
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn request_frame(frame: &FrameCallback) -> Option<i32> {
    let win = window()?;
    let guard = frame.borrow();
    let cb = guard.as_ref()?;
    win.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

/// Match the canvas backing size to the window's inner size.
fn fit_to_window(win: &Window, canvas: &HtmlCanvasElement) -> Bounds {
    let width = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_else(|| f64::from(canvas.width()));
    let height = win
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or_else(|| f64::from(canvas.height()));
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    Bounds::new(width, height)
}
