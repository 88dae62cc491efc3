//! Repeating `setInterval` timer that is cleared when cancelled or dropped.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

pub struct Interval {
    id: Option<i32>,
    // kept alive for as long as the browser may call it
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn every<F>(period_ms: i32, f: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            id: Some(id),
            _callback: callback,
        })
    }

    /// Stop future firings. The callback itself stays allocated until drop, so
    /// this is safe to call from inside the callback.
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(id);
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
