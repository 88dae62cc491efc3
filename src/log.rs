//! Console logging. In the browser lines go to `console.log` / `console.warn`;
//! host builds (tests) write to stderr.

#[derive(Clone, Copy, Debug)]
pub enum Level {
    Info,
    Warn,
}

#[cfg(target_arch = "wasm32")]
pub fn write(level: Level, msg: &str) {
    let line = wasm_bindgen::JsValue::from_str(msg);
    match level {
        Level::Info => web_sys::console::log_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(level: Level, msg: &str) {
    let tag = match level {
        Level::Info => "info",
        Level::Warn => "warn",
    };
    eprintln!("[dawn-countdown {tag}] {msg}");
}

// `println!`-style console logging
macro_rules! console_log {
    ($($t:tt)*) => ($crate::log::write($crate::log::Level::Info, &format!($($t)*)))
}

macro_rules! console_warn {
    ($($t:tt)*) => ($crate::log::write($crate::log::Level::Warn, &format!($($t)*)))
}
