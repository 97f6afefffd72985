mod app;
mod app_state;
pub mod canvas;
pub mod config;
mod event_handler;
pub mod gesture;
pub mod images;
pub mod input;
pub mod math;
mod renderer;
pub mod scene;
mod state;
mod texture;
pub mod toolbar;
mod update_logic;
mod vertex;

pub use app::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(err) = run() {
        log::error!("viewer exited with error: {err:#}");
    }
}
