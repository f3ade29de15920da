use wasm_bindgen::prelude::*;
pub mod abi;
mod app;
mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod provider;
pub mod state;
mod utils;

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<app::App>::new().render();
    Ok(())
}
