//! # client
//!
//! Leptos + WASM frontend for the assistant studio: create, edit and "train"
//! mock chat assistants, talk to them through a simulated chat, and keep
//! everything in browser `localStorage`.
//!
//! Domain logic (`state`, `sim`, `util::storage`) is plain Rust and tests
//! without the `hydrate` or `ssr` features. Browser glue is gated behind
//! `hydrate`; the server renders the same components under `ssr`.

pub mod app;
pub mod components;
pub mod pages;
pub mod sim;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
