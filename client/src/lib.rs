//! Browser behavior for the blog: theme switching, comment embeds, like
//! buttons, and the persistent radio player.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages are rendered ahead of time and swapped in place on navigation. This
//! crate attaches behavior to the data-attribute contract those pages carry.
//! With the `hydrate` feature it runs against the real page through
//! `host::browser`; without it the same logic runs natively over
//! `host::memory`.

pub mod app;
pub mod components;
pub mod embed;
pub mod host;
pub mod net;
pub mod state;
pub mod util;

/// WASM entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    match host::Env::browser() {
        Ok(env) => {
            app::start(env);
        }
        Err(e) => leptos::logging::warn!("client: page behaviors disabled: {e}"),
    }
}
