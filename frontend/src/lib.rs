use leptos::*;
use wasm_bindgen::prelude::wasm_bindgen;

mod components;
mod logging;
pub mod stocks;

pub use components::dashboard::Dashboard;
pub use logging::init_logging;
pub use stocks::api::{FetchStatus, ScreenFetchError, fetch_screen};
pub use stocks::storage::LocalStore;

/// Root component bootstrapping the screener.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app-root">
            <Dashboard />
        </main>
    }
}

/// WASM entry point called automatically by `trunk`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), wasm_bindgen::JsValue> {
    init_logging();
    console_error_panic_hook::set_once();

    leptos::mount_to_body(|| view! { <App /> });
    Ok(())
}
