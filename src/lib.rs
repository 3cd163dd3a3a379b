mod api;
mod app;
mod cache;
mod components;
mod drafts;
mod models;
mod pages;
mod state;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::storage::{
        load_string_from_storage, remove_from_storage, save_string_to_storage, CURRENT_WINE_KEY,
        TOKEN_KEY,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_client_storage_roundtrip_token() {
        ApiClient::clear_storage();

        let mut c = ApiClient::load_from_storage();
        assert!(!c.is_authenticated());

        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage();
        assert!(c2.is_authenticated());
        assert_eq!(load_string_from_storage(TOKEN_KEY).as_deref(), Some("t1"));

        ApiClient::clear_storage();
        let c3 = ApiClient::load_from_storage();
        assert!(!c3.is_authenticated());
    }

    #[wasm_bindgen_test]
    fn test_current_wine_selection_roundtrip() {
        remove_from_storage(CURRENT_WINE_KEY);
        assert!(load_string_from_storage(CURRENT_WINE_KEY).is_none());

        save_string_to_storage(CURRENT_WINE_KEY, "wine-42");
        assert_eq!(
            load_string_from_storage(CURRENT_WINE_KEY).as_deref(),
            Some("wine-42")
        );

        remove_from_storage(CURRENT_WINE_KEY);
        assert!(load_string_from_storage(CURRENT_WINE_KEY).is_none());
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
