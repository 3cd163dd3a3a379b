/// JWT issued at signin/signup. Cleared on logout and on 401.
pub(crate) const TOKEN_KEY: &str = "notevino_token";

/// Last wine opened in the detail pane, restored on the next visit.
pub(crate) const CURRENT_WINE_KEY: &str = "notevino_current_wine";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn save_string_to_storage(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(key, value);
    }
}

pub(crate) fn load_string_from_storage(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}
