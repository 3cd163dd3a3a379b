use crate::cache::RequestSeq;
use crate::models::Suggestion;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Debounced search-as-you-type controller for the sidebar search box.
///
/// Responsibilities:
/// - hold the query text and the current suggestion list
/// - wait out a 300ms idle gap before dispatching, one timer total
/// - stamp every dispatch and drop responses a newer keystroke outran
///
/// An empty query is a real request (the backend answers it with popular
/// wines), so dispatch never short-circuits on "".
#[derive(Clone)]
pub(crate) struct SuggestController {
    app_state: AppContext,

    pub query: RwSignal<String>,
    pub suggestions: RwSignal<Vec<Suggestion>>,
    pub open: RwSignal<bool>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    debounce_ms: i32,
    debounce_timer: RwSignal<Option<i32>>,
    request_seq: RwSignal<RequestSeq>,
}

impl SuggestController {
    pub fn new(app_state: AppContext) -> Self {
        Self {
            app_state,
            query: RwSignal::new(String::new()),
            suggestions: RwSignal::new(vec![]),
            open: RwSignal::new(false),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            debounce_ms: 300,
            debounce_timer: RwSignal::new(None),
            request_seq: RwSignal::new(RequestSeq::default()),
        }
    }

    /// Called on every keystroke in the search box.
    pub fn on_query_changed(&self, query: String) {
        self.query.set(query);
        self.open.set(true);
        self.schedule_dispatch();
    }

    /// Skips the idle gap, e.g. when the box gains focus and we want the
    /// popular-wines default visible right away.
    pub fn dispatch_now(&self) {
        self.cancel_pending();
        self.open.set(true);
        self.dispatch();
    }

    /// Closes the dropdown and forgets any pending dispatch.
    pub fn close(&self) {
        self.cancel_pending();
        self.open.set(false);
    }

    fn cancel_pending(&self) {
        if let Some(win) = web_sys::window() {
            if let Some(tid) = self.debounce_timer.get_untracked() {
                win.clear_timeout_with_handle(tid);
            }
        }
        self.debounce_timer.set(None);
    }

    fn schedule_dispatch(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };

        if let Some(tid) = self.debounce_timer.get_untracked() {
            win.clear_timeout_with_handle(tid);
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.dispatch();
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.debounce_ms,
            )
            .unwrap_or(0);
        self.debounce_timer.set(Some(tid));
    }

    fn dispatch(&self) {
        self.debounce_timer.set(None);

        let mut seq = self.request_seq.get_untracked();
        let stamp = seq.begin();
        self.request_seq.set(seq);

        let query = self.query.get_untracked();
        let api_client = self.app_state.0.api_client.get_untracked();
        self.loading.set(true);

        let s2 = self.clone();
        spawn_local(async move {
            let result = api_client.search_wines(&query).await;

            // A newer keystroke owns the dropdown now.
            if !s2.request_seq.get_untracked().is_current(stamp) {
                return;
            }
            s2.loading.set(false);

            match result {
                Ok(list) => {
                    s2.error.set(None);
                    s2.suggestions.set(list);
                }
                Err(e) => {
                    s2.error.set(Some(e.to_string()));
                    s2.suggestions.set(vec![]);
                }
            }
        });
    }
}
