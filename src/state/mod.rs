use crate::api::ApiClient;
use crate::cache::{WineMutation, WineViewCache};
use crate::models::{UserProfile, WineSummary};
use crate::storage::{load_string_from_storage, CURRENT_WINE_KEY};
use leptos::prelude::*;

pub(crate) mod suggest;

/// Which view fills the content pane on the home page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContentView {
    Placeholder,
    Detail,
    Upload,
    Recommendations,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<UserProfile>>,

    /// Sidebar collection, loaded from backend.
    pub wines: RwSignal<Vec<WineSummary>>,
    pub wines_loading: RwSignal<bool>,
    pub wines_error: RwSignal<Option<String>>,

    /// List load guard (avoid duplicate loads + ignore stale responses).
    pub wines_request_id: RwSignal<u64>,

    /// Current wine selection (drives the detail pane).
    pub current_wine_id: RwSignal<Option<String>>,
    pub content_view: RwSignal<ContentView>,

    /// Detail-pane view cache for the selected wine.
    pub wine_view: RwSignal<WineViewCache>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();

        // Reopen the wine that was on screen last time.
        let current_wine_id = load_string_from_storage(CURRENT_WINE_KEY);
        let content_view = if current_wine_id.is_some() {
            ContentView::Detail
        } else {
            ContentView::Placeholder
        };

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(None),
            wines: RwSignal::new(vec![]),
            wines_loading: RwSignal::new(false),
            wines_error: RwSignal::new(None),
            wines_request_id: RwSignal::new(0),
            current_wine_id: RwSignal::new(current_wine_id),
            content_view: RwSignal::new(content_view),
            wine_view: RwSignal::new(WineViewCache::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// Home-page actions shared between the sidebar and the content panes,
/// provided as context by `HomePage`.
#[derive(Clone)]
pub(crate) struct HomeUiActions {
    /// Apply a successful mutation's refresh policy to the shared views.
    pub refresh_after: Callback<WineMutation>,
    /// Open a wine in the detail pane and remember the selection.
    pub select_wine: Callback<String>,
    /// Drop the selection and show the placeholder pane.
    pub clear_selection: Callback<()>,
}
