use crate::pages::{HomePage, LoginPage, ProfilePage, RegistrationPage, RootAuthed, RootPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - in-app <a> navigation requires a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("login") view=LoginPage />
                <Route path=path!("register") view=RegistrationPage />
                <Route path=path!("home") view=move || view! {
                    <RootAuthed>
                        <HomePage />
                    </RootAuthed>
                } />
                <Route path=path!("profile") view=move || view! {
                    <RootAuthed>
                        <ProfilePage />
                    </RootAuthed>
                } />
                <Route path=path!("") view=RootPage />
            </Routes>
        </Router>
    }
}
