use crate::api::{ApiClient, ApiError, ApiErrorKind, FilePayload, SignupUser};
use crate::cache::{LoadPhase, RefreshPolicy, SatMode, WineMutation};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardFooter, CardHeader, CardTitle, Dialog, DialogDescription, DialogFooter,
    DialogHeader, DialogTitle, Input, Label, Select, Separator, Spinner, Textarea,
};
use crate::drafts::{SatDraft, WineDraft};
use crate::models::{
    Acidity, Alcohol, Body, Finish, FlavourIntensity, Quality, Readiness, SatNote, Sweetness,
    Tannin, UserProfile, WineSummary,
};
use crate::state::suggest::SuggestController;
use crate::state::{AppContext, ContentView, HomeUiActions};
use crate::storage::{remove_from_storage, save_string_to_storage, CURRENT_WINE_KEY};
use crate::util::{format_timestamp, note_is_blank, strip_html_tags};
use icons::{ChevronDown, ChevronUp, X};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Shown when a wine has no label image (and for broken image URLs).
const PLACEHOLDER_IMG: &str = "https://via.placeholder.com/200?text=No+Image";

/// Drop the credential and bounce to the login screen. Used whenever the
/// backend answers 401: the token is stale and every later call would fail
/// the same way.
fn force_logout(api_client: RwSignal<ApiClient>, current_user: RwSignal<Option<UserProfile>>) {
    let mut c = api_client.get_untracked();
    c.logout();
    api_client.set(c);
    current_user.set(None);
    remove_from_storage(CURRENT_WINE_KEY);
    let _ = window().location().set_href("/login");
}

/// Wire values are kebab-case; show them with spaces.
fn humanize_level(value: &str) -> String {
    value.replace('-', " ")
}

fn opt_value<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    app_state.0.api_client.set(api_client);
                    let _ = window().location().set_href("/home");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"NoteVino"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                bind_value=email
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="••••••••"
                                bind_value=password
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">
                                                {e}
                                            </AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <Button
                            class="w-full"
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Continue" }}
                            </span>
                        </Button>

                        <div class="pt-1 text-xs text-muted-foreground">
                            "No account? "
                            <a class="text-primary underline underline-offset-4" href="/register">"Sign up"</a>
                        </div>
                    </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RegistrationPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let avatar_ref: NodeRef<html::Input> = NodeRef::new();

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let email_val = email.get();
        let password_val = password.get();
        let confirm_password_val = confirm_password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        if password_val != confirm_password_val {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }

        if password_val.len() < 6 {
            error.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }

        let avatar_file = avatar_ref
            .get_untracked()
            .and_then(|el| el.files())
            .and_then(|list| list.get(0));

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let avatar = match avatar_file {
                Some(file) => match FilePayload::from_file(file).await {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        error.set(Some(e.to_string()));
                        loading.set(false);
                        return;
                    }
                },
                None => None,
            };

            let user = SignupUser {
                username: username_val,
                email: email_val,
                password: password_val,
            };

            match api_client.signup(&user, avatar).await {
                Ok(response) => {
                    // Signup answers with a token, so the new account is
                    // signed in right away.
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    app_state.0.api_client.set(api_client);
                    let _ = window().location().set_href("/home");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"NoteVino"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Create account"</CardTitle>
                        <CardDescription class="text-xs">"Track what you taste."</CardDescription>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="username" class="text-xs">"Username"</Label>
                                <Input
                                    id="username"
                                    r#type="text"
                                    placeholder="yourname"
                                    bind_value=username
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="confirm_password" class="text-xs">"Confirm password"</Label>
                                <Input
                                    id="confirm_password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=confirm_password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="avatar" class="text-xs">"Avatar (optional)"</Label>
                                <input
                                    id="avatar"
                                    type="file"
                                    accept="image/*"
                                    class="w-full text-xs text-muted-foreground file:mr-3 file:rounded-md file:border file:border-border file:bg-background file:px-3 file:py-1.5 file:text-xs file:font-medium hover:file:bg-accent"
                                    node_ref=avatar_ref
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert class="border-destructive/30">
                                                <AlertDescription class="text-destructive text-xs">
                                                    {e}
                                                </AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Creating..." } else { "Continue" }}
                                </span>
                            </Button>

                            <div class="pt-1 text-xs text-muted-foreground">
                                "Already have an account? "
                                <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let current_user = app_state.0.current_user;

    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let api = api_client.get_untracked();
        spawn_local(async move {
            match api.get_profile().await {
                Ok(profile) => {
                    error.set(None);
                    current_user.set(Some(profile));
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    });

    let on_logout = move |_| {
        force_logout(api_client, current_user);
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Profile"</CardTitle>
                    </CardHeader>

                    <CardContent class="space-y-4">
                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || error.get().map(|e| view! {
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                </Alert>
                            })}
                        </Show>

                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <div class="flex items-center gap-2 py-4 text-sm text-muted-foreground">
                                <Spinner />
                                "Loading profile..."
                            </div>
                        </Show>

                        {move || {
                            current_user.get().map(|user| {
                                let joined = user
                                    .created_at
                                    .get(0..10)
                                    .unwrap_or(&user.created_at)
                                    .to_string();
                                view! {
                                    <div class="flex items-center gap-4">
                                        <FallbackImage
                                            src=user.picture.clone().unwrap_or_default()
                                            alt=user.name.clone()
                                            class="h-16 w-16 shrink-0 rounded-full border border-border object-cover"
                                        />
                                        <div class="min-w-0 space-y-0.5">
                                            <div class="truncate text-sm font-medium">{user.name.clone()}</div>
                                            <div class="truncate text-xs text-muted-foreground">{user.email.clone()}</div>
                                            <div class="text-xs text-muted-foreground">
                                                "Member since " {format_timestamp(&joined)}
                                            </div>
                                        </div>
                                    </div>
                                }
                            })
                        }}
                    </CardContent>

                    <CardFooter class="justify-between border-t">
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm href="/home">
                            "Back to wines"
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            class="text-muted-foreground"
                            on:click=on_logout
                        >
                            "Sign out"
                        </Button>
                    </CardFooter>
                </Card>
            </div>
        </div>
    }
}

/// `<img>` that swaps in a placeholder when the URL is empty or the image
/// fails to load.
#[component]
fn FallbackImage(
    #[prop(into)] src: String,
    #[prop(into)] alt: String,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let failed = RwSignal::new(false);

    let src_attr = move || {
        if failed.get() || src.is_empty() {
            PLACEHOLDER_IMG.to_string()
        } else {
            src.clone()
        }
    };

    view! { <img class=class alt=alt src=src_attr on:error=move |_| failed.set(true) /> }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let current_user = app_state.0.current_user;
    let wines = app_state.0.wines;
    let wines_loading = app_state.0.wines_loading;
    let wines_error = app_state.0.wines_error;
    let wines_request_id = app_state.0.wines_request_id;
    let current_wine_id = app_state.0.current_wine_id;
    let content_view = app_state.0.content_view;
    let wine_view = app_state.0.wine_view;

    let suggest = SuggestController::new(app_state.clone());
    let query = suggest.query;
    let suggestions = suggest.suggestions;
    let suggest_open = suggest.open;
    let suggest_loading = suggest.loading;
    let suggest_error = suggest.error;

    let load_wines = move || {
        let req_id = wines_request_id.get_untracked().saturating_add(1);
        wines_request_id.set(req_id);
        wines_loading.set(true);
        wines_error.set(None);

        let api = api_client.get_untracked();
        spawn_local(async move {
            let result = api.list_wines().await;

            // A later load owns the list now.
            if wines_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(list) => {
                    wines.set(list);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    wines_error.set(Some(e.to_string()));
                }
            }
            wines_loading.set(false);
        });
    };

    // Bumping the epoch re-runs the list load; the initial run covers mount.
    let wines_epoch: RwSignal<u64> = RwSignal::new(0);
    Effect::new(move |_| {
        let _ = wines_epoch.get();
        load_wines();
    });
    let request_list_reload = move || wines_epoch.update(|e| *e = e.saturating_add(1));

    // Back online: if the last list load failed, try again without waiting
    // for the user to notice.
    let _online_handle = window_event_listener(ev::online, move |_ev: web_sys::Event| {
        if wines_error.get_untracked().is_some() {
            request_list_reload();
        }
    });

    let select_wine = move |id: String| {
        save_string_to_storage(CURRENT_WINE_KEY, &id);
        current_wine_id.set(Some(id));
        content_view.set(ContentView::Detail);
    };

    let clear_selection = move || {
        remove_from_storage(CURRENT_WINE_KEY);
        current_wine_id.set(None);
        content_view.set(ContentView::Placeholder);
    };

    let show_upload = move |_| content_view.set(ContentView::Upload);
    let show_recommendations = move |_| content_view.set(ContentView::Recommendations);

    let on_logout = move |_| {
        wines.set(vec![]);
        wine_view.update(|v| v.clear());
        force_logout(api_client, current_user);
    };

    provide_context(HomeUiActions {
        refresh_after: Callback::new(move |mutation: WineMutation| {
            if mutation.refresh_policy() == RefreshPolicy::ReloadAll {
                request_list_reload();
            }
        }),
        select_wine: Callback::new(select_wine),
        clear_selection: Callback::new(move |_| clear_selection()),
    });

    let suggest_input = suggest.clone();
    let suggest_focus = suggest.clone();
    let suggest_reset = suggest.clone();
    let suggest_items = suggest.clone();

    view! {
        <div class="min-h-screen bg-background text-foreground">
            <div class="mx-auto flex min-h-screen w-full max-w-5xl gap-4 px-4 py-6">
                <aside class="w-72 shrink-0">
                    <div class="sticky top-6 space-y-4">
                        <div class="flex items-center justify-between">
                            <a href="/home" class="text-sm font-medium text-foreground">"NoteVino"</a>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Icon
                                class="h-8 w-8"
                                attr:title="Reload wines"
                                on:click=move |_| request_list_reload()
                            >
                                <span class="text-xs text-muted-foreground">"↻"</span>
                            </Button>
                        </div>

                        <div class="relative">
                            <input
                                type="search"
                                placeholder="Search wines"
                                class="border-input flex h-8 w-full min-w-0 rounded-md border bg-transparent px-3 pr-8 py-1 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2"
                                prop:value=move || query.get()
                                on:input=move |ev| suggest_input.on_query_changed(event_target_value(&ev))
                                on:focus=move |_| suggest_focus.dispatch_now()
                            />
                            <Show when=move || !query.get().is_empty() || suggest_open.get() fallback=|| ().into_view()>
                                <button
                                    class="absolute right-2 top-2 text-muted-foreground hover:text-foreground"
                                    title="Clear search"
                                    on:click={
                                        let suggest_reset = suggest_reset.clone();
                                        move |_| {
                                            suggest_reset.close();
                                            query.set(String::new());
                                        }
                                    }
                                >
                                    <X class="size-4" />
                                </button>
                            </Show>

                            <Show when=move || suggest_open.get() fallback=|| ().into_view()>
                                <div class="absolute left-0 right-0 top-9 z-40 max-h-72 overflow-y-auto rounded-md border border-border bg-background p-1 shadow-lg">
                                    <Show when=move || suggest_loading.get() fallback=|| ().into_view()>
                                        <div class="flex items-center gap-2 px-2 py-1.5 text-xs text-muted-foreground">
                                            <Spinner class="size-3.5" />
                                            "Searching..."
                                        </div>
                                    </Show>

                                    <Show when=move || suggest_error.get().is_some() fallback=|| ().into_view()>
                                        {move || suggest_error.get().map(|e| view! {
                                            <div class="px-2 py-1.5 text-xs text-destructive">{e}</div>
                                        })}
                                    </Show>

                                    {
                                        let suggest_pick = suggest_items.clone();
                                        move || {
                                            let list = suggestions.get();
                                            if list.is_empty() {
                                                if suggest_loading.get() || suggest_error.get().is_some() {
                                                    ().into_any()
                                                } else {
                                                    view! {
                                                        <div class="px-2 py-1.5 text-xs text-muted-foreground">"No matches"</div>
                                                    }.into_any()
                                                }
                                            } else {
                                                list.into_iter()
                                                    .map(|s| {
                                                        let jump_name = s.name.clone();
                                                        let fill = s.name.clone();
                                                        let picked = suggest_pick.clone();
                                                        view! {
                                                            <button
                                                                class="flex w-full items-center justify-between gap-2 rounded px-2 py-1.5 text-left text-sm hover:bg-accent"
                                                                on:click=move |_| {
                                                                    // Jump straight to the wine when the
                                                                    // sidebar already lists it.
                                                                    let found = wines
                                                                        .get_untracked()
                                                                        .into_iter()
                                                                        .find(|w| w.name == jump_name);
                                                                    if let Some(w) = found {
                                                                        select_wine(w.wine_id);
                                                                    }
                                                                    query.set(fill.clone());
                                                                    picked.close();
                                                                }
                                                            >
                                                                <span class="min-w-0 flex-1 truncate">{s.name.clone()}</span>
                                                                <span class="shrink-0 text-xs text-muted-foreground">{s.region.clone()}</span>
                                                            </button>
                                                        }
                                                        .into_any()
                                                    })
                                                    .collect::<Vec<_>>()
                                                    .into_any()
                                            }
                                        }
                                    }
                                </div>
                            </Show>
                        </div>

                        <Card>
                            <CardHeader class="w-full flex-row items-center justify-between">
                                <CardTitle class="text-sm">"Wines"</CardTitle>
                                <span class="text-xs text-muted-foreground">
                                    {move || wines.get().len()}
                                </span>
                            </CardHeader>
                            <CardContent class="space-y-1 px-3">
                                <Show when=move || wines_error.get().is_some() fallback=|| ().into_view()>
                                    {move || wines_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <Show when=move || wines_loading.get() fallback=|| ().into_view()>
                                    <div class="flex items-center gap-2 px-1 py-1 text-xs text-muted-foreground">
                                        <Spinner class="size-3.5" />
                                        "Loading wines..."
                                    </div>
                                </Show>

                                {move || {
                                    let q = query.get().trim().to_lowercase();
                                    let list: Vec<WineSummary> = wines
                                        .get()
                                        .into_iter()
                                        .filter(|w| q.is_empty() || w.name.to_lowercase().contains(&q))
                                        .collect();
                                    let selected = current_wine_id.get();

                                    if list.is_empty() {
                                        if wines_loading.get() {
                                            ().into_any()
                                        } else {
                                            view! {
                                                <div class="px-1 py-1 text-xs text-muted-foreground">"No wines yet."</div>
                                            }.into_any()
                                        }
                                    } else {
                                        list.into_iter()
                                            .map(|w| {
                                                let is_selected =
                                                    selected.as_deref() == Some(w.wine_id.as_str());
                                                let variant = if is_selected {
                                                    ButtonVariant::Accent
                                                } else {
                                                    ButtonVariant::Ghost
                                                };
                                                let id = w.wine_id.clone();
                                                view! {
                                                    <Button
                                                        variant=variant
                                                        size=ButtonSize::Sm
                                                        class="w-full justify-start"
                                                        attr:aria-current=move || {
                                                            if is_selected { Some("page") } else { None }
                                                        }
                                                        on:click=move |_| select_wine(id.clone())
                                                    >
                                                        <span class="min-w-0 flex-1 truncate text-left">{w.name.clone()}</span>
                                                        <span class="shrink-0 text-xs text-muted-foreground">{w.vintage}</span>
                                                    </Button>
                                                }
                                                .into_any()
                                            })
                                            .collect::<Vec<_>>()
                                            .into_any()
                                    }
                                }}
                            </CardContent>
                        </Card>

                        <div class="space-y-1">
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                class="w-full justify-start"
                                on:click=show_upload
                            >
                                "+ Add wine"
                            </Button>
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                class="w-full justify-start"
                                on:click=show_recommendations
                            >
                                "Recommendations"
                            </Button>
                        </div>

                        <div class="flex items-center justify-between border-t border-border pt-3">
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm href="/profile">
                                "Profile"
                            </Button>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Sm
                                class="text-muted-foreground"
                                on:click=on_logout
                            >
                                "Sign out"
                            </Button>
                        </div>
                    </div>
                </aside>

                <main class="min-w-0 flex-1">
                    {move || match content_view.get() {
                        ContentView::Placeholder => view! {
                            <Card>
                                <CardContent>
                                    <div class="py-10 text-center text-sm text-muted-foreground">
                                        "Select a wine from the list, or add a new one."
                                    </div>
                                </CardContent>
                            </Card>
                        }
                        .into_any(),
                        ContentView::Detail => view! { <WineDetailPane /> }.into_any(),
                        ContentView::Upload => view! { <WineUploadPane /> }.into_any(),
                        ContentView::Recommendations => view! { <RecommendationsPane /> }.into_any(),
                    }}
                </main>
            </div>
        </div>
    }
}

#[component]
pub fn WineDetailPane() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = expect_context::<HomeUiActions>();
    let api_client = app_state.0.api_client;
    let current_user = app_state.0.current_user;
    let current_wine_id = app_state.0.current_wine_id;
    let wine_view = app_state.0.wine_view;

    let refresh_after = actions.refresh_after;
    let clear_selection = actions.clear_selection;

    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let sat_load_error: RwSignal<Option<String>> = RwSignal::new(None);

    let load_wine = move |wine_id: String| {
        let stamp = wine_view
            .try_update(|c| c.begin_load(&wine_id))
            .unwrap_or_default();
        load_error.set(None);

        let api = api_client.get_untracked();
        spawn_local(async move {
            match api.get_wine(&wine_id).await {
                Ok(wine) => {
                    wine_view.update(|c| {
                        c.apply_loaded(stamp, wine);
                    });
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    let applied = wine_view
                        .try_update(|c| c.apply_load_failed(stamp))
                        .unwrap_or(false);
                    if applied {
                        load_error.set(Some(e.to_string()));
                    }
                }
            }
        });
    };

    let load_sat = move |wine_id: String| {
        let stamp = wine_view
            .try_update(|c| c.begin_sat_load())
            .unwrap_or_default();
        sat_load_error.set(None);

        let api = api_client.get_untracked();
        spawn_local(async move {
            match api.get_sat_note(&wine_id).await {
                Ok(sat) => {
                    wine_view.update(|c| {
                        c.apply_sat_loaded(stamp, sat);
                    });
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    let applied = wine_view
                        .try_update(|c| c.apply_sat_load_failed(stamp))
                        .unwrap_or(false);
                    if applied {
                        sat_load_error.set(Some(e.to_string()));
                    }
                }
            }
        });
    };

    // Fetch the wine and its SAT note whenever the selection changes.
    Effect::new(move |_| {
        if let Some(id) = current_wine_id.get() {
            load_wine(id.clone());
            load_sat(id);
        }
    });

    let retry_load = move |_| {
        if let Some(id) = current_wine_id.get_untracked() {
            load_wine(id.clone());
            load_sat(id);
        }
    };

    // ---- Wine edit dialog ---------------------------------------------

    let edit_name: RwSignal<String> = RwSignal::new(String::new());
    let edit_region: RwSignal<String> = RwSignal::new(String::new());
    let edit_category: RwSignal<String> = RwSignal::new(String::new());
    let edit_vintage: RwSignal<String> = RwSignal::new(String::new());
    let edit_error: RwSignal<Option<ApiError>> = RwSignal::new(None);
    let edit_loading: RwSignal<bool> = RwSignal::new(false);

    // The dialog is open exactly while an edit buffer exists, so a full
    // reload (which drops buffers) closes it too.
    let edit_open = Signal::derive(move || wine_view.with(|c| c.wine_draft.is_some()));
    let edit_name_ref: NodeRef<html::Input> = NodeRef::new();

    Effect::new(move |_| {
        if edit_open.get() {
            if let Some(input) = edit_name_ref.get() {
                let _ = input.focus();
            }
        }
    });

    let open_edit = move |_| {
        let opened = wine_view
            .try_update(|c| c.begin_wine_edit())
            .unwrap_or(false);
        if !opened {
            return;
        }
        if let Some(draft) = wine_view.with_untracked(|c| c.wine_draft.clone()) {
            edit_name.set(draft.name);
            edit_region.set(draft.region);
            edit_category.set(draft.category);
            edit_vintage.set(draft.vintage);
        }
        edit_error.set(None);
    };

    let submit_edit = move |_| {
        if edit_loading.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let draft = WineDraft {
            name: edit_name.get_untracked(),
            region: edit_region.get_untracked(),
            category: edit_category.get_untracked(),
            vintage: edit_vintage.get_untracked(),
        };
        let fields = match draft.validate() {
            Ok(fields) => fields,
            Err(msg) => {
                edit_error.set(Some(ApiError::validation(msg)));
                return;
            }
        };

        let api = api_client.get_untracked();
        edit_loading.set(true);
        edit_error.set(None);

        spawn_local(async move {
            match api.replace_wine(&wine_id, &fields).await {
                Ok(()) => {
                    wine_view.update(|c| c.cancel_wine_edit());
                    // Entity-level change: the sidebar and the open view
                    // both reload from the backend.
                    refresh_after.run(WineMutation::ReplaceWine);
                    load_wine(wine_id);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    edit_error.set(Some(e));
                }
            }
            edit_loading.set(false);
        });
    };

    // ---- Wine delete dialog ---------------------------------------------

    let delete_open: RwSignal<bool> = RwSignal::new(false);
    let delete_loading: RwSignal<bool> = RwSignal::new(false);
    let delete_error: RwSignal<Option<String>> = RwSignal::new(None);

    let submit_delete = move |_| {
        if delete_loading.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let api = api_client.get_untracked();
        delete_loading.set(true);
        delete_error.set(None);

        spawn_local(async move {
            match api.delete_wine(&wine_id).await {
                Ok(()) => {
                    delete_open.set(false);
                    wine_view.update(|c| c.clear());
                    clear_selection.run(());
                    refresh_after.run(WineMutation::DeleteWine);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    delete_error.set(Some(e.to_string()));
                }
            }
            delete_loading.set(false);
        });
    };

    // ---- Tasting notes ---------------------------------------------------

    let new_note: RwSignal<String> = RwSignal::new(String::new());
    let edit_note_content: RwSignal<String> = RwSignal::new(String::new());
    let note_error: RwSignal<Option<ApiError>> = RwSignal::new(None);
    let note_saving: RwSignal<bool> = RwSignal::new(false);

    let on_add_note = move |_| {
        if note_saving.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let content = new_note.get_untracked();
        if note_is_blank(&content) {
            // Resolved locally; the backend is never consulted.
            note_error.set(Some(ApiError::validation("Note content cannot be empty.")));
            return;
        }

        let api = api_client.get_untracked();
        note_saving.set(true);
        note_error.set(None);

        spawn_local(async move {
            match api.create_note(&wine_id, &content).await {
                Ok(note) => {
                    new_note.set(String::new());
                    wine_view.update(|c| {
                        c.apply_note_created(&wine_id, note);
                    });
                    refresh_after.run(WineMutation::CreateNote);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    note_error.set(Some(e));
                }
            }
            note_saving.set(false);
        });
    };

    let save_note_edit = move |note_id: String| {
        if note_saving.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let content = edit_note_content.get_untracked();
        if note_is_blank(&content) {
            note_error.set(Some(ApiError::validation("Note content cannot be empty.")));
            return;
        }

        let api = api_client.get_untracked();
        note_saving.set(true);
        note_error.set(None);

        spawn_local(async move {
            match api.update_note(&wine_id, &note_id, &content).await {
                Ok(updated_at) => {
                    let merged = wine_view
                        .try_update(|c| c.apply_note_updated(&wine_id, &note_id, content, updated_at))
                        .unwrap_or(false);
                    if !merged {
                        // The note vanished under us; resync the whole view.
                        load_wine(wine_id);
                    }
                    refresh_after.run(WineMutation::UpdateNote);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    if e.kind == ApiErrorKind::NotFound {
                        wine_view.update(|c| c.cancel_note_edit());
                        load_wine(wine_id);
                    } else {
                        note_error.set(Some(e));
                    }
                }
            }
            note_saving.set(false);
        });
    };

    let delete_note = move |note_id: String| {
        if note_saving.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let api = api_client.get_untracked();
        note_saving.set(true);
        note_error.set(None);

        spawn_local(async move {
            match api.delete_note(&wine_id, &note_id).await {
                Ok(()) => {
                    wine_view.update(|c| {
                        c.apply_note_deleted(&wine_id, &note_id);
                    });
                    refresh_after.run(WineMutation::DeleteNote);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    if e.kind == ApiErrorKind::NotFound {
                        // Already gone on the server; drop it locally too.
                        wine_view.update(|c| {
                            c.apply_note_deleted(&wine_id, &note_id);
                        });
                    } else {
                        note_error.set(Some(e));
                    }
                }
            }
            note_saving.set(false);
        });
    };

    // ---- SAT assessment ---------------------------------------------------

    let sweetness_sel: RwSignal<String> = RwSignal::new(String::new());
    let acidity_sel: RwSignal<String> = RwSignal::new(String::new());
    let tannin_sel: RwSignal<String> = RwSignal::new(String::new());
    let alcohol_sel: RwSignal<String> = RwSignal::new(String::new());
    let body_sel: RwSignal<String> = RwSignal::new(String::new());
    let flavour_sel: RwSignal<String> = RwSignal::new(String::new());
    let finish_sel: RwSignal<String> = RwSignal::new(String::new());
    let quality_sel: RwSignal<String> = RwSignal::new(String::new());
    let readiness_sel: RwSignal<String> = RwSignal::new(String::new());
    let sat_form_error: RwSignal<Option<ApiError>> = RwSignal::new(None);
    let sat_saving: RwSignal<bool> = RwSignal::new(false);

    let sat_form_open = Signal::derive(move || wine_view.with(|c| c.sat_draft.is_some()));

    let open_sat_edit = move |_| {
        wine_view.update(|c| c.begin_sat_edit());
        let draft = wine_view
            .with_untracked(|c| c.sat_draft)
            .unwrap_or_default();
        sweetness_sel.set(opt_value(draft.sweetness));
        acidity_sel.set(opt_value(draft.acidity));
        tannin_sel.set(opt_value(draft.tannin));
        alcohol_sel.set(opt_value(draft.alcohol));
        body_sel.set(opt_value(draft.body));
        flavour_sel.set(opt_value(draft.flavour_intensity));
        finish_sel.set(opt_value(draft.finish));
        quality_sel.set(opt_value(draft.quality));
        readiness_sel.set(opt_value(draft.readiness));
        sat_form_error.set(None);
    };

    let cancel_sat_edit = move |_| {
        wine_view.update(|c| c.cancel_sat_edit());
    };

    let save_sat = move |_| {
        if sat_saving.get_untracked() {
            return;
        }
        let Some(wine_id) = current_wine_id.get_untracked() else {
            return;
        };

        let draft = SatDraft {
            sweetness: Sweetness::from_str(&sweetness_sel.get_untracked()).ok(),
            acidity: Acidity::from_str(&acidity_sel.get_untracked()).ok(),
            tannin: Tannin::from_str(&tannin_sel.get_untracked()).ok(),
            alcohol: Alcohol::from_str(&alcohol_sel.get_untracked()).ok(),
            body: Body::from_str(&body_sel.get_untracked()).ok(),
            flavour_intensity: FlavourIntensity::from_str(&flavour_sel.get_untracked()).ok(),
            finish: Finish::from_str(&finish_sel.get_untracked()).ok(),
            quality: Quality::from_str(&quality_sel.get_untracked()).ok(),
            readiness: Readiness::from_str(&readiness_sel.get_untracked()).ok(),
        };

        let sat = match draft.validate() {
            Ok(sat) => sat,
            Err(missing) => {
                // Incomplete form never reaches the network.
                sat_form_error.set(Some(ApiError::validation(format!(
                    "Please select: {}.",
                    missing.join(", ")
                ))));
                return;
            }
        };

        let mode = wine_view.with_untracked(|c| c.sat_mode());
        let api = api_client.get_untracked();
        sat_saving.set(true);
        sat_form_error.set(None);

        spawn_local(async move {
            let result = match mode {
                Some(SatMode::Updating) => api.replace_sat_note(&wine_id, &sat).await,
                _ => api.create_sat_note(&wine_id, &sat).await,
            };

            match result {
                Ok(()) => {
                    wine_view.update(|c| {
                        c.mark_sat_saved(&wine_id, sat);
                    });
                    refresh_after.run(WineMutation::SaveSatNote);
                    // Show the canonical copy, not the local echo.
                    load_sat(wine_id);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    sat_form_error.set(Some(e));
                }
            }
            sat_saving.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <Show when=move || load_error.get().is_some() fallback=|| ().into_view()>
                {move || load_error.get().map(|e| view! {
                    <Alert class="border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">
                            {e}
                            " "
                            <button class="underline underline-offset-2" on:click=retry_load>
                                "Retry"
                            </button>
                        </AlertDescription>
                    </Alert>
                })}
            </Show>

            <Show
                when=move || wine_view.with(|c| c.phase == LoadPhase::Loading && c.wine.is_none())
                fallback=|| ().into_view()
            >
                <div class="flex items-center gap-2 py-8 text-sm text-muted-foreground">
                    <Spinner />
                    "Loading wine..."
                </div>
            </Show>

            <Show when=move || wine_view.with(|c| c.wine.is_some()) fallback=|| ().into_view()>
                <Card>
                    <CardContent>
                        {move || wine_view.with(|c| c.wine.clone()).map(|wine| view! {
                            <div class="flex flex-wrap items-start justify-between gap-4">
                                <div class="min-w-0 space-y-1">
                                    <h1 class="truncate text-xl font-semibold">{wine.name.clone()}</h1>
                                    <div class="text-sm text-muted-foreground">
                                        {wine.region.clone()} " · " {wine.category.clone()} " · " {wine.vintage}
                                    </div>
                                    <div class="text-xs text-muted-foreground">
                                        "Added " {format_timestamp(&wine.created_at)}
                                    </div>
                                    <div class="flex items-center gap-2 pt-2">
                                        <Button
                                            variant=ButtonVariant::Outline
                                            size=ButtonSize::Sm
                                            on:click=open_edit
                                        >
                                            "Edit"
                                        </Button>
                                        <Button
                                            variant=ButtonVariant::Destructive
                                            size=ButtonSize::Sm
                                            on:click=move |_| {
                                                delete_error.set(None);
                                                delete_open.set(true);
                                            }
                                        >
                                            "Delete"
                                        </Button>
                                    </div>
                                </div>
                                <FallbackImage
                                    src=wine.image_url.clone().unwrap_or_default()
                                    alt=wine.name.clone()
                                    class="h-28 w-28 shrink-0 rounded-md border border-border object-cover"
                                />
                            </div>
                        })}
                    </CardContent>
                </Card>

                <Card>
                    <CardHeader class="w-full flex-row items-center justify-between">
                        <CardTitle class="text-base">
                            {move || format!("Tasting notes ({})", wine_view.with(|c| c.notes.len()))}
                        </CardTitle>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:title="Toggle sort order"
                            on:click=move |_| wine_view.update(|c| c.toggle_sort_order())
                        >
                            {move || if wine_view.with(|c| c.sort_ascending) {
                                view! { <ChevronUp class="size-4" /> }.into_any()
                            } else {
                                view! { <ChevronDown class="size-4" /> }.into_any()
                            }}
                            {move || if wine_view.with(|c| c.sort_ascending) {
                                "Oldest first"
                            } else {
                                "Newest first"
                            }}
                        </Button>
                    </CardHeader>
                    <CardContent class="space-y-3">
                        <div class="space-y-2">
                            <Textarea
                                placeholder="What did you taste?"
                                bind_value=new_note
                                class="text-sm"
                            />

                            <Show when=move || note_error.get().is_some() fallback=|| ().into_view()>
                                {move || note_error.get().map(|e| view! {
                                    <Alert class="border-destructive/30">
                                        <AlertDescription class="text-destructive text-xs">{e.to_string()}</AlertDescription>
                                    </Alert>
                                })}
                            </Show>

                            <div class="flex justify-end">
                                <Button
                                    size=ButtonSize::Sm
                                    attr:disabled=move || note_saving.get()
                                    on:click=on_add_note
                                >
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || note_saving.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || if note_saving.get() { "Saving..." } else { "Add note" }}
                                    </span>
                                </Button>
                            </div>
                        </div>

                        <Separator />

                        {move || {
                            let notes = wine_view.with(|c| c.notes.clone());
                            let editing = wine_view.with(|c| c.editing_note_id.clone());

                            if notes.is_empty() {
                                view! {
                                    <div class="py-2 text-xs text-muted-foreground">"No notes yet."</div>
                                }
                                .into_any()
                            } else {
                                notes
                                    .into_iter()
                                    .map(|note| {
                                        let is_editing =
                                            editing.as_deref() == Some(note.note_id.as_str());
                                        if is_editing {
                                            let id_save = note.note_id.clone();
                                            view! {
                                                <div class="space-y-2 rounded-md border border-border p-3">
                                                    <Textarea bind_value=edit_note_content class="text-sm" />
                                                    <div class="flex items-center justify-end gap-2">
                                                        <Button
                                                            variant=ButtonVariant::Outline
                                                            size=ButtonSize::Sm
                                                            attr:disabled=move || note_saving.get()
                                                            on:click=move |_| wine_view.update(|c| c.cancel_note_edit())
                                                        >
                                                            "Cancel"
                                                        </Button>
                                                        <Button
                                                            size=ButtonSize::Sm
                                                            attr:disabled=move || note_saving.get()
                                                            on:click=move |_| save_note_edit(id_save.clone())
                                                        >
                                                            {move || if note_saving.get() { "Saving..." } else { "Save" }}
                                                        </Button>
                                                    </div>
                                                </div>
                                            }
                                            .into_any()
                                        } else {
                                            let id_edit = note.note_id.clone();
                                            let id_delete = note.note_id.clone();
                                            let content_seed = note.content.clone();
                                            view! {
                                                <div class="group rounded-md border border-border px-3 py-2">
                                                    <div class="whitespace-pre-wrap text-sm">
                                                        {strip_html_tags(&note.content)}
                                                    </div>
                                                    <div class="mt-1.5 flex items-center justify-between">
                                                        <span class="text-[11px] text-muted-foreground">
                                                            {format_timestamp(&note.updated_at)}
                                                        </span>
                                                        <div class="flex items-center gap-1 opacity-0 transition-opacity group-hover:opacity-100">
                                                            <Button
                                                                variant=ButtonVariant::Ghost
                                                                size=ButtonSize::Sm
                                                                class="h-6 px-2 text-xs"
                                                                on:click=move |_| {
                                                                    edit_note_content.set(content_seed.clone());
                                                                    note_error.set(None);
                                                                    wine_view.update(|c| {
                                                                        c.begin_note_edit(&id_edit);
                                                                    });
                                                                }
                                                            >
                                                                "Edit"
                                                            </Button>
                                                            <Button
                                                                variant=ButtonVariant::Ghost
                                                                size=ButtonSize::Sm
                                                                class="h-6 px-2 text-xs text-destructive hover:text-destructive"
                                                                attr:disabled=move || note_saving.get()
                                                                on:click=move |_| delete_note(id_delete.clone())
                                                            >
                                                                "Delete"
                                                            </Button>
                                                        </div>
                                                    </div>
                                                </div>
                                            }
                                            .into_any()
                                        }
                                    })
                                    .collect::<Vec<_>>()
                                    .into_any()
                            }
                        }}
                    </CardContent>
                </Card>

                <Card>
                    <CardHeader class="w-full flex-row items-center justify-between">
                        <CardTitle class="text-base">"SAT assessment"</CardTitle>
                        <Show
                            when=move || {
                                !sat_form_open.get()
                                    && wine_view.with(|c| c.sat_phase == LoadPhase::Loaded && c.sat.is_some())
                            }
                            fallback=|| ().into_view()
                        >
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                on:click=open_sat_edit
                            >
                                "Edit"
                            </Button>
                        </Show>
                    </CardHeader>
                    <CardContent class="space-y-3">
                        <Show when=move || sat_load_error.get().is_some() fallback=|| ().into_view()>
                            {move || sat_load_error.get().map(|e| view! {
                                <Alert class="border-destructive/30">
                                    <AlertDescription class="text-destructive text-xs">
                                        {e}
                                        " "
                                        <button class="underline underline-offset-2" on:click=retry_load>
                                            "Retry"
                                        </button>
                                    </AlertDescription>
                                </Alert>
                            })}
                        </Show>

                        <Show when=move || sat_form_open.get() fallback=|| ().into_view()>
                            <div class="space-y-3">
                                <div class="text-sm font-medium">
                                    {move || match wine_view.with(|c| c.sat_mode()) {
                                        Some(SatMode::Updating) => "Edit assessment",
                                        _ => "New assessment",
                                    }}
                                </div>

                                <div class="grid gap-3 sm:grid-cols-3">
                                    {sat_select::<Sweetness>("Sweetness", sweetness_sel)}
                                    {sat_select::<Acidity>("Acidity", acidity_sel)}
                                    {sat_select::<Tannin>("Tannin", tannin_sel)}
                                    {sat_select::<Alcohol>("Alcohol", alcohol_sel)}
                                    {sat_select::<Body>("Body", body_sel)}
                                    {sat_select::<FlavourIntensity>("Flavour intensity", flavour_sel)}
                                    {sat_select::<Finish>("Finish", finish_sel)}
                                    {sat_select::<Quality>("Quality", quality_sel)}
                                    {sat_select::<Readiness>("Readiness", readiness_sel)}
                                </div>

                                <Show when=move || sat_form_error.get().is_some() fallback=|| ().into_view()>
                                    {move || sat_form_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">{e.to_string()}</AlertDescription>
                                        </Alert>
                                    })}
                                </Show>

                                <div class="flex items-center justify-end gap-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        attr:disabled=move || sat_saving.get()
                                        on:click=cancel_sat_edit
                                    >
                                        "Cancel"
                                    </Button>
                                    <Button
                                        size=ButtonSize::Sm
                                        attr:disabled=move || sat_saving.get()
                                        on:click=save_sat
                                    >
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || sat_saving.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            {move || if sat_saving.get() { "Saving..." } else { "Save" }}
                                        </span>
                                    </Button>
                                </div>
                            </div>
                        </Show>

                        <Show when=move || !sat_form_open.get() fallback=|| ().into_view()>
                            {move || match wine_view.with(|c| c.sat_phase) {
                                LoadPhase::Loading => view! {
                                    <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                        <Spinner class="size-3.5" />
                                        "Loading assessment..."
                                    </div>
                                }
                                .into_any(),
                                LoadPhase::Loaded => match wine_view.with(|c| c.sat) {
                                    Some(sat) => sat_table(sat).into_any(),
                                    None => view! {
                                        <div class="space-y-2">
                                            <div class="text-sm text-muted-foreground">
                                                "No structured assessment yet."
                                            </div>
                                            <Button size=ButtonSize::Sm on:click=open_sat_edit>
                                                "Start assessment"
                                            </Button>
                                        </div>
                                    }
                                    .into_any(),
                                },
                                LoadPhase::Unloaded => ().into_any(),
                            }}
                        </Show>
                    </CardContent>
                </Card>
            </Show>

            <Dialog open=edit_open>
                <DialogHeader>
                    <DialogTitle>"Edit wine"</DialogTitle>
                </DialogHeader>

                <div class="space-y-2">
                    <div class="space-y-1">
                        <Label class="text-xs">"Name"</Label>
                        <Input
                            node_ref=edit_name_ref
                            bind_value=edit_name
                            class="h-8 text-sm border-border bg-background"
                        />
                    </div>
                    <div class="space-y-1">
                        <Label class="text-xs">"Region"</Label>
                        <Input bind_value=edit_region class="h-8 text-sm border-border bg-background" />
                    </div>
                    <div class="space-y-1">
                        <Label class="text-xs">"Type"</Label>
                        <Input
                            bind_value=edit_category
                            placeholder="Red, White, Sparkling..."
                            class="h-8 text-sm border-border bg-background"
                        />
                    </div>
                    <div class="space-y-1">
                        <Label class="text-xs">"Vintage"</Label>
                        <Input bind_value=edit_vintage class="h-8 text-sm border-border bg-background" />
                    </div>

                    <Show when=move || edit_error.get().is_some() fallback=|| ().into_view()>
                        {move || edit_error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e.to_string()}</AlertDescription>
                            </Alert>
                        })}
                    </Show>

                    <DialogFooter>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || edit_loading.get()
                            on:click=move |_| wine_view.update(|c| c.cancel_wine_edit())
                        >
                            "Cancel"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || edit_loading.get()
                            on:click=submit_edit
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || edit_loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if edit_loading.get() { "Saving..." } else { "Save" }}
                            </span>
                        </Button>
                    </DialogFooter>
                </div>
            </Dialog>

            <Dialog open=delete_open>
                <DialogHeader>
                    <DialogTitle class="text-destructive">"Delete wine"</DialogTitle>
                    <DialogDescription>
                        "This removes the wine and all of its notes."
                    </DialogDescription>
                </DialogHeader>

                <div class="space-y-2">
                    <div class="rounded-md border border-border bg-muted px-3 py-2 text-sm">
                        {move || wine_view.with(|c| c.wine.as_ref().map(|w| w.name.clone()).unwrap_or_default())}
                    </div>

                    <Show when=move || delete_error.get().is_some() fallback=|| ().into_view()>
                        {move || delete_error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                            </Alert>
                        })}
                    </Show>

                    <DialogFooter>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || delete_loading.get()
                            on:click=move |_| delete_open.set(false)
                        >
                            "Cancel"
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:disabled=move || delete_loading.get()
                            on:click=submit_delete
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || delete_loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if delete_loading.get() { "Deleting..." } else { "Delete" }}
                            </span>
                        </Button>
                    </DialogFooter>
                </div>
            </Dialog>
        </div>
    }
}

/// One labelled dropdown of the SAT form. `T` supplies the scale; the
/// bound signal holds the kebab-case wire value ("" while unset).
fn sat_select<T>(label: &'static str, value: RwSignal<String>) -> impl IntoView
where
    T: IntoEnumIterator + std::fmt::Display,
{
    let initial = value.get_untracked();

    view! {
        <div class="flex flex-col gap-1.5">
            <Label class="text-xs">{label}</Label>
            <Select
                class="h-8 text-sm"
                value=value
                on_change=Callback::new(move |v: String| value.set(v))
            >
                <option value="" selected=initial.is_empty()>"Select..."</option>
                {T::iter()
                    .map(|level| {
                        let wire = level.to_string();
                        let is_current = wire == initial;
                        view! {
                            <option value=wire.clone() selected=is_current>
                                {humanize_level(&wire)}
                            </option>
                        }
                    })
                    .collect_view()}
            </Select>
        </div>
    }
}

fn sat_table(sat: SatNote) -> impl IntoView {
    view! {
        <div class="grid gap-x-6 gap-y-1.5 sm:grid-cols-2">
            {sat_row("Sweetness", sat.sweetness.to_string())}
            {sat_row("Acidity", sat.acidity.to_string())}
            {sat_row("Tannin", sat.tannin.to_string())}
            {sat_row("Alcohol", sat.alcohol.to_string())}
            {sat_row("Body", sat.body.to_string())}
            {sat_row("Flavour intensity", sat.flavour_intensity.to_string())}
            {sat_row("Finish", sat.finish.to_string())}
            {sat_row("Quality", sat.quality.to_string())}
            {sat_row("Readiness", sat.readiness.to_string())}
        </div>
    }
}

fn sat_row(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between gap-4 text-sm">
            <span class="text-muted-foreground">{label}</span>
            <span class="font-medium">{humanize_level(&value)}</span>
        </div>
    }
}

#[component]
pub fn WineUploadPane() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = expect_context::<HomeUiActions>();
    let api_client = app_state.0.api_client;
    let current_user = app_state.0.current_user;

    let refresh_after = actions.refresh_after;
    let select_wine = actions.select_wine;

    let name: RwSignal<String> = RwSignal::new(String::new());
    let region: RwSignal<String> = RwSignal::new(String::new());
    let category: RwSignal<String> = RwSignal::new(String::new());
    let vintage: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<ApiError>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let image_ref: NodeRef<html::Input> = NodeRef::new();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let draft = WineDraft {
            name: name.get_untracked(),
            region: region.get_untracked(),
            category: category.get_untracked(),
            vintage: vintage.get_untracked(),
        };
        let fields = match draft.validate() {
            Ok(fields) => fields,
            Err(msg) => {
                error.set(Some(ApiError::validation(msg)));
                return;
            }
        };

        let image_file = image_ref
            .get_untracked()
            .and_then(|el| el.files())
            .and_then(|list| list.get(0));

        let api = api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let image = match image_file {
                Some(file) => match FilePayload::from_file(file).await {
                    Ok(payload) => Some(payload),
                    Err(e) => {
                        error.set(Some(e));
                        loading.set(false);
                        return;
                    }
                },
                None => None,
            };

            match api.upload_wine(&fields, image).await {
                Ok(wine_id) => {
                    name.set(String::new());
                    region.set(String::new());
                    category.set(String::new());
                    vintage.set(String::new());
                    if let Some(el) = image_ref.get_untracked() {
                        el.set_value("");
                    }
                    refresh_after.run(WineMutation::UploadWine);
                    // Open the new wine right away.
                    select_wine.run(wine_id);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <Card class="max-w-lg">
            <CardHeader>
                <CardTitle class="text-base">"Add a wine"</CardTitle>
                <CardDescription class="text-xs">
                    "Name, region, type and vintage are required."
                </CardDescription>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-3" on:submit=on_submit>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="wine_name" class="text-xs">"Name"</Label>
                        <Input id="wine_name" bind_value=name class="h-8 text-sm" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="wine_region" class="text-xs">"Region"</Label>
                        <Input id="wine_region" bind_value=region class="h-8 text-sm" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="wine_type" class="text-xs">"Type"</Label>
                        <Input
                            id="wine_type"
                            bind_value=category
                            placeholder="Red, White, Sparkling..."
                            class="h-8 text-sm"
                        />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="wine_vintage" class="text-xs">"Vintage"</Label>
                        <Input id="wine_vintage" bind_value=vintage placeholder="2019" class="h-8 text-sm" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="wine_image" class="text-xs">"Label image (optional)"</Label>
                        <input
                            id="wine_image"
                            type="file"
                            accept="image/*"
                            class="w-full text-xs text-muted-foreground file:mr-3 file:rounded-md file:border file:border-border file:bg-background file:px-3 file:py-1.5 file:text-xs file:font-medium hover:file:bg-accent"
                            node_ref=image_ref
                        />
                    </div>

                    <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                        {move || error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e.to_string()}</AlertDescription>
                            </Alert>
                        })}
                    </Show>

                    <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || loading.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if loading.get() { "Uploading..." } else { "Add wine" }}
                        </span>
                    </Button>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
pub fn RecommendationsPane() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let current_user = app_state.0.current_user;

    let rating: RwSignal<String> = RwSignal::new(String::new());
    let price: RwSignal<String> = RwSignal::new(String::new());
    let results: RwSignal<Vec<WineSummary>> = RwSignal::new(vec![]);
    let searched: RwSignal<bool> = RwSignal::new(false);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let rating_val = rating.get_untracked();
        let price_val = price.get_untracked();
        let api = api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api
                .recommendations(Some(rating_val.as_str()), Some(price_val.as_str()))
                .await
            {
                Ok(list) => {
                    searched.set(true);
                    results.set(list);
                }
                Err(e) => {
                    if e.kind == ApiErrorKind::Unauthorized {
                        force_logout(api_client, current_user);
                        return;
                    }
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="space-y-4">
            <Card class="max-w-lg">
                <CardHeader>
                    <CardTitle class="text-base">"Recommendations"</CardTitle>
                    <CardDescription class="text-xs">
                        "Community picks above a minimum rating and below a price cap."
                    </CardDescription>
                </CardHeader>
                <CardContent>
                    <form class="flex flex-wrap items-end gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="rec_rating" class="text-xs">"Minimum rating"</Label>
                            <Input
                                id="rec_rating"
                                r#type="number"
                                placeholder="4.3"
                                bind_value=rating
                                class="h-8 w-28 text-sm"
                            />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="rec_price" class="text-xs">"Maximum price"</Label>
                            <Input
                                id="rec_price"
                                r#type="number"
                                placeholder="5000"
                                bind_value=price
                                class="h-8 w-28 text-sm"
                            />
                        </div>
                        <Button size=ButtonSize::Sm attr:disabled=move || loading.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Searching..." } else { "Find wines" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>

            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                {move || error.get().map(|e| view! {
                    <Alert class="border-destructive/30">
                        <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                    </Alert>
                })}
            </Show>

            {move || {
                if !searched.get() {
                    ().into_any()
                } else {
                    let list = results.get();
                    if list.is_empty() {
                        view! {
                            <div class="text-sm text-muted-foreground">
                                "No wines matched. Try loosening the criteria."
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="grid gap-3 sm:grid-cols-2 lg:grid-cols-3">
                                {list
                                    .into_iter()
                                    .map(|w| view! { <WineSummaryCard wine=w /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn WineSummaryCard(wine: WineSummary) -> impl IntoView {
    let actions = expect_context::<HomeUiActions>();
    let select_wine = actions.select_wine;
    let id = wine.wine_id.clone();

    view! {
        <button
            class="flex w-full flex-col gap-2 rounded-xl border border-border bg-card p-3 text-left shadow-sm transition-colors hover:bg-accent/40"
            on:click=move |_| select_wine.run(id.clone())
        >
            <FallbackImage
                src=wine.image_url.clone().unwrap_or_default()
                alt=wine.name.clone()
                class="h-32 w-full rounded-md border border-border object-cover"
            />
            <div class="min-w-0 space-y-0.5">
                <div class="truncate text-sm font-medium">{wine.name.clone()}</div>
                <div class="truncate text-xs text-muted-foreground">{wine.region.clone()}</div>
                <div class="text-xs text-muted-foreground">
                    {wine.category.clone()} " · " {wine.vintage}
                </div>
            </div>
        </button>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    view! {
        <RootAuthed>
            <HomePage />
        </RootAuthed>
    }
}
