use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {DialogHeader, div, "mb-3 space-y-1"}
    clx! {DialogTitle, div, "text-sm font-medium"}
    clx! {DialogDescription, div, "text-xs text-muted-foreground"}
    clx! {DialogFooter, div, "flex items-center justify-end gap-2 pt-2"}
}

#[allow(unused_imports)]
pub use components::*;

/// Modal overlay driven entirely by the `open` signal. The dialog never
/// closes itself; callers wire Cancel/confirm buttons (or a successful
/// request) to whatever drives `open`.
#[component]
pub fn Dialog(
    #[prop(into)] open: Signal<bool>,
    #[prop(into, optional)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    let merged_class = tw_merge!(
        "w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg",
        class
    );

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4">
                <div class=merged_class.clone()>{move || children.with_value(|c| c())}</div>
            </div>
        </Show>
    }
}
