use leptos::prelude::*;
use tw_merge::tw_merge;

/// Native `<select>` styled to match the input kit.
///
/// Callers supply the `<option>` elements as children (marking the current
/// one `selected` for the initial render); the chosen option's `value`
/// comes back through `on_change`, and `value` keeps the DOM selection in
/// step when the owning signal changes from elsewhere.
#[component]
pub fn Select(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] disabled: bool,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    children: Children,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input dark:bg-input/30 flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50",
        "focus-visible:border-ring focus-visible:ring-ring/50",
        "focus-visible:ring-2",
        class
    );

    view! {
        <select
            data-name="Select"
            class=merged_class
            id=id
            disabled=disabled
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            {children()}
        </select>
    }
}
