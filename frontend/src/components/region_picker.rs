//! Multiselect of autonomous communities.
//!
//! Writes the same [`Selection`] signal as the chart legend, so both always
//! show one state.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::types::Selection;

/// Read every selected option of a `<select multiple>`.
fn selected_options(select: &HtmlSelectElement) -> Vec<String> {
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}

#[component]
pub fn RegionPicker(
    regions: Vec<String>,
    selection: RwSignal<Selection>,
) -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let count = move || selection.with(|s| s.regions.len());

    let on_change = move |ev: web_sys::Event| {
        let Some(select) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        let chosen = selected_options(&select);
        if selection.with_untracked(|s| s.same_regions(&chosen)) {
            return;
        }
        selection.set(Selection::from_control(chosen));
    };

    let options = regions
        .into_iter()
        .map(|region| {
            let value = region.clone();
            let is_selected = move || selection.with(|s| s.contains(&value));
            view! {
                <option value=region.clone() prop:selected=is_selected>{region}</option>
            }
        })
        .collect_view();

    view! {
        <div class="region-picker">
            <button
                class="region-picker-toggle"
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                "Choose communities"
                <Show when=move || { count() > 0 } fallback=|| ()>
                    <span class="badge">{count}</span>
                </Show>
            </button>
            <Show when=move || open.get() fallback=|| ()>
                <select multiple=true class="region-select" on:change=on_change>
                    {options.clone()}
                </select>
                <button
                    class="region-clear"
                    on:click=move |_| selection.set(Selection::from_control(vec![]))
                >
                    "Clear"
                </button>
            </Show>
        </div>
    }
}
