//! Line chart of smoking by community.
//!
//! The chart is embedded once per control-driven selection change. Legend
//! clicks are already drawn by vega, so they only update the shared signal.

use leptos::*;

use crate::config::{CHART_ELEMENT_ID, SELECTION_PARAM};
use crate::services::render_chart;
use crate::types::Selection;

#[component]
pub fn ChartPanel(
    heading: String,
    hint: String,
    spec: serde_json::Value,
    selection: RwSignal<Selection>,
) -> impl IntoView {
    let (error, set_error) = create_signal(None::<String>);

    create_effect(move |_| {
        let current = selection.get();
        if !current.needs_redraw() {
            return;
        }

        let spec = current.apply_to_spec(&spec);
        spawn_local(async move {
            let on_select = move |regions: Vec<String>| {
                if selection.with_untracked(|s| s.same_regions(&regions)) {
                    return;
                }
                selection.set(Selection::from_legend(regions));
            };

            match render_chart(CHART_ELEMENT_ID, &spec, SELECTION_PARAM, on_select).await {
                Ok(()) => set_error.set(None),
                Err(e) => {
                    log::error!("{}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    });

    view! {
        <section class="chart-section">
            <h2>{heading}</h2>
            <p class="chart-hint">{hint}</p>
            <Show when=move || error.get().is_some() fallback=|| ()>
                <div class="error-banner">{move || error.get().unwrap_or_default()}</div>
            </Show>
            <div id=CHART_ELEMENT_ID class="chart"></div>
        </section>
    }
}
