//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>
                "Data: Instituto Nacional de Estadística (INE) • Powered by "
                <span class="rust-badge">"🦀 Rust + Leptos"</span>
            </div>
            <div class="footer-links">
                <a href="https://www.ine.es" class="footer-link" target="_blank">"INE"</a>
                <a href="https://vega.github.io/vega-lite/" class="footer-link" target="_blank">
                    "Vega-Lite"
                </a>
            </div>
        </footer>
    }
}
