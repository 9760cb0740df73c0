//! Smokestats - Frontend Rust/Leptos Application
//!
//! A WebAssembly dashboard showing smoking in Spain by autonomous
//! community, drawn from the backend's `/api/dashboard` payload.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Dashboard (one fetch, then local state)                     │
//! │  ├── Hero (heading, description, source)                     │
//! │  ├── RegionPicker ─┐                                         │
//! │  ├── ChartPanel ───┴── one shared Selection signal           │
//! │  ├── DataTable                                               │
//! │  └── LogsPanel (SSE activity)                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Payload mirrors, Selection, LogEntry
//! - [`components`] - UI components
//! - [`services`] - Backend fetch and chart rendering

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    AppError, AppResult, DashboardResponse, LogEntry, LogLevel, Selection, SelectionOrigin,
    WideTable,
};

pub use components::*;

pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=format!("🚬 {}", PAGE_TITLE)/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Initialize SSE connection ONCE at app startup
    init_sse_logs(set_logs);

    let dashboard = create_local_resource(
        || (),
        |_| async move { fetch_dashboard(BACKEND_URL, &[]).await },
    );

    view! {
        <div class="container">
            <Suspense fallback=move || view! { <p class="loading">"Loading data…"</p> }>
                {move || dashboard.get().map(|result| match result {
                    Ok(data) => view! { <Dashboard data=data/> }.into_view(),
                    Err(e) => view! { <div class="error-banner">{e.to_string()}</div> }.into_view(),
                })}
            </Suspense>

            <LogsPanel logs=logs set_logs=set_logs/>
        </div>

        <Footer/>
    }
}

/// Page body once the payload is loaded.
#[component]
fn Dashboard(data: DashboardResponse) -> impl IntoView {
    let selection = create_rw_signal(Selection::initial(data.selected.clone()));

    create_effect(move |_| {
        selection.with(|s| log::debug!("Selection ({:?}): {:?}", s.origin, s.regions));
    });

    view! {
        <Hero page=data.page.clone() source=data.source.clone()/>
        <RegionPicker regions=data.regions.clone() selection=selection/>
        <ChartPanel
            heading=data.page.chart_heading.clone()
            hint=data.page.chart_hint.clone()
            spec=data.chart.clone()
            selection=selection
        />
        <DataTable heading=data.page.table_heading.clone() table=data.table stats=data.stats/>
    }
}
