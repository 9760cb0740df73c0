//! Wide data table: one row per region, one column per period.

use leptos::*;

use crate::types::{format_cell, PipelineStats, WideTable};

#[component]
pub fn DataTable(
    heading: String,
    table: WideTable,
    stats: PipelineStats,
) -> impl IntoView {
    let header = table
        .periods
        .iter()
        .map(|period| view! { <th>{period.clone()}</th> })
        .collect_view();

    let body = table
        .rows
        .into_iter()
        .map(|row| {
            let cells = row
                .values
                .into_iter()
                .map(|value| view! { <td class="num">{format_cell(value)}</td> })
                .collect_view();
            view! {
                <tr>
                    <th scope="row">{row.region}</th>
                    {cells}
                </tr>
            }
        })
        .collect_view();

    view! {
        <section class="table-section">
            <h2>{heading}</h2>
            <div class="table-scroll">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>{table.index_name}</th>
                            {header}
                        </tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
            <p class="table-stats">
                {format!(
                    "{} rows read ({}), {} unparseable values, {} duplicate cells",
                    stats.row_count, stats.encoding, stats.missing_values, stats.duplicate_cells
                )}
            </p>
        </section>
    }
}
