//! Hero section component

use leptos::*;

use crate::types::{PageText, SourceInfo};

#[component]
pub fn Hero(page: PageText, source: SourceInfo) -> impl IntoView {
    let link_text = source.attribution().to_string();

    view! {
        <div class="hero">
            <h1>{page.heading}</h1>
            <p class="subtitle">{page.description}</p>
            <p class="source">
                "Source: "
                <a href=source.web_url target="_blank">{link_text}</a>
            </p>
        </div>
    }
}
