//! Chart rendering through vega-embed.

use wasm_bindgen::prelude::*;

use crate::types::{AppError, AppResult};

#[wasm_bindgen(module = "/src/js/chart.js")]
extern "C" {
    /// Embed `spec_json` into `#element_id`; `on_select` receives the
    /// selected regions (array of strings) on every legend change.
    #[wasm_bindgen(js_name = "renderChart", catch)]
    fn render_chart_js(
        element_id: &str,
        spec_json: &str,
        param: &str,
        on_select: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<js_sys::Promise, JsValue>;
}

/// Draw the chart and wire the legend selection back to `on_select`.
///
/// The closure must outlive the view, so it is leaked like the SSE handlers.
pub async fn render_chart(
    element_id: &str,
    spec: &serde_json::Value,
    param: &str,
    on_select: impl FnMut(Vec<String>) + 'static,
) -> AppResult<()> {
    let spec_json = serde_json::to_string(spec).map_err(|e| AppError::Chart(e.to_string()))?;

    let mut on_select = on_select;
    let callback = Closure::wrap(Box::new(move |value: JsValue| {
        match serde_wasm_bindgen::from_value::<Vec<String>>(value) {
            Ok(regions) => on_select(regions),
            Err(e) => log::warn!("Ignoring legend selection: {}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);

    let promise = render_chart_js(element_id, &spec_json, param, &callback)
        .map_err(|e| AppError::Chart(format!("{:?}", e)))?;
    callback.forget();

    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| AppError::Chart(format!("{:?}", e)))?;

    Ok(())
}
