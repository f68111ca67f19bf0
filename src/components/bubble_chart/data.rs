use log::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::ChartError;
use super::types::RawRow;

/// Parses the tweets CSV. The first line must be the header row; columns may
/// come in any order.
pub fn parse_rows(source_name: &str, csv_text: &str) -> Result<Vec<RawRow>, ChartError> {
	let mut reader = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_reader(csv_text.as_bytes());
	let rows = reader
		.deserialize()
		.collect::<Result<Vec<RawRow>, _>>()
		.map_err(|e| ChartError::data_load(source_name, e))?;
	debug!("Parsed {} rows from {source_name}", rows.len());
	Ok(rows)
}

/// Fetches and parses the dataset at `path`, relative to the page.
pub async fn fetch_rows(path: &str) -> Result<Vec<RawRow>, ChartError> {
	let js_err = |e: JsValue| ChartError::data_load(path, format!("{e:?}"));

	let window = web_sys::window().ok_or_else(|| ChartError::data_load(path, "no window"))?;
	let response: Response = JsFuture::from(window.fetch_with_str(path))
		.await
		.map_err(js_err)?
		.dyn_into()
		.map_err(js_err)?;
	if !response.ok() {
		return Err(ChartError::data_load(
			path,
			format!("HTTP {} {}", response.status(), response.status_text()),
		));
	}

	let body = JsFuture::from(response.text().map_err(js_err)?)
		.await
		.map_err(js_err)?
		.as_string()
		.ok_or_else(|| ChartError::data_load(path, "response body is not text"))?;
	info!("Fetched {} bytes from {path}", body.len());
	parse_rows(path, &body)
}
