pub mod generation;
pub mod rerank;
pub mod scoring;

use color_eyre::{Result, eyre};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

/// Builds request headers. Local chat servers usually run without a key, so `api_key` is optional.
pub fn auth_headers(
	api_key: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {key}").parse()?);
	}
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};
		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Joins `api_base` and `path`, tolerating a trailing slash on the base.
pub fn endpoint(api_base: &str, path: &str) -> String {
	if path.is_empty() {
		return api_base.to_string();
	}

	format!("{}{}", api_base.trim_end_matches('/'), path)
}

/// Pulls `message.content` out of a non-streaming chat response.
pub fn chat_content(json: &Value) -> Result<String> {
	json.get("message")
		.and_then(|msg| msg.get("content"))
		.and_then(|content| content.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Chat response is missing message.content."))
}
