use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;
use serde_json::Value;

/// Asks the scoring model to grade `prompt` and returns its reply verbatim.
pub async fn grade(cfg: &rag_config::ScoringProviderConfig, prompt: &str) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = build_grade_body(cfg, prompt);
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	crate::chat_content(&json)
}

fn build_grade_body(cfg: &rag_config::ScoringProviderConfig, prompt: &str) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"messages": [{ "role": "user", "content": prompt }],
		"stream": false,
		"options": { "temperature": cfg.temperature },
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grade_body_pins_temperature_and_single_user_message() {
		let cfg = rag_config::ScoringProviderConfig::default();
		let body = build_grade_body(&cfg, "Query: a\nDocument: b");

		assert_eq!(body["options"]["temperature"], 0.0);
		assert_eq!(body["stream"], false);
		assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
		assert_eq!(body["messages"][0]["role"], "user");
	}
}
