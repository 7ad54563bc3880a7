use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub rerank: Rerank,
	pub rewrite: Rewrite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: "0.0.0.0:8000".to_string(), log_level: "info".to_string() }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub postgres: Postgres,
}

/// Connection parameters for the conversation-history database.
///
/// A connection is opened per lookup and closed before the lookup returns, so there is no pool
/// size to configure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Postgres {
	pub host: String,
	pub port: u16,
	pub dbname: String,
	pub user: String,
	pub password: String,
	/// Table holding `conversation_id`, `query`, `answer` and `created_at` columns.
	pub history_table: String,
	pub connect_timeout_ms: u64,
}
impl Default for Postgres {
	fn default() -> Self {
		Self {
			host: "localhost".to_string(),
			port: 5432,
			dbname: "postgres".to_string(),
			user: "postgres".to_string(),
			password: String::new(),
			history_table: "validation_history".to_string(),
			connect_timeout_ms: 5_000,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub generation: LlmProviderConfig,
	pub scoring: ScoringProviderConfig,
	pub rerank: ProviderConfig,
}

/// Chat endpoint used to rewrite queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for LlmProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:11434".to_string(),
			api_key: None,
			path: "/api/chat".to_string(),
			model: "llama3.1".to_string(),
			timeout_ms: 60_000,
			default_headers: Map::new(),
		}
	}
}

/// Chat endpoint used to grade one document at a time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringProviderConfig {
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for ScoringProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:11434".to_string(),
			api_key: None,
			path: "/api/chat".to_string(),
			model: "llama3.1".to_string(),
			temperature: 0.0,
			timeout_ms: 30_000,
			default_headers: Map::new(),
		}
	}
}

/// Hosted rerank API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://api.cohere.com".to_string(),
			api_key: String::new(),
			path: "/v2/rerank".to_string(),
			model: "rerank-multilingual-v3.0".to_string(),
			timeout_ms: 30_000,
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Rerank {
	/// Documents kept by the model-graded rerank.
	pub local_top_k: u32,
	/// `top_n` requested from the hosted reranker outside QnA mode.
	pub hosted_top_k: u32,
	/// `top_n` requested from the hosted reranker in QnA mode.
	pub qna_top_k: u32,
	/// Leading documents returned unranked when the hosted reranker fails.
	pub fallback_count: u32,
	/// Scoring calls in flight at once. `1` grades documents strictly one after another.
	pub scoring_concurrency: u32,
}
impl Default for Rerank {
	fn default() -> Self {
		Self {
			local_top_k: 3,
			hosted_top_k: 3,
			qna_top_k: 1,
			fallback_count: 3,
			scoring_concurrency: 1,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Rewrite {
	/// Natural language the rewritten query must be written in.
	pub language: String,
}
impl Default for Rewrite {
	fn default() -> Self {
		Self { language: "Bahasa Indonesia".to_string() }
	}
}
