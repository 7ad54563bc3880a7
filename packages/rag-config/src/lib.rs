mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, LlmProviderConfig, Postgres, ProviderConfig, Providers, Rerank, Rewrite,
	ScoringProviderConfig, Service, Storage,
};

use std::{env, fs, path::Path};

/// Reads a TOML config file. Missing sections and fields fall back to their defaults.
pub fn load(path: &Path) -> Result<Config> {
	let mut cfg = read_file(path)?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Builds the process configuration once at startup.
///
/// Order: `.env` file (if any), then the optional TOML file, then process environment
/// variables, then validation.
pub fn resolve(path: Option<&Path>) -> Result<Config> {
	match dotenvy::dotenv() {
		Ok(_) => {},
		Err(err) if err.not_found() => {},
		Err(err) => return Err(err.into()),
	}

	let mut cfg = match path {
		Some(path) => read_file(path)?,
		None => Config::default(),
	};

	apply_env_with(&mut cfg, |name| env::var(name).ok())?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

/// Overlays deployment environment variables onto `cfg`.
///
/// Blank values are ignored so an exported-but-empty variable never wipes a file setting.
pub fn apply_env_with<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

	if let Some(value) = get("RAG_HTTP_BIND") {
		cfg.service.http_bind = value;
	}
	if let Some(value) = get("RAG_LOG_LEVEL") {
		cfg.service.log_level = value;
	}

	// OLLAMA_URL is the full chat endpoint, not a base.
	if let Some(value) = get("OLLAMA_URL") {
		cfg.providers.generation.api_base = value;
		cfg.providers.generation.path = String::new();
	}
	if let Some(value) = get("MODEL_NAME") {
		cfg.providers.generation.model = value;
	}
	if let Some(value) = get("HOST") {
		cfg.providers.scoring.api_base = value;
	}
	if let Some(value) = get("RERANKER_MODEL") {
		cfg.providers.scoring.model = value;
	}
	if let Some(value) = get("COHERE_API") {
		cfg.providers.rerank.api_key = value;
	}

	let pg = &mut cfg.storage.postgres;

	if let Some(value) = get("DBNAME") {
		pg.dbname = value;
	}
	if let Some(value) = get("DBUSER") {
		pg.user = value;
	}
	// An empty password is a valid setting.
	if let Some(value) = lookup("DBPASSWORD") {
		pg.password = value;
	}
	if let Some(value) = get("DBHOST") {
		pg.host = value;
	}
	if let Some(value) = get("DBPORT") {
		pg.port = value
			.parse()
			.map_err(|err| Error::InvalidEnv { name: "DBPORT", message: format!("{err}.") })?;
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let pg = &cfg.storage.postgres;

	if pg.host.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.host must be non-empty.".to_string(),
		});
	}
	if pg.dbname.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dbname must be non-empty.".to_string(),
		});
	}
	if pg.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !is_sql_identifier(&pg.history_table) {
		return Err(Error::Validation {
			message: "storage.postgres.history_table must be a plain SQL identifier.".to_string(),
		});
	}

	for (label, api_base, model, timeout_ms) in [
		(
			"generation",
			&cfg.providers.generation.api_base,
			&cfg.providers.generation.model,
			cfg.providers.generation.timeout_ms,
		),
		(
			"scoring",
			&cfg.providers.scoring.api_base,
			&cfg.providers.scoring.model,
			cfg.providers.scoring.timeout_ms,
		),
		(
			"rerank",
			&cfg.providers.rerank.api_base,
			&cfg.providers.rerank.model,
			cfg.providers.rerank.timeout_ms,
		),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_base must be non-empty."),
			});
		}
		if model.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} model must be non-empty."),
			});
		}
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.providers.rerank.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider rerank api_key must be non-empty.".to_string(),
		});
	}
	if !cfg.providers.scoring.temperature.is_finite() || cfg.providers.scoring.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.scoring.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}

	for (label, value) in [
		("rerank.local_top_k", cfg.rerank.local_top_k),
		("rerank.hosted_top_k", cfg.rerank.hosted_top_k),
		("rerank.qna_top_k", cfg.rerank.qna_top_k),
		("rerank.fallback_count", cfg.rerank.fallback_count),
		("rerank.scoring_concurrency", cfg.rerank.scoring_concurrency),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.rewrite.language.trim().is_empty() {
		return Err(Error::Validation {
			message: "rewrite.language must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn read_file(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	toml::from_str(&raw).map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })
}

fn normalize(cfg: &mut Config) {
	for key in [&mut cfg.providers.generation.api_key, &mut cfg.providers.scoring.api_key] {
		if key.as_deref().map(|k| k.trim().is_empty()).unwrap_or(false) {
			*key = None;
		}
	}

	cfg.storage.postgres.history_table = cfg.storage.postgres.history_table.trim().to_string();
}

/// Accepts `table` or `schema.table` where each part is `[A-Za-z_][A-Za-z0-9_]*`.
fn is_sql_identifier(name: &str) -> bool {
	let parts: Vec<&str> = name.split('.').collect();

	if parts.len() > 2 {
		return false;
	}

	parts.iter().all(|part| {
		let mut chars = part.chars();

		match chars.next() {
			Some(first) if first.is_ascii_alphabetic() || first == '_' =>
				chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
			_ => false,
		}
	})
}
