use std::{
	collections::HashMap,
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use rag_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("rag_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn load_err(payload: String) -> Error {
	let path = write_temp_config(payload);
	let result = rag_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result.expect_err("Expected validation error.")
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML.to_string());
	let result = rag_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config must be valid.");

	assert_eq!(cfg.providers.rerank.model, "rerank-multilingual-v3.0");
	assert_eq!(cfg.rerank.scoring_concurrency, 4);
	assert_eq!(cfg.storage.postgres.history_table, "validation_history");
}

#[test]
fn missing_sections_use_defaults() {
	let cfg: Config = toml::from_str("[providers.rerank]\napi_key = \"k\"\n")
		.expect("Failed to parse minimal config.");

	assert!(rag_config::validate(&cfg).is_ok());
	assert_eq!(cfg.rerank.local_top_k, 3);
	assert_eq!(cfg.rerank.qna_top_k, 1);
	assert_eq!(cfg.providers.generation.timeout_ms, 60_000);
	assert_eq!(cfg.rewrite.language, "Bahasa Indonesia");
}

#[test]
fn rerank_api_key_must_be_non_empty() {
	let err = load_err(sample_toml_with("providers.rerank", "api_key", Value::String(" ".into())));

	assert!(
		err.to_string().contains("Provider rerank api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn timeouts_must_be_positive() {
	let err = load_err(sample_toml_with("providers.generation", "timeout_ms", Value::Integer(0)));

	assert!(
		err.to_string().contains("Provider generation timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn scoring_concurrency_must_be_positive() {
	let err = load_err(sample_toml_with("rerank", "scoring_concurrency", Value::Integer(0)));

	assert!(
		err.to_string().contains("rerank.scoring_concurrency must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn history_table_rejects_sql() {
	let mut cfg = base_config();

	cfg.storage.postgres.history_table = "validation_history; DROP TABLE users".to_string();

	let err = rag_config::validate(&cfg).expect_err("Expected identifier validation error.");

	assert!(err.to_string().contains("history_table"), "Unexpected error: {err}");
}

#[test]
fn env_overrides_follow_deployment_variables() {
	let vars: HashMap<&str, &str> = HashMap::from([
		("OLLAMA_URL", "http://gpu-box:11434/api/chat"),
		("MODEL_NAME", "qwen2.5:14b"),
		("HOST", "http://gpu-box:11434"),
		("RERANKER_MODEL", "bge-reranker"),
		("COHERE_API", "env-key"),
		("DBNAME", "history"),
		("DBUSER", "reader"),
		("DBPASSWORD", "secret"),
		("DBHOST", "db.internal"),
		("DBPORT", "6543"),
		("RAG_LOG_LEVEL", "  "),
	]);
	let mut cfg = base_config();

	rag_config::apply_env_with(&mut cfg, |name| vars.get(name).map(|v| v.to_string()))
		.expect("Env overrides must apply.");

	assert_eq!(cfg.providers.generation.api_base, "http://gpu-box:11434/api/chat");
	assert_eq!(cfg.providers.generation.path, "");
	assert_eq!(cfg.providers.generation.model, "qwen2.5:14b");
	assert_eq!(cfg.providers.scoring.api_base, "http://gpu-box:11434");
	assert_eq!(cfg.providers.scoring.path, "/api/chat");
	assert_eq!(cfg.providers.scoring.model, "bge-reranker");
	assert_eq!(cfg.providers.rerank.api_key, "env-key");
	assert_eq!(cfg.storage.postgres.dbname, "history");
	assert_eq!(cfg.storage.postgres.user, "reader");
	assert_eq!(cfg.storage.postgres.password, "secret");
	assert_eq!(cfg.storage.postgres.host, "db.internal");
	assert_eq!(cfg.storage.postgres.port, 6543);
	// Blank values leave the file setting alone.
	assert_eq!(cfg.service.log_level, "info");
	assert!(rag_config::validate(&cfg).is_ok());
}

#[test]
fn env_port_must_be_numeric() {
	let mut cfg = base_config();
	let err = rag_config::apply_env_with(&mut cfg, |name| {
		(name == "DBPORT").then(|| "five-four-three-two".to_string())
	})
	.expect_err("Expected port parse error.");

	assert!(matches!(err, Error::InvalidEnv { name: "DBPORT", .. }), "Unexpected error: {err}");
}

#[test]
fn resolve_reads_the_given_file() {
	let path = write_temp_config(sample_toml_with("rerank", "qna_top_k", Value::Integer(2)));
	let result = rag_config::resolve(Some(&path));

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config must resolve.");

	assert_eq!(cfg.rerank.qna_top_k, 2);
	assert_eq!(cfg.rerank.scoring_concurrency, 4);
}

#[test]
fn resolve_reports_missing_file() {
	let mut path = env::temp_dir();

	path.push("rag_config_test_missing_file.toml");

	let err = rag_config::resolve(Some(&path)).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}
