pub mod context;
pub mod document;
pub mod hosted_rerank;
pub mod local_rerank;
pub mod rewrite;
pub mod score;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde::Serialize;
use serde_json::Value;

pub use context::format_transcript;
pub use document::{Document, parse_documents};
pub use rag_providers::rerank::RerankHit;
pub use rag_storage::models::ConversationTurn;
pub use score::parse_score;
use rag_config::{Config, LlmProviderConfig, ProviderConfig, ScoringProviderConfig};
use rag_providers::{generation, rerank, scoring};
use rag_storage::db::HistoryDb;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait ScoringProvider
where
	Self: Send + Sync,
{
	fn grade<'a>(
		&'a self,
		cfg: &'a ScoringProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait HostedRerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
		top_n: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RerankHit>>>;
}

/// Read-only access to past conversation turns.
pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn fetch_turns<'a>(
		&'a self,
		conversation_id: &'a str,
	) -> BoxFuture<'a, rag_storage::Result<Vec<ConversationTurn>>>;
}

/// `{ "results": [...] }`, the shape both rerank endpoints answer with.
///
/// Entries are caller documents. Only the hosted fallback can pass through entries that are not
/// JSON objects, since it echoes the leading input entries as given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankResponse {
	pub results: Vec<Value>,
}
impl RerankResponse {
	pub fn empty() -> Self {
		Self { results: Vec::new() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub generation: Arc<dyn GenerationProvider>,
	pub scoring: Arc<dyn ScoringProvider>,
	pub rerank: Arc<dyn HostedRerankProvider>,
}

pub struct RagService {
	pub cfg: Config,
	pub history: Arc<dyn HistoryStore>,
	pub providers: Providers,
}

struct DefaultProviders;

impl GenerationProvider for DefaultProviders {
	fn chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::chat(cfg, messages))
	}
}

impl ScoringProvider for DefaultProviders {
	fn grade<'a>(
		&'a self,
		cfg: &'a ScoringProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(scoring::grade(cfg, prompt))
	}
}

impl HostedRerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
		top_n: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RerankHit>>> {
		Box::pin(rerank::rerank(cfg, query, docs, top_n))
	}
}

impl HistoryStore for HistoryDb {
	fn fetch_turns<'a>(
		&'a self,
		conversation_id: &'a str,
	) -> BoxFuture<'a, rag_storage::Result<Vec<ConversationTurn>>> {
		Box::pin(HistoryDb::fetch_turns(self, conversation_id))
	}
}

impl Providers {
	pub fn new(
		generation: Arc<dyn GenerationProvider>,
		scoring: Arc<dyn ScoringProvider>,
		rerank: Arc<dyn HostedRerankProvider>,
	) -> Self {
		Self { generation, scoring, rerank }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { generation: provider.clone(), scoring: provider.clone(), rerank: provider }
	}
}

impl RagService {
	pub fn new(cfg: Config) -> Self {
		let history = Arc::new(HistoryDb::new(&cfg.storage.postgres));

		Self { cfg, history, providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, history: Arc<dyn HistoryStore>, providers: Providers) -> Self {
		Self { cfg, history, providers }
	}
}
