use color_eyre::eyre;
use serde_json::Value;

use crate::{
	RagService, RerankResponse,
	document::{content_text, parse_documents},
};

impl RagService {
	/// Ranks documents with the hosted reranker and tags each hit with `rerank_score`.
	///
	/// At most `top_n` hits are kept even when the provider returns more.
	///
	/// Never fails. When the provider call or its response is unusable, the first
	/// `rerank.fallback_count` entries come back unranked, and input that is not a JSON array
	/// yields no results at all.
	pub async fn rerank_hosted(&self, query: &str, documents: &str, is_qna: &str) -> RerankResponse {
		let qna = is_qna_mode(is_qna);

		match self.try_rerank_hosted(query, documents, qna).await {
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(
					operation = "rerank_hosted",
					qna,
					error = %err,
					"Hosted rerank failed; returning leading documents unranked."
				);

				self.hosted_fallback(documents)
			},
		}
	}

	async fn try_rerank_hosted(
		&self,
		query: &str,
		documents: &str,
		qna: bool,
	) -> color_eyre::Result<RerankResponse> {
		let docs = parse_documents(documents)?;
		let texts: Vec<String> = docs.iter().map(content_text).collect();

		if texts.is_empty() {
			return Ok(RerankResponse::empty());
		}

		let top_n =
			(if qna { self.cfg.rerank.qna_top_k } else { self.cfg.rerank.hosted_top_k }) as usize;
		let hits = self
			.providers
			.rerank
			.rerank(&self.cfg.providers.rerank, query, &texts, top_n)
			.await?;
		let mut results = Vec::with_capacity(hits.len().min(top_n));

		for hit in hits.into_iter().take(top_n) {
			let Some(doc) = docs.get(hit.index) else {
				return Err(eyre::eyre!(
					"Rerank hit index {} is out of range for {} documents.",
					hit.index,
					docs.len()
				));
			};
			let mut doc = doc.clone();

			doc.insert("rerank_score".to_string(), Value::from(hit.relevance_score));
			results.push(Value::Object(doc));
		}

		tracing::info!(
			operation = "rerank_hosted",
			qna,
			candidates = texts.len(),
			top_n,
			returned = results.len(),
			"Hosted rerank finished."
		);

		Ok(RerankResponse { results })
	}

	/// Leading entries of the raw array. Entries are not checked for shape here.
	fn hosted_fallback(&self, documents: &str) -> RerankResponse {
		match serde_json::from_str::<Vec<Value>>(documents) {
			Ok(entries) => RerankResponse {
				results: entries.into_iter().take(self.cfg.rerank.fallback_count as usize).collect(),
			},
			Err(_) => RerankResponse::empty(),
		}
	}
}

/// `"true"` in any letter case turns QnA mode on. Everything else, including blanks, leaves it off.
pub fn is_qna_mode(raw: &str) -> bool {
	raw.eq_ignore_ascii_case("true")
}
