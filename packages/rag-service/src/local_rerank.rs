use std::cmp::Ordering;

use futures::{StreamExt, stream};
use serde_json::Value;

use crate::{
	Document, RagService, RerankResponse, Result,
	document::{content_text, parse_documents},
	score::parse_score,
};

struct ScoredDocument {
	document: Document,
	score: f64,
}

impl RagService {
	/// Grades every document with the scoring model and keeps the best `rerank.local_top_k`.
	///
	/// Only undecodable `documents` input is an error. A failed grading call scores that document
	/// `0.0` and the rest of the batch carries on.
	pub async fn rerank_local(&self, query: &str, documents: &str) -> Result<RerankResponse> {
		let docs = parse_documents(documents)?;
		let concurrency = self.cfg.rerank.scoring_concurrency.max(1) as usize;
		// `buffered` yields in input order, so scores line up with `docs` however calls finish.
		let grading: Vec<_> =
			docs.iter().enumerate().map(|(idx, doc)| self.score_document(query, idx, doc)).collect();
		let scores: Vec<f64> = stream::iter(grading)
			.buffered(concurrency)
			.collect()
			.await;
		let mut scored: Vec<ScoredDocument> = docs
			.into_iter()
			.zip(scores)
			.map(|(document, score)| ScoredDocument { document, score })
			.collect();

		sort_by_score(&mut scored);

		let top_k = self.cfg.rerank.local_top_k as usize;

		tracing::info!(
			operation = "rerank_local",
			candidates = scored.len(),
			top_k,
			"Documents graded."
		);

		Ok(RerankResponse {
			results: scored
				.into_iter()
				.take(top_k)
				.map(|item| Value::Object(item.document))
				.collect(),
		})
	}

	async fn score_document(&self, query: &str, idx: usize, doc: &Document) -> f64 {
		let prompt = build_grading_prompt(query, &content_text(doc));

		match self.providers.scoring.grade(&self.cfg.providers.scoring, &prompt).await {
			Ok(reply) => parse_score(reply.trim()),
			Err(err) => {
				tracing::warn!(
					operation = "rerank_local",
					document = idx,
					error = %err,
					"Scoring call failed; scoring document as 0.0."
				);

				0.0
			},
		}
	}
}

pub fn build_grading_prompt(query: &str, document: &str) -> String {
	format!(
		"\
You are an expert relevance grader. Score the relevance of the document to the query on a scale of 0.0 to 1.0.
1.0 is highly relevant, 0.0 is completely irrelevant.
Query: {query}
Document: {document}
Just reply with the score."
	)
}

/// Highest score first. Stable, so equal scores keep their input order.
fn sort_by_score(scored: &mut [ScoredDocument]) {
	scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
