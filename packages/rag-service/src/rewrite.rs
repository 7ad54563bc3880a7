use serde_json::Value;

use crate::RagService;

impl RagService {
	/// Rewrites `query` into a standalone search query using the conversation so far.
	///
	/// Returns an empty string when the generation provider fails.
	pub async fn rewrite(&self, conversation_id: &str, query: &str) -> String {
		let context = self.assemble_context(conversation_id).await;
		let rewritten = self.rewrite_query(query, &context).await;

		tracing::info!(
			operation = "rewrite",
			conversation_id,
			context_chars = context.len(),
			rewritten_chars = rewritten.len(),
			"Query rewritten."
		);

		rewritten
	}

	pub async fn rewrite_query(&self, query: &str, context: &str) -> String {
		let messages = build_rewrite_messages(query, context, &self.cfg.rewrite.language);

		match self.providers.generation.chat(&self.cfg.providers.generation, &messages).await {
			Ok(content) => content.trim().to_string(),
			Err(err) => {
				tracing::warn!(
					operation = "rewrite",
					error = %err,
					"Query rewrite failed; returning an empty rewrite."
				);

				String::new()
			},
		}
	}
}

/// One system message carrying the rules, the context and the query.
pub fn build_rewrite_messages(query: &str, context: &str, language: &str) -> Vec<Value> {
	let prompt = format!(
		"\
You are an expert search query rewriter.
Rewrite the <user_query> into a precise, specific and complete search query, using the <context> to resolve what the user refers to.

RULES:
1. If the <user_query> is only a greeting (such as \"halo\" or \"hi\") or has no topic, return it unchanged or return the main topic of the <context>.
2. Do not answer the user. Do not engage in conversation.
3. Output only the rewritten query text.
4. If no rewrite is needed, output the original <user_query>.
5. Language: {language}.
6. Preserve technical terms. Do not drop or over-abbreviate them (write \"General Overhaul\" rather than only \"GOH\" when the full term adds clarity). Precision matters more than brevity.

<context>
{context}
</context>

<user_query>
{query}
</user_query>"
	);

	vec![serde_json::json!({ "role": "system", "content": prompt })]
}
