use crate::{ConversationTurn, RagService};

impl RagService {
	/// Transcript of every earlier turn in `conversation_id`, oldest first.
	///
	/// Store failures are logged and read as an empty conversation.
	pub async fn assemble_context(&self, conversation_id: &str) -> String {
		match self.history.fetch_turns(conversation_id).await {
			Ok(turns) => format_transcript(&turns),
			Err(err) => {
				tracing::warn!(
					operation = "get_context",
					conversation_id,
					error = %err,
					"History lookup failed; continuing without context."
				);

				String::new()
			},
		}
	}
}

/// Renders turns as `User: <query>\nAnswer: <answer>\n` blocks separated by a blank line.
pub fn format_transcript(turns: &[ConversationTurn]) -> String {
	turns
		.iter()
		.map(|turn| format!("User: {}\nAnswer: {}\n", turn.query, turn.answer))
		.collect::<Vec<_>>()
		.join("\n")
}
