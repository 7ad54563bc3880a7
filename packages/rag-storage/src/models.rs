/// One question/answer exchange recorded for a conversation.
///
/// `created_at` is not carried. Turns are ordered by it in SQL and the timestamp is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
	pub query: String,
	pub answer: String,
}
