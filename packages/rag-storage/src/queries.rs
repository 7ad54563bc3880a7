use sqlx::PgConnection;

use crate::{Result, models::ConversationTurn};

#[derive(sqlx::FromRow)]
struct TurnRow {
	query: Option<String>,
	answer: Option<String>,
}

/// Turns for `conversation_id`, oldest first. `table` must already be a validated identifier.
///
/// The id is compared as text so `uuid` and `text` columns both work.
pub async fn fetch_turns(
	conn: &mut PgConnection,
	table: &str,
	conversation_id: &str,
) -> Result<Vec<ConversationTurn>> {
	let sql = format!(
		"\
SELECT query, answer
FROM {table}
WHERE conversation_id::text = $1
ORDER BY created_at ASC"
	);
	let rows: Vec<TurnRow> =
		sqlx::query_as(sql.as_str()).bind(conversation_id).fetch_all(conn).await?;

	Ok(rows
		.into_iter()
		.map(|row| ConversationTurn {
			query: row.query.unwrap_or_default(),
			answer: row.answer.unwrap_or_default(),
		})
		.collect())
}
