use rag_storage::{db::HistoryDb, models::ConversationTurn};
use rag_testkit::TestDatabase;

const SCHEMA: &str = "\
CREATE TABLE validation_history (
	id BIGSERIAL PRIMARY KEY,
	conversation_id TEXT NOT NULL,
	query TEXT,
	answer TEXT,
	created_at TIMESTAMPTZ NOT NULL
);
INSERT INTO validation_history (conversation_id, query, answer, created_at) VALUES
	('c-1', 'apa itu GOH?', 'General Overhaul.', '2025-01-01T10:05:00Z'),
	('c-1', 'hi', 'hello!', '2025-01-01T10:00:00Z'),
	('c-2', 'other', 'thread', '2025-01-01T09:00:00Z'),
	('c-1', NULL, 'orphan answer', '2025-01-01T10:10:00Z')";

async fn test_db() -> Option<TestDatabase> {
	let Some(dsn) = rag_testkit::env_dsn() else {
		eprintln!("Skipping history tests; set RAG_PG_DSN to run.");

		return None;
	};
	let db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");

	db.execute_script(SCHEMA).await.expect("Failed to seed history table.");

	Some(db)
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RAG_PG_DSN to run."]
async fn fetches_turns_oldest_first() {
	let Some(db) = test_db().await else { return };
	let history = HistoryDb::with_options(db.options(), "validation_history", 5_000);
	let turns = history.fetch_turns("c-1").await.expect("Failed to fetch turns.");

	assert_eq!(
		turns,
		vec![
			ConversationTurn { query: "hi".to_string(), answer: "hello!".to_string() },
			ConversationTurn {
				query: "apa itu GOH?".to_string(),
				answer: "General Overhaul.".to_string(),
			},
			ConversationTurn { query: String::new(), answer: "orphan answer".to_string() },
		]
	);

	db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RAG_PG_DSN to run."]
async fn unknown_conversation_has_no_turns() {
	let Some(db) = test_db().await else { return };
	let history = HistoryDb::with_options(db.options(), "validation_history", 5_000);
	let turns = history.fetch_turns("missing").await.expect("Failed to fetch turns.");

	assert!(turns.is_empty());

	db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RAG_PG_DSN to run."]
async fn missing_table_is_an_error() {
	let Some(db) = test_db().await else { return };
	let history = HistoryDb::with_options(db.options(), "no_such_table", 5_000);

	assert!(history.fetch_turns("c-1").await.is_err());

	db.cleanup().await.expect("Failed to cleanup test database.");
}
