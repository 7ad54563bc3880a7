use std::time::Duration;

use sqlx::{
	Connection,
	postgres::{PgConnectOptions, PgConnection},
};

use crate::{Error, Result, models::ConversationTurn, queries};

/// Read-only handle on the conversation-history table.
///
/// Holds connection options only. Every lookup opens its own connection and closes it before
/// returning, whether the query succeeded or not.
#[derive(Debug, Clone)]
pub struct HistoryDb {
	options: PgConnectOptions,
	table: String,
	connect_timeout: Duration,
}
impl HistoryDb {
	pub fn new(cfg: &rag_config::Postgres) -> Self {
		let options = PgConnectOptions::new()
			.host(&cfg.host)
			.port(cfg.port)
			.database(&cfg.dbname)
			.username(&cfg.user)
			.password(&cfg.password);

		Self::with_options(options, &cfg.history_table, cfg.connect_timeout_ms)
	}

	pub fn with_options(options: PgConnectOptions, table: &str, connect_timeout_ms: u64) -> Self {
		Self {
			options,
			table: table.to_string(),
			connect_timeout: Duration::from_millis(connect_timeout_ms),
		}
	}

	pub async fn fetch_turns(&self, conversation_id: &str) -> Result<Vec<ConversationTurn>> {
		let mut conn = self.connect().await?;
		let result = queries::fetch_turns(&mut conn, &self.table, conversation_id).await;

		if let Err(err) = conn.close().await {
			tracing::warn!(error = %err, "Failed to close history connection.");
		}

		result
	}

	async fn connect(&self) -> Result<PgConnection> {
		let conn = tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
			.await
			.map_err(|_| Error::ConnectTimeout {
				timeout_ms: self.connect_timeout.as_millis() as u64,
			})??;

		Ok(conn)
	}
}
