#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Connecting to the history database timed out after {timeout_ms} ms.")]
	ConnectTimeout { timeout_ms: u64 },
}
