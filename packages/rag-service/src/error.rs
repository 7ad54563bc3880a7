pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors reported back to the caller. Upstream failures never surface here; they degrade inside
/// the operation that hit them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid JSON format")]
	InvalidDocuments { details: String },
}
