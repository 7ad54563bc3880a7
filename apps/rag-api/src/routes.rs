use axum::{
	Form, Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use rag_service::RerankResponse;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/rerank-ollama", post(rerank_local))
		.route("/rerank", post(rerank_hosted))
		.route("/rewrite", post(rewrite))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RerankLocalForm {
	pub query: String,
	pub documents: String,
}

#[derive(Debug, Deserialize)]
pub struct RerankHostedForm {
	pub query: String,
	pub documents: String,
	#[serde(default = "default_is_qna")]
	pub is_qna: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteForm {
	pub conversation_id: String,
	pub query: String,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn rerank_local(
	State(state): State<AppState>,
	Form(form): Form<RerankLocalForm>,
) -> Result<Json<RerankResponse>, ApiError> {
	let response = state.service.rerank_local(&form.query, &form.documents).await?;
	Ok(Json(response))
}

async fn rerank_hosted(
	State(state): State<AppState>,
	Form(form): Form<RerankHostedForm>,
) -> Json<RerankResponse> {
	tracing::debug!(is_qna = %form.is_qna, "Hosted rerank requested.");
	Json(state.service.rerank_hosted(&form.query, &form.documents, &form.is_qna).await)
}

/// Answers with the rewritten query as a plain-text body.
async fn rewrite(State(state): State<AppState>, Form(form): Form<RewriteForm>) -> String {
	tracing::debug!(conversation_id = %form.conversation_id, "Rewrite requested.");
	state.service.rewrite(&form.conversation_id, &form.query).await
}

fn default_is_qna() -> String {
	"false".to_string()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	details: String,
}

/// Caller-input error. Sent with `200 OK` because callers branch on the `error` field rather than
/// on the status code.
#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	details: String,
}
impl From<rag_service::Error> for ApiError {
	fn from(err: rag_service::Error) -> Self {
		let error = err.to_string();

		match err {
			rag_service::Error::InvalidDocuments { details } => {
				tracing::warn!(%details, "Rejected malformed documents field.");

				Self { status: StatusCode::OK, error, details }
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, details: self.details };

		(self.status, Json(body)).into_response()
	}
}
