use serde_json::{Map, Value};

use crate::{Error, Result};

/// A candidate document: a JSON object with a `content` field plus opaque metadata.
pub type Document = Map<String, Value>;

/// Decodes the caller's `documents` form field, a JSON array of objects.
pub fn parse_documents(raw: &str) -> Result<Vec<Document>> {
	let values: Vec<Value> = serde_json::from_str(raw)
		.map_err(|err| Error::InvalidDocuments { details: err.to_string() })?;

	values
		.into_iter()
		.enumerate()
		.map(|(idx, value)| match value {
			Value::Object(doc) => Ok(doc),
			other => Err(Error::InvalidDocuments {
				details: format!("Document {idx} must be a JSON object, got {}.", type_name(&other)),
			}),
		})
		.collect()
}

/// Text sent to the models. Missing or `null` content reads as empty; other non-string values
/// use their JSON rendering.
pub fn content_text(doc: &Document) -> String {
	match doc.get("content") {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(text)) => text.clone(),
		Some(other) => other.to_string(),
	}
}

fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
