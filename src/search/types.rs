//! Request and response shapes of the search backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure talking to the search backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never completed, e.g. the network or CORS refused it.
	#[error("request failed: {0}")]
	Request(String),

	/// The backend answered with a non-success HTTP status.
	#[error("backend answered {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, kept for the log.
		body: String,
	},

	/// The reply was not the expected JSON.
	#[error("malformed backend payload: {0}")]
	Decode(#[from] serde_json::Error),

	/// A `generate_answer` reply with no text in it.
	#[error("backend reply held neither an answer nor a definition")]
	EmptyAnswer,
}

impl From<gloo_net::Error> for ApiError {
	fn from(err: gloo_net::Error) -> Self {
		ApiError::Request(err.to_string())
	}
}

/// Metadata attached to a search hit. Only `articleId` is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchMetadata {
	/// Identifier of the article the passage came from.
	#[serde(rename = "articleId", skip_serializing_if = "Option::is_none")]
	pub article_id: Option<String>,
	/// Everything else the backend attached.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// One similarity search result.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchHit {
	/// Document id assigned by the backend.
	pub id: Option<String>,
	/// Document metadata.
	pub metadata: SearchMetadata,
	/// Matched passage text.
	pub page_content: Option<String>,
	/// Similarity score as reported by the backend.
	pub score: f64,
}

impl SearchHit {
	/// The article this hit points at: `metadata.articleId`, else the hit id.
	pub fn article_id(&self) -> Option<&str> {
		self.metadata
			.article_id
			.as_deref()
			.or(self.id.as_deref())
			.filter(|id| !id.is_empty())
	}
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct HitDocument {
	id: Option<String>,
	metadata: SearchMetadata,
	page_content: Option<String>,
}

#[derive(Deserialize)]
struct FlatHit {
	#[serde(flatten)]
	document: HitDocument,
	#[serde(default)]
	score: f64,
}

/// The backend returns either `[document, score]` pairs or flat objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawHit {
	Pair(HitDocument, f64),
	Flat(FlatHit),
}

impl From<RawHit> for SearchHit {
	fn from(raw: RawHit) -> Self {
		let (document, score) = match raw {
			RawHit::Pair(document, score) => (document, score),
			RawHit::Flat(FlatHit { document, score }) => (document, score),
		};
		SearchHit {
			id: document.id,
			metadata: document.metadata,
			page_content: document.page_content,
			score,
		}
	}
}

/// Decodes a similarity search response body.
pub fn parse_hits(body: &str) -> Result<Vec<SearchHit>, ApiError> {
	let raw: Vec<RawHit> = serde_json::from_str(body)?;
	Ok(raw.into_iter().map(SearchHit::from).collect())
}

/// How the backend should phrase a generated reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
	/// Plain-language definition of the paper's content.
	Terminology,
}

/// Text produced by `generate_answer`.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratedText {
	/// Reply to a chat question.
	Answer(String),
	/// Reply in terminology mode.
	Definition(String),
}

impl GeneratedText {
	/// The reply text, whichever kind it is.
	pub fn text(&self) -> &str {
		match self {
			GeneratedText::Answer(text) | GeneratedText::Definition(text) => text,
		}
	}

	/// Consumes the reply, returning its text.
	pub fn into_text(self) -> String {
		match self {
			GeneratedText::Answer(text) | GeneratedText::Definition(text) => text,
		}
	}
}

#[derive(Deserialize)]
struct RawGenerated {
	answer: Option<String>,
	definition: Option<String>,
}

/// Decodes a `generate_answer` response body. `answer` wins over `definition`.
pub fn parse_generated(body: &str) -> Result<GeneratedText, ApiError> {
	let raw: RawGenerated = serde_json::from_str(body)?;
	match (raw.answer, raw.definition) {
		(Some(answer), _) => Ok(GeneratedText::Answer(answer)),
		(None, Some(definition)) => Ok(GeneratedText::Definition(definition)),
		(None, None) => Err(ApiError::EmptyAnswer),
	}
}

#[derive(Serialize)]
pub(crate) struct SimilarityRequest<'a> {
	pub query: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub k: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filter: Option<Value>,
}

#[derive(Serialize)]
pub(crate) struct GenerateRequest<'a> {
	pub prompt: &'a str,
	pub file_id: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<AnswerMode>,
}
