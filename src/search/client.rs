//! Client for the two backend endpoints.

use std::cell::RefCell;

use gloo_net::http::Request;
use log::debug;
use serde_json::Value;

use super::cache::QueryCache;
use super::types::{
	AnswerMode, ApiError, GenerateRequest, GeneratedText, SearchHit, SimilarityRequest,
	parse_generated, parse_hits,
};

/// Sends a JSON body to a backend endpoint and returns the raw reply text.
#[allow(async_fn_in_trait)]
pub trait Transport {
	/// POSTs `body` to `endpoint`, relative to the backend root.
	async fn post_json(&self, endpoint: &str, body: &Value) -> Result<String, ApiError>;
}

/// Browser `fetch` transport rooted at a base URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
	base_url: String,
}

impl HttpTransport {
	/// Transport for the backend at `base_url`. A trailing slash is ignored.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}

	fn url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
	}
}

impl Transport for HttpTransport {
	async fn post_json(&self, endpoint: &str, body: &Value) -> Result<String, ApiError> {
		let url = self.url(endpoint);
		debug!("paperrag: POST {}", url);
		let response = Request::post(&url).json(body)?.send().await?;
		let ok = response.ok();
		let status = response.status();
		let text = response.text().await?;
		if !ok {
			return Err(ApiError::Status { status, body: text });
		}
		Ok(text)
	}
}

/// Typed wrapper over `similarity_search` and `generate_answer`.
///
/// Each call is one round trip. Nothing is retried or streamed.
#[derive(Clone, Debug)]
pub struct SearchClient<T> {
	transport: T,
}

impl SearchClient<HttpTransport> {
	/// Client talking to the backend at `base_url` over `fetch`.
	pub fn http(base_url: impl Into<String>) -> Self {
		Self::new(HttpTransport::new(base_url))
	}
}

impl<T: Transport> SearchClient<T> {
	/// Client sending its requests through `transport`.
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	/// Finds passages similar to `query`. A blank query returns no hits
	/// without contacting the backend.
	pub async fn similarity_search(
		&self,
		query: &str,
		k: Option<usize>,
		filter: Option<Value>,
	) -> Result<Vec<SearchHit>, ApiError> {
		if query.trim().is_empty() {
			return Ok(Vec::new());
		}
		let body = serde_json::to_value(SimilarityRequest { query, k, filter })?;
		let reply = self.transport.post_json("similarity_search", &body).await?;
		parse_hits(&reply)
	}

	/// [`similarity_search`](Self::similarity_search) that answers repeated
	/// queries from `cache` and stores fresh results in it. Failures are not
	/// cached.
	pub async fn cached_similarity_search(
		&self,
		cache: &RefCell<QueryCache>,
		query: &str,
		k: Option<usize>,
	) -> Result<Vec<SearchHit>, ApiError> {
		let cached = cache.borrow_mut().get(query).map(<[SearchHit]>::to_vec);
		if let Some(hits) = cached {
			debug!("paperrag: search cache hit for {:?}", query.trim());
			return Ok(hits);
		}
		let hits = self.similarity_search(query, k, None).await?;
		if !query.trim().is_empty() {
			cache.borrow_mut().insert(query, hits.clone());
		}
		Ok(hits)
	}

	/// Asks the backend about the paper `article_id`.
	pub async fn generate_response(
		&self,
		prompt: &str,
		article_id: &str,
		mode: Option<AnswerMode>,
	) -> Result<GeneratedText, ApiError> {
		let body = serde_json::to_value(GenerateRequest {
			prompt,
			file_id: article_id,
			mode,
		})?;
		let reply = self.transport.post_json("generate_answer", &body).await?;
		parse_generated(&reply)
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use serde_json::json;

	use super::*;

	/// Records every request and answers with a canned reply.
	struct RecordingTransport {
		reply: Result<String, u16>,
		calls: RefCell<Vec<(String, Value)>>,
	}

	impl RecordingTransport {
		fn replying(body: &str) -> Self {
			Self {
				reply: Ok(body.to_string()),
				calls: RefCell::default(),
			}
		}

		fn failing(status: u16) -> Self {
			Self {
				reply: Err(status),
				calls: RefCell::default(),
			}
		}
	}

	impl Transport for &RecordingTransport {
		async fn post_json(&self, endpoint: &str, body: &Value) -> Result<String, ApiError> {
			self.calls
				.borrow_mut()
				.push((endpoint.to_string(), body.clone()));
			match &self.reply {
				Ok(text) => Ok(text.clone()),
				Err(status) => Err(ApiError::Status {
					status: *status,
					body: "down".into(),
				}),
			}
		}
	}

	#[test]
	fn blank_query_makes_no_request() {
		let transport = RecordingTransport::replying("[]");
		let client = SearchClient::new(&transport);
		assert!(block_on(client.similarity_search("", None, None)).unwrap().is_empty());
		assert!(block_on(client.similarity_search("   \t", Some(5), None)).unwrap().is_empty());
		assert!(transport.calls.borrow().is_empty());
	}

	#[test]
	fn search_posts_query_and_parses_hits() {
		let transport =
			RecordingTransport::replying(r#"[[{"id": "x", "metadata": {"articleId": "PMC9"}}, 0.9]]"#);
		let client = SearchClient::new(&transport);
		let hits = block_on(client.similarity_search("microgravity", Some(3), None)).unwrap();
		assert_eq!(hits[0].article_id(), Some("PMC9"));

		let calls = transport.calls.borrow();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].0, "similarity_search");
		assert_eq!(calls[0].1, json!({"query": "microgravity", "k": 3}));
	}

	#[test]
	fn cached_query_skips_the_transport() {
		let transport = RecordingTransport::replying(r#"[{"id": "PMC3", "score": 0.7}]"#);
		let client = SearchClient::new(&transport);
		let cache = RefCell::new(QueryCache::default());

		let first = block_on(client.cached_similarity_search(&cache, "spaceflight", Some(8))).unwrap();
		let again = block_on(client.cached_similarity_search(&cache, " spaceflight ", Some(8))).unwrap();
		assert_eq!(first, again);
		assert_eq!(transport.calls.borrow().len(), 1);

		block_on(client.cached_similarity_search(&cache, "radiation", Some(8))).unwrap();
		assert_eq!(transport.calls.borrow().len(), 2);
	}

	#[test]
	fn failed_search_is_not_cached() {
		let transport = RecordingTransport::failing(500);
		let client = SearchClient::new(&transport);
		let cache = RefCell::new(QueryCache::default());
		assert!(block_on(client.cached_similarity_search(&cache, "bone", None)).is_err());
		assert!(cache.borrow().is_empty());
	}

	#[test]
	fn generate_sends_file_id_and_mode() {
		let transport = RecordingTransport::replying(r#"{"definition": "short"}"#);
		let client = SearchClient::new(&transport);
		let text = block_on(client.generate_response(
			"Explain",
			"PMC1",
			Some(AnswerMode::Terminology),
		))
		.unwrap();
		assert_eq!(text, GeneratedText::Definition("short".into()));
		assert_eq!(
			transport.calls.borrow()[0],
			(
				"generate_answer".to_string(),
				json!({"prompt": "Explain", "file_id": "PMC1", "mode": "terminology"})
			)
		);
	}

	#[test]
	fn chat_question_omits_mode() {
		let transport = RecordingTransport::replying(r#"{"answer": "42"}"#);
		let client = SearchClient::new(&transport);
		let text = block_on(client.generate_response("Why?", "PMC1", None)).unwrap();
		assert_eq!(text.text(), "42");
		assert!(transport.calls.borrow()[0].1.get("mode").is_none());
	}

	#[test]
	fn transport_failure_is_returned_not_panicked() {
		let transport = RecordingTransport::failing(503);
		let client = SearchClient::new(&transport);
		let err = block_on(client.similarity_search("bone", None, None)).unwrap_err();
		assert!(matches!(err, ApiError::Status { status: 503, .. }));
	}

	#[test]
	fn http_transport_joins_paths() {
		let transport = HttpTransport::new("http://localhost:8000/");
		assert_eq!(
			transport.url("/similarity_search"),
			"http://localhost:8000/similarity_search"
		);
	}
}
