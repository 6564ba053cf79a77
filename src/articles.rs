//! Article store: the bundled paper corpus joined with its citation edges.
//!
//! Two static datasets ship with the client. `articles.json` carries paper
//! metadata and `references_graph.json` carries one `{id, cited, cited_by}`
//! record per paper. [`ArticleStore::from_json`] joins them by identifier.
//! Every article must have an edge record; a missing one is reported as
//! [`DatasetError::MissingEdgeRecord`] rather than patched over.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_ARTICLES: &str = include_str!("../data/articles.json");
const BUNDLED_REFERENCES: &str = include_str!("../data/references_graph.json");

/// Errors raised while loading the article datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
	/// One of the JSON files could not be parsed.
	#[error("failed to parse {file}: {source}")]
	Parse {
		/// Name of the dataset file.
		file: &'static str,
		/// The underlying parse failure.
		#[source]
		source: serde_json::Error,
	},

	/// Two articles share the same identifier.
	#[error("duplicate article id: {0}")]
	DuplicateId(String),

	/// An article has no matching record in the citation edge dataset.
	#[error("article {0} has no citation edge record")]
	MissingEdgeRecord(String),
}

/// One paper in the corpus.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
	/// PubMed Central identifier, e.g. `PMC4136787`.
	#[serde(alias = "id")]
	pub pmcid: String,
	/// Paper title.
	#[serde(default)]
	pub title: String,
	/// Abstract, read from the `abstract` key.
	#[serde(default, rename = "abstract")]
	pub abstract_text: String,
	/// Author list as a single display string.
	#[serde(default)]
	pub author: String,
	/// Publication date as given by the dataset.
	#[serde(default)]
	pub date: String,
	/// Identifiers this article cites. May reference papers outside the corpus.
	#[serde(default)]
	pub ref_cited: Vec<String>,
	/// Identifiers of papers citing this article.
	#[serde(default)]
	pub ref_cited_by: Vec<String>,
	/// Direct link to the paper's PDF, when the dataset has one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf_download_link: Option<String>,
}

impl Article {
	/// Store key of this article.
	pub fn id(&self) -> &str {
		&self.pmcid
	}
}

/// Citation edges for one article, as stored in `references_graph.json`.
#[derive(Clone, Debug, Deserialize)]
struct EdgeRecord {
	id: String,
	#[serde(default)]
	cited: Vec<String>,
	#[serde(default)]
	cited_by: Vec<String>,
}

/// Read-only mapping from article identifier to [`Article`].
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct ArticleStore {
	articles: HashMap<String, Article>,
}

impl ArticleStore {
	/// Load the datasets compiled into the binary.
	pub fn bundled() -> Result<Self, DatasetError> {
		Self::from_json(BUNDLED_ARTICLES, BUNDLED_REFERENCES)
	}

	/// Parse and join an article list with its edge list.
	pub fn from_json(articles_json: &str, references_json: &str) -> Result<Self, DatasetError> {
		let articles: Vec<Article> =
			serde_json::from_str(articles_json).map_err(|source| DatasetError::Parse {
				file: "articles.json",
				source,
			})?;
		let edges: Vec<EdgeRecord> =
			serde_json::from_str(references_json).map_err(|source| DatasetError::Parse {
				file: "references_graph.json",
				source,
			})?;
		Self::join(articles, edges)
	}

	fn join(articles: Vec<Article>, edges: Vec<EdgeRecord>) -> Result<Self, DatasetError> {
		let edges: HashMap<String, EdgeRecord> =
			edges.into_iter().map(|e| (e.id.clone(), e)).collect();

		let mut joined = HashMap::with_capacity(articles.len());
		for mut article in articles {
			let record = edges
				.get(&article.pmcid)
				.ok_or_else(|| DatasetError::MissingEdgeRecord(article.pmcid.clone()))?;
			article.ref_cited = record.cited.clone();
			article.ref_cited_by = record.cited_by.clone();

			match joined.entry(article.pmcid.clone()) {
				Entry::Occupied(e) => return Err(DatasetError::DuplicateId(e.key().clone())),
				Entry::Vacant(e) => {
					e.insert(article);
				}
			}
		}

		Ok(Self { articles: joined })
	}

	/// Build a store from already-joined articles. Later duplicates win.
	pub fn from_articles(articles: impl IntoIterator<Item = Article>) -> Self {
		Self {
			articles: articles
				.into_iter()
				.map(|a| (a.pmcid.clone(), a))
				.collect(),
		}
	}

	/// Article with identifier `id`.
	pub fn get(&self, id: &str) -> Option<&Article> {
		self.articles.get(id)
	}

	/// Whether `id` is in the corpus.
	pub fn contains(&self, id: &str) -> bool {
		self.articles.contains_key(id)
	}

	/// Number of articles.
	pub fn len(&self) -> usize {
		self.articles.len()
	}

	/// Whether the store has no articles.
	pub fn is_empty(&self) -> bool {
		self.articles.is_empty()
	}

	/// Iterate over all articles. Order is unspecified.
	pub fn iter(&self) -> impl Iterator<Item = &Article> {
		self.articles.values()
	}

	/// Articles cited by `id` that exist in the store, in citation order.
	pub fn references_of(&self, id: &str) -> Vec<&Article> {
		self.get(id)
			.map(|a| a.ref_cited.iter().filter_map(|r| self.get(r)).collect())
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ARTICLES: &str = r#"[
		{"pmcid": "PMC1", "title": "Alpha", "abstract": "first", "author": "A. Author", "date": "2020"},
		{"pmcid": "PMC2", "title": "Beta", "abstract": "second", "pdf_download_link": "https://example.org/2.pdf"}
	]"#;

	const REFERENCES: &str = r#"[
		{"id": "PMC1", "cited": ["PMC2", "PMC404"], "cited_by": []},
		{"id": "PMC2", "cited": [], "cited_by": ["PMC1"]},
		{"id": "PMC999", "cited": ["PMC1"], "cited_by": []}
	]"#;

	#[test]
	fn joins_articles_with_edges() {
		let store = ArticleStore::from_json(ARTICLES, REFERENCES).unwrap();
		assert_eq!(store.len(), 2);

		let alpha = store.get("PMC1").unwrap();
		assert_eq!(alpha.title, "Alpha");
		assert_eq!(alpha.abstract_text, "first");
		assert_eq!(alpha.ref_cited, vec!["PMC2", "PMC404"]);
		assert!(alpha.ref_cited_by.is_empty());

		let beta = store.get("PMC2").unwrap();
		assert_eq!(beta.ref_cited_by, vec!["PMC1"]);
		assert_eq!(
			beta.pdf_download_link.as_deref(),
			Some("https://example.org/2.pdf")
		);
		assert!(beta.author.is_empty());
	}

	#[test]
	fn edge_records_for_unknown_articles_are_ignored() {
		let store = ArticleStore::from_json(ARTICLES, REFERENCES).unwrap();
		assert!(!store.contains("PMC999"));
	}

	#[test]
	fn missing_edge_record_is_an_error() {
		let refs = r#"[{"id": "PMC1", "cited": [], "cited_by": []}]"#;
		let err = ArticleStore::from_json(ARTICLES, refs).unwrap_err();
		assert!(matches!(err, DatasetError::MissingEdgeRecord(id) if id == "PMC2"));
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let articles = r#"[{"pmcid": "PMC1"}, {"pmcid": "PMC1"}]"#;
		let refs = r#"[{"id": "PMC1"}]"#;
		let err = ArticleStore::from_json(articles, refs).unwrap_err();
		assert!(matches!(err, DatasetError::DuplicateId(id) if id == "PMC1"));
	}

	#[test]
	fn id_alias_is_accepted() {
		let store = ArticleStore::from_json(r#"[{"id": "X"}]"#, r#"[{"id": "X"}]"#).unwrap();
		assert_eq!(store.get("X").unwrap().id(), "X");
	}

	#[test]
	fn malformed_json_names_the_file() {
		let err = ArticleStore::from_json("[", "[]").unwrap_err();
		assert!(err.to_string().contains("articles.json"));
		let err = ArticleStore::from_json("[]", "{").unwrap_err();
		assert!(err.to_string().contains("references_graph.json"));
	}

	#[test]
	fn related_articles_skip_dangling_references() {
		let store = ArticleStore::from_json(ARTICLES, REFERENCES).unwrap();
		let related: Vec<&str> = store
			.references_of("PMC1")
			.into_iter()
			.map(|a| a.id())
			.collect();
		assert_eq!(related, vec!["PMC2"]);
		assert!(store.references_of("nope").is_empty());
	}

	#[test]
	fn bundled_dataset_loads() {
		let store = ArticleStore::bundled().unwrap();
		assert!(!store.is_empty());
	}
}
