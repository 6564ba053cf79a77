//! Graph data structures consumed by the force graph component.

use serde::{Deserialize, Serialize};

/// A node in the citation graph, derived one-to-one from an article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Article identifier. Used to reference nodes in links.
	pub id: String,
	/// Shown in the hover label and selection panel.
	pub title: String,
	/// Shown in the hover label.
	#[serde(rename = "abstract")]
	pub abstract_text: String,
	/// Size hint: number of citing papers, at least 1.
	pub val: usize,
	/// CSS hex color picked from the title hash.
	pub color: String,
}

/// A directed citation: `source` cites `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphLink {
	/// Id of the citing paper.
	pub source: String,
	/// Id of the cited paper.
	pub target: String,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// One node per article.
	pub nodes: Vec<GraphNode>,
	/// Citations between articles in the corpus.
	pub links: Vec<GraphLink>,
}
