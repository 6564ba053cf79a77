//! Converts the article store into graph data for the force graph.

use std::collections::HashSet;
use std::sync::Arc;

use super::theme::color_for_title;
use super::types::{GraphData, GraphLink, GraphNode};
use crate::articles::{Article, ArticleStore};

/// Size hint for a node: how many papers cite it, never less than 1.
pub fn size_hint(article: &Article) -> usize {
	article.ref_cited_by.len().max(1)
}

/// Builds one node per article and one link per resolvable citation.
///
/// A citation whose target is not in the store is dropped. Self-citations
/// are kept as self-loops. Runs in time proportional to the number of
/// articles plus citations.
pub fn build_graph(store: &ArticleStore) -> GraphData {
	let nodes: Vec<GraphNode> = store
		.iter()
		.map(|article| GraphNode {
			id: article.pmcid.clone(),
			title: article.title.clone(),
			abstract_text: article.abstract_text.clone(),
			val: size_hint(article),
			color: color_for_title(&article.title).to_string(),
		})
		.collect();

	let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

	let links = store
		.iter()
		.flat_map(|article| {
			article
				.ref_cited
				.iter()
				.map(move |target| (article.pmcid.as_str(), target.as_str()))
		})
		.filter(|(source, target)| node_ids.contains(source) && node_ids.contains(target))
		.map(|(source, target)| GraphLink {
			source: source.to_string(),
			target: target.to_string(),
		})
		.collect();

	GraphData { nodes, links }
}

/// Caches the graph for one store instance.
///
/// The graph is rebuilt only when handed a different `Arc` than last time,
/// so re-renders that pass the same store reuse the previous result.
#[derive(Default)]
pub struct GraphMemo {
	source: Option<Arc<ArticleStore>>,
	graph: Arc<GraphData>,
	builds: usize,
}

impl GraphMemo {
	/// Graph for `store`, rebuilt only if `store` is a new instance.
	pub fn get(&mut self, store: &Arc<ArticleStore>) -> Arc<GraphData> {
		let stale = self
			.source
			.as_ref()
			.is_none_or(|cached| !Arc::ptr_eq(cached, store));
		if stale {
			self.graph = Arc::new(build_graph(store));
			self.source = Some(Arc::clone(store));
			self.builds += 1;
		}
		Arc::clone(&self.graph)
	}

	/// How many times the graph has been built.
	pub fn builds(&self) -> usize {
		self.builds
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn article(id: &str, title: &str, cites: &[&str], cited_by: &[&str]) -> Article {
		Article {
			pmcid: id.to_string(),
			title: title.to_string(),
			ref_cited: cites.iter().map(|s| s.to_string()).collect(),
			ref_cited_by: cited_by.iter().map(|s| s.to_string()).collect(),
			..Default::default()
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.to_string(),
			target: target.to_string(),
		}
	}

	fn link_set(data: &GraphData) -> HashSet<GraphLink> {
		data.links.iter().cloned().collect()
	}

	#[test]
	fn citing_pair_yields_two_nodes_one_link() {
		let store = ArticleStore::from_articles([
			article("X", "Alpha", &["Y"], &[]),
			article("Y", "Beta", &[], &[]),
		]);
		let graph = build_graph(&store);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links, vec![link("X", "Y")]);
	}

	#[test]
	fn dangling_citation_is_dropped() {
		let store = ArticleStore::from_articles([article("X", "Alpha", &["MISSING"], &[])]);
		let graph = build_graph(&store);
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.links.is_empty());
	}

	#[test]
	fn self_citation_becomes_self_loop() {
		let store = ArticleStore::from_articles([article("X", "Alpha", &["X"], &[])]);
		let graph = build_graph(&store);
		assert_eq!(graph.links, vec![link("X", "X")]);
	}

	#[test]
	fn size_hint_counts_citers_with_floor_of_one() {
		let store = ArticleStore::from_articles([
			article("A", "a", &[], &["1", "2", "3", "4", "5"]),
			article("B", "b", &[], &[]),
		]);
		let graph = build_graph(&store);
		let val = |id: &str| graph.nodes.iter().find(|n| n.id == id).unwrap().val;
		assert_eq!(val("A"), 5);
		assert_eq!(val("B"), 1);
	}

	#[test]
	fn missing_cited_by_field_defaults_to_one() {
		let parsed: Article = serde_json::from_str(r#"{"pmcid": "Z", "title": "t"}"#).unwrap();
		assert_eq!(size_hint(&parsed), 1);
	}

	#[test]
	fn every_article_is_a_node_and_links_never_dangle() {
		let store = ArticleStore::from_articles([
			article("A", "Alpha", &["B", "C", "ghost"], &["C"]),
			article("B", "Beta", &["A"], &["A"]),
			article("C", "Gamma", &["A", "nobody"], &["A"]),
			article("D", "Delta", &[], &[]),
		]);
		let graph = build_graph(&store);
		assert_eq!(graph.nodes.len(), store.len());

		let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), store.len());
		for l in &graph.links {
			assert!(store.contains(&l.source));
			assert!(store.contains(&l.target));
		}
		assert_eq!(
			link_set(&graph),
			[link("A", "B"), link("A", "C"), link("B", "A"), link("C", "A")]
				.into_iter()
				.collect()
		);
	}

	#[test]
	fn building_twice_is_deterministic() {
		let store = ArticleStore::from_articles([
			article("A", "Alpha", &["B"], &[]),
			article("B", "Beta", &["A"], &["A"]),
		]);
		let (first, second) = (build_graph(&store), build_graph(&store));
		assert_eq!(link_set(&first), link_set(&second));
		for node in &first.nodes {
			let twin = second.nodes.iter().find(|n| n.id == node.id).unwrap();
			assert_eq!(twin.color, node.color);
			assert_eq!(twin.color, color_for_title(&node.title));
		}
	}

	#[test]
	fn node_carries_title_and_abstract() {
		let mut a = article("A", "Alpha", &[], &[]);
		a.abstract_text = "about alpha".into();
		let graph = build_graph(&ArticleStore::from_articles([a]));
		assert_eq!(graph.nodes[0].title, "Alpha");
		assert_eq!(graph.nodes[0].abstract_text, "about alpha");
	}

	#[test]
	fn memo_rebuilds_only_for_a_new_store() {
		let store = Arc::new(ArticleStore::from_articles([article("A", "Alpha", &[], &[])]));
		let mut memo = GraphMemo::default();

		let first = memo.get(&store);
		let again = memo.get(&Arc::clone(&store));
		assert!(Arc::ptr_eq(&first, &again));
		assert_eq!(memo.builds(), 1);

		let other = Arc::new(ArticleStore::from_articles([
			article("A", "Alpha", &[], &[]),
			article("B", "Beta", &[], &[]),
		]));
		let rebuilt = memo.get(&other);
		assert_eq!(rebuilt.nodes.len(), 2);
		assert_eq!(memo.builds(), 2);
	}
}
