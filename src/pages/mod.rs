//! Routed pages and the context lookups they share.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::articles::ArticleStore;
use crate::components::force_graph::{GraphData, GraphMemo, build_graph};
use crate::config::AppConfig;

pub mod graph;
pub mod home;
pub mod not_found;
pub mod paper;

/// The article store provided by `App`, or an empty one outside it.
pub fn use_articles() -> Arc<ArticleStore> {
	use_context::<Arc<ArticleStore>>().unwrap_or_default()
}

pub fn use_config() -> Arc<AppConfig> {
	use_context::<Arc<AppConfig>>().unwrap_or_default()
}

/// Citation graph for `store`, built once per store and shared between pages.
pub fn use_citation_graph(store: &Arc<ArticleStore>) -> Arc<GraphData> {
	let mut graph = None;
	if let Some(memo) = use_context::<StoredValue<GraphMemo>>() {
		memo.update_value(|memo| graph = Some(memo.get(store)));
	}
	graph.unwrap_or_else(|| Arc::new(build_graph(store)))
}

/// Client-side route of an article's page.
pub fn paper_href(id: &str) -> String {
	format!("/papers/{id}")
}

/// A top-level page reachable from the site navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
	pub href: &'static str,
	pub label: &'static str,
}

const SITE_LINKS: [NavLink; 3] = [
	NavLink {
		href: "/",
		label: "Search",
	},
	NavLink {
		href: "/graph",
		label: "Citation graph",
	},
	NavLink {
		href: "/papers",
		label: "All papers",
	},
];

/// Site links, minus the page at `current`.
pub fn nav_links(current: &str) -> Vec<NavLink> {
	SITE_LINKS
		.into_iter()
		.filter(|link| link.href != current)
		.collect()
}

/// Links to the other top-level pages.
#[component]
pub fn SiteNav(current: &'static str) -> impl IntoView {
	view! {
		<nav class="site-nav">
			{nav_links(current)
				.into_iter()
				.map(|link| view! { <A href=link.href>{link.label}</A> })
				.collect_view()}
		</nav>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dashboard_links_to_graph_and_index() {
		let hrefs: Vec<&str> = nav_links("/").iter().map(|link| link.href).collect();
		assert_eq!(hrefs, vec!["/graph", "/papers"]);
	}

	#[test]
	fn every_page_can_reach_the_others() {
		for page in ["/", "/graph", "/papers"] {
			let links = nav_links(page);
			assert_eq!(links.len(), 2);
			assert!(links.iter().all(|link| link.href != page));
		}
	}

	#[test]
	fn paper_routes_nest_under_the_index() {
		assert_eq!(paper_href("PMC11"), "/papers/PMC11");
	}
}
