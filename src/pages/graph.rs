use leptos::prelude::*;
use leptos_router::components::A;

use super::{SiteNav, paper_href, use_articles, use_citation_graph, use_config};
use crate::articles::Article;
use crate::components::force_graph::ForceGraphCanvas;
use crate::selection::Selection;

/// Full-screen graph with a panel describing the clicked paper.
#[component]
pub fn GraphPage() -> impl IntoView {
	let store = use_articles();
	let config = use_config();
	let graph = use_citation_graph(&store);

	let selection = RwSignal::new(Selection::default());
	let on_select = Callback::new(move |article: Option<Article>| {
		selection.update(|s| s.select(article));
	});
	let graph_data = Signal::derive(move || (*graph).clone());

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph_data
				articles=store
				on_select
				config=config.graph.clone()
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Citation graph"</h1>
				<SiteNav current="/graph" />
				<p class="subtitle">"Drag to orbit. Scroll to zoom. Click a paper to fly to it."</p>
			</div>
			{move || {
				selection
					.with(|s| s.article().cloned())
					.map(|article| {
						view! {
							<aside class="selection-panel">
								<button class="close" on:click=move |_| selection.update(Selection::clear)>
									"×"
								</button>
								<h2>{article.title}</h2>
								<p class="byline">{article.author} " · " {article.date}</p>
								<p>{article.abstract_text}</p>
								<A href=paper_href(&article.pmcid)>"Open paper"</A>
							</aside>
						}
					})
			}}
		</div>
	}
}
