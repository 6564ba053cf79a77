use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use super::{SiteNav, paper_href, use_articles, use_citation_graph, use_config};
use crate::articles::{Article, ArticleStore};
use crate::components::force_graph::ForceGraphCanvas;
use crate::search::{LatestOnly, QueryCache, SearchClient, SearchHit, use_debounced};

/// Characters of passage text shown for a hit with no known article.
const SNIPPET_CHARS: usize = 120;

#[derive(Clone, Debug, PartialEq)]
enum SearchState {
	Idle,
	Loading,
	Ready(Vec<SearchHit>),
	Failed,
}

/// A search hit prepared for display.
#[derive(Clone, Debug, PartialEq)]
struct HitRow {
	article_id: Option<String>,
	label: String,
	score: f64,
}

impl HitRow {
	fn new(hit: &SearchHit, store: &ArticleStore) -> Self {
		let article_id = hit.article_id().map(str::to_string);
		let label = article_id
			.as_deref()
			.and_then(|id| store.get(id))
			.map(|article| article.title.clone())
			.or_else(|| {
				hit.page_content
					.as_deref()
					.map(|text| text.chars().take(SNIPPET_CHARS).collect())
			})
			.or_else(|| article_id.clone())
			.unwrap_or_else(|| "Untitled passage".to_string());
		Self {
			article_id,
			label,
			score: hit.score,
		}
	}
}

/// Dashboard: search box with results beside the citation graph.
#[component]
pub fn Home() -> impl IntoView {
	let store = use_articles();
	let config = use_config();
	let graph = use_citation_graph(&store);

	let query = RwSignal::new(String::new());
	let debounced = use_debounced(Signal::<String>::from(query), config.search_debounce_ms);
	let results = RwSignal::new(SearchState::Idle);
	let cache = Rc::new(RefCell::new(QueryCache::default()));
	let latest = LatestOnly::new();

	let search_config = Arc::clone(&config);
	Effect::new(move |_| {
		let q = debounced.get();
		let ticket = latest.issue();
		if q.trim().is_empty() {
			results.set(SearchState::Idle);
			return;
		}

		results.set(SearchState::Loading);
		let client = SearchClient::http(search_config.api_base_url.clone());
		let (latest, cache, k) = (latest.clone(), Rc::clone(&cache), search_config.search_results);
		spawn_local(async move {
			let outcome = client.cached_similarity_search(&cache, &q, Some(k)).await;
			if !latest.is_current(ticket) {
				debug!("paperrag: dropping stale results for {:?}", q.trim());
				return;
			}
			match outcome {
				Ok(hits) => results.set(SearchState::Ready(hits)),
				Err(e) => {
					warn!("paperrag: search for {:?} failed: {}", q.trim(), e);
					results.set(SearchState::Failed);
				}
			}
		});
	});

	let open = RwSignal::new(None::<String>);
	let navigate = use_navigate();
	Effect::new(move |_| {
		if let Some(id) = open.get() {
			navigate(&paper_href(&id), NavigateOptions::default());
		}
	});
	let on_select = Callback::new(move |article: Option<Article>| {
		if let Some(article) = article {
			open.set(Some(article.pmcid));
		}
	});

	let graph_data = Signal::derive(move || (*graph).clone());
	let rows_store = Arc::clone(&store);
	let graph_config = config.graph.clone();

	view! {
		<div class="home">
			<aside class="search-panel">
				<h1>"PaperRAG"</h1>
				<SiteNav current="/" />
				<input
					type="search"
					class="search-input"
					placeholder="Search the papers..."
					prop:value=move || query.get()
					on:input=move |ev| query.set(event_target_value(&ev))
				/>
				{move || match results.get() {
					SearchState::Idle => {
						view! { <p class="search-hint">"Type to search, or click a node in the graph."</p> }
							.into_any()
					}
					SearchState::Loading => view! { <p class="search-hint">"Searching..."</p> }.into_any(),
					SearchState::Failed => {
						view! { <p class="search-error">"Search is unavailable right now."</p> }.into_any()
					}
					SearchState::Ready(hits) if hits.is_empty() => {
						view! { <p class="search-hint">"No matching papers."</p> }.into_any()
					}
					SearchState::Ready(hits) => {
						let rows: Vec<HitRow> = hits.iter().map(|hit| HitRow::new(hit, &rows_store)).collect();
						view! {
							<ul class="search-results">
								{rows
									.into_iter()
									.map(|row| {
										let score = format!("{:.2}", row.score);
										match row.article_id {
											Some(id) => {
												view! {
													<li>
														<A href=paper_href(&id)>{row.label}</A>
														<span class="score">{score}</span>
													</li>
												}
													.into_any()
											}
											None => {
												view! {
													<li>
														<span>{row.label}</span>
														<span class="score">{score}</span>
													</li>
												}
													.into_any()
											}
										}
									})
									.collect_view()}
							</ul>
						}
							.into_any()
					}
				}}
			</aside>
			<main class="graph-panel">
				<ForceGraphCanvas data=graph_data articles=store on_select config=graph_config />
			</main>
		</div>
	}
}
