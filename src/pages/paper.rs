use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use log::error;
use wasm_bindgen_futures::spawn_local;

use super::not_found::NotFound;
use super::{SiteNav, paper_href, use_articles, use_config};
use crate::articles::Article;
use crate::components::chat::ChatPanel;
use crate::search::{AnswerMode, SearchClient};

const SNIPPET_PROMPT: &str = "Provide a concise snippet from the paper.";
const EXPLANATION_PROMPT: &str = "Explain the significance of this research in simple terms.";
const LOADING: &str = "Loading...";

/// `/papers/:id`. Unknown ids render the not-found page.
#[component]
pub fn PaperPage() -> impl IntoView {
	let params = use_params_map();
	let store = use_articles();

	move || {
		let id = params.with(|p| p.get("id")).unwrap_or_default();
		match store.get(&id) {
			Some(article) => view! { <PaperDetail article=article.clone() /> }.into_any(),
			None => view! { <NotFound /> }.into_any(),
		}
	}
}

/// `/papers` with no paper chosen: every paper, by title.
#[component]
pub fn PaperIndex() -> impl IntoView {
	let store = use_articles();
	let mut papers: Vec<(String, String)> = store
		.iter()
		.map(|article| (article.title.clone(), article.pmcid.clone()))
		.collect();
	papers.sort();

	view! {
		<div class="paper-index">
			<h1>"Papers"</h1>
			<SiteNav current="/papers" />
			<p class="subtitle">"Pick a paper to read about it, or explore the graph."</p>
			<ul>
				{papers
					.into_iter()
					.map(|(title, id)| view! { <li><A href=paper_href(&id)>{title}</A></li> })
					.collect_view()}
			</ul>
		</div>
	}
}

/// Fetches a terminology-mode reply for `prompt` into `target`.
fn load_generated(api_base_url: String, article_id: String, prompt: &'static str, target: RwSignal<String>) {
	spawn_local(async move {
		let client = SearchClient::http(api_base_url);
		match client
			.generate_response(prompt, &article_id, Some(AnswerMode::Terminology))
			.await
		{
			Ok(reply) => target.set(reply.into_text()),
			Err(e) => {
				error!("paperrag: loading {:?} for {} failed: {}", prompt, article_id, e);
				target.set("This section could not be loaded.".to_string());
			}
		}
	});
}

#[component]
fn PaperDetail(article: Article) -> impl IntoView {
	let store = use_articles();
	let config = use_config();

	let snippet = RwSignal::new(LOADING.to_string());
	let explanation = RwSignal::new(LOADING.to_string());
	load_generated(config.api_base_url.clone(), article.pmcid.clone(), SNIPPET_PROMPT, snippet);
	load_generated(config.api_base_url.clone(), article.pmcid.clone(), EXPLANATION_PROMPT, explanation);

	let related: Vec<Article> = store
		.references_of(&article.pmcid)
		.into_iter()
		.cloned()
		.collect();
	let related_view = if related.is_empty() {
		view! { <p class="muted">"No cited papers in this collection."</p> }.into_any()
	} else {
		view! {
			<ul class="related-papers">
				{related
					.into_iter()
					.map(|paper| {
						view! {
							<li>
								<A href=paper_href(&paper.pmcid)>{paper.title}</A>
							</li>
						}
					})
					.collect_view()}
			</ul>
		}
			.into_any()
	};
	let pdf = article.pdf_download_link.clone().map(|href| {
		view! {
			<a class="pdf-link" href=href target="_blank" rel="noopener">
				"Download PDF"
			</a>
		}
	});

	view! {
		<div class="paper">
			<aside class="related">
				<A href="/">"Back to the dashboard"</A>
				<h2>"Related papers"</h2>
				{related_view}
			</aside>
			<article class="paper-body">
				<h1>{article.title.clone()}</h1>
				<p class="byline">
					<span class="author">{article.author.clone()}</span>
					<span class="date">{article.date.clone()}</span>
				</p>
				{pdf}
				<h2>"Abstract"</h2>
				<p>{article.abstract_text.clone()}</p>
				<h2>"Snippet"</h2>
				<p class="generated">{move || snippet.get()}</p>
				<h2>"Why it matters"</h2>
				<p class="generated">{move || explanation.get()}</p>
			</article>
			<ChatPanel article_id=article.pmcid.clone() title=article.title.clone() />
		</div>
	}
}
