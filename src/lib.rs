//! paperrag: browser client for exploring a corpus of scientific papers.
//!
//! This crate provides a WASM single-page app that shows the corpus as an
//! interactive 3-D citation graph, searches it through a similarity search
//! backend, and lets the reader ask the backend about a paper.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};

pub mod articles;
pub mod chat;
pub mod components;
pub mod config;
mod pages;
pub mod search;
pub mod selection;

pub use articles::{Article, ArticleStore, DatasetError};
pub use components::force_graph::{
	ForceGraphCanvas, GraphData, GraphLink, GraphMemo, GraphNode, build_graph,
};
pub use config::{AppConfig, GraphConfig};
pub use selection::Selection;

use crate::pages::graph::GraphPage;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::paper::{PaperIndex, PaperPage};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("paperrag: logging initialized");
}

/// Loads the bundled corpus. A broken dataset leaves the app running with an
/// empty store.
fn load_articles() -> ArticleStore {
	match ArticleStore::bundled() {
		Ok(store) => {
			info!("paperrag: loaded {} articles", store.len());
			store
		}
		Err(e) => {
			error!("paperrag: bundled dataset unusable: {}", e);
			ArticleStore::default()
		}
	}
}

/// Main application component.
/// Provides the article store, configuration and graph cache to every page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	provide_context(Arc::new(load_articles()));
	provide_context(Arc::new(AppConfig::load()));
	provide_context(StoredValue::new(GraphMemo::default()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="PaperRAG" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/papers") view=PaperIndex />
				<Route path=path!("/papers/:id") view=PaperPage />
				<Route path=path!("/graph") view=GraphPage />
			</Routes>
		</Router>
	}
}
