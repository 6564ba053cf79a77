//! 3-D citation graph visualization component.
//!
//! Renders an interactive force-directed graph of articles on an HTML canvas
//! with:
//! - A 3-D force simulation that freezes after a tick or time budget
//! - An orbit camera with drag, wheel zoom and click-to-focus transitions
//! - Perspective-shaded spheres, flow particles on links and hover labels
//!
//! # Example
//!
//! ```ignore
//! use paperrag::{build_graph, ArticleStore, ForceGraphCanvas};
//!
//! let store = Arc::new(ArticleStore::bundled()?);
//! let graph = build_graph(&store);
//! let on_select = Callback::new(|article: Option<Article>| log::info!("{:?}", article));
//!
//! view! { <ForceGraphCanvas data=Signal::derive(move || graph.clone()) articles=store on_select /> }
//! ```

mod builder;
mod camera;
mod component;
mod particles;
mod render;
pub mod scale;
mod simulation;
mod state;
pub mod theme;
mod types;

pub use builder::{GraphMemo, build_graph, size_hint};
pub use component::ForceGraphCanvas;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode};
