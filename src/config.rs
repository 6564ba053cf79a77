//! Runtime configuration.
//!
//! Defaults are compiled in. The API base URL can be set at build time with
//! the `PAPERRAG_API_URL` environment variable, and any field can be
//! overridden at page load by a JSON script element:
//!
//! ```html
//! <script id="paperrag-config" type="application/json">
//!   { "api_base_url": "https://api.example.org", "graph": { "cooldown_ticks": 300 } }
//! </script>
//! ```

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Backend used when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

fn default_api_base_url() -> String {
	option_env!("PAPERRAG_API_URL")
		.unwrap_or(DEFAULT_API_BASE_URL)
		.trim_end_matches('/')
		.to_string()
}

/// Settings for the 3-D citation graph view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Simulation ticks before the layout freezes.
	pub cooldown_ticks: u32,
	/// Wall-clock milliseconds before the layout freezes.
	pub cooldown_time_ms: f64,
	/// Distance the camera keeps from a clicked node.
	pub camera_standoff: f64,
	/// Duration of the camera move to a clicked node, in milliseconds.
	pub transition_ms: f64,
	/// Flow particles drawn per link. 0 disables them.
	pub link_particles: usize,
	/// Idle camera orbit in radians per second once the layout has settled.
	pub auto_rotate_speed: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			cooldown_ticks: 200,
			cooldown_time_ms: 10_000.0,
			camera_standoff: 120.0,
			transition_ms: 3_000.0,
			link_particles: 2,
			auto_rotate_speed: 0.05,
		}
	}
}

/// Application-wide configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Base URL of the similarity search / answer generation service.
	pub api_base_url: String,
	/// Quiet period before a typed search query is sent.
	pub search_debounce_ms: u32,
	/// Results requested per similarity search.
	pub search_results: usize,
	/// Layout and camera settings for the citation graph.
	pub graph: GraphConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: default_api_base_url(),
			search_debounce_ms: 500,
			search_results: 8,
			graph: GraphConfig::default(),
		}
	}
}

impl AppConfig {
	/// Parses a JSON override. Missing fields keep their defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		let mut config: AppConfig = serde_json::from_str(json)?;
		config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
		Ok(config)
	}

	/// Reads `<script id="paperrag-config">` if present, else the defaults.
	pub fn load() -> Self {
		let Some(json) = config_script_text() else {
			return Self::default();
		};
		match Self::from_json(&json) {
			Ok(config) => {
				info!("paperrag: config override loaded, api at {}", config.api_base_url);
				config
			}
			Err(e) => {
				warn!("paperrag: ignoring malformed config override: {}", e);
				Self::default()
			}
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("paperrag-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
