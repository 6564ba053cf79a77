//! Leptos component wrapping the 3-D citation graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for orbiting, zooming and clicking nodes. An animation loop runs via
//! `requestAnimationFrame`, advancing the simulation and camera by the real
//! frame time and rendering each frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::GraphData;
use crate::articles::{Article, ArticleStore};
use crate::config::GraphConfig;

/// Abstracts longer than this are cut in the hover label.
const LABEL_ABSTRACT_CHARS: usize = 240;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

/// Text and anchor of the hover label.
#[derive(Clone, Debug, PartialEq)]
struct HoverLabel {
	title: String,
	abstract_text: String,
	x: f64,
	y: f64,
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas.
fn canvas_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn truncate(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
		None => text.to_string(),
	}
}

/// Full article for a clicked node. Unknown ids resolve to `None`.
fn resolve_selection(articles: &ArticleStore, id: &str) -> Option<Article> {
	let article = articles.get(id).cloned();
	if article.is_none() {
		warn!("paperrag: clicked node {} has no article", id);
	}
	article
}

/// Renders an interactive 3-D citation graph on a canvas element.
///
/// Clicking a node calls `on_select` with the full article looked up in
/// `articles` (`None` if the id is unknown) and flies the camera to the node.
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn ForceGraphCanvas(
	/// Nodes and links to lay out.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Articles that clicked node ids resolve against.
	articles: Arc<ArticleStore>,
	/// Called with the clicked article.
	#[prop(optional)]
	on_select: Option<Callback<Option<Article>>>,
	/// Layout, camera and particle settings.
	#[prop(optional)]
	config: GraphConfig,
	/// Fill the viewport and follow window resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let hover = RwSignal::new(None::<HoverLabel>);
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (context_init, animate_init, resize_cb_init, alive_anim) =
		(context.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// New data for a mounted canvas: rebuild the layout, keep the loop.
		if let Some(ref mut c) = *context_init.borrow_mut() {
			let (w, h) = (c.state.width, c.state.height);
			c.state = ForceGraphState::new(&graph, w, h, &config, &c.theme);
			debug!("paperrag: graph data replaced, {} nodes", graph.nodes.len());
			return;
		}

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("paperrag: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("paperrag: canvas 2d context unavailable");
				return;
			}
		};

		let theme = Theme::default();
		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(&graph, w, h, &config, &theme),
			scale: ScaleConfig::default(),
			theme,
		});
		debug!(
			"paperrag: graph mounted at {}x{} with {} nodes, {} links",
			w,
			h,
			graph.nodes.len(),
			graph.links.len()
		);

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_inner) =
			(context_init.clone(), animate_init.clone(), resize_cb_init.clone());
		let alive_anim = alive_anim.clone();
		let last_frame = Rc::new(Cell::new(js_sys::Date::now()));
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			if !alive_anim.load(Ordering::Relaxed) {
				if let Some(ref cb) = *resize_inner.borrow() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				debug!("paperrag: graph unmounted, animation stopped");
				return;
			}

			let now = js_sys::Date::now();
			let dt = ((now - last_frame.replace(now)) / 1000.0).max(0.0);
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.press(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_coords(canvas_ref, &ev) else {
			return;
		};
		let label = {
			let mut guard = context_mm.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			c.state.drag_to(x, y);
			let hovered = if c.state.pointer.dragging {
				None
			} else {
				c.state.node_at_position(x, y, &c.scale)
			};
			c.state.set_hover(hovered);
			hovered.map(|idx| {
				let node = &c.state.nodes[idx];
				HoverLabel {
					title: node.title.clone(),
					abstract_text: truncate(&node.abstract_text, LABEL_ABSTRACT_CHARS),
					x,
					y,
				}
			})
		};
		hover.set(label);
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_coords(canvas_ref, &ev) else {
			return;
		};
		let clicked = {
			let mut guard = context_mu.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let Some(id) = c.state.click_at(x, y, &c.scale) else {
				return;
			};
			id
		};

		debug!("paperrag: node {} clicked", clicked);
		let article = resolve_selection(&articles, &clicked);
		if let Some(callback) = on_select {
			callback.run(article);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.cancel_pointer();
		}
		hover.set(None);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.zoom(ev.delta_y());
		}
	};

	let cursor = move || {
		if hover.with(Option::is_some) {
			"display: block; cursor: pointer;"
		} else {
			"display: block; cursor: grab;"
		}
	};

	view! {
		<div class="force-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style=cursor
			/>
			{move || {
				hover
					.get()
					.map(|label| {
						view! {
							<div
								class="graph-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; pointer-events: none;",
									label.x + 14.0,
									label.y + 14.0,
								)
							>
								<strong>{label.title}</strong>
								<p>{label.abstract_text}</p>
							</div>
						}
					})
			}}
		</div>
	}
}
