//! Graph simulation state and interaction tracking.
//!
//! Wraps the 3-D force simulation with per-node display metadata, the orbit
//! camera and its transitions, pointer state for orbit drags and clicks, and
//! the hovered node.

use std::collections::HashMap;

use glam::DVec3;
use log::debug;

use super::camera::{Camera, CameraTransition, Projected};
use super::particles::LinkParticles;
use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::{Simulation, SimulationParameters, finite_or_zero};
use super::theme::Theme;
use super::types::GraphData;
use crate::config::GraphConfig;

/// A press that travels further than this many pixels is a drag, not a click.
const CLICK_SLOP: f64 = 4.0;

/// Per-node display metadata, indexed in parallel with the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub title: String,
	pub abstract_text: String,
	pub color: String,
	/// Size hint from the graph data.
	pub val: usize,
}

/// Tracks a pointer press that may turn into an orbit drag or a click.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
	/// Set once the pointer leaves the click slop radius.
	pub dragging: bool,
}

/// Core graph state combining physics, camera and interaction tracking.
///
/// Created once when the component mounts, then mutated each frame by the
/// animation loop.
pub struct ForceGraphState {
	pub nodes: Vec<NodeInfo>,
	/// Links as `(source, target)` node indices. Self-loops included.
	pub links: Vec<(usize, usize)>,
	pub simulation: Simulation,
	pub camera: Camera,
	pub transition: Option<CameraTransition>,
	pub pointer: PointerState,
	pub hovered: Option<usize>,
	pub particles: LinkParticles,
	pub width: f64,
	pub height: f64,
	/// Becomes true on the first drag, wheel or click; stops the idle orbit.
	pub user_engaged: bool,
	config: GraphConfig,
	id_to_idx: HashMap<String, usize>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, config: &GraphConfig, theme: &Theme) -> Self {
		let mut id_to_idx = HashMap::with_capacity(data.nodes.len());
		let nodes: Vec<NodeInfo> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				id_to_idx.insert(node.id.clone(), i);
				NodeInfo {
					id: node.id.clone(),
					title: node.title.clone(),
					abstract_text: node.abstract_text.clone(),
					color: node.color.clone(),
					val: node.val,
				}
			})
			.collect();

		let links: Vec<(usize, usize)> = data
			.links
			.iter()
			.filter_map(|link| Some((*id_to_idx.get(&link.source)?, *id_to_idx.get(&link.target)?)))
			.collect();

		let simulation = Simulation::new(
			nodes.len(),
			&links,
			SimulationParameters {
				cooldown_ticks: config.cooldown_ticks,
				cooldown_time: config.cooldown_time_ms / 1000.0,
				..SimulationParameters::default()
			},
		);

		Self {
			camera: Camera::new(width, height, nodes.len()),
			nodes,
			links,
			simulation,
			transition: None,
			pointer: PointerState::default(),
			hovered: None,
			particles: LinkParticles::new(&theme.particles, config.link_particles),
			width,
			height,
			user_engaged: false,
			config: config.clone(),
			id_to_idx,
		}
	}

	/// Advances physics, camera motion and effects by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if self.simulation.step(dt) && !self.simulation.is_running() {
			debug!("paperrag: layout settled after {} ticks", self.simulation.ticks());
		}
		self.particles.update(dt);

		if let Some(transition) = self.transition.as_mut() {
			if transition.advance(&mut self.camera, dt) {
				self.transition = None;
			}
		} else if !self.simulation.is_running() && !self.user_engaged {
			self.camera.rotate(self.config.auto_rotate_speed * dt, 0.0);
		}
	}

	/// World position of node `idx`. Unknown or non-finite positions read as
	/// the origin.
	pub fn node_position(&self, idx: usize) -> DVec3 {
		finite_or_zero(self.simulation.position(idx).unwrap_or_default())
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.id_to_idx.get(id).copied()
	}

	pub fn project_node(&self, idx: usize) -> Option<Projected> {
		self.camera.project(self.node_position(idx))
	}

	/// Topmost node under screen point `(sx, sy)`: among all hits, the one
	/// nearest the camera.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		(0..self.nodes.len())
			.filter_map(|idx| {
				let p = self.project_node(idx)?;
				let scale = ScaledValues::new(config, self.nodes[idx].val, p.k);
				let (dx, dy) = (p.x - sx, p.y - sy);
				((dx * dx + dy * dy).sqrt() < scale.hit_radius).then_some((idx, p.depth))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	/// Starts the camera move that frames node `idx`.
	pub fn focus_node(&mut self, idx: usize) {
		let node = self.node_position(idx);
		let to_position = Camera::focus_position(node, self.config.camera_standoff);
		self.transition = Some(CameraTransition::new(
			&self.camera,
			to_position,
			node,
			self.config.transition_ms / 1000.0,
		));
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hovered = node;
	}

	pub fn press(&mut self, x: f64, y: f64) {
		self.pointer = PointerState {
			active: true,
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
			dragging: false,
		};
	}

	/// Moves an active press. Once past the click slop it orbits the camera
	/// and cancels any running camera transition.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.pointer.active {
			return;
		}
		let (dx, dy) = (x - self.pointer.start_x, y - self.pointer.start_y);
		if !self.pointer.dragging && (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
			self.pointer.dragging = true;
			self.user_engaged = true;
			self.transition = None;
		}
		if self.pointer.dragging {
			self.camera
				.orbit(x - self.pointer.last_x, y - self.pointer.last_y);
		}
		self.pointer.last_x = x;
		self.pointer.last_y = y;
	}

	/// Ends a press. Returns `true` when it was a click rather than a drag.
	pub fn release(&mut self) -> bool {
		let was_click = self.pointer.active && !self.pointer.dragging;
		self.pointer = PointerState::default();
		if was_click {
			self.user_engaged = true;
		}
		was_click
	}

	/// Ends a press at `(x, y)`. A click on a node starts the camera move
	/// that frames it and returns the node id.
	pub fn click_at(&mut self, x: f64, y: f64, config: &ScaleConfig) -> Option<String> {
		if !self.release() {
			return None;
		}
		let idx = self.node_at_position(x, y, config)?;
		self.focus_node(idx);
		Some(self.nodes[idx].id.clone())
	}

	pub fn cancel_pointer(&mut self) {
		self.pointer = PointerState::default();
		self.hovered = None;
	}

	/// Zooms towards the look-at target. Positive `delta_y` zooms out.
	pub fn zoom(&mut self, delta_y: f64) {
		self.user_engaged = true;
		self.transition = None;
		self.camera.dolly(if delta_y > 0.0 { 1.1 } else { 0.9 });
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.camera.resize(width, height);
	}
}
