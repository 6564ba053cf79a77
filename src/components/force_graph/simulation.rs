//! 3-D force simulation.
//!
//! Damped Euler integration with three forces: many-body repulsion
//! between every node pair, springs along links, and a centering shift that
//! keeps the layout's mean position at the origin. An `alpha` temperature
//! decays geometrically so the layout cools to rest within the tick budget.
//! The simulation also stops once its wall-clock cooldown has elapsed, so the
//! view settles even on slow frames.

use std::f64::consts::PI;

use glam::DVec3;

/// Tunable physics parameters.
#[derive(Clone, Debug)]
pub struct SimulationParameters {
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// The simulation stops once alpha falls below this.
	pub alpha_min: f64,
	/// Maximum number of ticks before the layout freezes.
	pub cooldown_ticks: u32,
	/// Maximum wall-clock seconds before the layout freezes.
	pub cooldown_time: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			charge_strength: -30.0,
			link_distance: 30.0,
			velocity_decay: 0.4,
			alpha_min: 0.001,
			cooldown_ticks: 200,
			cooldown_time: 10.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
struct Body {
	position: DVec3,
	velocity: DVec3,
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Physics state for a fixed set of nodes and links.
pub struct Simulation {
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	params: SimulationParameters,
	alpha: f64,
	alpha_decay: f64,
	ticks: u32,
	elapsed: f64,
	running: bool,
}

impl Simulation {
	/// Creates a simulation with nodes placed on a deterministic spiral.
	///
	/// `links` are `(source, target)` node indices. Self-loops and
	/// out-of-range indices exert no force.
	pub fn new(node_count: usize, links: &[(usize, usize)], params: SimulationParameters) -> Self {
		let bodies = (0..node_count)
			.map(|i| Body {
				position: initial_position(i),
				velocity: DVec3::ZERO,
			})
			.collect();

		let mut degree = vec![0usize; node_count];
		let in_range = |&&(s, t): &&(usize, usize)| s != t && s < node_count && t < node_count;
		for &(s, t) in links.iter().filter(in_range) {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = links
			.iter()
			.filter(in_range)
			.map(|&(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Spring {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		let ticks = params.cooldown_ticks.max(1) as f64;
		let alpha_decay = 1.0 - params.alpha_min.powf(1.0 / ticks);

		Self {
			bodies,
			springs,
			running: node_count > 0,
			params,
			alpha: 1.0,
			alpha_decay,
			ticks: 0,
			elapsed: 0.0,
		}
	}

	/// Advances wall-clock time by `dt` seconds and runs one tick while the
	/// layout is still cooling. Returns whether a tick ran.
	pub fn step(&mut self, dt: f64) -> bool {
		if !self.running {
			return false;
		}
		self.elapsed += dt.max(0.0);
		self.tick();

		if self.ticks >= self.params.cooldown_ticks
			|| self.elapsed >= self.params.cooldown_time
			|| self.alpha < self.params.alpha_min
		{
			self.running = false;
		}
		true
	}

	fn tick(&mut self) {
		self.alpha += -self.alpha * self.alpha_decay;
		self.ticks += 1;

		self.apply_links();
		self.apply_charge();

		let keep = 1.0 - self.params.velocity_decay;
		for body in &mut self.bodies {
			body.velocity = body.velocity * keep;
			body.position += body.velocity;
			if !body.position.is_finite() {
				body.position = finite_or_zero(body.position);
				body.velocity = DVec3::ZERO;
			}
		}

		self.apply_center();
	}

	fn apply_links(&mut self) {
		for (n, spring) in self.springs.iter().enumerate() {
			let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
			let mut delta =
				(t.position + t.velocity) - (s.position + s.velocity);
			if delta.length() < 1e-9 {
				delta = jiggle(n);
			}
			let len = delta.length();
			let correction =
				delta * ((len - self.params.link_distance) / len * self.alpha * spring.strength);

			self.bodies[spring.target].velocity -= correction * spring.bias;
			self.bodies[spring.source].velocity += correction * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.params.charge_strength * self.alpha;
		for i in 0..self.bodies.len() {
			for j in (i + 1)..self.bodies.len() {
				let mut delta = self.bodies[j].position - self.bodies[i].position;
				if delta.length() < 1e-9 {
					delta = jiggle(i * 31 + j);
				}
				let dist2 = delta.dot(delta).max(1.0);
				let push = delta * (strength / dist2);
				self.bodies[i].velocity += push;
				self.bodies[j].velocity -= push;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.bodies.is_empty() {
			return;
		}
		let sum = self
			.bodies
			.iter()
			.fold(DVec3::ZERO, |acc, b| acc + b.position);
		let shift = sum * (1.0 / self.bodies.len() as f64);
		for body in &mut self.bodies {
			body.position -= shift;
		}
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	/// Position of node `index`, if it exists.
	pub fn position(&self, index: usize) -> Option<DVec3> {
		self.bodies.get(index).map(|b| b.position)
	}
}

/// Spiral placement: radius grows with the cube root of the index so density
/// stays roughly even in 3-D.
fn initial_position(i: usize) -> DVec3 {
	let roll_step = PI * (3.0 - 5f64.sqrt());
	let yaw_step = PI * 20.0 / (9.0 + 221f64.sqrt());
	let i = i as f64;
	let radius = 10.0 * (0.5 + i).cbrt();
	let (roll, yaw) = (i * roll_step, i * yaw_step);
	DVec3::new(
		radius * roll.sin() * yaw.cos(),
		radius * roll.cos(),
		radius * roll.sin() * yaw.sin(),
	)
}

/// Replaces NaN and infinite components with zero.
pub fn finite_or_zero(v: DVec3) -> DVec3 {
	let fix = |c: f64| if c.is_finite() { c } else { 0.0 };
	DVec3::new(fix(v.x), fix(v.y), fix(v.z))
}

/// Tiny deterministic offset to separate coincident points.
fn jiggle(seed: usize) -> DVec3 {
	let s = seed as f64 + 1.0;
	DVec3::new(
		((s * 12.9898).sin() * 1e-6).abs() + 1e-6,
		(s * 78.233).sin() * 1e-6,
		(s * 37.719).sin() * 1e-6,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run_to_rest(sim: &mut Simulation) {
		for _ in 0..10_000 {
			if !sim.step(1.0 / 60.0) {
				break;
			}
		}
	}

	#[test]
	fn stops_after_tick_budget() {
		let mut sim = Simulation::new(10, &[(0, 1), (1, 2)], SimulationParameters::default());
		run_to_rest(&mut sim);
		assert!(!sim.is_running());
		assert!(sim.ticks() <= 200);
		assert!(sim.ticks() > 100);
	}

	#[test]
	fn stops_after_wall_clock_cooldown() {
		let mut sim = Simulation::new(3, &[], SimulationParameters::default());
		assert!(sim.step(11.0));
		assert!(!sim.is_running());
		assert_eq!(sim.ticks(), 1);
	}

	#[test]
	fn positions_are_frozen_after_cooldown() {
		let mut sim = Simulation::new(5, &[(0, 1), (2, 3)], SimulationParameters::default());
		run_to_rest(&mut sim);
		let before: Vec<DVec3> = (0..5).map(|i| sim.position(i).unwrap()).collect();
		for _ in 0..50 {
			assert!(!sim.step(1.0 / 60.0));
		}
		let after: Vec<DVec3> = (0..5).map(|i| sim.position(i).unwrap()).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn linked_pair_settles_near_link_distance() {
		let mut sim = Simulation::new(2, &[(0, 1)], SimulationParameters::default());
		let start = (sim.position(0).unwrap() - sim.position(1).unwrap()).length();
		run_to_rest(&mut sim);
		let end = (sim.position(0).unwrap() - sim.position(1).unwrap()).length();
		assert!(end > start);
		assert!(end > 20.0 && end < 50.0, "settled at {end}");
	}

	#[test]
	fn layout_stays_centered() {
		let mut sim = Simulation::new(12, &[(0, 5), (5, 9), (3, 4)], SimulationParameters::default());
		run_to_rest(&mut sim);
		let mean = (0..12).fold(DVec3::ZERO, |acc, i| acc + sim.position(i).unwrap()) * (1.0 / 12.0);
		assert!(mean.length() < 1e-6);
	}

	#[test]
	fn self_loops_and_bad_indices_stay_finite() {
		let mut sim = Simulation::new(3, &[(0, 0), (1, 7), (1, 2)], SimulationParameters::default());
		run_to_rest(&mut sim);
		for i in 0..3 {
			assert!(sim.position(i).unwrap().is_finite());
		}
	}

	#[test]
	fn non_finite_components_become_zero() {
		let v = finite_or_zero(DVec3::new(f64::NAN, 2.0, f64::INFINITY));
		assert_eq!(v, DVec3::new(0.0, 2.0, 0.0));
		assert_eq!(finite_or_zero(DVec3::ONE), DVec3::ONE);
	}

	#[test]
	fn empty_graph_never_runs() {
		let mut sim = Simulation::new(0, &[], SimulationParameters::default());
		assert!(sim.position(0).is_none());
		assert!(!sim.step(0.016));
		assert_eq!(sim.position(0), None);
	}

	#[test]
	fn initial_layout_is_deterministic_and_distinct() {
		let a = Simulation::new(20, &[], SimulationParameters::default());
		let b = Simulation::new(20, &[], SimulationParameters::default());
		for i in 0..20 {
			assert_eq!(a.position(i), b.position(i));
			for j in (i + 1)..20 {
				assert!((a.position(i).unwrap() - a.position(j).unwrap()).length() > 1e-3);
			}
		}
	}
}
