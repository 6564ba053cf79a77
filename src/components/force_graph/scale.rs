//! Depth-dependent scaling for graph visuals.
//!
//! The camera projects world-space points with perspective, so an element's
//! on-screen size depends on how far it sits from the camera. This module
//! centralizes those rules.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the 3-D coordinate system of the simulation. Node radii
//!   are defined here, from each node's size hint.
//! - **Screen-space**: pixel coordinates on the canvas after projection.
//!
//! The projection factor `k` is the number of screen pixels one world unit
//! covers at a given depth. It is large near the camera and small far away.

/// World-space scaling clamped to screen-space bounds in pixels.
#[derive(Clone, Debug)]
pub struct ScreenClamp {
	/// Smallest on-screen size, so far elements stay visible.
	pub min_screen: f64,
	/// Largest on-screen size.
	pub max_screen: f64,
}

impl ScreenClamp {
	/// Screen-space size for a base value at projection factor `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		(base * k).clamp(self.min_screen, self.max_screen)
	}
}

/// Opacity that fades out with distance from the camera.
#[derive(Clone, Debug)]
pub struct DepthFade {
	/// Projection factor at which alpha reaches zero.
	pub zero_alpha_k: f64,
	/// Projection factor at which alpha is fully opaque.
	pub full_alpha_k: f64,
}

impl DepthFade {
	/// Alpha multiplier for a given projection factor.
	pub fn apply(&self, k: f64) -> f64 {
		if self.zero_alpha_k == self.full_alpha_k {
			return 1.0;
		}
		let t = (k - self.zero_alpha_k) / (self.full_alpha_k - self.zero_alpha_k);
		t.clamp(0.0, 1.0)
	}
}

/// Configuration for node sphere sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Smallest sphere radius in world units.
	pub min_radius: f64,
	/// Largest sphere radius in world units.
	pub max_radius: f64,
	/// How the projected radius behaves with depth.
	pub radius: ScreenClamp,
	/// Extra pixels around a sphere that still count as a hit.
	pub hit_padding: f64,
}

/// Configuration for link particle sizing.
#[derive(Clone, Debug)]
pub struct ParticleScaleConfig {
	/// On-screen particle diameter.
	pub size: ScreenClamp,
	/// Particle opacity by depth.
	pub alpha: DepthFade,
	/// Minimum alpha to bother drawing.
	pub cull_alpha: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node sphere sizing.
	pub node: NodeScaleConfig,
	/// Link particle sizing.
	pub particle: ParticleScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				min_radius: 2.0,
				max_radius: 8.0,
				radius: ScreenClamp {
					min_screen: 1.5,
					max_screen: f64::INFINITY,
				},
				hit_padding: 3.0,
			},
			particle: ParticleScaleConfig {
				size: ScreenClamp {
					min_screen: 0.5,
					max_screen: 4.0,
				},
				alpha: DepthFade {
					zero_alpha_k: 0.5,
					full_alpha_k: 2.0,
				},
				cull_alpha: 0.05,
			},
		}
	}
}

impl ScaleConfig {
	/// World-space sphere radius for a node's size hint.
	pub fn node_radius(&self, size_hint: usize) -> f64 {
		(size_hint as f64).clamp(self.node.min_radius, self.node.max_radius)
	}
}

/// Pre-computed screen sizes for one projected node.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Projection factor at the node's depth.
	pub k: f64,
	/// Sphere radius in pixels.
	pub node_radius: f64,
	/// Hit detection radius in pixels.
	pub hit_radius: f64,
}

impl ScaledValues {
	/// Sizes for a node with `size_hint` at projection factor `k`.
	pub fn new(config: &ScaleConfig, size_hint: usize, k: f64) -> Self {
		let node_radius = config
			.node
			.radius
			.apply(config.node_radius(size_hint), k);
		Self {
			k,
			node_radius,
			hit_radius: node_radius + config.node.hit_padding,
		}
	}
}
