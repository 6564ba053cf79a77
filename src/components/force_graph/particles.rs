//! Directional particles flowing along links from citing to cited paper.

use super::theme::ParticleStyle;

/// Drives particle positions along every link.
///
/// Positions are fractions of the link length: 0.0 sits on the source,
/// 1.0 on the target. Each link gets a fixed phase offset so particles on
/// neighboring links do not move in lockstep.
pub struct LinkParticles {
	per_link: usize,
	speed: f64,
	time: f64,
}

impl LinkParticles {
	pub fn new(style: &ParticleStyle, per_link: usize) -> Self {
		Self {
			per_link,
			speed: style.speed,
			time: 0.0,
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.per_link > 0 && self.speed > 0.0
	}

	/// Simple pseudo-random function (deterministic)
	fn pseudo_random(seed: f64) -> f64 {
		let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
		x - x.floor()
	}

	pub fn update(&mut self, dt: f64) {
		self.time += dt;
	}

	/// Fractions along link `link_index` where particles currently sit.
	pub fn offsets(&self, link_index: usize) -> impl Iterator<Item = f64> + '_ {
		let phase = Self::pseudo_random(link_index as f64 + 1.0);
		let spacing = 1.0 / self.per_link.max(1) as f64;
		(0..self.per_link).map(move |i| {
			let t = phase + i as f64 * spacing + self.time * self.speed;
			t - t.floor()
		})
	}
}
