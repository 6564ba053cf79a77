//! Visual theming for the citation graph.
//!
//! Holds the node palette, title-hash color assignment, and the styles used
//! for the background, links, spheres and link particles.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	/// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`. Anything else falls back to mid gray.
	pub fn from_hex(hex: &str) -> Self {
		let channel = |range: std::ops::Range<usize>| {
			hex.get(range)
				.and_then(|s| u8::from_str_radix(s, 16).ok())
				.unwrap_or(128)
		};
		if hex.starts_with('#') && hex.len() == 7 {
			Color::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// Node colors, indexed by title hash.
pub const NODE_PALETTE: [&str; 6] = [
	"#3b82f6", // blue
	"#a855f7", // purple
	"#10b981", // green
	"#f59e0b", // amber
	"#ef4444", // red
	"#14b8a6", // teal
];

/// Polynomial string hash (multiplier 31) over UTF-16 code units with 32-bit
/// wrapping, so a title hashes the same on every run and every render.
pub fn title_hash(title: &str) -> i32 {
	title.encode_utf16().fold(0i32, |hash, unit| {
		(unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
	})
}

/// Deterministic palette color for a paper title.
pub fn color_for_title(title: &str) -> &'static str {
	let index = title_hash(title).unsigned_abs() as usize % NODE_PALETTE.len();
	NODE_PALETTE[index]
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient center
	pub color_secondary: Color,
	/// Draw the radial gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Link visual style. Constant across all links.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Line color.
	pub color: Color,
	/// Multiplier applied to the color's alpha.
	pub opacity: f64,
	/// Line width in screen pixels.
	pub width: f64,
	/// Radius of the ring drawn for a self-citation, in world units.
	pub self_loop_radius: f64,
}

/// Sphere shading for nodes.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Emissive tint mixed into the shadow side.
	pub emissive: Color,
	/// Highlight strength on the lit side (0.0 = flat).
	pub specular: f64,
	/// Shadow strength on the far side (0.0 = flat).
	pub shade: f64,
	/// Stroke for the hovered node.
	pub hover_ring: Color,
}

/// Particles flowing along links from the citing to the cited paper.
#[derive(Clone, Debug)]
pub struct ParticleStyle {
	/// Fill color.
	pub color: Color,
	/// Particle radius in screen pixels.
	pub size: f64,
	/// Fraction of a link traversed per second.
	pub speed: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Citation lines.
	pub link: LinkStyle,
	/// Paper spheres.
	pub node: NodeStyle,
	/// Flow particles on links.
	pub particles: ParticleStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(10, 14, 26),
				color_secondary: Color::rgb(20, 26, 44),
				use_gradient: true,
				vignette: 0.2,
			},
			link: LinkStyle {
				color: Color::rgb(59, 130, 246),
				opacity: 0.4,
				width: 1.0,
				self_loop_radius: 6.0,
			},
			node: NodeStyle {
				emissive: Color::rgb(20, 24, 36),
				specular: 0.45,
				shade: 0.35,
				hover_ring: Color::rgba(255, 255, 255, 0.8),
			},
			particles: ParticleStyle {
				color: Color::rgba(147, 197, 253, 0.9),
				size: 1.5,
				speed: 0.25,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn title_hash_matches_reference_values() {
		assert_eq!(title_hash(""), 0);
		assert_eq!(title_hash("a"), 97);
		assert_eq!(title_hash("ab"), 97 * 31 + 98);
		// Long titles wrap rather than overflow.
		let long = "x".repeat(500);
		let _ = title_hash(&long);
	}

	#[test]
	fn color_is_deterministic_and_from_palette() {
		let a = color_for_title("Alpha");
		let b = color_for_title("Alpha");
		assert_eq!(a, b);
		assert!(NODE_PALETTE.contains(&a));
		assert!(NODE_PALETTE.contains(&color_for_title("")));
	}

	#[test]
	fn color_uses_absolute_hash() {
		// Find a title whose hash is negative and check it still indexes the palette.
		let title = (0..200)
			.map(|n| format!("paper {n} with a long enough title to wrap"))
			.find(|t| title_hash(t) < 0)
			.unwrap();
		let idx = title_hash(&title).unsigned_abs() as usize % NODE_PALETTE.len();
		assert_eq!(color_for_title(&title), NODE_PALETTE[idx]);
	}

	#[test]
	fn hex_parsing() {
		assert_eq!(Color::from_hex("#3b82f6"), Color::rgb(59, 130, 246));
		assert_eq!(Color::from_hex("blue"), Color::rgb(128, 128, 128));
		assert_eq!(Color::from_hex("#zz0000"), Color::rgb(128, 0, 0));
	}

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgba(1, 2, 3, 0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}
}
