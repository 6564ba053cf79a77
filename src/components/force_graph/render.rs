//! Canvas rendering for the 3-D citation graph.
//!
//! Every frame projects all nodes through the camera, then draws in passes
//! for correct layering:
//! 1. Background gradient
//! 2. Links and their flow particles
//! 3. Spheres, sorted far to near
//! 4. Vignette

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::Projected;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::ForceGraphState;
use super::theme::{Color, Theme};

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let projected: Vec<Option<Projected>> =
		(0..state.nodes.len()).map(|i| state.project_node(i)).collect();

	draw_background(state, ctx, theme);
	draw_links(state, ctx, config, theme, &projected);
	draw_nodes(state, ctx, config, theme, &projected);

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Ok(gradient) = ctx.create_radial_gradient(
		state.width / 2.0,
		state.height / 2.0,
		state.width.min(state.height) * 0.3,
		state.width / 2.0,
		state.height / 2.0,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	projected: &[Option<Projected>],
) {
	let style = &theme.link;
	ctx.set_stroke_style_str(&style.color.with_alpha(style.opacity).to_css());
	ctx.set_line_width(style.width);

	for &(src, tgt) in &state.links {
		let (Some(a), Some(b)) = (projected[src], projected[tgt]) else {
			continue;
		};

		if src == tgt {
			// Self-citation: a small ring tangent to the sphere.
			let r = style.self_loop_radius * a.k;
			let offset = config.node_radius(state.nodes[src].val) * a.k + r;
			ctx.begin_path();
			let _ = ctx.arc(a.x + offset * 0.7, a.y - offset * 0.7, r, 0.0, 2.0 * PI);
			ctx.stroke();
			continue;
		}

		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}

	if state.particles.is_enabled() {
		draw_link_particles(state, ctx, config, theme, projected);
	}
}

fn draw_link_particles(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	projected: &[Option<Projected>],
) {
	let style = &theme.particles;

	for (link_idx, &(src, tgt)) in state.links.iter().enumerate() {
		if src == tgt {
			continue;
		}
		let (Some(a), Some(b)) = (projected[src], projected[tgt]) else {
			continue;
		};

		for t in state.particles.offsets(link_idx) {
			let k = a.k + (b.k - a.k) * t;
			let alpha = config.particle.alpha.apply(k) * style.color.a;
			if alpha < config.particle.cull_alpha {
				continue;
			}
			let size = config.particle.size.apply(style.size, k);
			ctx.set_fill_style_str(&style.color.with_alpha(alpha).to_css());
			ctx.begin_path();
			let _ = ctx.arc(
				a.x + (b.x - a.x) * t,
				a.y + (b.y - a.y) * t,
				size,
				0.0,
				2.0 * PI,
			);
			ctx.fill();
		}
	}
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	projected: &[Option<Projected>],
) {
	let mut order: Vec<(usize, Projected)> = projected
		.iter()
		.enumerate()
		.filter_map(|(i, p)| p.map(|p| (i, p)))
		.collect();
	// Painter's algorithm: far spheres first.
	order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

	for (idx, p) in order {
		let scale = ScaledValues::new(config, state.nodes[idx].val, p.k);
		draw_sphere(ctx, &p, &scale, Color::from_hex(&state.nodes[idx].color), theme);

		if state.hovered == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, scale.node_radius + 3.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.hover_ring.to_css());
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
	}
}

/// Shaded disc that reads as a lit sphere: highlight up-left, emissive
/// shadow down-right.
fn draw_sphere(
	ctx: &CanvasRenderingContext2d,
	p: &Projected,
	scale: &ScaledValues,
	base: Color,
	theme: &Theme,
) {
	let radius = scale.node_radius;
	let style = &theme.node;

	let gradient = ctx
		.create_radial_gradient(
			p.x - radius * 0.35,
			p.y - radius * 0.35,
			radius * 0.05,
			p.x,
			p.y,
			radius,
		)
		.ok();

	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let shadow = base.darken(style.shade).lerp(style.emissive, 0.3);
			let _ = gradient.add_color_stop(0.0, &base.lighten(style.specular).to_css());
			let _ = gradient.add_color_stop(0.6, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &shadow.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();
}
