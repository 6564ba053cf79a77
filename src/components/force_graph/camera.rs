//! Perspective orbit camera with timed transitions.
//!
//! The camera looks from `position` towards `target`. Dragging orbits around
//! the target, the wheel dollies towards it, and clicking a node starts a
//! [`CameraTransition`] that frames the node at a fixed standoff distance.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;

use super::simulation::finite_or_zero;

const NEAR_PLANE: f64 = 1.0;
const MIN_DISTANCE: f64 = 10.0;
const MAX_DISTANCE: f64 = 5000.0;
const ORBIT_RADIANS_PER_PIXEL: f64 = 0.005;

/// A world point mapped onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view direction. Larger is farther.
	pub depth: f64,
	/// Screen pixels per world unit at this depth.
	pub k: f64,
}

#[derive(Clone, Debug)]
pub struct Camera {
	pub position: DVec3,
	pub target: DVec3,
	/// Vertical field of view in degrees.
	pub fov: f64,
	pub width: f64,
	pub height: f64,
}

impl Camera {
	/// Camera on the +z axis looking at the origin, pulled back far enough
	/// to fit roughly `node_count` nodes.
	pub fn new(width: f64, height: f64, node_count: usize) -> Self {
		let distance = (170.0 * (node_count.max(1) as f64).cbrt()).clamp(150.0, 1500.0);
		Self {
			position: DVec3::new(0.0, 0.0, distance),
			target: DVec3::ZERO,
			fov: 40.0,
			width,
			height,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Orthonormal view basis `(right, up, forward)`.
	fn basis(&self) -> (DVec3, DVec3, DVec3) {
		let forward = (self.target - self.position).try_normalize().unwrap_or(DVec3::NEG_Z);
		let right = forward
			.cross(DVec3::Y)
			.try_normalize()
			.or_else(|| forward.cross(DVec3::Z).try_normalize())
			.unwrap_or(DVec3::X);
		let up = right.cross(forward);
		(right, up, forward)
	}

	fn focal_length(&self) -> f64 {
		(self.height / 2.0) / (self.fov.to_radians() / 2.0).tan()
	}

	/// Projects a world point to canvas pixels. `None` when behind the camera.
	pub fn project(&self, point: DVec3) -> Option<Projected> {
		let (right, up, forward) = self.basis();
		let rel = finite_or_zero(point) - self.position;
		let depth = rel.dot(forward);
		if depth < NEAR_PLANE {
			return None;
		}
		let k = self.focal_length() / depth;
		Some(Projected {
			x: self.width / 2.0 + rel.dot(right) * k,
			y: self.height / 2.0 - rel.dot(up) * k,
			depth,
			k,
		})
	}

	/// Rotates the camera around its target by screen-space drag deltas.
	pub fn orbit(&mut self, dx: f64, dy: f64) {
		self.rotate(-dx * ORBIT_RADIANS_PER_PIXEL, dy * ORBIT_RADIANS_PER_PIXEL);
	}

	/// Rotates the camera around its target by yaw/pitch angles in radians.
	pub fn rotate(&mut self, d_yaw: f64, d_pitch: f64) {
		let offset = self.position - self.target;
		let radius = offset.length().max(MIN_DISTANCE);
		let yaw = offset.x.atan2(offset.z) + d_yaw;
		let pitch = ((offset.y / radius).clamp(-1.0, 1.0).asin() + d_pitch)
			.clamp(-FRAC_PI_2 + 0.05, FRAC_PI_2 - 0.05);

		self.position = self.target
			+ DVec3::new(
				radius * pitch.cos() * yaw.sin(),
				radius * pitch.sin(),
				radius * pitch.cos() * yaw.cos(),
			);
	}

	/// Moves the camera towards (`factor < 1`) or away from the target.
	pub fn dolly(&mut self, factor: f64) {
		let offset = self.position - self.target;
		let distance = (offset.length() * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
		let dir = offset.try_normalize().unwrap_or(DVec3::Z);
		self.position = self.target + dir * distance;
	}

	/// Camera position that frames `node` from `standoff` units further out
	/// along the ray from the origin. A node at the origin is approached
	/// along +z.
	pub fn focus_position(node: DVec3, standoff: f64) -> DVec3 {
		let node = finite_or_zero(node);
		let dist = node.length();
		if dist < 1e-9 {
			return node + DVec3::Z * standoff;
		}
		node * (1.0 + standoff / dist)
	}
}

/// Smooth camera move from one pose to another.
#[derive(Clone, Debug)]
pub struct CameraTransition {
	from_position: DVec3,
	from_target: DVec3,
	to_position: DVec3,
	to_target: DVec3,
	elapsed: f64,
	duration: f64,
}

impl CameraTransition {
	/// Starts a move from the camera's current pose. Durations are seconds.
	pub fn new(camera: &Camera, to_position: DVec3, to_target: DVec3, duration: f64) -> Self {
		Self {
			from_position: camera.position,
			from_target: camera.target,
			to_position,
			to_target,
			elapsed: 0.0,
			duration: duration.max(0.0),
		}
	}

	/// Advances by `dt` seconds and writes the eased pose into `camera`.
	/// Returns `true` once the move has finished.
	pub fn advance(&mut self, camera: &mut Camera, dt: f64) -> bool {
		self.elapsed += dt.max(0.0);
		let t = if self.duration <= 0.0 {
			1.0
		} else {
			(self.elapsed / self.duration).min(1.0)
		};
		if t >= 1.0 {
			camera.position = self.to_position;
			camera.target = self.to_target;
			return true;
		}
		let eased = t * (2.0 - t);
		camera.position = self.from_position.lerp(self.to_position, eased);
		camera.target = self.from_target.lerp(self.to_target, eased);
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn camera() -> Camera {
		Camera {
			position: DVec3::new(0.0, 0.0, 100.0),
			target: DVec3::ZERO,
			fov: 90.0,
			width: 800.0,
			height: 600.0,
		}
	}

	#[test]
	fn target_projects_to_canvas_center() {
		let p = camera().project(DVec3::ZERO).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 100.0).abs() < 1e-9);
	}

	#[test]
	fn up_and_right_map_to_screen_axes() {
		let cam = camera();
		let right = cam.project(DVec3::new(10.0, 0.0, 0.0)).unwrap();
		let up = cam.project(DVec3::new(0.0, 10.0, 0.0)).unwrap();
		assert!(right.x > 400.0);
		assert!(up.y < 300.0);
	}

	#[test]
	fn points_behind_camera_are_culled() {
		assert!(camera().project(DVec3::new(0.0, 0.0, 150.0)).is_none());
	}

	#[test]
	fn nearer_points_project_larger() {
		let cam = camera();
		let near = cam.project(DVec3::new(0.0, 0.0, 50.0)).unwrap();
		let far = cam.project(DVec3::new(0.0, 0.0, -50.0)).unwrap();
		assert!(near.k > far.k);
	}

	#[test]
	fn focus_position_extends_ray_by_standoff() {
		let pos = Camera::focus_position(DVec3::new(30.0, 40.0, 0.0), 120.0);
		assert!((pos.length() - 170.0).abs() < 1e-9);
		assert!((pos.x / pos.y - 0.75).abs() < 1e-9);
	}

	#[test]
	fn focus_position_at_origin_is_finite() {
		let pos = Camera::focus_position(DVec3::ZERO, 120.0);
		assert_eq!(pos, DVec3::new(0.0, 0.0, 120.0));
		let pos = Camera::focus_position(DVec3::new(f64::NAN, 0.0, 0.0), 120.0);
		assert!(pos.is_finite());
	}

	#[test]
	fn transition_lands_on_target_pose() {
		let mut cam = camera();
		let to_pos = DVec3::new(50.0, 50.0, 50.0);
		let to_target = DVec3::new(10.0, 10.0, 10.0);
		let mut tr = CameraTransition::new(&cam, to_pos, to_target, 3.0);

		assert!(!tr.advance(&mut cam, 1.0));
		let midway = cam.position;
		assert_ne!(midway, to_pos);
		// Ease-out covers more than a third of the path in the first third.
		let covered = (midway - DVec3::new(0.0, 0.0, 100.0)).length()
			/ (to_pos - DVec3::new(0.0, 0.0, 100.0)).length();
		assert!(covered > 1.0 / 3.0);

		assert!(tr.advance(&mut cam, 5.0));
		assert_eq!(cam.position, to_pos);
		assert_eq!(cam.target, to_target);
	}

	#[test]
	fn zero_duration_transition_jumps() {
		let mut cam = camera();
		let mut tr = CameraTransition::new(&cam, DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO, 0.0);
		assert!(tr.advance(&mut cam, 0.0));
		assert_eq!(cam.position, DVec3::new(1.0, 2.0, 3.0));
	}

	#[test]
	fn degenerate_pose_falls_back_to_looking_down_z() {
		let mut cam = camera();
		cam.position = DVec3::ZERO;
		let p = cam.project(DVec3::new(0.0, 0.0, -10.0)).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.depth - 10.0).abs() < 1e-9);
	}

	#[test]
	fn orbit_keeps_distance_to_target() {
		let mut cam = camera();
		cam.orbit(120.0, -80.0);
		assert!(((cam.position - cam.target).length() - 100.0).abs() < 1e-6);
		cam.dolly(0.5);
		assert!(((cam.position - cam.target).length() - 50.0).abs() < 1e-6);
		cam.dolly(0.0);
		assert!(((cam.position - cam.target).length() - MIN_DISTANCE).abs() < 1e-6);
	}
}
