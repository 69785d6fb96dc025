//! Camera, orbit controller and the camera-reset animation.
//!
//! The interaction code only sees [`CameraView`] and [`OrbitControl`]; the concrete types here
//! are what the canvas build drives.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};

/// Camera as seen by picking and node placement.
pub trait CameraView {
	/// World-space eye position.
	fn position(&self) -> Vec3;
	/// Unit vector the camera looks along.
	fn view_direction(&self) -> Vec3;
	/// Viewport size in pixels.
	fn viewport(&self) -> Vec2;
	/// Combined projection and view matrix.
	fn view_projection(&self) -> Mat4;
	/// Recomputes the projection for a new viewport size.
	fn update_projection(&mut self, width: f32, height: f32);
}

/// Orbit-style controller that shares pointer input with node dragging.
pub trait OrbitControl {
	/// Whether the controller currently reacts to pointer movement.
	fn is_enabled(&self) -> bool;
	/// Grants or revokes pointer input.
	fn set_enabled(&mut self, enabled: bool);
	/// Point the camera orbits around.
	fn target(&self) -> Vec3;
}

/// Right-handed perspective camera looking at a target.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
	/// Eye position.
	pub position: Vec3,
	/// Look-at point.
	pub target: Vec3,
	/// World up.
	pub up: Vec3,
	/// Vertical field of view, radians.
	pub fov_y: f32,
	/// Near clip distance.
	pub near: f32,
	/// Far clip distance.
	pub far: f32,
	width: f32,
	height: f32,
	projection: Mat4,
}

impl PerspectiveCamera {
	/// Camera at `position` looking at `target` with a `width` x `height` viewport.
	pub fn new(position: Vec3, target: Vec3, fov_y: f32, width: f32, height: f32) -> Self {
		let mut camera = Self {
			position,
			target,
			up: Vec3::Y,
			fov_y,
			near: 1.0,
			far: 10_000.0,
			width,
			height,
			projection: Mat4::IDENTITY,
		};
		camera.update_projection(width, height);
		camera
	}

	/// Projects a world point to viewport pixels. `None` when behind the camera.
	pub fn project(&self, world: Vec3) -> Option<Vec2> {
		let clip = self.view_projection() * world.extend(1.0);
		if clip.w <= 1e-6 {
			return None;
		}
		let ndc = clip.truncate() / clip.w;
		if !ndc.is_finite() {
			return None;
		}
		Some(Vec2::new(
			(ndc.x * 0.5 + 0.5) * self.width,
			(0.5 - ndc.y * 0.5) * self.height,
		))
	}

	/// Distance from the eye to `world` along the view direction.
	pub fn depth(&self, world: Vec3) -> f32 {
		(world - self.position).dot(self.view_direction())
	}

	/// Pixels per world unit at `distance` in front of the camera.
	pub fn pixels_per_unit(&self, distance: f32) -> f32 {
		self.height / (2.0 * distance.max(self.near) * (self.fov_y * 0.5).tan())
	}
}

impl CameraView for PerspectiveCamera {
	fn position(&self) -> Vec3 {
		self.position
	}

	fn view_direction(&self) -> Vec3 {
		(self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
	}

	fn viewport(&self) -> Vec2 {
		Vec2::new(self.width, self.height)
	}

	fn view_projection(&self) -> Mat4 {
		self.projection * Mat4::look_at_rh(self.position, self.target, self.up)
	}

	fn update_projection(&mut self, width: f32, height: f32) {
		self.width = width.max(1.0);
		self.height = height.max(1.0);
		self.projection =
			Mat4::perspective_rh(self.fov_y, self.width / self.height, self.near, self.far);
	}
}

const POLAR_MARGIN: f32 = 1e-3;

/// Camera offset from its target as yaw around +Y, polar angle from +Y and distance.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
	theta: f32,
	phi: f32,
	distance: f32,
}

impl Spherical {
	fn from_offset(offset: Vec3) -> Self {
		let distance = offset.length();
		if distance <= f32::EPSILON {
			return Self {
				theta: 0.0,
				phi: PI / 2.0,
				distance,
			};
		}
		Self {
			theta: offset.x.atan2(offset.z),
			phi: (offset.y / distance).clamp(-1.0, 1.0).acos(),
			distance,
		}
	}

	/// Keeps the polar angle off the poles, where `look_at_rh` against +Y degenerates.
	fn off_poles(self) -> Self {
		Self {
			phi: self.phi.clamp(POLAR_MARGIN, PI - POLAR_MARGIN),
			..self
		}
	}

	fn to_offset(self) -> Vec3 {
		let (sin_phi, cos_phi) = self.phi.sin_cos();
		let (sin_theta, cos_theta) = self.theta.sin_cos();
		self.distance * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
	}
}

/// Rotates and zooms a camera around a target point from pointer input.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitController {
	enabled: bool,
	target: Vec3,
	/// Radians per pixel of pointer movement.
	pub rotate_speed: f32,
	/// Closest zoom distance.
	pub min_distance: f32,
	/// Farthest zoom distance.
	pub max_distance: f32,
}

impl OrbitController {
	/// Enabled controller orbiting `target`.
	pub fn new(target: Vec3, rotate_speed: f32, min_distance: f32, max_distance: f32) -> Self {
		Self {
			enabled: true,
			target,
			rotate_speed,
			min_distance,
			max_distance,
		}
	}

	/// Orbits `camera` by a pointer delta. Ignored while disabled.
	pub fn rotate(&self, camera: &mut PerspectiveCamera, delta: Vec2) {
		if !self.enabled {
			return;
		}
		let offset = camera.position - self.target;
		if offset.length() <= f32::EPSILON {
			return;
		}
		let from = Spherical::from_offset(offset);
		let to = Spherical {
			theta: from.theta - delta.x * self.rotate_speed,
			phi: from.phi - delta.y * self.rotate_speed,
			distance: from.distance,
		}
		.off_poles();
		camera.position = self.target + to.to_offset();
		camera.target = self.target;
	}

	/// Scales the camera distance by `factor`, clamped to the zoom limits.
	pub fn zoom(&self, camera: &mut PerspectiveCamera, factor: f32) {
		if !self.enabled {
			return;
		}
		let offset = camera.position - self.target;
		let distance = (offset.length() * factor).clamp(self.min_distance, self.max_distance);
		camera.position = self.target + offset.try_normalize().unwrap_or(Vec3::Z) * distance;
	}
}

impl OrbitControl for OrbitController {
	fn is_enabled(&self) -> bool {
		self.enabled
	}

	fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	fn target(&self) -> Vec3 {
		self.target
	}
}

/// Ease-out cubic on `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f32) -> f32 {
	1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

/// In-flight camera reset. Starting a new one simply replaces the old.
///
/// The eye travels in the orbit controller's spherical coordinates around the moving target, so
/// it keeps its distance from the sphere and never swings over a pole.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraReset {
	from: Spherical,
	to: Spherical,
	from_target: Vec3,
	to_target: Vec3,
	elapsed: f32,
	duration: f32,
}

impl CameraReset {
	/// Animation from the camera's current pose to `to_position` looking at `to_target`.
	pub fn new(
		camera: &PerspectiveCamera,
		to_position: Vec3,
		to_target: Vec3,
		duration: f32,
	) -> Self {
		let from = Spherical::from_offset(camera.position - camera.target).off_poles();
		let mut to = Spherical::from_offset(to_position - to_target).off_poles();
		// shortest way round in yaw
		to.theta = from.theta + (to.theta - from.theta + PI).rem_euclid(TAU) - PI;
		Self {
			from,
			to,
			from_target: camera.target,
			to_target,
			elapsed: 0.0,
			duration,
		}
	}

	/// Advances by `dt` seconds and poses `camera`. Returns true once finished.
	pub fn step(&mut self, camera: &mut PerspectiveCamera, dt: f32) -> bool {
		self.elapsed += dt;
		let t = if self.duration <= 0.0 {
			1.0
		} else {
			(self.elapsed / self.duration).min(1.0)
		};
		let eased = ease_out_cubic(t);
		let lerp = |a: f32, b: f32| a + (b - a) * eased;
		let pose = Spherical {
			theta: lerp(self.from.theta, self.to.theta),
			phi: lerp(self.from.phi, self.to.phi),
			distance: lerp(self.from.distance, self.to.distance),
		};
		let target = self.from_target.lerp(self.to_target, eased);

		camera.target = target;
		camera.position = target + pose.to_offset();
		t >= 1.0
	}
}
