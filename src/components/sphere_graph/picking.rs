use glam::{Vec2, Vec3};

use super::camera::CameraView;
use super::types::{Node, NodeId};

/// Half-line from `origin` along unit `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	/// Start point.
	pub origin: Vec3,
	/// Unit direction.
	pub direction: Vec3,
}

/// Pixel coordinates to normalised device coordinates (`[-1, 1]`, y up).
pub fn pixel_to_ndc(pixel: Vec2, viewport: Vec2) -> Option<Vec2> {
	if viewport.x <= 0.0 || viewport.y <= 0.0 {
		return None;
	}
	Some(Vec2::new(
		pixel.x / viewport.x * 2.0 - 1.0,
		1.0 - pixel.y / viewport.y * 2.0,
	))
}

impl Ray {
	/// Ray from the camera through `ndc`. `None` when the camera matrix cannot be inverted.
	pub fn from_camera(camera: &dyn CameraView, ndc: Vec2) -> Option<Self> {
		let inv = camera.view_projection().inverse();
		if !inv.is_finite() {
			return None;
		}
		let near = inv.project_point3(ndc.extend(0.0));
		let far = inv.project_point3(ndc.extend(1.0));
		let direction = (far - near).try_normalize()?;
		Some(Self {
			origin: near,
			direction,
		})
	}

	/// Ray through a viewport pixel.
	pub fn from_pixel(camera: &dyn CameraView, pixel: Vec2) -> Option<Self> {
		Self::from_camera(camera, pixel_to_ndc(pixel, camera.viewport())?)
	}

	/// Point `t` units along the ray.
	pub fn at(&self, t: f32) -> Vec3 {
		self.origin + self.direction * t
	}

	/// Distance to the nearest non-negative intersection with a sphere.
	pub fn intersect_sphere(&self, centre: Vec3, radius: f32) -> Option<f32> {
		let offset = self.origin - centre;
		let b = offset.dot(self.direction);
		let c = offset.length_squared() - radius * radius;
		let discriminant = b * b - c;
		if discriminant < 0.0 {
			return None;
		}
		let root = discriminant.sqrt();
		[-b - root, -b + root].into_iter().find(|&t| t >= 0.0)
	}
}

/// Closest node hit by a ray, tested against each node's bounding sphere of `node_radius`.
///
/// `nodes` is read afresh on every call.
pub fn pick_node<'a>(
	ray: &Ray,
	nodes: impl IntoIterator<Item = &'a Node>,
	node_radius: f32,
) -> Option<NodeId> {
	nodes
		.into_iter()
		.filter_map(|node| {
			ray.intersect_sphere(node.position, node_radius)
				.map(|t| (t, node.id))
		})
		.min_by(|a, b| a.0.total_cmp(&b.0))
		.map(|(_, id)| id)
}

/// Node under a viewport pixel, if any.
pub fn node_at_pixel<'a>(
	camera: &dyn CameraView,
	pixel: Vec2,
	nodes: impl IntoIterator<Item = &'a Node>,
	node_radius: f32,
) -> Option<NodeId> {
	let ray = Ray::from_pixel(camera, pixel)?;
	pick_node(&ray, nodes, node_radius)
}

/// Where the pixel's ray first meets the sphere of `radius` around the origin.
pub fn pixel_onto_sphere(camera: &dyn CameraView, pixel: Vec2, radius: f32) -> Option<Vec3> {
	let ray = Ray::from_pixel(camera, pixel)?;
	let t = ray.intersect_sphere(Vec3::ZERO, radius)?;
	Some(ray.at(t))
}
