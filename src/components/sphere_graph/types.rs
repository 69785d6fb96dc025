use std::fmt;

use glam::Vec3;

/// Identity of a node on the sphere. Ids are small non-negative integers and get reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Node {}", self.0)
	}
}

/// A node constrained to the sphere surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
	/// Stable identity.
	pub id: NodeId,
	/// World-space position, always at `radius` from the origin.
	pub position: Vec3,
}

/// A directed link between two live nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
	/// Source endpoint.
	pub source: NodeId,
	/// Target endpoint.
	pub target: NodeId,
}

impl Link {
	/// Shorthand constructor.
	pub fn new(source: NodeId, target: NodeId) -> Self {
		Self { source, target }
	}

	/// Whether either endpoint is `id`.
	pub fn touches(&self, id: NodeId) -> bool {
		self.source == id || self.target == id
	}
}

/// Input node record, positioned by the layout generator in list order.
#[derive(Clone, Debug)]
pub struct GraphNode {
	/// Requested id.
	pub id: NodeId,
}

/// Input link record, referencing ids from [`GraphNode`].
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Source id.
	pub source: NodeId,
	/// Target id.
	pub target: NodeId,
}

/// Initial graph handed to a session.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	/// Nodes in layout order.
	pub nodes: Vec<GraphNode>,
	/// Links between those nodes.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// `n` nodes with ids `0..n`, linked `i -> (i + 1) mod n`.
	pub fn ring(n: u32) -> Self {
		let nodes = (0..n).map(|i| GraphNode { id: NodeId(i) }).collect();
		let links = if n < 2 {
			Vec::new()
		} else {
			(0..n)
				.map(|i| GraphLink {
					source: NodeId(i),
					target: NodeId((i + 1) % n),
				})
				.collect()
		};
		Self { nodes, links }
	}
}

/// Every tunable of a sphere graph session.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereConfig {
	/// Radius of the sphere nodes live on.
	pub radius: f32,
	/// Radius of the bounding sphere used to pick a node visual.
	pub node_radius: f32,
	/// Pixel distance a pointer must travel before a press becomes a drag.
	pub dead_zone_px: f32,
	/// Points sampled along each great-circle arc.
	pub arc_samples: usize,
	/// Points sampled along the smoothed curve when extruding the tube.
	pub tubular_segments: usize,
	/// Tube radius around each link curve.
	pub tube_radius: f32,
	/// Vertices around each tube ring.
	pub radial_segments: usize,
	/// Camera distance from the origin, in sphere radii.
	pub camera_distance_factor: f32,
	/// Vertical field of view, radians.
	pub fov_y: f32,
	/// Orbit rotation per pointer pixel, radians.
	pub orbit_speed: f32,
	/// Closest the orbit controller may zoom, in sphere radii.
	pub min_zoom_factor: f32,
	/// Farthest the orbit controller may zoom, in sphere radii.
	pub max_zoom_factor: f32,
	/// Camera reset animation length, seconds.
	pub reset_duration: f32,
}

impl Default for SphereConfig {
	fn default() -> Self {
		Self {
			radius: 100.0,
			node_radius: 5.0,
			dead_zone_px: 5.0,
			arc_samples: 20,
			tubular_segments: 64,
			tube_radius: 0.5,
			radial_segments: 8,
			camera_distance_factor: 3.0,
			fov_y: 40f32.to_radians(),
			orbit_speed: 0.005,
			min_zoom_factor: 1.3,
			max_zoom_factor: 8.0,
			reset_duration: 1.0,
		}
	}
}

impl SphereConfig {
	/// Camera distance the session starts at and resets to.
	pub fn home_distance(&self) -> f32 {
		self.radius * self.camera_distance_factor
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ring_wraps_last_node_to_first() {
		let data = GraphData::ring(10);
		assert_eq!(data.nodes.len(), 10);
		assert_eq!(data.links.len(), 10);
		let last = data.links.last().unwrap();
		assert_eq!((last.source, last.target), (NodeId(9), NodeId(0)));
	}

	#[test]
	fn tiny_rings_have_no_links() {
		assert!(GraphData::ring(1).links.is_empty());
		assert!(GraphData::ring(0).nodes.is_empty());
	}

	#[test]
	fn node_id_displays_like_the_state_panel() {
		assert_eq!(NodeId(7).to_string(), "Node 7");
	}
}
