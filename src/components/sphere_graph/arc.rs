//! Great-circle link geometry and its per-link cache.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;
use log::warn;

use super::types::{Link, NodeId, SphereConfig};

/// Sampling and tube parameters for link geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcParams {
	/// Radius the arc points are scaled back to.
	pub radius: f32,
	/// Number of segments between great-circle samples (samples = segments + 1).
	pub samples: usize,
	/// Number of segments along the smoothed curve.
	pub tubular_segments: usize,
	/// Tube radius.
	pub tube_radius: f32,
	/// Vertices per tube ring.
	pub radial_segments: usize,
}

impl From<&SphereConfig> for ArcParams {
	fn from(config: &SphereConfig) -> Self {
		Self {
			radius: config.radius,
			samples: config.arc_samples.max(1),
			tubular_segments: config.tubular_segments.max(1),
			tube_radius: config.tube_radius,
			radial_segments: config.radial_segments.max(3),
		}
	}
}

/// Renderable geometry of one link: the smoothed centre curve and the tube around it.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkGeometry {
	/// Points along the smoothed curve, endpoints included.
	pub curve: Vec<Vec3>,
	/// Tube vertices, one ring of `radial_segments` per curve point.
	pub vertices: Vec<Vec3>,
	/// Triangle list into `vertices`.
	pub indices: Vec<u32>,
	/// Radius the tube was extruded with.
	pub tube_radius: f32,
}

/// Samples the great circle from `start` to `end` and scales the samples to `radius`.
pub fn great_circle_points(start: Vec3, end: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
	let from = start.try_normalize().unwrap_or(Vec3::Z);
	let to = end.try_normalize().unwrap_or(from);
	let cos = from.dot(to);
	// component of `to` orthogonal to `from`; zero only for coincident or antipodal ends
	let perpendicular = to - from * cos;
	let angle = perpendicular.length().atan2(cos);
	let toward = perpendicular
		.try_normalize()
		.unwrap_or_else(|| from.any_orthonormal_vector());
	let segments = segments.max(1);
	(0..=segments)
		.map(|i| {
			let (sin, cos) = (angle * i as f32 / segments as f32).sin_cos();
			(from * cos + toward * sin) * radius
		})
		.collect()
}

/// Uniform Catmull-Rom curve through `points`, sampled at `segments + 1` evenly spaced parameters.
pub fn catmull_rom(points: &[Vec3], segments: usize) -> Vec<Vec3> {
	match points.len() {
		0 => return Vec::new(),
		1 => return vec![points[0]; segments.max(1) + 1],
		_ => {}
	}
	let spans = (points.len() - 1) as f32;
	let last = points.len() - 1;
	let at = |i: isize| points[i.clamp(0, last as isize) as usize];
	(0..=segments.max(1))
		.map(|s| {
			let u = s as f32 / segments.max(1) as f32 * spans;
			let i = (u.floor() as usize).min(last - 1);
			let t = u - i as f32;
			let i = i as isize;
			let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
			let (t2, t3) = (t * t, t * t * t);
			0.5 * (2.0 * p1
				+ (p2 - p0) * t
				+ (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
				+ (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
		})
		.collect()
}

/// Extrudes a tube of `tube_radius` around `curve`.
///
/// The curve hugs a sphere centred on the origin, so the outward radial direction is used as the
/// ring normal; it falls back to any vector orthogonal to the tangent when that degenerates.
pub fn tube(curve: &[Vec3], tube_radius: f32, radial_segments: usize) -> (Vec<Vec3>, Vec<u32>) {
	let radial = radial_segments.max(3);
	let mut vertices = Vec::with_capacity(curve.len() * radial);
	for (i, &point) in curve.iter().enumerate() {
		let prev = curve[i.saturating_sub(1)];
		let next = curve[(i + 1).min(curve.len() - 1)];
		let tangent = (next - prev).try_normalize().unwrap_or(Vec3::X);
		let outward = point.try_normalize().unwrap_or(Vec3::Z);
		let binormal = tangent
			.cross(outward)
			.try_normalize()
			.unwrap_or_else(|| tangent.any_orthonormal_vector());
		let normal = binormal.cross(tangent);
		for j in 0..radial {
			let (sin, cos) = (j as f32 / radial as f32 * TAU).sin_cos();
			vertices.push(point + (normal * cos + binormal * sin) * tube_radius);
		}
	}

	let mut indices = Vec::new();
	for i in 0..curve.len().saturating_sub(1) {
		for j in 0..radial {
			let a = (i * radial + j) as u32;
			let b = ((i + 1) * radial + j) as u32;
			let c = ((i + 1) * radial + (j + 1) % radial) as u32;
			let d = (i * radial + (j + 1) % radial) as u32;
			indices.extend_from_slice(&[a, b, d, b, c, d]);
		}
	}
	(vertices, indices)
}

/// Builds the full geometry for a link between two sphere points.
pub fn build_link_geometry(start: Vec3, end: Vec3, params: &ArcParams) -> LinkGeometry {
	let samples = great_circle_points(start, end, params.radius, params.samples);
	let curve = catmull_rom(&samples, params.tubular_segments);
	let (vertices, indices) = tube(&curve, params.tube_radius, params.radial_segments);
	LinkGeometry {
		curve,
		vertices,
		indices,
		tube_radius: params.tube_radius,
	}
}

/// Change to the cached geometry set produced by a refresh.
#[derive(Clone, Debug, PartialEq)]
pub enum GeometryChange {
	/// A link gained geometry for the first time.
	Added(Link, Rc<LinkGeometry>),
	/// A link's geometry was rebuilt.
	Rebuilt(Link, Rc<LinkGeometry>),
	/// A link lost its geometry.
	Removed(Link),
}

/// Per-link geometry handles, rebuilt only when an endpoint moves.
#[derive(Debug)]
pub struct LinkGeometryCache {
	params: ArcParams,
	entries: HashMap<Link, Rc<LinkGeometry>>,
	reported_dangling: HashSet<Link>,
}

impl LinkGeometryCache {
	/// Empty cache.
	pub fn new(params: ArcParams) -> Self {
		Self {
			params,
			entries: HashMap::new(),
			reported_dangling: HashSet::new(),
		}
	}

	/// Cached handle for `link`, if any.
	pub fn get(&self, link: &Link) -> Option<Rc<LinkGeometry>> {
		self.entries.get(link).cloned()
	}

	/// Number of cached links.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Brings the cache in line with `links`.
	///
	/// Links not yet cached get geometry, cached links no longer present are dropped, and links
	/// incident to a node in `moved` are rebuilt. Everything else keeps its handle. A link whose
	/// endpoint `position_of` cannot resolve is skipped and reported once.
	pub fn refresh(
		&mut self,
		links: &[Link],
		moved: &HashSet<NodeId>,
		position_of: impl Fn(NodeId) -> Option<Vec3>,
	) -> Vec<GeometryChange> {
		let mut changes = Vec::new();
		let wanted: HashSet<Link> = links.iter().copied().collect();

		let stale: Vec<Link> = self
			.entries
			.keys()
			.filter(|link| !wanted.contains(link))
			.copied()
			.collect();
		for link in stale {
			self.entries.remove(&link);
			changes.push(GeometryChange::Removed(link));
		}
		self.reported_dangling.retain(|link| wanted.contains(link));

		for &link in links {
			let cached = self.entries.contains_key(&link);
			let touched = moved.contains(&link.source) || moved.contains(&link.target);
			if cached && !touched {
				continue;
			}
			let (Some(start), Some(end)) = (position_of(link.source), position_of(link.target))
			else {
				if self.reported_dangling.insert(link) {
					warn!(
						"skipping link {} -> {}: endpoint does not exist",
						link.source.0, link.target.0
					);
				}
				if self.entries.remove(&link).is_some() {
					changes.push(GeometryChange::Removed(link));
				}
				continue;
			};
			let geometry = Rc::new(build_link_geometry(start, end, &self.params));
			self.entries.insert(link, geometry.clone());
			changes.push(if cached {
				GeometryChange::Rebuilt(link, geometry)
			} else {
				GeometryChange::Added(link, geometry)
			});
		}
		changes
	}
}
