use std::collections::{BTreeMap, HashSet};

use glam::Vec3;
use log::warn;
use thiserror::Error;

use super::layout::spiral_positions;
use super::selection::SelectionStore;
use super::types::{GraphData, Link, Node, NodeId};

/// Rejected graph operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
	/// The id does not name a live node.
	#[error("{0} does not exist")]
	UnknownNode(NodeId),
	/// An identical link already exists.
	#[error("link {0} -> {1} already exists")]
	DuplicateLink(NodeId, NodeId),
	/// Links must join two different nodes.
	#[error("{0} cannot link to itself")]
	SelfLink(NodeId),
}

/// Nodes on a sphere of fixed radius plus the links between them.
#[derive(Clone, Debug)]
pub struct Graph {
	radius: f32,
	nodes: BTreeMap<NodeId, Node>,
	links: Vec<Link>,
}

impl Graph {
	/// Empty graph on a sphere of `radius`.
	pub fn new(radius: f32) -> Self {
		Self {
			radius,
			nodes: BTreeMap::new(),
			links: Vec::new(),
		}
	}

	/// Lays out `data`'s nodes with the spiral generator and adds its links. Repeated node ids and
	/// invalid links are skipped with a warning.
	pub fn from_data(data: &GraphData, radius: f32) -> Self {
		let mut graph = Self::new(radius);
		let positions = spiral_positions(data.nodes.len(), radius);
		for (node, position) in data.nodes.iter().zip(positions) {
			if graph.nodes.contains_key(&node.id) {
				warn!("skipping repeated node id {}", node.id.0);
				continue;
			}
			graph.insert_node(node.id, position);
		}
		for link in &data.links {
			if let Err(err) = graph.add_link(link.source, link.target) {
				warn!("skipping link: {err}");
			}
		}
		graph
	}

	/// Sphere radius every node is held to.
	pub fn radius(&self) -> f32 {
		self.radius
	}

	/// Live nodes, ascending by id.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// Number of live nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Position by id.
	pub fn position(&self, id: NodeId) -> Option<Vec3> {
		self.nodes.get(&id).map(|n| n.position)
	}

	/// Whether `id` is live.
	pub fn contains(&self, id: NodeId) -> bool {
		self.nodes.contains_key(&id)
	}

	/// All links.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Links with `id` as an endpoint.
	pub fn links_touching(&self, id: NodeId) -> impl Iterator<Item = &Link> {
		self.links.iter().filter(move |l| l.touches(id))
	}

	/// Smallest non-negative id not in use.
	///
	/// Linear in the node count.
	pub fn next_free_id(&self) -> NodeId {
		let mut candidate = 0;
		for id in self.nodes.keys() {
			if id.0 != candidate {
				break;
			}
			candidate += 1;
		}
		NodeId(candidate)
	}

	/// Inserts (or replaces) a node, projecting `position` onto the sphere.
	pub fn insert_node(&mut self, id: NodeId, position: Vec3) {
		let position = self.project(position);
		self.nodes.insert(id, Node { id, position });
	}

	/// Moves a node, projecting `position` onto the sphere.
	pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<(), GraphError> {
		let projected = self.project(position);
		let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
		node.position = projected;
		Ok(())
	}

	/// Adds a link between two live, distinct, not yet linked nodes.
	pub fn add_link(&mut self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
		for id in [source, target] {
			if !self.contains(id) {
				return Err(GraphError::UnknownNode(id));
			}
		}
		if source == target {
			return Err(GraphError::SelfLink(source));
		}
		let link = Link::new(source, target);
		if self.links.contains(&link) {
			return Err(GraphError::DuplicateLink(source, target));
		}
		self.links.push(link);
		Ok(())
	}

	/// Removes `ids` and every link touching them in one step. Returns the ids actually removed.
	pub fn remove_nodes(&mut self, ids: &HashSet<NodeId>) -> Vec<NodeId> {
		let removed: Vec<NodeId> = ids
			.iter()
			.copied()
			.filter(|id| self.nodes.remove(id).is_some())
			.collect();
		self.links
			.retain(|l| !ids.contains(&l.source) && !ids.contains(&l.target));
		removed
	}

	/// Whether every incoming link of `id` starts at a selected node.
	pub fn prerequisites_met(&self, id: NodeId, selection: &SelectionStore) -> bool {
		self.links
			.iter()
			.filter(|l| l.target == id)
			.all(|l| selection.contains(l.source))
	}

	fn project(&self, position: Vec3) -> Vec3 {
		position.try_normalize().unwrap_or(Vec3::Z) * self.radius
	}
}
