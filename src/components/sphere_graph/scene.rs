//! Keeps the renderer's retained scene in step with the graph.
//!
//! Visual state lives in side-tables keyed by node id and link, never on [`Node`] or [`Link`].
//! [`SceneSync::apply`] diffs the graph and selection against those tables after every state
//! change and emits the minimal set of [`SceneOp`]s for a [`SceneContainer`].

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::arc::{ArcParams, GeometryChange, LinkGeometry, LinkGeometryCache};
use super::graph::Graph;
use super::orientation::billboard_rotation;
use super::selection::SelectionStore;
use super::types::{Link, NodeId};

/// Where and how a node icon sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
	/// Position on the sphere.
	pub position: Vec3,
	/// Outward-facing billboard rotation.
	pub rotation: Quat,
}

impl NodeTransform {
	fn at(position: Vec3) -> Self {
		Self {
			position,
			rotation: billboard_rotation(position),
		}
	}
}

/// Display status of a node, driving its colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeStatus {
	/// In the selection.
	Selected,
	/// Not selected; every incoming link comes from a selected node.
	Ready,
	/// Not selected; some incoming link comes from an unselected node.
	Locked,
}

/// One change to the retained scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp {
	/// Create a node icon.
	AddNode(NodeId, NodeTransform, NodeStatus),
	/// Move or re-orient a node icon.
	UpdateNode(NodeId, NodeTransform),
	/// Recolour a node icon.
	SetStatus(NodeId, NodeStatus),
	/// Show or hide a node's selection outline.
	SetOutline(NodeId, bool),
	/// Destroy a node icon and its outline.
	RemoveNode(NodeId),
	/// Create a link tube.
	AddLink(Link, Rc<LinkGeometry>),
	/// Swap a link tube's geometry.
	UpdateLink(Link, Rc<LinkGeometry>),
	/// Destroy a link tube.
	RemoveLink(Link),
}

/// Retained scene of an external renderer.
pub trait SceneContainer {
	/// Applies one change.
	fn apply(&mut self, op: SceneOp);
}

/// Records operations; useful for headless sessions.
impl SceneContainer for Vec<SceneOp> {
	fn apply(&mut self, op: SceneOp) {
		self.push(op);
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct NodeVisual {
	transform: NodeTransform,
	status: NodeStatus,
	outlined: bool,
}

/// Side-tables of what the scene currently shows.
#[derive(Debug)]
pub struct SceneSync {
	nodes: HashMap<NodeId, NodeVisual>,
	links: LinkGeometryCache,
}

impl SceneSync {
	/// Empty tables; the first [`apply`](Self::apply) populates the scene.
	pub fn new(params: ArcParams) -> Self {
		Self {
			nodes: HashMap::new(),
			links: LinkGeometryCache::new(params),
		}
	}

	/// Cached geometry handle of a link.
	pub fn link_geometry(&self, link: &Link) -> Option<Rc<LinkGeometry>> {
		self.links.get(link)
	}

	/// Current transform of a node icon.
	pub fn node_transform(&self, id: NodeId) -> Option<NodeTransform> {
		self.nodes.get(&id).map(|v| v.transform)
	}

	/// Current status of a node icon.
	pub fn node_status(&self, id: NodeId) -> Option<NodeStatus> {
		self.nodes.get(&id).map(|v| v.status)
	}

	/// Emits whatever brings `scene` in line with `graph` and `selection`. Returns the op count.
	pub fn apply(
		&mut self,
		graph: &Graph,
		selection: &SelectionStore,
		scene: &mut dyn SceneContainer,
	) -> usize {
		let mut ops = 0;
		let mut emit = |op: SceneOp| {
			scene.apply(op);
			ops += 1;
		};

		let gone: Vec<NodeId> = self
			.nodes
			.keys()
			.filter(|id| !graph.contains(**id))
			.copied()
			.collect();
		for id in gone {
			self.nodes.remove(&id);
			emit(SceneOp::RemoveNode(id));
		}

		let status_of = |id: NodeId| {
			if selection.contains(id) {
				NodeStatus::Selected
			} else if graph.prerequisites_met(id, selection) {
				NodeStatus::Ready
			} else {
				NodeStatus::Locked
			}
		};

		let mut moved = HashSet::new();
		for node in graph.nodes() {
			let status = status_of(node.id);
			let outlined = selection.contains(node.id);
			match self.nodes.get_mut(&node.id) {
				None => {
					let transform = NodeTransform::at(node.position);
					self.nodes.insert(
						node.id,
						NodeVisual {
							transform,
							status,
							outlined,
						},
					);
					emit(SceneOp::AddNode(node.id, transform, status));
					if outlined {
						emit(SceneOp::SetOutline(node.id, true));
					}
				}
				Some(visual) => {
					if visual.transform.position != node.position {
						visual.transform = NodeTransform::at(node.position);
						moved.insert(node.id);
						emit(SceneOp::UpdateNode(node.id, visual.transform));
					}
					if visual.status != status {
						visual.status = status;
						emit(SceneOp::SetStatus(node.id, status));
					}
					if visual.outlined != outlined {
						visual.outlined = outlined;
						emit(SceneOp::SetOutline(node.id, outlined));
					}
				}
			}
		}

		for change in self.links.refresh(graph.links(), &moved, |id| graph.position(id)) {
			emit(match change {
				GeometryChange::Added(link, geometry) => SceneOp::AddLink(link, geometry),
				GeometryChange::Rebuilt(link, geometry) => SceneOp::UpdateLink(link, geometry),
				GeometryChange::Removed(link) => SceneOp::RemoveLink(link),
			});
		}
		ops
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{GraphData, SphereConfig};
	use super::*;

	fn setup() -> (Graph, SelectionStore, SceneSync) {
		(
			Graph::from_data(&GraphData::ring(4), 100.0),
			SelectionStore::new(),
			SceneSync::new(ArcParams::from(&SphereConfig::default())),
		)
	}

	#[test]
	fn first_apply_adds_everything() {
		let (graph, selection, mut sync) = setup();
		let mut ops = Vec::new();
		sync.apply(&graph, &selection, &mut ops);
		let nodes = ops.iter().filter(|op| matches!(op, SceneOp::AddNode(..))).count();
		let links = ops.iter().filter(|op| matches!(op, SceneOp::AddLink(..))).count();
		assert_eq!((nodes, links), (4, 4));
	}

	#[test]
	fn unchanged_state_emits_nothing() {
		let (graph, selection, mut sync) = setup();
		sync.apply(&graph, &selection, &mut Vec::new());
		assert_eq!(sync.apply(&graph, &selection, &mut Vec::new()), 0);
	}

	#[test]
	fn moving_a_node_updates_it_and_its_links_only() {
		let (mut graph, selection, mut sync) = setup();
		sync.apply(&graph, &selection, &mut Vec::new());
		graph.set_position(NodeId(0), Vec3::new(1.0, 1.0, 1.0)).unwrap();
		let mut ops = Vec::new();
		sync.apply(&graph, &selection, &mut ops);
		assert_eq!(ops.len(), 3);
		assert!(matches!(ops[0], SceneOp::UpdateNode(NodeId(0), _)));
		let mut rebuilt: Vec<Link> = ops[1..]
			.iter()
			.filter_map(|op| match op {
				SceneOp::UpdateLink(link, _) => Some(*link),
				_ => None,
			})
			.collect();
		rebuilt.sort();
		assert_eq!(
			rebuilt,
			vec![Link::new(NodeId(0), NodeId(1)), Link::new(NodeId(3), NodeId(0))]
		);
		let transform = sync.node_transform(NodeId(0)).unwrap();
		assert!((transform.rotation * Vec3::Z).dot(transform.position.normalize()) > 0.999);
	}

	#[test]
	fn selection_toggles_outline_and_status() {
		let (graph, mut selection, mut sync) = setup();
		sync.apply(&graph, &selection, &mut Vec::new());
		assert_eq!(sync.node_status(NodeId(1)), Some(NodeStatus::Locked));
		selection.toggle(NodeId(0));
		let mut ops = Vec::new();
		sync.apply(&graph, &selection, &mut ops);
		assert!(ops.contains(&SceneOp::SetOutline(NodeId(0), true)));
		assert!(ops.contains(&SceneOp::SetStatus(NodeId(0), NodeStatus::Selected)));
		assert_eq!(sync.node_status(NodeId(1)), Some(NodeStatus::Ready));
	}

	#[test]
	fn removed_nodes_take_their_visuals_along() {
		let (mut graph, selection, mut sync) = setup();
		sync.apply(&graph, &selection, &mut Vec::new());
		graph.remove_nodes(&HashSet::from([NodeId(2)]));
		let mut ops = Vec::new();
		sync.apply(&graph, &selection, &mut ops);
		assert!(ops.contains(&SceneOp::RemoveNode(NodeId(2))));
		let removed_links = ops.iter().filter(|op| matches!(op, SceneOp::RemoveLink(_))).count();
		assert_eq!(removed_links, 2);
		assert!(sync.node_transform(NodeId(2)).is_none());
	}
}
