use std::collections::HashSet;

use glam::Vec3;
use log::debug;

use super::camera::CameraView;
use super::graph::Graph;
use super::selection::SelectionStore;
use super::types::NodeId;

/// Adds an unlinked node facing the camera, on the point of the sphere nearest the eye.
///
/// The new id is the smallest one not in use, so ids freed by deletion are handed out again.
pub fn add_node(graph: &mut Graph, camera: &dyn CameraView) -> NodeId {
	let id = graph.next_free_id();
	let position = -camera.view_direction() * graph.radius();
	let position = if position.is_finite() {
		position
	} else {
		Vec3::Z * graph.radius()
	};
	graph.insert_node(id, position);
	debug!("added node {} at {:?}", id.0, position);
	id
}

/// Removes every selected node and every link touching one, then clears the selection.
///
/// Returns the removed ids; empty (and nothing touched) when the selection is empty.
pub fn delete_selected_nodes(graph: &mut Graph, selection: &mut SelectionStore) -> Vec<NodeId> {
	if selection.is_empty() {
		return Vec::new();
	}
	let doomed: HashSet<NodeId> = selection.iter().collect();
	let mut removed = graph.remove_nodes(&doomed);
	selection.clear();
	removed.sort();
	debug!("deleted nodes {:?}", removed);
	removed
}

#[cfg(test)]
mod tests {
	use super::super::camera::PerspectiveCamera;
	use super::super::types::{GraphData, Link};
	use super::*;

	fn camera_at(position: Vec3) -> PerspectiveCamera {
		PerspectiveCamera::new(position, Vec3::ZERO, 40f32.to_radians(), 800.0, 600.0)
	}

	#[test]
	fn new_node_faces_the_camera() {
		let mut graph = Graph::from_data(&GraphData::ring(4), 100.0);
		let id = add_node(&mut graph, &camera_at(Vec3::new(0.0, 300.0, 0.0)));
		assert_eq!(id, NodeId(4));
		let p = graph.position(id).unwrap();
		assert!((p - Vec3::new(0.0, 100.0, 0.0)).length() < 1e-3);
		assert_eq!(graph.links_touching(id).count(), 0);
	}

	#[test]
	fn deleted_ids_are_reused_smallest_first() {
		let mut graph = Graph::from_data(&GraphData::ring(6), 100.0);
		let mut selection = SelectionStore::new();
		selection.toggle(NodeId(4));
		selection.toggle(NodeId(1));
		delete_selected_nodes(&mut graph, &mut selection);
		let camera = camera_at(Vec3::Z * 300.0);
		assert_eq!(add_node(&mut graph, &camera), NodeId(1));
		assert_eq!(add_node(&mut graph, &camera), NodeId(4));
		assert_eq!(add_node(&mut graph, &camera), NodeId(6));
	}

	#[test]
	fn delete_removes_nodes_links_and_selection() {
		let mut graph = Graph::from_data(&GraphData::ring(10), 100.0);
		let mut selection = SelectionStore::new();
		selection.toggle(NodeId(3));
		selection.toggle(NodeId(5));
		let removed = delete_selected_nodes(&mut graph, &mut selection);
		assert_eq!(removed, vec![NodeId(3), NodeId(5)]);
		assert_eq!(graph.node_count(), 8);
		assert!(selection.is_empty());
		for gone in [
			Link::new(NodeId(2), NodeId(3)),
			Link::new(NodeId(3), NodeId(4)),
			Link::new(NodeId(4), NodeId(5)),
			Link::new(NodeId(5), NodeId(6)),
		] {
			assert!(!graph.links().contains(&gone));
		}
		assert_eq!(graph.links().len(), 6);
	}

	#[test]
	fn empty_selection_is_a_no_op() {
		let mut graph = Graph::from_data(&GraphData::ring(3), 100.0);
		let mut selection = SelectionStore::new();
		assert!(delete_selected_nodes(&mut graph, &mut selection).is_empty());
		assert_eq!(graph.node_count(), 3);
		assert_eq!(graph.links().len(), 3);
	}
}
