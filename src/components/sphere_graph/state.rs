use std::rc::Rc;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};

use super::arc::{ArcParams, LinkGeometry};
use super::camera::{CameraReset, CameraView, OrbitControl, OrbitController, PerspectiveCamera};
use super::graph::Graph;
use super::interaction::{
	ClickIntent, GestureEnd, InteractionMachine, InteractionState, MoveOutcome,
};
use super::mutation;
use super::picking::{node_at_pixel, pixel_onto_sphere};
use super::scene::{NodeTransform, SceneContainer, SceneSync};
use super::selection::SelectionStore;
use super::types::{GraphData, Link, NodeId, SphereConfig};

/// One interactive session: graph, selection, camera and the retained-scene side-tables.
pub struct SphereGraphState {
	config: SphereConfig,
	graph: Graph,
	selection: SelectionStore,
	interaction: InteractionMachine,
	camera: PerspectiveCamera,
	orbit: OrbitController,
	reset: Option<CameraReset>,
	sync: SceneSync,
}

impl SphereGraphState {
	/// Lays out `data` on the sphere and points the camera at it from the home pose.
	pub fn new(data: &GraphData, config: SphereConfig, width: f64, height: f64) -> Self {
		let graph = Graph::from_data(data, config.radius);
		let camera = PerspectiveCamera::new(
			Vec3::Z * config.home_distance(),
			Vec3::ZERO,
			config.fov_y,
			width as f32,
			height as f32,
		);
		let orbit = OrbitController::new(
			Vec3::ZERO,
			config.orbit_speed,
			config.radius * config.min_zoom_factor,
			config.radius * config.max_zoom_factor,
		);
		info!(
			"sphere graph with {} nodes and {} links",
			graph.node_count(),
			graph.links().len()
		);
		Self {
			interaction: InteractionMachine::new(config.dead_zone_px),
			sync: SceneSync::new(ArcParams::from(&config)),
			graph,
			selection: SelectionStore::new(),
			camera,
			orbit,
			reset: None,
			config,
		}
	}

	/// Session configuration.
	pub fn config(&self) -> &SphereConfig {
		&self.config
	}

	/// The graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// The selection.
	pub fn selection(&self) -> &SelectionStore {
		&self.selection
	}

	/// The camera.
	pub fn camera(&self) -> &PerspectiveCamera {
		&self.camera
	}

	/// Mutable camera. Host and test helper; the canvas drives the camera through input only.
	pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
		&mut self.camera
	}

	/// The orbit controller.
	pub fn orbit(&self) -> &OrbitController {
		&self.orbit
	}

	/// Current gesture phase.
	pub fn interaction_state(&self) -> InteractionState {
		self.interaction.state()
	}

	/// Snapshot of the node being dragged.
	pub fn dragged_node(&self) -> Option<NodeId> {
		self.interaction.dragged_node()
	}

	/// Snapshot of the selected ids, ascending.
	pub fn selected_nodes(&self) -> Vec<NodeId> {
		self.selection.sorted()
	}

	/// Cached geometry handle of a link.
	pub fn link_geometry(&self, link: &Link) -> Option<Rc<LinkGeometry>> {
		self.sync.link_geometry(link)
	}

	/// Current icon transform of a node.
	pub fn node_transform(&self, id: NodeId) -> Option<NodeTransform> {
		self.sync.node_transform(id)
	}

	/// Whether a camera reset is in flight. Host and test helper.
	pub fn is_resetting(&self) -> bool {
		self.reset.is_some()
	}

	/// Picks the node under `pixel` and starts a gesture there.
	pub fn pointer_down(&mut self, pixel: Vec2, intent: ClickIntent) {
		let hit = node_at_pixel(&self.camera, pixel, self.graph.nodes(), self.config.node_radius);
		self.interaction.pointer_down(pixel, hit, intent, &mut self.orbit);
	}

	/// Drags the pressed node along the sphere, or orbits the camera.
	pub fn pointer_move(&mut self, pixel: Vec2) {
		match self.interaction.pointer_move(pixel, &self.orbit) {
			MoveOutcome::Ignored => {}
			MoveOutcome::DragTo { node, pointer } => {
				// off the sphere's silhouette the node holds still
				let Some(target) = pixel_onto_sphere(&self.camera, pointer, self.config.radius)
				else {
					return;
				};
				if let Err(err) = self.graph.set_position(node, target) {
					warn!("dropping drag: {err}");
					self.interaction.pointer_cancel(&mut self.orbit);
				}
			}
			MoveOutcome::Orbit(delta) => self.orbit.rotate(&mut self.camera, delta),
		}
	}

	/// Ends the gesture; clicks land in the selection.
	pub fn pointer_up(&mut self, pixel: Vec2) {
		match self.interaction.pointer_up(pixel, &mut self.orbit) {
			GestureEnd::Click(click) => {
				self.selection.apply(click);
			}
			GestureEnd::DragEnded(id) => debug!("drag ended on node {}", id.0),
			GestureEnd::OrbitEnded | GestureEnd::Ignored => {}
		}
	}

	/// Pointer left the canvas: the gesture ends without a click.
	pub fn pointer_cancel(&mut self) {
		self.interaction.pointer_cancel(&mut self.orbit);
	}

	/// Wheel zoom; positive `delta_y` zooms out.
	pub fn wheel(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.orbit.zoom(&mut self.camera, factor);
	}

	/// Adds a node facing the camera. Returns its id.
	pub fn add_node(&mut self) -> NodeId {
		mutation::add_node(&mut self.graph, &self.camera)
	}

	/// Deletes the selection and every link touching it.
	pub fn delete_selected_nodes(&mut self) -> Vec<NodeId> {
		let removed = mutation::delete_selected_nodes(&mut self.graph, &mut self.selection);
		for &id in &removed {
			self.interaction.forget_node(id, &mut self.orbit);
		}
		removed
	}

	/// Starts animating the camera back to its home pose, replacing any reset in flight.
	pub fn reset_camera_position(&mut self) {
		info!("resetting camera");
		self.reset = Some(CameraReset::new(
			&self.camera,
			self.orbit.target() + Vec3::Z * self.config.home_distance(),
			self.orbit.target(),
			self.config.reset_duration,
		));
	}

	/// Per-frame step; advances the camera reset.
	pub fn tick(&mut self, dt: f32) {
		if let Some(reset) = &mut self.reset {
			if reset.step(&mut self.camera, dt) {
				self.reset = None;
			}
		}
	}

	/// Viewport changed size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.camera.update_projection(width as f32, height as f32);
	}

	/// Pushes everything that changed since the last call into `scene`.
	pub fn apply_changes(&mut self, scene: &mut dyn SceneContainer) -> usize {
		self.sync.apply(&self.graph, &self.selection, scene)
	}

	/// Viewport pixel a node currently projects to. Host and test helper.
	pub fn node_pixel(&self, id: NodeId) -> Option<Vec2> {
		self.camera.project(self.graph.position(id)?)
	}

	/// Puts the camera on the ray from the origin through `id`, so the node sits mid-viewport.
	/// Host and test helper for scripting gestures at a known pixel.
	///
	/// Nodes on the global up axis cannot be faced without rolling the camera and are left alone.
	pub fn face_node(&mut self, id: NodeId) {
		let Some(direction) = self.graph.position(id).and_then(Vec3::try_normalize) else {
			return;
		};
		if direction.cross(self.camera.up).length_squared() < 1e-6 {
			return;
		}
		let distance = (self.camera.position - self.orbit.target()).length();
		self.camera.target = self.orbit.target();
		self.camera.position = self.orbit.target() + direction * distance;
	}
}

/// `Node a, Node b` or `None`, as shown in the state panel.
pub fn describe_nodes(ids: &[NodeId]) -> String {
	if ids.is_empty() {
		return "None".into();
	}
	ids.iter()
		.map(NodeId::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

#[cfg(test)]
mod tests {
	use super::super::scene::SceneOp;
	use super::*;

	fn state() -> SphereGraphState {
		SphereGraphState::new(&GraphData::ring(10), SphereConfig::default(), 800.0, 600.0)
	}

	fn centre() -> Vec2 {
		Vec2::new(400.0, 300.0)
	}

	#[test]
	fn face_node_centres_it() {
		let mut s = state();
		s.face_node(NodeId(4));
		assert!((s.node_pixel(NodeId(4)).unwrap() - centre()).length() < 1e-2);
	}

	#[test]
	fn face_node_leaves_up_axis_nodes_alone() {
		let mut s = state();
		let id = s.add_node();
		s.graph.set_position(id, Vec3::Y).unwrap();
		let before = s.camera().position;
		s.face_node(id);
		assert_eq!(s.camera().position, before);
	}

	#[test]
	fn orbit_is_locked_while_a_node_is_pressed() {
		let mut s = state();
		s.face_node(NodeId(2));
		s.pointer_down(centre(), ClickIntent::Select);
		assert!(!s.orbit().is_enabled());
		let before = s.camera().position;
		s.pointer_move(centre() + Vec2::new(2.0, 0.0));
		assert_eq!(s.camera().position, before);
		s.pointer_up(centre() + Vec2::new(2.0, 0.0));
		assert!(s.orbit().is_enabled());
		assert_eq!(s.selected_nodes(), vec![NodeId(2)]);
	}

	#[test]
	fn background_drag_orbits_the_camera() {
		let mut s = state();
		s.pointer_down(Vec2::new(5.0, 5.0), ClickIntent::Select);
		s.pointer_move(Vec2::new(60.0, 5.0));
		s.pointer_up(Vec2::new(60.0, 5.0));
		assert!(s.camera().position.x.abs() > 1.0);
		assert!((s.camera().position.length() - 300.0).abs() < 1e-2);
	}

	#[test]
	fn dragged_node_is_reported_only_while_dragging() {
		let mut s = state();
		s.face_node(NodeId(1));
		s.pointer_down(centre(), ClickIntent::Select);
		assert_eq!(s.dragged_node(), None);
		s.pointer_move(centre() + Vec2::new(30.0, 0.0));
		assert_eq!(s.dragged_node(), Some(NodeId(1)));
		s.pointer_up(centre() + Vec2::new(30.0, 0.0));
		assert_eq!(s.dragged_node(), None);
	}

	#[test]
	fn deleting_the_pressed_node_releases_the_gesture() {
		let mut s = state();
		s.face_node(NodeId(1));
		s.pointer_down(centre(), ClickIntent::Select);
		s.pointer_move(centre() + Vec2::new(30.0, 0.0));
		s.selection.toggle(NodeId(1));
		s.delete_selected_nodes();
		assert_eq!(s.interaction_state(), InteractionState::Idle);
		assert!(s.orbit().is_enabled());
		s.pointer_move(centre() + Vec2::new(60.0, 0.0));
	}

	#[test]
	fn reset_runs_to_completion_and_can_be_superseded() {
		let mut s = state();
		s.camera_mut().position = Vec3::new(0.0, 200.0, -200.0);
		s.reset_camera_position();
		s.tick(0.5);
		s.reset_camera_position();
		assert!(s.is_resetting());
		for _ in 0..11 {
			s.tick(0.1);
		}
		assert!(!s.is_resetting());
		assert!((s.camera().position - Vec3::new(0.0, 0.0, 300.0)).length() < 1e-2);
	}

	#[test]
	fn reset_keeps_the_picture_upright_every_frame() {
		let mut s = state();
		s.camera_mut().position = Vec3::new(0.0, 200.0, -200.0);
		s.reset_camera_position();
		let mut previous = s.camera().view_direction().cross(Vec3::Y);
		while s.is_resetting() {
			s.tick(0.016);
			let right = s.camera().view_direction().cross(Vec3::Y);
			assert!(right.length() > 1e-3);
			assert!(right.dot(previous) > 0.0);
			previous = right;
		}
	}

	#[test]
	fn apply_changes_reports_first_sync() {
		let mut s = state();
		let mut ops: Vec<SceneOp> = Vec::new();
		assert!(s.apply_changes(&mut ops) >= 20);
		assert_eq!(s.apply_changes(&mut Vec::new()), 0);
	}

	#[test]
	fn state_panel_text() {
		assert_eq!(describe_nodes(&[]), "None");
		assert_eq!(describe_nodes(&[NodeId(3), NodeId(5)]), "Node 3, Node 5");
	}
}
