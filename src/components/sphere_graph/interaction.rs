//! Pointer gesture lifecycle: click, multi-select click, node drag, background click and orbit.
//!
//! One pointer-down starts a gesture. Pressing on a node locks the orbit controller out until the
//! pointer comes back up; the dead-zone decides whether the gesture ends as a click or a drag.

use glam::Vec2;
use log::debug;

use super::camera::OrbitControl;
use super::selection::ClickEvent;
use super::types::NodeId;

/// Click semantics, decided from modifier keys at the input boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClickIntent {
	/// Replace the selection.
	#[default]
	Select,
	/// Toggle membership in the selection.
	Toggle,
}

impl ClickIntent {
	/// Shift toggles, anything else selects.
	pub fn from_modifiers(shift: bool) -> Self {
		if shift { Self::Toggle } else { Self::Select }
	}
}

/// Press on a node, alive until the matching pointer-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
	/// Pressed node.
	pub node_id: NodeId,
	/// Pointer position at press time.
	pub start_pointer: Vec2,
	/// Whether the pointer has left the dead-zone.
	pub is_dragging: bool,
	intent: ClickIntent,
}

/// Observable phase of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
	/// No gesture in progress.
	Idle,
	/// Pressed on a node, still inside the dead-zone.
	Candidate,
	/// Dragging a node across the sphere.
	Dragging,
	/// Pressed on the background; pointer input belongs to the orbit controller.
	CameraOrbit,
}

/// What a pointer-move asks the caller to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
	/// Nothing.
	Ignored,
	/// Move `node` to where `pointer` meets the sphere.
	DragTo {
		/// Dragged node.
		node: NodeId,
		/// Current pointer position.
		pointer: Vec2,
	},
	/// Orbit the camera by a pointer delta.
	Orbit(Vec2),
}

/// How a gesture ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEnd {
	/// No gesture was in progress.
	Ignored,
	/// The gesture was a click to apply to the selection.
	Click(ClickEvent),
	/// A node drag finished.
	DragEnded(NodeId),
	/// A background drag (camera orbit) finished.
	OrbitEnded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
	None,
	Node(DragSession),
	Background { start: Vec2, last: Vec2, moved: bool },
}

/// Owns the pointer-down/move/up lifecycle and the orbit lock.
#[derive(Clone, Debug)]
pub struct InteractionMachine {
	dead_zone: f32,
	gesture: Gesture,
}

impl InteractionMachine {
	/// Idle machine with a dead-zone of `dead_zone` pixels.
	pub fn new(dead_zone: f32) -> Self {
		Self {
			dead_zone,
			gesture: Gesture::None,
		}
	}

	/// Current phase.
	pub fn state(&self) -> InteractionState {
		match self.gesture {
			Gesture::None => InteractionState::Idle,
			Gesture::Node(s) if s.is_dragging => InteractionState::Dragging,
			Gesture::Node(_) => InteractionState::Candidate,
			Gesture::Background { .. } => InteractionState::CameraOrbit,
		}
	}

	/// Live drag session, if the pointer went down on a node.
	pub fn session(&self) -> Option<&DragSession> {
		match &self.gesture {
			Gesture::Node(s) => Some(s),
			_ => None,
		}
	}

	/// Node being dragged right now.
	pub fn dragged_node(&self) -> Option<NodeId> {
		self.session().filter(|s| s.is_dragging).map(|s| s.node_id)
	}

	/// Starts a gesture. `hit` is the picked node under the pointer.
	pub fn pointer_down(
		&mut self,
		pointer: Vec2,
		hit: Option<NodeId>,
		intent: ClickIntent,
		orbit: &mut dyn OrbitControl,
	) {
		match hit {
			Some(node_id) => {
				debug!("pointer down on node {}", node_id.0);
				self.gesture = Gesture::Node(DragSession {
					node_id,
					start_pointer: pointer,
					is_dragging: false,
					intent,
				});
				orbit.set_enabled(false);
			}
			None => {
				self.gesture = Gesture::Background {
					start: pointer,
					last: pointer,
					moved: false,
				};
				orbit.set_enabled(true);
			}
		}
	}

	/// Tracks pointer movement within the current gesture.
	pub fn pointer_move(&mut self, pointer: Vec2, orbit: &dyn OrbitControl) -> MoveOutcome {
		let dead_zone = self.dead_zone;
		match &mut self.gesture {
			Gesture::None => MoveOutcome::Ignored,
			Gesture::Node(session) => {
				if !session.is_dragging && session.start_pointer.distance(pointer) > dead_zone {
					debug!("drag started on node {}", session.node_id.0);
					session.is_dragging = true;
				}
				if session.is_dragging {
					MoveOutcome::DragTo {
						node: session.node_id,
						pointer,
					}
				} else {
					MoveOutcome::Ignored
				}
			}
			Gesture::Background { start, last, moved } => {
				if start.distance(pointer) > dead_zone {
					*moved = true;
				}
				let delta = pointer - *last;
				*last = pointer;
				if orbit.is_enabled() {
					MoveOutcome::Orbit(delta)
				} else {
					MoveOutcome::Ignored
				}
			}
		}
	}

	/// Ends the gesture and hands pointer input back to the orbit controller.
	pub fn pointer_up(&mut self, pointer: Vec2, orbit: &mut dyn OrbitControl) -> GestureEnd {
		let gesture = std::mem::replace(&mut self.gesture, Gesture::None);
		orbit.set_enabled(true);
		match gesture {
			Gesture::None => GestureEnd::Ignored,
			Gesture::Node(session) if session.is_dragging => GestureEnd::DragEnded(session.node_id),
			Gesture::Node(session) => GestureEnd::Click(match session.intent {
				ClickIntent::Select => ClickEvent::Click(session.node_id),
				ClickIntent::Toggle => ClickEvent::MultiSelectClick(session.node_id),
			}),
			Gesture::Background { start, moved, .. } => {
				if moved || start.distance(pointer) > self.dead_zone {
					GestureEnd::OrbitEnded
				} else {
					GestureEnd::Click(ClickEvent::Background)
				}
			}
		}
	}

	/// Abandons the gesture without a click. Returns the node whose drag was cut short.
	pub fn pointer_cancel(&mut self, orbit: &mut dyn OrbitControl) -> Option<NodeId> {
		let dragged = self.dragged_node();
		self.gesture = Gesture::None;
		orbit.set_enabled(true);
		dragged
	}

	/// Drops a session whose node no longer exists.
	pub fn forget_node(&mut self, id: NodeId, orbit: &mut dyn OrbitControl) {
		if self.session().is_some_and(|s| s.node_id == id) {
			self.pointer_cancel(orbit);
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::Vec3;

	use super::super::camera::OrbitController;
	use super::*;

	fn setup() -> (InteractionMachine, OrbitController) {
		(
			InteractionMachine::new(5.0),
			OrbitController::new(Vec3::ZERO, 0.005, 130.0, 800.0),
		)
	}

	#[test]
	fn press_on_node_locks_the_orbit_controller() {
		let (mut machine, mut orbit) = setup();
		let press = Vec2::new(10.0, 10.0);
		machine.pointer_down(press, Some(NodeId(2)), ClickIntent::Select, &mut orbit);
		assert_eq!(machine.state(), InteractionState::Candidate);
		assert!(!orbit.is_enabled());
		machine.pointer_up(Vec2::new(10.0, 10.0), &mut orbit);
		assert!(orbit.is_enabled());
		assert_eq!(machine.state(), InteractionState::Idle);
	}

	#[test]
	fn small_movement_is_still_a_click() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, Some(NodeId(3)), ClickIntent::Select, &mut orbit);
		assert_eq!(machine.pointer_move(Vec2::new(3.0, 4.0), &orbit), MoveOutcome::Ignored);
		assert_eq!(
			machine.pointer_up(Vec2::new(3.0, 4.0), &mut orbit),
			GestureEnd::Click(ClickEvent::Click(NodeId(3)))
		);
	}

	#[test]
	fn shift_click_toggles() {
		let (mut machine, mut orbit) = setup();
		let intent = ClickIntent::from_modifiers(true);
		machine.pointer_down(Vec2::ZERO, Some(NodeId(5)), intent, &mut orbit);
		assert_eq!(
			machine.pointer_up(Vec2::ZERO, &mut orbit),
			GestureEnd::Click(ClickEvent::MultiSelectClick(NodeId(5)))
		);
	}

	#[test]
	fn leaving_the_dead_zone_starts_a_drag() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, Some(NodeId(0)), ClickIntent::Select, &mut orbit);
		let outcome = machine.pointer_move(Vec2::new(6.0, 0.0), &orbit);
		assert_eq!(
			outcome,
			MoveOutcome::DragTo {
				node: NodeId(0),
				pointer: Vec2::new(6.0, 0.0)
			}
		);
		assert_eq!(machine.dragged_node(), Some(NodeId(0)));
		// coming back inside the dead-zone keeps dragging
		assert!(matches!(
			machine.pointer_move(Vec2::new(1.0, 0.0), &orbit),
			MoveOutcome::DragTo { .. }
		));
		assert_eq!(
			machine.pointer_up(Vec2::new(1.0, 0.0), &mut orbit),
			GestureEnd::DragEnded(NodeId(0))
		);
		assert_eq!(machine.dragged_node(), None);
	}

	#[test]
	fn background_click_deselects() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, None, ClickIntent::Select, &mut orbit);
		assert_eq!(machine.state(), InteractionState::CameraOrbit);
		assert!(orbit.is_enabled());
		assert_eq!(
			machine.pointer_up(Vec2::new(1.0, 1.0), &mut orbit),
			GestureEnd::Click(ClickEvent::Background)
		);
	}

	#[test]
	fn background_drag_orbits_without_deselecting() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, None, ClickIntent::Select, &mut orbit);
		assert_eq!(
			machine.pointer_move(Vec2::new(20.0, 0.0), &orbit),
			MoveOutcome::Orbit(Vec2::new(20.0, 0.0))
		);
		assert_eq!(
			machine.pointer_move(Vec2::new(25.0, 5.0), &orbit),
			MoveOutcome::Orbit(Vec2::new(5.0, 5.0))
		);
		assert_eq!(machine.pointer_up(Vec2::ZERO, &mut orbit), GestureEnd::OrbitEnded);
	}

	#[test]
	fn up_without_down_is_ignored() {
		let (mut machine, mut orbit) = setup();
		assert_eq!(machine.pointer_up(Vec2::ZERO, &mut orbit), GestureEnd::Ignored);
		assert_eq!(machine.pointer_move(Vec2::ONE, &orbit), MoveOutcome::Ignored);
	}

	#[test]
	fn cancel_releases_the_lock() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, Some(NodeId(1)), ClickIntent::Select, &mut orbit);
		machine.pointer_move(Vec2::new(50.0, 0.0), &orbit);
		assert_eq!(machine.pointer_cancel(&mut orbit), Some(NodeId(1)));
		assert!(orbit.is_enabled());
		assert_eq!(machine.state(), InteractionState::Idle);
	}

	#[test]
	fn forgetting_the_pressed_node_ends_the_session() {
		let (mut machine, mut orbit) = setup();
		machine.pointer_down(Vec2::ZERO, Some(NodeId(1)), ClickIntent::Select, &mut orbit);
		machine.forget_node(NodeId(2), &mut orbit);
		assert_eq!(machine.state(), InteractionState::Candidate);
		machine.forget_node(NodeId(1), &mut orbit);
		assert_eq!(machine.state(), InteractionState::Idle);
	}
}
