use std::collections::HashSet;

use log::debug;

use super::types::NodeId;

/// What a completed click means for the selection, decided once at the input boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickEvent {
	/// Plain click on a node: select it alone.
	Click(NodeId),
	/// Modifier click on a node: toggle it.
	MultiSelectClick(NodeId),
	/// Click that hit no node: clear everything.
	Background,
}

/// Ids of the currently selected nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionStore {
	ids: HashSet<NodeId>,
}

impl SelectionStore {
	/// Empty selection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether `id` is selected.
	pub fn contains(&self, id: NodeId) -> bool {
		self.ids.contains(&id)
	}

	/// Number of selected ids.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Whether nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Iterates the selected ids in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.ids.iter().copied()
	}

	/// Selected ids, ascending.
	pub fn sorted(&self) -> Vec<NodeId> {
		let mut ids: Vec<_> = self.ids.iter().copied().collect();
		ids.sort();
		ids
	}

	/// Adds `id` if absent, removes it otherwise.
	pub fn toggle(&mut self, id: NodeId) {
		if !self.ids.remove(&id) {
			self.ids.insert(id);
		}
	}

	/// Makes `id` the only selected node.
	pub fn select_only(&mut self, id: NodeId) {
		self.ids.clear();
		self.ids.insert(id);
	}

	/// Deselects everything.
	pub fn clear(&mut self) {
		self.ids.clear();
	}

	/// Applies a click, returning whether the selection changed.
	pub fn apply(&mut self, click: ClickEvent) -> bool {
		let before = self.ids.clone();
		match click {
			ClickEvent::Click(id) => self.select_only(id),
			ClickEvent::MultiSelectClick(id) => self.toggle(id),
			ClickEvent::Background => self.clear(),
		}
		let changed = before != self.ids;
		if changed {
			debug!("selection now {:?}", self.sorted());
		}
		changed
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn click_replaces_selection() {
		let mut selection = SelectionStore::new();
		selection.apply(ClickEvent::Click(NodeId(1)));
		selection.apply(ClickEvent::Click(NodeId(2)));
		assert_eq!(selection.sorted(), vec![NodeId(2)]);
	}

	#[test]
	fn multi_select_click_accumulates() {
		let mut selection = SelectionStore::new();
		selection.apply(ClickEvent::Click(NodeId(3)));
		selection.apply(ClickEvent::MultiSelectClick(NodeId(5)));
		assert_eq!(selection.sorted(), vec![NodeId(3), NodeId(5)]);
	}

	#[test]
	fn background_clears() {
		let mut selection = SelectionStore::new();
		selection.apply(ClickEvent::Click(NodeId(3)));
		assert!(selection.apply(ClickEvent::Background));
		assert!(selection.is_empty());
		assert!(!selection.apply(ClickEvent::Background));
	}

	#[test]
	fn reclicking_the_only_selected_node_is_not_a_change() {
		let mut selection = SelectionStore::new();
		selection.apply(ClickEvent::Click(NodeId(4)));
		assert!(!selection.apply(ClickEvent::Click(NodeId(4))));
	}

	proptest! {
		#[test]
		fn toggling_twice_restores_selection(
			initial in proptest::collection::hash_set(0u32..20, 0..10),
			id in 0u32..20,
		) {
			let mut selection = SelectionStore::new();
			for i in initial {
				selection.toggle(NodeId(i));
			}
			let before = selection.clone();
			selection.apply(ClickEvent::MultiSelectClick(NodeId(id)));
			selection.apply(ClickEvent::MultiSelectClick(NodeId(id)));
			prop_assert_eq!(selection, before);
		}
	}
}
