use super::scene::NodeStatus;

/// Colours and sizes shared by everything the canvas draws.
///
/// Built once when the component mounts and passed to the renderer explicitly.
#[derive(Clone, Debug)]
pub struct RenderResources {
	/// Canvas clear colour.
	pub background: String,
	/// Fill of the sphere disc.
	pub sphere_fill: String,
	/// Rim of the sphere disc.
	pub sphere_stroke: String,
	/// Links on the hemisphere facing the camera.
	pub link_near: String,
	/// Links on the far hemisphere, drawn dashed.
	pub link_far: String,
	/// Fill of selected nodes.
	pub selected: String,
	/// Fill of nodes whose prerequisites are all selected.
	pub ready: String,
	/// Fill of nodes still waiting on a prerequisite.
	pub locked: String,
	/// Selection outline.
	pub outline: String,
	/// Node labels.
	pub label: String,
	/// Icon half-size in world units.
	pub icon_half_size: f32,
	/// Outline half-size relative to the icon.
	pub outline_scale: f32,
	/// Label font size in pixels.
	pub font_px: f64,
	/// Alpha applied to anything on the far hemisphere.
	pub far_alpha: f64,
}

impl RenderResources {
	/// Resources sized for icons of `node_radius`.
	pub fn new(node_radius: f32) -> Self {
		Self {
			background: "#1a1a2e".into(),
			sphere_fill: "rgba(0, 0, 0, 0.2)".into(),
			sphere_stroke: "rgba(100, 180, 255, 0.25)".into(),
			link_near: "rgba(255, 255, 255, 0.5)".into(),
			link_far: "rgba(255, 255, 255, 0.15)".into(),
			selected: "#2ca02c".into(),
			ready: "#bcbd22".into(),
			locked: "#7f7f7f".into(),
			outline: "rgba(255, 255, 255, 0.9)".into(),
			label: "rgba(255, 255, 255, 0.8)".into(),
			icon_half_size: node_radius,
			outline_scale: 1.4,
			font_px: 11.0,
			far_alpha: 0.3,
		}
	}

	/// Fill colour for a node in `status`.
	pub fn node_color(&self, status: NodeStatus) -> &str {
		match status {
			NodeStatus::Selected => &self.selected,
			NodeStatus::Ready => &self.ready,
			NodeStatus::Locked => &self.locked,
		}
	}
}
