use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::arc::LinkGeometry;
use super::camera::{CameraView, PerspectiveCamera};
use super::resources::RenderResources;
use super::scene::{NodeStatus, NodeTransform, SceneContainer, SceneOp};
use super::types::{Link, NodeId};

#[derive(Clone, Copy, Debug)]
struct CanvasNode {
	transform: NodeTransform,
	status: NodeStatus,
	outlined: bool,
}

/// Retained scene the canvas paints every frame.
#[derive(Default)]
pub struct CanvasScene {
	nodes: BTreeMap<NodeId, CanvasNode>,
	links: HashMap<Link, Rc<LinkGeometry>>,
}

impl SceneContainer for CanvasScene {
	fn apply(&mut self, op: SceneOp) {
		match op {
			SceneOp::AddNode(id, transform, status) => {
				self.nodes.insert(
					id,
					CanvasNode {
						transform,
						status,
						outlined: false,
					},
				);
			}
			SceneOp::UpdateNode(id, transform) => {
				if let Some(node) = self.nodes.get_mut(&id) {
					node.transform = transform;
				}
			}
			SceneOp::SetStatus(id, status) => {
				if let Some(node) = self.nodes.get_mut(&id) {
					node.status = status;
				}
			}
			SceneOp::SetOutline(id, outlined) => {
				if let Some(node) = self.nodes.get_mut(&id) {
					node.outlined = outlined;
				}
			}
			SceneOp::RemoveNode(id) => {
				self.nodes.remove(&id);
			}
			SceneOp::AddLink(link, geometry) | SceneOp::UpdateLink(link, geometry) => {
				self.links.insert(link, geometry);
			}
			SceneOp::RemoveLink(link) => {
				self.links.remove(&link);
			}
		}
	}
}

pub fn render(
	scene: &CanvasScene,
	camera: &PerspectiveCamera,
	radius: f32,
	resources: &RenderResources,
	ctx: &CanvasRenderingContext2d,
) {
	let viewport = camera.viewport();
	let (width, height) = (viewport.x as f64, viewport.y as f64);
	ctx.set_fill_style_str(&resources.background);
	ctx.fill_rect(0.0, 0.0, width, height);

	let dash = js_sys::Array::of2(&JsValue::from_f64(4.0), &JsValue::from_f64(4.0));
	let _ = ctx.set_line_dash(&dash);
	draw_links(scene, camera, false, &resources.link_far, ctx);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	draw_sphere(camera, radius, resources, ctx);
	draw_links(scene, camera, true, &resources.link_near, ctx);
	draw_nodes(scene, camera, resources, ctx);
}

fn faces_camera(camera: &PerspectiveCamera, point: Vec3) -> bool {
	point.dot(camera.position - point) > 0.0
}

fn draw_sphere(
	camera: &PerspectiveCamera,
	radius: f32,
	resources: &RenderResources,
	ctx: &CanvasRenderingContext2d,
) {
	let Some(centre) = camera.project(Vec3::ZERO) else {
		return;
	};
	let distance = camera.depth(Vec3::ZERO);
	if distance <= radius {
		return;
	}
	// silhouette of a sphere under perspective
	let apparent = radius * distance / (distance * distance - radius * radius).sqrt();
	let screen_radius = (apparent * camera.pixels_per_unit(distance)) as f64;

	ctx.begin_path();
	let _ = ctx.arc(centre.x as f64, centre.y as f64, screen_radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&resources.sphere_fill);
	ctx.fill();
	ctx.set_stroke_style_str(&resources.sphere_stroke);
	ctx.set_line_width(1.0);
	ctx.stroke();
}

fn stroke_curve(curve: &[Vec3], camera: &PerspectiveCamera, ctx: &CanvasRenderingContext2d) {
	let mut started = false;
	ctx.begin_path();
	for &point in curve {
		match camera.project(point) {
			Some(p) if started => ctx.line_to(p.x as f64, p.y as f64),
			Some(p) => {
				ctx.move_to(p.x as f64, p.y as f64);
				started = true;
			}
			None => started = false,
		}
	}
	ctx.stroke();
}

fn link_width(geometry: &LinkGeometry, camera: &PerspectiveCamera) -> f64 {
	let mid = geometry.curve[geometry.curve.len() / 2];
	((2.0 * geometry.tube_radius * camera.pixels_per_unit(camera.depth(mid))) as f64).max(1.0)
}

/// Strokes the stretches of each link curve on one hemisphere, split where the arc crosses the
/// horizon.
fn draw_links(
	scene: &CanvasScene,
	camera: &PerspectiveCamera,
	front: bool,
	color: &str,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_stroke_style_str(color);
	for geometry in scene.links.values() {
		if geometry.curve.is_empty() {
			continue;
		}
		ctx.set_line_width(link_width(geometry, camera));
		let mut run: Vec<Vec3> = Vec::new();
		for &point in &geometry.curve {
			if faces_camera(camera, point) == front {
				run.push(point);
				continue;
			}
			if run.len() > 1 {
				stroke_curve(&run, camera, ctx);
			}
			run.clear();
		}
		if run.len() > 1 {
			stroke_curve(&run, camera, ctx);
		}
	}
}

fn icon_corners(
	transform: &NodeTransform,
	half: f32,
	camera: &PerspectiveCamera,
) -> Option<[Vec2; 4]> {
	let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
		.map(|(x, y)| transform.position + transform.rotation * Vec3::new(x * half, y * half, 0.0));
	let a = camera.project(corners[0])?;
	let b = camera.project(corners[1])?;
	let c = camera.project(corners[2])?;
	let d = camera.project(corners[3])?;
	Some([a, b, c, d])
}

fn trace_polygon(points: &[Vec2; 4], ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	ctx.move_to(points[0].x as f64, points[0].y as f64);
	for p in &points[1..] {
		ctx.line_to(p.x as f64, p.y as f64);
	}
	ctx.close_path();
}

fn draw_nodes(
	scene: &CanvasScene,
	camera: &PerspectiveCamera,
	resources: &RenderResources,
	ctx: &CanvasRenderingContext2d,
) {
	// painter's order: farthest first
	let mut nodes: Vec<(&NodeId, &CanvasNode)> = scene.nodes.iter().collect();
	nodes.sort_by(|a, b| {
		camera
			.depth(b.1.transform.position)
			.total_cmp(&camera.depth(a.1.transform.position))
	});

	for (id, node) in nodes {
		let position = node.transform.position;
		let alpha = if faces_camera(camera, position) {
			1.0
		} else {
			resources.far_alpha
		};
		ctx.set_global_alpha(alpha);

		if let Some(quad) = icon_corners(&node.transform, resources.icon_half_size, camera) {
			trace_polygon(&quad, ctx);
			ctx.set_fill_style_str(resources.node_color(node.status));
			ctx.fill();
		}

		if node.outlined {
			let half = resources.icon_half_size * resources.outline_scale;
			if let Some(quad) = icon_corners(&node.transform, half, camera) {
				trace_polygon(&quad, ctx);
				ctx.set_stroke_style_str(&resources.outline);
				ctx.set_line_width(2.0);
				ctx.stroke();
			}
		}

		if let Some(p) = camera.project(position) {
			let scale = camera.pixels_per_unit(camera.depth(position));
			let offset = (resources.icon_half_size * scale) as f64;
			ctx.set_fill_style_str(&resources.label);
			ctx.set_font(&format!("{}px sans-serif", resources.font_px));
			let _ = ctx.fill_text(&id.to_string(), p.x as f64 + offset + 3.0, p.y as f64 + 3.0);
		}
		ctx.set_global_alpha(1.0);
	}
}
