use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::interaction::ClickIntent;
use super::render::{self, CanvasScene};
use super::resources::RenderResources;
use super::state::{SphereGraphState, describe_nodes};
use super::types::{GraphData, NodeId, SphereConfig};

type SharedState = Rc<RefCell<Option<SphereGraphState>>>;
type SharedScene = Rc<RefCell<CanvasScene>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Vec2> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Vec2::new(
		(ev.client_x() as f64 - rect.left()) as f32,
		(ev.client_y() as f64 - rect.top()) as f32,
	))
}

/// Pushes pending changes into the retained scene and publishes the state panel snapshots.
fn sync(
	state: &mut SphereGraphState,
	scene: &SharedScene,
	selected: RwSignal<Vec<NodeId>>,
	dragged: RwSignal<Option<NodeId>>,
) {
	state.apply_changes(&mut *scene.borrow_mut());
	let now_selected = state.selected_nodes();
	if selected.get_untracked() != now_selected {
		selected.set(now_selected);
	}
	let now_dragged = state.dragged_node();
	if dragged.get_untracked() != now_dragged {
		dragged.set(now_dragged);
	}
}

/// Interactive sphere graph on a canvas, with Add / Delete / Reset controls and a state panel.
#[component]
pub fn SphereGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = SphereConfig::default())] config: SphereConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let scene: SharedScene = Rc::new(RefCell::new(CanvasScene::default()));
	let resources = Rc::new(RenderResources::new(config.node_radius));
	let selected = RwSignal::new(Vec::<NodeId>::new());
	let dragged = RwSignal::new(None::<NodeId>);

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let key_cb: Rc<RefCell<Option<Closure<dyn FnMut(KeyboardEvent)>>>> =
		Rc::new(RefCell::new(None));
	let (state_init, scene_init, animate_init, resize_cb_init, key_cb_init) = (
		state.clone(),
		scene.clone(),
		animate.clone(),
		resize_cb.clone(),
		key_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Ok(Some(ctx)) = canvas.get_context("2d") else {
			return;
		};
		let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
			return;
		};

		let mut session = SphereGraphState::new(&data.get(), config.clone(), w, h);
		*scene_init.borrow_mut() = CanvasScene::default();
		sync(&mut session, &scene_init, selected, dragged);
		*state_init.borrow_mut() = Some(session);

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if key_cb_init.borrow().is_none() {
			let (state_key, scene_key) = (state_init.clone(), scene_init.clone());
			*key_cb_init.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
				if !matches!(ev.key().as_str(), "Delete" | "Backspace") {
					return;
				}
				if let Some(ref mut s) = *state_key.borrow_mut() {
					let removed = s.delete_selected_nodes();
					if !removed.is_empty() {
						ev.prevent_default();
					}
					sync(s, &scene_key, selected, dragged);
				}
			}));
			if let Some(ref cb) = *key_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, scene_anim, resources_anim, animate_inner) = (
			state_init.clone(),
			scene_init.clone(),
			resources.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(
					&scene_anim.borrow(),
					s.camera(),
					s.config().radius,
					&resources_anim,
					&ctx,
				);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_md, scene_md) = (state.clone(), scene.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(pos) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(pos, ClickIntent::from_modifiers(ev.shift_key()));
			sync(s, &scene_md, selected, dragged);
		}
	};

	let (state_mm, scene_mm) = (state.clone(), scene.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(pos) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(pos);
			sync(s, &scene_mm, selected, dragged);
		}
	};

	let (state_mu, scene_mu) = (state.clone(), scene.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some(pos) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up(pos);
			sync(s, &scene_mu, selected, dragged);
		}
	};

	let (state_ml, scene_ml) = (state.clone(), scene.clone());
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_cancel();
			sync(s, &scene_ml, selected, dragged);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	let (state_add, scene_add) = (state.clone(), scene.clone());
	let on_add = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_add.borrow_mut() {
			let id = s.add_node();
			debug!("add button created node {}", id.0);
			sync(s, &scene_add, selected, dragged);
		}
	};

	let (state_del, scene_del) = (state.clone(), scene.clone());
	let on_delete = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_del.borrow_mut() {
			s.delete_selected_nodes();
			sync(s, &scene_del, selected, dragged);
		}
	};

	let state_reset = state.clone();
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_reset.borrow_mut() {
			s.reset_camera_position();
		}
	};

	view! {
		<div class="sphere-graph">
			<canvas
				node_ref=canvas_ref
				class="sphere-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<button on:click=on_add>"Add Node"</button>
				<button on:click=on_delete>"Delete Selected"</button>
				<button on:click=on_reset>"Reset Camera"</button>
			</div>
			<div class="graph-state">
				<h3>"State Information"</h3>
				<p>
					<strong>"Selected Nodes: "</strong>
					{move || describe_nodes(&selected.get())}
				</p>
				<p>
					<strong>"Dragged Node: "</strong>
					{move || {
						dragged.get().map(|id| id.to_string()).unwrap_or_else(|| "None".into())
					}}
				</p>
			</div>
		</div>
	}
}
