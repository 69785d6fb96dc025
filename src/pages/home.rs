use leptos::prelude::*;

use crate::components::sphere_graph::{
	GraphData, GraphLink, NodeId, SphereConfig, SphereGraphCanvas,
};

/// Sample graph: a ring with a few chords so some nodes have two prerequisites.
fn generate_sample_data(n: u32) -> GraphData {
	let mut data = GraphData::ring(n);
	data.links.extend((0..n).step_by(4).map(|i| GraphLink {
		source: NodeId(i),
		target: NodeId((i + n / 2) % n),
	}));
	data
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// Create graph data signal
	let graph_data = Signal::derive(move || generate_sample_data(12));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<SphereGraphCanvas data=graph_data config=SphereConfig::default() fullscreen=true />
				<div class="graph-overlay">
					<h1>"Sphere Graph"</h1>
					<p class="subtitle">
						"Click to select, shift-click to add to the selection. Drag nodes across the sphere. Drag the background to orbit, scroll to zoom. Delete removes the selection."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
