mod arc;
mod camera;
mod component;
mod graph;
mod interaction;
mod layout;
mod mutation;
mod orientation;
mod picking;
mod render;
mod resources;
mod scene;
mod selection;
mod state;
mod types;

pub use arc::{ArcParams, LinkGeometry, LinkGeometryCache, great_circle_points};
pub use camera::{CameraReset, CameraView, OrbitControl, OrbitController, PerspectiveCamera};
pub use component::SphereGraphCanvas;
pub use graph::{Graph, GraphError};
pub use interaction::{ClickIntent, InteractionState};
pub use layout::spiral_positions;
pub use orientation::billboard_rotation;
pub use scene::{NodeStatus, NodeTransform, SceneContainer, SceneOp, SceneSync};
pub use selection::SelectionStore;
pub use state::{SphereGraphState, describe_nodes};
pub use types::{GraphData, GraphLink, GraphNode, Link, Node, NodeId, SphereConfig};
