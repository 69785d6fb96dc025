pub mod sphere_graph;
