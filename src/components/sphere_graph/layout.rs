use std::f32::consts::PI;

use glam::Vec3;

/// Spiral layout covering the sphere roughly uniformly. Deterministic in `n`.
pub fn spiral_positions(n: usize, radius: f32) -> Vec<Vec3> {
	let count = n as f32;
	(0..n)
		.map(|i| {
			// latitude, then longitude winding with it
			let phi = (-1.0 + 2.0 * i as f32 / count).clamp(-1.0, 1.0).acos();
			let theta = (count * PI).sqrt() * phi;
			Vec3::new(
				radius * theta.cos() * phi.sin(),
				radius * theta.sin() * phi.sin(),
				radius * phi.cos(),
			)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_position_lies_on_the_sphere() {
		for p in spiral_positions(50, 100.0) {
			assert!((p.length() - 100.0).abs() < 1e-3, "{p:?}");
		}
	}

	#[test]
	fn same_count_gives_same_layout() {
		assert_eq!(spiral_positions(10, 100.0), spiral_positions(10, 100.0));
	}

	#[test]
	fn first_node_sits_on_the_south_pole() {
		let first = spiral_positions(10, 100.0)[0];
		assert!((first - Vec3::new(0.0, 0.0, -100.0)).length() < 1e-3);
	}

	#[test]
	fn positions_are_distinct() {
		let points = spiral_positions(10, 100.0);
		for (i, a) in points.iter().enumerate() {
			for b in &points[i + 1..] {
				assert!(a.distance(*b) > 1.0);
			}
		}
	}

	#[test]
	fn zero_nodes_is_empty() {
		assert!(spiral_positions(0, 100.0).is_empty());
	}
}
