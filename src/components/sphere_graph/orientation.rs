//! Outward-facing billboard rotation for node icons.

use glam::{Mat3, Quat, Vec3};

/// Global "up" the icons stay upright against.
pub const GLOBAL_UP: Vec3 = Vec3::Y;
/// Used instead of [`GLOBAL_UP`] when a node sits on the up axis.
pub const ALTERNATE_UP: Vec3 = Vec3::X;

const DEGENERATE_EPSILON: f32 = 1e-6;

/// Orthonormal frame of an icon: `normal` points away from the sphere centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
	/// Icon local +X.
	pub right: Vec3,
	/// Icon local +Y.
	pub up: Vec3,
	/// Icon local +Z, facing outward.
	pub normal: Vec3,
}

impl Basis {
	/// Frame for an icon at `position`.
	pub fn facing_out(position: Vec3) -> Self {
		let normal = position.try_normalize().unwrap_or(Vec3::Z);
		let mut right = GLOBAL_UP.cross(normal);
		if right.length_squared() < DEGENERATE_EPSILON {
			right = ALTERNATE_UP.cross(normal);
		}
		let right = right.normalize();
		let up = normal.cross(right);
		Self { right, up, normal }
	}

	/// Rotation taking icon-local axes onto this frame.
	pub fn rotation(&self) -> Quat {
		Quat::from_mat3(&Mat3::from_cols(self.right, self.up, self.normal)).normalize()
	}
}

/// Rotation for the icon of a node at `position`.
pub fn billboard_rotation(position: Vec3) -> Quat {
	Basis::facing_out(position).rotation()
}
