mod aabb;
mod bvh;

pub use aabb::Aabb;
pub use bvh::{Bvh, BvhNode, BvhStats, RayHit};
