pub mod ray;

pub use ray::{ray_triangle_intersect, Ray};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;
