//! Bounding volume hierarchy over the triangle soup, used for picking.

use smallvec::SmallVec;

use crate::geometry::Triangle;
use crate::math::{ray_triangle_intersect, Ray, Vector3};

use super::aabb::Aabb;

/// The closest triangle hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index of the triangle that was hit.
    pub triangle: usize,
    /// Ray parameter of the hit point.
    pub distance: f64,
}

impl RayHit {
    /// Nearer hit wins; exactly equal distances go to the lower triangle index.
    #[allow(clippy::float_cmp)]
    fn closer_than(&self, other: &Self) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance && self.triangle < other.triangle)
    }
}

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[usize; 8]>,
    },
    /// Internal node with two children.
    Internal {
        bbox: Aabb,
        left: Box<Self>,
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Returns the bounding box of this node.
    #[must_use]
    pub fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding volume hierarchy over a triangle soup.
///
/// Built once from the full triangle list and read-only afterwards. Color
/// changes do not affect it; any change of triangle corners requires a new
/// build before the next query.
#[derive(Debug, Default)]
pub struct Bvh {
    /// Root node (`None` for an empty soup).
    root: Option<BvhNode>,
    triangle_count: usize,
}

impl Bvh {
    /// Builds a BVH, splitting at the median along the longest axis until a
    /// node holds at most `max_leaf_size` triangles.
    #[must_use]
    pub fn build(triangles: &[Triangle], max_leaf_size: usize) -> Self {
        if triangles.is_empty() {
            return Self::default();
        }

        let bounds: Vec<Aabb> = triangles
            .iter()
            .map(|tri| Aabb::from_points(tri.vertices()))
            .collect();

        let indices: Vec<usize> = (0..triangles.len()).collect();
        let root = Self::build_recursive(&bounds, indices, max_leaf_size.max(1));

        Self {
            root: Some(root),
            triangle_count: triangles.len(),
        }
    }

    fn build_recursive(bounds: &[Aabb], mut indices: Vec<usize>, max_leaf_size: usize) -> BvhNode {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&bounds[i]);
        }

        if indices.len() <= max_leaf_size {
            return BvhNode::Leaf {
                bbox,
                triangles: indices.into_iter().collect(),
            };
        }

        let axis = bbox.longest_axis();
        indices.sort_by(|&a, &b| {
            let ca = bounds[a].center()[axis];
            let cb = bounds[b].center()[axis];
            ca.total_cmp(&cb)
        });

        let right_indices = indices.split_off(indices.len() / 2);
        let left = Self::build_recursive(bounds, indices, max_leaf_size);
        let right = Self::build_recursive(bounds, right_indices, max_leaf_size);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Finds the closest triangle hit along the ray's positive direction.
    ///
    /// `triangles` must be the same soup the BVH was built from.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, triangles: &[Triangle], epsilon: f64) -> Option<RayHit> {
        let root = self.root.as_ref()?;
        let inv_dir = ray.inverse_direction();
        let mut best = None;
        Self::trace(root, ray, &inv_dir, triangles, epsilon, &mut best);
        best
    }

    fn trace(
        node: &BvhNode,
        ray: &Ray,
        inv_dir: &Vector3,
        triangles: &[Triangle],
        epsilon: f64,
        best: &mut Option<RayHit>,
    ) {
        let Some((t_near, _)) = node.bbox().ray_intersect(ray, inv_dir) else {
            return;
        };
        // Equal distance is still explored so ties resolve by index
        if best.is_some_and(|hit| t_near > hit.distance) {
            return;
        }

        match node {
            BvhNode::Leaf { triangles: leaf, .. } => {
                for &index in leaf {
                    let [v0, v1, v2] = triangles[index].vertices();
                    let Some(distance) = ray_triangle_intersect(ray, v0, v1, v2, epsilon) else {
                        continue;
                    };
                    let hit = RayHit {
                        triangle: index,
                        distance,
                    };
                    if best.map_or(true, |current| hit.closer_than(&current)) {
                        *best = Some(hit);
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                Self::trace(left, ray, inv_dir, triangles, epsilon, best);
                Self::trace(right, ray, inv_dir, triangles, epsilon, best);
            }
        }
    }

    /// Number of triangles indexed.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Bounding box of the whole soup, `None` when empty.
    #[must_use]
    pub fn root_bbox(&self) -> Option<&Aabb> {
        self.root.as_ref().map(BvhNode::bbox)
    }

    /// Collects statistics about the tree shape.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if let Some(ref root) = self.root {
            Self::collect_stats(root, 0, &mut stats);
        }
        stats
    }

    fn collect_stats(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match node {
            BvhNode::Leaf { triangles, .. } => {
                stats.leaf_count += 1;
                stats.total_triangles_in_leaves += triangles.len();
            }
            BvhNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, depth + 1, stats);
                Self::collect_stats(right, depth + 1, stats);
            }
        }
    }
}

/// Statistics about BVH structure.
#[derive(Debug, Default, Clone)]
pub struct BvhStats {
    pub internal_count: usize,
    pub leaf_count: usize,
    pub max_depth: usize,
    pub total_triangles_in_leaves: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    /// A row of unit triangles in the z = 0 plane, one per x offset.
    fn strip(count: usize) -> Vec<Triangle> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64 * 2.0;
                Triangle::new(p(x, 0.0, 0.0), p(x + 1.0, 0.0, 0.0), p(x, 1.0, 0.0), 0)
            })
            .collect()
    }

    #[test]
    fn empty_bvh_never_hits() {
        let bvh = Bvh::build(&[], 4);
        assert!(bvh.is_empty());
        assert!(bvh.root_bbox().is_none());
        let ray = Ray::new(p(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(bvh.intersect(&ray, &[], 1e-9).is_none());
    }

    #[test]
    fn every_triangle_lands_in_a_leaf() {
        let tris = strip(37);
        let bvh = Bvh::build(&tris, 4);
        let stats = bvh.stats();
        assert_eq!(stats.total_triangles_in_leaves, 37);
        assert!(stats.internal_count > 0);
        assert_eq!(bvh.triangle_count(), 37);
    }

    #[test]
    fn finds_each_triangle_in_a_strip() {
        let tris = strip(20);
        let bvh = Bvh::build(&tris, 2);
        for (i, tri) in tris.iter().enumerate() {
            let c = tri.centroid();
            let ray = Ray::new(p(c.x, c.y, 10.0), Vector3::new(0.0, 0.0, -1.0));
            let hit = bvh.intersect(&ray, &tris, 1e-9).unwrap();
            assert_eq!(hit.triangle, i);
            assert_relative_eq!(hit.distance, 10.0);
        }
    }

    #[test]
    fn closest_of_stacked_triangles_wins() {
        let tris: Vec<Triangle> = [0.0, 3.0, 1.0, 2.0]
            .iter()
            .map(|&z| Triangle::new(p(0.0, 0.0, z), p(1.0, 0.0, z), p(0.0, 1.0, z), 0))
            .collect();
        let bvh = Bvh::build(&tris, 1);
        let ray = Ray::new(p(0.2, 0.2, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = bvh.intersect(&ray, &tris, 1e-9).unwrap();
        assert_eq!(hit.triangle, 1);
        assert_relative_eq!(hit.distance, 7.0);
    }

    #[test]
    fn equal_distance_tie_goes_to_lowest_index() {
        let tri = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), 0);
        let tris = vec![tri.clone(), tri.clone(), tri];
        let bvh = Bvh::build(&tris, 1);
        let ray = Ray::new(p(0.2, 0.2, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(bvh.intersect(&ray, &tris, 1e-9).unwrap().triangle, 0);
    }

    #[test]
    fn ray_away_from_geometry_misses() {
        let tris = strip(5);
        let bvh = Bvh::build(&tris, 2);
        let ray = Ray::new(p(0.2, 0.2, 1.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(bvh.intersect(&ray, &tris, 1e-9).is_none());
    }
}
