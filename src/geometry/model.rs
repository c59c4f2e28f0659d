use std::cell::OnceCell;

use tracing::{debug, info};

use crate::color::ColorPalette;
use crate::error::{GeometryError, Result};
use crate::math::{Point3, Ray, Vector3};
use crate::spatial::{Aabb, Bvh, RayHit};
use crate::topology::PolyhedronData;
use crate::traversal::{flood_fill, Inclusion};

use super::state::{GeometryState, Snapshot};
use super::{ColorIndex, GeometryParams, RenderBuffers, Triangle};

/// The paintable mesh: a triangle soup with its render buffers, picking
/// index, connectivity and color palette.
///
/// Triangle indices are stable for the lifetime of a loaded mesh; only
/// colors change between loads. Painting patches the color buffer in place.
/// The BVH is rebuilt on load and whenever a restored state changes the
/// triangle corners. Connectivity is built lazily on first use.
///
/// An empty geometry is valid: ray queries miss, flood fills return nothing
/// and the bounding box collapses to the origin.
#[derive(Debug, Default)]
pub struct Geometry {
    triangles: Vec<Triangle>,
    buffers: RenderBuffers,
    bvh: Bvh,
    palette: ColorPalette,
    polyhedron: OnceCell<PolyhedronData>,
    params: GeometryParams,
}

impl Geometry {
    /// Creates an empty geometry with the default palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a geometry from a triangle soup with default parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any triangle has a non-finite coordinate.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Result<Self> {
        Self::with_params(triangles, GeometryParams::default())
    }

    /// Builds a geometry from a triangle soup.
    ///
    /// # Errors
    ///
    /// Returns an error if any triangle has a non-finite coordinate.
    pub fn with_params(triangles: Vec<Triangle>, params: GeometryParams) -> Result<Self> {
        let mut geometry = Self {
            params,
            ..Self::default()
        };
        geometry.load(triangles)?;
        Ok(geometry)
    }

    /// Replaces the whole triangle soup and rebuilds every derived structure.
    ///
    /// The palette is kept. On error the geometry is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if any triangle has a non-finite coordinate.
    pub fn load(&mut self, triangles: Vec<Triangle>) -> Result<()> {
        if let Some(triangle) = triangles.iter().position(|t| !t.is_finite()) {
            return Err(GeometryError::NonFiniteVertex { triangle }.into());
        }

        self.triangles = triangles;
        self.rebuild_buffers();
        self.rebuild_spatial();

        info!(
            triangles = self.triangles.len(),
            min = ?self.bounding_box_min(),
            max = ?self.bounding_box_max(),
            "Loaded geometry"
        );
        Ok(())
    }

    fn rebuild_buffers(&mut self) {
        self.buffers = RenderBuffers::build(&self.triangles);
        debug_assert_eq!(self.buffers.len(), self.triangles.len() * 3);
    }

    fn rebuild_spatial(&mut self) {
        self.bvh = Bvh::build(&self.triangles, self.params.bvh_max_leaf_size);
        self.polyhedron = OnceCell::new();
        let stats = self.bvh.stats();
        debug!(
            leaves = stats.leaf_count,
            depth = stats.max_depth,
            "Built BVH"
        );
    }

    /// Parameters this geometry was built with.
    #[must_use]
    pub fn params(&self) -> &GeometryParams {
        &self.params
    }

    // --- Triangle store ---

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// All triangles, in index order.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the triangle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn triangle(&self, index: usize) -> &Triangle {
        assert!(
            index < self.triangles.len(),
            "triangle {index} out of range ({})",
            self.triangles.len()
        );
        &self.triangles[index]
    }

    /// Returns the color index of the triangle at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn triangle_color(&self, index: usize) -> ColorIndex {
        self.triangle(index).color()
    }

    /// Paints one triangle, patching its three color-buffer slots.
    ///
    /// Neither the BVH nor connectivity depend on color, so nothing else is
    /// rebuilt.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    pub fn set_triangle_color(&mut self, index: usize, color: ColorIndex) {
        assert!(
            index < self.triangles.len(),
            "triangle {index} out of range ({})",
            self.triangles.len()
        );
        self.triangles[index].set_color(color);
        self.buffers.set_triangle_color(index, color);
    }

    /// Paints every listed triangle with one color.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn paint_triangles(&mut self, indices: &[usize], color: ColorIndex) {
        for &index in indices {
            self.set_triangle_color(index, color);
        }
    }

    // --- Render buffers ---

    /// All render buffers.
    #[must_use]
    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// Vertex positions, three per triangle.
    #[must_use]
    pub fn vertex_buffer(&self) -> &[Point3] {
        self.buffers.vertices()
    }

    /// Identity index buffer.
    #[must_use]
    pub fn index_buffer(&self) -> &[u32] {
        self.buffers.indices()
    }

    /// Per-vertex color indices.
    #[must_use]
    pub fn color_buffer(&self) -> &[ColorIndex] {
        self.buffers.colors()
    }

    /// Per-vertex flat normals.
    #[must_use]
    pub fn normal_buffer(&self) -> &[Vector3] {
        self.buffers.normals()
    }

    // --- Spatial queries ---

    /// Bounding box of the mesh, `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.bvh.root_bbox().copied()
    }

    /// Minimum corner of the bounding box, the origin when empty.
    #[must_use]
    pub fn bounding_box_min(&self) -> Point3 {
        self.bounding_box().map_or_else(Point3::origin, |b| b.min)
    }

    /// Maximum corner of the bounding box, the origin when empty.
    #[must_use]
    pub fn bounding_box_max(&self) -> Point3 {
        self.bounding_box().map_or_else(Point3::origin, |b| b.max)
    }

    /// Index of the closest triangle hit by the ray.
    ///
    /// Hits at exactly equal distance resolve to the lowest triangle index.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<usize> {
        self.intersect_hit(ray).map(|hit| hit.triangle)
    }

    /// Closest hit along the ray, with its distance.
    #[must_use]
    pub fn intersect_hit(&self, ray: &Ray) -> Option<RayHit> {
        self.bvh.intersect(ray, &self.triangles, self.params.ray_epsilon)
    }

    // --- Connectivity ---

    /// Connectivity data, built on first access.
    #[must_use]
    pub fn polyhedron(&self) -> &PolyhedronData {
        self.polyhedron
            .get_or_init(|| PolyhedronData::build(&self.triangles))
    }

    /// Returns `true` if flood fill and segmentation may be used.
    #[must_use]
    pub fn is_adjacency_valid(&self) -> bool {
        self.polyhedron().is_valid()
    }

    /// Returns `true` if the welded mesh has no boundary.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.polyhedron().is_closed()
    }

    /// Number of distinct vertex positions.
    #[must_use]
    pub fn welded_vertex_count(&self) -> usize {
        self.polyhedron().vertices().len()
    }

    /// Triangles across edges 0-1, 1-2 and 2-0 of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= triangle_count()`.
    #[must_use]
    pub fn neighbors_of(&self, index: usize) -> [Option<usize>; 3] {
        self.polyhedron().neighbors_of(index)
    }

    /// Grows a region from `start` across edges while `predicate` accepts
    /// each step. See [`flood_fill`] for ordering guarantees.
    ///
    /// Returns an empty list when adjacency is not valid.
    ///
    /// # Panics
    ///
    /// Panics if adjacency is valid and `start >= triangle_count()`.
    pub fn bucket<P>(&self, start: usize, predicate: &P) -> Vec<usize>
    where
        P: Inclusion + ?Sized,
    {
        let polyhedron = self.polyhedron();
        if !polyhedron.is_valid() {
            return Vec::new();
        }
        flood_fill(polyhedron, start, predicate)
    }

    /// Predicate accepting triangles painted the same color as `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start >= triangle_count()`.
    pub fn same_color_as(&self, start: usize) -> impl Fn(usize, usize) -> bool + '_ {
        let color = self.triangle_color(start);
        move |candidate, _| self.triangles[candidate].color() == color
    }

    // --- Palette ---

    /// The color palette.
    #[must_use]
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Mutable access to the color palette.
    pub fn palette_mut(&mut self) -> &mut ColorPalette {
        &mut self.palette
    }

    // --- Snapshots ---

    /// Deep copy of the triangles and palette.
    #[must_use]
    pub fn save_state(&self) -> GeometryState {
        GeometryState {
            triangles: self.triangles.clone(),
            palette: self.palette.clone(),
        }
    }

    /// Restores a saved state.
    ///
    /// Render buffers are always rebuilt. The BVH and connectivity are
    /// rebuilt only when the saved triangle corners differ from the current
    /// ones.
    pub fn restore_state(&mut self, state: &GeometryState) {
        let shape_changed = self.triangles.len() != state.triangles.len()
            || self
                .triangles
                .iter()
                .zip(&state.triangles)
                .any(|(a, b)| !a.same_shape(b));

        self.triangles.clone_from(&state.triangles);
        self.palette.clone_from(&state.palette);
        self.rebuild_buffers();
        if shape_changed {
            self.rebuild_spatial();
        }

        debug!(
            triangles = self.triangles.len(),
            shape_changed, "Restored geometry state"
        );
    }
}

impl Snapshot for Geometry {
    type State = GeometryState;

    fn save_state(&self) -> GeometryState {
        Geometry::save_state(self)
    }

    fn restore_state(&mut self, state: &GeometryState) {
        Geometry::restore_state(self, state);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MeshPaintError;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    /// Closed tetrahedron offset along X, outward winding.
    fn tetrahedron(offset: f64) -> Vec<Triangle> {
        let c = [
            p(offset, 0.0, 0.0),
            p(offset + 1.0, 0.0, 0.0),
            p(offset, 1.0, 0.0),
            p(offset, 0.0, 1.0),
        ];
        [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]
            .iter()
            .map(|&[a, b, d]| Triangle::new(c[a], c[b], c[d], 0))
            .collect()
    }

    #[test]
    fn empty_geometry_degrades_gracefully() {
        let geometry = Geometry::new();
        assert_eq!(geometry.triangle_count(), 0);
        assert!(geometry.vertex_buffer().is_empty());
        assert_eq!(geometry.bounding_box_min(), Point3::origin());
        assert_eq!(geometry.bounding_box_max(), Point3::origin());
        let ray = Ray::new(p(0.0, 0.0, 5.0), v(0.0, 0.0, -1.0));
        assert!(geometry.intersect(&ray).is_none());
        assert!(!geometry.is_adjacency_valid());
        assert!(geometry.bucket(0, &|_: usize, _: usize| true).is_empty());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut soup = tetrahedron(0.0);
        soup.push(Triangle::new(
            p(f64::INFINITY, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            0,
        ));
        let err = Geometry::from_triangles(soup).unwrap_err();
        assert!(matches!(
            err,
            MeshPaintError::Geometry(GeometryError::NonFiniteVertex { triangle: 4 })
        ));
    }

    #[test]
    fn failed_load_keeps_previous_mesh() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        let bad = vec![Triangle::new(
            p(f64::NAN, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            0,
        )];
        assert!(geometry.load(bad).is_err());
        assert_eq!(geometry.triangle_count(), 4);
    }

    #[test]
    fn bounding_box_spans_all_triangles() {
        let mut soup = tetrahedron(0.0);
        soup.extend(tetrahedron(5.0));
        let geometry = Geometry::from_triangles(soup).unwrap();
        assert_eq!(geometry.bounding_box_min(), p(0.0, 0.0, 0.0));
        assert_eq!(geometry.bounding_box_max(), p(6.0, 1.0, 1.0));
    }

    #[test]
    fn set_color_patches_only_its_slots() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        geometry.set_triangle_color(2, 3);
        assert_eq!(geometry.triangle_color(2), 3);
        assert_eq!(&geometry.color_buffer()[6..9], &[3, 3, 3]);
        for t in [0, 1, 3] {
            assert_eq!(geometry.triangle_color(t), 0);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_accessor_panics() {
        let geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        let _ = geometry.triangle(4);
    }

    #[test]
    fn normals_are_flat_per_triangle() {
        let geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        for (t, tri) in geometry.triangles().iter().enumerate() {
            let n = tri.normal();
            for slot in 0..3 {
                assert_eq!(geometry.normal_buffer()[3 * t + slot], n);
            }
        }
    }

    #[test]
    fn same_color_bucket_stops_at_color_border() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        geometry.paint_triangles(&[0, 1], 2);
        let predicate = geometry.same_color_as(0);
        let mut region = geometry.bucket(0, &predicate);
        region.sort_unstable();
        assert_eq!(region, vec![0, 1]);
    }

    #[test]
    fn color_only_restore_keeps_connectivity() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        assert!(geometry.is_adjacency_valid());
        let saved = geometry.save_state();
        geometry.set_triangle_color(0, 1);
        geometry.restore_state(&saved);
        // Connectivity was not reset, so no rebuild is pending
        assert!(geometry.polyhedron.get().is_some());
        assert_eq!(geometry.triangle_color(0), 0);
    }

    #[test]
    fn shape_restore_rebuilds_spatial_data() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        let saved = geometry.save_state();
        geometry.load(tetrahedron(10.0)).unwrap();
        assert!(geometry.is_adjacency_valid());

        geometry.restore_state(&saved);
        assert!(geometry.polyhedron.get().is_none());
        let ray = Ray::new(p(0.2, 0.2, -5.0), v(0.0, 0.0, 1.0));
        assert_eq!(geometry.intersect(&ray), Some(0));
        assert_eq!(geometry.bounding_box_max(), p(1.0, 1.0, 1.0));
    }

    #[test]
    fn snapshot_trait_round_trips_palette() {
        let mut geometry = Geometry::from_triangles(tetrahedron(0.0)).unwrap();
        let saved = Snapshot::save_state(&geometry);
        geometry.palette_mut().set_active_index(2).unwrap();
        Snapshot::restore_state(&mut geometry, &saved);
        assert_eq!(geometry.palette().active_index(), 0);
        assert_eq!(geometry.palette(), saved.palette());
    }
}
