//! Puzzle piece shapes and per-piece placement state.
//!
//! Each shape is a set of unit-cell offsets relative to the piece's pivot.
//! A `Piece` couples one shape with a continuous transform (position +
//! rotation) and the discrete side of its state: whether it is locked into
//! the grid and which cell indices it last occupied.

use glam::{IVec3, Quat, Vec3};

use crate::geometry::{ray_aabb_intersect, Ray};
use crate::grid::VoxelGrid;

/// The seven Soma pieces that must fit into a 3x3x3 cube.
///
/// Offsets are relative to each piece's pivot cell. Unit cells across all
/// seven shapes total 27, exactly filling the grid.
pub const SOMA_SHAPES: &[(&str, &[IVec3])] = &[
    // V: bent triple (3 cubes)
    ("V", &[IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)]),
    // L: row of three with a foot (4 cubes)
    (
        "L",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(2, 0, 0),
            IVec3::new(0, 1, 0),
        ],
    ),
    // T: row of three with a center stem (4 cubes)
    (
        "T",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(2, 0, 0),
            IVec3::new(1, 1, 0),
        ],
    ),
    // Z: offset rows (4 cubes)
    (
        "Z",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(1, 1, 0),
            IVec3::new(2, 1, 0),
        ],
    ),
    // A: left screw (4 cubes)
    (
        "A",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(0, 1, 0),
            IVec3::new(1, 0, 1),
        ],
    ),
    // B: right screw (4 cubes)
    (
        "B",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(0, 1, 0),
            IVec3::new(0, 1, 1),
        ],
    ),
    // P: branch (4 cubes)
    (
        "P",
        &[
            IVec3::new(0, 0, 0),
            IVec3::new(1, 0, 0),
            IVec3::new(0, 1, 0),
            IVec3::new(0, 0, 1),
        ],
    ),
];

/// One puzzle piece: a fixed shape plus its current placement state.
pub struct Piece {
    id: usize,
    name: &'static str,
    shape: Vec<IVec3>,
    /// Continuous-space position of the pivot.
    pub position: Vec3,
    /// Current orientation, accumulated from 90° steps.
    pub rotation: Quat,
    placed: bool,
    /// Grid indices this piece occupies; empty while unplaced.
    occupied: Vec<IVec3>,
}

impl Piece {
    /// Creates an unplaced piece at the world origin.
    ///
    /// A shape with zero offsets defaults to a single unit cell at the
    /// pivot.
    pub fn new(id: usize, name: &'static str, shape: &[IVec3]) -> Self {
        let shape = if shape.is_empty() {
            vec![IVec3::ZERO]
        } else {
            shape.to_vec()
        };
        Self {
            id,
            name,
            shape,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            placed: false,
            occupied: Vec::new(),
        }
    }

    /// One piece per Soma shape, in table order.
    pub fn standard_set() -> Vec<Piece> {
        SOMA_SHAPES
            .iter()
            .enumerate()
            .map(|(id, &(name, shape))| Piece::new(id, name, shape))
            .collect()
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &[IVec3] {
        &self.shape
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// The grid indices recorded at the last successful drop.
    pub fn occupied_cells(&self) -> &[IVec3] {
        &self.occupied
    }

    /// Grid indices each unit cell would land on under the current
    /// transform.
    ///
    /// One index per shape offset, in shape-definition order. Duplicates
    /// are possible when rounding collapses distinct offsets onto one cell;
    /// they are not filtered here.
    pub fn occupied_indices(&self, grid: &VoxelGrid) -> Vec<IVec3> {
        self.shape
            .iter()
            .map(|&offset| {
                let local = offset.as_vec3() * grid.cell_size();
                let cell_world = self.position + self.rotation * local;
                grid.world_to_index(cell_world)
            })
            .collect()
    }

    /// Frees every recorded cell and clears the placement state.
    ///
    /// This is the single transaction boundary for pickup: after it
    /// returns the piece is unplaced with no recorded cells, and exactly
    /// the previously recorded cells have been freed.
    pub fn pickup(&mut self, grid: &mut VoxelGrid) {
        for &index in &self.occupied {
            grid.free(index);
        }
        self.placed = false;
        self.occupied.clear();
    }

    /// Records a successful placement.
    pub(crate) fn mark_placed(&mut self, indices: Vec<IVec3>) {
        self.placed = true;
        self.occupied = indices;
    }

    /// Clears the placement state without touching the grid (failed drop).
    pub(crate) fn mark_unplaced(&mut self) {
        self.placed = false;
        self.occupied.clear();
    }

    /// Distance along `ray` to the nearest of this piece's unit cells, or
    /// `None` when the ray misses every cell.
    ///
    /// Each unit cell is tested as an axis-aligned box of edge `cell_size`
    /// around its transformed center.
    pub fn intersect_ray(&self, ray: &Ray, cell_size: f32) -> Option<f32> {
        let half = Vec3::splat(cell_size / 2.0);
        self.shape
            .iter()
            .filter_map(|&offset| {
                let local = offset.as_vec3() * cell_size;
                let center = self.position + self.rotation * local;
                ray_aabb_intersect(ray, center - half, center + half)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_total_27_cells() {
        let total: usize = SOMA_SHAPES.iter().map(|&(_, shape)| shape.len()).sum();
        assert_eq!(total, 27);
    }

    #[test]
    fn test_shape_offsets_are_unique() {
        for &(name, shape) in SOMA_SHAPES {
            let mut seen = shape.to_vec();
            seen.sort_by_key(|v| (v.x, v.y, v.z));
            seen.dedup();
            assert_eq!(seen.len(), shape.len(), "duplicate offset in shape {name}");
        }
    }

    #[test]
    fn test_empty_shape_defaults_to_single_cell() {
        let piece = Piece::new(0, "dot", &[]);
        assert_eq!(piece.shape(), &[IVec3::ZERO]);
    }

    #[test]
    fn test_occupied_indices_follow_translation() {
        let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
        let mut piece = Piece::new(0, "V", SOMA_SHAPES[0].1);
        // pivot on cell (0,0,0): centers at -1 per axis
        piece.position = grid.index_to_world_center(IVec3::ZERO);

        let indices = piece.occupied_indices(&grid);
        assert_eq!(
            indices,
            vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)]
        );
    }

    #[test]
    fn test_occupied_indices_follow_rotation() {
        let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
        let mut piece = Piece::new(0, "V", SOMA_SHAPES[0].1);
        piece.position = grid.index_to_world_center(IVec3::new(1, 1, 1));
        // 90° about +Z maps +X to +Y and +Y to -X
        piece.rotation = Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2);

        let indices = piece.occupied_indices(&grid);
        assert_eq!(
            indices,
            vec![IVec3::new(1, 1, 1), IVec3::new(1, 2, 1), IVec3::new(0, 1, 1)]
        );
    }

    #[test]
    fn test_occupied_indices_keep_collapsed_duplicates() {
        let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
        let mut piece = Piece::new(0, "V", SOMA_SHAPES[0].1);
        // off-lattice rotation sending +X along the cube diagonal, pivot
        // tucked into the corner of cell (1,1,1)'s rounding region: the
        // pivot and the +X cell land on the same index
        piece.rotation = Quat::from_rotation_arc(Vec3::X, Vec3::ONE.normalize());
        piece.position = grid.index_to_world_center(IVec3::splat(1)) + Vec3::splat(-0.45);

        let indices = piece.occupied_indices(&grid);
        assert_eq!(indices.len(), piece.shape().len());
        assert_eq!(indices[0], IVec3::splat(1));
        assert_eq!(indices[1], IVec3::splat(1));
    }

    #[test]
    fn test_pickup_frees_exactly_recorded_cells() {
        let mut grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
        let mut piece = Piece::new(0, "V", SOMA_SHAPES[0].1);
        let cells = vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)];
        for &cell in &cells {
            grid.occupy(cell);
        }
        // an unrelated cell stays occupied through pickup
        grid.occupy(IVec3::new(2, 2, 2));
        piece.mark_placed(cells.clone());

        piece.pickup(&mut grid);

        assert!(!piece.is_placed());
        assert!(piece.occupied_cells().is_empty());
        for &cell in &cells {
            assert!(grid.is_empty(cell));
        }
        assert!(!grid.is_empty(IVec3::new(2, 2, 2)));
    }

    #[test]
    fn test_intersect_ray_reports_nearest_cell() {
        let mut piece = Piece::new(0, "L", SOMA_SHAPES[1].1);
        piece.position = Vec3::ZERO;
        // ray along +X skims through the row of three cells
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let t = piece.intersect_ray(&ray, 1.0).unwrap();
        // nearest face of the pivot cell is at x = -0.5
        assert!((t - 4.5).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert_eq!(piece.intersect_ray(&miss, 1.0), None);
    }
}
