//! Voxel grid: the discrete occupancy model and the continuous↔discrete
//! coordinate transforms.
//!
//! The grid is a flat boolean array over `width × height × depth` cells.
//! The grid as a whole is centered on its `origin`, so the continuous-space
//! center of cell (0,0,0) is offset by `-total/2 + cell_size/2` per axis.
//!
//! Index order is x-major: `slot = x * height * depth + y * depth + z`.

use glam::{IVec3, Vec3};
use log::warn;
use std::fmt;

/// Fatal grid configuration error, reported to the caller at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridConfigError {
    /// Cell edge length must be strictly positive.
    NonPositiveCellSize(f32),
    /// Every dimension must be at least one cell.
    ZeroDimension,
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridConfigError::NonPositiveCellSize(size) => {
                write!(f, "cell size must be > 0, got {size}")
            }
            GridConfigError::ZeroDimension => {
                write!(f, "grid dimensions must all be >= 1")
            }
        }
    }
}

impl std::error::Error for GridConfigError {}

/// 3D occupancy grid with fixed dimensions and cell size for its lifetime.
#[derive(Debug)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    depth: usize,
    cell_size: f32,
    /// Continuous-space position of the grid center.
    origin: Vec3,
    /// Grid-local position of the center of cell (0,0,0).
    first_cell_center: Vec3,
    occupied: Vec<bool>,
}

impl VoxelGrid {
    /// Creates a grid centered on the world origin.
    ///
    /// Dimensions and cell size are fixed for the session; a non-positive
    /// cell size or a zero dimension is a configuration error.
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        cell_size: f32,
    ) -> Result<Self, GridConfigError> {
        Self::with_origin(width, height, depth, cell_size, Vec3::ZERO)
    }

    /// Creates a grid centered on `origin`.
    pub fn with_origin(
        width: usize,
        height: usize,
        depth: usize,
        cell_size: f32,
        origin: Vec3,
    ) -> Result<Self, GridConfigError> {
        if !(cell_size > 0.0) {
            return Err(GridConfigError::NonPositiveCellSize(cell_size));
        }
        if width == 0 || height == 0 || depth == 0 {
            return Err(GridConfigError::ZeroDimension);
        }

        let total = Vec3::new(width as f32, height as f32, depth as f32) * cell_size;
        let first_cell_center = -total / 2.0 + Vec3::splat(cell_size / 2.0);

        Ok(Self {
            width,
            height,
            depth,
            cell_size,
            origin,
            first_cell_center,
            occupied: vec![false; width * height * depth],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Flat slot for a valid index, `None` if out of range.
    fn slot(&self, index: IVec3) -> Option<usize> {
        if !self.is_valid_index(index) {
            return None;
        }
        let (x, y, z) = (index.x as usize, index.y as usize, index.z as usize);
        Some(x * self.height * self.depth + y * self.depth + z)
    }

    /// Converts a continuous-space point to its nearest grid index.
    ///
    /// Each axis is rounded to the nearest integer; exact half-cell
    /// boundaries round away from zero (`f32::round`). The result may be
    /// out of range, so callers gate on [`is_valid_index`](Self::is_valid_index).
    pub fn world_to_index(&self, point: Vec3) -> IVec3 {
        let local = point - self.origin;
        let scaled = (local - self.first_cell_center) / self.cell_size;
        IVec3::new(
            scaled.x.round() as i32,
            scaled.y.round() as i32,
            scaled.z.round() as i32,
        )
    }

    /// Continuous-space position of the center of the named cell.
    ///
    /// Exact inverse of [`world_to_index`](Self::world_to_index) for cell
    /// centers; defined for out-of-range indices as well.
    pub fn index_to_world_center(&self, index: IVec3) -> Vec3 {
        self.origin + self.first_cell_center + index.as_vec3() * self.cell_size
    }

    /// Projects a continuous point onto the center of its nearest cell.
    ///
    /// Idempotent: `snap(snap(p)) == snap(p)`.
    pub fn snap(&self, point: Vec3) -> Vec3 {
        self.index_to_world_center(self.world_to_index(point))
    }

    /// True iff each axis is within `[0, dimension)`.
    pub fn is_valid_index(&self, index: IVec3) -> bool {
        index.x >= 0
            && (index.x as usize) < self.width
            && index.y >= 0
            && (index.y as usize) < self.height
            && index.z >= 0
            && (index.z as usize) < self.depth
    }

    /// True iff the index is valid and the cell is unoccupied.
    ///
    /// Out-of-range indices report `false`: they are never placeable.
    pub fn is_empty(&self, index: IVec3) -> bool {
        match self.slot(index) {
            Some(slot) => !self.occupied[slot],
            None => false,
        }
    }

    /// Marks a cell occupied. Invalid indices are skipped with a warning;
    /// redundant calls have no effect.
    pub fn occupy(&mut self, index: IVec3) {
        match self.slot(index) {
            Some(slot) => self.occupied[slot] = true,
            None => warn!("attempted to occupy invalid grid index {index}"),
        }
    }

    /// Clears a cell. Invalid indices are skipped with a warning; redundant
    /// calls have no effect.
    pub fn free(&mut self, index: IVec3) {
        match self.slot(index) {
            Some(slot) => self.occupied[slot] = false,
            None => warn!("attempted to free invalid grid index {index}"),
        }
    }

    /// Clears every cell; dimensions are untouched.
    pub fn reset_occupancy(&mut self) {
        self.occupied.fill(false);
    }

    /// True iff every cell in range is occupied.
    pub fn is_complete(&self) -> bool {
        self.occupied.iter().all(|&cell| cell)
    }

    /// Number of currently occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&cell| cell).count()
    }
}

/// Formats the grid occupancy as a human-readable string.
///
/// Displays the z-slices side by side, `#` for occupied cells and `.` for
/// empty ones, rows from top (y = height-1) to bottom.
pub fn format_occupancy(grid: &VoxelGrid) -> String {
    let mut output = String::new();
    for z in 0..grid.depth() {
        if z > 0 {
            output.push_str("  ");
        }
        output.push_str(&format!("z={:<width$}", z, width = grid.width()));
    }
    output.push('\n');

    for y in (0..grid.height()).rev() {
        for z in 0..grid.depth() {
            if z > 0 {
                output.push_str("  ");
            }
            for x in 0..grid.width() {
                let index = IVec3::new(x as i32, y as i32, z as i32);
                output.push(if grid.is_empty(index) { '.' } else { '#' });
            }
        }
        output.push('\n');
    }

    output
}
