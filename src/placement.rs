//! The placement controller: couples pointer input to grid mutations.
//!
//! One controller drives the select → drag → rotate → drop cycle for a set
//! of pieces over one grid. All state transitions happen inside
//! [`PlacementController::tick`], invoked once per frame by the host loop
//! with that frame's input edges. Expected outcomes (failed drops, drag
//! misses, deselection) are status values, never errors.

use glam::{Quat, Vec3};
use log::debug;
use std::f32::consts::FRAC_PI_2;

use crate::geometry::{Plane, Ray, ViewerBasis};
use crate::grid::VoxelGrid;
use crate::pieces::Piece;

/// A discrete 90° rotation command, camera-relative.
///
/// Yaw rotates about the grid axis nearest the viewer's up vector, pitch
/// about the axis nearest the viewer's right vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateCommand {
    YawPositive,
    YawNegative,
    PitchPositive,
    PitchNegative,
}

/// Input edges and pointer state for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Pointer ray for this frame, if the host produced one.
    pub pointer_ray: Option<Ray>,
    /// Pointer button went down this frame.
    pub pressed: bool,
    /// Pointer button is held (including the press frame).
    pub held: bool,
    /// Pointer button went up this frame.
    pub released: bool,
    /// At most one rotation step per frame.
    pub rotate: Option<RotateCommand>,
}

/// Result of a drop attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// All target cells were valid and empty; the piece is locked in.
    Placed,
    /// At least one target cell was invalid or occupied; no cell was
    /// touched and the piece stays selected and unplaced.
    Rejected,
}

/// Drag state carried between a select event and the matching release.
struct Selection {
    piece: usize,
    /// Fixed plane established at selection time from the viewer's forward
    /// axis and the piece's snapped position.
    drag_plane: Plane,
    /// Vector from the initial plane-hit point to the piece position, so
    /// drags preserve the grab point instead of re-centering on the
    /// pointer.
    grab_offset: Vec3,
}

/// The interaction state machine: `Idle` (no selection) or `Selected`.
#[derive(Default)]
pub struct PlacementController {
    selection: Option<Selection>,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the currently selected piece, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selection.as_ref().map(|sel| sel.piece)
    }

    /// Drops any selection without touching piece or grid state.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Runs one frame of the interaction state machine.
    ///
    /// Returns the outcome of a drop when one was attempted this frame.
    pub fn tick(
        &mut self,
        grid: &mut VoxelGrid,
        pieces: &mut [Piece],
        input: &InputSnapshot,
        viewer: &ViewerBasis,
    ) -> Option<DropOutcome> {
        if input.pressed {
            self.handle_press(grid, pieces, input.pointer_ray, viewer);
        }
        if input.held {
            self.drag(grid, pieces, input.pointer_ray);
        }
        let outcome = if input.released {
            self.release(grid, pieces)
        } else {
            None
        };
        if let Some(command) = input.rotate {
            self.rotate(grid, pieces, command, viewer);
        }
        outcome
    }

    /// Pointer-down: hit-test against pieces only and select the nearest
    /// hit, or clear an unplaced selection on a miss.
    fn handle_press(
        &mut self,
        grid: &mut VoxelGrid,
        pieces: &mut [Piece],
        pointer_ray: Option<Ray>,
        viewer: &ViewerBasis,
    ) {
        let Some(ray) = pointer_ray else {
            self.deselect_if_unplaced(pieces);
            return;
        };

        let Some(hit) = hit_test(pieces, &ray, grid.cell_size()) else {
            self.deselect_if_unplaced(pieces);
            return;
        };

        if let Some(previous) = self.selected() {
            if previous != hit && !pieces[previous].is_placed() {
                // switching away from an unplaced piece leaves it where it
                // is; there is no return-to-spawn
                debug!("switched selection away from unplaced piece {previous}");
            }
        }

        let piece = &mut pieces[hit];
        if piece.is_placed() {
            piece.pickup(grid);
            debug!("picked up placed piece {}, freed its cells", piece.name());
        }

        piece.position = grid.snap(piece.position);
        let drag_plane = Plane::new(viewer.forward, piece.position);
        let grab_offset = match drag_plane.raycast(&ray) {
            Some(t) => piece.position - ray.point_at(t),
            None => {
                debug!("pointer ray missed drag plane at selection; zero grab offset");
                Vec3::ZERO
            }
        };

        self.selection = Some(Selection {
            piece: hit,
            drag_plane,
            grab_offset,
        });
    }

    /// Pointer-down that hit nothing: an unplaced selection is abandoned at
    /// its current transform.
    fn deselect_if_unplaced(&mut self, pieces: &[Piece]) {
        if let Some(sel) = &self.selection {
            if !pieces[sel.piece].is_placed() {
                debug!("deselected unplaced piece {}", sel.piece);
                self.selection = None;
            }
        }
    }

    /// Pointer held: intersect the ray with the fixed drag-plane and move
    /// the piece to the snapped intersection. A parallel or divergent ray
    /// skips this sample.
    fn drag(&mut self, grid: &VoxelGrid, pieces: &mut [Piece], pointer_ray: Option<Ray>) {
        let Some(sel) = &self.selection else {
            return;
        };
        let Some(ray) = pointer_ray else {
            return;
        };

        match sel.drag_plane.raycast(&ray) {
            Some(t) => {
                let point_on_plane = ray.point_at(t);
                pieces[sel.piece].position = grid.snap(point_on_plane + sel.grab_offset);
            }
            None => debug!("drag sample skipped: ray missed drag plane"),
        }
    }

    /// Applies one 90° step about a camera-relative grid axis.
    ///
    /// A placed piece is pulled back into play first (cells freed). The
    /// rotated placement is not validated here; an invalid result is only
    /// caught at drop time.
    fn rotate(
        &mut self,
        grid: &mut VoxelGrid,
        pieces: &mut [Piece],
        command: RotateCommand,
        viewer: &ViewerBasis,
    ) {
        let Some(sel) = &self.selection else {
            return;
        };
        let piece = &mut pieces[sel.piece];

        let (axis, angle) = match command {
            RotateCommand::YawPositive => (viewer.yaw_axis(), FRAC_PI_2),
            RotateCommand::YawNegative => (viewer.yaw_axis(), -FRAC_PI_2),
            RotateCommand::PitchPositive => (viewer.pitch_axis(), FRAC_PI_2),
            RotateCommand::PitchNegative => (viewer.pitch_axis(), -FRAC_PI_2),
        };

        if piece.is_placed() {
            piece.pickup(grid);
            debug!("rotated a placed piece; it is now unplaced");
        }

        // rotate about the piece's own pivot in world axes
        piece.rotation = Quat::from_axis_angle(axis, angle) * piece.rotation;
        piece.position = grid.snap(piece.position);
    }

    /// Pointer-up: snap, dry-run validate every target cell, then either
    /// commit the whole placement or none of it. The piece stays selected
    /// either way.
    fn release(&mut self, grid: &mut VoxelGrid, pieces: &mut [Piece]) -> Option<DropOutcome> {
        let sel = self.selection.as_ref()?;
        let piece = &mut pieces[sel.piece];

        piece.position = grid.snap(piece.position);
        let indices = piece.occupied_indices(grid);

        // full dry run before any occupy call: a drop is never partially
        // committed
        let can_place = !indices.is_empty()
            && indices
                .iter()
                .all(|&index| grid.is_valid_index(index) && grid.is_empty(index));

        if can_place {
            for &index in &indices {
                grid.occupy(index);
            }
            piece.mark_placed(indices);
            debug!("piece {} placed", piece.name());
            Some(DropOutcome::Placed)
        } else {
            piece.mark_unplaced();
            debug!("piece {} placement rejected", piece.name());
            Some(DropOutcome::Rejected)
        }
    }
}

/// Nearest piece intersected by the pointer ray.
///
/// Only pieces are tested; grid cells and other scene geometry never
/// capture the pointer.
fn hit_test(pieces: &[Piece], ray: &Ray, cell_size: f32) -> Option<usize> {
    pieces
        .iter()
        .enumerate()
        .filter_map(|(index, piece)| {
            piece
                .intersect_ray(ray, cell_size)
                .map(|distance| (index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
