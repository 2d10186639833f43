//! Top-level puzzle session: piece spawning, the frame loop entry point,
//! elapsed-time tracking and completion detection.
//!
//! The session owns the grid, the pieces and the placement controller and
//! is driven by one `tick` per frame. Completion latches: the notification
//! fires exactly once per puzzle instance and the timer freezes with it.

use glam::{Quat, Vec3};
use log::info;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::geometry::ViewerBasis;
use crate::grid::VoxelGrid;
use crate::pieces::Piece;
use crate::placement::{DropOutcome, InputSnapshot, PlacementController};

/// Where new pieces land around the puzzle: a ring at a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct SpawnConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    pub height_offset: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            max_radius: 8.0,
            height_offset: 1.0,
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameReport {
    /// Outcome of a drop attempted this frame, if any.
    pub drop: Option<DropOutcome>,
    /// True exactly once: on the frame the last cell was filled.
    pub just_completed: bool,
}

/// One puzzle play-through over a fixed grid.
pub struct PuzzleSession {
    grid: VoxelGrid,
    pieces: Vec<Piece>,
    controller: PlacementController,
    spawn: SpawnConfig,
    elapsed: f32,
    timer_running: bool,
    completion_fired: bool,
}

impl PuzzleSession {
    pub fn new(grid: VoxelGrid) -> Self {
        Self::with_spawn_config(grid, SpawnConfig::default())
    }

    pub fn with_spawn_config(grid: VoxelGrid, spawn: SpawnConfig) -> Self {
        Self {
            grid,
            pieces: Vec::new(),
            controller: PlacementController::new(),
            spawn,
            elapsed: 0.0,
            timer_running: false,
            completion_fired: false,
        }
    }

    /// Starts a fresh puzzle: grid cleared, the seven pieces respawned on
    /// the ring, timer restarted from zero.
    pub fn new_puzzle(&mut self, rng: &mut impl Rng) {
        self.grid.reset_occupancy();
        self.controller.clear_selection();

        self.pieces = Piece::standard_set();
        let center = self.grid.origin();
        for piece in &mut self.pieces {
            let angle = rng.gen_range(0.0..TAU);
            // inclusive so a degenerate band (min == max) spawns at that radius
            let radius = rng.gen_range(self.spawn.min_radius..=self.spawn.max_radius);
            let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
            piece.position =
                center + direction * radius + Vec3::Y * self.spawn.height_offset;

            let quarter_turns = rng.gen_range(0..4);
            piece.rotation = Quat::from_rotation_y(quarter_turns as f32 * FRAC_PI_2);
        }

        self.elapsed = 0.0;
        self.timer_running = true;
        self.completion_fired = false;
        info!(
            "new puzzle: {}x{}x{} grid, {} pieces",
            self.grid.width(),
            self.grid.height(),
            self.grid.depth(),
            self.pieces.len()
        );
    }

    /// Runs one frame: advances the timer, feeds the input through the
    /// placement controller and checks completion after a successful drop.
    ///
    /// Once the puzzle is complete, further input is ignored and the timer
    /// stays frozen.
    pub fn tick(&mut self, input: &InputSnapshot, viewer: &ViewerBasis, dt: f32) -> FrameReport {
        if self.timer_running {
            self.elapsed += dt;
        }
        if self.completion_fired {
            return FrameReport::default();
        }

        let drop = self
            .controller
            .tick(&mut self.grid, &mut self.pieces, input, viewer);

        let just_completed = if drop == Some(DropOutcome::Placed) {
            self.check_completion()
        } else {
            false
        };

        FrameReport {
            drop,
            just_completed,
        }
    }

    /// Explicitly re-evaluates completion (the manual check).
    ///
    /// Returns true only on the transition into the completed state; the
    /// notification never re-fires for the same puzzle instance.
    pub fn check_completion(&mut self) -> bool {
        if self.completion_fired || !self.grid.is_complete() {
            return false;
        }
        self.completion_fired = true;
        self.timer_running = false;
        self.controller.clear_selection();
        info!("puzzle complete in {}", format_clock(self.elapsed));
        true
    }

    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    /// Seconds accumulated since `new_puzzle`, frozen at completion.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn pieces_mut(&mut self) -> &mut [Piece] {
        &mut self.pieces
    }

    /// Index of the selected piece, for highlighting.
    pub fn selected(&self) -> Option<usize> {
        self.controller.selected()
    }
}

/// Formats elapsed seconds as `MM:SS`.
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
