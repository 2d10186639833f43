//! Soma-cube placement engine.
//!
//! Core logic for a 3D packing puzzle: seven polycube pieces are picked
//! up, dragged, rotated in 90° steps and dropped into a cubic grid until
//! every cell is filled. The crate keeps a continuous transform per piece
//! and a discrete occupancy grid consistent under any interleaving of
//! select, drag, rotate and drop, and detects completion.
//!
//! Rendering, camera control and UI are external: the host loop feeds an
//! [`placement::InputSnapshot`] and a [`geometry::ViewerBasis`] into
//! [`session::PuzzleSession::tick`] once per frame and reads piece
//! transforms back for display.

pub mod geometry;
pub mod grid;
pub mod pieces;
pub mod placement;
pub mod session;

pub use geometry::{Ray, ViewerBasis};
pub use grid::{GridConfigError, VoxelGrid};
pub use pieces::Piece;
pub use placement::{DropOutcome, InputSnapshot, PlacementController, RotateCommand};
pub use session::{PuzzleSession, SpawnConfig};
