//! Soma-cube puzzle game.
//!
//! Seven differently-shaped pieces must be dragged, rotated and dropped
//! into a 3x3x3 grid until every cell is filled. The placement engine
//! lives in the library; this binary wires it to a CLI and an interactive
//! 3D viewer.

mod visualization;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::{IVec3, Quat, Vec3};

use cubefit::grid::format_occupancy;
use cubefit::pieces::SOMA_SHAPES;
use cubefit::{InputSnapshot, PuzzleSession, Ray, ViewerBasis, VoxelGrid};

/// Interactive Soma-cube packing puzzle.
#[derive(Parser)]
#[command(name = "cubefit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play the puzzle in an interactive 3D window.
    Play,
    /// Print the unit cells of each puzzle piece.
    Shapes,
    /// Run a short scripted session and print the grid after each step.
    Demo,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Shapes) => run_shapes(),
        Some(Command::Demo) => run_demo()?,
        Some(Command::Play) | None => visualization::play()?,
    }
    Ok(())
}

/// Prints each shape's offsets and cell count.
fn run_shapes() {
    let total: usize = SOMA_SHAPES.iter().map(|&(_, shape)| shape.len()).sum();
    println!("{} pieces, {} unit cells total", SOMA_SHAPES.len(), total);
    for &(name, shape) in SOMA_SHAPES {
        let offsets: Vec<String> = shape
            .iter()
            .map(|o| format!("({},{},{})", o.x, o.y, o.z))
            .collect();
        println!("{name}: {} cells  {}", shape.len(), offsets.join(" "));
    }
}

/// Walks the placement engine through a deterministic select/drop script.
fn run_demo() -> Result<()> {
    let grid = VoxelGrid::new(3, 3, 3, 1.0)?;
    let mut session = PuzzleSession::new(grid);
    let mut rng = rand::thread_rng();
    session.new_puzzle(&mut rng);
    let viewer = ViewerBasis::looking_down_neg_z();

    // L into the bottom front edge
    drop_piece_at(&mut session, &viewer, 1, IVec3::new(0, 0, 0));
    println!("placed L:\n{}", format_occupancy(session.grid()));

    // T on top of it: overlaps the L's foot cell and must be rejected
    drop_piece_at(&mut session, &viewer, 2, IVec3::new(0, 1, 0));
    println!(
        "tried T over the L (rejected):\n{}",
        format_occupancy(session.grid())
    );

    // T one layer back instead
    drop_piece_at(&mut session, &viewer, 2, IVec3::new(0, 0, 2));
    println!("placed T:\n{}", format_occupancy(session.grid()));

    println!(
        "{} of {} cells filled, complete: {}",
        session.grid().occupied_count(),
        session.grid().volume(),
        session.is_complete()
    );
    Ok(())
}

/// Selects piece `slot` with a synthetic pointer ray, drags it over the
/// pivot cell and releases.
///
/// The piece is first staged clear of the grid on the target's z plane:
/// the drag plane faces the viewer, so a drag can only move the piece
/// within that plane.
fn drop_piece_at(session: &mut PuzzleSession, viewer: &ViewerBasis, slot: usize, pivot: IVec3) {
    let ray_through = |point: Vec3| Ray::new(point - viewer.forward * 50.0, viewer.forward);

    let target = session.grid().index_to_world_center(pivot);
    let staging = Vec3::new(12.0 + 3.0 * slot as f32, 0.0, target.z);
    session.pieces_mut()[slot].position = staging;
    session.pieces_mut()[slot].rotation = Quat::IDENTITY;

    let select = InputSnapshot {
        pointer_ray: Some(ray_through(staging)),
        pressed: true,
        held: true,
        ..Default::default()
    };
    session.tick(&select, viewer, 0.016);

    let drag = InputSnapshot {
        pointer_ray: Some(ray_through(target)),
        held: true,
        ..Default::default()
    };
    session.tick(&drag, viewer, 0.016);

    let release = InputSnapshot {
        released: true,
        ..Default::default()
    };
    session.tick(&release, viewer, 0.016);
}
