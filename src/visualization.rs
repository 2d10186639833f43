//! Interactive 3D front end built on kiss3d.
//!
//! The window drives the placement engine with synthesized pointer rays:
//! Tab grabs the next piece, arrow keys and Q/E drag it one cell at a
//! time, A/D and W/S rotate it, Return drops it and R deals a new puzzle.

use std::time::Instant;

use anyhow::Result;
use kiss3d::prelude::*;

use cubefit::session::format_clock;
use cubefit::{InputSnapshot, PuzzleSession, Ray, RotateCommand, ViewerBasis, VoxelGrid};

const HELP: &str = "[Tab] grab, [arrows/Q/E] move, [A/D W/S] rotate, [Return] drop, [R] new";

/// Returns the display color for a given piece index (0-6).
///
/// The mapping is stable to keep colors consistent across frames.
fn piece_color(piece_index: usize) -> Color {
    match piece_index {
        0 => Color::new(1.0, 0.2, 0.2, 1.0), // red
        1 => Color::new(0.2, 1.0, 0.2, 1.0), // green
        2 => Color::new(0.2, 0.2, 1.0, 1.0), // blue
        3 => Color::new(1.0, 1.0, 0.2, 1.0), // yellow
        4 => Color::new(1.0, 0.2, 1.0, 1.0), // magenta
        5 => Color::new(0.2, 1.0, 1.0, 1.0), // cyan
        _ => Color::new(1.0, 0.6, 0.2, 1.0), // orange
    }
}

/// Bridges engine coordinates into the renderer's vector type.
fn render_pos(v: glam::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Adds a small marker cube at every grid cell center so the target
/// volume stays visible while pieces float around it.
fn build_cell_markers(scene: &mut SceneNode3d, grid: &VoxelGrid) {
    let size = grid.cell_size() * 0.12;
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            for z in 0..grid.depth() as i32 {
                let center = grid.index_to_world_center(glam::IVec3::new(x, y, z));
                scene
                    .add_cube(size, size, size)
                    .set_color(Color::new(0.45, 0.45, 0.45, 1.0))
                    .set_position(render_pos(center));
            }
        }
    }
}

/// Rebuilds one cube node per piece unit cell.
///
/// Rotations are 90-degree steps about world axes, so axis-aligned cubes
/// at the rotated cell centers render every orientation correctly. The
/// selected piece is drawn slightly larger.
fn build_pieces(
    scene: &mut SceneNode3d,
    session: &PuzzleSession,
    selected: Option<usize>,
) -> Vec<SceneNode3d> {
    let cell = session.grid().cell_size();
    let mut nodes = Vec::new();
    for piece in session.pieces() {
        let size = if selected == Some(piece.id()) {
            cell * 0.98
        } else {
            cell * 0.88
        };
        for &offset in piece.shape() {
            let center = piece.position + piece.rotation * (offset.as_vec3() * cell);
            let node = scene
                .add_cube(size, size, size)
                .set_color(piece_color(piece.id()))
                .set_position(render_pos(center));
            nodes.push(node);
        }
    }
    nodes
}

/// Opens the puzzle window and runs until it is closed.
pub fn play() -> Result<()> {
    pollster::block_on(play_async())
}

async fn play_async() -> Result<()> {
    let grid = VoxelGrid::new(3, 3, 3, 1.0)?;
    let mut session = PuzzleSession::new(grid);
    let mut rng = rand::thread_rng();
    session.new_puzzle(&mut rng);

    // fixed viewing basis: the camera orbits freely but input stays
    // world-aligned so rotation keys behave predictably
    let viewer = ViewerBasis::looking_down_neg_z();
    let ray_through = |point: glam::Vec3| Ray::new(point - viewer.forward * 50.0, viewer.forward);

    let mut window = Window::new(&format!("cubefit - {HELP}")).await;
    let mut camera = OrbitCamera3d::default();
    camera.set_dist(16.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(8.0, 10.0, 8.0));
    build_cell_markers(&mut scene, session.grid());
    let mut piece_nodes = build_pieces(&mut scene, &session, session.selected());

    // piece the next Tab press will grab
    let mut candidate = 0;
    let mut last_frame = Instant::now();
    let mut last_title = String::new();

    loop {
        let mut input = InputSnapshot::default();
        let mut new_puzzle = false;
        let mut dirty = false;
        let cell = session.grid().cell_size();

        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action != Action::Press {
                    continue;
                }
                let nudge = |input: &mut InputSnapshot, delta: glam::Vec3| {
                    if let Some(index) = session.selected() {
                        let target = session.pieces()[index].position + delta;
                        input.pointer_ray = Some(ray_through(target));
                        input.held = true;
                    }
                };
                match key {
                    Key::Tab => {
                        let target = session.pieces()[candidate].position;
                        input.pointer_ray = Some(ray_through(target));
                        input.pressed = true;
                        input.held = true;
                        candidate = (candidate + 1) % session.pieces().len();
                        dirty = true;
                    }
                    Key::Left => {
                        nudge(&mut input, glam::Vec3::NEG_X * cell);
                        dirty = true;
                    }
                    Key::Right => {
                        nudge(&mut input, glam::Vec3::X * cell);
                        dirty = true;
                    }
                    Key::Up => {
                        nudge(&mut input, glam::Vec3::NEG_Z * cell);
                        dirty = true;
                    }
                    Key::Down => {
                        nudge(&mut input, glam::Vec3::Z * cell);
                        dirty = true;
                    }
                    Key::Q => {
                        nudge(&mut input, glam::Vec3::Y * cell);
                        dirty = true;
                    }
                    Key::E => {
                        nudge(&mut input, glam::Vec3::NEG_Y * cell);
                        dirty = true;
                    }
                    Key::A => {
                        input.rotate = Some(RotateCommand::YawPositive);
                        dirty = true;
                    }
                    Key::D => {
                        input.rotate = Some(RotateCommand::YawNegative);
                        dirty = true;
                    }
                    Key::W => {
                        input.rotate = Some(RotateCommand::PitchPositive);
                        dirty = true;
                    }
                    Key::S => {
                        input.rotate = Some(RotateCommand::PitchNegative);
                        dirty = true;
                    }
                    Key::Return => {
                        input.released = true;
                        dirty = true;
                    }
                    Key::R => {
                        new_puzzle = true;
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }

        if new_puzzle {
            session.new_puzzle(&mut rng);
            candidate = 0;
        }

        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        let report = session.tick(&input, &viewer, dt);
        if report.drop.is_some() || report.just_completed {
            dirty = true;
        }

        if dirty {
            for mut node in piece_nodes.drain(..) {
                node.remove();
            }
            piece_nodes = build_pieces(&mut scene, &session, session.selected());
        }

        let status = if session.is_complete() {
            "solved!".to_string()
        } else if let Some(index) = session.selected() {
            format!("holding {}", session.pieces()[index].name())
        } else {
            HELP.to_string()
        };
        let title = format!(
            "cubefit {} - {}/{} cells - {}",
            format_clock(session.elapsed_seconds()),
            session.grid().occupied_count(),
            session.grid().volume(),
            status
        );
        if title != last_title {
            window.set_title(&title);
            last_title = title;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
    Ok(())
}
