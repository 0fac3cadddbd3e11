//! collide3d - headless collision demo
//!
//! Walks a player capsule over a rolling landscape among one obstacle of
//! each collider shape, logging ground contact and obstacle pushes.

use collide3d::config::AppConfig;
use collide3d::demo::{SceneBuilder, SimulationSystem};
use collide3d_math::{Ray3, Sphere, Vec3};
use collide3d_scene::{CollisionFlags, CollisionInput};

/// Heading change of the walk, in radians per second
const TURN_RATE: f32 = 0.4;

fn main() {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting collide3d demo");

    if let Err(e) = run(&config) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let demo = &config.demo;
    let start = Vec3::from(demo.player_start);

    let builder = SceneBuilder::with_config(config.to_scene_config())
        .add_landscape(demo.landscape_half_size, demo.landscape_subdivisions, 0.3)?
        .add_player(start, demo.player_radius, demo.player_height)?
        .add_gjk_showcase()?;
    let player = builder.player().ok_or("demo scene has no player")?;
    let mut scene = builder.build();
    log::info!("Built scene with {} items", scene.len());

    let mut sim = SimulationSystem::new(player, start, demo);
    let mut contacts = 0usize;
    for frame in 0..demo.frames {
        let angle = frame as f32 * demo.time_step * TURN_RATE;
        let report = sim.step(&mut scene, Vec3::new(angle.cos(), 0.0, angle.sin()))?;
        contacts += report.contacts;

        if demo.report_every > 0 && report.frame % demo.report_every == 0 {
            log::info!(
                "Frame {}: position ({:.2}, {:.2}, {:.2}), grounded {}, clamped {}, contacts {}",
                report.frame,
                report.position.x,
                report.position.y,
                report.position.z,
                report.grounded,
                report.clamped,
                report.contacts
            );
        }
    }

    // Pick the landscape straight below the player's final position
    let above = sim.position() + Vec3::new(0.0, 10.0, 0.0);
    let pick = scene.detect_collision(
        &CollisionInput::new(Sphere::new(above, demo.player_radius))
            .with_families(CollisionFlags::MOUSE)
            .with_mouse_ray(Ray3::new(above, -Vec3::Y)),
    );
    match pick.picked.first() {
        Some(hit) => log::info!("Picked landscape at ({:.2}, {:.2}, {:.2})", hit.point.x, hit.point.y, hit.point.z),
        None => log::info!("Nothing under the player"),
    }

    log::info!(
        "Finished {} frames with {} obstacle contacts",
        sim.frame(),
        contacts
    );
    Ok(())
}
