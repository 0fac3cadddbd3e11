//! Player walk simulation
//!
//! Each frame follows the usual collision ordering:
//! - Horizontal movement from the requested heading
//! - Ground query: stand on the highest ground, or slide along the landscape border
//! - Player transform update
//! - GJK query: push the player out of the obstacles it walked into

use collide3d_math::{mat4, Sphere, Vec3};
use collide3d_scene::{CollisionFlags, CollisionInput, ItemKey, Scene, SceneError};

use crate::config::DemoConfig;

/// What happened during one simulated frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u32,
    /// Player feet position at the end of the frame
    pub position: Vec3,
    /// Whether ground was found below the player
    pub grounded: bool,
    /// Whether the move was clamped at the landscape border
    pub clamped: bool,
    /// Number of obstacles the player overlapped
    pub contacts: usize,
    /// Horizontal push applied to resolve the overlaps
    pub push: Vec3,
}

/// Drives a player item through a scene at a fixed time step
pub struct SimulationSystem {
    player: ItemKey,
    position: Vec3,
    radius: f32,
    speed: f32,
    time_step: f32,
    frame: u32,
}

impl SimulationSystem {
    /// Create a simulation for the player item standing at `start`
    pub fn new(player: ItemKey, start: Vec3, config: &DemoConfig) -> Self {
        Self {
            player,
            position: start,
            radius: config.player_radius,
            speed: config.player_speed,
            time_step: config.time_step,
            frame: 0,
        }
    }

    /// Player feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Run one frame, walking along `heading` (only X and Z are used)
    pub fn step(&mut self, scene: &mut Scene, heading: Vec3) -> Result<FrameReport, SceneError> {
        let lift = Vec3::new(0.0, self.radius, 0.0);

        // 1. Horizontal movement
        let heading = Vec3::new(heading.x, 0.0, heading.z).normalized();
        let mut candidate = self.position + heading * (self.speed * self.time_step);

        // 2. Ground, tested with a sphere sitting on the player's feet
        let ground = scene.detect_collision(
            &CollisionInput::new(Sphere::new(self.position + lift, self.radius))
                .with_check_pos(candidate + lift)
                .with_families(CollisionFlags::GROUND),
        );
        let grounded = match ground.ground_y {
            Some(y) => {
                candidate.y = y - self.radius;
                true
            }
            None => false,
        };
        let clamped = match ground.clamped_pos {
            Some(pos) => {
                candidate.x = pos.x;
                candidate.z = pos.z;
                true
            }
            None => false,
        };

        // 3. Move the player
        scene.set_model_matrix(self.player, mat4::translation(candidate))?;

        // 4. Obstacles
        let obstacles = scene.detect_collision(
            &CollisionInput::new(Sphere::new(candidate + lift, self.radius))
                .with_families(CollisionFlags::GJK),
        );
        let push = Vec3::new(obstacles.min_trans_vec.x, 0.0, obstacles.min_trans_vec.z);
        if obstacles.has(CollisionFlags::GJK) {
            candidate += push;
            scene.set_model_matrix(self.player, mat4::translation(candidate))?;
            log::debug!(
                "Frame {}: pushed by {:?} out of {} obstacle(s)",
                self.frame,
                push,
                obstacles.pairs.len()
            );
        }

        self.position = candidate;
        self.frame += 1;

        Ok(FrameReport {
            frame: self.frame,
            position: candidate,
            grounded,
            clamped,
            contacts: obstacles.pairs.len(),
            push,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::SceneBuilder;
    use collide3d_collision::{Collider, ColliderState};

    fn config() -> DemoConfig {
        DemoConfig {
            player_speed: 3.0,
            time_step: 1.0 / 60.0,
            player_radius: 0.2,
            player_height: 0.85,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn test_player_lands_on_flat_landscape() {
        let start = Vec3::new(0.3, 2.0, 0.1);
        let builder = SceneBuilder::new()
            .add_landscape(5.0, 4, 0.0)
            .unwrap()
            .add_player(start, 0.2, 0.85)
            .unwrap();
        let player = builder.player().unwrap();
        let mut scene = builder.build();

        let mut sim = SimulationSystem::new(player, start, &config());
        let report = sim.step(&mut scene, Vec3::X).unwrap();

        assert!(report.grounded);
        assert!(report.position.y.abs() < 0.0001, "feet at {}", report.position.y);
        assert!(report.position.x > start.x);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_player_clamped_at_landscape_border() {
        let start = Vec3::new(0.9, 0.0, 0.0);
        let builder = SceneBuilder::new()
            .add_landscape(1.0, 2, 0.0)
            .unwrap()
            .add_player(start, 0.2, 0.85)
            .unwrap();
        let player = builder.player().unwrap();
        let mut scene = builder.build();

        let mut sim = SimulationSystem::new(player, start, &config());
        let mut clamped = false;
        for _ in 0..20 {
            let report = sim.step(&mut scene, Vec3::X).unwrap();
            clamped |= report.clamped;
            assert!(report.position.x <= 1.0, "walked off at x = {}", report.position.x);
        }
        assert!(clamped);
    }

    #[test]
    fn test_player_stopped_by_wall() {
        let start = Vec3::ZERO;
        let builder = SceneBuilder::new()
            .add_player(start, 0.2, 0.85)
            .unwrap()
            .add_obstacle(
                "wall",
                Collider::cuboid(
                    Vec3::new(-0.5, -1.0, -2.0),
                    Vec3::new(0.5, 2.0, 2.0),
                    ColliderState::Static,
                )
                .unwrap(),
                mat4::translation(Vec3::new(2.0, 0.0, 0.0)),
            )
            .unwrap();
        let player = builder.player().unwrap();
        let mut scene = builder.build();

        let mut sim = SimulationSystem::new(player, start, &config());
        let mut touched = false;
        for _ in 0..120 {
            let report = sim.step(&mut scene, Vec3::X).unwrap();
            touched |= report.contacts > 0;
        }

        assert!(touched);
        // Wall face at x = 1.5, capsule radius 0.2
        let x = sim.position().x;
        assert!(x < 1.3 + 0.01, "player went through the wall: x = {}", x);
        assert!(x > 1.2, "player stopped too early: x = {}", x);
    }

    #[test]
    fn test_removed_player_is_an_error() {
        let builder = SceneBuilder::new().add_player(Vec3::ZERO, 0.2, 0.85).unwrap();
        let player = builder.player().unwrap();
        let mut scene = builder.build();
        scene.remove_item(player);

        let mut sim = SimulationSystem::new(player, Vec3::ZERO, &config());
        assert_eq!(
            sim.step(&mut scene, Vec3::X),
            Err(SceneError::ItemNotFound(player))
        );
    }
}
