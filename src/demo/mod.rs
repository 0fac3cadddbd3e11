//! Headless demonstration
//!
//! Builds a small scene and walks a player capsule through it.

mod scene_builder;
mod simulation;

pub use scene_builder::SceneBuilder;
pub use simulation::{FrameReport, SimulationSystem};
