//! collide3d - scene collision core
//!
//! The library side of the root crate holds the application configuration
//! and the headless demo; the collision algorithms live in the
//! `collide3d_math`, `collide3d_collision` and `collide3d_scene` crates.

pub mod config;
pub mod demo;
