//! Enemy/projectile simulation for the volley shooter.
//!
//! Two small object pools advanced once per frame:
//! - enemies spawn on a timer at a random point around the camera
//! - projectiles fly in a straight line from the camera
//! - sphere/sphere overlap destroys both sides
//! - dead and far-away objects are culled, enemies are kept far-to-near
//!
//! The crate has no GPU or window dependency. Rendering code reads the pools
//! through [`World::enemies`] and [`World::projectiles`].
//!
//! ```rust,ignore
//! let mut world = World::new(SimConfig::default(), 7)?;
//! world.fire(camera.position, camera.direction);
//! let report = world.step(dt, camera);
//! ```

mod config;
mod enemy;
mod error;
mod projectile;
mod spawner;
mod world;

pub use config::SimConfig;
pub use enemy::Enemy;
pub use error::ConfigError;
pub use projectile::Projectile;
pub use spawner::{random_enemy, SpawnTimer};
pub use world::{CameraPose, StepReport, World};
