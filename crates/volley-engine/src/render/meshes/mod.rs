//! Mesh renderers used by the demos.

mod common;

pub mod enemy;
pub mod projectile;
pub mod triangle;

pub use enemy::{EnemyInstance, EnemyRenderer};
pub use projectile::{ProjectileInstance, ProjectileRenderer, SphereMesh};
pub use triangle::{Triangle, TriangleRenderer};
