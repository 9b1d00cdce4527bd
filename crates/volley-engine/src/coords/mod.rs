//! Window-space sizes shared by renderers and apps.
//!
//! World-space math (positions, rotations, matrices) uses `glam` directly.

mod viewport;

pub use viewport::Viewport;
