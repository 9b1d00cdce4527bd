//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use, rebuilding the pipeline if the surface format changes.
//!
//! Convention:
//! - CPU geometry is in world units, right-handed, +Y up.
//! - Callers pass a combined view-projection matrix (`glam::Mat4`, wgpu depth range).

mod ctx;
pub mod meshes;

pub use ctx::{RenderCtx, RenderTarget};
