//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning the depth buffer that matches the surface size
//! - acquiring frames and providing encoders/views for rendering

mod depth;
mod gpu;
mod surface;

pub use depth::DEPTH_FORMAT;
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
