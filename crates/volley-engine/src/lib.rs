//! Volley engine crate.
//!
//! Platform + GPU runtime pieces shared by the demos: the winit event loop,
//! the wgpu device/surface (with depth), input, frame timing, logging and a
//! handful of small mesh renderers.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
