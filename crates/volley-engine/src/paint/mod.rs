//! Colour model shared between apps and renderers.
//!
//! Colours are linear and premultiplied; renderers blend with
//! `One, OneMinusSrcAlpha`.

pub mod color;

pub use color::Color;
