//! Data models for window manager settings

pub mod client_spec;
pub mod color;
pub mod keyspec;
pub mod settings;
mod x11_colors;

pub use client_spec::*;
pub use color::*;
pub use keyspec::*;
pub use settings::*;
