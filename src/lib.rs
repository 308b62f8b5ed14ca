//! Fixed-point software 3D renderer for a 120×120 dual-core handheld,
//! plus the procedurally streamed worlds it draws.

pub mod config;
pub mod logging;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod world;
