//! wgpu render backend for the block viewer.
//!
//! Each distinct mesh gets one vertex buffer; each block gets one slot in a
//! shared instance buffer holding its model matrix. View and projection live
//! in a single uniform buffer.
//!
//! # Invariants
//! - The backend never reads scene state; it only sees what a
//!   [`WgpuFrame`] is handed through `FrameSink`.
//! - Front faces wind counter-clockwise and back faces are culled.

mod gpu;
mod shaders;

pub use gpu::{DEFAULT_MAX_BLOCKS, RenderError, WgpuFrame, WgpuRenderer};
