//! Rendering adapters that need no GPU.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - A sink only receives what the scene pushes through
//!   [`FrameSink`](blockview_kernel::FrameSink).
//!
//! [`RecordingSink`] backs the CLI and the scene tests in downstream crates.
//! The wgpu backend lives in `blockview-render-wgpu`.

mod recording;
mod renderer;

pub use recording::{RecordingError, RecordingSink, SinkEvent};
pub use renderer::{DebugTextRenderer, Renderer};
