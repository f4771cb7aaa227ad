//! Scene kernel: poses, drag-damped camera motion, and the per-frame update
//! that pushes changed transforms to a [`FrameSink`].
//!
//! # Invariants
//! - Angles are degrees everywhere; radians only appear inside matrix builders.
//! - A pose is recomputed and uploaded at most once per frame, and only while
//!   dirty. Its flag clears only after the upload succeeded, and only the
//!   scene can clear it.
//! - The projection starts dirty, so `update` alone uploads it before any
//!   block.
//! - Blocks upload before the camera; draws follow insertion order.
//! - Nothing is read back from the sink.

pub mod camera;
pub mod config;
pub mod motion;
pub mod pose;
pub mod scene;
pub mod sink;

pub use camera::Camera;
pub use config::{BlockConfig, CameraConfig, ConfigError, ProjectionConfig, SceneConfig};
pub use motion::CameraMotion;
pub use pose::{Pose, model_matrix, view_matrix};
pub use scene::{Block, Scene, SceneError, SceneSummary};
pub use sink::FrameSink;
