//! Shared types for the blockview workspace.
//!
//! Everything here is plain data: identifiers, the per-frame input sample the
//! frame loop hands to the scene, and the upload slots a render backend
//! accepts. No crate in the workspace reaches a window or GPU through here.

pub mod types;

pub use types::{BlockId, FrameInput, MoveIntent, UploadSlot};
