//! Desktop input mapped to movement intents and a per-frame pointer delta.
//!
//! # Invariants
//! - The kernel only ever sees a [`FrameInput`](blockview_common::FrameInput),
//!   never raw key events.
//! - Held intents persist across frames; pointer motion is drained once per
//!   frame.

pub mod bindings;
pub mod state;

pub use bindings::KeyBindings;
pub use state::InputState;
