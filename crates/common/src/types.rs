use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of a block inside a scene.
///
/// Dense index into the scene's ordered block list. Assigned at insertion and
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// A discrete directional move request, held for as long as its key is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveIntent {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveIntent {
    pub const ALL: [MoveIntent; 4] = [
        MoveIntent::Forward,
        MoveIntent::Backward,
        MoveIntent::Left,
        MoveIntent::Right,
    ];
}

/// Where an uploaded matrix lands in the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadSlot {
    /// Per-block model matrix.
    Model(BlockId),
    /// Camera view matrix.
    View,
    /// Perspective projection, uploaded once at initialization.
    Projection,
}

/// Input sampled once per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Move intents active this frame. A set, so each intent counts once.
    pub intents: BTreeSet<MoveIntent>,
    /// Pointer movement since the previous frame, in device units.
    pub pointer_delta: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an active intent.
    pub fn with_intent(mut self, intent: MoveIntent) -> Self {
        self.intents.insert(intent);
        self
    }

    /// Builder: set the pointer delta.
    pub fn with_pointer_delta(mut self, dx: f32, dy: f32) -> Self {
        self.pointer_delta = Vec2::new(dx, dy);
        self
    }

    /// True if nothing was pressed and the pointer did not move.
    pub fn is_idle(&self) -> bool {
        self.intents.is_empty() && self.pointer_delta == Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_display_and_index() {
        let id = BlockId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "block#3");
    }

    #[test]
    fn frame_input_default_is_idle() {
        assert!(FrameInput::default().is_idle());
    }

    #[test]
    fn frame_input_intents_are_a_set() {
        let input = FrameInput::new()
            .with_intent(MoveIntent::Forward)
            .with_intent(MoveIntent::Forward)
            .with_intent(MoveIntent::Left);
        assert_eq!(input.intents.len(), 2);
        assert!(!input.is_idle());
    }

    #[test]
    fn pointer_delta_alone_is_not_idle() {
        let input = FrameInput::new().with_pointer_delta(0.0, 1.0);
        assert!(!input.is_idle());
    }

    #[test]
    fn move_intent_serde_names() {
        let yaml = serde_json::to_string(&MoveIntent::Backward);
        assert_eq!(yaml.ok().as_deref(), Some("\"backward\""));
    }
}
