use crate::bindings::KeyBindings;
use blockview_common::{FrameInput, MoveIntent};
use glam::Vec2;
use std::collections::BTreeSet;

/// Accumulates window events between frames.
///
/// Tracks held keys rather than held intents, so releasing `ArrowUp` while
/// `KeyW` is still down keeps moving forward.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: BTreeSet<String>,
    pointer: Vec2,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: BTreeSet::new(),
            pointer: Vec2::ZERO,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key press. Returns `true` if the key is bound.
    pub fn press(&mut self, key: &str) -> bool {
        if self.bindings.intent_for(key).is_none() {
            tracing::trace!(key, "ignoring unbound key");
            return false;
        }
        self.held.insert(key.to_string());
        true
    }

    /// Record a key release. Returns `true` if the key was held.
    pub fn release(&mut self, key: &str) -> bool {
        self.held.remove(key)
    }

    /// Add raw pointer motion. Deltas sum until the next [`InputState::take_frame`].
    pub fn add_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.pointer += Vec2::new(dx, dy);
    }

    /// Intents currently held, each counted once.
    pub fn intents(&self) -> BTreeSet<MoveIntent> {
        self.held
            .iter()
            .filter_map(|k| self.bindings.intent_for(k))
            .collect()
    }

    /// Input for the coming frame. Held keys carry over; the pointer delta is
    /// drained.
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            intents: self.intents(),
            pointer_delta: std::mem::take(&mut self.pointer),
        }
    }

    /// Drop everything, e.g. when the window loses focus and release events
    /// would be missed.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_persist_across_frames() {
        let mut input = InputState::default();
        assert!(input.press("KeyW"));
        let first = input.take_frame();
        let second = input.take_frame();
        assert!(first.intents.contains(&MoveIntent::Forward));
        assert_eq!(first.intents, second.intents);
        input.release("KeyW");
        assert!(input.take_frame().intents.is_empty());
    }

    #[test]
    fn pointer_delta_sums_then_drains() {
        let mut input = InputState::default();
        input.add_pointer_delta(3.0, -1.0);
        input.add_pointer_delta(2.0, 4.0);
        assert_eq!(input.take_frame().pointer_delta, Vec2::new(5.0, 3.0));
        assert_eq!(input.take_frame().pointer_delta, Vec2::ZERO);
    }

    #[test]
    fn two_keys_for_one_intent_count_once() {
        let mut input = InputState::default();
        input.press("KeyW");
        input.press("ArrowUp");
        let frame = input.take_frame();
        assert_eq!(frame.intents.len(), 1);
        input.release("ArrowUp");
        assert!(input.take_frame().intents.contains(&MoveIntent::Forward));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputState::default();
        assert!(!input.press("KeyQ"));
        assert!(!input.release("KeyQ"));
        assert!(input.take_frame().is_idle());
    }

    #[test]
    fn diagonal_and_opposing_keys() {
        let mut input = InputState::default();
        input.press("KeyW");
        input.press("KeyD");
        input.press("KeyS");
        let intents = input.take_frame().intents;
        let expected: BTreeSet<_> = [MoveIntent::Forward, MoveIntent::Backward, MoveIntent::Right]
            .into_iter()
            .collect();
        assert_eq!(intents, expected);
    }

    #[test]
    fn clear_drops_keys_and_pointer() {
        let mut input = InputState::default();
        input.press("KeyA");
        input.add_pointer_delta(1.0, 1.0);
        input.clear();
        assert!(input.take_frame().is_idle());
    }

    #[test]
    fn custom_bindings() {
        let mut bindings = KeyBindings::empty();
        bindings.bind("KeyI", MoveIntent::Forward);
        let mut input = InputState::new(bindings);
        assert!(!input.press("KeyW"));
        assert!(input.press("KeyI"));
        assert_eq!(input.bindings().len(), 1);
        assert!(input.take_frame().intents.contains(&MoveIntent::Forward));
    }
}
