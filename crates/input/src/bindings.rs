use blockview_common::MoveIntent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key name to movement intent.
///
/// Key names are the `Debug` spelling of winit's `KeyCode` (`"KeyW"`,
/// `"ArrowUp"`), so bindings can live in a config file without the input
/// crate depending on a windowing library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, MoveIntent>,
}

impl Default for KeyBindings {
    /// WASD plus the arrow keys.
    fn default() -> Self {
        let map = [
            ("KeyW", MoveIntent::Forward),
            ("KeyS", MoveIntent::Backward),
            ("KeyA", MoveIntent::Left),
            ("KeyD", MoveIntent::Right),
            ("ArrowUp", MoveIntent::Forward),
            ("ArrowDown", MoveIntent::Backward),
            ("ArrowLeft", MoveIntent::Left),
            ("ArrowRight", MoveIntent::Right),
        ]
        .into_iter()
        .map(|(k, i)| (k.to_string(), i))
        .collect();
        Self { map }
    }
}

impl KeyBindings {
    /// No keys bound.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Defaults with `overrides` applied on top.
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a String, &'a MoveIntent)>,
    ) -> Self {
        let mut bindings = Self::default();
        for (key, intent) in overrides {
            bindings.bind(key.clone(), *intent);
        }
        bindings
    }

    /// Bind `key`, replacing any previous intent for it.
    pub fn bind(&mut self, key: impl Into<String>, intent: MoveIntent) -> Option<MoveIntent> {
        self.map.insert(key.into(), intent)
    }

    pub fn unbind(&mut self, key: &str) -> Option<MoveIntent> {
        self.map.remove(key)
    }

    pub fn intent_for(&self, key: &str) -> Option<MoveIntent> {
        self.map.get(key).copied()
    }

    /// Keys bound to `intent`, in name order.
    pub fn keys_for(&self, intent: MoveIntent) -> impl Iterator<Item = &str> + '_ {
        self.map
            .iter()
            .filter(move |(_, i)| **i == intent)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_intent_twice() {
        let b = KeyBindings::default();
        assert_eq!(b.len(), 8);
        for intent in MoveIntent::ALL {
            assert_eq!(b.keys_for(intent).count(), 2, "{intent:?}");
        }
        assert_eq!(b.intent_for("KeyW"), Some(MoveIntent::Forward));
        assert_eq!(b.intent_for("ArrowLeft"), Some(MoveIntent::Left));
        assert_eq!(b.intent_for("KeyQ"), None);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let overrides: BTreeMap<String, MoveIntent> = [
            ("KeyW".to_string(), MoveIntent::Backward),
            ("KeyI".to_string(), MoveIntent::Forward),
        ]
        .into_iter()
        .collect();
        let b = KeyBindings::with_overrides(&overrides);
        assert_eq!(b.intent_for("KeyW"), Some(MoveIntent::Backward));
        assert_eq!(b.intent_for("KeyI"), Some(MoveIntent::Forward));
        assert_eq!(b.len(), 9);
    }

    #[test]
    fn deserializes_from_plain_map() {
        let b: KeyBindings = serde_yaml::from_str("KeyJ: left\nKeyL: right\n").unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.intent_for("KeyL"), Some(MoveIntent::Right));
    }

    #[test]
    fn unbind_removes_key() {
        let mut b = KeyBindings::default();
        assert_eq!(b.unbind("KeyA"), Some(MoveIntent::Left));
        assert_eq!(b.intent_for("KeyA"), None);
        assert!(KeyBindings::empty().is_empty());
    }
}
