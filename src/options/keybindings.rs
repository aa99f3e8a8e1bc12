use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// Bindings used when nothing else is configured.
const DEFAULT_BINDINGS: [(KeyAction, &str); 2] =
    [(KeyAction::Unlock, "Escape"), (KeyAction::ToggleLigands, "KeyL")];

/// Session key bindings (`KeyboardEvent.code` strings).
///
/// A preset only needs to list the actions it rebinds; the others keep
/// their defaults. Each key drives at most one action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeybindingOptions {
    /// Action → key (e.g. `Unlock` → `"Escape"`).
    pub bindings: HashMap<KeyAction, String>,
    #[serde(skip)]
    by_key: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let mut opts = Self {
            bindings: HashMap::new(),
            by_key: HashMap::new(),
        };
        opts.fill_defaults();
        opts
    }
}

impl KeybindingOptions {
    /// Give every unbound action its default key, unless that key is
    /// already taken, then refresh the key index.
    pub fn fill_defaults(&mut self) {
        for (action, key) in DEFAULT_BINDINGS {
            let taken = self.bindings.values().any(|k| k == key);
            if !taken {
                let _ = self.bindings.entry(action).or_insert_with(|| key.to_owned());
            }
        }
        self.rebuild_reverse_map();
    }

    /// Refresh the key → action index from `bindings`.
    pub fn rebuild_reverse_map(&mut self) {
        self.by_key = self
            .bindings
            .iter()
            .map(|(action, key)| (key.clone(), *action))
            .collect();
    }

    /// Bind `key` to `action`, unbinding whatever action held it before.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let key = key.into();
        self.bindings.retain(|a, k| *a == action || *k != key);
        let _ = self.bindings.insert(action, key);
        self.rebuild_reverse_map();
    }

    /// Key bound to `action`.
    #[must_use]
    pub fn key_for(&self, action: KeyAction) -> Option<&str> {
        self.bindings.get(&action).map(String::as_str)
    }

    /// Action bound to `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.by_key.get(key).copied()
    }
}
