use crate::action::{Key, MoveAction};
use glam::Vec2;
use std::collections::HashSet;

/// Read side of the input collaborator, sampled once per tick.
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;

    /// Cursor position in window pixels.
    fn mouse_position(&self) -> Vec2;

    /// True when either key bound to `action` is held.
    fn is_action_active(&self, action: MoveAction) -> bool {
        action.keys().into_iter().any(|k| self.is_key_down(k))
    }
}

/// Snapshot of held keys and cursor position.
///
/// The host writes events into it between ticks; the camera reads it during
/// a tick. Both happen on the same thread, so no synchronization is used.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    mouse: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            if self.keys_down.insert(key) {
                tracing::trace!(?key, "key down");
            }
        } else if self.keys_down.remove(&key) {
            tracing::trace!(?key, "key up");
        }
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse = Vec2::new(x, y);
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear_keys(&mut self) {
        self.keys_down.clear();
    }

    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys_down.iter().copied()
    }
}

impl InputSource for InputState {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    fn mouse_position(&self) -> Vec2 {
        self.mouse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut input = InputState::new();
        input.set_key(Key::W, true);
        assert!(input.is_key_down(Key::W));
        assert!(input.is_action_active(MoveAction::Forward));
        input.set_key(Key::W, false);
        assert!(!input.is_key_down(Key::W));
        assert!(!input.is_action_active(MoveAction::Forward));
    }

    #[test]
    fn either_binding_activates_action() {
        let mut input = InputState::new();
        input.set_key(Key::ArrowLeft, true);
        assert!(input.is_action_active(MoveAction::Left));
        assert!(!input.is_action_active(MoveAction::Right));
    }

    #[test]
    fn mouse_position_is_stored() {
        let mut input = InputState::new();
        input.set_mouse_position(12.0, -4.5);
        assert_eq!(input.mouse_position(), Vec2::new(12.0, -4.5));
    }

    #[test]
    fn clear_keys_releases_everything() {
        let mut input = InputState::new();
        input.set_key(Key::A, true);
        input.set_key(Key::ArrowUp, true);
        input.clear_keys();
        assert_eq!(input.keys_down().count(), 0);
    }
}
