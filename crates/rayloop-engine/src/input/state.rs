use std::collections::HashSet;

use super::bindings::KeyBindings;
use super::types::{Direction, DirectionFlags, InputEvent, Key, KeyState};

/// How a key release affects directions that other held keys also drive.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ReleasePolicy {
    /// Releasing any bound key clears its directions, even while another key bound
    /// to the same direction is still held.
    #[default]
    Lossy,

    /// A direction stays set while at least one held key is bound to it.
    Counted,
}

/// Current directional input state for a single loop.
///
/// Holds the four direction flags plus the set of held keys.
#[derive(Debug)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    flags: DirectionFlags,
    bindings: KeyBindings,
    release_policy: ReleasePolicy,
}

impl InputState {
    pub fn new(bindings: KeyBindings, release_policy: ReleasePolicy) -> Self {
        Self {
            focused: true,
            keys_down: HashSet::new(),
            flags: DirectionFlags::default(),
            bindings,
            release_policy,
        }
    }

    /// Applies a platform-agnostic input event.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Key {
                key,
                state,
                code,
                repeat,
            } => {
                log::trace!(
                    "key {key} (code {code}) {state:?}{}",
                    if *repeat { " repeat" } else { "" }
                );

                // Auto-repeat presses go through the same path; they re-set a
                // direction that a sibling key's release cleared.
                match state {
                    KeyState::Pressed => self.on_key_down(*key),
                    KeyState::Released => self.on_key_up(*key),
                }
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Key-up events are not delivered while unfocused.
                    self.keys_down.clear();
                    self.flags = DirectionFlags::default();
                }
            }
        }
    }

    /// Marks `key` held and sets every direction bound to it.
    pub fn on_key_down(&mut self, key: Key) {
        self.keys_down.insert(key);
        for &dir in self.bindings.directions(key) {
            self.flags.set(dir, true);
        }
    }

    /// Marks `key` released and clears the directions bound to it, per the release policy.
    pub fn on_key_up(&mut self, key: Key) {
        self.keys_down.remove(&key);
        for &dir in self.bindings.directions(key) {
            let still_held = match self.release_policy {
                ReleasePolicy::Lossy => false,
                ReleasePolicy::Counted => self.held_key_drives(dir),
            };
            if !still_held {
                self.flags.set(dir, false);
            }
        }
    }

    fn held_key_drives(&self, dir: Direction) -> bool {
        self.keys_down
            .iter()
            .any(|k| self.bindings.is_bound(*k, dir))
    }

    // Helper queries
    pub fn flags(&self) -> DirectionFlags {
        self.flags
    }

    pub fn is_moving(&self, dir: Direction) -> bool {
        self.flags.get(dir)
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn release_policy(&self) -> ReleasePolicy {
        self.release_policy
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default(), ReleasePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn starts_with_no_direction_held() {
        let input = InputState::default();
        assert_eq!(input.flags(), DirectionFlags::default());
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut input = InputState::default();
        input.on_key_down(Key::ArrowUp);
        input.on_key_down(Key::ArrowUp);
        input.on_key_down(Key::ArrowUp);
        assert!(input.is_moving(Direction::Up));

        input.on_key_up(Key::ArrowUp);
        assert!(!input.is_moving(Direction::Up));
        assert!(!input.key_down(Key::ArrowUp));
    }

    #[test]
    fn every_bound_key_sets_its_direction() {
        let cases = [
            (Key::W, Direction::Up),
            (Key::Z, Direction::Up),
            (Key::D, Direction::Right),
            (Key::ArrowDown, Direction::Down),
            (Key::S, Direction::Down),
            (Key::A, Direction::Left),
            (Key::Q, Direction::Left),
        ];
        for (k, dir) in cases {
            let mut input = InputState::default();
            input.on_key_down(k);
            assert!(input.is_moving(dir), "{k} should drive {dir:?}");
            for other in Direction::ALL.into_iter().filter(|d| *d != dir) {
                assert!(!input.is_moving(other));
            }
        }
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputState::default();
        input.on_key_down(Key::Space);
        input.on_key_down(Key::Unknown(4242));
        assert!(!input.flags().any());
        input.on_key_up(Key::Space);
        assert!(!input.flags().any());
    }

    #[test]
    fn lossy_release_clears_direction_while_sibling_is_held() {
        let mut input = InputState::default();
        input.on_key_down(Key::W);
        input.on_key_down(Key::Z);
        input.on_key_up(Key::W);

        assert!(input.key_down(Key::Z));
        assert!(!input.is_moving(Direction::Up));
    }

    #[test]
    fn counted_release_keeps_direction_while_sibling_is_held() {
        let mut input = InputState::new(KeyBindings::default(), ReleasePolicy::Counted);
        input.on_key_down(Key::W);
        input.on_key_down(Key::Z);

        input.on_key_up(Key::W);
        assert!(input.is_moving(Direction::Up));

        input.on_key_up(Key::Z);
        assert!(!input.is_moving(Direction::Up));
    }

    #[test]
    fn apply_event_dispatches_key_states() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::ArrowRight, KeyState::Pressed));
        input.apply_event(&key(Key::ArrowUp, KeyState::Pressed));
        assert_eq!(
            input.flags(),
            DirectionFlags {
                up: true,
                right: true,
                down: false,
                left: false,
            }
        );

        input.apply_event(&key(Key::ArrowRight, KeyState::Released));
        assert!(!input.is_moving(Direction::Right));
        assert!(input.is_moving(Direction::Up));
    }

    #[test]
    fn auto_repeat_restores_direction_after_sibling_release() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::W, KeyState::Pressed));
        input.apply_event(&key(Key::Z, KeyState::Pressed));
        input.apply_event(&key(Key::W, KeyState::Released));
        assert!(!input.is_moving(Direction::Up));

        input.apply_event(&InputEvent::Key {
            key: Key::Z,
            state: KeyState::Pressed,
            code: 90,
            repeat: true,
        });
        assert!(input.is_moving(Direction::Up));
        assert!(input.key_down(Key::Z));
    }

    #[test]
    fn focus_loss_clears_held_keys_and_flags() {
        let mut input = InputState::default();
        input.apply_event(&key(Key::A, KeyState::Pressed));
        input.apply_event(&key(Key::S, KeyState::Pressed));

        input.apply_event(&InputEvent::Focused(false));
        assert!(!input.focused);
        assert!(input.keys_down.is_empty());
        assert!(!input.flags().any());
    }
}
