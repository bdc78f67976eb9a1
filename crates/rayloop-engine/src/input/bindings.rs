use std::collections::HashMap;

use super::types::{Direction, Key};

/// Key-to-direction binding table.
///
/// One key may drive several directions and several keys may drive one direction.
/// Both key-down and key-up handling consult the same table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Key, Vec<Direction>>,
}

impl KeyBindings {
    /// A table with no bindings.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Binds `key` to `dir`. Binding the same pair twice has no effect.
    pub fn bind(&mut self, key: Key, dir: Direction) -> &mut Self {
        let dirs = self.map.entry(key).or_default();
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
        self
    }

    /// Removes every binding of `key`.
    pub fn unbind(&mut self, key: Key) {
        self.map.remove(&key);
    }

    /// Directions bound to `key`; empty for unbound keys.
    pub fn directions(&self, key: Key) -> &[Direction] {
        self.map.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `key` drives `dir`.
    pub fn is_bound(&self, key: Key, dir: Direction) -> bool {
        self.directions(key).contains(&dir)
    }
}

impl Default for KeyBindings {
    /// Arrow keys plus both WASD and ZQSD letter layouts.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(Key::ArrowUp, Direction::Up)
            .bind(Key::W, Direction::Up)
            .bind(Key::Z, Direction::Up)
            .bind(Key::ArrowRight, Direction::Right)
            .bind(Key::D, Direction::Right)
            .bind(Key::ArrowDown, Direction::Down)
            .bind(Key::S, Direction::Down)
            .bind(Key::ArrowLeft, Direction::Left)
            .bind(Key::A, Direction::Left)
            .bind(Key::Q, Direction::Left);
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_layouts() {
        let b = KeyBindings::default();
        for key in [Key::ArrowUp, Key::W, Key::Z] {
            assert_eq!(b.directions(key), &[Direction::Up]);
        }
        for key in [Key::ArrowRight, Key::D] {
            assert_eq!(b.directions(key), &[Direction::Right]);
        }
        for key in [Key::ArrowDown, Key::S] {
            assert_eq!(b.directions(key), &[Direction::Down]);
        }
        for key in [Key::ArrowLeft, Key::A, Key::Q] {
            assert_eq!(b.directions(key), &[Direction::Left]);
        }
    }

    #[test]
    fn unbound_key_has_no_directions() {
        let b = KeyBindings::default();
        assert!(b.directions(Key::Space).is_empty());
        assert!(b.directions(Key::Unknown(999)).is_empty());
    }

    #[test]
    fn one_key_can_drive_several_directions() {
        let mut b = KeyBindings::empty();
        b.bind(Key::E, Direction::Up).bind(Key::E, Direction::Right);
        b.bind(Key::E, Direction::Up);
        assert_eq!(b.directions(Key::E), &[Direction::Up, Direction::Right]);
        assert!(b.is_bound(Key::E, Direction::Right));
        assert!(!b.is_bound(Key::E, Direction::Down));
    }

    #[test]
    fn unbind_removes_all_directions() {
        let mut b = KeyBindings::default();
        b.unbind(Key::W);
        assert!(b.directions(Key::W).is_empty());
        assert_eq!(b.directions(Key::Z), &[Direction::Up]);
    }
}
