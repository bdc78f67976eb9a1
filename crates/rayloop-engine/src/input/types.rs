use std::fmt;

/// Keyboard key identifier.
///
/// The runtime maps platform keycodes into these variants where possible.
/// Unsupported keys come through as `Key::Unknown(u32)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

const LETTERS: [Key; 26] = [
    Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
    Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
    Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
];

const DIGITS: [Key; 10] = [
    Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
    Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
    Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
];

impl Key {
    /// Maps a browser-style integer key code (`KeyboardEvent.keyCode`) to a `Key`.
    ///
    /// Codes without a variant come back as `Key::Unknown(code)`.
    pub fn from_dom_code(code: u32) -> Key {
        match code {
            8 => Key::Backspace,
            9 => Key::Tab,
            13 => Key::Enter,
            16 => Key::Shift,
            17 => Key::Control,
            18 => Key::Alt,
            27 => Key::Escape,
            32 => Key::Space,
            33 => Key::PageUp,
            34 => Key::PageDown,
            35 => Key::End,
            36 => Key::Home,
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            45 => Key::Insert,
            46 => Key::Delete,
            48..=57 => DIGITS[(code - 48) as usize],
            65..=90 => LETTERS[(code - 65) as usize],
            91 => Key::Meta,
            112..=123 => FUNCTION_KEYS[(code - 112) as usize],
            other => Key::Unknown(other),
        }
    }

    /// Inverse of [`from_dom_code`](Self::from_dom_code); `None` for `Key::Unknown`.
    pub fn dom_code(self) -> Option<u32> {
        let code = match self {
            Key::Backspace => 8,
            Key::Tab => 9,
            Key::Enter => 13,
            Key::Shift => 16,
            Key::Control => 17,
            Key::Alt => 18,
            Key::Escape => 27,
            Key::Space => 32,
            Key::PageUp => 33,
            Key::PageDown => 34,
            Key::End => 35,
            Key::Home => 36,
            Key::ArrowLeft => 37,
            Key::ArrowUp => 38,
            Key::ArrowRight => 39,
            Key::ArrowDown => 40,
            Key::Insert => 45,
            Key::Delete => 46,
            Key::Meta => 91,
            Key::Unknown(_) => return None,
            other => {
                let pos = |table: &[Key]| table.iter().position(|k| *k == other);
                if let Some(i) = pos(&DIGITS) {
                    48 + i as u32
                } else if let Some(i) = pos(&LETTERS) {
                    65 + i as u32
                } else {
                    112 + pos(&FUNCTION_KEYS)? as u32
                }
            }
        };
        Some(code)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Movement direction commanded by the keyboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in the order movement is applied each tick.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];
}

/// The four direction flags.
///
/// Each flag is an independent held / not-held automaton.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DirectionFlags {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

impl DirectionFlags {
    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }

    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Right => self.right = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.right || self.down || self.left
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// Browser-style key code, 0 when the key has none.
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
