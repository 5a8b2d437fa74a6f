/// Keys the core reacts to. Hosts translate platform key codes into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

/// A camera movement direction. Each one is bound to an arrow key and a letter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveAction {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveAction {
    pub const ALL: [MoveAction; 4] = [
        MoveAction::Forward,
        MoveAction::Back,
        MoveAction::Left,
        MoveAction::Right,
    ];

    /// The two keys that trigger this action.
    pub fn keys(self) -> [Key; 2] {
        match self {
            MoveAction::Forward => [Key::ArrowUp, Key::W],
            MoveAction::Back => [Key::ArrowDown, Key::S],
            MoveAction::Left => [Key::ArrowLeft, Key::A],
            MoveAction::Right => [Key::ArrowRight, Key::D],
        }
    }
}
