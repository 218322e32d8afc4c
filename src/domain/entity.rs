/// Actors' vocabulary: move commands and whose turn it is.

/// A player move. Produced by the input boundary, consumed at most once
/// per player turn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveCommand {
    Up,
    Down,
    Left,
    Right,
}

impl MoveCommand {
    #[cfg(test)]
    pub const ALL: [MoveCommand; 4] = [
        MoveCommand::Up,
        MoveCommand::Down,
        MoveCommand::Left,
        MoveCommand::Right,
    ];

    /// `(drow, dcol)` step for this command.
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveCommand::Up    => (-1, 0),
            MoveCommand::Down  => (1, 0),
            MoveCommand::Left  => (0, -1),
            MoveCommand::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Turn {
    Player,
    Pursuer,
}

impl Turn {
    pub fn other(self) -> Turn {
        match self {
            Turn::Player => Turn::Pursuer,
            Turn::Pursuer => Turn::Player,
        }
    }
}
