/// Win / lose rules.
///
/// Pure functions over cell positions, so the scheduler, the renderer and
/// tests all classify a position the same way.

use super::grid::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    InProgress,
    PlayerWins,
    PursuerWins,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Classify a position.
///
/// The player check runs first: if both actors stand on the goal in the
/// same evaluation, the player wins.
pub fn evaluate(player: Cell, pursuer: Cell, goal: Cell) -> Outcome {
    if player == goal {
        Outcome::PlayerWins
    } else if pursuer == goal {
        Outcome::PursuerWins
    } else {
        Outcome::InProgress
    }
}

/// Both actors share a cell. Only a visual state, never terminal by itself.
pub fn is_collision(player: Cell, pursuer: Cell) -> bool {
    player == pursuer
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GOAL: Cell = Cell::new(3, 3);

    #[rstest]
    #[case::player_on_goal(Cell::new(3, 3), Cell::new(1, 1), Outcome::PlayerWins)]
    #[case::pursuer_on_goal(Cell::new(1, 1), Cell::new(3, 3), Outcome::PursuerWins)]
    #[case::both_on_goal(Cell::new(3, 3), Cell::new(3, 3), Outcome::PlayerWins)]
    #[case::neither(Cell::new(1, 1), Cell::new(1, 2), Outcome::InProgress)]
    #[case::shared_cell_off_goal(Cell::new(2, 2), Cell::new(2, 2), Outcome::InProgress)]
    fn evaluate_positions(#[case] player: Cell, #[case] pursuer: Cell, #[case] expected: Outcome) {
        assert_eq!(evaluate(player, pursuer, GOAL), expected);
    }

    #[test]
    fn terminal_flags() {
        assert!(!Outcome::InProgress.is_terminal());
        assert!(Outcome::PlayerWins.is_terminal());
        assert!(Outcome::PursuerWins.is_terminal());
    }

    #[test]
    fn collision_is_same_cell() {
        assert!(is_collision(Cell::new(2, 2), Cell::new(2, 2)));
        assert!(!is_collision(Cell::new(2, 2), Cell::new(2, 3)));
    }
}
