/// Events emitted during a simulation tick.
/// The presentation layer consumes these for status text and logging.

use crate::domain::entity::MoveCommand;
use crate::domain::grid::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PlayerMoved { from: Cell, to: Cell },
    PlayerBumped { at: Cell, command: MoveCommand },
    PursuerMoved { from: Cell, to: Cell },
    PursuerStalled { at: Cell },
    Collision { at: Cell },
    PlayerWon,
    PursuerWon,
}
