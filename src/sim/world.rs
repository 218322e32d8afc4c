/// WorldState: the complete state of one chase session.
///
/// Holds the static map and the three tokens (player, pursuer, goal) plus
/// whose turn it is. Positions change only through `apply_player_move` and
/// `advance_pursuer`; the map never changes.
///
/// ## Invariants (checked at construction only)
///   - player, pursuer and goal are on open terrain
///   - the three cells are pairwise distinct
///
/// After construction the player and pursuer may share a cell, and either
/// may stand on the goal. That is what the rules evaluate.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::entity::{MoveCommand, Turn};
use crate::domain::error::GameError;
use crate::domain::grid::{Cell, GridMap};
use crate::domain::path;
use crate::domain::rules::{self, Outcome};

/// What the pursuer did on its turn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PursuerStep {
    Moved { from: Cell, to: Cell },
    /// No walkable path to the goal.
    Stalled,
    /// Already standing on the goal.
    AtGoal,
    /// Called during the player's turn; nothing changed.
    OutOfTurn,
}

#[derive(Clone, Debug)]
pub struct WorldState {
    map: GridMap,
    player: Cell,
    pursuer: Cell,
    goal: Cell,
    turn: Turn,
}

impl WorldState {
    /// Random spawn by rejection sampling.
    ///
    /// Each attempt draws one cell uniformly from the whole grid and keeps
    /// it if it is open and not already taken. Player is placed first, then
    /// pursuer, then goal. `max_attempts` bounds the total draws across all
    /// three placements.
    pub fn spawn<R: Rng + ?Sized>(
        map: GridMap,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<WorldState, GameError> {
        if map.open_count() < 3 {
            warn!(open = map.open_count(), "map too small for three tokens");
            return Err(GameError::SpawnExhaustion { attempts: 0 });
        }

        let (rows, cols) = map.dimensions();
        let mut placed: Vec<Cell> = Vec::with_capacity(3);
        let mut attempts = 0;

        while placed.len() < 3 {
            if attempts >= max_attempts {
                warn!(attempts, placed = placed.len(), "spawn attempts exhausted");
                return Err(GameError::SpawnExhaustion { attempts });
            }
            attempts += 1;

            let cell = Cell::new(rng.gen_range(0..rows) as i32, rng.gen_range(0..cols) as i32);
            if map.is_walkable(cell) && !placed.contains(&cell) {
                placed.push(cell);
            }
        }

        debug!(attempts, "spawn placed all tokens");
        WorldState::with_positions(map, placed[0], placed[1], placed[2])
    }

    /// Explicit placement. Fails if any cell is blocked or two coincide.
    pub fn with_positions(
        map: GridMap,
        player: Cell,
        pursuer: Cell,
        goal: Cell,
    ) -> Result<WorldState, GameError> {
        for cell in [player, pursuer, goal] {
            if !map.in_bounds(cell) {
                return Err(GameError::InvalidPlacement { cell, reason: "out of bounds" });
            }
            if !map.is_walkable(cell) {
                return Err(GameError::InvalidPlacement { cell, reason: "on a wall" });
            }
        }
        if player == pursuer || player == goal {
            return Err(GameError::InvalidPlacement { cell: player, reason: "cell already taken" });
        }
        if pursuer == goal {
            return Err(GameError::InvalidPlacement { cell: pursuer, reason: "cell already taken" });
        }

        info!(%player, %pursuer, %goal, "session created");
        Ok(WorldState { map, player, pursuer, goal, turn: Turn::Player })
    }

    pub fn map(&self) -> &GridMap { &self.map }
    pub fn player(&self) -> Cell { self.player }
    pub fn pursuer(&self) -> Cell { self.pursuer }
    pub fn goal(&self) -> Cell { self.goal }
    pub fn turn(&self) -> Turn { self.turn }

    pub fn outcome(&self) -> Outcome {
        rules::evaluate(self.player, self.pursuer, self.goal)
    }

    pub fn is_collision(&self) -> bool {
        rules::is_collision(self.player, self.pursuer)
    }

    /// Step the player one cell. Bumping a wall or the map edge leaves the
    /// player in place. Either way the turn passes to the pursuer.
    /// Returns whether the player moved.
    pub fn apply_player_move(&mut self, cmd: MoveCommand) -> bool {
        let (dr, dc) = cmd.delta();
        let candidate = self.player.offset(dr, dc);
        let moved = self.map.is_walkable(candidate);
        if moved {
            self.player = candidate;
        }
        self.turn = Turn::Pursuer;
        moved
    }

    /// Move the pursuer one step along a shortest path to the goal.
    ///
    /// With no path, or when already on the goal, the pursuer stays put.
    /// The turn passes back to the player in every case except
    /// `OutOfTurn`.
    pub fn advance_pursuer(&mut self) -> PursuerStep {
        if self.turn != Turn::Pursuer {
            warn!("advance_pursuer called on the player's turn");
            return PursuerStep::OutOfTurn;
        }
        self.turn = self.turn.other();

        match path::find_path(&self.map, self.pursuer, self.goal) {
            Some(p) => match p.next_step() {
                Some(to) => {
                    let from = self.pursuer;
                    debug_assert!(p.start() == from && p.target() == self.goal);
                    debug_assert!(from.is_adjacent(to), "{from} -> {to} is not one step");
                    self.pursuer = to;
                    debug!(%from, %to, remaining = p.steps() - 1, "pursuer moved");
                    PursuerStep::Moved { from, to }
                }
                None => PursuerStep::AtGoal,
            },
            None => {
                debug!(pursuer = %self.pursuer, goal = %self.goal, "pursuer has no path");
                PursuerStep::Stalled
            }
        }
    }
}
