/// The step function: advances the session by one tick.
///
/// Two-state machine driven by `WorldState::turn`, starting on the player:
///   - player turn:  pop one queued command and apply it, which hands the
///                   turn to the pursuer. Nothing queued = idle tick.
///   - pursuer turn: move the pursuer one step, turn goes back to the player.
///
/// The turn lives in `WorldState` only. At most one actor moves per tick. The outcome is evaluated after
/// every transition; once it is terminal, later ticks change nothing and
/// leave the queue untouched. Ticks are paced by the caller.

use tracing::{info, warn};

use crate::domain::entity::Turn;
use crate::domain::rules::Outcome;
use super::event::GameEvent;
use super::queue::CommandReceiver;
use super::world::{PursuerStep, WorldState};

/// Result of one tick, for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    pub outcome: Outcome,
    /// No transition happened (waiting for input, or game already over).
    pub idle: bool,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    outcome: Outcome,
    transitions: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            outcome: Outcome::InProgress,
            transitions: 0,
        }
    }

    pub fn outcome(&self) -> Outcome { self.outcome }

    /// Non-idle ticks so far.
    pub fn transitions(&self) -> u64 { self.transitions }

    pub fn tick(&mut self, world: &mut WorldState, commands: &CommandReceiver) -> TickReport {
        if self.outcome.is_terminal() {
            return self.idle_report();
        }

        let mut events = Vec::new();

        match world.turn() {
            Turn::Player => {
                let Some(cmd) = commands.pop() else {
                    return self.idle_report();
                };
                let from = world.player();
                if world.apply_player_move(cmd) {
                    events.push(GameEvent::PlayerMoved { from, to: world.player() });
                } else {
                    events.push(GameEvent::PlayerBumped { at: from, command: cmd });
                }
            }
            Turn::Pursuer => {
                match world.advance_pursuer() {
                    PursuerStep::Moved { from, to } => {
                        events.push(GameEvent::PursuerMoved { from, to });
                    }
                    PursuerStep::Stalled => {
                        events.push(GameEvent::PursuerStalled { at: world.pursuer() });
                    }
                    PursuerStep::AtGoal => {}
                    PursuerStep::OutOfTurn => {
                        // Unreachable while the turn is read from the world.
                        warn!("pursuer refused its own turn");
                        return self.idle_report();
                    }
                }
            }
        }
        self.transitions += 1;

        if world.is_collision() {
            events.push(GameEvent::Collision { at: world.player() });
        }

        self.outcome = world.outcome();
        match self.outcome {
            Outcome::PlayerWins => {
                info!(transitions = self.transitions, "player reached the goal");
                events.push(GameEvent::PlayerWon);
            }
            Outcome::PursuerWins => {
                info!(transitions = self.transitions, "pursuer reached the goal");
                events.push(GameEvent::PursuerWon);
            }
            Outcome::InProgress => {}
        }

        TickReport { events, outcome: self.outcome, idle: false }
    }

    fn idle_report(&self) -> TickReport {
        TickReport { events: Vec::new(), outcome: self.outcome, idle: true }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::MoveCommand;
    use crate::domain::grid::{Cell, GridMap};
    use crate::sim::queue::{command_queue, CommandSender};

    fn open_5x5() -> GridMap {
        GridMap::parse(&[
            "*****",
            "*...*",
            "*...*",
            "*...*",
            "*****",
        ]).unwrap()
    }

    fn setup(player: Cell, pursuer: Cell, goal: Cell) -> (WorldState, Scheduler, CommandSender, CommandReceiver) {
        let world = WorldState::with_positions(open_5x5(), player, pursuer, goal).unwrap();
        let (tx, rx) = command_queue();
        (world, Scheduler::new(), tx, rx)
    }

    #[test]
    fn idle_without_input() {
        let (mut w, mut s, _tx, rx) = setup(Cell::new(1, 1), Cell::new(1, 3), Cell::new(3, 3));
        for _ in 0..5 {
            let r = s.tick(&mut w, &rx);
            assert!(r.idle);
            assert!(r.events.is_empty());
        }
        assert_eq!(w.turn(), Turn::Player);
        assert_eq!(w.pursuer(), Cell::new(1, 3));
        assert_eq!(s.transitions(), 0);
    }

    #[test]
    fn one_actor_per_tick() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(2, 2), Cell::new(1, 1), Cell::new(3, 3));
        tx.push(MoveCommand::Up);
        tx.push(MoveCommand::Up);

        let r = s.tick(&mut w, &rx);
        assert_eq!(r.events, vec![GameEvent::PlayerMoved { from: Cell::new(2, 2), to: Cell::new(1, 2) }]);
        assert_eq!(w.pursuer(), Cell::new(1, 1));
        assert_eq!(w.turn(), Turn::Pursuer);

        // Second command stays queued while the pursuer moves.
        let r = s.tick(&mut w, &rx);
        assert_eq!(r.events, vec![GameEvent::PursuerMoved { from: Cell::new(1, 1), to: Cell::new(2, 1) }]);
        assert_eq!(w.player(), Cell::new(1, 2));
        assert_eq!(rx.pop(), Some(MoveCommand::Up));
    }

    #[test]
    fn pursuer_phase_does_not_need_input() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(2, 2), Cell::new(1, 1), Cell::new(3, 3));
        tx.push(MoveCommand::Right);
        s.tick(&mut w, &rx);
        let r = s.tick(&mut w, &rx);
        assert!(!r.idle);
        assert_eq!(w.turn(), Turn::Player);
    }

    #[test]
    fn bump_still_consumes_turn() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(1, 1), Cell::new(1, 3), Cell::new(3, 3));
        tx.push(MoveCommand::Left);
        let r = s.tick(&mut w, &rx);
        assert_eq!(r.events, vec![GameEvent::PlayerBumped { at: Cell::new(1, 1), command: MoveCommand::Left }]);
        assert_eq!(w.player(), Cell::new(1, 1));
        assert_eq!(w.turn(), Turn::Pursuer);
    }

    fn walled_goal_world() -> WorldState {
        let map = GridMap::parse(&[
            "*******",
            "*..*..*",
            "*.*.*.*",
            "*..*..*",
            "*******",
        ]).unwrap();
        WorldState::with_positions(map, Cell::new(1, 5), Cell::new(1, 1), Cell::new(2, 3)).unwrap()
    }

    #[test]
    fn turn_parity_after_n_transitions() {
        // Goal unreachable for both, so the session outlasts the loop.
        let mut w = walled_goal_world();
        let mut s = Scheduler::new();
        let (tx, rx) = command_queue();
        for n in 1..=20u64 {
            if w.turn() == Turn::Player {
                tx.push(if n % 4 == 1 { MoveCommand::Down } else { MoveCommand::Up });
            }
            let r = s.tick(&mut w, &rx);
            assert!(!r.idle);
            let expected = if n % 2 == 0 { Turn::Player } else { Turn::Pursuer };
            assert_eq!(w.turn(), expected, "after {n} ticks");
            assert_eq!(s.transitions(), n);
        }
    }

    #[test]
    fn player_reaches_goal_without_pursuer_move() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(1, 2), Cell::new(1, 3), Cell::new(1, 1));
        tx.push(MoveCommand::Left);
        let r = s.tick(&mut w, &rx);
        assert_eq!(r.outcome, Outcome::PlayerWins);
        assert_eq!(r.events.last(), Some(&GameEvent::PlayerWon));
        assert_eq!(w.pursuer(), Cell::new(1, 3));
    }

    #[test]
    fn pursuer_wins_race() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(1, 1), Cell::new(3, 2), Cell::new(3, 3));
        tx.push(MoveCommand::Up); // bump
        s.tick(&mut w, &rx);
        let r = s.tick(&mut w, &rx);
        assert_eq!(r.outcome, Outcome::PursuerWins);
        assert!(r.events.contains(&GameEvent::PursuerWon));
    }

    #[test]
    fn terminal_outcome_freezes_session() {
        let (mut w, mut s, tx, rx) = setup(Cell::new(1, 2), Cell::new(1, 3), Cell::new(1, 1));
        tx.push(MoveCommand::Left);
        s.tick(&mut w, &rx);
        assert_eq!(s.outcome(), Outcome::PlayerWins);

        tx.push(MoveCommand::Right);
        let (player, pursuer) = (w.player(), w.pursuer());
        for _ in 0..4 {
            let r = s.tick(&mut w, &rx);
            assert!(r.idle);
            assert_eq!(r.outcome, Outcome::PlayerWins);
        }
        assert_eq!((w.player(), w.pursuer()), (player, pursuer));
        // The command was never consumed.
        assert_eq!(rx.pop(), Some(MoveCommand::Right));
    }

    #[test]
    fn collision_reported_but_not_terminal() {
        let map = GridMap::parse(&["*****", "*...*", "*****"]).unwrap();
        let mut w = WorldState::with_positions(map, Cell::new(1, 2), Cell::new(1, 1), Cell::new(1, 3)).unwrap();
        let mut s = Scheduler::new();
        let (tx, rx) = command_queue();
        tx.push(MoveCommand::Up);
        s.tick(&mut w, &rx);
        let r = s.tick(&mut w, &rx);
        assert!(r.events.contains(&GameEvent::Collision { at: Cell::new(1, 2) }));
        assert_eq!(r.outcome, Outcome::InProgress);
    }

    #[test]
    fn walled_in_goal_never_ends() {
        let mut w = walled_goal_world();
        let mut s = Scheduler::new();
        let (tx, rx) = command_queue();
        for i in 0..100 {
            if w.turn() == Turn::Player {
                tx.push(if i % 4 == 0 { MoveCommand::Down } else { MoveCommand::Up });
            }
            let r = s.tick(&mut w, &rx);
            assert_eq!(r.outcome, Outcome::InProgress);
        }
        assert_eq!(w.pursuer(), Cell::new(1, 1));
        assert_eq!(s.transitions(), 100);
    }

    #[test]
    fn follows_turn_changed_outside_scheduler() {
        // A move applied directly to the session hands the turn to the
        // pursuer; the next tick must move the pursuer and leave the
        // queued command alone.
        let (mut w, mut s, tx, rx) = setup(Cell::new(2, 2), Cell::new(1, 1), Cell::new(3, 3));
        w.apply_player_move(MoveCommand::Up);
        tx.push(MoveCommand::Down);

        let r = s.tick(&mut w, &rx);
        assert_eq!(r.events, vec![GameEvent::PursuerMoved { from: Cell::new(1, 1), to: Cell::new(2, 1) }]);
        assert_eq!(w.turn(), Turn::Player);
        assert_eq!(rx.pop(), Some(MoveCommand::Down));
    }
}
