/// Move-command FIFO between the input boundary and the scheduler.
///
/// One producer (keyboard / gamepad polling), one consumer (the tick).
/// Backed by an mpsc channel so the producer half can live on another
/// thread. Only already-recognised `MoveCommand`s can be sent; raw input
/// is filtered before it gets here.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::domain::entity::MoveCommand;

#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: Sender<MoveCommand>,
}

#[derive(Debug)]
pub struct CommandReceiver {
    rx: Receiver<MoveCommand>,
}

pub fn command_queue() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

impl CommandSender {
    /// Enqueue a command. Returns false if the receiver is gone.
    pub fn push(&self, cmd: MoveCommand) -> bool {
        self.tx.send(cmd).is_ok()
    }
}

impl CommandReceiver {
    /// Dequeue the oldest command without blocking.
    pub fn pop(&self) -> Option<MoveCommand> {
        match self.rx.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Throw away everything queued (used when a new session starts).
    pub fn clear(&self) {
        while self.pop().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let (tx, rx) = command_queue();
        tx.push(MoveCommand::Up);
        tx.push(MoveCommand::Left);
        assert_eq!(rx.pop(), Some(MoveCommand::Up));
        assert_eq!(rx.pop(), Some(MoveCommand::Left));
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn producer_on_another_thread() {
        let (tx, rx) = command_queue();
        let handle = std::thread::spawn(move || {
            for cmd in MoveCommand::ALL {
                assert!(tx.push(cmd));
            }
        });
        handle.join().unwrap();
        let drained: Vec<_> = std::iter::from_fn(|| rx.pop()).collect();
        assert_eq!(drained, MoveCommand::ALL.to_vec());
    }

    #[test]
    fn push_after_receiver_dropped_reports_failure() {
        let (tx, rx) = command_queue();
        drop(rx);
        assert!(!tx.push(MoveCommand::Down));
    }

    #[test]
    fn clear_empties_queue() {
        let (tx, rx) = command_queue();
        tx.push(MoveCommand::Down);
        tx.push(MoveCommand::Down);
        rx.clear();
        assert_eq!(rx.pop(), None);
    }
}
