//! Calls into untrusted participants, made safe to await.
//!
//! Each call runs as a job on a worker pool, while the referee waits for the answer on a channel
//! for a bounded amount of time. A participant that errors, panics, or never answers only ever
//! produces a [`CallFailure`]: the referee keeps going either way.

use crate::board::Board;
use crate::city::Destination;
use crate::color::RailColor;
use crate::participant::{Participant, ParticipantError, ParticipantResult, TurnAction};
use crate::view::ActiveView;

use std::collections::BTreeSet;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use threadpool::ThreadPool;

/// Why a call into a participant did not produce a usable answer.
#[derive(Debug, Error, PartialEq)]
pub enum CallFailure {
    #[error("{0}")]
    Misbehaved(ParticipantError),
    #[error("No answer within {} ms.", .0.as_millis())]
    TimedOut(Duration),
    #[error("Participant crashed while answering.")]
    Crashed,
}

pub type CallResult<T> = Result<T, CallFailure>;

/// A named participant, only reachable through timed calls on a worker pool.
pub struct IsolatedParticipant {
    name: String,
    participant: Arc<Mutex<Box<dyn Participant>>>,
    pool: ThreadPool,
    timeout: Duration,
}

impl IsolatedParticipant {
    /// `pool` is shared by all participants of a game: it needs one worker per participant that
    /// may hang, plus one.
    pub fn new(
        name: impl Into<String>,
        participant: Box<dyn Participant>,
        pool: ThreadPool,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            participant: Arc::new(Mutex::new(participant)),
            pool,
            timeout,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `call` against the participant on the pool, and waits at most the timeout for it.
    ///
    /// Once timed out, the call is abandoned: whatever it eventually returns is dropped.
    /// A participant that panicked once is considered crashed for every later call too.
    pub fn call<T, F>(&self, call: F) -> CallResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Participant) -> ParticipantResult<T> + Send + 'static,
    {
        let participant = Arc::clone(&self.participant);
        // Room for one answer, so that a late participant never blocks its worker on sending.
        let (tx, rx) = mpsc::sync_channel(1);

        self.pool.execute(move || {
            let mut participant = match participant.lock() {
                Ok(participant) => participant,
                // Poisoned by an earlier panic: dropping `tx` reports a crash.
                Err(_) => return,
            };

            let answer = call(&mut **participant);
            // Nobody listens anymore if the call timed out.
            let _ = tx.send(answer);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(error)) => Err(CallFailure::Misbehaved(error)),
            Err(RecvTimeoutError::Timeout) => Err(CallFailure::TimedOut(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(CallFailure::Crashed),
        }
    }

    pub fn setup(&self, board: Arc<Board>, pieces: u32, cards: Vec<RailColor>) -> CallResult<()> {
        self.call(move |participant| participant.setup(&board, pieces, &cards))
    }

    pub fn choose_destinations(
        &self,
        offered: BTreeSet<Destination>,
    ) -> CallResult<BTreeSet<Destination>> {
        self.call(move |participant| participant.choose_destinations(&offered))
    }

    pub fn take_turn(&self, view: ActiveView) -> CallResult<TurnAction> {
        self.call(move |participant| participant.take_turn(&view))
    }

    pub fn receive_cards(&self, cards: Vec<RailColor>) -> CallResult<()> {
        self.call(move |participant| participant.receive_cards(&cards))
    }

    pub fn notify_outcome(&self, won: bool) -> CallResult<()> {
        self.call(move |participant| participant.notify_outcome(won))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::three_city_board;
    use std::thread;
    use std::time::Instant;

    #[derive(Clone, Copy)]
    enum Behavior {
        Answer,
        Fail,
        Panic,
        Hang,
    }

    struct Scripted(Behavior);

    impl Scripted {
        fn act(&self) -> ParticipantResult<()> {
            match self.0 {
                Behavior::Answer => Ok(()),
                Behavior::Fail => Err(ParticipantError::NoDecision(String::from("lost"))),
                Behavior::Panic => panic!("participant bug"),
                Behavior::Hang => {
                    thread::sleep(Duration::from_secs(2));
                    Ok(())
                }
            }
        }
    }

    impl Participant for Scripted {
        fn setup(&mut self, _: &Board, _: u32, _: &[RailColor]) -> ParticipantResult<()> {
            self.act()
        }

        fn choose_destinations(
            &mut self,
            offered: &BTreeSet<Destination>,
        ) -> ParticipantResult<BTreeSet<Destination>> {
            self.act().map(|_| offered.clone())
        }

        fn take_turn(&mut self, _: &ActiveView) -> ParticipantResult<TurnAction> {
            self.act().map(|_| TurnAction::DrawCards)
        }

        fn receive_cards(&mut self, _: &[RailColor]) -> ParticipantResult<()> {
            self.act()
        }

        fn notify_outcome(&mut self, _: bool) -> ParticipantResult<()> {
            self.act()
        }
    }

    fn isolated(behavior: Behavior, timeout: Duration) -> IsolatedParticipant {
        IsolatedParticipant::new("scripted", Box::new(Scripted(behavior)), ThreadPool::new(2), timeout)
    }

    #[test]
    fn call_answers() {
        let participant = isolated(Behavior::Answer, Duration::from_secs(1));

        assert_eq!(participant.name(), "scripted");
        assert_eq!(participant.setup(Arc::new(three_city_board()), 45, Vec::new()), Ok(()));
        assert_eq!(participant.notify_outcome(true), Ok(()));
    }

    #[test]
    fn call_fails() {
        let participant = isolated(Behavior::Fail, Duration::from_secs(1));

        assert_eq!(
            participant.receive_cards(vec![RailColor::Red]),
            Err(CallFailure::Misbehaved(ParticipantError::NoDecision(
                String::from("lost")
            )))
        );
    }

    #[test]
    fn call_panics() {
        let participant = isolated(Behavior::Panic, Duration::from_secs(1));

        assert_eq!(participant.notify_outcome(false), Err(CallFailure::Crashed));
        // The participant stays unusable afterwards.
        assert_eq!(participant.notify_outcome(false), Err(CallFailure::Crashed));
    }

    #[test]
    fn call_times_out() {
        let timeout = Duration::from_millis(50);
        let participant = isolated(Behavior::Hang, timeout);

        let start = Instant::now();
        assert_eq!(
            participant.notify_outcome(true),
            Err(CallFailure::TimedOut(timeout))
        );
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn call_failure_message() {
        assert_eq!(
            CallFailure::TimedOut(Duration::from_millis(2000)).to_string(),
            "No answer within 2000 ms."
        );
    }
}
