//! Out-of-band signals from the simulation to the host application.
//!
//! The host decides what to do with them (close the app, rebuild the game,
//! switch background music). Delivery is a plain channel: signals arrive in
//! the order they were raised.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    ExitRequested,
    RestartRequested,
    /// The intro is about to finish; background music may start.
    IntroFinished,
    OutcomeChanged(Outcome),
}

#[derive(Debug, Clone)]
pub struct SessionSender {
    tx: Sender<SessionSignal>,
}

impl SessionSender {
    pub fn raise(&self, signal: SessionSignal) {
        log::info!("Session signal: {:?}", signal);
        if self.tx.send(signal).is_err() {
            log::debug!("Session receiver dropped; {:?} not delivered", signal);
        }
    }
}

pub fn session_channel() -> (SessionSender, Receiver<SessionSignal>) {
    let (tx, rx) = mpsc::channel();
    (SessionSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_arrive_in_order() {
        let (sender, receiver) = session_channel();
        sender.raise(SessionSignal::IntroFinished);
        sender.raise(SessionSignal::OutcomeChanged(Outcome::Won));
        sender.raise(SessionSignal::ExitRequested);
        let received: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SessionSignal::IntroFinished,
                SessionSignal::OutcomeChanged(Outcome::Won),
                SessionSignal::ExitRequested
            ]
        );
    }

    #[test]
    fn raising_after_receiver_drop_is_harmless() {
        let (sender, receiver) = session_channel();
        drop(receiver);
        sender.raise(SessionSignal::RestartRequested);
    }
}
