use std::sync::mpsc;
use std::time::Duration;

use skiptrace_core::{update, AppState, AppViewModel, Msg};

use super::effects::EffectRunner;

/// Owns the application state and feeds every message through `update`.
pub struct Dispatcher {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    dirty: bool,
}

impl Dispatcher {
    pub fn new(runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            msg_rx,
            dirty: true,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.dirty |= state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Applies everything already queued by the client or the runner.
    pub fn drain_pending(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    /// Waits for the next queued message without applying it.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.msg_rx.recv_timeout(timeout).ok()
    }

    /// True once after any state change.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }
}
