//! One-shot readiness gate.
//!
//! Work that needs the document structure (recording a visit, evaluating
//! blocks) is queued while the document is still loading and run exactly once
//! when it becomes ready. Work queued after that runs immediately.

use std::fmt::{self, Debug};

type ReadyCallback<C> = Box<dyn FnOnce(&mut C)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pending,
    Ready,
}

pub struct ReadyGate<C> {
    state: GateState,
    queued: Vec<ReadyCallback<C>>,
}

impl<C> Debug for ReadyGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyGate")
            .field("state", &self.state)
            .field("queued", &self.queued.len())
            .finish()
    }
}

impl<C> ReadyGate<C> {
    pub fn pending() -> Self {
        Self {
            state: GateState::Pending,
            queued: Vec::new(),
        }
    }

    pub fn ready() -> Self {
        Self {
            state: GateState::Ready,
            queued: Vec::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    /// Runs `callback` now if the gate is open, otherwise queues it.
    pub fn when_ready(&mut self, ctx: &mut C, callback: impl FnOnce(&mut C) + 'static) {
        match self.state {
            GateState::Ready => callback(ctx),
            GateState::Pending => self.queued.push(Box::new(callback)),
        }
    }

    /// Opens the gate and runs queued callbacks in registration order.
    /// Opening an open gate does nothing.
    pub fn open(&mut self, ctx: &mut C) {
        if self.state == GateState::Ready {
            return;
        }
        self.state = GateState::Ready;

        for callback in self.queued.drain(..) {
            callback(ctx);
        }
    }
}
