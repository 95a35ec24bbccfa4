//! Channel plumbing between the consolidation phases and their observer.
//!
//! The channel is unbounded on purpose: placement emits one event per
//! physical operation, and a stalled observer must never stall disk
//! work. Observers that cannot keep up fall behind, they do not apply
//! backpressure.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Event, PlaceEvent, RunEvent, RunPhase};
use crate::core::placement::MoveMediaEntityResult;

/// Create a channel pair for one consolidation run.
pub fn channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (
        EventSender { inner: sender },
        EventReceiver { inner: receiver },
    )
}

/// A sender with no observer. Every phase takes an `EventSender`; callers
/// that do not care about progress pass this one.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = channel();
    sender
}

/// Emitting side, held by the consolidation phases.
///
/// Cloneable and sendable across threads, so parallel grouping batches
/// can report through the same channel. Sending to a dropped receiver is
/// a no-op: progress reporting is optional and must never fail a run.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send one event. Silently dropped when no one is listening.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }

    /// Report one finished physical operation.
    pub fn operation(&self, result: &MoveMediaEntityResult) {
        self.send(Event::Place(PlaceEvent::Operation(result.clone())));
    }

    /// Announce that the run entered a new phase.
    pub fn phase(&self, phase: RunPhase) {
        self.send(Event::Run(RunEvent::PhaseChanged { phase }));
    }
}

/// Observing side, held by the UI layer.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Receive without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }

    /// Collect everything queued so far without blocking
    pub fn drain(&self) -> Vec<Event> {
        self.inner.try_iter().collect()
    }
}
