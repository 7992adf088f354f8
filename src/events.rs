//! Event types for PetalStudio
//!
//! Lifecycle decisions made inside a world update (reclaimed one-shots,
//! dropped attachments, swallowed sweep failures) are reported as
//! [`PetalStudioEvent`] values. The host drains them with
//! [`PetalStudioWorld::poll_events`](crate::PetalStudioWorld::poll_events).

use crate::engine::EventInstanceId;
use crate::scene::SceneObjectId;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Why an attachment stopped being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachReason {
    /// The caller detached it
    Requested,
    /// The scene object was freed
    SceneObjectInvalid,
    /// The instance handle was released
    HandleReleased,
    /// The instance reached `Stopped`
    InstanceFinished,
    /// Pushing attributes failed
    EngineError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PetalStudioEvent {
    /// A one-shot finished playing and was released
    OneShotReleased {
        instance: EventInstanceId,
    },
    /// An attached one-shot lost its scene object and was stopped and released
    OneShotAbandoned {
        instance: EventInstanceId,
        object: SceneObjectId,
    },
    AttachmentDropped {
        handle: String,
        reason: DetachReason,
    },
    ListenerChanged {
        object: SceneObjectId,
    },
    /// Emitted once until a listener is set
    ListenerMissing,
    ListenerInvalid {
        object: SceneObjectId,
    },
    /// A sweep entry failed and was dropped; the sweep carried on
    SweepError {
        instance: Option<EventInstanceId>,
        error: String,
    },
    BankLoaded {
        path: String,
    },
    BankUnloaded {
        path: String,
    },
    EngineError {
        error: String,
    },
}

impl PetalStudioEvent {
    pub fn instance(&self) -> Option<EventInstanceId> {
        match self {
            Self::OneShotReleased { instance } | Self::OneShotAbandoned { instance, .. } => {
                Some(*instance)
            }
            Self::SweepError { instance, .. } => *instance,
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::SweepError { .. } | Self::EngineError { .. } | Self::ListenerInvalid { .. }
        )
    }
}

/// Sending half of the world's event queue.
#[derive(Debug, Clone)]
pub(crate) struct EventSink {
    sender: Sender<PetalStudioEvent>,
}

impl EventSink {
    pub(crate) fn channel() -> (Self, Receiver<PetalStudioEvent>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub(crate) fn emit(&self, event: PetalStudioEvent) {
        // The world owns the receiver, so this only fails during teardown.
        if self.sender.send(event).is_err() {
            log::trace!("Event queue closed, dropping event");
        }
    }
}
