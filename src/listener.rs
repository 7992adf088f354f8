//! Listener readiness.
//!
//! The world starts without a listener. Setting one moves it to `Ready`, and
//! there is no way back: a new listener replaces the old one. The "no listener"
//! warning is part of the `Uninitialized` state so it fires exactly once.

use crate::engine::AudioEngine;
use crate::error::{PetalStudioError, Result};
use crate::events::{EventSink, PetalStudioEvent};
use crate::math::MotionTracker;
use crate::scene::{SceneGraph, SceneObjectId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListenerState {
    Uninitialized {
        warned: bool,
    },
    Ready {
        object: SceneObjectId,
        motion: MotionTracker,
        /// Set once the object was reported invalid, cleared when it recovers
        reported_invalid: bool,
    },
}

impl Default for ListenerState {
    fn default() -> Self {
        Self::Uninitialized { warned: false }
    }
}

impl ListenerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `object` the listener, returning the one it replaced.
    pub fn set(&mut self, object: SceneObjectId) -> Option<SceneObjectId> {
        let previous = self.object().ok();
        *self = Self::Ready {
            object,
            motion: MotionTracker::new(),
            reported_invalid: false,
        };
        previous
    }

    /// # Errors
    ///
    /// Returns `ListenerNotSet` while uninitialized.
    pub fn object(&self) -> Result<SceneObjectId> {
        match self {
            Self::Ready { object, .. } => Ok(*object),
            Self::Uninitialized { .. } => Err(PetalStudioError::ListenerNotSet),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Returns true only the first time it is called while uninitialized.
    pub fn take_warning(&mut self) -> bool {
        match self {
            Self::Uninitialized { warned } if !*warned => {
                *warned = true;
                true
            }
            _ => false,
        }
    }

    /// Pushes the listener's attributes to `index`. Returns true if a push
    /// happened.
    pub(crate) fn update<E, S>(
        &mut self,
        engine: &mut E,
        scene: &S,
        index: i32,
        distance_scale: f32,
        dt: f32,
        events: &EventSink,
    ) -> bool
    where
        E: AudioEngine + ?Sized,
        S: SceneGraph + ?Sized,
    {
        if self.take_warning() {
            log::warn!("{}; 3D audio will not follow the scene", PetalStudioError::ListenerNotSet);
            events.emit(PetalStudioEvent::ListenerMissing);
            return false;
        }

        let Self::Ready {
            object,
            motion,
            reported_invalid,
        } = self
        else {
            return false;
        };

        if !scene.is_valid(*object) {
            if !*reported_invalid {
                *reported_invalid = true;
                log::warn!("Listener {} is no longer valid, skipping update", object);
                events.emit(PetalStudioEvent::ListenerInvalid { object: *object });
            }
            return false;
        }
        *reported_invalid = false;

        let transform = scene.world_transform(*object);
        let attributes = motion.sample(&transform, distance_scale, dt);
        match engine.set_listener_attributes(index, &attributes) {
            Ok(()) => true,
            Err(error) => {
                log::error!("Failed to set listener attributes: {}", error);
                events.emit(PetalStudioEvent::EngineError {
                    error: error.to_string(),
                });
                false
            }
        }
    }
}
