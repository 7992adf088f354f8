//! Instance-to-scene-object attachments for handle-based event instances.
//!
//! An attachment is a relation, not ownership: dropping one never stops the
//! instance. Attachments disappear when the caller detaches, when the handle
//! is released, when the instance finishes, or when the scene object becomes
//! invalid.

use crate::engine::{AudioEngine, EventInstanceId};
use crate::error::Result;
use crate::events::{DetachReason, EventSink, PetalStudioEvent};
use crate::math::MotionTracker;
use crate::registry::Namespace;
use crate::scene::{SceneGraph, SceneObjectId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub object: SceneObjectId,
    pub motion: MotionTracker,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentSweep {
    pub updated: usize,
    pub dropped: usize,
}

#[derive(Debug, Default)]
pub struct SpatialAttachmentTracker {
    attachments: HashMap<String, Attachment>,
}

impl SpatialAttachmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a live instance handle to `object`, replacing any previous
    /// attachment for that handle.
    ///
    /// # Errors
    ///
    /// Returns `UnknownHandle` if `handle` is not a registered event instance.
    pub fn attach(
        &mut self,
        instances: &Namespace<EventInstanceId>,
        handle: &str,
        object: SceneObjectId,
    ) -> Result<()> {
        let instance = instances.resolve(handle)?;
        let attachment = Attachment {
            object,
            motion: MotionTracker::new(),
        };

        if let Some(previous) = self.attachments.insert(handle.to_string(), attachment) {
            log::debug!(
                "Re-attached '{}' ({}) from {} to {}",
                handle,
                instance,
                previous.object,
                object
            );
        } else {
            log::debug!("Attached '{}' ({}) to {}", handle, instance, object);
        }
        Ok(())
    }

    /// Removes the attachment for `handle`. Returns false if there was none.
    pub fn detach(&mut self, handle: &str) -> bool {
        let removed = self.attachments.remove(handle).is_some();
        if removed {
            log::debug!("Detached '{}'", handle);
        }
        removed
    }

    /// Pushes fresh 3D attributes for every attachment whose instance is still
    /// playing and whose object is still valid, and drops the rest. Instances
    /// are never stopped or released here.
    pub(crate) fn sweep<E, S>(
        &mut self,
        instances: &Namespace<EventInstanceId>,
        engine: &mut E,
        scene: &S,
        distance_scale: f32,
        dt: f32,
        events: &EventSink,
    ) -> AttachmentSweep
    where
        E: AudioEngine + ?Sized,
        S: SceneGraph + ?Sized,
    {
        let mut stats = AttachmentSweep::default();

        self.attachments.retain(|handle, attachment| {
            let reason = match instances.get(handle) {
                None => Some(DetachReason::HandleReleased),
                Some(_) if !scene.is_valid(attachment.object) => {
                    Some(DetachReason::SceneObjectInvalid)
                }
                Some(instance) => {
                    let result = engine
                        .instance_playback_state(instance)
                        .and_then(|state| {
                            if state.is_terminal() {
                                return Ok(Some(DetachReason::InstanceFinished));
                            }
                            let transform = scene.world_transform(attachment.object);
                            let attributes =
                                attachment.motion.sample(&transform, distance_scale, dt);
                            engine
                                .set_instance_3d_attributes(instance, &attributes)
                                .map(|()| None)
                        });
                    match result {
                        Ok(reason) => reason,
                        Err(error) => {
                            log::warn!("Failed to update attributes for '{}': {}", handle, error);
                            events.emit(PetalStudioEvent::SweepError {
                                instance: Some(instance),
                                error: error.to_string(),
                            });
                            Some(DetachReason::EngineError)
                        }
                    }
                }
            };

            match reason {
                None => {
                    stats.updated += 1;
                    true
                }
                Some(reason) => {
                    log::debug!("Dropping attachment '{}' ({:?})", handle, reason);
                    stats.dropped += 1;
                    events.emit(PetalStudioEvent::AttachmentDropped {
                        handle: handle.clone(),
                        reason,
                    });
                    false
                }
            }
        });

        stats
    }

    pub fn get(&self, handle: &str) -> Option<&Attachment> {
        self.attachments.get(handle)
    }

    pub fn is_attached(&self, handle: &str) -> bool {
        self.attachments.contains_key(handle)
    }

    pub fn clear(&mut self) {
        self.attachments.clear();
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}
