//! Fire-and-forget instance tracking.
//!
//! One-shots are event instances the caller never gets a handle for. The
//! tracker owns them from creation until release: every world update sweeps
//! the collection once, releasing instances that finished, stopping attached
//! ones whose scene object disappeared, and refreshing 3D attributes for the
//! attached ones still playing.
//!
//! Untracked and attached one-shots live in one tagged collection. Entries are
//! removed with `swap_remove`, which moves the entry out of the collection
//! before its instance is released, so no later sweep can see it again.

use crate::engine::{AudioEngine, EventDescriptionId, EventInstanceId, StopMode};
use crate::error::{EngineError, EngineResult, Result};
use crate::events::{EventSink, PetalStudioEvent};
use crate::math::{Attributes3D, MotionTracker};
use crate::scene::{SceneGraph, SceneObjectId};

/// How a one-shot relates to the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OneShotKind {
    /// Released once the engine reports it stopped
    Untracked,
    /// Follows `object` every update; stopped early if the object goes away
    Attached {
        object: SceneObjectId,
        motion: MotionTracker,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneShot {
    pub instance: EventInstanceId,
    pub kind: OneShotKind,
}

/// Counts gathered during one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotSweep {
    /// Finished naturally and released
    pub released: usize,
    /// Scene object vanished; stopped and released
    pub abandoned: usize,
    /// Attached one-shots that received fresh attributes
    pub updated: usize,
    /// Dropped after an engine error
    pub failed: usize,
}

enum Verdict {
    Keep,
    Updated,
    Finished,
    Abandon(SceneObjectId),
    Failed(EngineError),
}

#[derive(Debug, Default)]
pub struct OneShotTracker {
    entries: Vec<OneShot>,
}

impl OneShotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates, configures and starts an instance, then takes ownership of it.
    ///
    /// `attributes` are pushed before the instance starts so the first mixed
    /// block is already positioned. If any step after creation fails the
    /// instance is released and the error returned; nothing is tracked.
    pub fn fire<E: AudioEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        description: EventDescriptionId,
        parameters: &[(&str, f32)],
        attributes: Option<&Attributes3D>,
        kind: OneShotKind,
    ) -> Result<EventInstanceId> {
        let instance = engine.create_instance(description)?;

        if let Err(error) = Self::prepare_and_start(engine, instance, parameters, attributes) {
            if let Err(release_error) = engine.release_instance(instance) {
                log::warn!(
                    "Failed to release one-shot {} after setup error: {}",
                    instance,
                    release_error
                );
            }
            return Err(error.into());
        }

        log::debug!("Fired one-shot {} ({:?})", instance, kind);
        self.entries.push(OneShot { instance, kind });
        Ok(instance)
    }

    fn prepare_and_start<E: AudioEngine + ?Sized>(
        engine: &mut E,
        instance: EventInstanceId,
        parameters: &[(&str, f32)],
        attributes: Option<&Attributes3D>,
    ) -> EngineResult<()> {
        for (name, value) in parameters {
            engine.set_instance_parameter(instance, name, *value)?;
        }
        if let Some(attributes) = attributes {
            engine.set_instance_3d_attributes(instance, attributes)?;
        }
        engine.start_instance(instance)
    }

    /// Reclaims finished one-shots and refreshes attached ones.
    ///
    /// A failure on one entry drops that entry and moves on; the sweep always
    /// visits every entry.
    pub(crate) fn sweep<E, S>(
        &mut self,
        engine: &mut E,
        scene: &S,
        distance_scale: f32,
        dt: f32,
        events: &EventSink,
    ) -> OneShotSweep
    where
        E: AudioEngine + ?Sized,
        S: SceneGraph + ?Sized,
    {
        let mut stats = OneShotSweep::default();
        let mut index = 0;

        while index < self.entries.len() {
            let verdict =
                Self::inspect(&mut self.entries[index], engine, scene, distance_scale, dt);

            match verdict {
                Verdict::Keep => index += 1,
                Verdict::Updated => {
                    stats.updated += 1;
                    index += 1;
                }
                Verdict::Finished => {
                    let entry = self.entries.swap_remove(index);
                    match engine.release_instance(entry.instance) {
                        Ok(()) => {
                            log::debug!("Released finished one-shot {}", entry.instance);
                            stats.released += 1;
                            events.emit(PetalStudioEvent::OneShotReleased {
                                instance: entry.instance,
                            });
                        }
                        Err(error) => {
                            stats.failed += 1;
                            Self::report_failure(entry.instance, &error, events);
                        }
                    }
                }
                Verdict::Abandon(object) => {
                    let entry = self.entries.swap_remove(index);
                    if let Err(error) = engine.stop_instance(entry.instance, StopMode::Immediate) {
                        log::warn!("Failed to stop abandoned one-shot {}: {}", entry.instance, error);
                    }
                    match engine.release_instance(entry.instance) {
                        Ok(()) => {
                            log::debug!(
                                "Stopped one-shot {} after {} became invalid",
                                entry.instance,
                                object
                            );
                            stats.abandoned += 1;
                            events.emit(PetalStudioEvent::OneShotAbandoned {
                                instance: entry.instance,
                                object,
                            });
                        }
                        Err(error) => {
                            stats.failed += 1;
                            Self::report_failure(entry.instance, &error, events);
                        }
                    }
                }
                Verdict::Failed(error) => {
                    let entry = self.entries.swap_remove(index);
                    stats.failed += 1;
                    Self::report_failure(entry.instance, &error, events);
                    if let Err(release_error) = engine.release_instance(entry.instance) {
                        log::debug!(
                            "Release of failed one-shot {} also failed: {}",
                            entry.instance,
                            release_error
                        );
                    }
                }
            }
        }

        stats
    }

    fn inspect<E, S>(
        entry: &mut OneShot,
        engine: &mut E,
        scene: &S,
        distance_scale: f32,
        dt: f32,
    ) -> Verdict
    where
        E: AudioEngine + ?Sized,
        S: SceneGraph + ?Sized,
    {
        if let OneShotKind::Attached { object, .. } = entry.kind {
            if !scene.is_valid(object) {
                return Verdict::Abandon(object);
            }
        }

        match engine.instance_playback_state(entry.instance) {
            Ok(state) if state.is_terminal() => return Verdict::Finished,
            Ok(_) => {}
            Err(error) => return Verdict::Failed(error),
        }

        match &mut entry.kind {
            OneShotKind::Untracked => Verdict::Keep,
            OneShotKind::Attached { object, motion } => {
                let transform = scene.world_transform(*object);
                let attributes = motion.sample(&transform, distance_scale, dt);
                match engine.set_instance_3d_attributes(entry.instance, &attributes) {
                    Ok(()) => Verdict::Updated,
                    Err(error) => Verdict::Failed(error),
                }
            }
        }
    }

    fn report_failure(instance: EventInstanceId, error: &EngineError, events: &EventSink) {
        log::warn!("Dropping one-shot {}: {}", instance, error);
        events.emit(PetalStudioEvent::SweepError {
            instance: Some(instance),
            error: error.to_string(),
        });
    }

    /// Hands every tracked instance back to the caller, emptying the tracker.
    pub fn drain(&mut self) -> Vec<EventInstanceId> {
        self.entries.drain(..).map(|entry| entry.instance).collect()
    }

    pub fn contains(&self, instance: EventInstanceId) -> bool {
        self.entries.iter().any(|entry| entry.instance == instance)
    }

    pub fn entries(&self) -> &[OneShot] {
        &self.entries
    }

    pub fn untracked_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.kind, OneShotKind::Untracked))
            .count()
    }

    pub fn attached_count(&self) -> usize {
        self.entries.len() - self.untracked_count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
