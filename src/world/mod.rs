//! World API for PetalStudio

mod bank;
mod event;
mod mixer;
mod sound;

use crate::attachment::{AttachmentSweep, SpatialAttachmentTracker};
use crate::config::{PetalStudioDesc, SoftwareFormat, Sound3DSettings};
use crate::engine::{AudioEngine, EventDescriptionId, EventInstanceId, StopMode};
use crate::error::{PetalStudioError, Result};
use crate::events::{DetachReason, EventSink, PetalStudioEvent};
use crate::listener::ListenerState;
use crate::math::{Attributes3D, MotionTracker};
use crate::one_shot::{OneShotKind, OneShotSweep, OneShotTracker};
use crate::registry::HandleRegistry;
use crate::scene::{SceneGraph, SceneObjectId};
use crossbeam_channel::Receiver;

/// What a single [`PetalStudioWorld::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub one_shots: OneShotSweep,
    pub attachments: AttachmentSweep,
    pub listener_updated: bool,
    pub engine_updated: bool,
}

/// Main world object that owns the engine, the handle registry and the trackers.
///
/// `PetalStudioWorld` is driven from the host's update thread. Callers refer
/// to engine objects through string handles; the world resolves them, forwards
/// the call and keeps attached instances in sync with the scene once per
/// [`update`](Self::update).
///
/// # Architecture
///
/// - **Registry**: one namespace per resource class, handle -> engine id
/// - **One-shots**: fire-and-forget instances owned by the world until they finish
/// - **Attachments**: handle-based instances following a scene object
/// - **Listener**: the scene object the engine hears from
///
/// Every mutation takes `&mut self`; share the world across threads by
/// wrapping it in a mutex.
pub struct PetalStudioWorld<E: AudioEngine> {
    desc: PetalStudioDesc,
    engine: E,
    registry: HandleRegistry,
    one_shots: OneShotTracker,
    attachments: SpatialAttachmentTracker,
    listener: ListenerState,
    events: EventSink,
    event_receiver: Receiver<PetalStudioEvent>,
    is_shut_down: bool,
}

impl<E: AudioEngine> PetalStudioWorld<E> {
    /// Validates `desc`, initializes `engine` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an invalid descriptor and `Engine` if the
    /// engine refuses to initialize.
    pub fn new(mut engine: E, desc: PetalStudioDesc) -> Result<Self> {
        desc.validate()?;

        if let Some(format) = &desc.software_format {
            engine.set_software_format(format)?;
        }
        engine.initialize(&desc)?;
        engine.set_3d_settings(&desc.sound_3d)?;

        log::info!(
            "PetalStudio world initialized (max_channels: {}, distance_scale: {}, listener_index: {})",
            desc.max_channels,
            desc.distance_scale,
            desc.listener_index
        );

        let (events, event_receiver) = EventSink::channel();
        Ok(Self {
            desc,
            engine,
            registry: HandleRegistry::new(),
            one_shots: OneShotTracker::new(),
            attachments: SpatialAttachmentTracker::new(),
            listener: ListenerState::new(),
            events,
            event_receiver,
            is_shut_down: false,
        })
    }

    pub fn desc(&self) -> &PetalStudioDesc {
        &self.desc
    }

    pub fn distance_scale(&self) -> f32 {
        self.desc.distance_scale
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn one_shots(&self) -> &OneShotTracker {
        &self.one_shots
    }

    pub fn attachments(&self) -> &SpatialAttachmentTracker {
        &self.attachments
    }

    pub fn listener_state(&self) -> &ListenerState {
        &self.listener
    }

    /// Drains the events produced since the last call.
    pub fn poll_events(&self) -> Vec<PetalStudioEvent> {
        self.event_receiver.try_iter().collect()
    }

    /// Runs one tick.
    ///
    /// In order: reclaim and refresh one-shots, refresh attachments, push the
    /// listener, then advance the engine. `dt` is the time in seconds since
    /// the previous tick and is only used for velocity estimation. Failures
    /// are logged and reported through [`poll_events`](Self::poll_events);
    /// they never cut the tick short.
    pub fn update<S: SceneGraph + ?Sized>(&mut self, scene: &S, dt: f32) -> TickReport {
        if self.is_shut_down {
            log::warn!("update called after shutdown");
            return TickReport::default();
        }

        let scale = self.desc.distance_scale;

        let one_shots = self
            .one_shots
            .sweep(&mut self.engine, scene, scale, dt, &self.events);

        let attachments = self.attachments.sweep(
            self.registry.event_instances(),
            &mut self.engine,
            scene,
            scale,
            dt,
            &self.events,
        );

        let listener_updated = self.listener.update(
            &mut self.engine,
            scene,
            self.desc.listener_index,
            scale,
            dt,
            &self.events,
        );

        let engine_updated = match self.engine.update() {
            Ok(()) => true,
            Err(error) => {
                log::error!("Engine update failed: {}", error);
                self.events.emit(PetalStudioEvent::EngineError {
                    error: error.to_string(),
                });
                false
            }
        };

        TickReport {
            one_shots,
            attachments,
            listener_updated,
            engine_updated,
        }
    }

    /// Makes `object` the listener. Replaces any previous listener.
    pub fn add_listener(&mut self, object: SceneObjectId) {
        if let Some(previous) = self.listener.set(object) {
            log::info!("Listener replaced: {} -> {}", previous, object);
        } else {
            log::info!("Listener set to {}", object);
        }
        self.events.emit(PetalStudioEvent::ListenerChanged { object });
    }

    /// # Errors
    ///
    /// Returns `ListenerNotSet` until [`add_listener`](Self::add_listener) is called.
    pub fn listener(&self) -> Result<SceneObjectId> {
        self.listener.object()
    }

    pub fn set_software_format(&mut self, format: SoftwareFormat) -> Result<()> {
        self.engine.set_software_format(&format)?;
        self.desc.software_format = Some(format);
        Ok(())
    }

    pub fn set_sound_3d_settings(
        &mut self,
        doppler_scale: f32,
        distance_factor: f32,
        rolloff_scale: f32,
    ) -> Result<()> {
        let settings = Sound3DSettings {
            doppler_scale,
            distance_factor,
            rolloff_scale,
        };
        self.engine.set_3d_settings(&settings)?;
        self.desc.sound_3d = settings;
        Ok(())
    }

    pub fn set_global_parameter(&mut self, name: &str, value: f32) -> Result<()> {
        self.engine.set_global_parameter(name, value)?;
        Ok(())
    }

    pub fn global_parameter(&self, name: &str) -> Result<f32> {
        Ok(self.engine.global_parameter(name)?)
    }

    /// Resolves an event path, asking the engine on first use.
    fn event_description(&mut self, event_path: &str) -> Result<EventDescriptionId> {
        let engine = &mut self.engine;
        self.registry
            .event_descriptions_mut()
            .resolve_or_materialize(event_path, |path| engine.event_description(path))
    }

    /// Plays `event_path` once without position. The world releases the
    /// instance when it finishes.
    pub fn play_one_shot(&mut self, event_path: &str) -> Result<()> {
        self.play_one_shot_with_params(event_path, &[])
    }

    pub fn play_one_shot_with_params(
        &mut self,
        event_path: &str,
        parameters: &[(&str, f32)],
    ) -> Result<()> {
        let description = self.event_description(event_path)?;
        self.one_shots.fire(
            &mut self.engine,
            description,
            parameters,
            None,
            OneShotKind::Untracked,
        )?;
        Ok(())
    }

    /// Plays `event_path` once at the current pose of `object`. The position
    /// is not updated afterwards.
    pub fn play_one_shot_at<S: SceneGraph + ?Sized>(
        &mut self,
        event_path: &str,
        scene: &S,
        object: SceneObjectId,
        parameters: &[(&str, f32)],
    ) -> Result<()> {
        if !scene.is_valid(object) {
            return Err(PetalStudioError::InvalidSceneObject(object));
        }

        let description = self.event_description(event_path)?;
        let attributes =
            Attributes3D::at_rest(&scene.world_transform(object), self.desc.distance_scale);
        self.one_shots.fire(
            &mut self.engine,
            description,
            parameters,
            Some(&attributes),
            OneShotKind::Untracked,
        )?;
        Ok(())
    }

    /// Plays `event_path` once and keeps it following `object` until it
    /// finishes. If `object` goes away first the instance is stopped.
    pub fn play_one_shot_attached<S: SceneGraph + ?Sized>(
        &mut self,
        event_path: &str,
        scene: &S,
        object: SceneObjectId,
    ) -> Result<()> {
        self.play_one_shot_attached_with_params(event_path, scene, object, &[])
    }

    pub fn play_one_shot_attached_with_params<S: SceneGraph + ?Sized>(
        &mut self,
        event_path: &str,
        scene: &S,
        object: SceneObjectId,
        parameters: &[(&str, f32)],
    ) -> Result<()> {
        if !scene.is_valid(object) {
            return Err(PetalStudioError::InvalidSceneObject(object));
        }

        let description = self.event_description(event_path)?;
        let mut motion = MotionTracker::new();
        // dt is irrelevant for the first sample; velocity starts at zero
        let attributes = motion.sample(
            &scene.world_transform(object),
            self.desc.distance_scale,
            0.0,
        );
        self.one_shots.fire(
            &mut self.engine,
            description,
            parameters,
            Some(&attributes),
            OneShotKind::Attached { object, motion },
        )?;
        Ok(())
    }

    /// Keeps the instance behind `handle` following `object` every update.
    ///
    /// # Errors
    ///
    /// Returns `UnknownHandle` if `handle` is not a live event instance.
    pub fn attach_instance_to_object(&mut self, handle: &str, object: SceneObjectId) -> Result<()> {
        self.attachments
            .attach(self.registry.event_instances(), handle, object)
    }

    /// Stops following. Playback is untouched; unknown handles are ignored.
    pub fn detach_instance_from_object(&mut self, handle: &str) {
        if self.attachments.detach(handle) {
            self.events.emit(PetalStudioEvent::AttachmentDropped {
                handle: handle.to_string(),
                reason: DetachReason::Requested,
            });
        }
    }

    /// Releases every engine object the world still knows about, then shuts
    /// the engine down. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.is_shut_down {
            return Ok(());
        }
        self.is_shut_down = true;

        let one_shots = self.one_shots.drain();
        for instance in &one_shots {
            self.stop_and_release(*instance);
        }

        self.attachments.clear();
        let instances = self.registry.event_instances_mut().drain();
        for (_, instance) in &instances {
            self.stop_and_release(*instance);
        }

        for (handle, channel) in self.registry.channels_mut().drain() {
            if let Err(error) = self.engine.stop_channel(channel) {
                log::debug!("Channel for '{}' already gone: {}", handle, error);
            }
        }
        for (handle, sound) in self.registry.sounds_mut().drain() {
            if let Err(error) = self.engine.release_sound(sound) {
                log::warn!("Failed to release sound '{}': {}", handle, error);
            }
        }
        for (path, bank) in self.registry.banks_mut().drain() {
            if let Err(error) = self.engine.unload_bank(bank) {
                log::warn!("Failed to unload bank '{}': {}", path, error);
            }
        }
        self.registry.invalidate_bank_content();

        log::info!(
            "PetalStudio world shutting down ({} one-shots, {} instances released)",
            one_shots.len(),
            instances.len()
        );
        self.engine.shutdown()?;
        Ok(())
    }

    fn stop_and_release(&mut self, instance: EventInstanceId) {
        if let Err(error) = self.engine.stop_instance(instance, StopMode::Immediate) {
            log::debug!("Stop of {} during shutdown failed: {}", instance, error);
        }
        if let Err(error) = self.engine.release_instance(instance) {
            log::warn!("Failed to release {}: {}", instance, error);
        }
    }
}

impl<E: AudioEngine> Drop for PetalStudioWorld<E> {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            log::error!("PetalStudio shutdown failed: {}", error);
        }
    }
}
