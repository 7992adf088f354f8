use super::PetalStudioWorld;
use crate::engine::{AudioEngine, EventInstanceId, PlaybackState, StopMode};
use crate::error::Result;
use uuid::Uuid;

impl<E: AudioEngine> PetalStudioWorld<E> {
    /// Creates an instance of `event_path` and registers it under `uuid`, or
    /// under a fresh v4 uuid when none is given. The instance is not started.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateHandle` if `uuid` is taken, before any engine call.
    pub fn create_event_instance(&mut self, uuid: Option<&str>, event_path: &str) -> Result<String> {
        let handle = match uuid {
            Some(uuid) => uuid.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        self.registry.event_instances().ensure_vacant(&handle)?;

        let description = self.event_description(event_path)?;
        let instance = self.engine.create_instance(description)?;
        self.registry.event_instances_mut().register(&handle, instance)?;

        log::debug!("Created '{}' ({}) from '{}'", handle, instance, event_path);
        Ok(handle)
    }

    /// Releases the instance and forgets the handle. Any attachment is
    /// dropped. Unknown handles are ignored.
    ///
    /// If the engine refuses the release the handle stays registered, so the
    /// instance can still be reached.
    pub fn release_event(&mut self, handle: &str) -> Result<()> {
        let Some(instance) = self.registry.event_instances().get(handle) else {
            return Ok(());
        };
        if let Err(error) = self.engine.release_instance(instance) {
            log::warn!("Failed to release '{}' ({}), keeping handle: {}", handle, instance, error);
            return Err(error.into());
        }
        self.registry.event_instances_mut().revoke(handle);
        self.attachments.detach(handle);
        log::debug!("Released '{}' ({})", handle, instance);
        Ok(())
    }

    fn instance(&self, handle: &str) -> Result<EventInstanceId> {
        self.registry.event_instances().resolve(handle)
    }

    pub fn start_event(&mut self, handle: &str) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.start_instance(instance)?;
        Ok(())
    }

    /// Stops the instance. Unknown handles are ignored.
    pub fn stop_event(&mut self, handle: &str, mode: StopMode) -> Result<()> {
        let Some(instance) = self.registry.event_instances().get(handle) else {
            return Ok(());
        };
        self.engine.stop_instance(instance, mode)?;
        Ok(())
    }

    pub fn trigger_event_cue(&mut self, handle: &str) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.trigger_instance_cue(instance)?;
        Ok(())
    }

    pub fn event_playback_state(&self, handle: &str) -> Result<PlaybackState> {
        Ok(self.engine.instance_playback_state(self.instance(handle)?)?)
    }

    pub fn event_paused(&self, handle: &str) -> Result<bool> {
        Ok(self.engine.instance_paused(self.instance(handle)?)?)
    }

    pub fn set_event_paused(&mut self, handle: &str, paused: bool) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_paused(instance, paused)?;
        Ok(())
    }

    pub fn event_pitch(&self, handle: &str) -> Result<f32> {
        Ok(self.engine.instance_pitch(self.instance(handle)?)?)
    }

    pub fn set_event_pitch(&mut self, handle: &str, pitch: f32) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_pitch(instance, pitch)?;
        Ok(())
    }

    pub fn event_volume(&self, handle: &str) -> Result<f32> {
        Ok(self.engine.instance_volume(self.instance(handle)?)?)
    }

    pub fn set_event_volume(&mut self, handle: &str, volume: f32) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_volume(instance, volume)?;
        Ok(())
    }

    /// Timeline position in milliseconds
    pub fn event_timeline_position(&self, handle: &str) -> Result<i32> {
        Ok(self.engine.instance_timeline_position(self.instance(handle)?)?)
    }

    pub fn set_event_timeline_position(&mut self, handle: &str, position: i32) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_timeline_position(instance, position)?;
        Ok(())
    }

    pub fn event_reverb_level(&self, handle: &str, index: i32) -> Result<f32> {
        Ok(self
            .engine
            .instance_reverb_level(self.instance(handle)?, index)?)
    }

    pub fn set_event_reverb_level(&mut self, handle: &str, index: i32, level: f32) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_reverb_level(instance, index, level)?;
        Ok(())
    }

    pub fn event_parameter(&self, handle: &str, name: &str) -> Result<f32> {
        Ok(self.engine.instance_parameter(self.instance(handle)?, name)?)
    }

    pub fn set_event_parameter(&mut self, handle: &str, name: &str, value: f32) -> Result<()> {
        let instance = self.instance(handle)?;
        self.engine.set_instance_parameter(instance, name, value)?;
        Ok(())
    }

    pub fn is_event_virtual(&self, handle: &str) -> Result<bool> {
        Ok(self.engine.is_instance_virtual(self.instance(handle)?)?)
    }
}
