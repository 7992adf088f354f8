//! Low-level sounds. A sound handle owns at most one channel at a time; the
//! channel is registered under the same handle when the sound is played.

use super::PetalStudioWorld;
use crate::engine::{AudioEngine, ChannelId};
use crate::error::Result;
use uuid::Uuid;

impl<E: AudioEngine> PetalStudioWorld<E> {
    /// Creates a sound from `path` and registers it under `uuid`, or under a
    /// fresh v4 uuid when none is given.
    pub fn load_sound(&mut self, uuid: Option<&str>, path: &str, mode: u32) -> Result<String> {
        let handle = match uuid {
            Some(uuid) => uuid.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        self.registry.sounds().ensure_vacant(&handle)?;

        let sound = self.engine.create_sound(path, mode)?;
        self.registry.sounds_mut().register(&handle, sound)?;

        log::debug!("Loaded sound '{}' from '{}' ({})", handle, path, sound);
        Ok(handle)
    }

    /// Stops the sound's channel and releases the sound. Unknown handles are
    /// ignored.
    pub fn release_sound(&mut self, handle: &str) -> Result<()> {
        if let Some(channel) = self.registry.channels_mut().revoke(handle) {
            if let Err(error) = self.engine.stop_channel(channel) {
                log::debug!("Channel of '{}' already gone: {}", handle, error);
            }
        }

        let Some(sound) = self.registry.sounds().get(handle) else {
            return Ok(());
        };
        if let Err(error) = self.engine.release_sound(sound) {
            log::warn!("Failed to release sound '{}' ({}), keeping handle: {}", handle, sound, error);
            return Err(error.into());
        }
        self.registry.sounds_mut().revoke(handle);
        log::debug!("Released sound '{}'", handle);
        Ok(())
    }

    /// Starts playback on a new channel. The channel recorded for this sound,
    /// if any, is stopped and replaced.
    pub fn play_sound(&mut self, handle: &str) -> Result<()> {
        let sound = self.registry.sounds().resolve(handle)?;
        let channel = self.engine.play_sound(sound)?;

        if let Some(previous) = self.registry.channels_mut().replace(handle, channel) {
            if let Err(error) = self.engine.stop_channel(previous) {
                log::debug!("Previous channel of '{}' already gone: {}", handle, error);
            }
            log::debug!("'{}' moved from {} to {}", handle, previous, channel);
        }
        Ok(())
    }

    fn channel(&self, handle: &str) -> Result<ChannelId> {
        self.registry.channels().resolve(handle)
    }

    pub fn set_sound_paused(&mut self, handle: &str, paused: bool) -> Result<()> {
        let channel = self.channel(handle)?;
        self.engine.set_channel_paused(channel, paused)?;
        Ok(())
    }

    /// Stops the sound's channel. Sounds that are not playing are ignored.
    pub fn stop_sound(&mut self, handle: &str) -> Result<()> {
        let Some(channel) = self.registry.channels_mut().revoke(handle) else {
            return Ok(());
        };
        self.engine.stop_channel(channel)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `UnknownHandle` if `handle` is not a loaded sound. A loaded
    /// sound that was never played reports `false`.
    pub fn is_sound_playing(&self, handle: &str) -> Result<bool> {
        self.registry.sounds().resolve(handle)?;
        match self.registry.channels().get(handle) {
            Some(channel) => Ok(self.engine.is_channel_playing(channel)?),
            None => Ok(false),
        }
    }

    pub fn sound_volume(&self, handle: &str) -> Result<f32> {
        Ok(self.engine.channel_volume(self.channel(handle)?)?)
    }

    pub fn set_sound_volume(&mut self, handle: &str, volume: f32) -> Result<()> {
        let channel = self.channel(handle)?;
        self.engine.set_channel_volume(channel, volume)?;
        Ok(())
    }

    pub fn sound_pitch(&self, handle: &str) -> Result<f32> {
        Ok(self.engine.channel_pitch(self.channel(handle)?)?)
    }

    pub fn set_sound_pitch(&mut self, handle: &str, pitch: f32) -> Result<()> {
        let channel = self.channel(handle)?;
        self.engine.set_channel_pitch(channel, pitch)?;
        Ok(())
    }
}
