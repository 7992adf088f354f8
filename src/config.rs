//! Configuration for PetalStudio

use crate::error::{PetalStudioError, Result};

/// Output format forwarded to the engine before initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftwareFormat {
    pub sample_rate: u32,
    /// Engine-specific speaker mode value, passed through untouched
    pub speaker_mode: i32,
    pub num_raw_speakers: u32,
}

impl Default for SoftwareFormat {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            speaker_mode: 0,
            num_raw_speakers: 0,
        }
    }
}

/// Doppler, distance and rolloff settings for the engine's 3D mixer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sound3DSettings {
    pub doppler_scale: f32,
    pub distance_factor: f32,
    pub rolloff_scale: f32,
}

impl Default for Sound3DSettings {
    fn default() -> Self {
        Self {
            doppler_scale: 1.0,
            distance_factor: 1.0,
            rolloff_scale: 1.0,
        }
    }
}

/// Configuration descriptor for a PetalStudio world
#[derive(Debug, Clone)]
pub struct PetalStudioDesc {
    /// Maximum number of engine channels
    pub max_channels: u32,
    /// Engine-specific studio initialization flags
    pub studio_flags: u32,
    /// Engine-specific low-level initialization flags
    pub core_flags: u32,
    /// Multiplier applied to every scene position before it reaches the engine.
    /// Shared by the listener and all emitters, fixed for the world's lifetime.
    pub distance_scale: f32,
    /// Listener slot the scene listener is written to
    pub listener_index: i32,
    /// Applied before the engine is initialized when set
    pub software_format: Option<SoftwareFormat>,
    pub sound_3d: Sound3DSettings,
}

impl Default for PetalStudioDesc {
    fn default() -> Self {
        Self {
            max_channels: 1024,
            studio_flags: 0,
            core_flags: 0,
            distance_scale: 1.0,
            listener_index: 0,
            software_format: None,
            sound_3d: Sound3DSettings::default(),
        }
    }
}

impl PetalStudioDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_channels(mut self, channels: u32) -> Self {
        self.max_channels = channels;
        self
    }

    pub fn studio_flags(mut self, flags: u32) -> Self {
        self.studio_flags = flags;
        self
    }

    pub fn core_flags(mut self, flags: u32) -> Self {
        self.core_flags = flags;
        self
    }

    pub fn distance_scale(mut self, scale: f32) -> Self {
        self.distance_scale = scale;
        self
    }

    pub fn listener_index(mut self, index: i32) -> Self {
        self.listener_index = index;
        self
    }

    pub fn software_format(mut self, format: SoftwareFormat) -> Self {
        self.software_format = Some(format);
        self
    }

    pub fn sound_3d(mut self, settings: Sound3DSettings) -> Self {
        self.sound_3d = settings;
        self
    }

    /// Checks the descriptor for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return Err(PetalStudioError::Configuration(format!(
                "distance_scale must be a positive finite number, got {}",
                self.distance_scale
            )));
        }

        if self.max_channels == 0 {
            return Err(PetalStudioError::Configuration(
                "max_channels must be greater than 0".to_string(),
            ));
        }

        if self.listener_index < 0 {
            return Err(PetalStudioError::Configuration(format!(
                "listener_index must not be negative, got {}",
                self.listener_index
            )));
        }

        Ok(())
    }
}
