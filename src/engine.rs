//! Audio engine collaborator interface.
//!
//! PetalStudio never talks to an audio runtime directly. Everything goes
//! through the [`AudioEngine`] trait, which a host implements on top of its
//! studio runtime of choice. Native objects cross this boundary as small typed
//! ids; only the engine knows what they point to, and this crate treats them
//! as non-owning references that are valid until released or unloaded.

use crate::config::{PetalStudioDesc, SoftwareFormat, Sound3DSettings};
use crate::error::EngineResult;
use crate::math::Attributes3D;

macro_rules! native_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }
    };
}

native_id!(
    /// Loaded bank
    BankId
);
native_id!(
    /// Event description, the template instances are created from
    EventDescriptionId
);
native_id!(
    /// Live event instance
    EventInstanceId
);
native_id!(
    /// Low-level sound
    SoundId
);
native_id!(
    /// Channel a low-level sound is playing on
    ChannelId
);
native_id!(BusId);
native_id!(VcaId);

/// Playback state reported by the engine for an event instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Sustaining,
    Stopped,
    Starting,
    Stopping,
    Virtual,
}

impl PlaybackState {
    /// Only `Stopped` ends an instance's life; every other state may still
    /// produce sound.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// How an instance or bus should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    #[default]
    AllowFadeOut,
    Immediate,
}

/// Loading state of a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Unloading,
    Unloaded,
    Loading,
    Loaded,
    Error,
}

/// Trait implemented by the host on top of its audio runtime.
///
/// All calls are issued from the thread that owns the
/// [`PetalStudioWorld`](crate::PetalStudioWorld) and are expected to return
/// immediately. Failures are reported as [`EngineError`](crate::error::EngineError)
/// values carrying the runtime's own result code.
pub trait AudioEngine {
    // System

    fn initialize(&mut self, desc: &PetalStudioDesc) -> EngineResult<()>;

    fn shutdown(&mut self) -> EngineResult<()>;

    /// Advances the runtime by one tick. Called last in every world update.
    fn update(&mut self) -> EngineResult<()>;

    fn set_software_format(&mut self, format: &SoftwareFormat) -> EngineResult<()>;

    fn set_3d_settings(&mut self, settings: &Sound3DSettings) -> EngineResult<()>;

    fn set_global_parameter(&mut self, name: &str, value: f32) -> EngineResult<()>;

    fn global_parameter(&self, name: &str) -> EngineResult<f32>;

    fn set_listener_attributes(&mut self, index: i32, attributes: &Attributes3D)
    -> EngineResult<()>;

    // Banks

    fn load_bank(&mut self, path: &str, flags: u32) -> EngineResult<BankId>;

    fn unload_bank(&mut self, bank: BankId) -> EngineResult<()>;

    fn bank_loading_state(&self, bank: BankId) -> EngineResult<LoadingState>;

    fn bank_bus_count(&self, bank: BankId) -> EngineResult<u32>;

    fn bank_event_count(&self, bank: BankId) -> EngineResult<u32>;

    fn bank_string_count(&self, bank: BankId) -> EngineResult<u32>;

    fn bank_vca_count(&self, bank: BankId) -> EngineResult<u32>;

    // Event descriptions and instances

    /// Looks up the description for an event path such as `event:/Explosion`.
    fn event_description(&mut self, path: &str) -> EngineResult<EventDescriptionId>;

    fn create_instance(&mut self, description: EventDescriptionId)
    -> EngineResult<EventInstanceId>;

    fn start_instance(&mut self, instance: EventInstanceId) -> EngineResult<()>;

    fn stop_instance(&mut self, instance: EventInstanceId, mode: StopMode) -> EngineResult<()>;

    /// Destroys the instance. The id must not be used afterwards.
    fn release_instance(&mut self, instance: EventInstanceId) -> EngineResult<()>;

    fn trigger_instance_cue(&mut self, instance: EventInstanceId) -> EngineResult<()>;

    fn instance_playback_state(&self, instance: EventInstanceId) -> EngineResult<PlaybackState>;

    fn set_instance_3d_attributes(
        &mut self,
        instance: EventInstanceId,
        attributes: &Attributes3D,
    ) -> EngineResult<()>;

    fn instance_parameter(&self, instance: EventInstanceId, name: &str) -> EngineResult<f32>;

    fn set_instance_parameter(
        &mut self,
        instance: EventInstanceId,
        name: &str,
        value: f32,
    ) -> EngineResult<()>;

    fn instance_paused(&self, instance: EventInstanceId) -> EngineResult<bool>;

    fn set_instance_paused(&mut self, instance: EventInstanceId, paused: bool)
    -> EngineResult<()>;

    fn instance_pitch(&self, instance: EventInstanceId) -> EngineResult<f32>;

    fn set_instance_pitch(&mut self, instance: EventInstanceId, pitch: f32) -> EngineResult<()>;

    fn instance_volume(&self, instance: EventInstanceId) -> EngineResult<f32>;

    fn set_instance_volume(&mut self, instance: EventInstanceId, volume: f32)
    -> EngineResult<()>;

    /// Timeline position in milliseconds
    fn instance_timeline_position(&self, instance: EventInstanceId) -> EngineResult<i32>;

    fn set_instance_timeline_position(
        &mut self,
        instance: EventInstanceId,
        position: i32,
    ) -> EngineResult<()>;

    fn instance_reverb_level(&self, instance: EventInstanceId, index: i32) -> EngineResult<f32>;

    fn set_instance_reverb_level(
        &mut self,
        instance: EventInstanceId,
        index: i32,
        level: f32,
    ) -> EngineResult<()>;

    fn is_instance_virtual(&self, instance: EventInstanceId) -> EngineResult<bool>;

    // Buses

    fn bus(&mut self, path: &str) -> EngineResult<BusId>;

    fn bus_mute(&self, bus: BusId) -> EngineResult<bool>;

    fn set_bus_mute(&mut self, bus: BusId, mute: bool) -> EngineResult<()>;

    fn bus_paused(&self, bus: BusId) -> EngineResult<bool>;

    fn set_bus_paused(&mut self, bus: BusId, paused: bool) -> EngineResult<()>;

    fn bus_volume(&self, bus: BusId) -> EngineResult<f32>;

    fn set_bus_volume(&mut self, bus: BusId, volume: f32) -> EngineResult<()>;

    fn stop_all_bus_events(&mut self, bus: BusId, mode: StopMode) -> EngineResult<()>;

    // VCAs

    fn vca(&mut self, path: &str) -> EngineResult<VcaId>;

    fn vca_volume(&self, vca: VcaId) -> EngineResult<f32>;

    fn set_vca_volume(&mut self, vca: VcaId, volume: f32) -> EngineResult<()>;

    // Low-level sounds and channels

    fn create_sound(&mut self, path: &str, mode: u32) -> EngineResult<SoundId>;

    fn release_sound(&mut self, sound: SoundId) -> EngineResult<()>;

    fn play_sound(&mut self, sound: SoundId) -> EngineResult<ChannelId>;

    fn set_channel_paused(&mut self, channel: ChannelId, paused: bool) -> EngineResult<()>;

    fn stop_channel(&mut self, channel: ChannelId) -> EngineResult<()>;

    fn is_channel_playing(&self, channel: ChannelId) -> EngineResult<bool>;

    fn channel_volume(&self, channel: ChannelId) -> EngineResult<f32>;

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) -> EngineResult<()>;

    fn channel_pitch(&self, channel: ChannelId) -> EngineResult<f32>;

    fn set_channel_pitch(&mut self, channel: ChannelId, pitch: f32) -> EngineResult<()>;
}
