//! In-memory engine and scene used by the unit tests

use crate::config::{PetalStudioDesc, SoftwareFormat, Sound3DSettings};
use crate::engine::{
    AudioEngine, BankId, BusId, ChannelId, EventDescriptionId, EventInstanceId, LoadingState,
    PlaybackState, SoundId, StopMode, VcaId,
};
use crate::error::{EngineError, EngineResult};
use crate::math::{Attributes3D, Transform};
use crate::scene::{SceneGraph, SceneObjectId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const ERR_INVALID_HANDLE: i32 = 30;
const ERR_NOT_FOUND: i32 = 74;

fn invalid(what: &str) -> EngineError {
    EngineError::new(ERR_INVALID_HANDLE, format!("invalid {}", what))
}

/// Every call the world made, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Initialize,
    Shutdown,
    Update,
    SetSoftwareFormat(SoftwareFormat),
    Set3DSettings(Sound3DSettings),
    SetGlobalParameter(String, f32),
    GlobalParameter(String),
    SetListenerAttributes(i32, Attributes3D),
    LoadBank(String, u32),
    UnloadBank(BankId),
    BankQuery(BankId),
    EventDescription(String),
    CreateInstance(EventDescriptionId),
    Start(EventInstanceId),
    Stop(EventInstanceId, StopMode),
    Release(EventInstanceId),
    TriggerCue(EventInstanceId),
    PlaybackState(EventInstanceId),
    Set3DAttributes(EventInstanceId, Attributes3D),
    SetParameter(EventInstanceId, String, f32),
    SetPaused(EventInstanceId, bool),
    SetPitch(EventInstanceId, f32),
    SetVolume(EventInstanceId, f32),
    SetTimelinePosition(EventInstanceId, i32),
    SetReverbLevel(EventInstanceId, i32, f32),
    InstanceQuery(EventInstanceId),
    Bus(String),
    SetBusMute(BusId, bool),
    SetBusPaused(BusId, bool),
    SetBusVolume(BusId, f32),
    StopAllBusEvents(BusId, StopMode),
    BusQuery(BusId),
    Vca(String),
    SetVcaVolume(VcaId, f32),
    VcaQuery(VcaId),
    CreateSound(String, u32),
    ReleaseSound(SoundId),
    PlaySound(SoundId),
    SetChannelPaused(ChannelId, bool),
    StopChannel(ChannelId),
    SetChannelVolume(ChannelId, f32),
    SetChannelPitch(ChannelId, f32),
    ChannelQuery(ChannelId),
}

#[derive(Debug, Clone)]
pub(crate) struct InstanceState {
    pub description: EventDescriptionId,
    pub playback: PlaybackState,
    pub paused: bool,
    pub pitch: f32,
    pub volume: f32,
    pub timeline_position: i32,
    pub reverb: HashMap<i32, f32>,
    pub parameters: HashMap<String, f32>,
    pub attributes: Option<Attributes3D>,
    pub is_virtual: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BusState {
    pub mute: bool,
    pub paused: bool,
    pub volume: f32,
}

#[derive(Debug, Clone)]
pub(crate) struct ChannelState {
    pub sound: SoundId,
    pub playing: bool,
    pub paused: bool,
    pub volume: f32,
    pub pitch: f32,
}

/// Engine double that tracks object lifetimes and rejects use of released ids.
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    next_id: u64,
    calls: RefCell<Vec<Call>>,
    known_events: HashSet<String>,
    descriptions: HashMap<EventDescriptionId, String>,
    pub instances: HashMap<EventInstanceId, InstanceState>,
    pub banks: HashMap<BankId, String>,
    pub buses: HashMap<BusId, BusState>,
    pub vcas: HashMap<VcaId, f32>,
    pub sounds: HashMap<SoundId, String>,
    pub channels: HashMap<ChannelId, ChannelState>,
    globals: HashMap<String, f32>,
    pub listener: Option<(i32, Attributes3D)>,
    pub initialized: bool,
    /// Instances whose playback state query fails
    pub broken_instances: HashSet<EventInstanceId>,
    pub fail_update: bool,
    pub fail_start: bool,
}

impl RecordingEngine {
    pub fn with_events(paths: &[&str]) -> Self {
        Self {
            known_events: paths.iter().map(|path| path.to_string()).collect(),
            ..Self::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count_calls(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn releases(&self) -> Vec<EventInstanceId> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Release(instance) => Some(*instance),
                _ => None,
            })
            .collect()
    }

    pub fn attribute_pushes(&self, instance: EventInstanceId) -> Vec<Attributes3D> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Set3DAttributes(id, attributes) if *id == instance => Some(*attributes),
                _ => None,
            })
            .collect()
    }

    /// Simulates natural completion of an instance.
    pub fn finish(&mut self, instance: EventInstanceId) {
        if let Some(state) = self.instances.get_mut(&instance) {
            state.playback = PlaybackState::Stopped;
        }
    }

    pub fn finish_all(&mut self) {
        for state in self.instances.values_mut() {
            state.playback = PlaybackState::Stopped;
        }
    }

    pub fn live_instances(&self) -> Vec<EventInstanceId> {
        let mut ids: Vec<_> = self.instances.keys().copied().collect();
        ids.sort_by_key(|id| id.raw());
        ids
    }

    fn instance(&self, instance: EventInstanceId) -> EngineResult<&InstanceState> {
        self.instances
            .get(&instance)
            .ok_or_else(|| invalid("event instance"))
    }

    fn instance_mut(&mut self, instance: EventInstanceId) -> EngineResult<&mut InstanceState> {
        self.instances
            .get_mut(&instance)
            .ok_or_else(|| invalid("event instance"))
    }

    fn bus_state(&self, bus: BusId) -> EngineResult<&BusState> {
        self.buses.get(&bus).ok_or_else(|| invalid("bus"))
    }

    fn bus_state_mut(&mut self, bus: BusId) -> EngineResult<&mut BusState> {
        self.buses.get_mut(&bus).ok_or_else(|| invalid("bus"))
    }

    fn channel(&self, channel: ChannelId) -> EngineResult<&ChannelState> {
        self.channels.get(&channel).ok_or_else(|| invalid("channel"))
    }

    fn channel_mut(&mut self, channel: ChannelId) -> EngineResult<&mut ChannelState> {
        self.channels
            .get_mut(&channel)
            .ok_or_else(|| invalid("channel"))
    }

    fn bank(&self, bank: BankId) -> EngineResult<&String> {
        self.record(Call::BankQuery(bank));
        self.banks.get(&bank).ok_or_else(|| invalid("bank"))
    }
}

impl AudioEngine for RecordingEngine {
    fn initialize(&mut self, _desc: &PetalStudioDesc) -> EngineResult<()> {
        self.record(Call::Initialize);
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> EngineResult<()> {
        self.record(Call::Shutdown);
        self.initialized = false;
        Ok(())
    }

    fn update(&mut self) -> EngineResult<()> {
        self.record(Call::Update);
        if self.fail_update {
            return Err(EngineError::new(28, "internal error"));
        }
        Ok(())
    }

    fn set_software_format(&mut self, format: &SoftwareFormat) -> EngineResult<()> {
        self.record(Call::SetSoftwareFormat(*format));
        Ok(())
    }

    fn set_3d_settings(&mut self, settings: &Sound3DSettings) -> EngineResult<()> {
        self.record(Call::Set3DSettings(*settings));
        Ok(())
    }

    fn set_global_parameter(&mut self, name: &str, value: f32) -> EngineResult<()> {
        self.record(Call::SetGlobalParameter(name.to_string(), value));
        self.globals.insert(name.to_string(), value);
        Ok(())
    }

    fn global_parameter(&self, name: &str) -> EngineResult<f32> {
        self.record(Call::GlobalParameter(name.to_string()));
        self.globals
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::new(ERR_NOT_FOUND, "parameter not found"))
    }

    fn set_listener_attributes(
        &mut self,
        index: i32,
        attributes: &Attributes3D,
    ) -> EngineResult<()> {
        self.record(Call::SetListenerAttributes(index, *attributes));
        self.listener = Some((index, *attributes));
        Ok(())
    }

    fn load_bank(&mut self, path: &str, flags: u32) -> EngineResult<BankId> {
        self.record(Call::LoadBank(path.to_string(), flags));
        if path.is_empty() {
            return Err(EngineError::new(18, "file not found"));
        }
        let id = BankId::from_raw(self.next());
        self.banks.insert(id, path.to_string());
        Ok(id)
    }

    fn unload_bank(&mut self, bank: BankId) -> EngineResult<()> {
        self.record(Call::UnloadBank(bank));
        self.banks.remove(&bank).map(|_| ()).ok_or_else(|| invalid("bank"))
    }

    fn bank_loading_state(&self, bank: BankId) -> EngineResult<LoadingState> {
        self.bank(bank).map(|_| LoadingState::Loaded)
    }

    fn bank_bus_count(&self, bank: BankId) -> EngineResult<u32> {
        self.bank(bank).map(|_| 2)
    }

    fn bank_event_count(&self, bank: BankId) -> EngineResult<u32> {
        self.bank(bank).map(|_| self.known_events.len() as u32)
    }

    fn bank_string_count(&self, bank: BankId) -> EngineResult<u32> {
        self.bank(bank).map(|_| 0)
    }

    fn bank_vca_count(&self, bank: BankId) -> EngineResult<u32> {
        self.bank(bank).map(|_| 1)
    }

    fn event_description(&mut self, path: &str) -> EngineResult<EventDescriptionId> {
        self.record(Call::EventDescription(path.to_string()));
        if !self.known_events.contains(path) {
            return Err(EngineError::new(ERR_NOT_FOUND, "event not found"));
        }
        let id = EventDescriptionId::from_raw(self.next());
        self.descriptions.insert(id, path.to_string());
        Ok(id)
    }

    fn create_instance(
        &mut self,
        description: EventDescriptionId,
    ) -> EngineResult<EventInstanceId> {
        self.record(Call::CreateInstance(description));
        if !self.descriptions.contains_key(&description) {
            return Err(invalid("event description"));
        }
        let id = EventInstanceId::from_raw(self.next());
        self.instances.insert(
            id,
            InstanceState {
                description,
                playback: PlaybackState::Stopped,
                paused: false,
                pitch: 1.0,
                volume: 1.0,
                timeline_position: 0,
                reverb: HashMap::new(),
                parameters: HashMap::new(),
                attributes: None,
                is_virtual: false,
            },
        );
        Ok(id)
    }

    fn start_instance(&mut self, instance: EventInstanceId) -> EngineResult<()> {
        self.record(Call::Start(instance));
        if self.fail_start {
            return Err(EngineError::new(28, "start failed"));
        }
        self.instance_mut(instance)?.playback = PlaybackState::Playing;
        Ok(())
    }

    fn stop_instance(&mut self, instance: EventInstanceId, mode: StopMode) -> EngineResult<()> {
        self.record(Call::Stop(instance, mode));
        self.instance_mut(instance)?.playback = PlaybackState::Stopped;
        Ok(())
    }

    fn release_instance(&mut self, instance: EventInstanceId) -> EngineResult<()> {
        self.record(Call::Release(instance));
        self.instances
            .remove(&instance)
            .map(|_| ())
            .ok_or_else(|| invalid("event instance"))
    }

    fn trigger_instance_cue(&mut self, instance: EventInstanceId) -> EngineResult<()> {
        self.record(Call::TriggerCue(instance));
        self.instance(instance).map(|_| ())
    }

    fn instance_playback_state(&self, instance: EventInstanceId) -> EngineResult<PlaybackState> {
        self.record(Call::PlaybackState(instance));
        if self.broken_instances.contains(&instance) {
            return Err(invalid("event description"));
        }
        self.instance(instance).map(|state| state.playback)
    }

    fn set_instance_3d_attributes(
        &mut self,
        instance: EventInstanceId,
        attributes: &Attributes3D,
    ) -> EngineResult<()> {
        self.record(Call::Set3DAttributes(instance, *attributes));
        self.instance_mut(instance)?.attributes = Some(*attributes);
        Ok(())
    }

    fn instance_parameter(&self, instance: EventInstanceId, name: &str) -> EngineResult<f32> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance)?
            .parameters
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::new(ERR_NOT_FOUND, "parameter not found"))
    }

    fn set_instance_parameter(
        &mut self,
        instance: EventInstanceId,
        name: &str,
        value: f32,
    ) -> EngineResult<()> {
        self.record(Call::SetParameter(instance, name.to_string(), value));
        self.instance_mut(instance)?
            .parameters
            .insert(name.to_string(), value);
        Ok(())
    }

    fn instance_paused(&self, instance: EventInstanceId) -> EngineResult<bool> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance).map(|state| state.paused)
    }

    fn set_instance_paused(&mut self, instance: EventInstanceId, paused: bool) -> EngineResult<()> {
        self.record(Call::SetPaused(instance, paused));
        self.instance_mut(instance)?.paused = paused;
        Ok(())
    }

    fn instance_pitch(&self, instance: EventInstanceId) -> EngineResult<f32> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance).map(|state| state.pitch)
    }

    fn set_instance_pitch(&mut self, instance: EventInstanceId, pitch: f32) -> EngineResult<()> {
        self.record(Call::SetPitch(instance, pitch));
        self.instance_mut(instance)?.pitch = pitch;
        Ok(())
    }

    fn instance_volume(&self, instance: EventInstanceId) -> EngineResult<f32> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance).map(|state| state.volume)
    }

    fn set_instance_volume(&mut self, instance: EventInstanceId, volume: f32) -> EngineResult<()> {
        self.record(Call::SetVolume(instance, volume));
        self.instance_mut(instance)?.volume = volume;
        Ok(())
    }

    fn instance_timeline_position(&self, instance: EventInstanceId) -> EngineResult<i32> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance).map(|state| state.timeline_position)
    }

    fn set_instance_timeline_position(
        &mut self,
        instance: EventInstanceId,
        position: i32,
    ) -> EngineResult<()> {
        self.record(Call::SetTimelinePosition(instance, position));
        self.instance_mut(instance)?.timeline_position = position;
        Ok(())
    }

    fn instance_reverb_level(&self, instance: EventInstanceId, index: i32) -> EngineResult<f32> {
        self.record(Call::InstanceQuery(instance));
        Ok(self
            .instance(instance)?
            .reverb
            .get(&index)
            .copied()
            .unwrap_or(0.0))
    }

    fn set_instance_reverb_level(
        &mut self,
        instance: EventInstanceId,
        index: i32,
        level: f32,
    ) -> EngineResult<()> {
        self.record(Call::SetReverbLevel(instance, index, level));
        self.instance_mut(instance)?.reverb.insert(index, level);
        Ok(())
    }

    fn is_instance_virtual(&self, instance: EventInstanceId) -> EngineResult<bool> {
        self.record(Call::InstanceQuery(instance));
        self.instance(instance).map(|state| state.is_virtual)
    }

    fn bus(&mut self, path: &str) -> EngineResult<BusId> {
        self.record(Call::Bus(path.to_string()));
        if !path.starts_with("bus:/") {
            return Err(EngineError::new(ERR_NOT_FOUND, "bus not found"));
        }
        let id = BusId::from_raw(self.next());
        self.buses.insert(
            id,
            BusState {
                mute: false,
                paused: false,
                volume: 1.0,
            },
        );
        Ok(id)
    }

    fn bus_mute(&self, bus: BusId) -> EngineResult<bool> {
        self.record(Call::BusQuery(bus));
        self.bus_state(bus).map(|state| state.mute)
    }

    fn set_bus_mute(&mut self, bus: BusId, mute: bool) -> EngineResult<()> {
        self.record(Call::SetBusMute(bus, mute));
        self.bus_state_mut(bus)?.mute = mute;
        Ok(())
    }

    fn bus_paused(&self, bus: BusId) -> EngineResult<bool> {
        self.record(Call::BusQuery(bus));
        self.bus_state(bus).map(|state| state.paused)
    }

    fn set_bus_paused(&mut self, bus: BusId, paused: bool) -> EngineResult<()> {
        self.record(Call::SetBusPaused(bus, paused));
        self.bus_state_mut(bus)?.paused = paused;
        Ok(())
    }

    fn bus_volume(&self, bus: BusId) -> EngineResult<f32> {
        self.record(Call::BusQuery(bus));
        self.bus_state(bus).map(|state| state.volume)
    }

    fn set_bus_volume(&mut self, bus: BusId, volume: f32) -> EngineResult<()> {
        self.record(Call::SetBusVolume(bus, volume));
        self.bus_state_mut(bus)?.volume = volume;
        Ok(())
    }

    fn stop_all_bus_events(&mut self, bus: BusId, mode: StopMode) -> EngineResult<()> {
        self.record(Call::StopAllBusEvents(bus, mode));
        self.bus_state(bus).map(|_| ())
    }

    fn vca(&mut self, path: &str) -> EngineResult<VcaId> {
        self.record(Call::Vca(path.to_string()));
        if !path.starts_with("vca:/") {
            return Err(EngineError::new(ERR_NOT_FOUND, "vca not found"));
        }
        let id = VcaId::from_raw(self.next());
        self.vcas.insert(id, 1.0);
        Ok(id)
    }

    fn vca_volume(&self, vca: VcaId) -> EngineResult<f32> {
        self.record(Call::VcaQuery(vca));
        self.vcas.get(&vca).copied().ok_or_else(|| invalid("vca"))
    }

    fn set_vca_volume(&mut self, vca: VcaId, volume: f32) -> EngineResult<()> {
        self.record(Call::SetVcaVolume(vca, volume));
        let slot = self.vcas.get_mut(&vca).ok_or_else(|| invalid("vca"))?;
        *slot = volume;
        Ok(())
    }

    fn create_sound(&mut self, path: &str, mode: u32) -> EngineResult<SoundId> {
        self.record(Call::CreateSound(path.to_string(), mode));
        if path.is_empty() {
            return Err(EngineError::new(18, "file not found"));
        }
        let id = SoundId::from_raw(self.next());
        self.sounds.insert(id, path.to_string());
        Ok(id)
    }

    fn release_sound(&mut self, sound: SoundId) -> EngineResult<()> {
        self.record(Call::ReleaseSound(sound));
        self.sounds
            .remove(&sound)
            .map(|_| ())
            .ok_or_else(|| invalid("sound"))
    }

    fn play_sound(&mut self, sound: SoundId) -> EngineResult<ChannelId> {
        self.record(Call::PlaySound(sound));
        if !self.sounds.contains_key(&sound) {
            return Err(invalid("sound"));
        }
        let id = ChannelId::from_raw(self.next());
        self.channels.insert(
            id,
            ChannelState {
                sound,
                playing: true,
                paused: false,
                volume: 1.0,
                pitch: 1.0,
            },
        );
        Ok(id)
    }

    fn set_channel_paused(&mut self, channel: ChannelId, paused: bool) -> EngineResult<()> {
        self.record(Call::SetChannelPaused(channel, paused));
        self.channel_mut(channel)?.paused = paused;
        Ok(())
    }

    fn stop_channel(&mut self, channel: ChannelId) -> EngineResult<()> {
        self.record(Call::StopChannel(channel));
        self.channel_mut(channel)?.playing = false;
        Ok(())
    }

    fn is_channel_playing(&self, channel: ChannelId) -> EngineResult<bool> {
        self.record(Call::ChannelQuery(channel));
        self.channel(channel).map(|state| state.playing)
    }

    fn channel_volume(&self, channel: ChannelId) -> EngineResult<f32> {
        self.record(Call::ChannelQuery(channel));
        self.channel(channel).map(|state| state.volume)
    }

    fn set_channel_volume(&mut self, channel: ChannelId, volume: f32) -> EngineResult<()> {
        self.record(Call::SetChannelVolume(channel, volume));
        self.channel_mut(channel)?.volume = volume;
        Ok(())
    }

    fn channel_pitch(&self, channel: ChannelId) -> EngineResult<f32> {
        self.record(Call::ChannelQuery(channel));
        self.channel(channel).map(|state| state.pitch)
    }

    fn set_channel_pitch(&mut self, channel: ChannelId, pitch: f32) -> EngineResult<()> {
        self.record(Call::SetChannelPitch(channel, pitch));
        self.channel_mut(channel)?.pitch = pitch;
        Ok(())
    }
}

/// Scene made of free-standing objects that can be moved and despawned.
#[derive(Debug, Default)]
pub(crate) struct TestScene {
    objects: HashMap<SceneObjectId, Transform>,
}

impl TestScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, raw: u64, transform: Transform) -> SceneObjectId {
        let id = SceneObjectId::new(raw);
        self.objects.insert(id, transform);
        id
    }

    pub fn move_to(&mut self, object: SceneObjectId, transform: Transform) {
        self.objects.insert(object, transform);
    }

    pub fn despawn(&mut self, object: SceneObjectId) {
        self.objects.remove(&object);
    }
}

impl SceneGraph for TestScene {
    fn is_valid(&self, object: SceneObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    fn world_transform(&self, object: SceneObjectId) -> Transform {
        self.objects.get(&object).copied().unwrap_or_default()
    }
}
