//! Handle registry.
//!
//! Maps caller-visible string handles to engine ids, one independent
//! [`Namespace`] per [`ResourceClass`]. The registry stores copies of the ids
//! and never hands out references into its maps, so a resolved id is only as
//! fresh as the call that produced it.

use crate::engine::{
    BankId, BusId, ChannelId, EventDescriptionId, EventInstanceId, SoundId, VcaId,
};
use crate::error::{EngineResult, PetalStudioError, Result};
use std::collections::HashMap;
use std::fmt;

/// Kind of resource a handle refers to. Each class is a separate namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    Bank,
    EventDescription,
    EventInstance,
    Sound,
    Channel,
    Bus,
    Vca,
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bank => "bank",
            Self::EventDescription => "event description",
            Self::EventInstance => "event instance",
            Self::Sound => "sound",
            Self::Channel => "channel",
            Self::Bus => "bus",
            Self::Vca => "VCA",
        };
        f.write_str(name)
    }
}

/// Handle-to-id map for a single resource class.
#[derive(Debug)]
pub struct Namespace<T> {
    class: ResourceClass,
    entries: HashMap<String, T>,
}

impl<T: Copy + fmt::Debug> Namespace<T> {
    pub fn new(class: ResourceClass) -> Self {
        Self {
            class,
            entries: HashMap::new(),
        }
    }

    pub fn class(&self) -> ResourceClass {
        self.class
    }

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateHandle` if the handle already resolves; the existing
    /// mapping is left untouched.
    pub fn register(&mut self, handle: &str, id: T) -> Result<()> {
        self.ensure_vacant(handle)?;

        log::debug!("Registered {} '{}' -> {:?}", self.class, handle, id);
        self.entries.insert(handle.to_string(), id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DuplicateHandle` if `handle` is already registered.
    pub fn ensure_vacant(&self, handle: &str) -> Result<()> {
        if self.entries.contains_key(handle) {
            return Err(PetalStudioError::DuplicateHandle {
                class: self.class,
                handle: handle.to_string(),
            });
        }
        Ok(())
    }

    /// Inserts or overwrites a mapping, returning the id it displaced.
    pub fn replace(&mut self, handle: &str, id: T) -> Option<T> {
        let previous = self.entries.insert(handle.to_string(), id);
        if let Some(previous) = previous {
            log::debug!(
                "Replaced {} '{}': {:?} -> {:?}",
                self.class,
                handle,
                previous,
                id
            );
        }
        previous
    }

    /// # Errors
    ///
    /// Returns `UnknownHandle` if nothing is registered under `handle`.
    pub fn resolve(&self, handle: &str) -> Result<T> {
        self.get(handle)
            .ok_or_else(|| PetalStudioError::UnknownHandle {
                class: self.class,
                handle: handle.to_string(),
            })
    }

    pub fn get(&self, handle: &str) -> Option<T> {
        self.entries.get(handle).copied()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    /// Removes the mapping. Revoking an absent handle is a no-op.
    pub fn revoke(&mut self, handle: &str) -> Option<T> {
        let removed = self.entries.remove(handle);
        if let Some(id) = removed {
            log::debug!("Revoked {} '{}' ({:?})", self.class, handle, id);
        }
        removed
    }

    /// Resolves `handle`, asking `create` for the id on a miss and caching it.
    ///
    /// Used for resources addressed by path that the engine materializes on
    /// demand. A failed `create` caches nothing.
    pub fn resolve_or_materialize<F>(&mut self, handle: &str, create: F) -> Result<T>
    where
        F: FnOnce(&str) -> EngineResult<T>,
    {
        if let Some(id) = self.get(handle) {
            return Ok(id);
        }

        let id = create(handle)?;
        log::debug!("Materialized {} '{}' -> {:?}", self.class, handle, id);
        self.entries.insert(handle.to_string(), id);
        Ok(id)
    }

    /// Removes every mapping and returns them.
    pub fn drain(&mut self) -> Vec<(String, T)> {
        self.entries.drain().collect()
    }

    /// Removes every mapping, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Owned registry with one namespace per resource class.
///
/// Constructed once per world and torn down explicitly during shutdown.
#[derive(Debug)]
pub struct HandleRegistry {
    banks: Namespace<BankId>,
    event_descriptions: Namespace<EventDescriptionId>,
    event_instances: Namespace<EventInstanceId>,
    sounds: Namespace<SoundId>,
    channels: Namespace<ChannelId>,
    buses: Namespace<BusId>,
    vcas: Namespace<VcaId>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            banks: Namespace::new(ResourceClass::Bank),
            event_descriptions: Namespace::new(ResourceClass::EventDescription),
            event_instances: Namespace::new(ResourceClass::EventInstance),
            sounds: Namespace::new(ResourceClass::Sound),
            channels: Namespace::new(ResourceClass::Channel),
            buses: Namespace::new(ResourceClass::Bus),
            vcas: Namespace::new(ResourceClass::Vca),
        }
    }

    pub fn banks(&self) -> &Namespace<BankId> {
        &self.banks
    }

    pub fn banks_mut(&mut self) -> &mut Namespace<BankId> {
        &mut self.banks
    }

    pub fn event_descriptions(&self) -> &Namespace<EventDescriptionId> {
        &self.event_descriptions
    }

    pub fn event_descriptions_mut(&mut self) -> &mut Namespace<EventDescriptionId> {
        &mut self.event_descriptions
    }

    pub fn event_instances(&self) -> &Namespace<EventInstanceId> {
        &self.event_instances
    }

    pub fn event_instances_mut(&mut self) -> &mut Namespace<EventInstanceId> {
        &mut self.event_instances
    }

    pub fn sounds(&self) -> &Namespace<SoundId> {
        &self.sounds
    }

    pub fn sounds_mut(&mut self) -> &mut Namespace<SoundId> {
        &mut self.sounds
    }

    pub fn channels(&self) -> &Namespace<ChannelId> {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut Namespace<ChannelId> {
        &mut self.channels
    }

    pub fn buses(&self) -> &Namespace<BusId> {
        &self.buses
    }

    pub fn buses_mut(&mut self) -> &mut Namespace<BusId> {
        &mut self.buses
    }

    pub fn vcas(&self) -> &Namespace<VcaId> {
        &self.vcas
    }

    pub fn vcas_mut(&mut self) -> &mut Namespace<VcaId> {
        &mut self.vcas
    }

    /// Forgets every id that was derived from loaded bank content.
    ///
    /// Called after a bank is unloaded: descriptions, buses and VCAs may have
    /// come from that bank, so they are dropped and rematerialized lazily on
    /// next use instead of risking a stale id.
    pub fn invalidate_bank_content(&mut self) {
        let descriptions = self.event_descriptions.clear();
        let buses = self.buses.clear();
        let vcas = self.vcas.clear();
        log::debug!(
            "Invalidated cached bank content ({} descriptions, {} buses, {} VCAs)",
            descriptions,
            buses,
            vcas
        );
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
            && self.event_descriptions.is_empty()
            && self.event_instances.is_empty()
            && self.sounds.is_empty()
            && self.channels.is_empty()
            && self.buses.is_empty()
            && self.vcas.is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
