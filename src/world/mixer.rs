//! Bus and VCA control. Both are looked up by path on first use and cached
//! until the next bank unload.

use super::PetalStudioWorld;
use crate::engine::{AudioEngine, BusId, StopMode, VcaId};
use crate::error::Result;

impl<E: AudioEngine> PetalStudioWorld<E> {
    fn bus(&mut self, path: &str) -> Result<BusId> {
        let engine = &mut self.engine;
        self.registry
            .buses_mut()
            .resolve_or_materialize(path, |path| engine.bus(path))
    }

    fn vca(&mut self, path: &str) -> Result<VcaId> {
        let engine = &mut self.engine;
        self.registry
            .vcas_mut()
            .resolve_or_materialize(path, |path| engine.vca(path))
    }

    pub fn bus_mute(&mut self, path: &str) -> Result<bool> {
        let bus = self.bus(path)?;
        Ok(self.engine.bus_mute(bus)?)
    }

    pub fn set_bus_mute(&mut self, path: &str, mute: bool) -> Result<()> {
        let bus = self.bus(path)?;
        self.engine.set_bus_mute(bus, mute)?;
        Ok(())
    }

    pub fn bus_paused(&mut self, path: &str) -> Result<bool> {
        let bus = self.bus(path)?;
        Ok(self.engine.bus_paused(bus)?)
    }

    pub fn set_bus_paused(&mut self, path: &str, paused: bool) -> Result<()> {
        let bus = self.bus(path)?;
        self.engine.set_bus_paused(bus, paused)?;
        Ok(())
    }

    pub fn bus_volume(&mut self, path: &str) -> Result<f32> {
        let bus = self.bus(path)?;
        Ok(self.engine.bus_volume(bus)?)
    }

    pub fn set_bus_volume(&mut self, path: &str, volume: f32) -> Result<()> {
        let bus = self.bus(path)?;
        self.engine.set_bus_volume(bus, volume)?;
        Ok(())
    }

    pub fn stop_all_bus_events(&mut self, path: &str, mode: StopMode) -> Result<()> {
        let bus = self.bus(path)?;
        log::debug!("Stopping all events on '{}' ({:?})", path, mode);
        self.engine.stop_all_bus_events(bus, mode)?;
        Ok(())
    }

    pub fn vca_volume(&mut self, path: &str) -> Result<f32> {
        let vca = self.vca(path)?;
        Ok(self.engine.vca_volume(vca)?)
    }

    pub fn set_vca_volume(&mut self, path: &str, volume: f32) -> Result<()> {
        let vca = self.vca(path)?;
        self.engine.set_vca_volume(vca, volume)?;
        Ok(())
    }
}
