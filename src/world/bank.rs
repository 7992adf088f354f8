use super::PetalStudioWorld;
use crate::engine::{AudioEngine, BankId, LoadingState};
use crate::error::Result;
use crate::events::PetalStudioEvent;

impl<E: AudioEngine> PetalStudioWorld<E> {
    /// Loads the bank at `path` and registers it under that path.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateHandle` if the path is already loaded. The engine is
    /// not called in that case.
    pub fn load_bank(&mut self, path: &str, flags: u32) -> Result<String> {
        self.registry.banks().ensure_vacant(path)?;

        let bank = self.engine.load_bank(path, flags)?;
        self.registry.banks_mut().register(path, bank)?;

        log::info!("Loaded bank '{}' as {}", path, bank);
        self.events.emit(PetalStudioEvent::BankLoaded {
            path: path.to_string(),
        });
        Ok(path.to_string())
    }

    /// Unloads the bank at `path`. Unknown paths are ignored.
    ///
    /// Cached event descriptions, buses and VCAs may point into the bank, so
    /// they are dropped and materialized again on next use.
    ///
    /// If the engine refuses the unload the bank stays registered.
    pub fn unload_bank(&mut self, path: &str) -> Result<()> {
        let Some(bank) = self.registry.banks().get(path) else {
            log::debug!("unload_bank: '{}' is not loaded", path);
            return Ok(());
        };

        if let Err(error) = self.engine.unload_bank(bank) {
            log::warn!("Failed to unload bank '{}' ({}), keeping handle: {}", path, bank, error);
            return Err(error.into());
        }
        self.registry.banks_mut().revoke(path);
        self.registry.invalidate_bank_content();

        log::info!("Unloaded bank '{}'", path);
        self.events.emit(PetalStudioEvent::BankUnloaded {
            path: path.to_string(),
        });
        Ok(())
    }

    fn bank(&self, path: &str) -> Result<BankId> {
        self.registry.banks().resolve(path)
    }

    pub fn bank_loading_state(&self, path: &str) -> Result<LoadingState> {
        Ok(self.engine.bank_loading_state(self.bank(path)?)?)
    }

    pub fn bank_bus_count(&self, path: &str) -> Result<u32> {
        Ok(self.engine.bank_bus_count(self.bank(path)?)?)
    }

    pub fn bank_event_count(&self, path: &str) -> Result<u32> {
        Ok(self.engine.bank_event_count(self.bank(path)?)?)
    }

    pub fn bank_string_count(&self, path: &str) -> Result<u32> {
        Ok(self.engine.bank_string_count(self.bank(path)?)?)
    }

    pub fn bank_vca_count(&self, path: &str) -> Result<u32> {
        Ok(self.engine.bank_vca_count(self.bank(path)?)?)
    }
}
