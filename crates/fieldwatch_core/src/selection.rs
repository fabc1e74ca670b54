//! Dispositivo em foco (selecionado por clique num marcador).
//!
//! Guarda apenas o id. A leitura sempre resolve o registro vivo no store,
//! então o painel de detalhes acompanha os ticks sem cópias.

use crate::error::CoreError;
use crate::store::DeviceStore;
use crate::types::{DeviceId, DeviceRecord};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Option<DeviceId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Foca um dispositivo existente. Id desconhecido limpa a seleção.
    pub fn select(&mut self, id: &str, store: &DeviceStore) -> Result<(), CoreError> {
        if !store.contains(id) {
            self.selected = None;
            return Err(CoreError::InvalidRecordReference(id.to_string()));
        }
        debug!("Dispositivo selecionado: {id}");
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Registro vivo em foco. Se o id sumiu do store, a seleção é limpa.
    pub fn current<'s>(&mut self, store: &'s DeviceStore) -> Option<&'s DeviceRecord> {
        let id = self.selected.as_deref()?;
        match store.get(id) {
            Some(record) => Some(record),
            None => {
                warn!("Seleção aponta para dispositivo removido: {id}");
                self.selected = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScriptedDeltas;
    use crate::types::default_devices;

    fn store() -> DeviceStore {
        let mut store = DeviceStore::new();
        store.initialize(default_devices()).unwrap();
        store
    }

    #[test]
    fn empty_by_default() {
        let mut sel = SelectionState::new();
        assert!(sel.current(&store()).is_none());
        assert!(sel.selected_id().is_none());
    }

    #[test]
    fn selection_follows_live_record() {
        let mut store = store();
        let mut sel = SelectionState::new();
        sel.select("sfax", &store).unwrap();

        let mut deltas = ScriptedDeltas::new([2; 12]);
        for _ in 0..2 {
            store.apply_simulated_tick(&mut deltas);
        }

        let current = sel.current(&store).unwrap();
        assert_eq!(current.dogs_count, 8);
        assert_eq!(current.cats_count, 9);
        assert_eq!(current, store.get("sfax").unwrap());
    }

    #[test]
    fn unknown_id_clears_selection() {
        let store = store();
        let mut sel = SelectionState::new();
        sel.select("tunis", &store).unwrap();
        let err = sel.select("bizerte", &store).unwrap_err();
        assert_eq!(err, CoreError::InvalidRecordReference("bizerte".into()));
        assert!(sel.selected_id().is_none());
    }

    #[test]
    fn vanished_record_clears_selection() {
        let full = store();
        let mut sel = SelectionState::new();
        sel.select("sousse", &full).unwrap();

        let mut other = DeviceStore::new();
        other.initialize(default_devices()[..1].to_vec()).unwrap();
        assert!(sel.current(&other).is_none());
        assert!(sel.selected_id().is_none());
    }

    #[test]
    fn clear_removes_focus() {
        let store = store();
        let mut sel = SelectionState::new();
        sel.select("tunis", &store).unwrap();
        sel.clear();
        assert!(sel.current(&store).is_none());
    }
}
