//! Store canônico dos dispositivos e o passo de ingestão simulada.
//!
//! O [`DeviceStore`] é a única fonte de verdade. Contagens só mudam via
//! [`DeviceStore::apply_simulated_tick`]; o flag `alert_fired` só é escrito
//! pelo avaliador de alertas através de um empréstimo mutável que o engine
//! obtém do store durante o tick.

use crate::error::CoreError;
use crate::types::{DeviceId, DeviceRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info};

/// Delta máximo padrão por contagem e por tick.
pub const DEFAULT_MAX_DELTA: u32 = 2;

// ──────────────────────────────────────────────
// Fontes de delta
// ──────────────────────────────────────────────

/// Fonte injetável dos incrementos simulados.
pub trait DeltaSource {
    /// Próximo incremento (sempre não negativo).
    fn next_delta(&mut self) -> u32;
}

/// Deltas uniformes em `0..=max` a partir de um `StdRng`.
pub struct RandomDeltas {
    rng: StdRng,
    max: u32,
}

impl RandomDeltas {
    /// Gerador reprodutível: mesma seed, mesma sequência.
    pub fn seeded(seed: u64, max: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max,
        }
    }

    pub fn from_entropy(max: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max,
        }
    }
}

impl DeltaSource for RandomDeltas {
    fn next_delta(&mut self) -> u32 {
        self.rng.gen_range(0..=self.max)
    }
}

/// Sequência fixa de deltas; retorna 0 quando esgotada.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDeltas {
    queue: VecDeque<u32>,
}

impl ScriptedDeltas {
    pub fn new(deltas: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: deltas.into_iter().collect(),
        }
    }

    /// Acrescenta deltas ao fim da fila.
    pub fn extend(&mut self, deltas: impl IntoIterator<Item = u32>) {
        self.queue.extend(deltas);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DeltaSource for ScriptedDeltas {
    fn next_delta(&mut self) -> u32 {
        self.queue.pop_front().unwrap_or(0)
    }
}

// ──────────────────────────────────────────────
// Store
// ──────────────────────────────────────────────

/// Registro mutado em um tick, com o total anterior ao tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickedRecord {
    pub index: usize,
    pub id: DeviceId,
    pub previous_total: u32,
}

/// Coleção ordenada e canônica de [`DeviceRecord`].
#[derive(Debug, Default)]
pub struct DeviceStore {
    records: Vec<DeviceRecord>,
    index: HashMap<DeviceId, usize>,
    initialized: bool,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Popula o store uma única vez. Uma segunda chamada falha com
    /// [`CoreError::AlreadyInitialized`] sem tocar nos dados.
    pub fn initialize(&mut self, seed: Vec<DeviceRecord>) -> Result<(), CoreError> {
        if self.initialized {
            return Err(CoreError::AlreadyInitialized);
        }

        let mut seen = HashSet::with_capacity(seed.len());
        for record in &seed {
            if !seen.insert(record.id.as_str()) {
                return Err(CoreError::InvalidSeed(format!("id duplicado: {}", record.id)));
            }
            if !record.position.is_valid() {
                return Err(CoreError::InvalidSeed(format!(
                    "posição fora da faixa para {}: ({}, {})",
                    record.id, record.position.lat, record.position.lng
                )));
            }
        }

        self.index = seed
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        self.records = seed;
        self.initialized = true;
        info!("Store inicializado com {} dispositivos", self.records.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Visão somente leitura, na ordem canônica.
    pub fn snapshot(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DeviceRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incrementa cães e gatos de cada registro com deltas independentes.
    ///
    /// Retorna todos os registros (todos mudam a cada tick) com o total
    /// anterior, para o avaliador de alertas.
    pub fn apply_simulated_tick(&mut self, deltas: &mut dyn DeltaSource) -> Vec<TickedRecord> {
        let mut ticked = Vec::with_capacity(self.records.len());

        for (index, record) in self.records.iter_mut().enumerate() {
            let previous_total = record.total_count();
            let dogs = deltas.next_delta();
            let cats = deltas.next_delta();
            record.dogs_count = record.dogs_count.saturating_add(dogs);
            record.cats_count = record.cats_count.saturating_add(cats);

            debug!(
                "{}: +{dogs} cães, +{cats} gatos → total {}",
                record.id,
                record.total_count()
            );

            ticked.push(TickedRecord {
                index,
                id: record.id.clone(),
                previous_total,
            });
        }

        ticked
    }

    /// Empréstimo mutável usado apenas pelo engine para marcar `alert_fired`.
    pub(crate) fn record_mut(&mut self, index: usize) -> Option<&mut DeviceRecord> {
        self.records.get_mut(index)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceStatus, GeoPosition, default_devices};

    fn record(id: &str, dogs: u32, cats: u32) -> DeviceRecord {
        DeviceRecord::new(id, id, GeoPosition::new(35.0, 10.0), DeviceStatus::Active, dogs, cats)
    }

    #[test]
    fn initialize_twice_keeps_data() {
        let mut store = DeviceStore::new();
        store.initialize(vec![record("A", 1, 1)]).unwrap();
        let err = store.initialize(vec![record("B", 5, 5)]).unwrap_err();
        assert_eq!(err, CoreError::AlreadyInitialized);
        assert_eq!(store.len(), 1);
        assert!(store.contains("A"));
        assert!(!store.contains("B"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut store = DeviceStore::new();
        let err = store
            .initialize(vec![record("A", 0, 0), record("A", 1, 1)])
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSeed(_)));
        assert!(!store.is_initialized());
    }

    #[test]
    fn rejects_invalid_position() {
        let mut store = DeviceStore::new();
        let mut bad = record("A", 0, 0);
        bad.position = GeoPosition::new(120.0, 10.0);
        assert!(matches!(store.initialize(vec![bad]), Err(CoreError::InvalidSeed(_))));
    }

    #[test]
    fn scripted_tick_applies_exact_deltas() {
        let mut store = DeviceStore::new();
        store.initialize(vec![record("A", 9, 9), record("B", 0, 0)]).unwrap();

        let mut deltas = ScriptedDeltas::new([1, 1, 2, 0]);
        let ticked = store.apply_simulated_tick(&mut deltas);

        assert_eq!(ticked.len(), 2);
        assert_eq!(ticked[0].previous_total, 18);
        assert_eq!(ticked[1].id, "B");
        assert_eq!(store.get("A").unwrap().total_count(), 20);
        assert_eq!(store.get("B").unwrap().dogs_count, 2);
        assert_eq!(store.get("B").unwrap().cats_count, 0);
        assert_eq!(deltas.remaining(), 0);
    }

    #[test]
    fn counts_never_decrease() {
        let mut store = DeviceStore::new();
        store.initialize(default_devices()).unwrap();
        let mut deltas = RandomDeltas::seeded(42, DEFAULT_MAX_DELTA);

        for _ in 0..200 {
            let before: Vec<(u32, u32)> = store
                .snapshot()
                .iter()
                .map(|r| (r.dogs_count, r.cats_count))
                .collect();
            store.apply_simulated_tick(&mut deltas);
            for (r, (dogs, cats)) in store.snapshot().iter().zip(before) {
                assert!(r.dogs_count >= dogs);
                assert!(r.cats_count >= cats);
                assert!(r.dogs_count - dogs <= DEFAULT_MAX_DELTA);
                assert!(r.cats_count - cats <= DEFAULT_MAX_DELTA);
            }
        }
    }

    #[test]
    fn seeded_deltas_are_reproducible() {
        let mut a = RandomDeltas::seeded(7, 2);
        let mut b = RandomDeltas::seeded(7, 2);
        let xs: Vec<u32> = (0..32).map(|_| a.next_delta()).collect();
        let ys: Vec<u32> = (0..32).map(|_| b.next_delta()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn order_matches_seed() {
        let mut store = DeviceStore::new();
        store.initialize(default_devices()).unwrap();
        let ids: Vec<&str> = store.snapshot().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["tunis", "sfax", "sousse"]);
    }
}
