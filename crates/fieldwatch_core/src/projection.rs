//! Projeções derivadas do snapshot: marcadores do mapa, linhas da tabela
//! e série do gráfico.
//!
//! As três projeções são funções puras do snapshot. O único estado do
//! [`ViewProjector`] é o registro id → [`MarkerHandle`], criado uma vez e
//! reaproveitado em todos os ticks.

use crate::config::ChartConfig;
use crate::error::CoreError;
use crate::sinks::{MapSink, MarkerHandle};
use crate::types::{DeviceId, DeviceRecord, DeviceStatus, GeoPosition};
use std::collections::HashMap;
use tracing::{debug, warn};

// ──────────────────────────────────────────────
// Mapa
// ──────────────────────────────────────────────

/// Conteúdo de um marcador do mapa.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub id: DeviceId,
    pub position: GeoPosition,
    pub popup: String,
}

/// Texto do popup: label, status e contagens, uma linha cada.
pub fn popup_content(record: &DeviceRecord) -> String {
    format!(
        "{}\nStatus: {}\nDogs: {}\nCats: {}",
        record.label, record.status, record.dogs_count, record.cats_count
    )
}

// ──────────────────────────────────────────────
// Tabela
// ──────────────────────────────────────────────

/// Coluna fixa da tabela.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub key: &'static str,
    pub title: &'static str,
}

/// Conjunto fixo de colunas, na ordem de exibição.
pub const TABLE_COLUMNS: [TableColumn; 4] = [
    TableColumn { key: "label", title: "Label" },
    TableColumn { key: "status", title: "Status" },
    TableColumn { key: "dogsCount", title: "Dogs" },
    TableColumn { key: "catsCount", title: "Cats" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: DeviceId,
    pub label: String,
    pub status: DeviceStatus,
    pub dogs_count: u32,
    pub cats_count: u32,
}

impl TableRow {
    /// Valor da célula pela chave da coluna.
    pub fn cell(&self, key: &str) -> String {
        match key {
            "label" => self.label.clone(),
            "status" => self.status.to_string(),
            "dogsCount" => self.dogs_count.to_string(),
            "catsCount" => self.cats_count.to_string(),
            _ => String::new(),
        }
    }
}

// ──────────────────────────────────────────────
// Gráfico
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisDescriptor {
    pub kind: AxisKind,
    pub align_ticks_with_labels: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipTrigger {
    Axis,
    Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Bar,
    Line,
}

/// Série numérica única, nomeada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub name: String,
    pub kind: SeriesKind,
    pub data: Vec<u32>,
    pub color: String,
}

/// Configuração completa do gráfico, regenerada por inteiro a cada tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub categories: Vec<String>,
    pub series: ChartSeries,
    pub x_axis: AxisDescriptor,
    pub y_axis: AxisDescriptor,
    pub tooltip: TooltipTrigger,
}

// ──────────────────────────────────────────────
// Projector
// ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ViewProjector {
    chart: ChartConfig,
    markers: HashMap<DeviceId, MarkerHandle>,
}

impl ViewProjector {
    pub fn new(chart: ChartConfig) -> Self {
        Self {
            chart,
            markers: HashMap::new(),
        }
    }

    pub fn map_projection(&self, snapshot: &[DeviceRecord]) -> Vec<MarkerView> {
        snapshot
            .iter()
            .map(|r| MarkerView {
                id: r.id.clone(),
                position: r.position,
                popup: popup_content(r),
            })
            .collect()
    }

    pub fn table_columns(&self) -> &'static [TableColumn] {
        &TABLE_COLUMNS
    }

    pub fn table_projection(&self, snapshot: &[DeviceRecord]) -> Vec<TableRow> {
        snapshot
            .iter()
            .map(|r| TableRow {
                id: r.id.clone(),
                label: r.label.clone(),
                status: r.status,
                dogs_count: r.dogs_count,
                cats_count: r.cats_count,
            })
            .collect()
    }

    pub fn chart_projection(&self, snapshot: &[DeviceRecord]) -> ChartOptions {
        ChartOptions {
            categories: snapshot.iter().map(|r| r.label.clone()).collect(),
            series: ChartSeries {
                name: self.chart.series_name.clone(),
                kind: SeriesKind::Bar,
                data: snapshot.iter().map(DeviceRecord::total_count).collect(),
                color: self.chart.series_color.clone(),
            },
            x_axis: AxisDescriptor {
                kind: AxisKind::Category,
                align_ticks_with_labels: true,
            },
            y_axis: AxisDescriptor {
                kind: AxisKind::Value,
                align_ticks_with_labels: false,
            },
            tooltip: TooltipTrigger::Axis,
        }
    }

    /// Cria um marcador por registro. Só age na primeira chamada; registros
    /// que já possuem handle nunca são recriados.
    pub fn create_markers(&mut self, snapshot: &[DeviceRecord], map: &mut dyn MapSink) -> usize {
        let mut created = 0;
        for view in self.map_projection(snapshot) {
            if self.markers.contains_key(&view.id) {
                continue;
            }
            let handle = map.add_marker(view.position, &view.popup);
            debug!("Marcador {:?} criado para {}", handle, view.id);
            self.markers.insert(view.id, handle);
            created += 1;
        }
        created
    }

    /// Atualiza o popup de cada marcador existente, no lugar.
    ///
    /// Registros sem handle, ou handles recusados pelo sink, são pulados e
    /// reportados como [`CoreError::InvalidRecordReference`].
    pub fn refresh_markers(
        &self,
        snapshot: &[DeviceRecord],
        map: &mut dyn MapSink,
    ) -> Vec<CoreError> {
        let mut skipped = Vec::new();
        for view in self.map_projection(snapshot) {
            let accepted = self
                .markers
                .get(&view.id)
                .is_some_and(|&handle| map.set_popup_content(handle, &view.popup));
            if !accepted {
                let err = CoreError::InvalidRecordReference(view.id);
                warn!("Atualização de marcador ignorada: {err}");
                skipped.push(err);
            }
        }
        skipped
    }

    pub fn marker_for(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    /// Resolve o id do dispositivo a partir de um handle (eventos de clique).
    pub fn device_for(&self, handle: MarkerHandle) -> Option<&DeviceId> {
        self.markers
            .iter()
            .find_map(|(id, &h)| (h == handle).then_some(id))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}
