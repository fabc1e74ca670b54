//! Tipos do modelo de dados: dispositivos de campo e suas contagens.
//!
//! Estruturas passivas, sem comportamento além de acessores. Quem muta as
//! contagens é o [`DeviceStore`](crate::store::DeviceStore).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador estável de um dispositivo (chave de lookup O(1)).
pub type DeviceId = String;

// ──────────────────────────────────────────────
// Posição
// ──────────────────────────────────────────────

/// Posição geográfica de um dispositivo (graus decimais).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoPosition {
    /// Latitude (-90..=90)
    pub lat: f64,
    /// Longitude (-180..=180)
    pub lng: f64,
}

impl GeoPosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` se a posição está dentro da faixa geográfica válida.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

// ──────────────────────────────────────────────
// Status
// ──────────────────────────────────────────────

/// Status exibido do dispositivo. Não é alterado pelo ciclo de updates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Active => f.write_str("Active"),
            DeviceStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

// ──────────────────────────────────────────────
// Registro
// ──────────────────────────────────────────────

/// Um dispositivo de campo reportando contagens de animais.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub position: GeoPosition,
    pub label: String,
    pub status: DeviceStatus,
    pub dogs_count: u32,
    pub cats_count: u32,
    /// Alerta já disparado para este registro (one-shot, nunca volta a `false`)
    pub alert_fired: bool,
}

impl DeviceRecord {
    pub fn new(
        id: impl Into<DeviceId>,
        label: impl Into<String>,
        position: GeoPosition,
        status: DeviceStatus,
        dogs_count: u32,
        cats_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            label: label.into(),
            status,
            dogs_count,
            cats_count,
            alert_fired: false,
        }
    }

    /// Soma de cães e gatos.
    pub fn total_count(&self) -> u32 {
        self.dogs_count.saturating_add(self.cats_count)
    }
}

/// Lista fixa de dispositivos criada na inicialização.
///
/// A ordem aqui é a ordem de exibição na tabela e no gráfico.
pub fn default_devices() -> Vec<DeviceRecord> {
    vec![
        DeviceRecord::new(
            "tunis",
            "Tunis",
            GeoPosition::new(36.8065, 10.1815),
            DeviceStatus::Active,
            10,
            3,
        ),
        DeviceRecord::new(
            "sfax",
            "Sfax",
            GeoPosition::new(34.7333, 10.7667),
            DeviceStatus::Inactive,
            4,
            5,
        ),
        DeviceRecord::new(
            "sousse",
            "Sousse",
            GeoPosition::new(35.8256, 10.6369),
            DeviceStatus::Active,
            7,
            2,
        ),
    ]
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_counts() {
        let d = DeviceRecord::new("a", "A", GeoPosition::default(), DeviceStatus::Active, 9, 11);
        assert_eq!(d.total_count(), 20);
        assert!(!d.alert_fired);
    }

    #[test]
    fn default_devices_are_valid_and_unique() {
        let devices = default_devices();
        assert_eq!(devices.len(), 3);
        assert!(devices.iter().all(|d| d.position.is_valid()));
        assert_eq!(devices[0].label, "Tunis");
        assert_eq!(devices[1].status, DeviceStatus::Inactive);
        assert_eq!(devices[2].total_count(), 9);
    }

    #[test]
    fn out_of_range_position_is_invalid() {
        assert!(!GeoPosition::new(91.0, 0.0).is_valid());
        assert!(!GeoPosition::new(0.0, -181.0).is_valid());
        assert!(GeoPosition::new(-90.0, 180.0).is_valid());
    }

    #[test]
    fn status_display() {
        assert_eq!(DeviceStatus::Active.to_string(), "Active");
        assert_eq!(DeviceStatus::Inactive.to_string(), "Inactive");
    }
}
