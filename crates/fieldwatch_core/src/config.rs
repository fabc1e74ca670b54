//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. Todas as seções usam
//! `#[serde(default)]`, então arquivos parciais funcionam.

use crate::alerts::DEFAULT_ALERT_THRESHOLD;
use crate::error::CoreError;
use crate::store::DEFAULT_MAX_DELTA;
use crate::theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Parâmetros do ciclo de atualização.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Período entre ticks (ms)
    pub tick_interval_ms: u64,
    /// Total de animais que dispara o alerta
    pub alert_threshold: u32,
    /// Incremento máximo por contagem e por tick
    pub max_delta: u32,
    /// Seed do gerador (ausente = entropia do sistema)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            max_delta: DEFAULT_MAX_DELTA,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Posição horizontal do toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    Left,
    Center,
    Right,
}

/// Posição vertical do toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    Top,
    Bottom,
}

/// Configuração das notificações de alerta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub duration_ms: u64,
    pub dismiss_label: String,
    pub horizontal: HorizontalPosition,
    pub vertical: VerticalPosition,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            dismiss_label: "Close".into(),
            horizontal: HorizontalPosition::Right,
            vertical: VerticalPosition::Top,
        }
    }
}

/// Vista inicial do mapa.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    /// Atraso do primeiro relayout após a inicialização (ms)
    pub startup_relayout_delay_ms: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 35.8,
            center_lng: 10.0,
            zoom: 7,
            startup_relayout_delay_ms: 300,
        }
    }
}

impl MapConfig {
    /// Meia-largura aproximada da vista (graus) para o nível de zoom,
    /// como num mapa de tiles 256px com viewport de ~1000px.
    pub fn half_span_degrees(&self) -> f64 {
        let world_px = 256.0 * f64::from(1u32 << self.zoom.min(19));
        360.0 * 500.0 / world_px
    }
}

/// Aparência do gráfico agregado.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub series_name: String,
    pub series_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            series_name: "Total Animals".into(),
            series_color: "#42a5f5".into(),
        }
    }
}

/// Configuração da janela do dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Tema: "dark", "light", "high_contrast"
    pub theme: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub notifications: NotificationConfig,
    pub map: MapConfig,
    pub chart: ChartConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML; cai no padrão em caso de erro.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    info!("Configuração carregada de {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Lê e parseia o arquivo, sem fallback.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("Erro ao ler {}: {e}", path.display())))?;
        toml::from_str::<AppConfig>(&content)
            .map_err(|e| CoreError::Config(format!("Erro ao parsear {}: {e}", path.display())))
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| CoreError::Config(e.to_string()))?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.engine.tick_interval_ms < 100 || self.engine.tick_interval_ms > 60_000 {
            errors.push(format!(
                "Intervalo de tick inválido: {} ms (100–60000)",
                self.engine.tick_interval_ms
            ));
        }
        if self.engine.alert_threshold == 0 {
            errors.push("Threshold de alerta não pode ser 0".into());
        }
        if self.notifications.duration_ms == 0 {
            errors.push("Duração da notificação não pode ser 0".into());
        }
        if !(-90.0..=90.0).contains(&self.map.center_lat)
            || !(-180.0..=180.0).contains(&self.map.center_lng)
        {
            errors.push(format!(
                "Centro do mapa fora da faixa: ({}, {})",
                self.map.center_lat, self.map.center_lng
            ));
        }
        if self.map.zoom > 19 {
            errors.push(format!("Zoom inválido: {} (0–19)", self.map.zoom));
        }
        if !theme::is_valid_hex(&self.chart.series_color) {
            errors.push(format!(
                "Cor da série inválida: {} (esperado #RRGGBB)",
                self.chart.series_color
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn defaults_match_reference_behavior() {
        let config = AppConfig::default();
        assert_eq!(config.engine.tick_interval(), Duration::from_millis(3000));
        assert_eq!(config.engine.alert_threshold, 20);
        assert_eq!(config.engine.max_delta, 2);
        assert_eq!(config.notifications.duration_ms, 5000);
        assert_eq!(config.chart.series_color, "#42a5f5");
    }

    #[test]
    fn roundtrip_toml() {
        let mut config = AppConfig::default();
        config.engine.seed = Some(99);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine.seed, Some(99));
        assert_eq!(config.dashboard.theme, parsed.dashboard.theme);
        assert_eq!(parsed.notifications.horizontal, HorizontalPosition::Right);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[engine]
tick_interval_ms = 500

[notifications]
vertical = "bottom"
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.engine.tick_interval_ms, 500);
        // Outros campos devem ter valor padrão
        assert_eq!(config.engine.alert_threshold, 20);
        assert_eq!(config.notifications.vertical, VerticalPosition::Bottom);
        assert_eq!(config.notifications.dismiss_label, "Close");
        assert_eq!(config.map.zoom, 7);
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = AppConfig::default();
        config.engine.tick_interval_ms = 10;
        config.chart.series_color = "azul".into();
        config.map.center_lat = 100.0;
        assert_eq!(config.validate().len(), 3);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = AppConfig::load(Path::new("/nonexistent/fieldwatch/config.toml"));
        assert_eq!(config.engine.tick_interval_ms, 3000);
    }

    #[test]
    fn half_span_shrinks_with_zoom() {
        let mut map = MapConfig::default();
        let at_7 = map.half_span_degrees();
        map.zoom = 8;
        assert!((map.half_span_degrees() * 2.0 - at_7).abs() < 1e-9);
    }
}
