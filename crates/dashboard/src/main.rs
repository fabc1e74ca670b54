//! # FieldWatch Dashboard
//!
//! Monitoramento em tempo real de dispositivos de campo com GUI acelerada
//! por GPU via eframe/egui: mapa, tabela e gráfico sincronizados com o
//! mesmo store, mais um toast quando um dispositivo cruza o threshold.
//!
//! ## Atalhos
//! - Clique num marcador: seleciona o dispositivo
//! - `C`: Limpa a seleção
//! - `P`: Para as atualizações
//! - `T`: Alternar tema
//! - `F` / `F11`: Fullscreen
//! - `Q` / `Esc`: Sair

mod dashboard;
mod map_layer;
mod panels;
mod theme_egui;
mod toast;

use dashboard::FieldDashboard;
use fieldwatch_core::config::AppConfig;
use fieldwatch_core::engine::MonitorEngine;
use tracing::{error, warn};

fn main() -> eframe::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        let _ = config.save(&config_path);
    }
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let engine = match MonitorEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Falha ao inicializar engine: {e}");
            return Ok(());
        }
    };

    // ── Janela eframe ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("FieldWatch")
            .with_inner_size([1366.0, 768.0])
            .with_min_inner_size([1024.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FieldWatch",
        options,
        Box::new(move |cc| Ok(Box::new(FieldDashboard::new(cc, engine)))),
    )
}
