//! # FieldWatch Core
//!
//! Crate compartilhada com o modelo de dados, o store canônico, o ciclo
//! de atualização simulado, os alertas e as projeções consumidas pelos
//! front-ends (dashboard egui e runner headless).
//!
//! ## Módulos
//! - [`types`] – Dispositivos de campo e lista inicial
//! - [`store`] – Store canônico e deltas simulados
//! - [`scheduler`] – Timer de ticks com start/stop
//! - [`alerts`] – Alerta edge-triggered por threshold
//! - [`projection`] – Marcadores, tabela e gráfico
//! - [`selection`] – Dispositivo em foco
//! - [`sinks`] – Traits dos sinks de renderização
//! - [`engine`] – Composição e tick serializado
//! - [`config`] – Configuração unificada via TOML
//! - [`theme`] – Temas de cores

pub mod types;
pub mod error;
pub mod store;
pub mod scheduler;
pub mod alerts;
pub mod projection;
pub mod selection;
pub mod sinks;
pub mod engine;
pub mod config;
pub mod theme;

// Re-exports convenientes
pub use types::{DeviceRecord, DeviceStatus, GeoPosition};
pub use error::CoreError;
pub use engine::{MonitorEngine, TickReport};
pub use config::AppConfig;
pub use sinks::{ChartSink, MapSink, MarkerHandle, NotificationSink, Sinks, TableSink};
