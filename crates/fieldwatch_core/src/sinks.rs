//! Sinks de renderização consumidos pelo engine.
//!
//! O núcleo não sabe desenhar nada: mapa, tabela, gráfico e toast são
//! implementados pelos front-ends (dashboard egui, console headless).

use crate::alerts::Notification;
use crate::projection::{ChartOptions, TableColumn, TableRow};
use crate::types::GeoPosition;

/// Handle opaco de um marcador, criado e possuído pelo sink do mapa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Camada de mapa.
pub trait MapSink {
    /// Cria um marcador. Chamado uma vez por dispositivo.
    fn add_marker(&mut self, position: GeoPosition, popup: &str) -> MarkerHandle;

    /// Substitui o conteúdo do popup preservando o marcador.
    /// Retorna `false` se o handle não é conhecido pelo sink.
    fn set_popup_content(&mut self, handle: MarkerHandle, popup: &str) -> bool;

    /// Pede recálculo de layout. Retorna `false` se o sink ainda não está
    /// pronto; o pedido é descartado.
    fn invalidate_size(&mut self) -> bool;
}

/// Tabela de dispositivos.
pub trait TableSink {
    fn render_table(&mut self, columns: &[TableColumn], rows: &[TableRow]);
}

/// Gráfico agregado, regenerado por inteiro a cada tick.
pub trait ChartSink {
    fn render_chart(&mut self, options: &ChartOptions);
}

/// Widget de notificação (fire-and-forget).
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

/// Conjunto de sinks entregue ao engine a cada tick.
pub struct Sinks<'a> {
    pub map: &'a mut dyn MapSink,
    pub table: &'a mut dyn TableSink,
    pub chart: &'a mut dyn ChartSink,
    pub notifier: &'a mut dyn NotificationSink,
}
