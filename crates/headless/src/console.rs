//! Sinks de console: cada projeção vira linhas de log.

use fieldwatch_core::alerts::Notification;
use fieldwatch_core::projection::{ChartOptions, TableColumn, TableRow};
use fieldwatch_core::sinks::{ChartSink, MapSink, MarkerHandle, NotificationSink, TableSink};
use fieldwatch_core::types::GeoPosition;
use tracing::{debug, info, warn};

/// "Mapa" em memória: guarda posição e popup de cada marcador.
#[derive(Default)]
pub struct ConsoleMap {
    markers: Vec<(GeoPosition, String)>,
}

impl MapSink for ConsoleMap {
    fn add_marker(&mut self, position: GeoPosition, popup: &str) -> MarkerHandle {
        self.markers.push((position, popup.to_string()));
        let handle = MarkerHandle(self.markers.len() as u64 - 1);
        info!(
            "Marcador {} em ({:.4}, {:.4}): {}",
            handle.0,
            position.lat,
            position.lng,
            popup.replace('\n', " | ")
        );
        handle
    }

    fn set_popup_content(&mut self, handle: MarkerHandle, popup: &str) -> bool {
        match self.markers.get_mut(handle.0 as usize) {
            Some(marker) => {
                marker.1 = popup.to_string();
                debug!("Marcador {} → {}", handle.0, popup.replace('\n', " | "));
                true
            }
            None => false,
        }
    }

    fn invalidate_size(&mut self) -> bool {
        // Console não tem layout
        true
    }
}

/// Tabela impressa com colunas alinhadas.
#[derive(Default)]
pub struct ConsoleTable;

impl TableSink for ConsoleTable {
    fn render_table(&mut self, columns: &[TableColumn], rows: &[TableRow]) {
        let header: Vec<String> = columns.iter().map(|c| format!("{:<10}", c.title)).collect();
        info!("{}", header.join(" "));
        for row in rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| format!("{:<10}", row.cell(c.key)))
                .collect();
            info!("{}", cells.join(" "));
        }
    }
}

/// Gráfico de barras em texto.
#[derive(Default)]
pub struct ConsoleChart;

impl ConsoleChart {
    pub fn bars(options: &ChartOptions) -> Vec<String> {
        options
            .categories
            .iter()
            .zip(&options.series.data)
            .map(|(label, &value)| format!("{label:<8} {} {value}", "█".repeat(value as usize)))
            .collect()
    }
}

impl ChartSink for ConsoleChart {
    fn render_chart(&mut self, options: &ChartOptions) {
        info!("── {} ──", options.series.name);
        for bar in Self::bars(options) {
            info!("{bar}");
        }
    }
}

#[derive(Default)]
pub struct ConsoleNotifier {
    pub shown: usize,
}

impl NotificationSink for ConsoleNotifier {
    fn notify(&mut self, notification: &Notification) {
        self.shown += 1;
        warn!(
            "⚠ {} [{}] ({} ms)",
            notification.message, notification.dismiss_label, notification.options.duration_ms
        );
    }
}
