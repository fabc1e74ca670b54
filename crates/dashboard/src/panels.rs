//! Painéis de tabela, gráfico e detalhes renderizados com egui.
//!
//! [`TableView`] e [`ChartView`] são os sinks: guardam a última projeção
//! recebida do engine e a desenham a cada frame.

use crate::theme_egui::{EguiTheme, hex_color};
use egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot, uniform_grid_spacer};
use fieldwatch_core::projection::{AxisKind, ChartOptions, TableColumn, TableRow};
use fieldwatch_core::sinks::{ChartSink, TableSink};
use fieldwatch_core::types::DeviceRecord;
use std::ops::RangeInclusive;

// ──────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────

fn metric_row(ui: &mut Ui, label: &str, value: String, color: Color32, dim: Color32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{label}:")).color(dim).monospace());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new(value).color(color).monospace().strong());
        });
    });
}

pub fn panel_frame(
    ui: &mut Ui,
    title: &str,
    accent: Color32,
    theme: &EguiTheme,
    add_body: impl FnOnce(&mut Ui),
) {
    egui::Frame::new()
        .fill(theme.panel)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new(title)
                    .color(accent)
                    .strong()
                    .monospace()
                    .size(13.0),
            );
            ui.add_space(4.0);
            add_body(ui);
        });
}

// ──────────────────────────────────────────
// Tabela
// ──────────────────────────────────────────

#[derive(Default)]
pub struct TableView {
    columns: Vec<TableColumn>,
    rows: Vec<TableRow>,
}

impl TableSink for TableView {
    fn render_table(&mut self, columns: &[TableColumn], rows: &[TableRow]) {
        self.columns = columns.to_vec();
        self.rows = rows.to_vec();
    }
}

impl TableView {
    pub fn show(&self, ui: &mut Ui, theme: &EguiTheme, selected: Option<&str>) {
        panel_frame(ui, "Devices", theme.title, theme, |ui: &mut Ui| {
            egui::Grid::new("device_table")
                .striped(true)
                .min_col_width(70.0)
                .show(ui, |ui: &mut Ui| {
                    for col in &self.columns {
                        ui.label(RichText::new(col.title).color(theme.dim).monospace().strong());
                    }
                    ui.end_row();

                    for row in &self.rows {
                        let highlight = selected == Some(row.id.as_str());
                        for col in &self.columns {
                            let color = match col.key {
                                "status" => theme.status_color(row.status),
                                _ if highlight => theme.marker_selected,
                                _ => theme.text,
                            };
                            ui.label(RichText::new(row.cell(col.key)).color(color).monospace());
                        }
                        ui.end_row();
                    }
                });
        });
    }
}

// ──────────────────────────────────────────
// Gráfico
// ──────────────────────────────────────────

#[derive(Default)]
pub struct ChartView {
    options: Option<ChartOptions>,
}

impl ChartSink for ChartView {
    fn render_chart(&mut self, options: &ChartOptions) {
        self.options = Some(options.clone());
    }
}

/// Rótulo do eixo de categorias: só marcas inteiras têm nome.
fn category_label(categories: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

impl ChartView {
    pub fn show(&self, ui: &mut Ui, theme: &EguiTheme, height: f32) {
        let Some(options) = &self.options else {
            return;
        };
        panel_frame(ui, &options.series.name, theme.title, theme, |ui: &mut Ui| {
            let color = hex_color(&options.series.color);
            let bars: Vec<Bar> = options
                .series
                .data
                .iter()
                .zip(&options.categories)
                .enumerate()
                .map(|(i, (&value, label))| Bar::new(i as f64, f64::from(value)).name(label).width(0.6))
                .collect();
            let chart = BarChart::new(bars).name(&options.series.name).color(color);

            let mut plot = Plot::new("total_chart")
                .height(height)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .include_y(0.0)
                .show_grid(false);

            if options.x_axis.kind == AxisKind::Category {
                let categories = options.categories.clone();
                plot = plot
                    .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
                    .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                        category_label(&categories, mark.value)
                    });
            }

            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
        });
    }
}

// ──────────────────────────────────────────
// Detalhes
// ──────────────────────────────────────────

/// Painel lateral do dispositivo selecionado.
pub fn render_detail(ui: &mut Ui, device: Option<&DeviceRecord>, theme: &EguiTheme, threshold: u32) {
    panel_frame(ui, "Selected device", theme.title, theme, |ui: &mut Ui| {
        let Some(d) = device else {
            ui.label(
                RichText::new("Clique num marcador do mapa")
                    .color(theme.dim)
                    .monospace(),
            );
            return;
        };

        ui.label(RichText::new(&d.label).color(theme.marker_selected).strong().size(16.0));
        ui.add_space(4.0);
        metric_row(ui, "Status", d.status.to_string(), theme.status_color(d.status), theme.dim);
        metric_row(ui, "Dogs", d.dogs_count.to_string(), theme.text, theme.dim);
        metric_row(ui, "Cats", d.cats_count.to_string(), theme.text, theme.dim);
        let total_color = if d.total_count() >= threshold {
            theme.alert
        } else {
            theme.text
        };
        metric_row(ui, "Total", d.total_count().to_string(), total_color, theme.dim);
        metric_row(
            ui,
            "Posição",
            format!("{:.4}, {:.4}", d.position.lat, d.position.lng),
            theme.dim,
            theme.dim,
        );
        if d.alert_fired {
            ui.label(RichText::new("⚠ alerta disparado").color(theme.alert).monospace());
        }
    });
}
