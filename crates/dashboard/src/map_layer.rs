//! Camada de mapa: marcadores num plano lon/lat desenhado com egui_plot.
//!
//! Os marcadores vivem aqui e são endereçados pelo índice ([`MarkerHandle`]).
//! O engine nunca recria marcadores, só troca o conteúdo do popup, então
//! um popup aberto continua aberto entre ticks.

use crate::theme_egui::EguiTheme;
use egui::{Align2, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, Points, Text};
use fieldwatch_core::config::MapConfig;
use fieldwatch_core::sinks::{MapSink, MarkerHandle};
use fieldwatch_core::types::GeoPosition;

/// Distância máxima (px) entre o clique e o marcador.
const CLICK_RADIUS_PX: f32 = 16.0;

struct MapMarker {
    position: GeoPosition,
    popup: String,
}

pub struct MapLayer {
    markers: Vec<MapMarker>,
    open_popup: Option<MarkerHandle>,
    ready: bool,
    relayout_requested: bool,
    center: GeoPosition,
    half_span: f64,
}

impl MapLayer {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            markers: Vec::new(),
            open_popup: None,
            ready: false,
            relayout_requested: false,
            center: GeoPosition::new(config.center_lat, config.center_lng),
            half_span: config.half_span_degrees(),
        }
    }

    /// Marcador mais próximo do ponto clicado, dentro do raio.
    fn hit_test(&self, pointer: egui::Pos2, to_screen: impl Fn(GeoPosition) -> egui::Pos2) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .enumerate()
            .map(|(i, m)| (i, to_screen(m.position).distance(pointer)))
            .filter(|&(_, d)| d <= CLICK_RADIUS_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| MarkerHandle(i as u64))
    }

    /// Desenha o mapa. Retorna o marcador clicado neste frame.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        theme: &EguiTheme,
        selected: Option<MarkerHandle>,
        height: f32,
    ) -> Option<MarkerHandle> {
        if std::mem::take(&mut self.relayout_requested) {
            ui.ctx().request_repaint();
        }

        let plot = Plot::new("field_map")
            .height(height)
            .data_aspect(1.0)
            .include_x(self.center.lng - self.half_span)
            .include_x(self.center.lng + self.half_span)
            .include_y(self.center.lat - self.half_span / 2.0)
            .include_y(self.center.lat + self.half_span / 2.0)
            .show_grid(true)
            .allow_double_click_reset(true)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude");

        let open_popup = self.open_popup;
        let response = plot.show(ui, |plot_ui| {
            for (i, marker) in self.markers.iter().enumerate() {
                let handle = MarkerHandle(i as u64);
                let color = if selected == Some(handle) {
                    theme.marker_selected
                } else {
                    theme.marker
                };
                let point = [marker.position.lng, marker.position.lat];
                let title = marker.popup.lines().next().unwrap_or_default().to_string();

                plot_ui.points(
                    Points::new(vec![point])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(8.0)
                        .color(color)
                        .name(&title),
                );

                if open_popup == Some(handle) {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(point[0], point[1]),
                            RichText::new(&marker.popup)
                                .monospace()
                                .color(theme.text)
                                .background_color(theme.panel),
                        )
                        .anchor(Align2::CENTER_BOTTOM),
                    );
                } else {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(point[0], point[1]),
                            RichText::new(title).color(theme.dim).size(11.0),
                        )
                        .anchor(Align2::LEFT_BOTTOM),
                    );
                }
            }
        });

        self.ready = true;

        if !response.response.clicked() {
            return None;
        }
        let pointer = response.response.interact_pointer_pos()?;
        let transform = response.transform;
        let hit = self.hit_test(pointer, |p| {
            transform.position_from_point(&PlotPoint::new(p.lng, p.lat))
        });
        // Clique fora dos marcadores fecha o popup
        self.open_popup = hit;
        hit
    }

    #[cfg(test)]
    fn popup(&self, handle: MarkerHandle) -> Option<&str> {
        self.markers.get(handle.0 as usize).map(|m| m.popup.as_str())
    }
}

impl MapSink for MapLayer {
    fn add_marker(&mut self, position: GeoPosition, popup: &str) -> MarkerHandle {
        self.markers.push(MapMarker {
            position,
            popup: popup.to_string(),
        });
        MarkerHandle(self.markers.len() as u64 - 1)
    }

    fn set_popup_content(&mut self, handle: MarkerHandle, popup: &str) -> bool {
        match self.markers.get_mut(handle.0 as usize) {
            Some(marker) => {
                marker.popup = popup.to_string();
                true
            }
            None => false,
        }
    }

    fn invalidate_size(&mut self) -> bool {
        // Antes do primeiro frame não há layout para recalcular
        if !self.ready {
            return false;
        }
        self.relayout_requested = true;
        true
    }
}
