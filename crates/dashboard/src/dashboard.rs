//! Dashboard principal – App eframe/egui.
//!
//! O engine roda na thread da UI: a cada frame o scheduler é consultado e,
//! se uma fronteira passou, um tick completo é executado antes de desenhar.

use crate::map_layer::MapLayer;
use crate::panels::{self, ChartView, TableView};
use crate::theme_egui::{self, EguiTheme};
use crate::toast::ToastLayer;
use egui::RichText;
use fieldwatch_core::config::AppConfig;
use fieldwatch_core::engine::MonitorEngine;
use fieldwatch_core::sinks::Sinks;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MAP_HEIGHT: f32 = 380.0;
const CHART_HEIGHT: f32 = 200.0;

/// Sinks desenhados pela UI.
struct Views {
    map: MapLayer,
    table: TableView,
    chart: ChartView,
    toast: ToastLayer,
}

impl Views {
    fn sinks(&mut self) -> Sinks<'_> {
        Sinks {
            map: &mut self.map,
            table: &mut self.table,
            chart: &mut self.chart,
            notifier: &mut self.toast,
        }
    }
}

/// Estado do dashboard.
pub struct FieldDashboard {
    engine: MonitorEngine,
    views: Views,
    theme: EguiTheme,
    theme_index: usize,
    all_themes: Vec<EguiTheme>,
    alerts_seen: usize,
    is_fullscreen: bool,
}

impl FieldDashboard {
    pub fn new(_cc: &eframe::CreationContext<'_>, mut engine: MonitorEngine) -> Self {
        let config: &AppConfig = engine.config();

        let all_themes = theme_egui::all_themes();
        let theme_index = all_themes
            .iter()
            .position(|t| t.name == config.dashboard.theme)
            .unwrap_or(0);
        let theme = all_themes[theme_index].clone();

        let mut views = Views {
            map: MapLayer::new(&config.map),
            table: TableView::default(),
            chart: ChartView::default(),
            toast: ToastLayer::default(),
        };

        engine.attach(&mut views.sinks(), Instant::now());
        if let Err(e) = engine.start() {
            warn!("{e}");
        }

        Self {
            engine,
            views,
            theme,
            theme_index,
            all_themes,
            alerts_seen: 0,
            is_fullscreen: false,
        }
    }

    /// Roda o tick pendente, se houver, e o relayout de inicialização.
    fn drive_engine(&mut self) {
        if let Some(report) = self.engine.run_due_tick(&mut self.views.sinks()) {
            self.alerts_seen += report.alerts.len();
        }
        self.engine.poll_relayout(Instant::now(), &mut self.views.map);
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui: &mut egui::Ui| {
            ui.label(
                RichText::new("FIELDWATCH")
                    .color(self.theme.title)
                    .size(20.0)
                    .strong()
                    .monospace(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut egui::Ui| {
                let status = if self.engine.is_running() {
                    RichText::new(format!(
                        "● ao vivo | tick #{} | {} alertas",
                        self.engine.tick_count(),
                        self.alerts_seen
                    ))
                    .color(self.theme.active)
                } else {
                    RichText::new("○ parado").color(self.theme.alert)
                };
                ui.label(status.monospace());
            });
        });
    }
}

impl eframe::App for FieldDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive_engine();

        // ── Repaint periódico para consultar o scheduler e expirar toasts ──
        ctx.request_repaint_after(Duration::from_millis(100));

        // ── Configurar estilo visual baseado no tema ──
        let mut visuals = if self.theme.name == "light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.theme.bg;
        visuals.window_fill = self.theme.panel;
        visuals.extreme_bg_color = self.theme.map_bg;
        visuals.override_text_color = Some(self.theme.text);
        ctx.set_visuals(visuals);

        // ── Atalhos de teclado ──
        let (next_theme, clear, stop, quit, fullscreen) = ctx.input(|i: &egui::InputState| {
            (
                i.key_pressed(egui::Key::T),
                i.key_pressed(egui::Key::C),
                i.key_pressed(egui::Key::P),
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F) || i.key_pressed(egui::Key::F11),
            )
        });
        if next_theme {
            self.theme_index = (self.theme_index + 1) % self.all_themes.len();
            self.theme = self.all_themes[self.theme_index].clone();
            info!("Tema: {}", self.theme.name);
        }
        if clear {
            self.engine.clear_selection();
        }
        if stop {
            // Parar é definitivo: o scheduler não reinicia
            self.engine.stop();
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if fullscreen {
            self.is_fullscreen = !self.is_fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
        }

        // ── Barra superior ──
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui: &mut egui::Ui| {
            self.render_header(ui);
        });

        // ── Help bar ──
        egui::TopBottomPanel::bottom("help").show(ctx, |ui: &mut egui::Ui| {
            ui.vertical_centered(|ui: &mut egui::Ui| {
                ui.label(
                    RichText::new("[Click] Selecionar | [C] Limpar | [P] Parar | [T] Tema | [F] Fullscreen | [Q/Esc] Sair")
                        .color(self.theme.dim)
                        .monospace()
                        .size(10.0),
                );
            });
        });

        // ── Painel lateral: dispositivo selecionado ──
        let threshold = self.engine.config().engine.alert_threshold;
        let selected = self.engine.selected().cloned();
        egui::SidePanel::right("detail")
            .min_width(220.0)
            .show(ctx, |ui: &mut egui::Ui| {
                panels::render_detail(ui, selected.as_ref(), &self.theme, threshold);
            });

        // ── Painel central: mapa, tabela e gráfico ──
        let selected_marker = self.engine.selected_marker();
        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui: &mut egui::Ui| {
            clicked = self
                .views
                .map
                .show(ui, &self.theme, selected_marker, MAP_HEIGHT);

            ui.add_space(8.0);
            ui.columns(2, |cols| {
                self.views
                    .table
                    .show(&mut cols[0], &self.theme, selected.as_ref().map(|d| d.id.as_str()));
                self.views.chart.show(&mut cols[1], &self.theme, CHART_HEIGHT);
            });
        });

        if let Some(handle) = clicked {
            // Erro já foi logado pelo engine; seleção limpa
            let _ = self.engine.on_marker_handle_clicked(handle);
        }

        // ── Toast de alerta ──
        self.views.toast.show(ctx, &self.theme);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.engine.stop();
    }
}
