//! Engine de sincronização: compõe store, alertas, projeções, seleção e
//! scheduler, e executa um tick serializado.
//!
//! Ordem de um tick: deltas no store → avaliação de alertas → projeções →
//! sinks. Tudo roda na thread que chama [`MonitorEngine::tick`]; nenhum
//! leitor observa um registro pela metade.

use crate::alerts::{AlertDecision, AlertEvaluator, Notification};
use crate::config::AppConfig;
use crate::error::CoreError;
use crate::projection::{ChartOptions, TableRow, ViewProjector};
use crate::scheduler::UpdateScheduler;
use crate::selection::SelectionState;
use crate::sinks::{MapSink, MarkerHandle, Sinks};
use crate::store::{DeltaSource, DeviceStore, RandomDeltas};
use crate::types::{DeviceRecord, default_devices};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Resumo de um tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Número sequencial do tick (1 = primeiro)
    pub tick: u64,
    /// Registros mutados
    pub mutated: usize,
    /// Alertas disparados neste tick
    pub alerts: Vec<Notification>,
    /// Marcadores cuja atualização foi pulada
    pub skipped_markers: usize,
}

pub struct MonitorEngine {
    config: AppConfig,
    store: DeviceStore,
    deltas: Box<dyn DeltaSource>,
    evaluator: AlertEvaluator,
    projector: ViewProjector,
    selection: SelectionState,
    scheduler: UpdateScheduler,
    attached: bool,
    tick_count: u64,
    startup_relayout_at: Option<Instant>,
}

impl MonitorEngine {
    pub fn new(
        config: AppConfig,
        seed: Vec<DeviceRecord>,
        deltas: Box<dyn DeltaSource>,
    ) -> Result<Self, CoreError> {
        let mut store = DeviceStore::new();
        store.initialize(seed)?;

        Ok(Self {
            evaluator: AlertEvaluator::new(
                config.engine.alert_threshold,
                config.notifications.clone(),
            ),
            projector: ViewProjector::new(config.chart.clone()),
            scheduler: UpdateScheduler::new(config.engine.tick_interval()),
            selection: SelectionState::new(),
            store,
            deltas,
            config,
            attached: false,
            tick_count: 0,
            startup_relayout_at: None,
        })
    }

    /// Engine com a lista fixa de dispositivos e deltas aleatórios
    /// (seedados se `engine.seed` estiver configurado).
    pub fn from_config(config: AppConfig) -> Result<Self, CoreError> {
        let max = config.engine.max_delta;
        let deltas: Box<dyn DeltaSource> = match config.engine.seed {
            Some(seed) => {
                info!("Deltas simulados com seed {seed}");
                Box::new(RandomDeltas::seeded(seed, max))
            }
            None => Box::new(RandomDeltas::from_entropy(max)),
        };
        Self::new(config, default_devices(), deltas)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &DeviceStore {
        &self.store
    }

    pub fn snapshot(&self) -> &[DeviceRecord] {
        self.store.snapshot()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.projector.table_projection(self.store.snapshot())
    }

    pub fn chart(&self) -> ChartOptions {
        self.projector.chart_projection(self.store.snapshot())
    }

    // ──────────────────────────────────────────
    // Ciclo
    // ──────────────────────────────────────────

    /// Cria os marcadores e publica tabela e gráfico iniciais.
    /// Agenda o relayout único de inicialização.
    pub fn attach(&mut self, sinks: &mut Sinks<'_>, now: Instant) {
        if self.attached {
            warn!("attach() repetido ignorado");
            return;
        }
        let created = self.projector.create_markers(self.store.snapshot(), sinks.map);
        self.publish_table_and_chart(sinks);
        self.attached = true;
        self.startup_relayout_at =
            Some(now + Duration::from_millis(self.config.map.startup_relayout_delay_ms));
        info!("Sinks conectados: {created} marcadores criados");
    }

    /// Executa um tick completo e retorna o resumo.
    pub fn tick(&mut self, sinks: &mut Sinks<'_>) -> TickReport {
        self.tick_count += 1;
        let ticked = self.store.apply_simulated_tick(self.deltas.as_mut());

        let mut alerts = Vec::new();
        for t in &ticked {
            let Some(record) = self.store.record_mut(t.index) else {
                continue;
            };
            if let AlertDecision::Fire(message) = self.evaluator.evaluate(record) {
                warn!(
                    "Alerta: {} (total {} → {})",
                    record.id,
                    t.previous_total,
                    record.total_count()
                );
                let notification = self.evaluator.notification(message);
                sinks.notifier.notify(&notification);
                alerts.push(notification);
            }
        }

        let skipped = if self.attached {
            self.projector
                .refresh_markers(self.store.snapshot(), sinks.map)
                .len()
        } else {
            0
        };
        self.publish_table_and_chart(sinks);
        if !sinks.map.invalidate_size() {
            debug!("Relayout do mapa descartado: sink não pronto");
        }

        debug!(
            "Tick #{}: {} registros, {} alertas",
            self.tick_count,
            ticked.len(),
            alerts.len()
        );

        TickReport {
            tick: self.tick_count,
            mutated: ticked.len(),
            alerts,
            skipped_markers: skipped,
        }
    }

    fn publish_table_and_chart(&self, sinks: &mut Sinks<'_>) {
        let snapshot = self.store.snapshot();
        let rows = self.projector.table_projection(snapshot);
        sinks.table.render_table(self.projector.table_columns(), &rows);
        sinks.chart.render_chart(&self.projector.chart_projection(snapshot));
    }

    /// Relayout único após o atraso de inicialização. Retorna `true` se o
    /// pedido foi aceito pelo sink; um sink não pronto descarta o pedido.
    pub fn poll_relayout(&mut self, now: Instant, map: &mut dyn MapSink) -> bool {
        match self.startup_relayout_at {
            Some(at) if now >= at => {
                self.startup_relayout_at = None;
                map.invalidate_size()
            }
            _ => false,
        }
    }

    // ──────────────────────────────────────────
    // Seleção
    // ──────────────────────────────────────────

    /// Evento de clique num marcador, vindo do sink do mapa.
    pub fn on_marker_clicked(&mut self, id: &str) -> Result<(), CoreError> {
        self.selection.select(id, &self.store).inspect_err(|e| {
            warn!("Seleção ignorada: {e}");
        })
    }

    /// Mesmo evento, identificado pelo handle do marcador.
    pub fn on_marker_handle_clicked(&mut self, handle: MarkerHandle) -> Result<(), CoreError> {
        let Some(id) = self.projector.device_for(handle).cloned() else {
            self.selection.clear();
            let err = CoreError::InvalidRecordReference(format!("{handle:?}"));
            warn!("Seleção ignorada: {err}");
            return Err(err);
        };
        self.on_marker_clicked(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Registro selecionado, lido ao vivo do store.
    pub fn selected(&mut self) -> Option<&DeviceRecord> {
        self.selection.current(&self.store)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    /// Handle do marcador em foco, para o mapa destacar.
    pub fn selected_marker(&self) -> Option<MarkerHandle> {
        self.selection
            .selected_id()
            .and_then(|id| self.projector.marker_for(id))
    }

    // ──────────────────────────────────────────
    // Scheduler
    // ──────────────────────────────────────────

    pub fn start(&mut self) -> Result<(), CoreError> {
        self.scheduler.start()
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Executa um tick se uma fronteira passou (não bloqueia).
    pub fn run_due_tick(&mut self, sinks: &mut Sinks<'_>) -> Option<TickReport> {
        self.scheduler.poll().then(|| self.tick(sinks))
    }

    /// Espera a próxima fronteira e executa o tick.
    pub fn wait_and_tick(&mut self, sinks: &mut Sinks<'_>, timeout: Duration) -> Option<TickReport> {
        self.scheduler.wait(timeout).then(|| self.tick(sinks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::tests::RecordingMap;
    use crate::projection::TableColumn;
    use crate::sinks::{ChartSink, NotificationSink, TableSink};
    use crate::store::ScriptedDeltas;
    use crate::types::{DeviceStatus, GeoPosition};

    #[derive(Default)]
    struct RecordingTable {
        renders: usize,
        last: Vec<TableRow>,
    }

    impl TableSink for RecordingTable {
        fn render_table(&mut self, columns: &[TableColumn], rows: &[TableRow]) {
            assert_eq!(columns.len(), 4);
            self.renders += 1;
            self.last = rows.to_vec();
        }
    }

    #[derive(Default)]
    struct RecordingChart {
        last: Option<ChartOptions>,
    }

    impl ChartSink for RecordingChart {
        fn render_chart(&mut self, options: &ChartOptions) {
            self.last = Some(options.clone());
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Vec<String>,
    }

    impl NotificationSink for RecordingNotifier {
        fn notify(&mut self, notification: &Notification) {
            self.messages.push(notification.message.clone());
        }
    }

    #[derive(Default)]
    struct TestSinks {
        map: RecordingMap,
        table: RecordingTable,
        chart: RecordingChart,
        notifier: RecordingNotifier,
    }

    impl TestSinks {
        fn sinks(&mut self) -> Sinks<'_> {
            Sinks {
                map: &mut self.map,
                table: &mut self.table,
                chart: &mut self.chart,
                notifier: &mut self.notifier,
            }
        }
    }

    fn single(dogs: u32, cats: u32, deltas: ScriptedDeltas) -> MonitorEngine {
        let seed = vec![DeviceRecord::new(
            "A",
            "A",
            GeoPosition::new(36.0, 10.0),
            DeviceStatus::Active,
            dogs,
            cats,
        )];
        MonitorEngine::new(AppConfig::default(), seed, Box::new(deltas)).unwrap()
    }

    fn seeded_engine(seed: u64) -> MonitorEngine {
        let mut config = AppConfig::default();
        config.engine.seed = Some(seed);
        MonitorEngine::from_config(config).unwrap()
    }

    #[test]
    fn threshold_scenario() {
        let mut engine = single(9, 9, ScriptedDeltas::new([1, 1, 0, 0]));
        let mut sinks = TestSinks::default();
        engine.attach(&mut sinks.sinks(), Instant::now());

        let first = engine.tick(&mut sinks.sinks());
        assert_eq!(first.alerts.len(), 1);
        assert_eq!(first.alerts[0].message, "High Animal Alert: A has 20 animals!");
        assert!(engine.store().get("A").unwrap().alert_fired);
        assert_eq!(engine.chart().series.data, [20]);
        assert_eq!(engine.table_rows()[0].dogs_count, 10);

        let second = engine.tick(&mut sinks.sinks());
        assert!(second.alerts.is_empty());
        assert_eq!(engine.store().get("A").unwrap().total_count(), 20);
        assert_eq!(sinks.notifier.messages.len(), 1);
    }

    #[test]
    fn alert_fires_once_over_many_ticks() {
        let mut engine = seeded_engine(3);
        let mut sinks = TestSinks::default();
        engine.attach(&mut sinks.sinks(), Instant::now());

        let mut fired = 0;
        for _ in 0..100 {
            fired += engine.tick(&mut sinks.sinks()).alerts.len();
        }
        // Todos cruzam 20 em 100 ticks (a menos que o rng só gere zeros)
        let crossed = engine.snapshot().iter().filter(|r| r.total_count() >= 20).count();
        assert_eq!(fired, crossed);
        assert!(engine.snapshot().iter().all(|r| r.alert_fired == (r.total_count() >= 20)));
    }

    #[test]
    fn order_preserved_across_ticks() {
        let mut engine = seeded_engine(11);
        let mut sinks = TestSinks::default();
        engine.attach(&mut sinks.sinks(), Instant::now());

        for _ in 0..10 {
            engine.tick(&mut sinks.sinks());
            let labels: Vec<&str> = sinks.table.last.iter().map(|r| r.label.as_str()).collect();
            assert_eq!(labels, ["Tunis", "Sfax", "Sousse"]);
            let chart = sinks.chart.last.as_ref().unwrap();
            assert_eq!(chart.categories, ["Tunis", "Sfax", "Sousse"]);
            let totals: Vec<u32> = engine.snapshot().iter().map(|r| r.total_count()).collect();
            assert_eq!(chart.series.data, totals);
        }
        assert_eq!(sinks.table.renders, 11);
    }

    #[test]
    fn markers_survive_ticks() {
        let mut engine = seeded_engine(5);
        let mut sinks = TestSinks::default();
        engine.attach(&mut sinks.sinks(), Instant::now());
        engine.attach(&mut sinks.sinks(), Instant::now());

        for _ in 0..5 {
            assert_eq!(engine.tick(&mut sinks.sinks()).skipped_markers, 0);
        }
        assert_eq!(sinks.map.markers.len(), 3);
        assert_eq!(sinks.map.updates, 15);
        let tunis = engine.store().get("tunis").unwrap();
        assert!(sinks.map.markers[0].1.contains(&format!("Dogs: {}", tunis.dogs_count)));
    }

    #[test]
    fn selection_is_live() {
        let mut engine = single(1, 1, ScriptedDeltas::new([2; 20]));
        let mut sinks = TestSinks::default();
        engine.attach(&mut sinks.sinks(), Instant::now());

        let handle = MarkerHandle(0);
        engine.on_marker_handle_clicked(handle).unwrap();
        assert_eq!(engine.selected_marker(), Some(handle));
        for _ in 0..4 {
            engine.tick(&mut sinks.sinks());
        }
        let selected = engine.selected().unwrap();
        assert_eq!((selected.dogs_count, selected.cats_count), (9, 9));
    }

    #[test]
    fn unknown_marker_click_is_recovered() {
        let mut engine = single(0, 0, ScriptedDeltas::default());
        engine.on_marker_clicked("A").unwrap();
        assert!(engine.on_marker_clicked("Z").is_err());
        assert!(engine.selected().is_none());
        assert!(engine.on_marker_handle_clicked(MarkerHandle(42)).is_err());
    }

    #[test]
    fn startup_relayout_runs_once_after_delay() {
        let mut engine = single(0, 0, ScriptedDeltas::default());
        let mut sinks = TestSinks::default();
        sinks.map.ready = true;
        let t0 = Instant::now();
        engine.attach(&mut sinks.sinks(), t0);

        assert!(!engine.poll_relayout(t0, &mut sinks.map));
        assert!(engine.poll_relayout(t0 + Duration::from_millis(300), &mut sinks.map));
        assert!(!engine.poll_relayout(t0 + Duration::from_secs(5), &mut sinks.map));
        assert_eq!(sinks.map.invalidations, 1);
    }

    #[test]
    fn relayout_dropped_when_map_not_ready() {
        let mut engine = single(0, 0, ScriptedDeltas::default());
        let mut sinks = TestSinks::default();
        let t0 = Instant::now();
        engine.attach(&mut sinks.sinks(), t0);
        assert!(!engine.poll_relayout(t0 + Duration::from_secs(1), &mut sinks.map));
        engine.tick(&mut sinks.sinks());
        assert_eq!(sinks.map.invalidations, 0);
    }

    #[test]
    fn stopped_scheduler_never_mutates() {
        let mut config = AppConfig::default();
        config.engine.tick_interval_ms = 5;
        let mut engine = MonitorEngine::new(
            config,
            default_devices(),
            Box::new(ScriptedDeltas::new([1; 1000])),
        )
        .unwrap();
        let mut sinks = TestSinks::default();

        engine.stop();
        engine.stop();
        assert!(engine.run_due_tick(&mut sinks.sinks()).is_none());

        engine.start().unwrap();
        assert!(engine.start().is_err());
        assert!(engine.wait_and_tick(&mut sinks.sinks(), Duration::from_secs(2)).is_some());

        engine.stop();
        let before = engine.snapshot().to_vec();
        std::thread::sleep(Duration::from_millis(20));
        assert!(engine.run_due_tick(&mut sinks.sinks()).is_none());
        assert!(engine.wait_and_tick(&mut sinks.sinks(), Duration::from_millis(20)).is_none());
        assert_eq!(engine.snapshot(), &before[..]);
    }
}
