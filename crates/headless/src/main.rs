//! # FieldWatch Headless
//!
//! Roda o mesmo engine do dashboard sem janela: cada tick atualiza o
//! store, dispara alertas e imprime tabela e gráfico no log.
//!
//! ## Uso
//! ```bash
//! fieldwatch_headless                # Roda até Ctrl+C
//! fieldwatch_headless --ticks 10     # Para após 10 ticks
//! RUST_LOG=debug fieldwatch_headless # Inclui atualizações de marcadores
//! ```

mod console;

use console::{ConsoleChart, ConsoleMap, ConsoleNotifier, ConsoleTable};
use fieldwatch_core::config::AppConfig;
use fieldwatch_core::engine::MonitorEngine;
use fieldwatch_core::sinks::Sinks;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let max_ticks = parse_max_ticks(std::env::args().skip(1));

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }
    for problem in config.validate() {
        warn!("Config: {problem}");
    }

    let period = config.engine.tick_interval();
    let mut engine = match MonitorEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Falha ao inicializar engine: {e}");
            return;
        }
    };

    let mut map = ConsoleMap::default();
    let mut table = ConsoleTable;
    let mut chart = ConsoleChart;
    let mut notifier = ConsoleNotifier::default();
    let mut sinks = Sinks {
        map: &mut map,
        table: &mut table,
        chart: &mut chart,
        notifier: &mut notifier,
    };

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   FIELDWATCH HEADLESS – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Dispositivos: {}", engine.snapshot().len());
    println!("  Intervalo:    {} ms", period.as_millis());
    println!("  Threshold:    {}", engine.config().engine.alert_threshold);
    match max_ticks {
        Some(n) => println!("  Ticks:        {n}"),
        None => println!("  Ticks:        ∞"),
    }
    println!("══════════════════════════════════════════════");
    println!();

    engine.attach(&mut sinks, Instant::now());
    if let Err(e) = engine.start() {
        warn!("{e}");
    }

    // ── Loop principal ──
    while engine.is_running() {
        engine.poll_relayout(Instant::now(), sinks.map);

        let Some(report) = engine.wait_and_tick(&mut sinks, period + Duration::from_millis(500))
        else {
            continue;
        };
        info!(
            "Tick #{} | {} dispositivos | {} alertas",
            report.tick,
            report.mutated,
            report.alerts.len()
        );

        if max_ticks.is_some_and(|n| report.tick >= n) {
            engine.stop();
        }
    }

    info!(
        "Encerrado após {} ticks, {} alertas exibidos",
        engine.tick_count(),
        notifier.shown
    );
}

/// `--ticks N` limita a execução; ausente ou inválido = sem limite.
fn parse_max_ticks(args: impl Iterator<Item = String>) -> Option<u64> {
    let args: Vec<String> = args.collect();
    args.windows(2)
        .find(|w| w[0] == "--ticks")
        .and_then(|w| w[1].parse().ok())
}
