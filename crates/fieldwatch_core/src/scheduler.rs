//! Scheduler de ticks com período fixo.
//!
//! Não há thread de trabalho: o timer é um `crossbeam_channel::tick` que a
//! thread do engine consulta (`poll` no loop da UI, `wait` no headless). O
//! canal tem capacidade 1, então fronteiras perdidas enquanto um tick roda
//! são descartadas em vez de enfileiradas, e dois ticks nunca se sobrepõem.

use crate::error::CoreError;
use crossbeam_channel::{Receiver, tick};
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct UpdateScheduler {
    period: Duration,
    state: SchedulerState,
    ticker: Option<Receiver<Instant>>,
}

impl UpdateScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: SchedulerState::Idle,
            ticker: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Inicia o timer. Só vale uma vez: chamadas repetidas (inclusive após
    /// `stop`) retornam [`CoreError::SchedulerMisuse`] e não mudam nada.
    pub fn start(&mut self) -> Result<(), CoreError> {
        if self.state != SchedulerState::Idle {
            warn!("start() ignorado: scheduler em {:?}", self.state);
            return Err(CoreError::SchedulerMisuse);
        }
        self.ticker = Some(tick(self.period));
        self.state = SchedulerState::Running;
        info!("Scheduler iniciado (período {} ms)", self.period.as_millis());
        Ok(())
    }

    /// Para o timer. Idempotente; antes de `start` é no-op.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Running {
            return;
        }
        self.ticker = None;
        self.state = SchedulerState::Stopped;
        info!("Scheduler parado");
    }

    /// `true` se uma fronteira de tick passou desde a última consulta.
    pub fn poll(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| t.try_recv().is_ok())
    }

    /// Bloqueia até o próximo tick ou até `timeout`.
    /// Retorna `false` imediatamente se o scheduler não está rodando.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|t| t.recv_timeout(timeout).is_ok())
    }

    /// Tempo até a próxima fronteira, para o loop da UI agendar repaint.
    pub fn next_repaint_hint(&self) -> Option<Duration> {
        self.is_running().then_some(self.period)
    }
}
