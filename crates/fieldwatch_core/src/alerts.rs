//! Sistema de alertas – disparo por borda ao cruzar o threshold.

use crate::config::{HorizontalPosition, NotificationConfig, VerticalPosition};
use crate::types::DeviceRecord;

/// Threshold padrão de animais por dispositivo.
pub const DEFAULT_ALERT_THRESHOLD: u32 = 20;

/// Resultado de uma avaliação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    NoAlert,
    Fire(String),
}

impl AlertDecision {
    pub fn is_fire(&self) -> bool {
        matches!(self, AlertDecision::Fire(_))
    }
}

/// Opções de exibição repassadas ao widget de notificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationOptions {
    pub duration_ms: u64,
    pub horizontal: HorizontalPosition,
    pub vertical: VerticalPosition,
}

/// Mensagem pronta para o sink de notificação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub dismiss_label: String,
    pub options: NotificationOptions,
}

/// Avaliador de alertas edge-triggered.
///
/// Dispara uma vez por registro: ao disparar, marca `alert_fired` antes de
/// retornar, então uma reavaliação do mesmo estado nunca dispara de novo.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    threshold: u32,
    notifications: NotificationConfig,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD, NotificationConfig::default())
    }
}

impl AlertEvaluator {
    pub fn new(threshold: u32, notifications: NotificationConfig) -> Self {
        Self {
            threshold,
            notifications,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn evaluate(&self, record: &mut DeviceRecord) -> AlertDecision {
        let total = record.total_count();
        if total < self.threshold || record.alert_fired {
            return AlertDecision::NoAlert;
        }

        record.alert_fired = true;
        AlertDecision::Fire(alert_message(&record.label, total))
    }

    /// Empacota a mensagem com label de fechar, duração e posição.
    pub fn notification(&self, message: String) -> Notification {
        Notification {
            message,
            dismiss_label: self.notifications.dismiss_label.clone(),
            options: NotificationOptions {
                duration_ms: self.notifications.duration_ms,
                horizontal: self.notifications.horizontal,
                vertical: self.notifications.vertical,
            },
        }
    }
}

fn alert_message(label: &str, total: u32) -> String {
    format!("High Animal Alert: {label} has {total} animals!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceStatus, GeoPosition};

    fn device(dogs: u32, cats: u32) -> DeviceRecord {
        DeviceRecord::new("A", "A", GeoPosition::default(), DeviceStatus::Active, dogs, cats)
    }

    #[test]
    fn below_threshold_is_silent() {
        let mut d = device(9, 9);
        assert_eq!(AlertEvaluator::default().evaluate(&mut d), AlertDecision::NoAlert);
        assert!(!d.alert_fired);
    }

    #[test]
    fn fires_once_at_threshold() {
        let eval = AlertEvaluator::default();
        let mut d = device(10, 10);

        match eval.evaluate(&mut d) {
            AlertDecision::Fire(msg) => {
                assert!(msg.contains("A has 20"));
            }
            other => panic!("esperado Fire, veio {other:?}"),
        }
        assert!(d.alert_fired);

        // Mesmo estado, e acima do threshold: nada
        assert_eq!(eval.evaluate(&mut d), AlertDecision::NoAlert);
        d.dogs_count += 30;
        assert_eq!(eval.evaluate(&mut d), AlertDecision::NoAlert);
    }

    #[test]
    fn message_format() {
        let eval = AlertEvaluator::default();
        let mut d = DeviceRecord::new("s", "Sfax", GeoPosition::default(), DeviceStatus::Inactive, 12, 9);
        assert_eq!(
            eval.evaluate(&mut d),
            AlertDecision::Fire("High Animal Alert: Sfax has 21 animals!".into())
        );
    }

    #[test]
    fn custom_threshold() {
        let eval = AlertEvaluator::new(5, NotificationConfig::default());
        let mut d = device(3, 2);
        assert!(eval.evaluate(&mut d).is_fire());
    }

    #[test]
    fn notification_uses_configured_options() {
        let eval = AlertEvaluator::default();
        let n = eval.notification("oi".into());
        assert_eq!(n.dismiss_label, "Close");
        assert_eq!(n.options.duration_ms, 5000);
        assert_eq!(n.options.horizontal, HorizontalPosition::Right);
        assert_eq!(n.options.vertical, VerticalPosition::Top);
    }
}
