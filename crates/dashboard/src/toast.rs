//! Toast de alerta no estilo snackbar: um por vez, some após a duração.

use crate::theme_egui::EguiTheme;
use egui::{Align2, RichText, Ui, Vec2, vec2};
use fieldwatch_core::alerts::{Notification, NotificationOptions};
use fieldwatch_core::config::{HorizontalPosition, VerticalPosition};
use fieldwatch_core::sinks::NotificationSink;
use std::time::{Duration, Instant};

const EDGE_MARGIN: f32 = 16.0;

struct ActiveToast {
    notification: Notification,
    shown_at: Instant,
}

impl ActiveToast {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at)
            >= Duration::from_millis(self.notification.options.duration_ms)
    }
}

#[derive(Default)]
pub struct ToastLayer {
    current: Option<ActiveToast>,
}

impl NotificationSink for ToastLayer {
    /// Um novo alerta substitui o que estiver na tela.
    fn notify(&mut self, notification: &Notification) {
        self.current = Some(ActiveToast {
            notification: notification.clone(),
            shown_at: Instant::now(),
        });
    }
}

/// Âncora e deslocamento da área do toast.
fn anchor(options: &NotificationOptions) -> (Align2, Vec2) {
    let (align, dx) = match (options.horizontal, options.vertical) {
        (HorizontalPosition::Left, VerticalPosition::Top) => (Align2::LEFT_TOP, EDGE_MARGIN),
        (HorizontalPosition::Center, VerticalPosition::Top) => (Align2::CENTER_TOP, 0.0),
        (HorizontalPosition::Right, VerticalPosition::Top) => (Align2::RIGHT_TOP, -EDGE_MARGIN),
        (HorizontalPosition::Left, VerticalPosition::Bottom) => (Align2::LEFT_BOTTOM, EDGE_MARGIN),
        (HorizontalPosition::Center, VerticalPosition::Bottom) => (Align2::CENTER_BOTTOM, 0.0),
        (HorizontalPosition::Right, VerticalPosition::Bottom) => {
            (Align2::RIGHT_BOTTOM, -EDGE_MARGIN)
        }
    };
    let dy = match options.vertical {
        VerticalPosition::Top => EDGE_MARGIN,
        VerticalPosition::Bottom => -EDGE_MARGIN,
    };
    (align, vec2(dx, dy))
}

impl ToastLayer {
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Remove o toast se a duração passou.
    pub fn expire(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.current = None;
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &EguiTheme) {
        self.expire(Instant::now());
        let Some(toast) = &self.current else {
            return;
        };

        let (align, offset) = anchor(&toast.notification.options);
        let mut dismissed = false;
        egui::Area::new(egui::Id::new("alert_toast"))
            .anchor(align, offset)
            .order(egui::Order::Foreground)
            .show(ctx, |ui: &mut Ui| {
                egui::Frame::new()
                    .fill(theme.toast_bg)
                    .corner_radius(4.0)
                    .inner_margin(12.0)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            ui.label(
                                RichText::new(&toast.notification.message)
                                    .color(theme.toast_text)
                                    .strong(),
                            );
                            ui.add_space(12.0);
                            let button = egui::Button::new(
                                RichText::new(&toast.notification.dismiss_label).color(theme.alert),
                            )
                            .frame(false);
                            if ui.add(button).clicked() {
                                dismissed = true;
                            }
                        });
                    });
            });

        if dismissed {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwatch_core::alerts::AlertEvaluator;

    fn notification() -> Notification {
        AlertEvaluator::default().notification("High Animal Alert: Sfax has 20 animals!".into())
    }

    #[test]
    fn expires_after_duration() {
        let mut layer = ToastLayer::default();
        layer.notify(&notification());
        let shown_at = layer.current.as_ref().unwrap().shown_at;

        layer.expire(shown_at + Duration::from_millis(4999));
        assert!(layer.is_visible());
        layer.expire(shown_at + Duration::from_millis(5000));
        assert!(!layer.is_visible());
    }

    #[test]
    fn newer_alert_replaces_current() {
        let mut layer = ToastLayer::default();
        layer.notify(&notification());
        let mut second = notification();
        second.message = "High Animal Alert: Tunis has 21 animals!".into();
        layer.notify(&second);
        assert_eq!(layer.current.as_ref().unwrap().notification.message, second.message);
    }

    #[test]
    fn default_anchor_is_top_right() {
        let (align, offset) = anchor(&notification().options);
        assert_eq!(align, Align2::RIGHT_TOP);
        assert_eq!(offset, vec2(-EDGE_MARGIN, EDGE_MARGIN));
    }
}
