//! Conversão de temas para `egui::Color32`.

use egui::Color32;
use fieldwatch_core::theme::{self, Theme};
use fieldwatch_core::types::DeviceStatus;

/// Tema convertido para tipos egui.
#[derive(Clone)]
pub struct EguiTheme {
    pub name: String,
    pub bg: Color32,
    pub panel: Color32,
    pub border: Color32,
    pub text: Color32,
    pub dim: Color32,
    pub title: Color32,
    pub map_bg: Color32,
    pub marker: Color32,
    pub marker_selected: Color32,
    pub active: Color32,
    pub inactive: Color32,
    pub toast_bg: Color32,
    pub toast_text: Color32,
    pub alert: Color32,
}

impl EguiTheme {
    /// Converte um [`Theme`] do core para [`EguiTheme`].
    pub fn from_core(t: &Theme) -> Self {
        Self {
            name: t.name.clone(),
            bg: hex_color(&t.bg),
            panel: hex_color(&t.panel),
            border: hex_color(&t.border),
            text: hex_color(&t.text),
            dim: hex_color(&t.dim),
            title: hex_color(&t.title),
            map_bg: hex_color(&t.map_bg),
            marker: hex_color(&t.marker),
            marker_selected: hex_color(&t.marker_selected),
            active: hex_color(&t.active),
            inactive: hex_color(&t.inactive),
            toast_bg: hex_color(&t.toast_bg),
            toast_text: hex_color(&t.toast_text),
            alert: hex_color(&t.alert),
        }
    }

    pub fn status_color(&self, status: DeviceStatus) -> Color32 {
        match status {
            DeviceStatus::Active => self.active,
            DeviceStatus::Inactive => self.inactive,
        }
    }
}

pub fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}

/// Carrega todos os temas disponíveis.
pub fn all_themes() -> Vec<EguiTheme> {
    theme::theme_names()
        .iter()
        .map(|name| EguiTheme::from_core(&theme::get_theme(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_color_converts() {
        assert_eq!(hex_color("#42a5f5"), Color32::from_rgb(66, 165, 245));
    }

    #[test]
    fn status_colors_differ() {
        let t = &all_themes()[0];
        assert_ne!(t.status_color(DeviceStatus::Active), t.status_color(DeviceStatus::Inactive));
    }
}
