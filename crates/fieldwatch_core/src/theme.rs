//! Definição de temas visuais para o dashboard.

use serde::{Deserialize, Serialize};

/// Cor em formato hex string (ex: "#42a5f5") para serialização.
/// A conversão para `egui::Color32` é feita no dashboard.
pub type ColorHex = String;

/// Definição completa de um tema de cores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Cores de fundo
    pub bg: ColorHex,
    pub panel: ColorHex,
    pub border: ColorHex,
    // Cores de texto
    pub text: ColorHex,
    pub dim: ColorHex,
    pub title: ColorHex,
    // Mapa
    pub map_bg: ColorHex,
    pub marker: ColorHex,
    pub marker_selected: ColorHex,
    // Status
    pub active: ColorHex,
    pub inactive: ColorHex,
    // Toast de alerta
    pub toast_bg: ColorHex,
    pub toast_text: ColorHex,
    pub alert: ColorHex,
}

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    if !is_valid_hex(hex) {
        return (255, 255, 255); // fallback branco
    }
    let hex = hex.trim_start_matches('#');
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

/// `true` para "#RRGGBB" ou "RRGGBB".
pub fn is_valid_hex(hex: &str) -> bool {
    let hex = hex.trim_start_matches('#');
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Tema Escuro (padrão).
pub fn dark_theme() -> Theme {
    Theme {
        name: "dark".into(),
        bg: "#1a1a1a".into(),
        panel: "#252525".into(),
        border: "#333333".into(),
        text: "#ffffff".into(),
        dim: "#888888".into(),
        title: "#00d9ff".into(),
        map_bg: "#12202b".into(),
        marker: "#ffa500".into(),
        marker_selected: "#ff3366".into(),
        active: "#00ff88".into(),
        inactive: "#666666".into(),
        toast_bg: "#323232".into(),
        toast_text: "#ffffff".into(),
        alert: "#ff6b6b".into(),
    }
}

/// Tema Claro.
pub fn light_theme() -> Theme {
    Theme {
        name: "light".into(),
        bg: "#f5f5f5".into(),
        panel: "#ffffff".into(),
        border: "#cccccc".into(),
        text: "#333333".into(),
        dim: "#888888".into(),
        title: "#0066cc".into(),
        map_bg: "#e3eef5".into(),
        marker: "#cc7700".into(),
        marker_selected: "#cc2222".into(),
        active: "#00aa55".into(),
        inactive: "#999999".into(),
        toast_bg: "#323232".into(),
        toast_text: "#ffffff".into(),
        alert: "#cc4444".into(),
    }
}

/// Tema High Contrast (acessibilidade).
pub fn high_contrast_theme() -> Theme {
    Theme {
        name: "high_contrast".into(),
        bg: "#000000".into(),
        panel: "#1a1a1a".into(),
        border: "#ffffff".into(),
        text: "#ffffff".into(),
        dim: "#cccccc".into(),
        title: "#00ffff".into(),
        map_bg: "#000000".into(),
        marker: "#ffff00".into(),
        marker_selected: "#ff00ff".into(),
        active: "#00ff00".into(),
        inactive: "#cccccc".into(),
        toast_bg: "#ffffff".into(),
        toast_text: "#000000".into(),
        alert: "#ff0000".into(),
    }
}

/// Retorna tema pelo nome.
pub fn get_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "light" => light_theme(),
        "high_contrast" => high_contrast_theme(),
        _ => dark_theme(),
    }
}

/// Nomes de temas disponíveis.
pub fn theme_names() -> Vec<&'static str> {
    vec!["dark", "light", "high_contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#42a5f5"), (66, 165, 245));
        assert_eq!(hex_to_rgb("1a1a1a"), (26, 26, 26));
    }

    #[test]
    fn hex_to_rgb_fallback() {
        assert_eq!(hex_to_rgb("#zzzzzz"), (255, 255, 255));
        assert_eq!(hex_to_rgb("#fff"), (255, 255, 255));
        assert!(!is_valid_hex("#12345"));
    }

    #[test]
    fn all_themes_load() {
        for name in theme_names() {
            let t = get_theme(name);
            assert_eq!(t.name, name);
            assert!(is_valid_hex(&t.marker));
        }
    }

    #[test]
    fn unknown_theme_returns_dark() {
        assert_eq!(get_theme("nonexistent").name, "dark");
    }
}
