//! The shirt the customer picked: model, color and size.

use std::fmt;
use std::str::FromStr;

use crate::assets::color::Color;
use crate::foundation::error::StudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShirtModel {
    Classic,
    Fitted,
    Oversized,
}

impl ShirtModel {
    pub const ALL: [ShirtModel; 3] = [
        ShirtModel::Classic,
        ShirtModel::Fitted,
        ShirtModel::Oversized,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ShirtModel::Classic => "classic",
            ShirtModel::Fitted => "fitted",
            ShirtModel::Oversized => "oversized",
        }
    }

    /// Storefront display name.
    pub fn display_name(self) -> &'static str {
        match self {
            ShirtModel::Classic => "Clásica",
            ShirtModel::Fitted => "Entallada",
            ShirtModel::Oversized => "Oversized",
        }
    }
}

impl fmt::Display for ShirtModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ShirtModel {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ShirtModel::ALL
            .into_iter()
            .find(|m| m.key() == needle)
            .ok_or_else(|| StudioError::validation(format!("unknown shirt model \"{s}\"")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShirtSize {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShirtSize::Xs => "XS",
            ShirtSize::S => "S",
            ShirtSize::M => "M",
            ShirtSize::L => "L",
            ShirtSize::Xl => "XL",
            ShirtSize::Xxl => "XXL",
        })
    }
}

/// Named colors of the storefront palette, keyed by lowercase hex.
const COLOR_NAMES: [(&str, &str); 8] = [
    ("#ffffff", "Blanco"),
    ("#000000", "Negro"),
    ("#6b7280", "Gris"),
    ("#1e3a8a", "Azul Marino"),
    ("#dc2626", "Rojo"),
    ("#16a34a", "Verde"),
    ("#ec4899", "Rosa"),
    ("#eab308", "Amarillo"),
];

/// Display name for a shirt color; unknown colors are "Personalizado".
pub fn color_name(color: Color) -> &'static str {
    let hex = color.to_hex();
    COLOR_NAMES
        .iter()
        .find(|(k, _)| *k == hex)
        .map(|(_, name)| *name)
        .unwrap_or("Personalizado")
}

/// The garment being customized. Owned by the surrounding flow and read-only here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShirtSelection {
    pub model: ShirtModel,
    pub color: Color,
    pub size: ShirtSize,
}

impl ShirtSelection {
    pub fn color_name(&self) -> &'static str {
        color_name(self.color)
    }
}

impl Default for ShirtSelection {
    fn default() -> Self {
        Self {
            model: ShirtModel::Classic,
            color: Color::WHITE,
            size: ShirtSize::M,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selection_deserializes_from_storefront_json() {
        let sel: ShirtSelection =
            serde_json::from_value(json!({"model": "oversized", "color": "#1E3A8A", "size": "XL"}))
                .unwrap();
        assert_eq!(sel.model, ShirtModel::Oversized);
        assert_eq!(sel.size, ShirtSize::Xl);
        assert_eq!(sel.color_name(), "Azul Marino");
    }

    #[test]
    fn unknown_colors_are_custom() {
        assert_eq!(color_name(Color::rgb(1, 2, 3)), "Personalizado");
        assert_eq!(color_name(Color::WHITE), "Blanco");
    }

    #[test]
    fn model_names() {
        assert_eq!("Fitted".parse::<ShirtModel>().unwrap(), ShirtModel::Fitted);
        assert!("tank".parse::<ShirtModel>().is_err());
        assert_eq!(ShirtModel::Classic.display_name(), "Clásica");
    }
}
