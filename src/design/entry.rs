use std::fmt;

use crate::assets::data_url::ImageRef;
use crate::design::placement::PlacementArea;

/// Smallest allowed overlay edge, in pixels.
pub const MIN_SIZE_PX: f64 = 20.0;
/// Largest allowed overlay edge, in pixels.
pub const MAX_SIZE_PX: f64 = 200.0;
/// Degrees added by one rotate action.
pub const ROTATION_STEP_DEG: f64 = 15.0;

pub const DEFAULT_X_PCT: f64 = 40.0;
pub const DEFAULT_Y_PCT: f64 = 30.0;
pub const DEFAULT_SIZE_PX: f64 = 80.0;

/// Identity of a placed design. Time-ordered, so sorting by id follows creation order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct DesignId(uuid::Uuid);

impl DesignId {
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl Default for DesignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for DesignId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// One decorative element placed on the shirt.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DesignEntry {
    pub id: DesignId,
    pub image: ImageRef,
    /// Left edge, percent of the display area width.
    pub x: f64,
    /// Top edge, percent of the display area height.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees clockwise, in `[0, 360)`.
    pub rotation: f64,
}

impl DesignEntry {
    pub fn new(image: ImageRef) -> Self {
        Self {
            id: DesignId::new(),
            image,
            x: DEFAULT_X_PCT,
            y: DEFAULT_Y_PCT,
            width: DEFAULT_SIZE_PX,
            height: DEFAULT_SIZE_PX,
            rotation: 0.0,
        }
    }

    /// Summary line shown in the applied-designs list, e.g. `88x88px • 15°`.
    pub fn label(&self) -> String {
        format!(
            "{}x{}px • {}°",
            fmt_num(self.width),
            fmt_num(self.height),
            fmt_num(self.rotation)
        )
    }

    /// Bring every field back inside its allowed range.
    pub(crate) fn normalize(&mut self, area: PlacementArea) {
        self.width = clamp_size(self.width);
        self.height = clamp_size(self.height);
        self.rotation = wrap_rotation(self.rotation);
        let (x, y) = area.clamp(self.x, self.y);
        self.x = x;
        self.y = y;
    }
}

/// Fields to merge into an existing entry; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DesignPatch {
    pub image: Option<ImageRef>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
}

impl DesignPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn rotation(deg: f64) -> Self {
        Self {
            rotation: Some(deg),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, entry: &mut DesignEntry) {
        if let Some(image) = self.image {
            entry.image = image;
        }
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            entry.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            entry.y = y;
        }
        if let Some(w) = self.width.filter(|v| v.is_finite()) {
            entry.width = w;
        }
        if let Some(h) = self.height.filter(|v| v.is_finite()) {
            entry.height = h;
        }
        if let Some(r) = self.rotation.filter(|v| v.is_finite()) {
            entry.rotation = r;
        }
    }
}

pub fn clamp_size(px: f64) -> f64 {
    px.clamp(MIN_SIZE_PX, MAX_SIZE_PX)
}

pub fn wrap_rotation(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_uses_defaults() {
        let e = DesignEntry::new(ImageRef::Gallery("/vintage-logo.jpg".into()));
        assert_eq!((e.x, e.y), (40.0, 30.0));
        assert_eq!((e.width, e.height), (80.0, 80.0));
        assert_eq!(e.rotation, 0.0);
        assert_eq!(e.label(), "80x80px • 0°");
    }

    #[test]
    fn ids_are_unique_and_time_ordered() {
        let a = DesignId::new();
        let b = DesignId::new();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a.to_string().parse::<DesignId>().unwrap(), a);
    }

    #[test]
    fn wrap_rotation_stays_in_range() {
        assert_eq!(wrap_rotation(360.0), 0.0);
        assert_eq!(wrap_rotation(375.0), 15.0);
        assert_eq!(wrap_rotation(-15.0), 345.0);
        assert_eq!(wrap_rotation(-1e-20), 0.0);
    }

    #[test]
    fn patch_ignores_non_finite_values() {
        let mut e = DesignEntry::new(ImageRef::Gallery("/a.png".into()));
        DesignPatch {
            x: Some(f64::NAN),
            width: Some(f64::INFINITY),
            rotation: Some(30.0),
            ..DesignPatch::default()
        }
        .apply(&mut e);
        assert_eq!(e.x, 40.0);
        assert_eq!(e.width, 80.0);
        assert_eq!(e.rotation, 30.0);
    }

    #[test]
    fn label_shows_fractional_sizes() {
        let mut e = DesignEntry::new(ImageRef::Gallery("/a.png".into()));
        e.width = 88.0000001;
        e.height = 72.0;
        e.rotation = 15.0;
        assert_eq!(e.label(), "88.0x72px • 15°");
    }
}
