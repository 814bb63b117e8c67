//! Placement area, drag math and overlay transforms.

use crate::design::entry::{DesignEntry, DesignId};
use crate::foundation::core::{Affine, Point, Rect, Vec2};

/// Pixels of padding between the preview container edge and the display area, per side.
pub const CONTAINER_INSET_PX: f64 = 64.0;

/// Percentage region of the display area where designs may sit.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PlacementArea {
    /// Keeps overlays inside the garment silhouette.
    pub const SHIRT: PlacementArea = PlacementArea {
        min_x: 15.0,
        max_x: 75.0,
        min_y: 20.0,
        max_y: 80.0,
    };

    pub fn clamp(self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }

    pub fn contains(self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }
}

impl Default for PlacementArea {
    fn default() -> Self {
        Self::SHIRT
    }
}

/// Convert a pointer position (same space as `container`) into clamped percentage coordinates.
///
/// The display area is the container minus [`CONTAINER_INSET_PX`] on every side.
pub fn drag_position(pointer: Point, container: Rect, area: PlacementArea) -> (f64, f64) {
    let inner_w = container.width() - 2.0 * CONTAINER_INSET_PX;
    let inner_h = container.height() - 2.0 * CONTAINER_INSET_PX;
    let pct = |offset: f64, extent: f64| {
        if extent > 0.0 {
            offset / extent * 100.0
        } else {
            0.0
        }
    };
    let x = pct(pointer.x - container.x0 - CONTAINER_INSET_PX, inner_w);
    let y = pct(pointer.y - container.y0 - CONTAINER_INSET_PX, inner_h);
    area.clamp(x, y)
}

/// Transform mapping an overlay's local box `(0,0)-(width,height)` into the display area.
///
/// The top-left lands at the entry's percentage position; rotation pivots on the box center.
pub fn overlay_transform(entry: &DesignEntry, display: Rect) -> Affine {
    let origin = Vec2::new(
        display.x0 + entry.x / 100.0 * display.width(),
        display.y0 + entry.y / 100.0 * display.height(),
    );
    let center = Vec2::new(entry.width / 2.0, entry.height / 2.0);
    Affine::translate(origin)
        * Affine::translate(center)
        * Affine::rotate(entry.rotation.to_radians())
        * Affine::translate(-center)
}

/// Tracks which design is being dragged inside the preview.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragSession {
    active: Option<DesignId>,
}

impl DragSession {
    pub fn start(&mut self, id: DesignId) {
        self.active = Some(id);
    }

    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<DesignId> {
        self.active
    }

    pub fn is_dragging(&self, id: DesignId) -> bool {
        self.active == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::data_url::ImageRef;

    fn container() -> Rect {
        // 128px of insets leaves a 400x400 display area at (164, 114).
        Rect::new(100.0, 50.0, 628.0, 578.0)
    }

    #[test]
    fn drag_maps_pointer_to_percent() {
        let (x, y) = drag_position(
            Point::new(164.0 + 200.0, 114.0 + 160.0),
            container(),
            PlacementArea::SHIRT,
        );
        assert!((x - 50.0).abs() < 1e-9);
        assert!((y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn drag_clamps_to_placement_area() {
        let area = PlacementArea::SHIRT;
        for &(px, py) in &[
            (-1000.0, -1000.0),
            (5000.0, 5000.0),
            (164.0, 900.0),
            (628.0, 50.0),
        ] {
            let (x, y) = drag_position(Point::new(px, py), container(), area);
            assert!(area.contains(x, y), "({px},{py}) -> ({x},{y})");
        }
        assert_eq!(
            drag_position(Point::new(0.0, 0.0), container(), area),
            (15.0, 20.0)
        );
        assert_eq!(
            drag_position(Point::new(9999.0, 9999.0), container(), area),
            (75.0, 80.0)
        );
    }

    #[test]
    fn degenerate_container_does_not_divide_by_zero() {
        let tiny = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (x, y) = drag_position(Point::new(50.0, 50.0), tiny, PlacementArea::SHIRT);
        assert_eq!((x, y), (15.0, 20.0));
    }

    #[test]
    fn overlay_transform_places_and_rotates_about_center() {
        let mut e = DesignEntry::new(ImageRef::Gallery("/a.png".into()));
        e.x = 50.0;
        e.y = 25.0;
        e.width = 40.0;
        e.height = 20.0;
        let display = Rect::new(0.0, 0.0, 400.0, 400.0);

        let a = overlay_transform(&e, display);
        let tl = a * Point::new(0.0, 0.0);
        assert!((tl.x - 200.0).abs() < 1e-9 && (tl.y - 100.0).abs() < 1e-9);

        e.rotation = 90.0;
        let a = overlay_transform(&e, display);
        let c = a * Point::new(20.0, 10.0);
        assert!((c.x - 220.0).abs() < 1e-9 && (c.y - 110.0).abs() < 1e-9);
    }

    #[test]
    fn drag_session_tracks_active_design() {
        let id = DesignId::new();
        let mut s = DragSession::default();
        s.start(id);
        assert!(s.is_dragging(id));
        s.end();
        assert_eq!(s.active(), None);
    }
}
