use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::assets::color::Color;
use crate::assets::data_url::DataUrl;
use crate::assets::raster::{FillOp, fill_paths, frame_to_data_url};
use crate::foundation::core::{BezPath, Canvas, Point};
use crate::foundation::error::{StudioError, StudioResult};

/// Shapes are drawn on a square canvas of this size.
pub const SHAPE_CANVAS: Canvas = Canvas::new(100, 100);

/// Colors offered next to the shape buttons; the first one is the default fill.
pub const SHAPE_PALETTE: [Color; 8] = [
    Color::rgb(0xFF, 0x6B, 0x6B),
    Color::rgb(0x4E, 0xCD, 0xC4),
    Color::rgb(0x45, 0xB7, 0xD1),
    Color::rgb(0x96, 0xCE, 0xB4),
    Color::rgb(0xFF, 0xEA, 0xA7),
    Color::rgb(0xDD, 0xA0, 0xDD),
    Color::rgb(0x98, 0xD8, 0xC8),
    Color::rgb(0xF7, 0xDC, 0x6F),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Heart,
    Hexagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Heart,
        ShapeKind::Hexagon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Heart => "heart",
            ShapeKind::Hexagon => "hexagon",
        }
    }

    /// Button label shown in the storefront.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Circle => "Círculo",
            ShapeKind::Square => "Cuadrado",
            ShapeKind::Triangle => "Triángulo",
            ShapeKind::Star => "Estrella",
            ShapeKind::Heart => "Corazón",
            ShapeKind::Hexagon => "Hexágono",
        }
    }

    /// Path geometry in [`SHAPE_CANVAS`] coordinates.
    pub fn path(self) -> BezPath {
        let mut p = BezPath::new();
        match self {
            ShapeKind::Circle => {
                use kurbo::Shape as _;
                return kurbo::Circle::new((50.0, 50.0), 40.0).to_path(0.01);
            }
            ShapeKind::Square => {
                p.move_to((10.0, 10.0));
                p.line_to((90.0, 10.0));
                p.line_to((90.0, 90.0));
                p.line_to((10.0, 90.0));
                p.close_path();
            }
            ShapeKind::Triangle => {
                p.move_to((50.0, 10.0));
                p.line_to((10.0, 90.0));
                p.line_to((90.0, 90.0));
                p.close_path();
            }
            ShapeKind::Star => {
                // Alternates outer/inner radius while stepping 144° per vertex.
                polygon(&mut p, 5, |i| {
                    let r = if i % 2 == 0 { 40.0 } else { 20.0 };
                    polar(f64::from(i) * 4.0 * PI / 5.0, r)
                });
            }
            ShapeKind::Heart => {
                p.move_to((50.0, 80.0));
                p.curve_to((50.0, 70.0), (30.0, 50.0), (30.0, 35.0));
                p.curve_to((30.0, 20.0), (50.0, 20.0), (50.0, 35.0));
                p.curve_to((50.0, 20.0), (70.0, 20.0), (70.0, 35.0));
                p.curve_to((70.0, 50.0), (50.0, 70.0), (50.0, 80.0));
                p.close_path();
            }
            ShapeKind::Hexagon => {
                polygon(&mut p, 6, |i| polar(f64::from(i) * PI / 3.0, 35.0));
            }
        }
        p
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name() == needle)
            .ok_or_else(|| {
                StudioError::validation(format!(
                    "unknown shape \"{s}\" (expected circle, square, triangle, star, heart or hexagon)"
                ))
            })
    }
}

fn polar(angle: f64, radius: f64) -> Point {
    Point::new(50.0 + angle.cos() * radius, 50.0 + angle.sin() * radius)
}

fn polygon(p: &mut BezPath, n: u32, vertex: impl Fn(u32) -> Point) {
    for i in 0..n {
        if i == 0 {
            p.move_to(vertex(i));
        } else {
            p.line_to(vertex(i));
        }
    }
    p.close_path();
}

/// Rasterize `shape` filled with `color` into a PNG data URL.
#[tracing::instrument(level = "debug")]
pub fn generate_shape(shape: ShapeKind, color: Color) -> StudioResult<DataUrl> {
    let frame = fill_paths(SHAPE_CANVAS, &[FillOp::new(shape.path(), color)])?;
    frame_to_data_url(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::raster::decode_frame;
    use kurbo::Shape as _;

    fn render(shape: ShapeKind) -> crate::foundation::core::FrameRGBA {
        let url = generate_shape(shape, SHAPE_PALETTE[0]).unwrap();
        assert_eq!(url.mime(), "image/png");
        decode_frame(url.bytes()).unwrap()
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Heart".parse::<ShapeKind>().unwrap(), ShapeKind::Heart);
        assert_eq!(" hexagon ".parse::<ShapeKind>().unwrap(), ShapeKind::Hexagon);
        assert!("blob".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn every_shape_stays_inside_canvas() {
        for shape in ShapeKind::ALL {
            let bb = shape.path().bounding_box();
            assert!(bb.x0 >= 0.0 && bb.y0 >= 0.0, "{shape}");
            assert!(bb.x1 <= 100.0 && bb.y1 <= 100.0, "{shape}");
        }
    }

    #[test]
    fn square_fills_its_rect_exactly() {
        let frame = render(ShapeKind::Square);
        assert_eq!((frame.width, frame.height), (100, 100));
        assert_eq!(frame.pixel(50, 50), Some([0xFF, 0x6B, 0x6B, 255]));
        assert_eq!(frame.pixel(5, 5).unwrap()[3], 0);
        assert_eq!(frame.coverage(), 80 * 80);
    }

    #[test]
    fn circle_covers_center_but_not_corners() {
        let frame = render(ShapeKind::Circle);
        assert_eq!(frame.pixel(50, 50).unwrap()[3], 255);
        assert_eq!(frame.pixel(12, 12).unwrap()[3], 0);
        let area = std::f64::consts::PI * 40.0 * 40.0;
        let cov = frame.coverage() as f64;
        assert!((cov - area).abs() / area < 0.05, "coverage {cov}");
    }

    #[test]
    fn hexagon_vertices_sit_on_radius_35() {
        let path = ShapeKind::Hexagon.path();
        let bb = path.bounding_box();
        assert!((bb.x0 - 15.0).abs() < 1e-9);
        assert!((bb.x1 - 85.0).abs() < 1e-9);
    }

    #[test]
    fn heart_and_star_render_nonempty() {
        for shape in [ShapeKind::Heart, ShapeKind::Star, ShapeKind::Triangle] {
            let frame = render(shape);
            assert!(frame.coverage() > 100, "{shape}");
        }
    }
}
