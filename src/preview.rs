//! Garment preview: outline geometry, SVG composition and rasterization.

pub mod compose;
pub mod garment;

pub use compose::{PreviewLayout, PreviewState, compose_svg, render_png};
pub use garment::{GarmentOutline, ViewSide};
