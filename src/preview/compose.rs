use std::fmt::{self, Write as _};
use std::path::Path;

use crate::assets::data_url::ImageRef;
use crate::assets::raster::{parse_svg, render_svg};
use crate::assets::text::{TextRenderer, escape_xml};
use crate::design::entry::{DesignEntry, DesignId, wrap_rotation};
use crate::design::placement::{
    CONTAINER_INSET_PX, DragSession, PlacementArea, drag_position, overlay_transform,
};
use crate::foundation::core::{Affine, Canvas, FrameRGBA, Point, Rect};
use crate::foundation::error::StudioResult;
use crate::preview::garment::{GARMENT_VIEWBOX, GarmentOutline, ViewSide};
use crate::shirt::ShirtSelection;

const BACKGROUND: &str = "#f3f4f6";
const DROP_HINT: &str = "Arrastra diseños aquí";
/// The back view is drawn slightly smaller than the front.
const BACK_VIEW_SCALE: f64 = 0.95;

/// Pixel geometry of the preview container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewLayout {
    /// Side of the square container, in pixels.
    pub container_px: f64,
}

impl PreviewLayout {
    pub const NORMAL: PreviewLayout = PreviewLayout { container_px: 512.0 };
    pub const FULLSCREEN: PreviewLayout = PreviewLayout {
        container_px: 1024.0,
    };

    pub fn for_state(state: &PreviewState) -> Self {
        if state.fullscreen {
            Self::FULLSCREEN
        } else {
            Self::NORMAL
        }
    }

    pub fn container(&self) -> Rect {
        Rect::new(0.0, 0.0, self.container_px, self.container_px)
    }

    /// The container minus the fixed inset on every side.
    pub fn display(&self) -> Rect {
        self.container().inset(-CONTAINER_INSET_PX)
    }

    /// Design sizes are authored against the normal layout; larger layouts scale them up.
    pub fn design_scale(&self) -> f64 {
        self.display().width() / PreviewLayout::NORMAL.display().width()
    }

    pub fn canvas(&self) -> Canvas {
        let side = self.container_px.round().max(1.0) as u32;
        Canvas::new(side, side)
    }
}

impl Default for PreviewLayout {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Transient view flags of the preview panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewState {
    pub view: ViewSide,
    pub fullscreen: bool,
    /// Turn of the garment about its vertical axis, in degrees.
    pub rotation: f64,
    /// Interactive previews accept drags and show the drop hint.
    pub interactive: bool,
    drag: DragSession,
}

impl PreviewState {
    pub fn new(interactive: bool) -> Self {
        Self {
            view: ViewSide::Front,
            fullscreen: false,
            rotation: 0.0,
            interactive,
            drag: DragSession::default(),
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.flipped();
        self.drag.end();
        tracing::debug!(view = ?self.view, "preview view toggled");
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    /// Turn the garment about its vertical axis; the angle wraps at 360.
    pub fn turn(&mut self, degrees: f64) {
        self.rotation = wrap_rotation(self.rotation + degrees);
    }

    pub fn reset_view(&mut self) {
        self.rotation = 0.0;
        self.view = ViewSide::Front;
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    /// Begin dragging a design. Ignored unless interactive and showing the front.
    pub fn start_drag(&mut self, id: DesignId) -> bool {
        if !self.interactive || self.view != ViewSide::Front {
            return false;
        }
        self.drag.start(id);
        true
    }

    /// Map a pointer move to the dragged design's new position.
    ///
    /// `pointer` and `container` share one coordinate space. `None` when nothing is being dragged.
    pub fn drag_to(&self, pointer: Point, container: Rect) -> Option<(DesignId, f64, f64)> {
        if !self.interactive {
            return None;
        }
        let id = self.drag.active()?;
        let (x, y) = drag_position(pointer, container, PlacementArea::SHIRT);
        Some((id, x, y))
    }

    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Status lines shown under the preview.
    pub fn summary(&self, selection: &ShirtSelection, design_count: usize) -> [String; 3] {
        let applied = if design_count == 1 {
            "1 elemento aplicado".to_owned()
        } else {
            format!("{design_count} elementos aplicados")
        };
        let mode = if self.interactive {
            "Interactivo"
        } else {
            "Solo vista"
        };
        [
            applied,
            format!("{} • {mode}", self.view.label()),
            format!(
                "{} • Talla {}",
                selection.model.display_name(),
                selection.size
            ),
        ]
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Build the standalone SVG document of the preview.
pub fn compose_svg(
    selection: &ShirtSelection,
    designs: &[DesignEntry],
    state: &PreviewState,
    layout: PreviewLayout,
) -> String {
    let mut svg = String::with_capacity(4096);
    // fmt::Write for String never fails.
    let _ = write_document(&mut svg, selection, designs, state, layout);
    svg
}

fn write_document(
    svg: &mut String,
    selection: &ShirtSelection,
    designs: &[DesignEntry],
    state: &PreviewState,
    layout: PreviewLayout,
) -> fmt::Result {
    let size = layout.container_px;
    let display = layout.display();
    let outline = GarmentOutline::for_model(selection.model, state.view);
    let fill = selection.color.to_svg_rgb();

    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )?;
    write!(
        svg,
        r#"<defs><filter id="shadow" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="2" dy="4" stdDeviation="3" flood-opacity="0.3"/></filter><linearGradient id="shirtGradient" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{fill}" stop-opacity="1"/><stop offset="100%" stop-color="{fill}" stop-opacity="0.85"/></linearGradient><linearGradient id="sleeveGradient" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{fill}" stop-opacity="0.9"/><stop offset="100%" stop-color="{fill}" stop-opacity="0.7"/></linearGradient></defs>"#
    )?;
    write!(
        svg,
        r#"<rect width="{size}" height="{size}" fill="{BACKGROUND}"/>"#
    )?;
    write!(
        svg,
        r#"<g transform="{}">"#,
        svg_matrix(scene_transform(state, display))
    )?;

    write!(
        svg,
        r#"<g transform="{}">"#,
        svg_matrix(garment_transform(display))
    )?;
    write!(
        svg,
        r##"<path d="{}" fill="url(#sleeveGradient)" stroke="#00000020" stroke-width="1" filter="url(#shadow)"/>"##,
        outline.sleeves
    )?;
    write!(
        svg,
        r##"<path d="{}" fill="url(#shirtGradient)" stroke="#00000020" stroke-width="1" filter="url(#shadow)"/>"##,
        outline.body
    )?;
    write!(
        svg,
        r##"<path d="{}" fill="none" stroke="#00000030" stroke-width="2"/>"##,
        outline.neck
    )?;
    write!(
        svg,
        r##"<path d="{}" fill="none" stroke="#00000015" stroke-width="1"/>"##,
        outline.details
    )?;
    svg.push_str("</g>");

    if state.view == ViewSide::Front {
        let scale = layout.design_scale();
        for entry in designs {
            write_overlay_image(svg, entry, display, scale)?;
        }
        if designs.is_empty() && state.interactive {
            write_drop_hint(svg, display)?;
        }
    }

    svg.push_str("</g></svg>");
    Ok(())
}

/// Rasterize the preview. Relative gallery paths resolve against `resources_dir`.
#[tracing::instrument(level = "debug", skip(fonts, selection, designs))]
pub fn render_png(
    fonts: &TextRenderer,
    selection: &ShirtSelection,
    designs: &[DesignEntry],
    state: &PreviewState,
    resources_dir: Option<&Path>,
) -> StudioResult<FrameRGBA> {
    let layout = PreviewLayout::for_state(state);
    let svg = compose_svg(selection, designs, state, layout);
    let mut opts = fonts.svg_options();
    opts.resources_dir = resources_dir.map(Path::to_path_buf);
    let tree = parse_svg(&svg, &opts)?;
    render_svg(&tree, layout.canvas())
}

/// Scene placement around the display center: the turn about the vertical axis, projected
/// flat as a horizontal squeeze by `cos(rotation)`, and the smaller back view.
fn scene_transform(state: &PreviewState, display: Rect) -> Affine {
    let c = display.center().to_vec2();
    let depth = match state.view {
        ViewSide::Front => 1.0,
        ViewSide::Back => BACK_VIEW_SCALE,
    };
    let squeeze = state.rotation.to_radians().cos();
    Affine::translate(c) * Affine::scale_non_uniform(squeeze * depth, depth) * Affine::translate(-c)
}

/// Fit the garment viewBox into `display`, preserving aspect ratio and centering it.
fn garment_transform(display: Rect) -> Affine {
    let (vw, vh) = GARMENT_VIEWBOX;
    let s = (display.width() / vw).min(display.height() / vh);
    let dx = display.x0 + (display.width() - vw * s) / 2.0;
    let dy = display.y0 + (display.height() - vh * s) / 2.0;
    Affine::translate((dx, dy)) * Affine::scale(s)
}

fn write_overlay_image(
    svg: &mut String,
    entry: &DesignEntry,
    display: Rect,
    scale: f64,
) -> fmt::Result {
    let mut scaled = entry.clone();
    scaled.width *= scale;
    scaled.height *= scale;
    let xform = overlay_transform(&scaled, display);
    write!(
        svg,
        r#"<image href="{href}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid meet" transform="{m}"/>"#,
        href = escape_xml(&image_href(&entry.image)),
        w = scaled.width,
        h = scaled.height,
        m = svg_matrix(xform),
    )
}

/// Gallery paths are public-root absolute; inside a document they become relative.
fn image_href(image: &ImageRef) -> String {
    match image {
        ImageRef::Gallery(path) => path.trim_start_matches('/').to_owned(),
        ImageRef::Data(_) => image.to_href(),
    }
}

fn write_drop_hint(svg: &mut String, display: Rect) -> fmt::Result {
    let c = display.center();
    let font_size = (display.width() / 20.0).round();
    write!(
        svg,
        r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="#9ca3af" stroke-width="2" stroke-dasharray="8 6" rx="12"/><text x="{cx}" y="{cy}" font-family="sans-serif" font-size="{font_size}" fill="#6b7280" text-anchor="middle" dominant-baseline="middle">{DROP_HINT}</text>"##,
        x = display.x0,
        y = display.y0,
        w = display.width(),
        h = display.height(),
        cx = c.x,
        cy = c.y,
    )
}

fn svg_matrix(a: Affine) -> String {
    let [a, b, c, d, e, f] = a.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}
