//! CPU rasterization of vector paths and PNG encoding of the results.

use std::io::Cursor;

use anyhow::Context as _;

use crate::assets::color::Color;
use crate::assets::data_url::DataUrl;
use crate::foundation::core::{
    Affine, BezPath, Canvas, FrameRGBA, Point, unpremultiply_rgba8_in_place,
};
use crate::foundation::error::{StudioError, StudioResult};

/// One filled path in a [`fill_paths`] call.
#[derive(Clone, Debug)]
pub struct FillOp {
    pub path: BezPath,
    pub transform: Affine,
    pub color: Color,
}

impl FillOp {
    pub fn new(path: BezPath, color: Color) -> Self {
        Self {
            path,
            transform: Affine::IDENTITY,
            color,
        }
    }
}

/// Fill `ops` in order onto a transparent canvas and return straight-alpha RGBA.
pub fn fill_paths(canvas: Canvas, ops: &[FillOp]) -> StudioResult<FrameRGBA> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| StudioError::render("canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| StudioError::render("canvas height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(StudioError::render("canvas width/height must be > 0"));
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for op in ops {
        ctx.set_transform(affine_to_cpu(op.transform));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            op.color.r, op.color.g, op.color.b, op.color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(&op.path));
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

/// Encode a straight-alpha frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> StudioResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| StudioError::render("frame byte length does not match its dimensions"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode a frame as a `data:image/png;base64,...` URL.
pub fn frame_to_data_url(frame: &FrameRGBA) -> StudioResult<DataUrl> {
    Ok(DataUrl::png(encode_png(frame)?))
}

/// Decode any supported raster (PNG, JPEG, ...) into a straight-alpha frame.
pub fn decode_frame(bytes: &[u8]) -> StudioResult<FrameRGBA> {
    let rgba = image::load_from_memory(bytes)
        .context("decode image from memory")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(FrameRGBA {
        width,
        height,
        data: rgba.into_raw(),
    })
}

/// Parse an SVG document with the given options.
pub fn parse_svg(svg: &str, opts: &usvg::Options<'_>) -> StudioResult<usvg::Tree> {
    let tree = usvg::Tree::from_str(svg, opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG tree scaled to fill `canvas`, returning straight-alpha RGBA.
pub fn render_svg(tree: &usvg::Tree, canvas: Canvas) -> StudioResult<FrameRGBA> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| StudioError::render("failed to allocate svg pixmap"))?;

    let sx = (canvas.width as f32) / tree.size().width();
    let sy = (canvas.height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());

    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
