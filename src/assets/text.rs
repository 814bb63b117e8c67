use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::assets::color::Color;
use crate::assets::data_url::DataUrl;
use crate::assets::raster::{frame_to_data_url, parse_svg, render_svg};
use crate::foundation::core::Canvas;
use crate::foundation::error::{StudioError, StudioResult};

/// Text designs are drawn centered on a canvas of this size.
pub const TEXT_CANVAS: Canvas = Canvas::new(300, 100);

/// Font families offered in the text tab.
pub const FONT_PRESETS: [&str; 5] = ["Arial", "Helvetica", "Times", "Impact", "Georgia"];

/// Font sizes (px) offered in the text tab.
pub const SIZE_PRESETS: [f64; 5] = [16.0, 20.0, 24.0, 32.0, 48.0];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font: String,
    pub size_px: f64,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FONT_PRESETS[0].to_owned(),
            size_px: 24.0,
            color: Color::BLACK,
        }
    }
}

impl TextStyle {
    pub fn validate(&self) -> StudioResult<()> {
        let max = f64::from(TEXT_CANVAS.height);
        if !self.size_px.is_finite() || self.size_px <= 0.0 || self.size_px > max {
            return Err(StudioError::validation(format!(
                "text size must be in (0, {max}] px, got {}",
                self.size_px
            )));
        }
        if self.font.trim().is_empty() {
            return Err(StudioError::validation("font family must not be empty"));
        }
        Ok(())
    }
}

/// Rasterizes text designs with a shared font database.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl TextRenderer {
    /// System fonts only.
    pub fn new() -> Self {
        Self::with_fonts_dir(None)
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` file directly inside `dir`.
    pub fn with_fonts_dir(dir: Option<&Path>) -> Self {
        Self {
            fontdb: build_fontdb(dir),
        }
    }

    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.fontdb)
    }

    /// SVG parse options sharing this renderer's fonts.
    pub fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.fontdb(),
            ..Default::default()
        }
    }

    /// Render `text` centered in [`TEXT_CANVAS`].
    ///
    /// Blank text is a no-op and yields `Ok(None)`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn generate(&self, text: &str, style: &TextStyle) -> StudioResult<Option<DataUrl>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        style.validate()?;

        let svg = text_svg(text, style);
        let tree = parse_svg(&svg, &self.svg_options())?;
        let frame = render_svg(&tree, TEXT_CANVAS)?;
        if frame.coverage() == 0 {
            tracing::warn!(font = %style.font, "text rendered no pixels; no usable font face");
        }
        frame_to_data_url(&frame).map(Some)
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `text` with a process-wide renderer over the system fonts.
///
/// The font database is built on first use.
pub fn generate_text(text: &str, style: &TextStyle) -> StudioResult<Option<DataUrl>> {
    static SHARED: OnceLock<TextRenderer> = OnceLock::new();
    SHARED.get_or_init(TextRenderer::new).generate(text, style)
}

fn text_svg(text: &str, style: &TextStyle) -> String {
    let (w, h) = TEXT_CANVAS.size_f64();
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{cx}" y="{cy}" font-family="{family}, sans-serif" font-size="{size}" fill="{fill}" fill-opacity="{opacity}" text-anchor="middle" dominant-baseline="middle" xml:space="preserve">{body}</text></svg>"#,
        cx = w / 2.0,
        cy = h / 2.0,
        family = escape_xml(style.font.trim()),
        size = style.size_px,
        fill = style.color.to_svg_rgb(),
        opacity = style.color.opacity(),
        body = escape_xml(text),
    )
}

/// Escape text for use inside XML attributes and character data.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn build_fontdb(dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = dir {
        load_fonts_from_dir(&mut db, dir);
    }

    // Generic families default to Windows names; point them at something that exists.
    let fallback = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
    if let Some(name) = fallback {
        let has = |family: &str| {
            db.faces()
                .any(|f| f.families.iter().any(|(n, _)| n == family))
        };
        let (has_sans, has_serif) = (has("Arial"), has("Times New Roman"));
        if !has_sans {
            db.set_sans_serif_family(name.clone());
        }
        if !has_serif {
            db.set_serif_family(name);
        }
    }

    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "fonts dir is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable font");
        }
    }
}
