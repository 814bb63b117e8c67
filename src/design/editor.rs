use std::path::Path;

use crate::assets::color::Color;
use crate::assets::data_url::ImageRef;
use crate::assets::gallery::gallery_design;
use crate::assets::shapes::{SHAPE_PALETTE, ShapeKind, generate_shape};
use crate::assets::text::{TextRenderer, TextStyle};
use crate::assets::upload::{
    MAX_UPLOAD_BYTES, UploadRejection, UploadedFile, accept_upload, load_upload,
};
use crate::design::entry::{DesignEntry, DesignId, DesignPatch};
use crate::design::store::DesignStore;
use crate::foundation::error::{StudioError, StudioResult};

/// Zoom-out factor of the resize buttons.
pub const ZOOM_OUT: f64 = 0.9;
/// Zoom-in factor of the resize buttons.
pub const ZOOM_IN: f64 = 1.1;

/// Receives the full replacement collection after every change.
pub trait DesignSink {
    fn designs_changed(&mut self, designs: &[DesignEntry]);
}

impl<F> DesignSink for F
where
    F: FnMut(&[DesignEntry]),
{
    fn designs_changed(&mut self, designs: &[DesignEntry]) {
        self(designs)
    }
}

/// Sink that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSink;

impl DesignSink for NoSink {
    fn designs_changed(&mut self, _designs: &[DesignEntry]) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Gallery,
    Upload,
    Text,
    Shapes,
}

/// State of the design-editing step.
///
/// Tab, selection and text inputs live here rather than in shared state; the design collection
/// is a working copy whose every change is pushed to the sink.
pub struct DesignEditor<S: DesignSink = NoSink> {
    store: DesignStore,
    sink: S,
    text_renderer: TextRenderer,
    upload_limit: u64,

    pub tab: EditorTab,
    selected: Option<DesignId>,
    pub text_input: String,
    pub text_style: TextStyle,
}

impl<S: DesignSink> DesignEditor<S> {
    pub fn new(designs: Vec<DesignEntry>, sink: S) -> Self {
        Self {
            store: DesignStore::from_entries(designs),
            sink,
            text_renderer: TextRenderer::new(),
            upload_limit: MAX_UPLOAD_BYTES,
            tab: EditorTab::default(),
            selected: None,
            text_input: String::new(),
            text_style: TextStyle::default(),
        }
    }

    pub fn with_text_renderer(mut self, renderer: TextRenderer) -> Self {
        self.text_renderer = renderer;
        self
    }

    pub fn with_upload_limit(mut self, limit: u64) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn designs(&self) -> &[DesignEntry] {
        self.store.entries()
    }

    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn selected(&self) -> Option<DesignId> {
        self.selected
    }

    fn emit(&mut self) {
        self.sink.designs_changed(self.store.entries());
    }

    /// Add any image as a new design.
    pub fn add_image(&mut self, image: ImageRef) -> DesignId {
        let id = self.store.add(image);
        self.emit();
        id
    }

    pub fn add_gallery(&mut self, index: usize) -> StudioResult<DesignId> {
        let design = gallery_design(index)
            .ok_or_else(|| StudioError::validation(format!("no gallery design at {index}")))?;
        Ok(self.add_image(design.image_ref()))
    }

    pub fn add_shape(&mut self, shape: ShapeKind, color: Color) -> StudioResult<DesignId> {
        let url = generate_shape(shape, color)?;
        Ok(self.add_image(url.into()))
    }

    /// A shape button: the shape in the default palette color.
    pub fn add_default_shape(&mut self, shape: ShapeKind) -> StudioResult<DesignId> {
        self.add_shape(shape, SHAPE_PALETTE[0])
    }

    /// A palette swatch: a circle in that color.
    pub fn add_swatch(&mut self, color: Color) -> StudioResult<DesignId> {
        self.add_shape(ShapeKind::Circle, color)
    }

    /// Render the current text input. Blank input adds nothing and keeps the input as is.
    pub fn add_text(&mut self) -> StudioResult<Option<DesignId>> {
        let Some(url) = self
            .text_renderer
            .generate(&self.text_input, &self.text_style)?
        else {
            return Ok(None);
        };
        let id = self.add_image(url.into());
        self.text_input.clear();
        Ok(Some(id))
    }

    /// Accept a picked file. Rejections leave the collection untouched.
    pub fn add_upload(&mut self, file: UploadedFile) -> Result<DesignId, UploadRejection> {
        let url = accept_upload(file, self.upload_limit)?;
        Ok(self.add_image(url.into()))
    }

    pub async fn add_upload_from_path(
        &mut self,
        path: &Path,
    ) -> StudioResult<Result<DesignId, UploadRejection>> {
        Ok(match load_upload(path, self.upload_limit).await? {
            Ok(url) => Ok(self.add_image(url.into())),
            Err(rejection) => Err(rejection),
        })
    }

    /// Toggle the control panel of a design; selecting the selected design deselects it.
    pub fn toggle_selected(&mut self, id: DesignId) {
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn remove(&mut self, id: DesignId) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.emit();
        true
    }

    /// Merge a partial update into one design.
    pub fn update(&mut self, id: DesignId, patch: DesignPatch) -> bool {
        let changed = self.store.update(id, patch);
        if changed {
            self.emit();
        }
        changed
    }

    pub fn rotate(&mut self, id: DesignId) -> bool {
        let changed = self.store.rotate(id);
        if changed {
            self.emit();
        }
        changed
    }

    pub fn resize(&mut self, id: DesignId, factor: f64) -> StudioResult<bool> {
        let changed = self.store.resize(id, factor)?;
        if changed {
            self.emit();
        }
        Ok(changed)
    }

    pub fn zoom_in(&mut self, id: DesignId) -> bool {
        self.resize(id, ZOOM_IN).unwrap_or(false)
    }

    pub fn zoom_out(&mut self, id: DesignId) -> bool {
        self.resize(id, ZOOM_OUT).unwrap_or(false)
    }

    /// Apply one drag update. Each call is applied on its own; the last one wins.
    pub fn move_design(&mut self, id: DesignId, x: f64, y: f64) -> bool {
        let changed = self.store.move_to(id, x, y);
        if changed {
            self.emit();
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<DesignEntry>>>>;

    fn recording_editor() -> (DesignEditor<impl DesignSink>, Log) {
        let log: Log = Rc::default();
        let sink_log = Rc::clone(&log);
        let editor = DesignEditor::new(Vec::new(), move |d: &[DesignEntry]| {
            sink_log.borrow_mut().push(d.to_vec())
        });
        (editor, log)
    }

    fn png_file(len: usize) -> UploadedFile {
        UploadedFile {
            name: "logo.png".into(),
            mime: "image/png".into(),
            bytes: vec![7u8; len],
        }
    }

    #[test]
    fn every_mutation_emits_the_full_collection() {
        let (mut ed, log) = recording_editor();
        let a = ed.add_gallery(0).unwrap();
        let b = ed.add_gallery(5).unwrap();
        ed.rotate(a);
        ed.remove(b);

        let log = log.borrow();
        assert_eq!(log.len(), 4);
        assert_eq!(log[1].len(), 2);
        assert_eq!(log[2][0].rotation, 15.0);
        assert_eq!(log[3].len(), 1);
        assert_eq!(log[3][0].id, a);
    }

    #[test]
    fn unknown_ids_do_not_emit() {
        let (mut ed, log) = recording_editor();
        let ghost = DesignId::new();
        assert!(!ed.rotate(ghost));
        assert!(!ed.remove(ghost));
        assert!(!ed.zoom_in(ghost));
        assert!(!ed.move_design(ghost, 20.0, 20.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn gallery_index_out_of_range_is_an_error() {
        let (mut ed, _log) = recording_editor();
        assert!(ed.add_gallery(6).is_err());
    }

    #[test]
    fn selection_toggles_and_clears_on_remove() {
        let (mut ed, _log) = recording_editor();
        let a = ed.add_gallery(1).unwrap();
        ed.toggle_selected(a);
        assert_eq!(ed.selected(), Some(a));
        ed.toggle_selected(a);
        assert_eq!(ed.selected(), None);
        ed.toggle_selected(a);
        ed.remove(a);
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn zoom_buttons_scale_by_ten_percent() {
        let (mut ed, _log) = recording_editor();
        let a = ed.add_gallery(2).unwrap();
        ed.zoom_in(a);
        assert!((ed.designs()[0].width - 88.0).abs() < 1e-9);
        ed.zoom_out(a);
        assert!((ed.designs()[0].width - 79.2).abs() < 1e-9);
    }

    #[test]
    fn rejected_uploads_never_touch_the_collection() {
        let (mut ed, log) = recording_editor();
        let big = png_file(6 * 1024 * 1024);
        assert!(matches!(
            ed.add_upload(big),
            Err(UploadRejection::TooLarge { .. })
        ));
        let pdf = UploadedFile {
            mime: "application/pdf".into(),
            ..png_file(2 * 1024 * 1024)
        };
        assert!(matches!(
            ed.add_upload(pdf),
            Err(UploadRejection::NotAnImage { .. })
        ));
        assert!(ed.designs().is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn accepted_upload_is_appended_exactly_once() {
        let (mut ed, log) = recording_editor();
        let id = ed.add_upload(png_file(1024 * 1024)).unwrap();
        assert_eq!(ed.designs().len(), 1);
        assert_eq!(ed.designs()[0].id, id);
        assert_eq!(log.borrow().len(), 1);
        let url = ed.designs()[0].image.as_data().unwrap();
        assert_eq!(url.mime(), "image/png");
        assert_eq!(url.bytes().len(), 1024 * 1024);
    }

    #[test]
    fn blank_text_adds_nothing_and_real_text_clears_input() {
        let (mut ed, log) = recording_editor();
        ed.text_input = "   ".into();
        assert_eq!(ed.add_text().unwrap(), None);
        assert_eq!(ed.text_input, "   ");

        ed.text_input = "Hola".into();
        let id = ed.add_text().unwrap();
        assert!(id.is_some());
        assert!(ed.text_input.is_empty());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn shape_and_swatch_buttons_add_png_designs() {
        let (mut ed, _log) = recording_editor();
        ed.add_default_shape(ShapeKind::Star).unwrap();
        ed.add_swatch(SHAPE_PALETTE[3]).unwrap();
        assert_eq!(ed.designs().len(), 2);
        for d in ed.designs() {
            assert_eq!(d.image.as_data().unwrap().mime(), "image/png");
        }
    }
}
