use crate::assets::data_url::ImageRef;
use crate::design::entry::{
    DesignEntry, DesignId, DesignPatch, ROTATION_STEP_DEG, clamp_size, wrap_rotation,
};
use crate::design::placement::PlacementArea;
use crate::foundation::error::{StudioError, StudioResult};

/// Ordered collection of placed designs. Order is insertion order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DesignStore {
    entries: Vec<DesignEntry>,
}

impl DesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a collection handed over by the parent flow, normalizing every entry.
    pub fn from_entries(entries: Vec<DesignEntry>) -> Self {
        let mut store = Self { entries };
        for e in &mut store.entries {
            e.normalize(PlacementArea::SHIRT);
        }
        store
    }

    pub fn entries(&self) -> &[DesignEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DesignEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DesignEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: DesignId) -> Option<&DesignEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: DesignId) -> Option<&mut DesignEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Append a design with the default centered placement.
    pub fn add(&mut self, image: ImageRef) -> DesignId {
        let entry = DesignEntry::new(image);
        let id = entry.id;
        self.entries.push(entry);
        tracing::debug!(%id, count = self.entries.len(), "design added");
        id
    }

    /// Merge `patch` into the design with `id`. Returns `false` when no such design exists.
    pub fn update(&mut self, id: DesignId, patch: DesignPatch) -> bool {
        let Some(entry) = self.get_mut(id) else {
            return false;
        };
        patch.apply(entry);
        entry.normalize(PlacementArea::SHIRT);
        true
    }

    /// Remove the design with `id`, returning it when present.
    pub fn remove(&mut self, id: DesignId) -> Option<DesignEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(pos);
        tracing::debug!(%id, count = self.entries.len(), "design removed");
        Some(removed)
    }

    /// Advance rotation by one step, wrapping at 360°.
    pub fn rotate(&mut self, id: DesignId) -> bool {
        let Some(entry) = self.get_mut(id) else {
            return false;
        };
        entry.rotation = wrap_rotation(entry.rotation + ROTATION_STEP_DEG);
        true
    }

    /// Scale width and height by `factor`, each clamped to the allowed size range.
    pub fn resize(&mut self, id: DesignId, factor: f64) -> StudioResult<bool> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(StudioError::validation(format!(
                "resize factor must be finite and > 0, got {factor}"
            )));
        }
        let Some(entry) = self.get_mut(id) else {
            return Ok(false);
        };
        entry.width = clamp_size(entry.width * factor);
        entry.height = clamp_size(entry.height * factor);
        Ok(true)
    }

    /// Move a design, clamping to the placement area.
    pub fn move_to(&mut self, id: DesignId, x: f64, y: f64) -> bool {
        self.update(id, DesignPatch::position(x, y))
    }
}

impl<'a> IntoIterator for &'a DesignStore {
    type Item = &'a DesignEntry;
    type IntoIter = std::slice::Iter<'a, DesignEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
