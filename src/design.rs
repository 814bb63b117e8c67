//! Design placement model: entries, the ordered store, drag/transform math and the editor.

pub mod editor;
pub mod entry;
pub mod placement;
pub mod store;

pub use editor::{DesignEditor, DesignSink, EditorTab, NoSink};
pub use entry::{DesignEntry, DesignId, DesignPatch};
pub use placement::{DragSession, PlacementArea, drag_position, overlay_transform};
pub use store::DesignStore;
