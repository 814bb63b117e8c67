//! Design imagery: colors, procedural shape/text generation, data URLs and uploads.

pub mod color;
pub mod data_url;
pub mod gallery;
pub mod raster;
pub mod shapes;
pub mod text;
pub mod upload;

pub use color::Color;
pub use data_url::{DataUrl, ImageRef};
pub use gallery::{GalleryDesign, PREDEFINED_DESIGNS};
pub use shapes::{SHAPE_PALETTE, ShapeKind, generate_shape};
pub use text::{FONT_PRESETS, SIZE_PRESETS, TextRenderer, TextStyle, generate_text};
pub use upload::{MAX_UPLOAD_BYTES, UploadRejection, UploadedFile, check_upload};
