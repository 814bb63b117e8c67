//! Teestudio is the engine behind a custom t-shirt storefront.
//!
//! The customer picks a shirt, decorates it with designs and checks out:
//!
//! - Generate or accept design imagery ([`assets`]): shapes, text, gallery art and uploads
//! - Place, resize and rotate designs on the shirt ([`design`])
//! - Compose and rasterize a garment preview ([`preview`])
//! - Price the order, validate the contact form and simulate checkout ([`order`])
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod design;
mod foundation;
pub mod order;
pub mod preview;
pub mod project;
pub mod shirt;

pub use crate::foundation::core::{Affine, BezPath, Canvas, FrameRGBA, Point, Rect, Vec2};
pub use crate::foundation::error::{StudioError, StudioResult};

pub use crate::assets::raster::encode_png;
pub use crate::assets::{Color, DataUrl, ImageRef, ShapeKind, TextRenderer, TextStyle};
pub use crate::config::StudioConfig;
pub use crate::design::{DesignEditor, DesignEntry, DesignId, DesignPatch, DesignStore};
pub use crate::order::{
    CheckoutForm, CheckoutOutcome, CheckoutSimulator, CustomerInfo, Money, OrderStep, PriceQuote,
    PricingConfig,
};
pub use crate::preview::{PreviewState, ViewSide};
pub use crate::project::Project;
pub use crate::shirt::{ShirtModel, ShirtSelection, ShirtSize};
